pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS kv_store (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

/// Persisted keys.
pub(crate) const KEY_LEDGER: &str = "transactionLedger";
pub(crate) const KEY_ENDPOINT: &str = "endpointConfig.endpoint";
pub(crate) const KEY_API_KEY: &str = "endpointConfig.key";
