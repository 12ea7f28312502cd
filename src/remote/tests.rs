#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::rest::{delete_url, select_url, table_url};
use super::*;
use crate::config::RemoteConfig;
use crate::models::{Category, TxnType};

fn row(json: &str) -> RemoteRow {
    serde_json::from_str(json).unwrap()
}

// ── Incoming rows ─────────────────────────────────────────────

#[test]
fn test_normalize_remote_names() {
    let txn = row(
        r#"{"id": 42, "tipo": "entrada", "categoria": "corrida", "descricao": "Airport run",
            "valor": 120.0, "data": "2024-01-11", "created_at": "2024-01-11T10:00:00Z"}"#,
    )
    .normalize()
    .unwrap();
    assert_eq!(txn.id, 42);
    assert_eq!(txn.txn_type, TxnType::Income);
    assert_eq!(txn.category, Category::Ride);
    assert_eq!(txn.description.as_deref(), Some("Airport run"));
    assert_eq!(txn.amount, dec!(120));
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
}

#[test]
fn test_normalize_local_names() {
    let txn = row(
        r#"{"id": "7", "type": "expense", "category": "fuel", "amount": "50.00", "date": "2024-01-10"}"#,
    )
    .normalize()
    .unwrap();
    assert_eq!(txn.id, 7);
    assert_eq!(txn.txn_type, TxnType::Expense);
    assert_eq!(txn.category, Category::Fuel);
    assert_eq!(txn.amount, dec!(50.00));
    assert!(txn.description.is_none());
}

#[test]
fn test_normalize_prefers_remote_names() {
    let txn = row(
        r#"{"id": 1, "tipo": "saida", "type": "income", "valor": 3, "amount": 9, "data": "2024-01-01"}"#,
    )
    .normalize()
    .unwrap();
    assert_eq!(txn.txn_type, TxnType::Expense);
    assert_eq!(txn.amount, dec!(3));
}

#[test]
fn test_normalize_timestamp_date_and_blank_description() {
    let txn = row(
        r#"{"id": 1, "tipo": "saida", "categoria": "lavagem", "descricao": "  ",
            "valor": 15, "data": "2024-03-05T00:00:00+00:00"}"#,
    )
    .normalize()
    .unwrap();
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    assert_eq!(txn.category, Category::CarWash);
    assert!(txn.description.is_none());
}

#[test]
fn test_normalize_unknown_or_missing_category_is_other() {
    let unknown = row(r#"{"id": 1, "tipo": "saida", "categoria": "pedagio", "valor": 1, "data": "2024-01-01"}"#)
        .normalize()
        .unwrap();
    assert_eq!(unknown.category, Category::Other);
    let missing = row(r#"{"id": 2, "tipo": "saida", "valor": 1, "data": "2024-01-01"}"#)
        .normalize()
        .unwrap();
    assert_eq!(missing.category, Category::Other);
}

#[test]
fn test_normalize_rejects_incomplete_rows() {
    let cases = [
        r#"{"tipo": "saida", "valor": 1, "data": "2024-01-01"}"#,
        r#"{"id": 1, "valor": 1, "data": "2024-01-01"}"#,
        r#"{"id": 1, "tipo": "saida", "data": "2024-01-01"}"#,
        r#"{"id": 1, "tipo": "saida", "valor": 1}"#,
        r#"{"id": 1, "tipo": "saida", "valor": 1, "data": "yesterday"}"#,
        r#"{"id": 1, "tipo": "saida", "valor": -1, "data": "2024-01-01"}"#,
    ];
    for case in cases {
        assert!(
            matches!(row(case).normalize(), Err(MirrorError::Malformed(_))),
            "expected malformed: {case}"
        );
    }
}

#[test]
fn test_unknown_type_fails_to_parse() {
    assert!(serde_json::from_str::<RemoteRow>(r#"{"id": 1, "tipo": "refund"}"#).is_err());
}

// ── Outgoing rows ─────────────────────────────────────────────

#[test]
fn test_insert_income_ride() {
    let txn = crate::models::Transaction {
        id: 1,
        txn_type: TxnType::Income,
        category: Category::Ride,
        description: None,
        amount: dec!(120),
        date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
    };
    let json = serde_json::to_value(RemoteInsert::from(&txn)).unwrap();
    assert_eq!(json["tipo"], "entrada");
    assert_eq!(json["categoria"], "corrida");
    assert!(json["descricao"].is_null());
    assert_eq!(json["valor"], 120.0);
}

#[test]
fn test_insert_uses_remote_names() {
    let txn = crate::models::Transaction {
        id: 1704931200000,
        txn_type: TxnType::Expense,
        category: Category::CarWash,
        description: Some("Wash".into()),
        amount: dec!(50.00),
        date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    };
    let json = serde_json::to_value(RemoteInsert::from(&txn)).unwrap();
    assert_eq!(json["tipo"], "saida");
    assert_eq!(json["categoria"], "lavagem");
    assert_eq!(json["descricao"], "Wash");
    assert_eq!(json["valor"], 50.0);
    assert_eq!(json["data"], "2024-01-10");
    assert!(json.get("id").is_none());
    assert!(json.get("type").is_none());
}

// ── REST URLs ─────────────────────────────────────────────────

#[test]
fn test_table_url() {
    let url = table_url("https://abc.supabase.co/").unwrap();
    assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/transacoes");
}

#[test]
fn test_select_url_orders_by_date_desc() {
    let url = select_url(&table_url("https://abc.supabase.co").unwrap());
    assert_eq!(
        url.as_str(),
        "https://abc.supabase.co/rest/v1/transacoes?select=*&order=data.desc"
    );
}

#[test]
fn test_delete_url_filters_by_id() {
    let url = delete_url(&table_url("https://abc.supabase.co").unwrap(), 1704931200000);
    assert_eq!(
        url.as_str(),
        "https://abc.supabase.co/rest/v1/transacoes?id=eq.1704931200000"
    );
}

#[test]
fn test_rest_mirror_builds_from_config() {
    let config = RemoteConfig::new("https://abc.supabase.co", "anon").unwrap();
    assert!(RestMirror::new(&config).is_ok());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Port 9 (discard) on loopback refuses connections on typical hosts.
    let config = RemoteConfig::new("http://127.0.0.1:9", "anon").unwrap();
    let mirror = RestMirror::new(&config).unwrap();
    let result = mirror.select_all().await;
    assert!(matches!(result, Err(MirrorError::Network(_))));
}

// ── REST requests against a local responder ──────────────────

/// One request as the responder saw it. `head` is lowercased.
struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn has_header(&self, line: &str) -> bool {
        self.head.lines().any(|l| l.trim() == line)
    }
}

/// Accept one connection, answer it with `status` and `body`, and hand back
/// what the client sent.
async fn respond_once(status: &'static str, body: &'static str) -> (RestMirror, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
        let length: usize = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .map(|v| v.trim().parse().unwrap())
            .unwrap_or(0);
        while buf.len() < head_end + length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending the body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let received = String::from_utf8_lossy(&buf[head_end..head_end + length]).into_owned();

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;

        Captured {
            head,
            body: received,
        }
    });

    let config = RemoteConfig::new(&format!("http://{addr}"), "anon-key").unwrap();
    (RestMirror::new(&config).unwrap(), server)
}

fn sample_txn() -> crate::models::Transaction {
    crate::models::Transaction {
        id: 1704931200000,
        txn_type: TxnType::Income,
        category: Category::Ride,
        description: Some("Airport run".into()),
        amount: dec!(120.00),
        date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
    }
}

#[tokio::test]
async fn test_select_sends_auth_and_normalizes_rows() {
    let (mirror, server) = respond_once(
        "200 OK",
        r#"[{"id": 2, "tipo": "saida", "categoria": "combustivel", "valor": 50, "data": "2024-01-12"},
            {"id": 1, "tipo": "entrada", "categoria": "corrida", "valor": 120.5, "data": "2024-01-11"}]"#,
    )
    .await;

    let txns = mirror.select_all().await.unwrap();
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].id, 2);
    assert_eq!(txns[0].category, Category::Fuel);
    assert_eq!(txns[1].txn_type, TxnType::Income);
    assert_eq!(txns[1].amount, dec!(120.5));

    let req = server.await.unwrap();
    assert!(req
        .request_line()
        .starts_with("get /rest/v1/transacoes?select=*&order=data.desc "));
    assert!(req.has_header("apikey: anon-key"));
    assert!(req.has_header("authorization: bearer anon-key"));
}

#[tokio::test]
async fn test_insert_posts_single_row_array() {
    let (mirror, server) = respond_once("201 Created", "").await;

    mirror.insert_one(&sample_txn()).await.unwrap();

    let req = server.await.unwrap();
    assert!(req.request_line().starts_with("post /rest/v1/transacoes "));
    assert!(req.has_header("prefer: return=minimal"));
    assert!(req.has_header("content-type: application/json"));
    assert!(req.has_header("apikey: anon-key"));

    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["tipo"], "entrada");
    assert_eq!(rows[0]["categoria"], "corrida");
    assert_eq!(rows[0]["descricao"], "Airport run");
    assert_eq!(rows[0]["valor"], 120.0);
    assert_eq!(rows[0]["data"], "2024-01-11");
}

#[tokio::test]
async fn test_delete_filters_by_id() {
    let (mirror, server) = respond_once("204 No Content", "").await;

    mirror.delete_by_id(1704931200000).await.unwrap();

    let req = server.await.unwrap();
    assert!(req
        .request_line()
        .starts_with("delete /rest/v1/transacoes?id=eq.1704931200000 "));
    assert!(req.has_header("authorization: bearer anon-key"));
    assert!(req.body.is_empty());
}

#[tokio::test]
async fn test_rejected_request_is_status_error() {
    let (mirror, server) = respond_once("401 Unauthorized", r#"{"message":"Invalid API key"}"#).await;

    let result = mirror.insert_one(&sample_txn()).await;
    assert!(
        matches!(&result, Err(MirrorError::Status { status: 401, body }) if body.contains("Invalid API key")),
        "unexpected result: {result:?}"
    );
    server.await.unwrap();
}

#[tokio::test]
async fn test_server_error_on_select_is_status_error() {
    let (mirror, server) = respond_once("500 Internal Server Error", "boom").await;
    assert!(matches!(
        mirror.select_all().await,
        Err(MirrorError::Status { status: 500, .. })
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unparseable_body_is_malformed() {
    let (mirror, server) = respond_once("200 OK", "<html>not json</html>").await;
    assert!(matches!(mirror.select_all().await, Err(MirrorError::Malformed(_))));
    server.await.unwrap();
}

#[tokio::test]
async fn test_incomplete_row_is_malformed() {
    let (mirror, server) = respond_once("200 OK", r#"[{"id": 1, "tipo": "entrada", "data": "2024-01-11"}]"#).await;
    assert!(matches!(mirror.select_all().await, Err(MirrorError::Malformed(_))));
    server.await.unwrap();
}
