use serde::{Deserialize, Serialize};

/// The fixed set of ledger categories.
///
/// Serialized with the canonical English spelling. The mirror table uses the
/// Portuguese names (`remote_name`), which are also accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Category {
    #[serde(alias = "corrida")]
    Ride,
    #[serde(alias = "combustivel")]
    Fuel,
    #[serde(alias = "manutencao")]
    Maintenance,
    #[serde(alias = "alimentacao")]
    Food,
    #[serde(alias = "estacionamento")]
    Parking,
    #[serde(alias = "lavagem")]
    CarWash,
    // Also catches "outros" and any name this build does not know.
    #[serde(other)]
    Other,
}

impl Category {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Ride => "ride",
            Self::Fuel => "fuel",
            Self::Maintenance => "maintenance",
            Self::Food => "food",
            Self::Parking => "parking",
            Self::CarWash => "car-wash",
            Self::Other => "other",
        }
    }

    /// Value stored in the mirror table's `categoria` column.
    pub(crate) fn remote_name(&self) -> &'static str {
        match self {
            Self::Ride => "corrida",
            Self::Fuel => "combustivel",
            Self::Maintenance => "manutencao",
            Self::Food => "alimentacao",
            Self::Parking => "estacionamento",
            Self::CarWash => "lavagem",
            Self::Other => "outros",
        }
    }

    /// Human-readable label used by the list and the form.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Ride => "Ride",
            Self::Fuel => "Fuel",
            Self::Maintenance => "Maintenance",
            Self::Food => "Food",
            Self::Parking => "Parking",
            Self::CarWash => "Car Wash",
            Self::Other => "Other",
        }
    }

    /// Strict parse used for user input. Unlike deserialization, unknown
    /// names are rejected instead of folding into `Other`.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ride" | "corrida" => Some(Self::Ride),
            "fuel" | "gas" | "combustivel" => Some(Self::Fuel),
            "maintenance" | "manutencao" => Some(Self::Maintenance),
            "food" | "alimentacao" => Some(Self::Food),
            "parking" | "estacionamento" => Some(Self::Parking),
            "car-wash" | "carwash" | "car wash" | "wash" | "lavagem" => Some(Self::CarWash),
            "other" | "outros" => Some(Self::Other),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::Ride,
            Self::Fuel,
            Self::Maintenance,
            Self::Food,
            Self::Parking,
            Self::CarWash,
            Self::Other,
        ]
    }

    /// Step through `all()` by `delta`, wrapping at both ends.
    pub(crate) fn cycle(&self, delta: i32) -> Self {
        let all = Self::all();
        let len = all.len() as i32;
        let idx = all.iter().position(|c| c == self).unwrap_or(0) as i32;
        all[(idx + delta).rem_euclid(len) as usize]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
