use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::OptionalField;

/// Plate status. Legacy backups carry the display labels, which are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlateStatus {
    #[serde(alias = "Em Estoque")]
    InStock,
    #[serde(alias = "Distribuído")]
    Distributed,
    #[serde(alias = "Devolvida / Quarentena")]
    Returned,
}

impl PlateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "IN_STOCK",
            Self::Distributed => "DISTRIBUTED",
            Self::Returned => "RETURNED",
        }
    }

    /// Parse a status from its wire name or legacy label (case-insensitive
    /// for the wire names).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "IN_STOCK" => Some(Self::InStock),
            "DISTRIBUTED" => Some(Self::Distributed),
            "RETURNED" => Some(Self::Returned),
            _ => match s {
                "Em Estoque" => Some(Self::InStock),
                "Distribuído" => Some(Self::Distributed),
                "Devolvida / Quarentena" => Some(Self::Returned),
                _ => None,
            },
        }
    }
}

impl fmt::Display for PlateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four destinations the field crews use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownDestination {
    Construcao,
    Manutencao,
    Timbo,
    Brusque,
}

impl KnownDestination {
    pub const ALL: [KnownDestination; 4] = [
        Self::Construcao,
        Self::Manutencao,
        Self::Timbo,
        Self::Brusque,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Construcao => "Construção",
            Self::Manutencao => "Manutenção",
            Self::Timbo => "Timbó",
            Self::Brusque => "Brusque",
        }
    }
}

/// Where a distributed plate went. Any string is accepted; the known set
/// is recognised but never required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Destination {
    Known(KnownDestination),
    Other(String),
}

impl Destination {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(k) => k.label(),
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<String> for Destination {
    fn from(s: String) -> Self {
        KnownDestination::ALL
            .into_iter()
            .find(|k| k.label() == s)
            .map(Self::Known)
            .unwrap_or(Self::Other(s))
    }
}

impl From<&str> for Destination {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<KnownDestination> for Destination {
    fn from(k: KnownDestination) -> Self {
        Self::Known(k)
    }
}

impl From<Destination> for String {
    fn from(d: Destination) -> Self {
        match d {
            Destination::Known(k) => k.label().to_string(),
            Destination::Other(s) => s,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plate: one physical numbered identification plate. PK = number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plate {
    /// Plate number, unique across the whole inventory.
    pub number: u32,

    /// Display name of the equipment rule the plate belongs to.
    pub equipment_name: String,

    pub status: PlateStatus,

    /// Set while DISTRIBUTED; retained after return as history.
    #[serde(default, skip_serializing_if = "OptionalField::is_absent")]
    pub destination: OptionalField<Destination>,

    /// RFC 3339 instant of intake.
    pub date_in: String,

    #[serde(default, skip_serializing_if = "OptionalField::is_absent")]
    pub date_out: OptionalField<String>,

    #[serde(default, skip_serializing_if = "OptionalField::is_absent")]
    pub date_returned: OptionalField<String>,
}

impl Plate {
    /// A freshly received plate.
    pub fn in_stock(number: u32, equipment_name: impl Into<String>, date_in: impl Into<String>) -> Self {
        Self {
            number,
            equipment_name: equipment_name.into(),
            status: PlateStatus::InStock,
            destination: OptionalField::Absent,
            date_in: date_in.into(),
            date_out: OptionalField::Absent,
            date_returned: OptionalField::Absent,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.status == PlateStatus::InStock
    }
}
