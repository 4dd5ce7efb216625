pub mod equipment;
pub mod field;
pub mod log;
pub mod plate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use equipment::{EquipmentRule, NumberRange};
pub use field::OptionalField;
pub use log::{LogType, TransactionLog};
pub use plate::{Destination, KnownDestination, Plate, PlateStatus};

/// Pinned annual usage per equipment rule id. Zero is a valid pin.
pub type UsageConfig = BTreeMap<String, u32>;

/// The mutable dataset: every known plate plus the movement log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlateState {
    pub plates: Vec<Plate>,

    /// Most recent first.
    pub logs: Vec<TransactionLog>,
}

impl PlateState {
    pub fn new(plates: Vec<Plate>, logs: Vec<TransactionLog>) -> Self {
        Self { plates, logs }
    }

    pub fn find(&self, number: u32) -> Option<&Plate> {
        self.plates.iter().find(|p| p.number == number)
    }

    pub fn count_by_status(&self, status: PlateStatus) -> usize {
        self.plates.iter().filter(|p| p.status == status).count()
    }
}
