//! Plate lifecycle and numbering-range engine.
//!
//! Numbered identification plates are received in batches, handed out to
//! field destinations, returned, and held in a two-year quarantine before
//! reuse. Each equipment type owns fixed numbering ranges; the engine
//! classifies numbers, suggests the next numbers to buy, and forecasts
//! stock coverage from movement history.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use plates::catalog::Catalog;
//! use plates::lifecycle::{intake, Movement, NumberBatch};
//! use plates::model::PlateState;
//!
//! let catalog = Catalog::default();
//! let mut state = PlateState::default();
//!
//! let batch = NumberBatch::new(100, Some(104)).unwrap();
//! let log = intake(&mut state, &catalog, &Movement::new(batch), Utc::now()).unwrap();
//! assert_eq!(log.count, 5);
//! assert_eq!(state.plates[0].equipment_name, "Seccionalizador");
//! ```

pub mod catalog;
pub mod forecast;
pub mod inventory;
pub mod lifecycle;
pub mod model;
pub mod planner;
pub mod report;
pub mod service;
pub mod snapshot;

pub use catalog::{Catalog, CatalogError};
pub use inventory::{InventoryQuery, format_number};
pub use lifecycle::{LifecycleError, Movement, NumberBatch, PlateEdit};
pub use service::PlateService;
pub use snapshot::{DataSnapshot, SnapshotError};
