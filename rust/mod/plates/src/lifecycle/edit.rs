use chrono::{DateTime, Utc};
use platetrack_core::{format_rfc3339, parse_instant};

use super::error::LifecycleError;
use crate::catalog::Catalog;
use crate::model::{Destination, OptionalField, Plate, PlateState, PlateStatus};

/// Administrative correction of a single plate.
///
/// Edits bypass every lifecycle precondition, including quarantine, and do
/// not produce a log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateEdit {
    pub equipment_name: String,
    pub status: PlateStatus,

    /// Required when `status` is DISTRIBUTED, dropped otherwise.
    pub destination: Option<Destination>,

    /// Used when `status` is RETURNED; falls back to the plate's current
    /// value, then to now. Must parse as an ISO-8601 instant and is stored
    /// normalized.
    pub date_returned: Option<String>,
}

impl PlateEdit {
    /// An edit that keeps the plate as it is.
    pub fn from_plate(plate: &Plate) -> Self {
        Self {
            equipment_name: plate.equipment_name.clone(),
            status: plate.status,
            destination: plate.destination.as_option().cloned(),
            date_returned: None,
        }
    }
}

/// Apply `edit` to plate `number`, returning the updated plate.
pub fn edit_plate(
    state: &mut PlateState,
    catalog: &Catalog,
    number: u32,
    edit: &PlateEdit,
    now: DateTime<Utc>,
) -> Result<Plate, LifecycleError> {
    if catalog.by_name(&edit.equipment_name).is_none() {
        return Err(LifecycleError::UnknownEquipment {
            name: edit.equipment_name.clone(),
        });
    }
    let supplied_return = edit
        .date_returned
        .as_deref()
        .map(|value| {
            parse_instant(value)
                .map(format_rfc3339)
                .ok_or_else(|| LifecycleError::InvalidTimestamp { value: value.to_string() })
        })
        .transpose()?;

    let plate = state
        .plates
        .iter_mut()
        .find(|p| p.number == number)
        .ok_or(LifecycleError::NotFound { number })?;

    let destination = match edit.status {
        PlateStatus::Distributed => {
            let d = edit
                .destination
                .clone()
                .ok_or(LifecycleError::MissingDestination { number })?;
            OptionalField::Value(d)
        }
        PlateStatus::InStock | PlateStatus::Returned => OptionalField::Absent,
    };

    let date_out = match edit.status {
        PlateStatus::InStock => OptionalField::Absent,
        PlateStatus::Distributed | PlateStatus::Returned => plate.date_out.clone(),
    };

    let date_returned = match edit.status {
        PlateStatus::Returned => {
            let value = supplied_return
                .or_else(|| plate.date_returned.as_option().cloned())
                .unwrap_or_else(|| format_rfc3339(now));
            OptionalField::Value(value)
        }
        PlateStatus::InStock | PlateStatus::Distributed => OptionalField::Absent,
    };

    plate.equipment_name = edit.equipment_name.clone();
    plate.status = edit.status;
    plate.destination = destination;
    plate.date_out = date_out;
    plate.date_returned = date_returned;

    Ok(plate.clone())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::lifecycle::{Movement, NumberBatch, distribute, intake, return_plates};
    use crate::model::KnownDestination;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn state_with_returned() -> PlateState {
        let catalog = Catalog::default();
        let mut state = PlateState::default();
        let m = Movement::new(NumberBatch::single(150).unwrap());
        let brusque = Destination::Known(KnownDestination::Brusque);
        intake(&mut state, &catalog, &m, now()).unwrap();
        distribute(&mut state, &catalog, &m, &brusque, now()).unwrap();
        return_plates(&mut state, &catalog, &m, now()).unwrap();
        state
    }

    #[test]
    fn edit_can_force_quarantined_plate_out() {
        let catalog = Catalog::default();
        let mut state = state_with_returned();
        let logs_before = state.logs.len();

        let edit = PlateEdit {
            status: PlateStatus::Distributed,
            destination: Some(Destination::Known(KnownDestination::Manutencao)),
            ..PlateEdit::from_plate(&state.plates[0])
        };
        let plate = edit_plate(&mut state, &catalog, 150, &edit, now()).unwrap();

        assert_eq!(plate.status, PlateStatus::Distributed);
        assert_eq!(plate.destination.as_option().map(Destination::as_str), Some("Manutenção"));
        assert!(plate.date_out.is_set());
        assert!(plate.date_returned.is_absent());
        assert_eq!(state.logs.len(), logs_before);
    }

    #[test]
    fn edit_to_distributed_needs_destination() {
        let catalog = Catalog::default();
        let mut state = state_with_returned();
        let edit = PlateEdit {
            status: PlateStatus::Distributed,
            destination: None,
            ..PlateEdit::from_plate(&state.plates[0])
        };
        assert_eq!(
            edit_plate(&mut state, &catalog, 150, &edit, now()).unwrap_err(),
            LifecycleError::MissingDestination { number: 150 }
        );
        assert_eq!(state.plates[0].status, PlateStatus::Returned);
    }

    #[test]
    fn edit_to_in_stock_clears_movement_fields() {
        let catalog = Catalog::default();
        let mut state = state_with_returned();
        let edit = PlateEdit {
            status: PlateStatus::InStock,
            ..PlateEdit::from_plate(&state.plates[0])
        };
        let plate = edit_plate(&mut state, &catalog, 150, &edit, now()).unwrap();
        assert!(plate.destination.is_absent());
        assert!(plate.date_out.is_absent());
        assert!(plate.date_returned.is_absent());
    }

    #[test]
    fn edit_to_returned_defaults_date() {
        let catalog = Catalog::default();
        let mut state = PlateState::default();
        intake(&mut state, &catalog, &Movement::new(NumberBatch::single(100).unwrap()), now()).unwrap();

        let edit = PlateEdit {
            status: PlateStatus::Returned,
            ..PlateEdit::from_plate(&state.plates[0])
        };
        let plate = edit_plate(&mut state, &catalog, 100, &edit, now()).unwrap();
        assert_eq!(
            plate.date_returned.as_option().map(String::as_str),
            Some("2024-03-01T12:00:00.000Z")
        );

        let edit = PlateEdit {
            date_returned: Some("2020-01-01T00:00:00.000Z".into()),
            ..edit
        };
        let plate = edit_plate(&mut state, &catalog, 100, &edit, now()).unwrap();
        assert_eq!(
            plate.date_returned.as_option().map(String::as_str),
            Some("2020-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn edit_rejects_unparseable_return_date() {
        let catalog = Catalog::default();
        let mut state = state_with_returned();
        let before = state.clone();

        let edit = PlateEdit {
            date_returned: Some("not a date".into()),
            ..PlateEdit::from_plate(&state.plates[0])
        };
        assert_eq!(
            edit_plate(&mut state, &catalog, 150, &edit, now()).unwrap_err(),
            LifecycleError::InvalidTimestamp { value: "not a date".into() }
        );
        assert_eq!(state, before);

        // The plate stays distributable once quarantine is over.
        let later = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let m = Movement::new(NumberBatch::single(150).unwrap());
        distribute(&mut state, &catalog, &m, &Destination::from("Obra 3"), later).unwrap();
    }

    #[test]
    fn edit_normalizes_return_date() {
        let catalog = Catalog::default();
        let mut state = state_with_returned();
        let edit = PlateEdit {
            date_returned: Some("2023-06-15".into()),
            ..PlateEdit::from_plate(&state.plates[0])
        };
        let plate = edit_plate(&mut state, &catalog, 150, &edit, now()).unwrap();
        assert_eq!(
            plate.date_returned.as_option().map(String::as_str),
            Some("2023-06-15T00:00:00.000Z")
        );
    }

    #[test]
    fn edit_rejects_unknown_plate_and_equipment() {
        let catalog = Catalog::default();
        let mut state = state_with_returned();
        let mut edit = PlateEdit::from_plate(&state.plates[0]);

        assert_eq!(
            edit_plate(&mut state, &catalog, 151, &edit, now()).unwrap_err(),
            LifecycleError::NotFound { number: 151 }
        );

        edit.equipment_name = "Poste".into();
        assert!(matches!(
            edit_plate(&mut state, &catalog, 150, &edit, now()).unwrap_err(),
            LifecycleError::UnknownEquipment { .. }
        ));
    }

    #[test]
    fn edit_can_reclassify_equipment() {
        let catalog = Catalog::default();
        let mut state = state_with_returned();
        let edit = PlateEdit {
            equipment_name: "Regulador de Tensão".into(),
            ..PlateEdit::from_plate(&state.plates[0])
        };
        let plate = edit_plate(&mut state, &catalog, 150, &edit, now()).unwrap();
        assert_eq!(plate.equipment_name, "Regulador de Tensão");
        assert_eq!(plate.status, PlateStatus::Returned);
        // The existing return date survives.
        assert_eq!(
            plate.date_returned.as_option().map(String::as_str),
            Some("2024-03-01T12:00:00.000Z")
        );
    }
}
