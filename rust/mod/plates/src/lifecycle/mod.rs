//! Plate lifecycle: IN_STOCK → DISTRIBUTED → RETURNED → (after quarantine)
//! DISTRIBUTED again.
//!
//! Every movement acts on a [`NumberBatch`] and is all-or-nothing: the whole
//! batch is validated against the current [`PlateState`] before a single
//! plate is touched. A successful movement prepends one [`TransactionLog`].

pub mod batch;
pub mod edit;
pub mod error;
pub mod quarantine;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use platetrack_core::format_rfc3339;

use crate::catalog::{Catalog, find_equipment_by_number};
use crate::model::{Destination, LogType, OptionalField, Plate, PlateState, PlateStatus, TransactionLog};

pub use batch::NumberBatch;
pub use edit::{PlateEdit, edit_plate};
pub use error::LifecycleError;
pub use quarantine::{QUARANTINE_YEARS, is_released, release_date};

/// A batch movement request. `equipment` overrides the name recorded in the
/// log (and, for intake, on the created plates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub batch: NumberBatch,
    pub equipment: Option<String>,
}

impl Movement {
    pub fn new(batch: NumberBatch) -> Self {
        Self { batch, equipment: None }
    }

    pub fn with_equipment(mut self, name: impl Into<String>) -> Self {
        self.equipment = Some(name.into());
        self
    }
}

/// Receive a batch of new plates into stock.
pub fn intake(
    state: &mut PlateState,
    catalog: &Catalog,
    movement: &Movement,
    now: DateTime<Utc>,
) -> Result<TransactionLog, LifecycleError> {
    let batch = movement.batch;
    check_span(catalog, batch)?;

    let equipment_name = match &movement.equipment {
        Some(name) => catalog
            .by_name(name)
            .ok_or_else(|| LifecycleError::UnknownEquipment { name: name.clone() })?
            .name
            .clone(),
        None => find_equipment_by_number(catalog, batch.start())
            .ok_or(LifecycleError::Unclassified { number: batch.start() })?
            .name
            .clone(),
    };

    let index = index_by_number(&state.plates);
    let mut collisions = batch.numbers().filter(|n| index.contains_key(n));
    if let Some(first) = collisions.next() {
        return Err(LifecycleError::Collision {
            number: first,
            count: 1 + collisions.count(),
        });
    }

    let timestamp = format_rfc3339(now);
    state.plates.extend(
        batch
            .numbers()
            .map(|n| Plate::in_stock(n, equipment_name.clone(), timestamp.clone())),
    );

    Ok(append_log(state, LogType::In, batch, equipment_name, None, now))
}

/// Hand out a batch of plates to `destination`.
///
/// Plates must exist and be IN_STOCK or RETURNED; RETURNED plates must have
/// finished their quarantine.
pub fn distribute(
    state: &mut PlateState,
    catalog: &Catalog,
    movement: &Movement,
    destination: &Destination,
    now: DateTime<Utc>,
) -> Result<TransactionLog, LifecycleError> {
    let batch = movement.batch;
    check_span(catalog, batch)?;
    check_equipment(catalog, movement)?;

    let index = index_by_number(&state.plates);
    let positions = resolve(&index, &state.plates, batch, |status| status != PlateStatus::Distributed)?;

    for &i in &positions {
        let plate = &state.plates[i];
        if let Some(release_date) = quarantine::pending_release(plate, now)? {
            return Err(LifecycleError::Quarantined {
                number: plate.number,
                release_date,
            });
        }
    }

    let equipment_name = log_equipment(movement, &state.plates[positions[0]]);
    let timestamp = format_rfc3339(now);
    for &i in &positions {
        let plate = &mut state.plates[i];
        plate.status = PlateStatus::Distributed;
        plate.destination = OptionalField::Value(destination.clone());
        plate.date_out = OptionalField::Value(timestamp.clone());
    }

    Ok(append_log(
        state,
        LogType::Out,
        batch,
        equipment_name,
        Some(destination.clone()),
        now,
    ))
}

/// Take a batch of distributed plates back; they enter quarantine.
pub fn return_plates(
    state: &mut PlateState,
    catalog: &Catalog,
    movement: &Movement,
    now: DateTime<Utc>,
) -> Result<TransactionLog, LifecycleError> {
    let batch = movement.batch;
    check_span(catalog, batch)?;
    check_equipment(catalog, movement)?;

    let index = index_by_number(&state.plates);
    let positions = resolve(&index, &state.plates, batch, |status| status == PlateStatus::Distributed)?;

    let equipment_name = log_equipment(movement, &state.plates[positions[0]]);
    let timestamp = format_rfc3339(now);
    for &i in &positions {
        let plate = &mut state.plates[i];
        plate.status = PlateStatus::Returned;
        plate.destination = OptionalField::Absent;
        plate.date_returned = OptionalField::Value(timestamp.clone());
    }

    Ok(append_log(state, LogType::Return, batch, equipment_name, None, now))
}

/// Millisecond id for a new log entry, strictly above the newest existing
/// id so that ids stay unique when the clock stalls or steps back.
pub fn next_log_id(logs: &[TransactionLog], now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis();
    let newest = logs.iter().filter_map(TransactionLog::id_millis).max();
    match newest {
        Some(prev) if prev >= millis => (prev + 1).to_string(),
        _ => millis.to_string(),
    }
}

fn append_log(
    state: &mut PlateState,
    log_type: LogType,
    batch: NumberBatch,
    equipment_name: String,
    destination: Option<Destination>,
    now: DateTime<Utc>,
) -> TransactionLog {
    let log = TransactionLog {
        id: next_log_id(&state.logs, now),
        log_type,
        start_number: batch.start(),
        end_number: batch.end(),
        count: batch.count(),
        equipment_name,
        destination: destination.into(),
        timestamp: format_rfc3339(now),
    };
    state.logs.insert(0, log.clone());
    log
}

/// Endpoints that classify to different rules are rejected. Unclassifiable
/// endpoints are left to the operation itself.
fn check_span(catalog: &Catalog, batch: NumberBatch) -> Result<(), LifecycleError> {
    let start = find_equipment_by_number(catalog, batch.start());
    let end = find_equipment_by_number(catalog, batch.end());
    if let (Some(a), Some(b)) = (start, end) {
        if a.id != b.id {
            return Err(LifecycleError::RangeMismatch {
                start: batch.start(),
                end: batch.end(),
            });
        }
    }
    Ok(())
}

fn check_equipment(catalog: &Catalog, movement: &Movement) -> Result<(), LifecycleError> {
    match &movement.equipment {
        Some(name) if catalog.by_name(name).is_none() => Err(LifecycleError::UnknownEquipment { name: name.clone() }),
        _ => Ok(()),
    }
}

fn log_equipment(movement: &Movement, first: &Plate) -> String {
    movement
        .equipment
        .clone()
        .unwrap_or_else(|| first.equipment_name.clone())
}

fn index_by_number(plates: &[Plate]) -> HashMap<u32, usize> {
    plates.iter().enumerate().map(|(i, p)| (p.number, i)).collect()
}

/// Positions of every plate in the batch, in batch order. The first number
/// that is missing or whose status fails `allowed` rejects the batch.
fn resolve(
    index: &HashMap<u32, usize>,
    plates: &[Plate],
    batch: NumberBatch,
    allowed: impl Fn(PlateStatus) -> bool,
) -> Result<Vec<usize>, LifecycleError> {
    batch
        .numbers()
        .map(|number| match index.get(&number) {
            None => Err(LifecycleError::IllegalTransition { number, status: None }),
            Some(&i) if !allowed(plates[i].status) => Err(LifecycleError::IllegalTransition {
                number,
                status: Some(plates[i].status),
            }),
            Some(&i) => Ok(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::model::KnownDestination;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn batch(start: u32, end: u32) -> Movement {
        Movement::new(NumberBatch::new(start, Some(end)).unwrap())
    }

    fn timbo() -> Destination {
        Destination::Known(KnownDestination::Timbo)
    }

    fn stocked(start: u32, end: u32) -> PlateState {
        let mut state = PlateState::default();
        intake(&mut state, &Catalog::default(), &batch(start, end), now() - Duration::days(400)).unwrap();
        state
    }

    #[test]
    fn intake_creates_plates_and_one_log() {
        let catalog = Catalog::default();
        let mut state = PlateState::default();

        let log = intake(&mut state, &catalog, &batch(100, 104), now()).unwrap();

        assert_eq!(state.plates.len(), 5);
        assert!(state.plates.iter().all(|p| p.status == PlateStatus::InStock));
        assert!(state.plates.iter().all(|p| p.equipment_name == "Seccionalizador"));
        assert!(state.plates.iter().all(|p| p.date_in == "2024-03-01T12:00:00.000Z"));

        assert_eq!(state.logs.len(), 1);
        assert_eq!(log.log_type, LogType::In);
        assert_eq!((log.start_number, log.end_number, log.count), (100, 104, 5));
        assert_eq!(log.id, now().timestamp_millis().to_string());
        assert!(log.destination.is_absent());
    }

    #[test]
    fn intake_collision_reports_first_and_count() {
        let catalog = Catalog::default();
        let mut state = stocked(102, 103);
        let before = state.clone();

        let err = intake(&mut state, &catalog, &batch(100, 104), now()).unwrap_err();
        assert_eq!(err, LifecycleError::Collision { number: 102, count: 2 });
        assert_eq!(state, before);
    }

    #[test]
    fn intake_unclassified_start_without_equipment() {
        let catalog = Catalog::default();
        let mut state = PlateState::default();
        let err = intake(&mut state, &catalog, &batch(100_001, 100_002), now()).unwrap_err();
        assert_eq!(err, LifecycleError::Unclassified { number: 100_001 });
    }

    #[test]
    fn intake_with_explicit_equipment() {
        let catalog = Catalog::default();
        let mut state = PlateState::default();

        let m = batch(100_001, 100_002).with_equipment("Reserva Técnica");
        intake(&mut state, &catalog, &m, now()).unwrap();
        assert_eq!(state.plates[0].equipment_name, "Reserva Técnica");

        let m = batch(100_010, 100_010).with_equipment("Transformador");
        assert_eq!(
            intake(&mut state, &catalog, &m, now()).unwrap_err(),
            LifecycleError::UnknownEquipment { name: "Transformador".into() }
        );
    }

    #[test]
    fn movement_across_rules_is_rejected() {
        let catalog = Catalog::default();
        let mut state = PlateState::default();
        let err = intake(&mut state, &catalog, &batch(190, 210), now()).unwrap_err();
        assert_eq!(err, LifecycleError::RangeMismatch { start: 190, end: 210 });
        assert!(state.plates.is_empty());
        assert!(state.logs.is_empty());
    }

    #[test]
    fn distribute_marks_plates_and_logs_destination() {
        let catalog = Catalog::default();
        let mut state = stocked(100, 104);

        let log = distribute(&mut state, &catalog, &batch(100, 102), &timbo(), now()).unwrap();

        assert_eq!(log.log_type, LogType::Out);
        assert_eq!(log.count, 3);
        assert_eq!(log.destination, OptionalField::Value(timbo()));
        assert_eq!(log.equipment_name, "Seccionalizador");
        assert_eq!(state.logs.len(), 2);
        assert_eq!(state.logs[0], log);

        let p = state.find(101).unwrap();
        assert_eq!(p.status, PlateStatus::Distributed);
        assert_eq!(p.destination.as_option(), Some(&timbo()));
        assert_eq!(p.date_out.as_option().map(String::as_str), Some("2024-03-01T12:00:00.000Z"));
        assert_eq!(state.find(103).unwrap().status, PlateStatus::InStock);
    }

    #[test]
    fn distribute_rejects_missing_or_distributed_without_mutation() {
        let catalog = Catalog::default();
        let mut state = stocked(100, 104);
        distribute(&mut state, &catalog, &batch(102, 102), &timbo(), now()).unwrap();
        let before = state.clone();

        let err = distribute(&mut state, &catalog, &batch(100, 104), &timbo(), now()).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalTransition {
                number: 102,
                status: Some(PlateStatus::Distributed)
            }
        );
        assert_eq!(state, before);

        let err = distribute(&mut state, &catalog, &batch(104, 106), &timbo(), now()).unwrap_err();
        assert_eq!(err, LifecycleError::IllegalTransition { number: 105, status: None });
        assert_eq!(state, before);
    }

    #[test]
    fn return_then_quarantine_blocks_redistribution() {
        let catalog = Catalog::default();
        let mut state = stocked(150, 150);
        let single = batch(150, 150);
        let returned_at = now();

        distribute(&mut state, &catalog, &single, &timbo(), returned_at - Duration::days(10)).unwrap();
        let log = return_plates(&mut state, &catalog, &single, returned_at).unwrap();
        assert_eq!(log.log_type, LogType::Return);

        let p = state.find(150).unwrap();
        assert_eq!(p.status, PlateStatus::Returned);
        assert!(p.destination.is_absent());
        assert_eq!(
            p.date_returned.as_option().map(String::as_str),
            Some("2024-03-01T12:00:00.000Z")
        );

        let one_year = returned_at + Duration::days(365);
        let err = distribute(&mut state, &catalog, &single, &timbo(), one_year).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Quarantined {
                number: 150,
                release_date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            }
        );

        let released = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        distribute(&mut state, &catalog, &single, &timbo(), released).unwrap();
        let p = state.find(150).unwrap();
        assert_eq!(p.status, PlateStatus::Distributed);
        // History of the previous return is kept.
        assert!(p.date_returned.is_set());
    }

    #[test]
    fn returned_without_date_is_eligible() {
        let catalog = Catalog::default();
        let mut state = stocked(150, 150);
        state.plates[0].status = PlateStatus::Returned;

        distribute(&mut state, &catalog, &batch(150, 150), &timbo(), now()).unwrap();
        assert_eq!(state.plates[0].status, PlateStatus::Distributed);
    }

    #[test]
    fn return_requires_distributed() {
        let catalog = Catalog::default();
        let mut state = stocked(100, 101);
        let err = return_plates(&mut state, &catalog, &batch(100, 101), now()).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalTransition {
                number: 100,
                status: Some(PlateStatus::InStock)
            }
        );
    }

    #[test]
    fn log_equipment_prefers_request() {
        let catalog = Catalog::default();
        let mut state = stocked(100, 101);
        let m = batch(100, 101).with_equipment("Seccionalizador");
        let log = distribute(&mut state, &catalog, &m, &Destination::from("Pátio"), now()).unwrap();
        assert_eq!(log.equipment_name, "Seccionalizador");
        assert_eq!(log.destination.as_option().map(Destination::as_str), Some("Pátio"));

        let m = batch(100, 101).with_equipment("Nope");
        assert!(matches!(
            return_plates(&mut state, &catalog, &m, now()).unwrap_err(),
            LifecycleError::UnknownEquipment { .. }
        ));
    }

    #[test]
    fn log_ids_stay_unique_and_newest_first() {
        let catalog = Catalog::default();
        let mut state = PlateState::default();
        intake(&mut state, &catalog, &batch(100, 100), now()).unwrap();
        intake(&mut state, &catalog, &batch(101, 101), now()).unwrap();
        intake(&mut state, &catalog, &batch(102, 102), now() - Duration::seconds(5)).unwrap();

        let ids: Vec<i64> = state.logs.iter().filter_map(TransactionLog::id_millis).collect();
        let base = now().timestamp_millis();
        assert_eq!(ids, vec![base + 2, base + 1, base]);
        assert_eq!(state.logs[0].start_number, 102);
    }
}
