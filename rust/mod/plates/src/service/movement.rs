use tracing::{info, warn};

use platetrack_core::ServiceError;

use super::PlateService;
use crate::inventory::format_number;
use crate::lifecycle::{self, Movement, PlateEdit};
use crate::model::{Destination, Plate, PlateStatus, TransactionLog};

impl PlateService {
    /// Receive new plates into stock.
    pub fn intake(&mut self, movement: &Movement) -> Result<TransactionLog, ServiceError> {
        let now = self.clock.now();
        let mut next = self.state.clone();
        let log = lifecycle::intake(&mut next, &self.catalog, movement, now)?;
        self.commit(next)?;
        info!(
            "Intake {}-{} ({} plates, {})",
            format_number(log.start_number),
            format_number(log.end_number),
            log.count,
            log.equipment_name
        );
        Ok(log)
    }

    /// Hand plates out to a destination.
    pub fn distribute(&mut self, movement: &Movement, destination: &Destination) -> Result<TransactionLog, ServiceError> {
        let now = self.clock.now();
        let mut next = self.state.clone();
        let log = lifecycle::distribute(&mut next, &self.catalog, movement, destination, now)?;
        self.commit(next)?;
        info!(
            "Distributed {}-{} ({} plates) to {}",
            format_number(log.start_number),
            format_number(log.end_number),
            log.count,
            destination
        );
        Ok(log)
    }

    /// Take distributed plates back into quarantine.
    pub fn return_plates(&mut self, movement: &Movement) -> Result<TransactionLog, ServiceError> {
        let now = self.clock.now();
        let mut next = self.state.clone();
        let log = lifecycle::return_plates(&mut next, &self.catalog, movement, now)?;
        self.commit(next)?;
        info!(
            "Returned {}-{} ({} plates)",
            format_number(log.start_number),
            format_number(log.end_number),
            log.count
        );
        Ok(log)
    }

    /// Administrative correction of one plate.
    pub fn edit_plate(&mut self, number: u32, edit: &PlateEdit) -> Result<Plate, ServiceError> {
        let now = self.clock.now();
        let previous = self.state.find(number).cloned();
        let mut next = self.state.clone();
        let plate = lifecycle::edit_plate(&mut next, &self.catalog, number, edit, now)?;

        if let Some(prev) = &previous {
            if edit.status == PlateStatus::Distributed
                && prev.status != PlateStatus::Distributed
                && matches!(lifecycle::quarantine::pending_release(prev, now), Ok(Some(_)))
            {
                warn!("Plate {} forced out of quarantine by manual edit", format_number(number));
            }
        }

        self.commit(next)?;
        info!("Plate {} edited: {} {}", format_number(number), plate.status, plate.equipment_name);
        Ok(plate)
    }
}
