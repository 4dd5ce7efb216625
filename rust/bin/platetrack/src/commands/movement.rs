use anyhow::{Context, bail};

use plates::model::{Destination, PlateStatus, TransactionLog};
use plates::{Movement, NumberBatch, PlateEdit, PlateService, format_number};
use platetrack_core::ServiceError;

use super::{print_json, short_date};

fn movement(start: u32, end: Option<u32>, equipment: Option<String>) -> anyhow::Result<Movement> {
    let batch = NumberBatch::new(start, end).map_err(ServiceError::from)?;
    let mut m = Movement::new(batch);
    if let Some(name) = equipment {
        m = m.with_equipment(name);
    }
    Ok(m)
}

fn print_log(log: &TransactionLog, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(log);
    }
    let range = if log.start_number == log.end_number {
        format_number(log.start_number)
    } else {
        format!("{} - {}", format_number(log.start_number), format_number(log.end_number))
    };
    println!("{} {} ({} plate(s), {})", log.log_type.as_str(), range, log.count, log.equipment_name);
    if let Some(dest) = log.destination.as_option() {
        println!("  Destination: {}", dest);
    }
    Ok(())
}

pub fn intake(
    svc: &mut PlateService,
    start: u32,
    end: Option<u32>,
    equipment: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let log = svc.intake(&movement(start, end, equipment)?)?;
    print_log(&log, json)
}

pub fn distribute(
    svc: &mut PlateService,
    start: u32,
    end: Option<u32>,
    destination: &str,
    equipment: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let log = svc.distribute(&movement(start, end, equipment)?, &Destination::from(destination))?;
    print_log(&log, json)
}

pub fn return_plates(
    svc: &mut PlateService,
    start: u32,
    end: Option<u32>,
    equipment: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let log = svc.return_plates(&movement(start, end, equipment)?)?;
    print_log(&log, json)
}

/// Flags of `platetrack edit`; unset flags keep the plate's current value.
pub struct EditArgs {
    pub equipment: Option<String>,
    pub status: Option<String>,
    pub destination: Option<String>,
    pub date_returned: Option<String>,
}

pub fn edit(svc: &mut PlateService, number: u32, args: EditArgs, json: bool) -> anyhow::Result<()> {
    let plate = svc
        .state()
        .find(number)
        .with_context(|| format!("plate {} not found", format_number(number)))?;
    let mut edit = PlateEdit::from_plate(plate);

    if let Some(name) = args.equipment {
        edit.equipment_name = name;
    }
    if let Some(s) = args.status.as_deref() {
        let Some(status) = PlateStatus::parse(s) else {
            bail!("unknown status {:?}; use IN_STOCK, DISTRIBUTED or RETURNED", s);
        };
        edit.status = status;
    }
    if let Some(dest) = args.destination {
        edit.destination = Some(Destination::from(dest));
    }
    edit.date_returned = args.date_returned;

    let updated = svc.edit_plate(number, &edit)?;
    if json {
        return print_json(&updated);
    }
    println!("Plate {} updated.", format_number(updated.number));
    println!("  Equipment:   {}", updated.equipment_name);
    println!("  Status:      {}", updated.status);
    println!(
        "  Destination: {}",
        updated.destination.as_option().map(|d| d.as_str()).unwrap_or("-")
    );
    println!(
        "  Returned:    {}",
        short_date(updated.date_returned.as_option().map(|s| s.as_str()))
    );
    Ok(())
}
