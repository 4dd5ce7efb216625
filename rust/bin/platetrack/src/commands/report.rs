use anyhow::bail;

use plates::catalog::find_equipment_by_number;
use plates::model::{Destination, Plate, PlateStatus};
use plates::report::allocation_report;
use plates::{InventoryQuery, PlateService, format_number};

use super::{print_json, short_date};

fn print_plates(plates: &[&Plate], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(plates);
    }
    if plates.is_empty() {
        println!("No plates found.");
        return Ok(());
    }
    println!("{:7} {:32} {:12} {:20} {:10}", "NUMBER", "EQUIPMENT", "STATUS", "DESTINATION", "OUT");
    for p in plates {
        println!(
            "{:7} {:32} {:12} {:20} {:10}",
            format_number(p.number),
            p.equipment_name,
            p.status.as_str(),
            p.destination.as_option().map(|d| d.as_str()).unwrap_or("-"),
            short_date(p.date_out.as_option().map(|s| s.as_str())),
        );
    }
    Ok(())
}

pub fn classify(svc: &PlateService, number: u32, json: bool) -> anyhow::Result<()> {
    let Some(rule) = find_equipment_by_number(svc.catalog(), number) else {
        bail!("{} is outside every equipment range", format_number(number));
    };
    if json {
        return print_json(rule);
    }
    println!("{} belongs to {} ({}).", format_number(number), rule.name, rule.id);
    Ok(())
}

pub fn next(svc: &PlateService, equipment: &str, json: bool) -> anyhow::Result<()> {
    if svc.catalog().by_name(equipment).is_none() {
        bail!("unknown equipment {:?}; run `platetrack catalog` for the list", equipment);
    }
    let next = svc.next_available_number(equipment);
    if json {
        return print_json(&serde_json::json!({ "equipment": equipment, "next": next }));
    }
    match next {
        Some(n) => println!("Next number for {}: {}", equipment, format_number(n)),
        None => println!("No free numbers left in the ranges of {}.", equipment),
    }
    Ok(())
}

pub fn catalog(svc: &PlateService, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(svc.catalog().rules());
    }
    println!("{:28} {:32} {:8} RANGES", "ID", "NAME", "USAGE/Y");
    for rule in svc.catalog().rules() {
        let ranges: Vec<String> = rule
            .ranges
            .iter()
            .map(|r| format!("{}-{}", format_number(r.start), format_number(r.end)))
            .collect();
        println!("{:28} {:32} {:8} {}", rule.id, rule.name, rule.est_annual_usage, ranges.join(", "));
    }
    Ok(())
}

pub fn inventory(
    svc: &PlateService,
    search: String,
    status: Option<&str>,
    destination: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let status = match status {
        Some(s) => match PlateStatus::parse(s) {
            Some(status) => Some(status),
            None => bail!("unknown status {:?}; use IN_STOCK, DISTRIBUTED or RETURNED", s),
        },
        None => None,
    };
    let query = InventoryQuery {
        term: search,
        status,
        destination: destination.map(Destination::from),
    };
    print_plates(&svc.inventory(&query), json)
}

pub fn allocated(svc: &PlateService, json: bool) -> anyhow::Result<()> {
    print_plates(&allocation_report(svc.plates()), json)
}

pub fn history(svc: &PlateService, limit: usize, json: bool) -> anyhow::Result<()> {
    let logs: Vec<_> = svc.logs().iter().take(limit).collect();
    if json {
        return print_json(&logs);
    }
    if logs.is_empty() {
        println!("No movements recorded.");
        return Ok(());
    }
    println!("{:10} {:7} {:7} {:7} {:6} {:32} DESTINATION", "DATE", "TYPE", "START", "END", "COUNT", "EQUIPMENT");
    for log in logs {
        println!(
            "{:10} {:7} {:7} {:7} {:6} {:32} {}",
            short_date(Some(log.timestamp.as_str())),
            log.log_type.as_str(),
            format_number(log.start_number),
            format_number(log.end_number),
            log.count,
            log.equipment_name,
            log.destination.as_option().map(|d| d.as_str()).unwrap_or("-"),
        );
    }
    Ok(())
}

pub fn forecast(svc: &PlateService, json: bool) -> anyhow::Result<()> {
    let rows = svc.forecast_report();
    if json {
        return print_json(&rows);
    }
    println!("{:32} {:6} {:8} {:8} {:9}", "EQUIPMENT", "STOCK", "USAGE/Y", "SOURCE", "COVERAGE");
    for row in rows {
        let marker = if row.is_low { " LOW" } else { "" };
        println!(
            "{:32} {:6} {:8} {:8} {:>7.1}mo{}",
            row.name,
            row.stock,
            row.annual_usage,
            row.usage_source.as_str(),
            row.coverage_months,
            marker
        );
    }
    Ok(())
}

pub fn plan(svc: &PlateService, json: bool) -> anyhow::Result<()> {
    let plan = svc.plan_purchases();
    if json {
        return print_json(&plan);
    }
    let alerts = plan.iter().filter(|s| s.needs_purchase).count();
    println!("{} equipment type(s) need a purchase.", alerts);
    println!();
    println!("{:32} {:6} {:9} {:6} {:13}", "EQUIPMENT", "STOCK", "COVERAGE", "BUY", "NUMBERS");
    for s in plan.iter().filter(|s| s.needs_purchase) {
        let numbers = match (s.next_start, s.next_end) {
            (Some(a), Some(b)) => format!("{} - {}", format_number(a), format_number(b)),
            _ => "-".to_string(),
        };
        println!(
            "{:32} {:6} {:>7.1}mo {:6} {:13}",
            s.name, s.current_stock, s.coverage_months, s.quantity_to_buy, numbers
        );
        if let Some(note) = &s.note {
            println!("  note: {}", note.message());
        }
    }
    Ok(())
}

pub fn dashboard(svc: &PlateService, json: bool) -> anyhow::Result<()> {
    let stats = svc.dashboard_stats(5);
    if json {
        return print_json(&stats);
    }
    println!("In stock:       {}", stats.in_stock);
    println!("Distributed:    {}", stats.distributed);
    println!("Returned:       {}", stats.returned);
    println!("Received today: {}", stats.received_today);
    println!("Moved today:    {}", stats.moved_today);
    println!("Purchase alerts: {}", svc.purchase_alert_count());
    if !stats.stock_by_type.is_empty() {
        println!();
        println!("Top stock:");
        for (name, count) in &stats.stock_by_type {
            println!("  {:32} {}", name, count);
        }
    }
    Ok(())
}

pub fn usage(svc: &PlateService, json: bool) -> anyhow::Result<()> {
    let config = svc.usage_config();
    if json {
        return print_json(config);
    }
    if config.is_empty() {
        println!("No pinned usage overrides.");
        return Ok(());
    }
    println!("{:28} USAGE/Y", "RULE");
    for (rule_id, annual) in config {
        println!("{:28} {}", rule_id, annual);
    }
    Ok(())
}
