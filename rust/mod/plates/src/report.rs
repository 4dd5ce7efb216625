use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use platetrack_core::parse_instant;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::forecast::{self, UsageSource};
use crate::model::{Plate, PlateStatus, TransactionLog, UsageConfig};

/// Coverage under which a rule is flagged low in the forecast report.
pub const LOW_COVERAGE_MONTHS: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRow {
    pub rule_id: String,
    pub name: String,
    pub stock: usize,
    pub annual_usage: u32,
    pub usage_source: UsageSource,
    pub coverage_months: f64,
    pub is_low: bool,
}

/// Stock forecast per rule, least coverage first.
pub fn forecast_report(
    catalog: &Catalog,
    plates: &[Plate],
    logs: &[TransactionLog],
    config: &UsageConfig,
    now: DateTime<Utc>,
) -> Vec<ForecastRow> {
    let mut rows: Vec<ForecastRow> = catalog
        .rules()
        .iter()
        .map(|rule| {
            let stock = forecast::in_stock_count(plates, &rule.name);
            let usage = forecast::calculate_effective_usage(rule, logs, config, now);
            let coverage = forecast::coverage_months(stock, usage.value);
            ForecastRow {
                rule_id: rule.id.clone(),
                name: rule.name.clone(),
                stock,
                annual_usage: usage.value,
                usage_source: usage.source,
                coverage_months: coverage,
                is_low: coverage < LOW_COVERAGE_MONTHS,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.coverage_months.total_cmp(&b.coverage_months));
    rows
}

/// Plates currently out in the field, most recently distributed first.
/// Plates without a readable `date_out` go last.
pub fn allocation_report(plates: &[Plate]) -> Vec<&Plate> {
    let mut out: Vec<&Plate> = plates
        .iter()
        .filter(|p| p.status == PlateStatus::Distributed)
        .collect();
    out.sort_by_key(|p| Reverse(p.date_out.as_option().and_then(|d| parse_instant(d))));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub in_stock: usize,
    pub distributed: usize,
    pub returned: usize,
    pub received_today: usize,
    pub moved_today: usize,

    /// Equipment name and in-stock count, largest first.
    pub stock_by_type: Vec<(String, usize)>,
}

/// Headline numbers for the current UTC day.
pub fn dashboard_stats(plates: &[Plate], now: DateTime<Utc>, top: usize) -> DashboardStats {
    let today = now.date_naive();
    let on_today = |raw: &str| day_of(raw) == Some(today);

    let mut by_type: HashMap<&str, usize> = HashMap::new();
    for p in plates.iter().filter(|p| p.status == PlateStatus::InStock) {
        *by_type.entry(p.equipment_name.as_str()).or_default() += 1;
    }
    let mut stock_by_type: Vec<(String, usize)> =
        by_type.into_iter().map(|(name, n)| (name.to_string(), n)).collect();
    stock_by_type.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    stock_by_type.truncate(top);

    DashboardStats {
        in_stock: plates.iter().filter(|p| p.status == PlateStatus::InStock).count(),
        distributed: plates.iter().filter(|p| p.status == PlateStatus::Distributed).count(),
        returned: plates.iter().filter(|p| p.status == PlateStatus::Returned).count(),
        received_today: plates.iter().filter(|p| on_today(&p.date_in)).count(),
        moved_today: plates
            .iter()
            .filter(|p| p.date_out.as_option().is_some_and(|d| on_today(d)))
            .count(),
        stock_by_type,
    }
}

fn day_of(raw: &str) -> Option<NaiveDate> {
    parse_instant(raw).map(|t| t.date_naive())
}
