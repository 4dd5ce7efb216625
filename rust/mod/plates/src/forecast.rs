//! Annual usage estimation and stock coverage.
//!
//! Usage comes from one of three sources, in order of preference:
//! distribution history spanning at least three years, a pinned override,
//! or the catalog's estimate.

use chrono::{DateTime, Utc};
use platetrack_core::parse_instant;
use serde::{Deserialize, Serialize};

use crate::model::{EquipmentRule, LogType, Plate, PlateStatus, TransactionLog, UsageConfig};

/// Minimum history span before logs are trusted over configuration.
pub const HISTORY_MIN_YEARS: f64 = 3.0;

pub const DAYS_PER_YEAR: f64 = 365.25;

/// Coverage reported when nothing is being consumed.
pub const COVERAGE_SENTINEL: f64 = 999.0;

const MILLIS_PER_YEAR: f64 = DAYS_PER_YEAR * 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageSource {
    History,
    Manual,
    Default,
}

impl UsageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::History => "HISTORY",
            Self::Manual => "MANUAL",
            Self::Default => "DEFAULT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveUsage {
    /// Plates per year.
    pub value: u32,
    pub source: UsageSource,
}

/// Effective annual usage for `rule` at `now`.
///
/// OUT logs whose timestamp cannot be parsed are ignored.
pub fn calculate_effective_usage(
    rule: &EquipmentRule,
    logs: &[TransactionLog],
    config: &UsageConfig,
    now: DateTime<Utc>,
) -> EffectiveUsage {
    let outs: Vec<(DateTime<Utc>, u32)> = logs
        .iter()
        .filter(|l| l.log_type == LogType::Out && l.equipment_name == rule.name)
        .filter_map(|l| parse_instant(&l.timestamp).map(|t| (t, l.count)))
        .collect();

    if let Some(earliest) = outs.iter().map(|(t, _)| *t).min() {
        let years = (now - earliest).num_milliseconds().abs() as f64 / MILLIS_PER_YEAR;
        if years >= HISTORY_MIN_YEARS {
            let total: u64 = outs.iter().map(|(_, c)| u64::from(*c)).sum();
            let average = (total as f64 / years).round();
            return EffectiveUsage {
                value: average.min(f64::from(u32::MAX)) as u32,
                source: UsageSource::History,
            };
        }
    }

    if let Some(&value) = config.get(&rule.id) {
        return EffectiveUsage {
            value,
            source: UsageSource::Manual,
        };
    }

    EffectiveUsage {
        value: rule.est_annual_usage,
        source: UsageSource::Default,
    }
}

pub fn monthly_usage(annual: u32) -> f64 {
    f64::from(annual) / 12.0
}

/// Months of stock at the given annual consumption.
pub fn coverage_months(stock: usize, annual: u32) -> f64 {
    let monthly = monthly_usage(annual);
    if monthly > 0.0 {
        stock as f64 / monthly
    } else {
        COVERAGE_SENTINEL
    }
}

/// IN_STOCK plates of the named equipment.
pub fn in_stock_count(plates: &[Plate], equipment_name: &str) -> usize {
    plates
        .iter()
        .filter(|p| p.status == PlateStatus::InStock && p.equipment_name == equipment_name)
        .count()
}
