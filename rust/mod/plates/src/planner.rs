//! Purchase planning: which equipment types are running low, how many
//! plates to order, and which numbers the order should carry.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{Catalog, find_equipment_by_number, next_available_number};
use crate::forecast::{self, UsageSource};
use crate::model::{Plate, TransactionLog, UsageConfig};

/// Below this many months of coverage a purchase is suggested.
pub const PURCHASE_THRESHOLD_MONTHS: f64 = 24.0;

/// Stock level a purchase tops up to, in months of usage.
pub const TARGET_COVERAGE_MONTHS: u64 = 36;

/// Advisory attached to a suggestion whose numbers need a human look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanNote {
    /// The suggested run ends outside the equipment's ranges.
    SpillsOutOfRange,
    /// No free number is left in any declared range.
    RangesExhausted,
}

impl PlanNote {
    pub fn message(&self) -> &'static str {
        match self {
            Self::SpillsOutOfRange => "suggested numbers run past the equipment range; split the order",
            Self::RangesExhausted => "numbering ranges exhausted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSuggestion {
    pub rule_id: String,
    pub name: String,
    pub current_stock: usize,
    pub annual_usage: u32,
    pub usage_source: UsageSource,
    pub monthly_usage: f64,
    pub coverage_months: f64,
    pub needs_purchase: bool,
    pub quantity_to_buy: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_end: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<PlanNote>,
}

/// Plates needed to reach the target coverage, rounded up.
pub fn target_stock(annual: u32) -> u64 {
    (u64::from(annual) * TARGET_COVERAGE_MONTHS).div_ceil(12)
}

/// One suggestion per catalog rule; those needing a purchase come first,
/// otherwise catalog order is kept.
pub fn plan_purchases(
    catalog: &Catalog,
    plates: &[Plate],
    logs: &[TransactionLog],
    config: &UsageConfig,
    now: DateTime<Utc>,
) -> Vec<PurchaseSuggestion> {
    let mut out: Vec<PurchaseSuggestion> = catalog
        .rules()
        .iter()
        .map(|rule| {
            let stock = forecast::in_stock_count(plates, &rule.name);
            let usage = forecast::calculate_effective_usage(rule, logs, config, now);
            let coverage = forecast::coverage_months(stock, usage.value);
            let needs_purchase = coverage < PURCHASE_THRESHOLD_MONTHS;

            let quantity = target_stock(usage.value).saturating_sub(stock as u64);
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

            let mut suggestion = PurchaseSuggestion {
                rule_id: rule.id.clone(),
                name: rule.name.clone(),
                current_stock: stock,
                annual_usage: usage.value,
                usage_source: usage.source,
                monthly_usage: forecast::monthly_usage(usage.value),
                coverage_months: coverage,
                needs_purchase,
                quantity_to_buy: quantity,
                next_start: None,
                next_end: None,
                note: None,
            };

            if needs_purchase && quantity > 0 {
                match next_available_number(catalog, &rule.name, plates) {
                    Some(start) => {
                        let end = start.checked_add(quantity - 1);
                        let fits = end
                            .and_then(|e| find_equipment_by_number(catalog, e))
                            .is_some_and(|r| r.id == rule.id);
                        suggestion.next_start = Some(start);
                        suggestion.next_end = end;
                        if !fits {
                            suggestion.note = Some(PlanNote::SpillsOutOfRange);
                        }
                    }
                    None => suggestion.note = Some(PlanNote::RangesExhausted),
                }
            }
            suggestion
        })
        .collect();

    // Stable: catalog order is kept within each group.
    out.sort_by_key(|s| !s.needs_purchase);
    out
}

/// Number of equipment types below the purchase threshold.
pub fn purchase_alert_count(
    catalog: &Catalog,
    plates: &[Plate],
    logs: &[TransactionLog],
    config: &UsageConfig,
    now: DateTime<Utc>,
) -> usize {
    catalog
        .rules()
        .iter()
        .filter(|rule| {
            let stock = forecast::in_stock_count(plates, &rule.name);
            let usage = forecast::calculate_effective_usage(rule, logs, config, now);
            forecast::coverage_months(stock, usage.value) < PURCHASE_THRESHOLD_MONTHS
        })
        .count()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::{EquipmentRule, NumberRange};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn stock(name: &str, numbers: impl IntoIterator<Item = u32>) -> Vec<Plate> {
        numbers
            .into_iter()
            .map(|n| Plate::in_stock(n, name, "2024-01-01T00:00:00.000Z"))
            .collect()
    }

    fn single_rule(ranges: &[(u32, u32)], usage: u32) -> Catalog {
        Catalog::new(vec![EquipmentRule {
            id: "widget".into(),
            name: "Widget".into(),
            ranges: ranges.iter().map(|&(s, e)| NumberRange::new(s, e)).collect(),
            est_annual_usage: usage,
        }])
        .unwrap()
    }

    #[test]
    fn target_is_exact_ceiling() {
        assert_eq!(target_stock(120), 360);
        assert_eq!(target_stock(30), 90);
        assert_eq!(target_stock(1), 3);
        assert_eq!(target_stock(0), 0);
    }

    #[test]
    fn fifty_in_stock_at_120_a_year() {
        let catalog = single_rule(&[(1000, 1999)], 120);
        let plates = stock("Widget", 1000..1050);

        let plan = plan_purchases(&catalog, &plates, &[], &UsageConfig::new(), now());
        let s = &plan[0];
        assert_eq!(s.current_stock, 50);
        assert_eq!(s.coverage_months, 5.0);
        assert!(s.needs_purchase);
        assert_eq!(s.quantity_to_buy, 310);
        assert_eq!(s.next_start, Some(1050));
        assert_eq!(s.next_end, Some(1359));
        assert_eq!(s.note, None);
    }

    #[test]
    fn spill_past_range_is_flagged() {
        let catalog = single_rule(&[(1000, 1099)], 120);
        let plan = plan_purchases(&catalog, &[], &[], &UsageConfig::new(), now());
        let s = &plan[0];
        assert_eq!(s.quantity_to_buy, 360);
        assert_eq!(s.next_start, Some(1000));
        assert_eq!(s.next_end, Some(1359));
        assert_eq!(s.note, Some(PlanNote::SpillsOutOfRange));
    }

    #[test]
    fn exhausted_ranges_omit_numbers() {
        let catalog = single_rule(&[(1000, 1009)], 120);
        let mut plates = stock("Widget", [1009]);
        plates[0].status = crate::model::PlateStatus::Distributed;

        let plan = plan_purchases(&catalog, &plates, &[], &UsageConfig::new(), now());
        let s = &plan[0];
        assert!(s.needs_purchase);
        assert_eq!(s.note, Some(PlanNote::RangesExhausted));
        assert_eq!((s.next_start, s.next_end), (None, None));
    }

    #[test]
    fn zero_usage_never_needs_purchase() {
        let catalog = single_rule(&[(1000, 1999)], 120);
        let config = UsageConfig::from([("widget".to_string(), 0)]);
        let plan = plan_purchases(&catalog, &[], &[], &config, now());
        assert_eq!(plan[0].coverage_months, forecast::COVERAGE_SENTINEL);
        assert!(!plan[0].needs_purchase);
        assert_eq!(plan[0].quantity_to_buy, 0);
    }

    #[test]
    fn purchase_needed_first_then_catalog_order() {
        let catalog = Catalog::default();
        // Plenty of stock for the first two rules only.
        let mut plates = stock("Chave Tripolar Sem Corte Visível", 1..=99);
        plates.extend(stock("Seccionalizador", 100..=199));

        let plan = plan_purchases(&catalog, &plates, &[], &UsageConfig::new(), now());
        assert_eq!(plan.len(), catalog.len());

        let split = plan.iter().position(|s| !s.needs_purchase).unwrap();
        assert!(plan[..split].iter().all(|s| s.needs_purchase));
        assert!(plan[split..].iter().all(|s| !s.needs_purchase));

        assert_eq!(plan[0].rule_id, "chave-fusivel-capacitor");
        let tail: Vec<&str> = plan[split..].iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(tail, vec!["chave-tripolar-sem-corte", "seccionalizador"]);

        assert_eq!(
            purchase_alert_count(&catalog, &plates, &[], &UsageConfig::new(), now()),
            catalog.len() - 2
        );
    }
}
