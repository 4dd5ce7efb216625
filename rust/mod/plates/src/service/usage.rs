use tracing::info;

use platetrack_core::ServiceError;

use super::{PlateService, keys, storage, to_json};
use crate::model::UsageConfig;
use crate::planner::{self, PurchaseSuggestion};
use crate::report::{self, DashboardStats, ForecastRow};

impl PlateService {
    /// Pin the annual usage of a rule. Zero is allowed.
    pub fn set_usage_override(&mut self, rule_id: &str, annual: u32) -> Result<(), ServiceError> {
        if self.catalog.by_id(rule_id).is_none() {
            return Err(ServiceError::NotFound(format!("equipment rule '{rule_id}' not found")));
        }
        let mut next = self.usage.clone();
        next.insert(rule_id.to_string(), annual);
        self.save_usage(next)?;
        info!("Usage override set: {} = {}/year", rule_id, annual);
        Ok(())
    }

    /// Drop a pinned usage; the rule falls back to history or its default.
    pub fn clear_usage_override(&mut self, rule_id: &str) -> Result<(), ServiceError> {
        let mut next = self.usage.clone();
        if next.remove(rule_id).is_none() {
            return Err(ServiceError::NotFound(format!("no usage override for '{rule_id}'")));
        }
        self.save_usage(next)?;
        info!("Usage override cleared: {}", rule_id);
        Ok(())
    }

    pub(crate) fn save_usage(&mut self, usage: UsageConfig) -> Result<(), ServiceError> {
        self.kv.set(keys::USAGE, &to_json(&usage)?).map_err(storage)?;
        self.usage = usage;
        Ok(())
    }

    pub fn forecast_report(&self) -> Vec<ForecastRow> {
        report::forecast_report(
            &self.catalog,
            &self.state.plates,
            &self.state.logs,
            &self.usage,
            self.clock.now(),
        )
    }

    pub fn plan_purchases(&self) -> Vec<PurchaseSuggestion> {
        planner::plan_purchases(
            &self.catalog,
            &self.state.plates,
            &self.state.logs,
            &self.usage,
            self.clock.now(),
        )
    }

    pub fn purchase_alert_count(&self) -> usize {
        planner::purchase_alert_count(
            &self.catalog,
            &self.state.plates,
            &self.state.logs,
            &self.usage,
            self.clock.now(),
        )
    }

    pub fn dashboard_stats(&self, top: usize) -> DashboardStats {
        report::dashboard_stats(&self.state.plates, self.clock.now(), top)
    }
}
