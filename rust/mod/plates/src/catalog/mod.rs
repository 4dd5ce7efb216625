//! Equipment catalog: the fixed list of equipment types and the numbering
//! ranges reserved for each.
//!
//! Numbers are classified by scanning rules in catalog order, so the first
//! rule whose range contains a number wins. Overlapping ranges across rules
//! are not rejected but make classification order-dependent; the built-in
//! catalog has none.

pub mod allocator;
pub mod classifier;
mod defaults;

use std::collections::HashSet;

use crate::model::EquipmentRule;

pub use allocator::next_available_number;
pub use classifier::{find_equipment_by_number, is_valid_range};

/// Catalog validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no equipment rules")]
    Empty,

    #[error("duplicate equipment id '{0}'")]
    DuplicateId(String),

    #[error("duplicate equipment name '{0}'")]
    DuplicateName(String),

    #[error("equipment '{id}' has an empty name")]
    EmptyName { id: String },

    #[error("equipment '{id}' has no numbering ranges")]
    NoRanges { id: String },

    #[error("equipment '{id}' range {start}-{end} is inverted")]
    InvertedRange { id: String, start: u32, end: u32 },

    #[error("equipment '{id}' range starting at {start} overlaps or precedes the range ending at {previous_end}")]
    UnorderedRanges { id: String, previous_end: u32, start: u32 },

    #[error("equipment '{id}' must have a positive estimated annual usage")]
    ZeroUsage { id: String },

    #[error("catalog parse error: {0}")]
    Parse(String),
}

/// An ordered, validated list of equipment rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    rules: Vec<EquipmentRule>,
}

impl Catalog {
    /// Build a catalog, rejecting malformed rules.
    pub fn new(rules: Vec<EquipmentRule>) -> Result<Self, CatalogError> {
        let catalog = Self { rules };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a YAML (or JSON) list of rules.
    pub fn from_yaml(data: &[u8]) -> Result<Self, CatalogError> {
        let rules: Vec<EquipmentRule> =
            serde_yml::from_slice(data).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(rules)
    }

    pub fn rules(&self) -> &[EquipmentRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&EquipmentRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn by_id(&self, id: &str) -> Option<&EquipmentRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.rules.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for rule in &self.rules {
            if !ids.insert(rule.id.as_str()) {
                return Err(CatalogError::DuplicateId(rule.id.clone()));
            }
            if rule.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { id: rule.id.clone() });
            }
            if !names.insert(rule.name.as_str()) {
                return Err(CatalogError::DuplicateName(rule.name.clone()));
            }
            if rule.est_annual_usage == 0 {
                return Err(CatalogError::ZeroUsage { id: rule.id.clone() });
            }
            validate_ranges(rule)?;
        }
        Ok(())
    }
}

impl Default for Catalog {
    /// The built-in catalog of 21 equipment types.
    fn default() -> Self {
        Self {
            rules: defaults::default_rules(),
        }
    }
}

fn validate_ranges(rule: &EquipmentRule) -> Result<(), CatalogError> {
    if rule.ranges.is_empty() {
        return Err(CatalogError::NoRanges { id: rule.id.clone() });
    }

    let mut previous_end: Option<u32> = None;
    for range in &rule.ranges {
        if range.start > range.end {
            return Err(CatalogError::InvertedRange {
                id: rule.id.clone(),
                start: range.start,
                end: range.end,
            });
        }
        if let Some(prev) = previous_end {
            if range.start <= prev {
                return Err(CatalogError::UnorderedRanges {
                    id: rule.id.clone(),
                    previous_end: prev,
                    start: range.start,
                });
            }
        }
        previous_end = Some(range.end);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumberRange;

    fn rule(id: &str, ranges: &[(u32, u32)]) -> EquipmentRule {
        EquipmentRule {
            id: id.into(),
            name: id.to_uppercase(),
            ranges: ranges.iter().map(|&(s, e)| NumberRange::new(s, e)).collect(),
            est_annual_usage: 10,
        }
    }

    #[test]
    fn default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 21);
        catalog.validate().unwrap();

        let trafo = catalog.by_id("chave-fusivel-trafo").unwrap();
        assert_eq!(trafo.name, "Chave Fusível de Trafo");
        assert_eq!(trafo.ranges, vec![NumberRange::new(5000, 69999)]);
        assert_eq!(trafo.est_annual_usage, 2000);

        assert!(catalog.by_name("Reserva Técnica").is_some());
        assert!(catalog.by_name("reserva técnica").is_none());
    }

    #[test]
    fn default_catalog_has_no_cross_rule_overlap() {
        let catalog = Catalog::default();
        let mut all: Vec<NumberRange> =
            catalog.rules().iter().flat_map(|r| r.ranges.iter().copied()).collect();
        all.sort_by_key(|r| r.start);
        for pair in all.windows(2) {
            assert!(pair[0].end < pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let err = Catalog::new(vec![rule("a", &[(10, 5)])]).unwrap_err();
        assert!(matches!(err, CatalogError::InvertedRange { start: 10, end: 5, .. }));
    }

    #[test]
    fn validate_rejects_unordered_or_overlapping_ranges() {
        let err = Catalog::new(vec![rule("a", &[(10, 20), (15, 30)])]).unwrap_err();
        assert!(matches!(err, CatalogError::UnorderedRanges { .. }));

        let err = Catalog::new(vec![rule("a", &[(50, 60), (10, 20)])]).unwrap_err();
        assert!(matches!(err, CatalogError::UnorderedRanges { .. }));
    }

    #[test]
    fn validate_rejects_duplicates_and_zero_usage() {
        let err = Catalog::new(vec![rule("a", &[(1, 2)]), rule("a", &[(3, 4)])]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("a".into()));

        let mut zero = rule("z", &[(1, 2)]);
        zero.est_annual_usage = 0;
        assert!(matches!(
            Catalog::new(vec![zero]).unwrap_err(),
            CatalogError::ZeroUsage { .. }
        ));

        assert_eq!(Catalog::new(vec![]).unwrap_err(), CatalogError::Empty);
        assert!(matches!(
            Catalog::new(vec![rule("n", &[])]).unwrap_err(),
            CatalogError::NoRanges { .. }
        ));
    }

    #[test]
    fn from_yaml_parses_and_validates() {
        let yaml = br#"
- id: alpha
  name: Alpha
  ranges:
    - { start: 1, end: 9 }
  estAnnualUsage: 12
- id: beta
  name: Beta
  ranges:
    - { start: 10, end: 19 }
    - { start: 50, end: 59 }
  estAnnualUsage: 6
"#;
        let catalog = Catalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.by_id("beta").unwrap().ranges.len(), 2);

        assert!(matches!(
            Catalog::from_yaml(b"not: [a list").unwrap_err(),
            CatalogError::Parse(_)
        ));
    }
}
