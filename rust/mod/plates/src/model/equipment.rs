use serde::{Deserialize, Serialize};

/// Inclusive numbering range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRange {
    pub start: u32,
    pub end: u32,
}

impl NumberRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, number: u32) -> bool {
        self.start <= number && number <= self.end
    }

    /// Number of plate numbers the range holds.
    pub fn capacity(&self) -> u64 {
        u64::from(self.end).saturating_sub(u64::from(self.start)) + 1
    }
}

/// EquipmentRule: an equipment type with its reserved numbering ranges.
/// PK = id; `name` is what plates and logs refer to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRule {
    pub id: String,
    pub name: String,

    /// Disjoint, in ascending order.
    pub ranges: Vec<NumberRange>,

    /// Fallback annual consumption when no history or override exists.
    pub est_annual_usage: u32,
}

impl EquipmentRule {
    pub fn contains(&self, number: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(number))
    }

    pub fn capacity(&self) -> u64 {
        self.ranges.iter().map(NumberRange::capacity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        let r = NumberRange::new(200, 299);
        assert!(r.contains(200));
        assert!(r.contains(299));
        assert!(!r.contains(300));
        assert_eq!(r.capacity(), 100);
    }

    #[test]
    fn rule_yaml_shape() {
        let yaml = "id: seccionalizador\nname: Seccionalizador\nranges:\n  - start: 100\n    end: 199\nestAnnualUsage: 30\n";
        let rule: EquipmentRule = serde_yml::from_str(yaml).unwrap();
        assert_eq!(rule.ranges, vec![NumberRange::new(100, 199)]);
        assert_eq!(rule.est_annual_usage, 30);
        assert!(rule.contains(150));
        assert_eq!(rule.capacity(), 100);
    }
}
