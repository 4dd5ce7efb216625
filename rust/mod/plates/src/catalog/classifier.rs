use super::Catalog;
use crate::model::EquipmentRule;

/// Find the equipment rule whose numbering ranges contain `number`.
///
/// Rules are scanned in catalog order and ranges in declared order; the
/// first match wins.
pub fn find_equipment_by_number(catalog: &Catalog, number: u32) -> Option<&EquipmentRule> {
    catalog.rules().iter().find(|rule| rule.contains(number))
}

/// True when `start..=end` is ordered and both endpoints classify to the
/// same rule.
///
/// Only the endpoints are checked: a span may cross another rule's range in
/// between when the outer rule has several disjoint ranges.
pub fn is_valid_range(catalog: &Catalog, start: u32, end: u32) -> bool {
    if start > end {
        return false;
    }
    match (
        find_equipment_by_number(catalog, start),
        find_equipment_by_number(catalog, end),
    ) {
        (Some(a), Some(b)) => a.id == b.id,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_range() {
        let catalog = Catalog::default();
        let id = |n| find_equipment_by_number(&catalog, n).map(|r| r.id.as_str());

        assert_eq!(id(1), Some("chave-tripolar-sem-corte"));
        assert_eq!(id(150), Some("seccionalizador"));
        assert_eq!(id(85_100), Some("chave-fusivel-capacitor"));
        assert_eq!(id(98_998), Some("religador-particular"));
        assert_eq!(id(98_999), Some("chave-tripolar"));
        assert_eq!(id(0), None);
        assert_eq!(id(100_000), None);
    }

    #[test]
    fn every_covered_number_has_exactly_one_owner() {
        let catalog = Catalog::default();
        for n in (0..=100_000u32).step_by(7) {
            let owners = catalog.rules().iter().filter(|r| r.contains(n)).count();
            let classified = find_equipment_by_number(&catalog, n);
            assert!(owners <= 1, "{n} owned by {owners} rules");
            assert_eq!(owners == 1, classified.is_some());
        }
    }

    #[test]
    fn range_validity() {
        let catalog = Catalog::default();
        assert!(is_valid_range(&catalog, 100, 104));
        assert!(is_valid_range(&catalog, 150, 150));
        // Same rule, different declared ranges.
        assert!(is_valid_range(&catalog, 250, 85_100));

        assert!(!is_valid_range(&catalog, 104, 100));
        assert!(!is_valid_range(&catalog, 190, 210));
        assert!(!is_valid_range(&catalog, 0, 10));
        assert!(!is_valid_range(&catalog, 99_999, 100_001));
    }
}
