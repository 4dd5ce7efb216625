use super::Catalog;
use crate::model::Plate;

/// Suggest the next plate number to purchase for `equipment_name`.
///
/// High-water-mark allocation: the highest number already issued for the
/// equipment is found and the next number after it is returned, rolling
/// over to the start of the next declared range when the current one is
/// full. Numbers freed below the high-water mark are never reclaimed.
///
/// Returns `None` for an unknown equipment name or when every declared
/// range is exhausted.
pub fn next_available_number(catalog: &Catalog, equipment_name: &str, plates: &[Plate]) -> Option<u32> {
    let rule = catalog.by_name(equipment_name)?;

    let Some(max_used) = plates
        .iter()
        .filter(|p| p.equipment_name == equipment_name)
        .map(|p| p.number)
        .max()
    else {
        return rule.ranges.first().map(|r| r.start);
    };

    if let Some(i) = rule.ranges.iter().position(|r| r.contains(max_used)) {
        let range = rule.ranges[i];
        if max_used < range.end {
            return Some(max_used + 1);
        }
        return rule.ranges.get(i + 1).map(|r| r.start);
    }

    // Legacy data outside the declared ranges: jump to the first range
    // above it.
    rule.ranges.iter().find(|r| r.start > max_used).map(|r| r.start)
}
