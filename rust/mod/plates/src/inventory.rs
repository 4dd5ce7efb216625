use crate::model::{Destination, Plate, PlateStatus};

/// Render a plate number zero-padded to five digits.
pub fn format_number(number: u32) -> String {
    format!("{number:05}")
}

/// Search and filter over the plate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryQuery {
    /// Case-insensitive substring of the number, equipment name or
    /// destination. Empty matches everything.
    pub term: String,
    pub status: Option<PlateStatus>,
    pub destination: Option<Destination>,
}

impl InventoryQuery {
    pub fn matches(&self, plate: &Plate) -> bool {
        self.matches_term(plate)
            && self.status.is_none_or(|s| plate.status == s)
            && self
                .destination
                .as_ref()
                .is_none_or(|d| plate.destination.as_option() == Some(d))
    }

    fn matches_term(&self, plate: &Plate) -> bool {
        let term = self.term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        plate.number.to_string().contains(&term)
            || format_number(plate.number).contains(&term)
            || plate.equipment_name.to_lowercase().contains(&term)
            || plate
                .destination
                .as_option()
                .is_some_and(|d| d.as_str().to_lowercase().contains(&term))
    }

    /// Matching plates, highest number first.
    pub fn run<'a>(&self, plates: &'a [Plate]) -> Vec<&'a Plate> {
        let mut found: Vec<&Plate> = plates.iter().filter(|p| self.matches(p)).collect();
        found.sort_by(|a, b| b.number.cmp(&a.number));
        found
    }
}
