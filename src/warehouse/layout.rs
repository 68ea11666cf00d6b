//! Warehouse floor: a square grid of optional labeled locations

use crate::core::config::{GridConfig, LocationSpec};
use crate::core::types::{GridPos, LocationKind};
use crate::spatial::Grid;
use ahash::AHashMap;
use serde::Serialize;

/// A shelf, zone or charging station occupying one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub kind: LocationKind,
    pub label: String,
    pub items: u32,
}

impl Location {
    pub fn new(kind: LocationKind, label: impl Into<String>, items: u32) -> Self {
        Self {
            kind,
            label: label.into(),
            items,
        }
    }
}

/// The warehouse grid
#[derive(Debug, Clone)]
pub struct Warehouse {
    cells: Grid<Option<Location>>,
}

impl Warehouse {
    /// Empty square warehouse
    pub fn new(size: usize) -> Self {
        Self {
            cells: Grid::square(size),
        }
    }

    /// Build a warehouse from a layout; out-of-bounds specs are ignored
    pub fn from_specs(size: usize, specs: &[LocationSpec]) -> Self {
        let mut warehouse = Self::new(size);
        for spec in specs {
            warehouse.place(
                GridPos::new(spec.row, spec.col),
                Location::new(spec.kind, spec.label.clone(), spec.items),
            );
        }
        warehouse
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::from_specs(config.size, &config.locations)
    }

    pub fn size(&self) -> usize {
        self.cells.rows
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(pos)
    }

    /// Put a location on a cell, replacing whatever was there
    pub fn place(&mut self, pos: GridPos, location: Location) {
        self.cells.set(pos, Some(location));
    }

    pub fn location(&self, pos: GridPos) -> Option<&Location> {
        self.cells.get(pos).and_then(|cell| cell.as_ref())
    }

    pub fn location_mut(&mut self, pos: GridPos) -> Option<&mut Location> {
        self.cells.get_mut(pos).and_then(|cell| cell.as_mut())
    }

    /// Item count at a cell (0 for empty cells)
    pub fn items_at(&self, pos: GridPos) -> u32 {
        self.location(pos).map(|loc| loc.items).unwrap_or(0)
    }

    /// All placed locations in row-major order
    pub fn locations(&self) -> impl Iterator<Item = (GridPos, &Location)> + '_ {
        self.cells
            .iter()
            .filter_map(|(pos, cell)| cell.as_ref().map(|loc| (pos, loc)))
    }

    /// Find a location by exact label, scanning row-major; first match wins
    pub fn find_by_label(&self, label: &str) -> Option<GridPos> {
        self.locations()
            .find(|(_, loc)| loc.label == label)
            .map(|(pos, _)| pos)
    }

    /// Label -> position map, first occurrence in row-major order wins
    pub fn label_index(&self) -> AHashMap<String, GridPos> {
        let mut index = AHashMap::new();
        for (pos, loc) in self.locations() {
            index.entry(loc.label.clone()).or_insert(pos);
        }
        index
    }

    /// Labels that appear on more than one cell
    pub fn duplicate_labels(&self) -> Vec<String> {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for (_, loc) in self.locations() {
            *counts.entry(loc.label.as_str()).or_insert(0) += 1;
        }
        let mut dupes: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(label, _)| label.to_string())
            .collect();
        dupes.sort();
        dupes
    }

    /// Remove `quantity` items from a cell if it holds at least that many
    ///
    /// Returns false (and changes nothing) when the cell is empty or short.
    pub fn take_items(&mut self, pos: GridPos, quantity: u32) -> bool {
        match self.location_mut(pos) {
            Some(loc) if loc.items >= quantity => {
                loc.items -= quantity;
                true
            }
            _ => false,
        }
    }

    /// Add items to a cell; returns false if no location is there
    pub fn add_items(&mut self, pos: GridPos, quantity: u32) -> bool {
        match self.location_mut(pos) {
            Some(loc) => {
                loc.items = loc.items.saturating_add(quantity);
                true
            }
            None => false,
        }
    }

    /// Total items stored across all locations
    pub fn total_items(&self) -> u64 {
        self.locations().map(|(_, loc)| loc.items as u64).sum()
    }
}

impl Default for Warehouse {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let warehouse = Warehouse::default();
        assert_eq!(warehouse.size(), 10);
        assert_eq!(warehouse.locations().count(), 6);
        assert_eq!(warehouse.find_by_label("Shelf A3"), Some(GridPos::new(1, 2)));
        assert_eq!(warehouse.find_by_label("Zone B"), Some(GridPos::new(6, 8)));
        assert_eq!(
            warehouse.find_by_label("Charging Station"),
            Some(GridPos::new(8, 1))
        );
        assert_eq!(warehouse.total_items(), 10);
    }

    #[test]
    fn test_find_is_exact_match() {
        let warehouse = Warehouse::default();
        assert_eq!(warehouse.find_by_label("shelf a3"), None);
        assert_eq!(warehouse.find_by_label("Shelf A"), None);
        assert_eq!(warehouse.find_by_label(""), None);
    }

    #[test]
    fn test_duplicate_label_first_match_wins() {
        let mut warehouse = Warehouse::new(5);
        warehouse.place(GridPos::new(3, 0), Location::new(LocationKind::Zone, "Dock", 0));
        warehouse.place(GridPos::new(1, 4), Location::new(LocationKind::Zone, "Dock", 0));

        assert_eq!(warehouse.find_by_label("Dock"), Some(GridPos::new(1, 4)));
        assert_eq!(warehouse.label_index()["Dock"], GridPos::new(1, 4));
        assert_eq!(warehouse.duplicate_labels(), vec!["Dock".to_string()]);
    }

    #[test]
    fn test_take_items_requires_enough_stock() {
        let mut warehouse = Warehouse::default();
        let shelf = GridPos::new(1, 2);

        assert!(!warehouse.take_items(shelf, 4));
        assert_eq!(warehouse.items_at(shelf), 3);

        assert!(warehouse.take_items(shelf, 3));
        assert_eq!(warehouse.items_at(shelf), 0);
    }

    #[test]
    fn test_items_on_empty_cell() {
        let mut warehouse = Warehouse::default();
        let empty = GridPos::new(9, 9);
        assert_eq!(warehouse.items_at(empty), 0);
        assert!(!warehouse.add_items(empty, 2));
        assert!(!warehouse.take_items(empty, 0));
    }

    #[test]
    fn test_out_of_bounds_location_ignored() {
        let specs = vec![
            LocationSpec::new(0, 0, LocationKind::Zone, "In", 1),
            LocationSpec::new(7, 7, LocationKind::Zone, "Out", 1),
        ];
        let warehouse = Warehouse::from_specs(3, &specs);
        assert_eq!(warehouse.locations().count(), 1);
        assert_eq!(warehouse.find_by_label("Out"), None);
    }
}
