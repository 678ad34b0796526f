use std::collections::BTreeMap;

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, instrument, warn};

use super::cell::Cell;
use super::support::Support;
use crate::Tolerance;
use crate::adjacency::{AdjacencyResolver, AdjacencyTable, Scope};
use crate::geometry::Bounds2d;

slotmap::new_key_type! {
    pub struct CellId;
}

/// Composite lookup key: rotation group, pivot, then position.
///
/// Every component is quantized so float noise cannot split one position
/// into two keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridKey {
    pub rotation: i64,
    pub pivot_x: i64,
    pub pivot_y: i64,
    pub x: i64,
    pub y: i64,
}

impl GridKey {
    pub fn of(cell: &Cell, tol: &Tolerance) -> Self {
        let pivot = cell.pivot();
        Self {
            rotation: tol.quantize(cell.rotation()),
            pivot_x: tol.quantize(pivot.x),
            pivot_y: tol.quantize(pivot.y),
            x: tol.quantize(cell.x()),
            y: tol.quantize(cell.y()),
        }
    }
}

/// Cells sharing the same footprint left edge, ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub x: f64,
    pub cells: Vec<CellId>,
}

/// Owns every cell of a board and the board-wide adjacency.
#[derive(Debug, Clone)]
pub struct LayoutGrid {
    cells: SlotMap<CellId, Cell>,
    supports: SecondaryMap<CellId, Support>,
    ordinals: SecondaryMap<CellId, usize>,
    index: BTreeMap<GridKey, CellId>,
    global: AdjacencyTable,
    next_ordinal: usize,
    tolerance: Tolerance,
}

impl Default for LayoutGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutGrid {
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default())
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            cells: SlotMap::with_key(),
            supports: SecondaryMap::new(),
            ordinals: SecondaryMap::new(),
            index: BTreeMap::new(),
            global: AdjacencyTable::new(Scope::Global),
            next_ordinal: 0,
            tolerance,
        }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Insert a cell under its own position key.
    ///
    /// A cell already stored at the same key is replaced. Correct layouts
    /// never do this, so it is logged as a warning. Any previously resolved
    /// global adjacency is discarded.
    pub fn add_cell(&mut self, cell: Cell) -> CellId {
        let key = GridKey::of(&cell, &self.tolerance);
        let id = self.cells.insert(cell);
        self.ordinals.insert(id, self.next_ordinal);
        self.next_ordinal += 1;

        if let Some(old) = self.index.insert(key, id) {
            if let Some(replaced) = self.cells.remove(old) {
                warn!(cell = %replaced, ?key, "grid position overwritten by a later cell");
            }
            self.supports.remove(old);
            self.ordinals.remove(old);
        }
        self.global = AdjacencyTable::new(Scope::Global);
        id
    }

    /// Insert a cell together with its support-bar companion.
    pub fn add_cell_with_support(&mut self, cell: Cell, support: Support) -> CellId {
        let id = self.add_cell(cell);
        self.supports.insert(id, support);
        id
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn support(&self, id: CellId) -> Option<&Support> {
        self.supports.get(id)
    }

    /// Creation order of a cell, used as the last tie-break everywhere.
    pub fn ordinal(&self, id: CellId) -> Option<usize> {
        self.ordinals.get(id).copied()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up a cell by position within a rotation group.
    pub fn cell_at(&self, x: f64, y: f64, rotation: f64, pivot: (f64, f64)) -> Option<CellId> {
        let tol = &self.tolerance;
        let (pivot_x, pivot_y) = if rotation == 0.0 { (0.0, 0.0) } else { pivot };
        let key = GridKey {
            rotation: tol.quantize(rotation),
            pivot_x: tol.quantize(pivot_x),
            pivot_y: tol.quantize(pivot_y),
            x: tol.quantize(x),
            y: tol.quantize(y),
        };
        self.index.get(&key).copied()
    }

    /// Cell ids in key order: rotation group, pivot, x, y.
    pub fn ids(&self) -> Vec<CellId> {
        self.index.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.index.values().filter_map(|&id| self.cells.get(id).map(|c| (id, c)))
    }

    /// Footprint columns in ascending x. Within a column cells are ordered by
    /// ascending top edge, then by creation order.
    pub fn columns(&self) -> Vec<Column> {
        let mut by_x: BTreeMap<i64, Vec<CellId>> = BTreeMap::new();
        for (id, cell) in self.iter() {
            let x = self.tolerance.quantize(cell.footprint().min_x);
            by_x.entry(x).or_default().push(id);
        }

        by_x.into_values()
            .filter_map(|mut ids| {
                ids.sort_by(|&a, &b| {
                    let (fa, fb) = (self.cells[a].footprint(), self.cells[b].footprint());
                    fa.max_y
                        .total_cmp(&fb.max_y)
                        .then_with(|| self.ordinals[a].cmp(&self.ordinals[b]))
                });
                let x = self.cells.get(*ids.first()?)?.footprint().min_x;
                Some(Column { x, cells: ids })
            })
            .collect()
    }

    /// Distinct column positions, ascending.
    pub fn cells_sorted_by_x(&self) -> Vec<f64> {
        self.columns().into_iter().map(|c| c.x).collect()
    }

    /// Cells of the column at `x`, ascending by top edge.
    pub fn cells_sorted_by_y_at(&self, x: f64) -> Vec<CellId> {
        let key = self.tolerance.quantize(x);
        self.columns()
            .into_iter()
            .find(|c| self.tolerance.quantize(c.x) == key)
            .map(|c| c.cells)
            .unwrap_or_default()
    }

    /// Enclosing extent of every cell footprint, or `None` for an empty grid.
    pub fn bounds(&self) -> Option<Bounds2d> {
        Self::bounds_of(self, self.cells.keys())
    }

    /// Enclosing extent of a subset of cells.
    pub fn bounds_of(&self, ids: impl IntoIterator<Item = CellId>) -> Option<Bounds2d> {
        ids.into_iter()
            .filter_map(|id| self.cells.get(id))
            .map(|c| c.footprint())
            .reduce(|a, b| a.union(&b))
    }

    /// Board-wide adjacency. Empty until [`resolve_global`](Self::resolve_global) runs.
    pub fn global(&self) -> &AdjacencyTable {
        &self.global
    }

    /// Resolve adjacency across the whole board.
    #[instrument(skip(self), fields(cells = self.cells.len()))]
    pub fn resolve_global(&mut self) -> &AdjacencyTable {
        let table = AdjacencyResolver::new(self, self.ids()).resolve(Scope::Global);
        debug!(resolved = table.len(), "global adjacency resolved");
        self.global = table;
        &self.global
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2d;

    fn unit(x: f64, y: f64) -> Cell {
        Cell::new(x, y, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut grid = LayoutGrid::new();
        let a = grid.add_cell(unit(0.0, 0.0));
        let b = grid.add_cell(unit(1.0, 0.0));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.cell_at(1.0, 0.0, 0.0, (0.0, 0.0)), Some(b));
        assert_eq!(grid.cell_at(0.1 + 0.2 - 0.3, 0.0, 0.0, (0.0, 0.0)), Some(a));
        assert_eq!(grid.cell_at(2.0, 0.0, 0.0, (0.0, 0.0)), None);
        assert_eq!(grid.ordinal(a), Some(0));
        assert_eq!(grid.ordinal(b), Some(1));
    }

    #[test]
    fn test_overwrite_keeps_later_cell() {
        let mut grid = LayoutGrid::new();
        let first = grid.add_cell(unit(0.0, 0.0).with_label("A"));
        let second = grid.add_cell(unit(0.0, 0.0).with_label("B"));
        assert_eq!(grid.len(), 1);
        assert!(!grid.contains(first));
        assert_eq!(grid.get(second).unwrap().label(), "B");
        assert_eq!(grid.cell_at(0.0, 0.0, 0.0, (0.0, 0.0)), Some(second));
    }

    #[test]
    fn test_rotation_groups_do_not_collide() {
        let mut grid = LayoutGrid::new();
        grid.add_cell(unit(0.0, 0.0));
        let rotated = grid.add_cell(unit(0.0, 0.0).rotated(15.0, Point2d::new(4.0, -1.0)).unwrap());
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.cell_at(0.0, 0.0, 15.0, (4.0, -1.0)), Some(rotated));
    }

    #[test]
    fn test_columns_are_ordered() {
        let mut grid = LayoutGrid::new();
        let c = grid.add_cell(unit(1.0, -1.0));
        let a = grid.add_cell(unit(0.0, 0.0));
        let b = grid.add_cell(unit(0.0, -1.0));
        let d = grid.add_cell(unit(1.0, 0.0));

        assert_eq!(grid.cells_sorted_by_x(), vec![0.0, 1.0]);
        assert_eq!(grid.cells_sorted_by_y_at(0.0), vec![b, a]);
        assert_eq!(grid.cells_sorted_by_y_at(1.0), vec![c, d]);
        assert!(grid.cells_sorted_by_y_at(7.0).is_empty());
    }

    #[test]
    fn test_bounds_across_grid() {
        let mut grid = LayoutGrid::new();
        assert!(grid.bounds().is_none());
        grid.add_cell(unit(0.0, 0.0));
        grid.add_cell(Cell::new(1.0, -1.0, 2.0, 1.0).unwrap());
        let bb = grid.bounds().unwrap();
        assert_eq!(bb, Bounds2d::new(0.0, 3.0, -2.0, 0.0));
    }

    #[test]
    fn test_bounds_include_rotated_footprint() {
        let mut grid = LayoutGrid::new();
        grid.add_cell(unit(0.0, 0.0));
        grid.add_cell(unit(0.0, 0.0).rotated(90.0, Point2d::new(3.0, -1.0)).unwrap());
        let bb = grid.bounds().unwrap();
        assert!((bb.max_x - 3.0).abs() < 1e-9);
        assert!((bb.min_y + 2.0).abs() < 1e-9);
    }
}
