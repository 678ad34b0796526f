//! Splitting a board into printable sections along x.

use tracing::{debug, info, instrument, warn};

use crate::adjacency::{AdjacencyResolver, AdjacencyTable, Scope};
use crate::config::Parameters;
use crate::geometry::Bounds2d;
use crate::layout::{CellId, LayoutGrid};
use crate::to_physical;

/// A contiguous group of cells printed as one tile, with its own local adjacency.
#[derive(Debug, Clone)]
pub struct Section {
    index: usize,
    members: Vec<CellId>,
    local: AdjacencyTable,
}

impl Section {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Member cells in the order they were assigned.
    pub fn members(&self) -> &[CellId] {
        &self.members
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adjacency among this section's members only.
    pub fn local(&self) -> &AdjacencyTable {
        &self.local
    }

    pub fn bounds(&self, grid: &LayoutGrid) -> Option<Bounds2d> {
        grid.bounds_of(self.members.iter().copied())
    }

    /// Physical x-extent of the member footprints (millimetres).
    pub fn physical_width(&self, grid: &LayoutGrid) -> f64 {
        self.bounds(grid).map_or(0.0, |b| to_physical(b.width()))
    }
}

/// The ordered list of sections of a board.
#[derive(Debug, Clone)]
pub struct Partition {
    sections: Vec<Section>,
}

impl Partition {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn section_of(&self, id: CellId) -> Option<usize> {
        self.sections.iter().position(|s| s.contains(id))
    }
}

/// Assign every cell to a section so no section is wider than the envelope.
///
/// Columns are walked left to right. A cell joins the current section while
/// its right edge (plus the left margin) stays within `x_build_size` of the
/// section start; otherwise it goes to the next section, which is opened on
/// demand. The first section starts at the board's leftmost footprint. Once
/// a column has spilled into a new section, that section becomes current and
/// its start moves to its own leftmost cell. A cell
/// wider than the envelope is never split: it stays in an empty current
/// section or gets a section of its own.
///
/// Local adjacency is resolved for each section afterwards.
#[instrument(skip_all, fields(cells = grid.len(), x_build_size = params.x_build_size))]
pub fn partition(grid: &LayoutGrid, params: &Parameters) -> Partition {
    let mut groups: Vec<Vec<CellId>> = vec![Vec::new()];
    let mut current = 0usize;
    let mut next = 0usize;
    // The first section starts at the leftmost footprint, which may be left of x=0.
    let mut current_x_start = grid.bounds().map_or(0.0, |b| to_physical(b.min_x));

    for column in grid.columns() {
        for &id in &column.cells {
            let Some(cell) = grid.get(id) else { continue };
            let x_max = to_physical(cell.footprint().max_x) + params.left_margin;
            let fits = x_max - current_x_start < params.x_build_size;

            if fits || groups[current].is_empty() {
                if !fits {
                    warn!(cell = %cell, width = x_max - current_x_start, "cell wider than the build envelope");
                }
                groups[current].push(id);
            } else if next > current {
                groups[next].push(id);
            } else {
                next = current + 1;
                groups.push(vec![id]);
                debug!(section = next, column = column.x, "opened section");
            }
        }

        if next > current {
            current = next;
            if let Some(b) = grid.bounds_of(groups[current].iter().copied()) {
                current_x_start = to_physical(b.min_x);
            }
        }
    }

    let sections: Vec<Section> = groups
        .into_iter()
        .enumerate()
        .map(|(index, members)| {
            let local = AdjacencyResolver::new(grid, members.clone()).resolve(Scope::Local);
            Section { index, members, local }
        })
        .collect();

    info!(sections = sections.len(), "board partitioned");
    Partition { sections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::Direction;
    use crate::layout::Cell;

    fn row(n: usize) -> (LayoutGrid, Vec<CellId>) {
        let mut grid = LayoutGrid::new();
        let ids = (0..n)
            .map(|i| grid.add_cell(Cell::new(i as f64, 0.0, 1.0, 1.0).unwrap()))
            .collect();
        grid.resolve_global();
        (grid, ids)
    }

    #[test]
    fn test_five_keys_three_per_section() {
        let (grid, v) = row(5);
        let part = partition(&grid, &Parameters::with_build_width(60.0));

        assert_eq!(part.section_count(), 2);
        assert_eq!(part.sections()[0].members(), &v[0..3]);
        assert_eq!(part.sections()[1].members(), &v[3..5]);

        let s0 = &part.sections()[0];
        assert!(!s0.local().has_neighbor(v[2], Direction::Right));
        assert!(grid.global().has_neighbor(v[2], Direction::Right));
        assert_eq!(grid.global().neighbor(v[2], Direction::Right), Some(v[3]));
        assert!(s0.local().has_neighbor(v[1], Direction::Right));
        assert_eq!(part.section_of(v[4]), Some(1));
    }

    #[test]
    fn test_single_section_when_everything_fits() {
        let (grid, v) = row(3);
        let part = partition(&grid, &Parameters::default());
        assert_eq!(part.section_count(), 1);
        assert_eq!(part.sections()[0].len(), v.len());
    }

    #[test]
    fn test_section_start_restarts_budget() {
        // 10 unit keys, 4 keys per envelope: 4 + 4 + 2, never 3 + ...
        let (grid, _) = row(10);
        let part = partition(&grid, &Parameters::with_build_width(4.0 * 19.05 + 1.0));
        let sizes: Vec<usize> = part.sections().iter().map(Section::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        for s in part.sections() {
            assert!(s.physical_width(&grid) <= 4.0 * 19.05 + 1.0);
        }
    }

    #[test]
    fn test_oversized_cell_is_not_split() {
        let mut grid = LayoutGrid::new();
        let wide = grid.add_cell(Cell::new(0.0, 0.0, 6.25, 1.0).unwrap());
        let next = grid.add_cell(Cell::new(6.25, 0.0, 1.0, 1.0).unwrap());
        grid.resolve_global();
        let part = partition(&grid, &Parameters::with_build_width(60.0));
        assert_eq!(part.section_count(), 2);
        assert_eq!(part.sections()[0].members(), &[wide]);
        assert_eq!(part.sections()[1].members(), &[next]);
        assert!(part.sections()[0].physical_width(&grid) > 60.0);
    }

    #[test]
    fn test_left_margin_counts_against_first_section() {
        let (grid, _) = row(3);
        let params = Parameters { left_margin: 10.0, ..Parameters::with_build_width(60.0) };
        let part = partition(&grid, &params);
        // 3 * 19.05 + 10 exceeds 60, so the third key moves on.
        assert_eq!(part.sections()[0].len(), 2);
    }

    #[test]
    fn test_budget_starts_at_leftmost_cell() {
        // Shifted one unit left: still three keys per 60 mm section.
        let mut grid = LayoutGrid::new();
        let v: Vec<CellId> = (0..4)
            .map(|i| grid.add_cell(Cell::new(i as f64 - 1.0, 0.0, 1.0, 1.0).unwrap()))
            .collect();
        grid.resolve_global();
        let part = partition(&grid, &Parameters::with_build_width(60.0));

        assert_eq!(part.section_count(), 2);
        assert_eq!(part.sections()[0].members(), &v[0..3]);
        for s in part.sections() {
            assert!(s.physical_width(&grid) < 60.0);
        }
    }

    #[test]
    fn test_rotated_cell_left_of_origin() {
        // A key turned 90 degrees about the origin covers x in [-1, 0].
        let mut grid = LayoutGrid::new();
        let turned = grid.add_cell(
            Cell::new(0.0, 0.0, 1.0, 1.0)
                .unwrap()
                .rotated(90.0, crate::geometry::Point2d::new(0.0, 0.0))
                .unwrap(),
        );
        for i in 0..3 {
            grid.add_cell(Cell::new(i as f64, -2.0, 1.0, 1.0).unwrap());
        }
        grid.resolve_global();
        assert!(grid.bounds().unwrap().min_x < -0.5);

        let part = partition(&grid, &Parameters::with_build_width(60.0));
        assert_eq!(part.section_count(), 2);
        assert!(part.sections()[0].contains(turned));
        for s in part.sections() {
            assert!(s.physical_width(&grid) < 60.0);
        }
    }

    #[test]
    fn test_local_adjacency_is_per_section() {
        let (grid, v) = row(4);
        let part = partition(&grid, &Parameters::with_build_width(40.0));
        assert_eq!(part.section_count(), 2);
        let s1 = part.section(1).unwrap();
        assert_eq!(s1.local().neighbor(v[2], Direction::Right), Some(v[3]));
        assert!(!s1.local().has_neighbor(v[2], Direction::Left));
        assert!(part.section(2).is_none());
    }
}
