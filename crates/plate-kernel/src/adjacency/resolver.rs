use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, instrument};

use super::{AdjacencyTable, Direction, Link, Scope};
use crate::geometry::Bounds2d;
use crate::layout::{CellId, LayoutGrid};

/// Finds nearest neighbors among a fixed set of cells of one grid.
///
/// The member set is the whole board for global scope or one section for
/// local scope. Candidates are compared on footprints:
///
/// - right: vertical extents overlap and the candidate's left edge is at or
///   beyond this cell's right edge (left, top and bottom mirror this);
/// - the closest candidate has the smallest gap between facing edges, then
///   the smallest perpendicular offset, then the earliest creation order.
pub struct AdjacencyResolver<'a> {
    grid: &'a LayoutGrid,
    members: Vec<CellId>,
    footprints: Vec<Bounds2d>,
}

impl<'a> AdjacencyResolver<'a> {
    /// Members not present in the grid are dropped.
    pub fn new(grid: &'a LayoutGrid, members: Vec<CellId>) -> Self {
        let members: Vec<CellId> = members.into_iter().filter(|&id| grid.contains(id)).collect();
        let footprints = members
            .iter()
            .filter_map(|&id| grid.get(id).map(|c| c.footprint()))
            .collect();
        Self {
            grid,
            members,
            footprints,
        }
    }

    pub fn members(&self) -> &[CellId] {
        &self.members
    }

    fn footprint(&self, id: CellId) -> Option<Bounds2d> {
        self.members
            .iter()
            .position(|&m| m == id)
            .map(|i| self.footprints[i])
    }

    /// Nearest member of `id` in `direction`, or `None` when nothing lies that way.
    pub fn nearest(&self, id: CellId, direction: Direction) -> Option<Link> {
        let me = self.footprint(id)?;
        let eps = self.grid.tolerance().coincidence;

        let mut best: Option<(Link, usize)> = None;
        for (&other, sib) in self.members.iter().zip(&self.footprints) {
            if other == id {
                continue;
            }
            let Some(link) = candidate(&me, sib, direction, other, eps) else {
                continue;
            };
            let ordinal = self.grid.ordinal(other).unwrap_or(usize::MAX);
            let closer = match &best {
                None => true,
                Some((current, current_ordinal)) => {
                    compare(&link, ordinal, current, *current_ordinal, eps) == Ordering::Less
                }
            };
            if closer {
                best = Some((link, ordinal));
            }
        }
        best.map(|(link, _)| link)
    }

    /// Start a stepwise resolution pass.
    pub fn pass(&self, scope: Scope) -> ResolutionPass<'_, 'a> {
        ResolutionPass {
            resolver: self,
            table: AdjacencyTable::new(scope),
            queue: VecDeque::new(),
            seen: HashSet::new(),
            seed: 0,
        }
    }

    /// Resolve every member in every direction.
    #[instrument(skip(self), fields(members = self.members.len()))]
    pub fn resolve(&self, scope: Scope) -> AdjacencyTable {
        let mut pass = self.pass(scope);
        let mut steps = 0usize;
        while pass.step().is_some() {
            steps += 1;
        }
        let table = pass.finish();
        let links: usize = table.cells().map(|id| table.neighbor_count(id)).sum();
        info!(?scope, steps, links, "adjacency resolved");
        table
    }
}

/// Gap and perpendicular offset of `sib` as a neighbor of `me`, if it is a candidate.
fn candidate(me: &Bounds2d, sib: &Bounds2d, direction: Direction, other: CellId, eps: f64) -> Option<Link> {
    let (is_candidate, offset, perp_offset) = match direction {
        Direction::Right => (
            me.overlaps_y(sib, eps) && sib.min_x >= me.max_x - eps,
            sib.min_x - me.max_x,
            sib.max_y - me.max_y,
        ),
        Direction::Left => (
            me.overlaps_y(sib, eps) && sib.max_x <= me.min_x + eps,
            me.min_x - sib.max_x,
            sib.max_y - me.max_y,
        ),
        Direction::Top => (
            me.overlaps_x(sib, eps) && sib.min_y >= me.max_y - eps,
            sib.min_y - me.max_y,
            sib.min_x - me.min_x,
        ),
        Direction::Bottom => (
            me.overlaps_x(sib, eps) && sib.max_y <= me.min_y + eps,
            me.min_y - sib.max_y,
            sib.min_x - me.min_x,
        ),
    };
    is_candidate.then_some(Link {
        neighbor: other,
        offset: offset.max(0.0),
        perp_offset,
    })
}

fn compare(a: &Link, a_ordinal: usize, b: &Link, b_ordinal: usize, eps: f64) -> Ordering {
    if (a.offset - b.offset).abs() > eps {
        return a.offset.total_cmp(&b.offset);
    }
    let (pa, pb) = (a.perp_offset.abs(), b.perp_offset.abs());
    if (pa - pb).abs() > eps {
        return pa.total_cmp(&pb);
    }
    a_ordinal.cmp(&b_ordinal)
}

/// An in-progress resolution over an explicit worklist.
///
/// Each [`step`](Self::step) dequeues one cell, decides its unresolved
/// directions and enqueues any neighbor that is not yet fully resolved. When
/// the queue drains, the next unresolved member in order seeds it again, so
/// disconnected groups are covered too.
pub struct ResolutionPass<'r, 'a> {
    resolver: &'r AdjacencyResolver<'a>,
    table: AdjacencyTable,
    queue: VecDeque<CellId>,
    seen: HashSet<CellId>,
    seed: usize,
}

impl ResolutionPass<'_, '_> {
    pub fn table(&self) -> &AdjacencyTable {
        &self.table
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Process one cell. Returns the cell processed, or `None` when done.
    pub fn step(&mut self) -> Option<CellId> {
        let id = match self.queue.pop_front() {
            Some(id) => id,
            None => self.next_seed()?,
        };

        for direction in Direction::ALL {
            if self.table.slot(id, direction).is_resolved() {
                continue;
            }
            match self.resolver.nearest(id, direction) {
                None => {
                    self.table.set_open(id, direction);
                }
                Some(link) => {
                    let back = direction.opposite();
                    let mutual = self
                        .resolver
                        .nearest(link.neighbor, back)
                        .is_some_and(|l| l.neighbor == id);
                    if mutual {
                        self.table.link(id, direction, link);
                    } else {
                        debug!(?id, %direction, neighbor = ?link.neighbor, "one-sided neighbor");
                        self.table.set_facing(id, direction, link);
                    }
                    self.enqueue(link.neighbor);
                }
            }
        }
        Some(id)
    }

    fn enqueue(&mut self, id: CellId) {
        if !self.table.is_fully_resolved(id) && self.seen.insert(id) {
            self.queue.push_back(id);
        }
    }

    fn next_seed(&mut self) -> Option<CellId> {
        let members = self.resolver.members();
        while self.seed < members.len() {
            let id = members[self.seed];
            self.seed += 1;
            if !self.table.is_fully_resolved(id) && self.seen.insert(id) {
                return Some(id);
            }
        }
        None
    }

    pub fn finish(self) -> AdjacencyTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Cell;
    use approx::assert_relative_eq;

    fn grid_of(cells: &[(f64, f64, f64, f64)]) -> (LayoutGrid, Vec<CellId>) {
        let mut grid = LayoutGrid::new();
        let ids = cells
            .iter()
            .map(|&(x, y, w, h)| grid.add_cell(Cell::new(x, y, w, h).unwrap()))
            .collect();
        (grid, ids)
    }

    #[test]
    fn test_two_by_two_block() {
        let (mut grid, v) = grid_of(&[
            (0.0, 0.0, 1.0, 1.0),
            (1.0, 0.0, 1.0, 1.0),
            (0.0, -1.0, 1.0, 1.0),
            (1.0, -1.0, 1.0, 1.0),
        ]);
        let table = grid.resolve_global().clone();

        for &id in &v {
            assert!(table.is_fully_resolved(id));
            assert_eq!(table.neighbor_count(id), 2);
            for d in Direction::ALL {
                if let Some(offset) = table.offset(id, d) {
                    assert_eq!(offset, 0.0);
                }
            }
        }
        assert_eq!(table.neighbor(v[0], Direction::Right), Some(v[1]));
        assert_eq!(table.neighbor(v[0], Direction::Bottom), Some(v[2]));
        assert_eq!(table.neighbor(v[3], Direction::Top), Some(v[1]));
        assert_eq!(table.neighbor(v[3], Direction::Left), Some(v[2]));
        assert!(!table.has_neighbor(v[0], Direction::Top));
    }

    #[test]
    fn test_three_by_three_edge_counts() {
        let mut cells = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                cells.push((col as f64, -(row as f64), 1.0, 1.0));
            }
        }
        let (mut grid, v) = grid_of(&cells);
        let table = grid.resolve_global().clone();
        let counts: Vec<usize> = v.iter().map(|&id| table.neighbor_count(id)).collect();
        assert_eq!(counts, vec![2, 3, 2, 3, 4, 3, 2, 3, 2]);
    }

    #[test]
    fn test_isolated_cell_terminates() {
        let (mut grid, v) = grid_of(&[(0.0, 0.0, 1.0, 1.0)]);
        let table = grid.resolve_global().clone();
        assert!(table.is_fully_resolved(v[0]));
        for d in Direction::ALL {
            assert!(!table.has_neighbor(v[0], d));
        }
    }

    #[test]
    fn test_gap_and_perpendicular_offsets() {
        // Wide key followed by a gap, then a key a quarter unit lower.
        let (mut grid, v) = grid_of(&[(0.0, 0.0, 1.5, 1.0), (1.75, -0.25, 1.0, 1.0)]);
        let table = grid.resolve_global().clone();
        assert_relative_eq!(table.offset(v[0], Direction::Right).unwrap(), 0.25);
        assert_relative_eq!(table.perp_offset(v[0], Direction::Right).unwrap(), -0.25);
        assert_relative_eq!(table.offset(v[1], Direction::Left).unwrap(), 0.25);
        assert_relative_eq!(table.perp_offset(v[1], Direction::Left).unwrap(), 0.25);
    }

    #[test]
    fn test_one_sided_neighbor() {
        // Two short keys stacked to the left of one tall key.
        let (mut grid, v) = grid_of(&[
            (0.0, 0.0, 1.0, 1.0),
            (0.0, -1.0, 1.0, 1.0),
            (1.0, 0.0, 1.0, 2.0),
        ]);
        let table = grid.resolve_global().clone();
        // The tall key's left side picks the top key (smaller perpendicular offset).
        assert_eq!(table.neighbor(v[2], Direction::Left), Some(v[0]));
        assert!(matches!(table.slot(v[0], Direction::Right), crate::adjacency::Slot::Linked(_)));
        // The lower key still sees the tall key, one-sided.
        assert_eq!(table.neighbor(v[1], Direction::Right), Some(v[2]));
        assert!(matches!(table.slot(v[1], Direction::Right), crate::adjacency::Slot::Facing(_)));
        // ... and the tall key does not point back at it.
        assert_ne!(table.neighbor(v[2], Direction::Left), Some(v[1]));
    }

    #[test]
    fn test_tie_broken_by_creation_order() {
        // Two candidates above a wide key with equal gaps.
        let (mut grid, v) = grid_of(&[
            (0.0, -1.0, 2.0, 1.0),
            (1.0, 0.0, 1.0, 1.0),
            (0.0, 0.0, 1.0, 1.0),
        ]);
        let table = grid.resolve_global().clone();
        // |perp| is 0 for the key at x=0 and 1 for the key at x=1.
        assert_eq!(table.neighbor(v[0], Direction::Top), Some(v[2]));

        let (mut grid, v) = grid_of(&[
            (0.0, 0.0, 1.0, 1.0),
            (1.0, 0.5, 1.0, 1.0),
            (1.0, -0.5, 1.0, 1.0),
        ]);
        let table = grid.resolve_global().clone();
        // Both right candidates have |perp| = 0.5; the first created wins.
        assert_eq!(table.neighbor(v[0], Direction::Right), Some(v[1]));
    }

    #[test]
    fn test_pass_steps_are_observable() {
        let (grid, v) = grid_of(&[(0.0, 0.0, 1.0, 1.0), (1.0, 0.0, 1.0, 1.0), (5.0, -3.0, 1.0, 1.0)]);
        let resolver = AdjacencyResolver::new(&grid, grid.ids());
        let mut pass = resolver.pass(Scope::Local);

        let first = pass.step().unwrap();
        assert_eq!(first, v[0]);
        assert!(pass.table().is_fully_resolved(v[0]));
        assert_eq!(pass.queued(), 1);
        assert_eq!(pass.step(), Some(v[1]));
        // Queue drained; the disconnected key is seeded next.
        assert_eq!(pass.step(), Some(v[2]));
        assert_eq!(pass.step(), None);
        let table = pass.finish();
        assert_eq!(table.scope(), Scope::Local);
        assert!(v.iter().all(|&id| table.is_fully_resolved(id)));
    }

    #[test]
    fn test_non_member_is_ignored() {
        let (grid, v) = grid_of(&[(0.0, 0.0, 1.0, 1.0), (1.0, 0.0, 1.0, 1.0)]);
        let resolver = AdjacencyResolver::new(&grid, vec![v[0]]);
        assert!(resolver.nearest(v[0], Direction::Right).is_none());
        assert!(resolver.nearest(v[1], Direction::Left).is_none());
    }
}
