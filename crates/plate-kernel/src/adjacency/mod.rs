//! Neighbor relationships between cells.
//!
//! Each cell has one [`Slot`] per compass [`Direction`] and per [`Scope`].
//! Slots are written once by a resolver pass. A mutual nearest pair is
//! stored as [`Slot::Linked`] on both cells in a single step; a one-sided
//! nearest neighbor (the other cell faces someone else) is
//! [`Slot::Facing`].

pub mod resolver;

pub use resolver::{AdjacencyResolver, ResolutionPass};

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

use crate::layout::CellId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Left,
    Top,
    Bottom,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Top, Direction::Bottom];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Left => 1,
            Direction::Top => 2,
            Direction::Bottom => 3,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Which cell set a table was resolved over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Within one printable section.
    Local,
    /// Across the whole board.
    Global,
}

/// A resolved neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub neighbor: CellId,
    /// Gap between the two facing edges (layout units).
    pub offset: f64,
    /// Neighbor's perpendicular anchor minus this cell's.
    pub perp_offset: f64,
}

impl Link {
    /// The same link seen from the neighbor's side.
    fn mirrored(&self, from: CellId) -> Self {
        Self {
            neighbor: from,
            offset: self.offset,
            perp_offset: -self.perp_offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Slot {
    #[default]
    Unresolved,
    /// No cell in this direction.
    Open,
    /// Mutual nearest neighbors.
    Linked(Link),
    /// Nearest neighbor whose opposite side faces a different cell.
    Facing(Link),
}

impl Slot {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Slot::Unresolved)
    }

    pub fn link(&self) -> Option<&Link> {
        match self {
            Slot::Linked(link) | Slot::Facing(link) => Some(link),
            Slot::Unresolved | Slot::Open => None,
        }
    }
}

/// Per-cell adjacency for one scope.
#[derive(Debug, Clone)]
pub struct AdjacencyTable {
    scope: Scope,
    slots: SecondaryMap<CellId, [Slot; 4]>,
}

impl AdjacencyTable {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            slots: SecondaryMap::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn slot(&self, id: CellId, direction: Direction) -> Slot {
        self.slots
            .get(id)
            .map(|s| s[direction.index()])
            .unwrap_or_default()
    }

    pub fn has_neighbor(&self, id: CellId, direction: Direction) -> bool {
        self.slot(id, direction).link().is_some()
    }

    /// Nearest cell in `direction`, linked or facing.
    ///
    /// A [`Slot::Facing`] neighbor does not point back: its opposite slot
    /// holds another cell. Use [`AdjacencyTable::slot`] to tell the two apart.
    pub fn neighbor(&self, id: CellId, direction: Direction) -> Option<CellId> {
        self.slot(id, direction).link().map(|l| l.neighbor)
    }

    pub fn offset(&self, id: CellId, direction: Direction) -> Option<f64> {
        self.slot(id, direction).link().map(|l| l.offset)
    }

    pub fn perp_offset(&self, id: CellId, direction: Direction) -> Option<f64> {
        self.slot(id, direction).link().map(|l| l.perp_offset)
    }

    /// All four directions have been decided, with or without a neighbor.
    pub fn is_fully_resolved(&self, id: CellId) -> bool {
        self.slots
            .get(id)
            .is_some_and(|s| s.iter().all(Slot::is_resolved))
    }

    /// Number of cells with at least one slot written.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.slots.keys()
    }

    /// Count of directions that hold a neighbor.
    pub fn neighbor_count(&self, id: CellId) -> usize {
        Direction::ALL
            .iter()
            .filter(|&&d| self.has_neighbor(id, d))
            .count()
    }

    fn entry(&mut self, id: CellId) -> &mut [Slot; 4] {
        if !self.slots.contains_key(id) {
            self.slots.insert(id, [Slot::Unresolved; 4]);
        }
        // Inserted above when missing.
        &mut self.slots[id]
    }

    /// Write a slot if it is still unresolved. Returns whether it was written.
    fn write(&mut self, id: CellId, direction: Direction, slot: Slot) -> bool {
        let cell = self.entry(id);
        let target = &mut cell[direction.index()];
        if target.is_resolved() {
            return false;
        }
        *target = slot;
        true
    }

    pub(crate) fn set_open(&mut self, id: CellId, direction: Direction) -> bool {
        self.write(id, direction, Slot::Open)
    }

    pub(crate) fn set_facing(&mut self, id: CellId, direction: Direction, link: Link) -> bool {
        self.write(id, direction, Slot::Facing(link))
    }

    /// Link `id` and `link.neighbor` as mutual neighbors in one step.
    ///
    /// Both slots must still be unresolved; otherwise neither is written.
    pub(crate) fn link(&mut self, id: CellId, direction: Direction, link: Link) -> bool {
        let back = direction.opposite();
        if self.slot(id, direction).is_resolved() || self.slot(link.neighbor, back).is_resolved() {
            return false;
        }
        self.entry(id)[direction.index()] = Slot::Linked(link);
        self.entry(link.neighbor)[back.index()] = Slot::Linked(link.mirrored(id));
        true
    }
}
