use tracing::{debug, info, instrument};

use super::{CutterBox, CutterSet, SeamError, SeamSide};
use crate::adjacency::{AdjacencyTable, Direction};
use crate::body::CaseDimensions;
use crate::config::Parameters;
use crate::geometry::{Bounds2d, Box3, Point3d};
use crate::layout::{CellId, LayoutGrid};
use crate::partition::Partition;
use crate::to_physical;

/// Seam cutters for the top side of one section.
///
/// A cell with no local neighbor on its right (left) gets a box spanning the
/// case length from the seam outward, unless the section's right (left) edge
/// is the board edge. The seam sits halfway across the gap to the global
/// neighbor, or at the section edge when there is none. The box height is the
/// cell's row band: the cell height plus kerf, plus the gap to a local top
/// neighbor, plus the distance to the case edge on any side without a global
/// neighbor.
#[instrument(skip(grid, partition, dims, params))]
pub fn top_cutters(
    grid: &LayoutGrid,
    partition: &Partition,
    dims: &CaseDimensions,
    params: &Parameters,
    section: usize,
) -> Result<CutterSet, SeamError> {
    let target = partition.section(section).ok_or(SeamError::UnknownSection {
        index: section,
        count: partition.section_count(),
    })?;
    let section_bounds = target
        .bounds(grid)
        .ok_or(SeamError::EmptySection { index: section })?;

    let tol = grid.tolerance();
    let board = dims.board;
    let on_right_border = tol.approx_eq(section_bounds.max_x, board.max_x);
    let on_left_border = tol.approx_eq(section_bounds.min_x, board.min_x);
    let local = target.local();
    let global = grid.global();

    let length = dims.real_case_width;
    let height = dims.case_height_base_removed * 4.0;
    let z = -height / 2.0;

    let right_spill = spill(grid, target.members(), Direction::Right, section_bounds.max_x, global);
    let left_spill = spill(grid, target.members(), Direction::Left, section_bounds.min_x, global);

    let mut cutters = Vec::new();
    for &id in target.members() {
        let Some(cell) = grid.get(id) else { continue };
        let fp = cell.footprint();
        let (y, bar) = row_band(id, &fp, cell.kerf(), &board, local, global, params);

        if !on_right_border && !local.has_neighbor(id, Direction::Right) {
            let start = match global.offset(id, Direction::Right) {
                Some(gap) => to_physical(fp.max_x + gap / 2.0),
                None => {
                    let mut x = to_physical(section_bounds.max_x);
                    if tol.approx_eq(fp.max_x, section_bounds.max_x) {
                        x += to_physical(right_spill) / 2.0;
                    }
                    x
                }
            };
            debug!(cell = %cell, start, bar, "right seam");
            cutters.push(CutterBox {
                side: SeamSide::Right,
                cell: Some(id),
                label: Some(cell.label().to_string()),
                bounds: Box3::from_origin_size(Point3d::new(start, y, z), [length, bar, height]),
            });
        }

        if !on_left_border && !local.has_neighbor(id, Direction::Left) {
            let end = match global.offset(id, Direction::Left) {
                Some(gap) => to_physical(fp.min_x - gap / 2.0),
                None => {
                    let mut x = to_physical(section_bounds.min_x);
                    if tol.approx_eq(fp.min_x, section_bounds.min_x) {
                        x -= to_physical(left_spill) / 2.0;
                    }
                    x
                }
            };
            debug!(cell = %cell, end, bar, "left seam");
            cutters.push(CutterBox {
                side: SeamSide::Left,
                cell: Some(id),
                label: Some(cell.label().to_string()),
                bounds: Box3::from_origin_size(Point3d::new(end - length, y, z), [length, bar, height]),
            });
        }
    }

    info!(
        section,
        cutters = cutters.len(),
        on_left_border,
        on_right_border,
        "top seam cutters built"
    );
    Ok(CutterSet { section, cutters })
}

/// Bottom y and height (millimetres) of the band a cell's cutters cover.
fn row_band(
    id: CellId,
    fp: &Bounds2d,
    kerf: f64,
    board: &Bounds2d,
    local: &AdjacencyTable,
    global: &AdjacencyTable,
    params: &Parameters,
) -> (f64, f64) {
    let mut bar = to_physical(fp.height()) + 2.0 * kerf;
    let mut y = to_physical(fp.min_y) - kerf;

    if let Some(gap) = local.offset(id, Direction::Top) {
        bar += to_physical(gap);
    }
    if !global.has_neighbor(id, Direction::Top) {
        bar += to_physical(board.max_y - fp.max_y) + params.top_margin;
    }
    if !global.has_neighbor(id, Direction::Bottom) {
        let reach = to_physical(fp.min_y - board.min_y) + params.bottom_margin;
        bar += reach;
        y -= reach;
    }
    (y, bar)
}

/// Largest gap in `direction` across the seam, over every member whose
/// footprint reaches the section edge at `edge`.
fn spill(grid: &LayoutGrid, members: &[CellId], direction: Direction, edge: f64, global: &AdjacencyTable) -> f64 {
    let tol = grid.tolerance();
    members
        .iter()
        .filter(|&&m| {
            grid.get(m).is_some_and(|c| {
                let fp = c.footprint();
                let side = if direction == Direction::Right { fp.max_x } else { fp.min_x };
                tol.approx_eq(side, edge)
            })
        })
        .filter_map(|&m| global.offset(m, direction))
        .fold(0.0, f64::max)
}
