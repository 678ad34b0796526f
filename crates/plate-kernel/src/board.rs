//! The whole pipeline for one board: grid, adjacency, sections, case, screws.

use keyplate_types::LayoutRow;
use tracing::{info, instrument};

use crate::body::{CaseDimensions, ScrewBoss, layout_screws};
use crate::config::Parameters;
use crate::csg::GeometryKernel;
use crate::layout::{LayoutError, LayoutGrid, build_grid};
use crate::partition::{Partition, partition};
use crate::seam::{SeamError, SeamRemover};
use crate::validation::{AuditReport, audit};

/// A fully planned board.
#[derive(Debug, Clone)]
pub struct Board {
    params: Parameters,
    grid: LayoutGrid,
    partition: Partition,
    dims: CaseDimensions,
    screws: Vec<ScrewBoss>,
}

impl Board {
    /// Build the grid, resolve global adjacency, partition and size the case.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn from_layout(rows: &[LayoutRow], params: Parameters) -> Result<Self, LayoutError> {
        let grid = build_grid(rows, &params)?;
        Self::from_grid(grid, params)
    }

    /// Plan a board from an already populated grid.
    pub fn from_grid(mut grid: LayoutGrid, params: Parameters) -> Result<Self, LayoutError> {
        grid.resolve_global();
        let bounds = grid.bounds().ok_or(LayoutError::EmptyLayout)?;
        let partition = partition(&grid, &params);
        let dims = CaseDimensions::new(bounds, &params);
        let screws = layout_screws(&dims, &params);
        info!(
            cells = grid.len(),
            sections = partition.section_count(),
            bottom_sections = dims.bottom_section_count,
            screws = screws.len(),
            "board planned"
        );
        Ok(Self {
            params,
            grid,
            partition,
            dims,
            screws,
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn grid(&self) -> &LayoutGrid {
        &self.grid
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn dimensions(&self) -> &CaseDimensions {
        &self.dims
    }

    pub fn screws(&self) -> &[ScrewBoss] {
        &self.screws
    }

    pub fn section_count(&self) -> usize {
        self.partition.section_count()
    }

    pub fn bottom_section_count(&self) -> usize {
        self.dims.bottom_section_count
    }

    pub fn seams(&self) -> SeamRemover<'_> {
        SeamRemover::new(&self.grid, &self.partition, &self.dims, &self.params, &self.screws)
    }

    pub fn audit(&self) -> AuditReport {
        audit(&self.grid, &self.partition, &self.params)
    }

    /// Union of the support bars of one section, built through `kernel`.
    pub fn section_support_body<K: GeometryKernel>(&self, section: usize, kernel: &mut K) -> K::Solid {
        let parts = self
            .partition
            .section(section)
            .map(|s| s.members())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.grid.support(id))
            .map(|support| support.build(kernel))
            .collect();
        kernel.union(parts)
    }

    /// Support bars of one section with the seams opened.
    pub fn section_supports<K: GeometryKernel>(&self, section: usize, kernel: &mut K) -> Result<K::Solid, SeamError> {
        let cutters = self.seams().top_cutters(section)?;
        let body = self.section_support_body(section, kernel);
        Ok(cutters.subtract_from(kernel, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::{CsgNode, CsgTree};
    use crate::validation::AuditCode;

    fn rows(json: &str) -> Vec<LayoutRow> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_plan_small_board() {
        let board = Board::from_layout(
            &rows(r#"[["Q", "W", "E", "R"], ["A", "S", "D", "F"]]"#),
            Parameters::with_build_width(45.0),
        )
        .unwrap();
        assert_eq!(board.grid().len(), 8);
        assert_eq!(board.section_count(), 2);
        assert!(board.audit().valid);
        assert_eq!(board.seams().top_cutters(0).unwrap().len(), 2);
        assert_eq!(board.seams().top_cutters(1).unwrap().len(), 2);
    }

    #[test]
    fn test_negative_x_row_stays_in_budget() {
        let board = Board::from_layout(
            &rows(r#"[[{"x": -1}, "A", "B", "C", "D"]]"#),
            Parameters::with_build_width(60.0),
        )
        .unwrap();
        assert_eq!(board.section_count(), 2);
        assert_eq!(board.partition().sections()[0].len(), 3);
        let report = board.audit();
        assert!(report.valid, "{report}");
        assert!(report.errors_of(AuditCode::SectionOverBudget).is_empty());
    }

    #[test]
    fn test_empty_layout_is_an_error() {
        let err = Board::from_layout(&rows(r#"[[]]"#), Parameters::default()).unwrap_err();
        assert_eq!(err, LayoutError::EmptyLayout);
    }

    #[test]
    fn test_section_supports_subtract_cutters() {
        let board = Board::from_layout(&rows(r#"[["Q", "W", "E"]]"#), Parameters::with_build_width(45.0)).unwrap();
        let mut tree = CsgTree::default();
        let solid = board.section_supports(0, &mut tree).unwrap();
        match solid {
            CsgNode::Difference { base, tools } => {
                assert_eq!(tools.len(), 1);
                assert!(matches!(*base, CsgNode::Union { ref children } if children.len() == 2));
            }
            other => panic!("expected a difference, got {other:?}"),
        }
    }

    #[test]
    fn test_last_section_supports_have_left_cutter_only() {
        let board = Board::from_layout(&rows(r#"[["Q", "W", "E"]]"#), Parameters::with_build_width(45.0)).unwrap();
        assert_eq!(board.section_count(), 2);
        let mut tree = CsgTree::default();
        let solid = board.section_supports(1, &mut tree).unwrap();
        // A lone support is not wrapped in a union.
        assert!(matches!(solid, CsgNode::Difference { ref tools, .. } if tools.len() == 1));
        assert!(tree.operations() > 0);
    }
}
