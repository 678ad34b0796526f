//! JSON build plans: what to print for a board or one of its sections.

use std::fs;
use std::path::{Path, PathBuf};

use plate_kernel::body::{CaseDimensions, ScrewBoss};
use plate_kernel::seam::BottomSlab;
use plate_kernel::validation::AuditReport;
use plate_kernel::{Board, CsgNode, CsgTree, CutterSet};
use serde::Serialize;
use tracing::info;

use crate::error::{CliError, Result};

/// One printable section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionPlan {
    pub index: usize,
    pub labels: Vec<String>,
    pub width_mm: f64,
    pub top_cutters: CutterSet,
    /// Bottom-cover slab printed with this section, when the cover has one at this index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_slab: Option<BottomSlab>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_cutters: Option<CutterSet>,
    /// Support bars of the section with the seams removed.
    pub supports: CsgNode,
}

/// Everything written to one plan file.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub layout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` for a whole-board plan.
    pub selected_section: Option<usize>,
    pub section_count: usize,
    pub bottom_section_count: usize,
    pub case: CaseDimensions,
    pub screws: Vec<ScrewBoss>,
    pub sections: Vec<SectionPlan>,
    pub audit: AuditReport,
}

impl BuildPlan {
    /// Plan for the whole board: every section is listed, none has seams opened.
    pub fn whole(board: &Board, layout: &str, name: Option<String>) -> Result<Self> {
        let sections = (0..board.section_count())
            .map(|i| section_plan(board, i, false))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::with_sections(board, layout, name, None, sections))
    }

    /// Plan for one section with its seams and bottom slab.
    pub fn section(board: &Board, layout: &str, name: Option<String>, index: usize) -> Result<Self> {
        if index >= board.section_count() {
            return Err(CliError::UnknownSection {
                index,
                count: board.section_count(),
            });
        }
        let sections = vec![section_plan(board, index, true)?];
        Ok(Self::with_sections(board, layout, name, Some(index), sections))
    }

    fn with_sections(
        board: &Board,
        layout: &str,
        name: Option<String>,
        selected_section: Option<usize>,
        sections: Vec<SectionPlan>,
    ) -> Self {
        Self {
            layout: layout.to_string(),
            name,
            selected_section,
            section_count: board.section_count(),
            bottom_section_count: board.bottom_section_count(),
            case: *board.dimensions(),
            screws: board.screws().to_vec(),
            sections,
            audit: board.audit(),
        }
    }

    /// `<stem>_plan.json` or `<stem>_section_N_plan.json`.
    pub fn file_name(&self) -> String {
        match self.selected_section {
            Some(n) => format!("{}_section_{n}_plan.json", self.layout),
            None => format!("{}_plan.json", self.layout),
        }
    }

    /// Write the plan into `folder`, creating it if needed.
    pub fn write_to(&self, folder: &Path) -> Result<PathBuf> {
        fs::create_dir_all(folder).map_err(|e| CliError::write(folder, e))?;
        let path = folder.join(self.file_name());
        let json = serde_json::to_string_pretty(self).map_err(|e| CliError::write(&path, e))?;
        fs::write(&path, json).map_err(|e| CliError::write(&path, e))?;
        info!(path = %path.display(), sections = self.sections.len(), "plan written");
        Ok(path)
    }
}

fn section_plan(board: &Board, index: usize, open_seams: bool) -> Result<SectionPlan> {
    let section = board
        .partition()
        .section(index)
        .ok_or(CliError::UnknownSection {
            index,
            count: board.section_count(),
        })?;
    let labels = section
        .members()
        .iter()
        .filter_map(|&id| board.grid().get(id))
        .map(|c| c.label().to_string())
        .collect();

    let seams = board.seams();
    let mut tree = CsgTree::default();
    let (top_cutters, supports) = if open_seams {
        (seams.top_cutters(index)?, board.section_supports(index, &mut tree)?)
    } else {
        let none = CutterSet {
            section: index,
            cutters: Vec::new(),
        };
        (none, board.section_support_body(index, &mut tree))
    };

    let (bottom_slab, bottom_cutters) = if open_seams && index < board.bottom_section_count() {
        (Some(seams.bottom_slab(index)?), Some(seams.bottom_cutters(index)?))
    } else {
        (None, None)
    };

    Ok(SectionPlan {
        index,
        labels,
        width_mm: section.physical_width(board.grid()),
        top_cutters,
        bottom_slab,
        bottom_cutters,
        supports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_kernel::Parameters;
    use plate_kernel::seam::SeamSide;

    fn board() -> Board {
        let doc = layout_format::parse_layout(r#"[["Q", "W", "E", "R"], ["A", "S", "D", "F"]]"#).unwrap();
        Board::from_layout(&doc.rows, Parameters::with_build_width(45.0)).unwrap()
    }

    #[test]
    fn whole_board_plan_lists_every_section() {
        let plan = BuildPlan::whole(&board(), "mini", None).unwrap();
        assert_eq!(plan.file_name(), "mini_plan.json");
        assert_eq!(plan.sections.len(), 2);
        assert!(plan.sections.iter().all(|s| s.top_cutters.is_empty()));
        assert_eq!(plan.sections[0].labels, vec!["A", "Q", "S", "W"]);
        assert!(plan.audit.valid);
    }

    #[test]
    fn section_plan_opens_seams() {
        let plan = BuildPlan::section(&board(), "mini", Some("Mini".into()), 0).unwrap();
        assert_eq!(plan.file_name(), "mini_section_0_plan.json");
        let s = &plan.sections[0];
        assert_eq!(s.top_cutters.on_side(SeamSide::Right).count(), 2);
        assert!(matches!(s.supports, CsgNode::Difference { .. }));
        assert_eq!(s.bottom_slab.map(|b| b.index), Some(0));
    }

    #[test]
    fn unknown_section() {
        let err = BuildPlan::section(&board(), "mini", None, 7).unwrap_err();
        assert!(matches!(err, CliError::UnknownSection { index: 7, count: 2 }));
    }

    #[test]
    fn write_plan_json() {
        let dir = tempfile::tempdir().unwrap();
        let plan = BuildPlan::section(&board(), "mini", None, 1).unwrap();
        let path = plan.write_to(&dir.path().join("plans")).unwrap();
        assert!(path.ends_with("mini_section_1_plan.json"));

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["selected_section"], 1);
        assert_eq!(json["section_count"], 2);
        assert_eq!(json["sections"][0]["top_cutters"]["cutters"][0]["side"], "left");
        assert_eq!(json["sections"][0]["supports"]["op"], "difference");
        assert!(json.get("name").is_none());
    }
}
