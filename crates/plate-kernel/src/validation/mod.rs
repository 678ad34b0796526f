//! Runtime checks of the structural invariants of a partitioned board.

pub mod types;

pub use types::*;

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::adjacency::{AdjacencyTable, Direction, Slot};
use crate::config::Parameters;
use crate::layout::{CellId, LayoutGrid};
use crate::partition::Partition;
use crate::to_physical;

/// Audit adjacency completeness and symmetry, section coverage and section width.
#[instrument(skip_all, fields(cells = grid.len(), sections = partition.section_count()))]
pub fn audit(grid: &LayoutGrid, partition: &Partition, params: &Parameters) -> AuditReport {
    let mut findings = Vec::new();
    let mut counts = AuditCounts {
        cells: grid.len(),
        sections: partition.section_count(),
        ..AuditCounts::default()
    };

    let ids = grid.ids();
    check_table(grid.global(), &ids, None, &mut findings);
    for (cell, dir) in ids.iter().flat_map(|&id| Direction::ALL.map(|d| (id, d))) {
        match grid.global().slot(cell, dir) {
            Slot::Linked(_) => counts.global_links += 1,
            Slot::Open => counts.open_slots += 1,
            Slot::Unresolved | Slot::Facing(_) => {}
        }
    }
    for section in partition.sections() {
        check_table(section.local(), section.members(), Some(section.index()), &mut findings);
    }

    check_coverage(&ids, partition, &mut findings);
    check_budget(grid, partition, params, &mut findings);
    check_overlaps(grid, &ids, &mut findings);

    let (errors, warnings): (Vec<Finding>, Vec<Finding>) =
        findings.into_iter().partition(|f| f.severity == Severity::Error);
    let valid = errors.is_empty();

    for w in &warnings {
        warn!(code = %w.code, "{}", w.message);
    }
    info!(
        valid,
        error_count = errors.len(),
        warning_count = warnings.len(),
        "audit complete"
    );

    AuditReport {
        valid,
        errors,
        warnings,
        counts,
    }
}

fn check_table(table: &AdjacencyTable, members: &[CellId], section: Option<usize>, out: &mut Vec<Finding>) {
    let scope = table.scope();
    for &id in members {
        for dir in Direction::ALL {
            let subject = Subject::Slot {
                cell: id,
                direction: dir,
                scope,
                section,
            };
            match table.slot(id, dir) {
                Slot::Unresolved => out.push(Finding::error(
                    subject,
                    AuditCode::MissingSlot,
                    format!("{dir} slot never resolved"),
                )),
                Slot::Linked(link) => {
                    let back = table.slot(link.neighbor, dir.opposite());
                    match back {
                        Slot::Linked(mirror) if mirror.neighbor == id => {
                            let same_gap = (mirror.offset - link.offset).abs() <= f64::EPSILON * 16.0;
                            let negated = (mirror.perp_offset + link.perp_offset).abs() <= f64::EPSILON * 16.0;
                            if !(same_gap && negated) {
                                out.push(
                                    Finding::error(subject, AuditCode::OffsetMismatch, "mirror link disagrees")
                                        .measured(mirror.offset, link.offset),
                                );
                            }
                        }
                        _ => out.push(Finding::error(
                            subject,
                            AuditCode::AsymmetricLink,
                            format!("{dir} neighbor does not link back"),
                        )),
                    }
                }
                Slot::Facing(link) => {
                    if matches!(table.slot(link.neighbor, dir.opposite()), Slot::Linked(back) if back.neighbor == id) {
                        out.push(Finding::error(
                            subject,
                            AuditCode::AsymmetricLink,
                            format!("{dir} link recorded one-way but the neighbor links back"),
                        ));
                    }
                }
                Slot::Open => {}
            }
        }
    }
}

fn check_coverage(ids: &[CellId], partition: &Partition, out: &mut Vec<Finding>) {
    let mut seen: HashMap<CellId, usize> = HashMap::new();
    for section in partition.sections() {
        for &id in section.members() {
            *seen.entry(id).or_default() += 1;
        }
    }
    for &id in ids {
        match seen.get(&id).copied().unwrap_or(0) {
            0 => out.push(Finding::error(
                Subject::Cell { cell: id },
                AuditCode::UncoveredCell,
                "cell is in no section",
            )),
            1 => {}
            n => out.push(Finding::error(
                Subject::Cell { cell: id },
                AuditCode::DuplicateCell,
                format!("cell is in {n} sections"),
            )),
        }
    }
}

/// A section is over budget when its footprint span reaches the envelope width.
/// It is only a warning when the section holds a cell that alone is that wide.
fn check_budget(grid: &LayoutGrid, partition: &Partition, params: &Parameters, out: &mut Vec<Finding>) {
    let budget = params.x_build_size;
    for section in partition.sections() {
        let width = section.physical_width(grid);
        if width < budget {
            continue;
        }
        let oversized = section.members().iter().any(|&id| {
            grid.get(id)
                .is_some_and(|c| to_physical(c.footprint().width()) >= budget)
        });
        let subject = Subject::Section { index: section.index() };
        let finding = if section.len() == 1 || oversized {
            Finding::warning(subject, AuditCode::SectionOverBudget, "section holds a cell wider than the envelope")
        } else {
            Finding::error(subject, AuditCode::SectionOverBudget, "section wider than the envelope")
        };
        out.push(finding.measured(width, budget));
    }
}

fn check_overlaps(grid: &LayoutGrid, ids: &[CellId], out: &mut Vec<Finding>) {
    let eps = grid.tolerance().coincidence;
    let footprints: Vec<_> = ids
        .iter()
        .filter_map(|&id| grid.get(id).map(|c| (id, c.footprint())))
        .collect();
    for (i, (a, fa)) in footprints.iter().enumerate() {
        for (b, fb) in &footprints[i + 1..] {
            if fa.intersects(fb, eps) {
                out.push(Finding::warning(
                    Subject::Cell { cell: *a },
                    AuditCode::OverlappingCells,
                    format!("footprint overlaps cell {b:?}"),
                ));
            }
        }
    }
}
