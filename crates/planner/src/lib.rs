#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod plan;

use std::path::PathBuf;

use layout_format::{load_layout_file, load_parameter_file};
use plate_kernel::{Board, Parameters};
use tracing::{info, warn};

pub use cli::{Args, SectionSelection};
pub use error::{CliError, Result};
pub use plan::{BuildPlan, SectionPlan};

/// Load the inputs, plan the board and write the requested plan files.
pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let selection = SectionSelection::from_arg(args.section)?;
    let doc = load_layout_file(&args.input)?;
    let params = match &args.parameters {
        Some(path) => load_parameter_file(path)?,
        None => Parameters::default(),
    };

    let stem = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layout".to_string());
    let name = doc.metadata.and_then(|m| m.name);

    let board = Board::from_layout(&doc.rows, params)?;
    let report = board.audit();
    for finding in report.findings() {
        warn!("{finding}");
    }

    let plans = match selection {
        SectionSelection::Whole => vec![BuildPlan::whole(&board, &stem, name)?],
        SectionSelection::One(index) => vec![BuildPlan::section(&board, &stem, name, index)?],
        SectionSelection::Every => (0..board.section_count())
            .map(|index| BuildPlan::section(&board, &stem, name.clone(), index))
            .collect::<Result<Vec<_>>>()?,
    };

    let written = plans
        .iter()
        .map(|plan| plan.write_to(&args.output))
        .collect::<Result<Vec<_>>>()?;
    info!(files = written.len(), sections = board.section_count(), "planning finished");
    Ok(written)
}
