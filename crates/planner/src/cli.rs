use std::path::PathBuf;

use clap::Parser;

use crate::error::CliError;

/// Plan a split, printable keyboard case from a layout-editor export.
#[derive(Debug, Parser)]
#[command(name = "keyplate")]
#[command(version)]
pub struct Args {
    /// Layout JSON exported from a keyboard layout editor (strict or raw-data form)
    #[arg(short = 'i', long = "input-file")]
    pub input: PathBuf,

    /// Parameter JSON overriding the defaults
    #[arg(short = 'p', long = "parameter-file")]
    pub parameters: Option<PathBuf>,

    /// Section to plan: -1 for the whole board, -2 for every section
    #[arg(short = 's', long, default_value_t = -1, allow_negative_numbers = true)]
    pub section: i64,

    /// Folder for the generated plan files
    #[arg(short = 'o', long = "output-folder", default_value = ".")]
    pub output: PathBuf,

    /// Log per-cell decisions
    #[arg(short, long)]
    pub verbose: bool,
}

/// Which part of the board to plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSelection {
    Whole,
    One(usize),
    Every,
}

impl SectionSelection {
    pub fn from_arg(value: i64) -> Result<Self, CliError> {
        match value {
            -1 => Ok(Self::Whole),
            -2 => Ok(Self::Every),
            n if n >= 0 => Ok(Self::One(n as usize)),
            n => Err(CliError::InvalidSection(n)),
        }
    }
}
