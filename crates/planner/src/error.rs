use layout_format::LoadError;
use plate_kernel::LayoutError;
use plate_kernel::seam::SeamError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("seam error: {0}")]
    Seam(#[from] SeamError),

    #[error("invalid section {0}: use -1, -2 or a section number")]
    InvalidSection(i64),

    #[error("section {index} does not exist (board has {count})")]
    UnknownSection { index: usize, count: usize },

    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidSection(_) | Self::UnknownSection { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn write(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Write {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
