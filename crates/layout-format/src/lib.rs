pub mod errors;
pub mod load;
pub mod metadata;
pub mod relaxed;

pub use errors::LoadError;
pub use load::{LayoutDocument, load_layout_file, load_parameter_file, parse_layout, parse_parameters};
pub use metadata::LayoutMetadata;
pub use relaxed::quote_bare_keys;
