pub mod hardware;
pub mod layout;

pub use hardware::*;
pub use layout::*;
