//! CLI command implementations.

mod build;
mod build_icons;
mod inspect;

pub use build::build;
pub use build_icons::build_icons;
pub use inspect::inspect;
