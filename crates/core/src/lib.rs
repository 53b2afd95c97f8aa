//! Quillwort Core - configuration and build pipeline for composite fonts.
//!
//! A build opens a Latin, a wide and an icon source, reshapes each to the
//! target metrics, merges them in that order and attaches metadata.

pub mod config;
pub mod icons;
pub mod inspect;
pub mod io;
pub mod layers;
pub mod pipeline;

pub use config::{IconConfig, IconSource, LatinConfig, Parameter, WideConfig, load_glyph_sets};
pub use icons::{IconBuild, build_icons};
pub use inspect::{Inspection, inspect, inspect_font, parse_codepoint};
pub use layers::{build_icon_font, prepare_icons, prepare_latin, prepare_wide};
pub use pipeline::{BuildOptions, BuiltFont, build_font};
