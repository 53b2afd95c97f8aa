//! Metric fitting and alignment for glyphs and glyph batches.
//!
//! - [`fit`] and [`resize_width`] normalize a single glyph into a target cell.
//! - [`BatchTransform`] resolves one scale and vertical shift for a whole
//!   batch from a [`FitPolicy`] and [`VAlign`], using the statistical mode of
//!   rounded bounding boxes for baseline detection.
//! - [`ReshapePipeline`] runs fit, emboldening and width restoration in a
//!   validated order.

mod batch;
mod error;
mod fit;
mod report;
mod reshape;
mod stats;

pub use batch::{BatchTransform, FitPolicy, HAlign, VAlign};
pub use error::{FitError, Result};
pub use fit::{Envelope, align_center, fit, fit_scale, resize_width};
pub use report::GlyphReport;
pub use reshape::{
    ReshapePipeline, ReshapePlan, ReshapeStep, ShapeSpec, WidthClass, reshape_font, skew_font,
};
pub use stats::{BoxMode, Mode, max_ink_height, max_ink_top, max_ink_width, round_half_up};
