//! Batch-wide fit and alignment.
//!
//! One scale and one vertical shift are resolved for a whole batch of glyphs
//! (typically every glyph one icon set contributes), then applied to each
//! glyph so the set stays visually consistent.

use std::fmt::{self, Display, Formatter};

use log::debug;
use quillwort_outline::Glyph;
use serde::{Deserialize, Serialize};

use crate::{
    Envelope, FitError, Result, align_center,
    stats::{BoxMode, max_ink_height, max_ink_top, max_ink_width},
};

/// How a batch's uniform scale is derived.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "FitPolicyRepr", into = "FitPolicyRepr")]
pub enum FitPolicy {
    /// `target width / widest ink in the batch`
    #[default]
    MaxWidth,
    /// `target height / tallest ink in the batch`
    MaxHeight,
    /// `target width / v` for an externally known reference size
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum FitPolicyRepr {
    Named(NamedPolicy),
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NamedPolicy {
    MaxWidth,
    MaxHeight,
}

impl TryFrom<FitPolicyRepr> for FitPolicy {
    type Error = FitError;

    fn try_from(repr: FitPolicyRepr) -> Result<Self> {
        match repr {
            FitPolicyRepr::Named(NamedPolicy::MaxWidth) => Ok(FitPolicy::MaxWidth),
            FitPolicyRepr::Named(NamedPolicy::MaxHeight) => Ok(FitPolicy::MaxHeight),
            FitPolicyRepr::Fixed(v) if v > 0.0 => Ok(FitPolicy::Fixed(v)),
            FitPolicyRepr::Fixed(v) => Err(FitError::InvalidFixedTarget(v)),
        }
    }
}

impl From<FitPolicy> for FitPolicyRepr {
    fn from(policy: FitPolicy) -> Self {
        match policy {
            FitPolicy::MaxWidth => FitPolicyRepr::Named(NamedPolicy::MaxWidth),
            FitPolicy::MaxHeight => FitPolicyRepr::Named(NamedPolicy::MaxHeight),
            FitPolicy::Fixed(v) => FitPolicyRepr::Fixed(v),
        }
    }
}

impl Display for FitPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FitPolicy::MaxWidth => f.write_str("max_width"),
            FitPolicy::MaxHeight => f.write_str("max_height"),
            FitPolicy::Fixed(v) => write!(f, "{v}"),
        }
    }
}

/// Horizontal placement after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    #[default]
    Center,
    None,
}

/// Vertical placement after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    /// Put the batch's highest ink top on the ascent line.
    MaxTop,
    /// Put the batch's most common ink bottom on the baseline.
    #[default]
    ModeBottom,
    None,
}

/// A resolved batch transform: scale about the origin, then shift vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchTransform {
    pub scale: f64,
    pub shift: f64,
}

impl BatchTransform {
    pub fn resolve(
        glyphs: &[&Glyph],
        policy: FitPolicy,
        valign: VAlign,
        target: Envelope,
    ) -> Result<Self> {
        let scale = match policy {
            FitPolicy::MaxWidth => {
                non_empty(glyphs)?;
                let max_width = max_ink_width(glyphs);
                if max_width <= 0.0 {
                    return Err(FitError::DegenerateBatch { policy: "max_width", extent: "width" });
                }
                target.width / max_width
            }
            FitPolicy::MaxHeight => {
                non_empty(glyphs)?;
                let max_height = max_ink_height(glyphs);
                if max_height <= 0.0 {
                    return Err(FitError::DegenerateBatch {
                        policy: "max_height",
                        extent: "height",
                    });
                }
                target.height() / max_height
            }
            FitPolicy::Fixed(v) if v > 0.0 => target.width / v,
            FitPolicy::Fixed(v) => return Err(FitError::InvalidFixedTarget(v)),
        };

        let shift = match valign {
            VAlign::ModeBottom => {
                let bottom = BoxMode::of(glyphs).bottom.unique("bottom")?;
                -(bottom as f64) * scale
            }
            VAlign::MaxTop => target.ascent - max_ink_top(glyphs) * scale,
            VAlign::None => 0.0,
        };

        debug!("resolved batch of {}: scale {scale:.6}, shift {shift:.3}", glyphs.len());
        Ok(Self { scale, shift })
    }

    /// Scale and shift `glyph`, set its advance to `width`, then align horizontally.
    pub fn apply(&self, glyph: &mut Glyph, width: f64, halign: HAlign) {
        glyph.scale(self.scale);
        glyph.translate(0.0, self.shift);
        glyph.width = width;
        if halign == HAlign::Center {
            align_center(glyph);
        }
    }
}

fn non_empty(glyphs: &[&Glyph]) -> Result<()> {
    if glyphs.is_empty() { Err(FitError::EmptyBatch) } else { Ok(()) }
}
