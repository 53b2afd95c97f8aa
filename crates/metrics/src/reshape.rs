//! Ordered per-glyph reshape pipelines for whole source fonts.

use log::{debug, info};
use quillwort_outline::{Font, Glyph};
use serde::{Deserialize, Serialize};

use crate::{Envelope, FitError, Result, fit, resize_width};

/// Metrics a font is drawn at (`shape_as`) or should present (`shape_to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub ascent: i32,
    pub descent: i32,
    pub half_width: i32,
    pub full_width: i32,
}

impl ShapeSpec {
    pub fn envelope(&self, width: i32) -> Envelope {
        Envelope::new(width as f64, self.ascent as f64, self.descent as f64)
    }
}

/// One step of a reshape pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReshapeStep {
    BaselineShift(f64),
    /// Recenter into `width` without scaling, correcting a misdeclared advance.
    ResizeWidth(f64),
    Fit(Envelope),
    Embolden(f64),
    /// Recenter into the committed advance after emboldening.
    RestoreWidth(f64),
}

impl ReshapeStep {
    fn name(&self) -> &'static str {
        match self {
            ReshapeStep::BaselineShift(_) => "baseline-shift",
            ReshapeStep::ResizeWidth(_) => "resize-width",
            ReshapeStep::Fit(_) => "fit",
            ReshapeStep::Embolden(_) => "embolden",
            ReshapeStep::RestoreWidth(_) => "restore-width",
        }
    }
}

/// A validated sequence of reshape steps.
///
/// Emboldening must follow a fit, and a width restore must follow emboldening.
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapePipeline {
    steps: Vec<ReshapeStep>,
}

impl ReshapePipeline {
    pub fn new(steps: Vec<ReshapeStep>) -> Result<Self> {
        let mut fitted = false;
        let mut emboldened = false;
        for step in &steps {
            match step {
                ReshapeStep::Fit(_) => fitted = true,
                ReshapeStep::Embolden(_) if !fitted => {
                    return Err(FitError::StepOrder { step: step.name(), requires: "fit" });
                }
                ReshapeStep::Embolden(_) => emboldened = true,
                ReshapeStep::RestoreWidth(_) if !emboldened => {
                    return Err(FitError::StepOrder { step: step.name(), requires: "embolden" });
                }
                _ => {}
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ReshapeStep] {
        &self.steps
    }

    /// Run every step on `glyph`, drawn against the given font metrics.
    pub fn apply(&self, glyph: &mut Glyph, font_ascent: f64, font_descent: f64) -> Result<()> {
        for step in &self.steps {
            match *step {
                ReshapeStep::BaselineShift(dy) => glyph.translate(0.0, dy),
                ReshapeStep::ResizeWidth(width) | ReshapeStep::RestoreWidth(width) => {
                    resize_width(glyph, width, false, true)?
                }
                ReshapeStep::Fit(target) => {
                    fit(glyph, font_ascent, font_descent, target)?;
                }
                ReshapeStep::Embolden(delta) => glyph.embolden(delta),
            }
        }
        Ok(())
    }
}

/// How glyphs are classified into half- and full-width cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    /// Every glyph is half width.
    Half,
    /// Glyphs wider than half the em are full width.
    ByEm,
}

/// Everything needed to reshape one source font into the target metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReshapePlan {
    pub shape_as: ShapeSpec,
    pub shape_to: ShapeSpec,
    pub baseline_shift: f64,
    pub weight: f64,
    pub width_class: WidthClass,
}

impl ReshapePlan {
    pub fn new(shape_as: ShapeSpec, shape_to: ShapeSpec, width_class: WidthClass) -> Self {
        Self { shape_as, shape_to, baseline_shift: 0.0, weight: 0.0, width_class }
    }

    pub fn with_baseline_shift(mut self, dy: f64) -> Self {
        self.baseline_shift = dy;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// The pipeline for glyphs declared `source_width` wide and bound for `target_width`.
    pub fn pipeline(&self, source_width: i32, target_width: i32) -> Result<ReshapePipeline> {
        let mut steps = Vec::with_capacity(5);
        if self.baseline_shift != 0.0 {
            steps.push(ReshapeStep::BaselineShift(self.baseline_shift));
        }
        steps.push(ReshapeStep::ResizeWidth(source_width as f64));
        steps.push(ReshapeStep::Fit(self.shape_to.envelope(target_width)));
        if self.weight != 0.0 {
            steps.push(ReshapeStep::Embolden(self.weight));
            steps.push(ReshapeStep::RestoreWidth(target_width as f64));
        }
        ReshapePipeline::new(steps)
    }
}

/// Reshape every glyph with a non-zero advance; returns how many were reshaped.
///
/// The font's ascent and descent are first overwritten with the declared
/// `shape_as` metrics, which become the reference for fitting.
pub fn reshape_font(font: &mut Font, plan: &ReshapePlan) -> Result<usize> {
    let original_em = font.em as f64;
    font.ascent = plan.shape_as.ascent;
    font.descent = plan.shape_as.descent;
    font.em = font.ascent + font.descent;
    let (ascent, descent) = (font.ascent as f64, font.descent as f64);

    let half = plan.pipeline(plan.shape_as.half_width, plan.shape_to.half_width)?;
    let full = plan.pipeline(plan.shape_as.full_width, plan.shape_to.full_width)?;

    let mut count = 0;
    for glyph in font.glyphs_mut() {
        let pipeline = match plan.width_class {
            WidthClass::ByEm if glyph.width > original_em / 2.0 => &full,
            _ if glyph.width > 0.0 => &half,
            _ => continue,
        };
        pipeline.apply(glyph, ascent, descent)?;
        count += 1;
    }

    info!("reshaped {count} glyphs (weight {}, baseline shift {})", plan.weight, plan.baseline_shift);
    Ok(count)
}

/// Shear every glyph that produces output by `angle` radians.
pub fn skew_font(font: &mut Font, angle: f64) {
    if angle == 0.0 {
        return;
    }
    let mut count = 0;
    for glyph in font.glyphs_mut().filter(|g| g.is_worth_outputting()) {
        glyph.skew(angle);
        count += 1;
    }
    debug!("skewed {count} glyphs by {:.3} degrees", angle.to_degrees());
}
