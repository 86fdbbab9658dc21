// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The full detection pipeline: preprocess → lines → corner groups → ranked
// quadrilaterals → rectified or annotated output image.

use std::borrow::Cow;

use docquad_core::{DetectionOutcome, DetectorConfig, DocquadError, OutputMode, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::annotate::{ColorSource, RandomColors, draw_quadrilaterals, draw_segments};
use crate::cluster::{CornerClusterer, CornerGroup};
use crate::geometry::{LineSegment, Quadrilateral};
use crate::lines::LineExtractor;
use crate::preprocess::{Preprocessor, resize_if_necessary};
use crate::rectify::Rectifier;
use crate::select::rank_quadrilaterals;

/// Everything one detection run found, in working-image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Size of the working image after downscaling.
    pub width: u32,
    pub height: u32,
    pub segments: Vec<LineSegment>,
    pub groups: Vec<CornerGroup>,
    /// Candidate quadrilaterals, largest first.
    pub candidates: Vec<Quadrilateral>,
}

impl Detection {
    pub fn best(&self) -> Option<&Quadrilateral> {
        self.candidates.first()
    }

    pub fn outcome(&self) -> DetectionOutcome {
        if self.segments.is_empty() {
            DetectionOutcome::NoLinesFound
        } else if self.candidates.is_empty() {
            DetectionOutcome::NoQuadrilateralFound
        } else {
            DetectionOutcome::Found
        }
    }
}

/// Locates and flattens a document in a photograph.
///
/// Holds only its configuration, so one detector can be shared across
/// threads and reused for any number of images.
#[derive(Debug, Clone, Default)]
pub struct DocumentDetector {
    config: DetectorConfig,
}

impl DocumentDetector {
    /// Build a detector after checking `config` with
    /// [`DetectorConfig::validate`].
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the geometry stages and report what was found.
    ///
    /// Only an empty image is an error. Finding no lines or no quadrilateral
    /// is reported through [`Detection::outcome`].
    pub fn detect(&self, image: &DynamicImage) -> Result<Detection> {
        self.detect_working(image).map(|(_, detection)| detection)
    }

    /// Detect the document and produce the image requested by `mode`, with
    /// overlay colours drawn from a generator seeded by `annotate.seed`.
    pub fn detect_and_rectify(&self, image: &DynamicImage, mode: OutputMode) -> Result<DynamicImage> {
        let mut colors = RandomColors::new(self.config.annotate.seed);
        self.detect_and_rectify_with(image, mode, &mut colors)
    }

    /// As [`detect_and_rectify`](Self::detect_and_rectify), with overlay
    /// colours supplied by the caller.
    #[instrument(skip(self, image, colors), fields(width = image.width(), height = image.height()))]
    pub fn detect_and_rectify_with(
        &self,
        image: &DynamicImage,
        mode: OutputMode,
        colors: &mut dyn ColorSource,
    ) -> Result<DynamicImage> {
        let (working, detection) = self.detect_working(image)?;
        Ok(self.render(working, &detection, mode, colors))
    }

    /// Produce the output image for `mode` from a finished detection.
    ///
    /// - `Rectify`: the perspective-corrected crop of the best candidate, or
    ///   an unchanged copy of the working image when there is none.
    /// - `ShowQuads`: the working image with every candidate outlined.
    /// - `ShowLines`: the working image with every extracted segment drawn.
    ///
    /// `working` must be the image returned alongside `detection` by
    /// [`detect_working`](Self::detect_working).
    pub fn render(
        &self,
        working: Cow<'_, DynamicImage>,
        detection: &Detection,
        mode: OutputMode,
        colors: &mut dyn ColorSource,
    ) -> DynamicImage {
        let thickness = self.config.annotate.line_thickness;

        let output = match mode {
            OutputMode::Rectify => match detection.best() {
                Some(quad) => Rectifier::new(self.config.rectify.clone()).rectify(&working, quad),
                None => {
                    warn!(outcome = ?detection.outcome(), "No document found; returning working image");
                    working.into_owned()
                }
            },
            OutputMode::ShowQuads => {
                draw_quadrilaterals(&working, &detection.candidates, thickness, colors)
            }
            OutputMode::ShowLines => draw_segments(&working, &detection.segments, thickness, colors),
        };

        info!(
            %mode,
            out_w = output.width(),
            out_h = output.height(),
            "Output image produced"
        );
        output
    }

    /// Run the geometry stages, also returning the (possibly downscaled)
    /// working image every coordinate in the [`Detection`] refers to.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect_working<'a>(
        &self,
        image: &'a DynamicImage,
    ) -> Result<(Cow<'a, DynamicImage>, Detection)> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(DocquadError::EmptyInput { width, height });
        }

        let working = match self.config.preprocess.max_dimension {
            Some(max) => resize_if_necessary(image, max),
            None => Cow::Borrowed(image),
        };
        let (width, height) = (working.width(), working.height());

        let binary = Preprocessor::run(&working, &self.config.preprocess);
        let segments =
            LineExtractor::new(self.config.hough.clone(), self.config.merge.clone()).extract(&binary);
        let groups =
            CornerClusterer::new(self.config.cluster.clone()).cluster(&segments, width, height);
        let candidates = rank_quadrilaterals(&groups);

        let detection = Detection {
            width,
            height,
            segments,
            groups,
            candidates,
        };
        info!(
            outcome = ?detection.outcome(),
            segments = detection.segments.len(),
            groups = detection.groups.len(),
            candidates = detection.candidates.len(),
            "Detection complete"
        );
        Ok((working, detection))
    }
}
