// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detector configuration. Every tunable constant of the pipeline lives here;
// length-like Hough parameters are fractions of the image's minor dimension.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocquadError, Result};
use crate::types::{EdgeMap, IntersectionRule};

/// Complete configuration of one detection pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub preprocess: PreprocessConfig,
    pub hough: HoughConfig,
    pub merge: MergeConfig,
    pub cluster: ClusterConfig,
    pub rectify: RectifyConfig,
    pub annotate: AnnotateConfig,
}

/// Steps that turn the photograph into a binary edge image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Downscale so neither side exceeds this many pixels. `None` keeps the
    /// input size.
    pub max_dimension: Option<u32>,
    /// Gaussian kernel size (OpenCV convention). 0 or 1 disables the blur.
    pub blur_kernel: u32,
    pub edge_map: EdgeMap,
    /// Square dilation kernel size in pixels. 0 disables.
    pub dilate_size: u32,
    /// Square erosion kernel size in pixels. 0 disables.
    pub erode_size: u32,
    /// Final erosion kernel as a fraction of the image's major dimension.
    pub final_erode_ratio: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_dimension: Some(1280),
            blur_kernel: 9,
            edge_map: EdgeMap::default(),
            dilate_size: 20,
            erode_size: 10,
            final_erode_ratio: 0.01,
        }
    }
}

/// Probabilistic Hough transform parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Distance resolution of the accumulator, in pixels.
    pub rho: f64,
    /// Angle resolution of the accumulator, in degrees.
    pub theta_degrees: f64,
    /// Minimum accumulator votes before a line is traced.
    pub vote_threshold: u32,
    /// Minimum segment length as a fraction of the minor dimension.
    pub min_length_ratio: f64,
    /// Maximum gap bridged along a segment, as a fraction of the minor dimension.
    pub max_gap_ratio: f64,
    /// Seed for the pixel visiting order.
    pub seed: u64,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            rho: 2.0,
            theta_degrees: 2.0,
            vote_threshold: 50,
            min_length_ratio: 0.5,
            max_gap_ratio: 0.1,
            seed: 0,
        }
    }
}

/// Collinear segment merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub enabled: bool,
    /// Largest |angle| (radians) between two mergeable segments.
    pub angle_tolerance: f64,
    /// Largest segment distance (pixels) for two segments to be neighbours.
    pub neighbour_distance: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            angle_tolerance: std::f64::consts::PI / 36.0,
            neighbour_distance: 5.0,
        }
    }
}

/// Pairwise intersection clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Slack (pixels) around each segment's bounding box within which an
    /// intersection still counts as lying on the segment.
    pub padding: f64,
    pub rule: IntersectionRule,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            padding: 5.0,
            rule: IntersectionRule::default(),
        }
    }
}

/// Perspective rectification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyConfig {
    /// Rotate the destination corners by 180° when the image is portrait.
    pub rotate_portrait: bool,
    /// If set, channels brighter than this become pure white after warping.
    pub whiten_threshold: Option<u8>,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            rotate_portrait: true,
            whiten_threshold: None,
        }
    }
}

/// Diagnostic overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// Stroke width of overlay lines, in pixels.
    pub line_thickness: u32,
    /// Seed for the random overlay palette.
    pub seed: u64,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            line_thickness: 3,
            seed: 0,
        }
    }
}

impl DetectorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let hough = &self.hough;
        if !(hough.rho > 0.0) {
            return Err(DocquadError::Config(format!(
                "hough.rho must be positive, got {}",
                hough.rho
            )));
        }
        if !(hough.theta_degrees > 0.0 && hough.theta_degrees <= 90.0) {
            return Err(DocquadError::Config(format!(
                "hough.theta_degrees must be in (0, 90], got {}",
                hough.theta_degrees
            )));
        }
        if hough.vote_threshold == 0 {
            return Err(DocquadError::Config(
                "hough.vote_threshold must be at least 1".into(),
            ));
        }
        for (name, ratio) in [
            ("hough.min_length_ratio", hough.min_length_ratio),
            ("hough.max_gap_ratio", hough.max_gap_ratio),
            ("preprocess.final_erode_ratio", self.preprocess.final_erode_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(DocquadError::Config(format!(
                    "{name} must be in [0, 1], got {ratio}"
                )));
            }
        }
        if let Some(0) = self.preprocess.max_dimension {
            return Err(DocquadError::Config(
                "preprocess.max_dimension must be positive".into(),
            ));
        }
        if let EdgeMap::AdaptiveThreshold { block_size, .. } = self.preprocess.edge_map {
            if block_size < 3 || block_size % 2 == 0 {
                return Err(DocquadError::Config(format!(
                    "adaptive threshold block_size must be odd and >= 3, got {block_size}"
                )));
            }
        }
        if !(self.merge.angle_tolerance >= 0.0) || !(self.merge.neighbour_distance >= 0.0) {
            return Err(DocquadError::Config(
                "merge tolerances must be non-negative".into(),
            ));
        }
        if !(self.cluster.padding >= 0.0) {
            return Err(DocquadError::Config(
                "cluster.padding must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        DetectorConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = DetectorConfig::from_json_str(r#"{ "hough": { "vote_threshold": 80 } }"#)
            .expect("should parse");
        assert_eq!(config.hough.vote_threshold, 80);
        assert_eq!(config.hough.rho, 2.0);
        assert_eq!(config.preprocess.max_dimension, Some(1280));
        assert!(config.merge.enabled);
    }

    #[test]
    fn edge_map_is_tagged() {
        let config = DetectorConfig::from_json_str(
            r#"{ "preprocess": { "edge_map": { "kind": "canny", "low": 40.0, "high": 120.0 } } }"#,
        )
        .expect("should parse");
        assert_eq!(
            config.preprocess.edge_map,
            EdgeMap::Canny {
                low: 40.0,
                high: 120.0
            }
        );
    }

    #[test]
    fn even_block_size_rejected() {
        let mut config = DetectorConfig::default();
        config.preprocess.edge_map = EdgeMap::AdaptiveThreshold {
            block_size: 84,
            constant: 10.0,
        };
        assert!(matches!(config.validate(), Err(DocquadError::Config(_))));
    }

    #[test]
    fn zero_rho_rejected() {
        let json = r#"{ "hough": { "rho": 0.0 } }"#;
        assert!(matches!(
            DetectorConfig::from_json_str(json),
            Err(DocquadError::Config(_))
        ));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            DetectorConfig::from_json_str("{ not json"),
            Err(DocquadError::Serialization(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "cluster": {{ "padding": 10.0, "rule": "any_sign" }} }}"#)
            .expect("write config");

        let config = DetectorConfig::load(file.path()).expect("should load");
        assert_eq!(config.cluster.padding, 10.0);
        assert_eq!(config.cluster.rule, IntersectionRule::AnySign);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = DetectorConfig::load("/definitely/not/here/docquad.json");
        assert!(matches!(result, Err(DocquadError::Io(_))));
    }
}
