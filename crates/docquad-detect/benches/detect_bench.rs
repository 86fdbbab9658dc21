// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the docquad-detect pipeline on synthetic pages.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use docquad_core::{DetectorConfig, OutputMode};
use docquad_detect::DocumentDetector;
use docquad_detect::preprocess::Preprocessor;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 640x480 photo-like page: a light slightly skewed sheet on a dark desk.
fn synthetic_page() -> DynamicImage {
    let (width, height) = (640u32, 480u32);
    let img = RgbImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as f64, y as f64);
        let left = 90.0 + (y - 60.0) * 0.05;
        let right = 560.0 - (y - 60.0) * 0.03;
        let inside = y >= 60.0 && y <= 420.0 && x >= left && x <= right;
        if inside {
            Rgb([235, 232, 225])
        } else {
            Rgb([40, 38, 36])
        }
    });
    DynamicImage::ImageRgb8(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Preprocessing alone: blur, adaptive threshold, and morphology.
fn bench_preprocess(c: &mut Criterion) {
    let page = synthetic_page();
    let config = DetectorConfig::default();

    c.bench_function("preprocess (640x480)", |b| {
        b.iter(|| black_box(Preprocessor::run(black_box(&page), &config.preprocess)));
    });
}

/// The full pipeline in rectify mode, including the bicubic warp.
fn bench_detect_and_rectify(c: &mut Criterion) {
    let page = synthetic_page();
    let detector = DocumentDetector::default();

    c.bench_function("detect_and_rectify (640x480)", |b| {
        b.iter(|| {
            let result = detector.detect_and_rectify(black_box(&page), OutputMode::Rectify);
            black_box(result.ok());
        });
    });
}

criterion_group!(benches, bench_preprocess, bench_detect_and_rectify);
criterion_main!(benches);
