//! Per-track plot series
//!
//! Each extractor walks one track row of the densified tensor and keeps
//! only observed samples, paired with their local frame indices, so a
//! plotting consumer receives clean `(frame, value)` data with no sentinel
//! filtering left to do.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use densetrack_core::density::UNDEFINED_DENSITY;
use densetrack_core::{DensifiedTensor, TrackId};

/// Scalar samples against local frame index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScalarSeries {
    pub frames: Vec<usize>,
    pub values: Vec<f64>,
}

/// 2D samples against local frame index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSeries {
    pub frames: Vec<usize>,
    pub points: Vec<[f64; 2]>,
}

impl ScalarSeries {
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl PointSeries {
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn observed_frames(tensor: &DensifiedTensor, track: TrackId) -> Vec<usize> {
    (0..tensor.num_frames())
        .filter(|&frame| tensor.is_present(track, frame))
        .collect()
}

/// Observed centroid positions of one track.
pub fn position_series(tensor: &DensifiedTensor, track: TrackId) -> PointSeries {
    let frames = observed_frames(tensor, track);
    let coordinates = tensor.coordinates();
    let points = frames
        .iter()
        .map(|&frame| {
            [
                coordinates[[track.as_usize(), frame, 0]],
                coordinates[[track.as_usize(), frame, 1]],
            ]
        })
        .collect();
    PointSeries { frames, points }
}

/// Observed velocity vectors of one track.
pub fn velocity_series(tensor: &DensifiedTensor, track: TrackId) -> PointSeries {
    let frames = observed_frames(tensor, track);
    let velocity = tensor.velocity();
    let points = frames
        .iter()
        .map(|&frame| {
            [
                velocity[[track.as_usize(), frame, 0]],
                velocity[[track.as_usize(), frame, 1]],
            ]
        })
        .collect();
    PointSeries { frames, points }
}

/// Observed yaw angles of one track.
pub fn yaw_series(tensor: &DensifiedTensor, track: TrackId) -> ScalarSeries {
    let frames = observed_frames(tensor, track);
    let yaws = tensor.yaws();
    let values = frames
        .iter()
        .map(|&frame| yaws[[track.as_usize(), frame, 0]])
        .collect();
    ScalarSeries { frames, values }
}

/// Observed speed (velocity magnitude) of one track.
pub fn speed_series(tensor: &DensifiedTensor, track: TrackId) -> ScalarSeries {
    let frames = observed_frames(tensor, track);
    let velocity = tensor.velocity();
    let values = frames
        .iter()
        .map(|&frame| {
            let vx = velocity[[track.as_usize(), frame, 0]];
            let vy = velocity[[track.as_usize(), frame, 1]];
            vx.hypot(vy)
        })
        .collect();
    ScalarSeries { frames, values }
}

/// Defined samples of a per-frame density output, as produced by
/// [`densetrack_core::SceneLoader::agent_densities`]. Frames reported as
/// undefined are dropped.
pub fn density_series(densities: &[f64]) -> ScalarSeries {
    let mut series = ScalarSeries::default();
    for (frame, &value) in densities.iter().enumerate() {
        if value != UNDEFINED_DENSITY {
            series.frames.push(frame);
            series.values.push(value);
        }
    }
    series
}
