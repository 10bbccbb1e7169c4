//! Point-cloud extraction for topological analysis
//!
//! The topological-analysis collaborator consumes raw point sets; this
//! module extracts them from the densified position channel, either across
//! all agents present in one frame or across one track's lifetime with the
//! frame index as a third coordinate. Responsibility ends at producing the
//! filtered point set.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use densetrack_core::{DensifiedTensor, TrackId};

/// Positions of every track observed in one frame, ego included. An
/// out-of-range frame yields an empty cloud.
pub fn frame_point_cloud(tensor: &DensifiedTensor, frame: usize) -> Vec<[f64; 2]> {
    if frame >= tensor.num_frames() {
        return Vec::new();
    }
    let coordinates = tensor.coordinates();
    (0..tensor.track_capacity())
        .filter(|&slot| tensor.is_present(TrackId(slot), frame))
        .map(|slot| [coordinates[[slot, frame, 0]], coordinates[[slot, frame, 1]]])
        .collect()
}

/// Frame-stamped positions of one track across the scene, as `[x, y,
/// frame]` triples suitable for a 3D trajectory scatter.
pub fn track_point_cloud(tensor: &DensifiedTensor, track: TrackId) -> Vec<[f64; 3]> {
    let coordinates = tensor.coordinates();
    (0..tensor.num_frames())
        .filter(|&frame| tensor.is_present(track, frame))
        .map(|frame| {
            [
                coordinates[[track.as_usize(), frame, 0]],
                coordinates[[track.as_usize(), frame, 1]],
                frame as f64,
            ]
        })
        .collect()
}
