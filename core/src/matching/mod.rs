//! Trajectory path matching
//!
//! Scans the densified position channel for tracks whose trajectory passes
//! near two query points. Each track is scanned independently, so the scan
//! is parallelized across track slots; matched tracks are returned in
//! track-id order either way.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use nalgebra::Vector2;
use rayon::prelude::*;

use crate::densify::{DensifiedTensor, TrackSlice};
use crate::scene::TrackId;

/// A track must hold strictly more observed samples than this to be
/// considered; shorter tracks are treated as noise or ghost detections.
pub const MIN_TRACK_SAMPLES: usize = 20;

/// Squared Euclidean radius within which a sample counts as visiting a
/// query point.
pub const MATCH_RADIUS_SQ: f64 = 10.0;

/// Finds every track whose trajectory visits both `start` and `end`.
///
/// Samples are scanned in frame order; the scan of a track stops at its
/// first `end` hit, so a `start` hit in a later frame is never considered.
/// Returns the full 4-channel slice of each matched track, in track-id
/// order. A query no track satisfies yields an empty vector, not an error.
pub fn find_path_match(
    tensor: &DensifiedTensor,
    start: Vector2<f64>,
    end: Vector2<f64>,
) -> Vec<TrackSlice> {
    let coordinates = tensor.coordinates();
    (0..tensor.track_capacity())
        .into_par_iter()
        .filter_map(|slot| {
            let track = TrackId(slot);
            if tensor.present_sample_count(track) <= MIN_TRACK_SAMPLES {
                return None;
            }
            let mut visited_start = false;
            let mut visited_end = false;
            for frame in 0..tensor.num_frames() {
                if !tensor.is_present(track, frame) {
                    continue;
                }
                let sample = Vector2::new(
                    coordinates[[slot, frame, 0]],
                    coordinates[[slot, frame, 1]],
                );
                if (sample - start).norm_squared() < MATCH_RADIUS_SQ {
                    visited_start = true;
                }
                if (sample - end).norm_squared() < MATCH_RADIUS_SQ {
                    visited_end = true;
                    break;
                }
            }
            if visited_start && visited_end {
                tensor.track_slice(track)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::densify::Densifier;
    use crate::record::{RawAgent, RawFrame};
    use crate::scene::Scene;
    use crate::testutil::{raw_agent, raw_frame};

    /// 25-frame scene: track 1 runs the diagonal from (0,0) to (12,12),
    /// track 2 exists for only 5 frames near the origin, ego idles far away.
    fn diagonal_scene() -> (Scene, Vec<RawFrame>, Vec<RawAgent>) {
        let num_frames = 25;
        let mut frames = Vec::new();
        let mut agents = Vec::new();
        for i in 0..num_frames {
            let begin = agents.len();
            let t = i as f64 / (num_frames - 1) as f64;
            agents.push(raw_agent(1, 12.0 * t, 12.0 * t, 1.0, 1.0));
            if i < 5 {
                agents.push(raw_agent(2, 0.5, 0.5, 0.0, 0.0));
            }
            frames.push(raw_frame(500.0, 500.0, 0.0, (begin, agents.len())));
        }
        (Scene::new(0, num_frames), frames, agents)
    }

    #[test]
    fn matches_track_visiting_both_points() {
        let (scene, frames, agents) = diagonal_scene();
        let tensor = Densifier::with_capacity(8).build(&scene, &frames, &agents).unwrap();
        let matched = find_path_match(&tensor, Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].track_id, TrackId(1));
        assert_eq!(
            matched[0].coordinates,
            tensor.track_slice(TrackId(1)).unwrap().coordinates
        );
    }

    #[test]
    fn unvisited_points_yield_empty_result() {
        let (scene, frames, agents) = diagonal_scene();
        let tensor = Densifier::with_capacity(8).build(&scene, &frames, &agents).unwrap();
        let matched =
            find_path_match(&tensor, Vector2::new(-50.0, 0.0), Vector2::new(0.0, -50.0));
        assert!(matched.is_empty());
    }

    #[test]
    fn short_tracks_are_filtered_out() {
        let (scene, frames, agents) = diagonal_scene();
        let tensor = Densifier::with_capacity(8).build(&scene, &frames, &agents).unwrap();
        // Track 2 sits within radius of both query points but has 5 samples.
        let matched = find_path_match(&tensor, Vector2::new(0.5, 0.5), Vector2::new(0.5, 0.5));
        assert!(matched.iter().all(|slice| slice.track_id != TrackId(2)));
    }

    #[test]
    fn start_hit_after_end_hit_is_not_a_match() {
        // Track 1 visits `end` early and `start` only afterwards; the scan
        // stops at the end hit, so the track must not match.
        let num_frames = 25;
        let mut frames = Vec::new();
        let mut agents = Vec::new();
        for i in 0..num_frames {
            let begin = agents.len();
            let t = i as f64 / (num_frames - 1) as f64;
            // Runs from (30,30) down to (-6,-6): passes (10,10) before (0,0).
            agents.push(raw_agent(1, 30.0 - 36.0 * t, 30.0 - 36.0 * t, -1.5, -1.5));
            frames.push(raw_frame(500.0, 500.0, 0.0, (begin, agents.len())));
        }
        let scene = Scene::new(0, num_frames);
        let tensor = Densifier::with_capacity(8).build(&scene, &frames, &agents).unwrap();
        let matched = find_path_match(&tensor, Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0));
        assert!(matched.is_empty());
    }
}
