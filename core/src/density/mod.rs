//! Local neighbor-density estimation
//!
//! For a chosen track, every frame it was observed in yields the set of
//! edge-to-edge distances to all co-present agents, resolved through the
//! densified tensor's back-references into the agent log. A per-frame
//! density scalar is then reduced from each set: the distance to the k-th
//! nearest neighbor, or the number of neighbors inside a radius. The two
//! reductions are selected by an explicit metric enum rather than by
//! reinterpreting a shared numeric parameter.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::densify::DensifiedTensor;
use crate::scene::{AgentRecord, Frame, TrackId};

/// Agents at or below this speed are treated as stationary under
/// [`AgentFilter::Moving`].
pub const MOVING_SPEED_THRESHOLD: f64 = 1.0;

/// Distance assigned to stationary agents under [`AgentFilter::Moving`],
/// large enough to exclude them from near-neighbor consideration.
pub const STATIONARY_DISTANCE: f64 = 1000.0;

/// Density value reported for frames in which the queried track was not
/// observed.
pub const UNDEFINED_DENSITY: f64 = -1.0;

/// Which co-present agents contribute a real distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentFilter {
    /// Every co-present agent contributes.
    All,
    /// Only agents moving faster than [`MOVING_SPEED_THRESHOLD`] contribute;
    /// the rest are pushed out to [`STATIONARY_DISTANCE`].
    Moving,
}

/// Per-frame reduction applied to the neighbor-distance set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DensityMetric {
    /// Distance to the k-th nearest neighbor (0-indexed into the ascending
    /// distance set, queried agent excluded).
    KthNearest { k: usize },
    /// Number of neighbors strictly closer than `radius`.
    WithinRadius { radius: f64 },
}

/// Density-estimation failures. Propagated, never defaulted.
#[derive(Debug, Error)]
pub enum DensityError {
    #[error("Track id {track_id} out of capacity {capacity}")]
    TrackOutOfRange { track_id: usize, capacity: usize },

    #[error("Neighbor rank {rank} out of range in frame {frame}: {neighbors} neighbors present")]
    RankOutOfRange {
        rank: usize,
        frame: usize,
        neighbors: usize,
    },
}

/// Read-only density estimator over one densified scene.
///
/// `frames` is the scene's frame slice in local order and `agents` covers
/// exactly the tensor's agent span, as produced by
/// [`crate::densify::map_scene`].
#[derive(Debug, Clone, Copy)]
pub struct DensityEstimator<'a> {
    tensor: &'a DensifiedTensor,
    frames: &'a [Frame],
    agents: &'a [AgentRecord],
}

impl<'a> DensityEstimator<'a> {
    pub fn new(tensor: &'a DensifiedTensor, frames: &'a [Frame], agents: &'a [AgentRecord]) -> Self {
        debug_assert_eq!(frames.len(), tensor.num_frames());
        debug_assert_eq!(agents.len(), tensor.agent_span().len());
        Self {
            tensor,
            frames,
            agents,
        }
    }

    /// One density scalar per frame for the queried track.
    ///
    /// Frames in which the track was not observed report
    /// [`UNDEFINED_DENSITY`]. A pure function of the loader state: repeated
    /// calls with identical arguments return identical output.
    pub fn agent_densities(
        &self,
        track: TrackId,
        filter: AgentFilter,
        metric: DensityMetric,
    ) -> Result<Vec<f64>, DensityError> {
        let distances = self.frame_neighbor_distances(track, filter)?;
        let mut densities = vec![UNDEFINED_DENSITY; distances.len()];
        for (frame, entry) in distances.into_iter().enumerate() {
            let Some(mut neighbors) = entry else {
                continue;
            };
            densities[frame] = match metric {
                DensityMetric::KthNearest { k } => {
                    if k >= neighbors.len() {
                        return Err(DensityError::RankOutOfRange {
                            rank: k,
                            frame,
                            neighbors: neighbors.len(),
                        });
                    }
                    neighbors
                        .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                    neighbors[k]
                }
                DensityMetric::WithinRadius { radius } => {
                    neighbors.iter().filter(|&&d| d < radius).count() as f64
                }
            };
        }
        Ok(densities)
    }

    /// Raw per-frame neighbor-distance sets for the queried track.
    ///
    /// `None` marks frames without an observation of the track. The queried
    /// record itself is excluded from its own neighbor set.
    fn frame_neighbor_distances(
        &self,
        track: TrackId,
        filter: AgentFilter,
    ) -> Result<Vec<Option<Vec<f64>>>, DensityError> {
        if track.as_usize() >= self.tensor.track_capacity() {
            return Err(DensityError::TrackOutOfRange {
                track_id: track.as_usize(),
                capacity: self.tensor.track_capacity(),
            });
        }

        let span_start = self.tensor.agent_span().start;
        let mut per_frame = Vec::with_capacity(self.tensor.num_frames());
        for frame_num in 0..self.tensor.num_frames() {
            let Some(queried_index) = self.tensor.source_index(track, frame_num) else {
                per_frame.push(None);
                continue;
            };
            let queried = &self.agents[queried_index - span_start];
            let interval = self.frames[frame_num].agent_index_interval;
            let mut distances = Vec::with_capacity(interval.len().saturating_sub(1));
            for agent_index in interval.indices() {
                if agent_index == queried_index {
                    continue;
                }
                let other = &self.agents[agent_index - span_start];
                let distance = match filter {
                    AgentFilter::All => queried.distance_from_edge(other),
                    AgentFilter::Moving if other.speed() > MOVING_SPEED_THRESHOLD => {
                        queried.distance_from_edge(other)
                    }
                    AgentFilter::Moving => STATIONARY_DISTANCE,
                };
                distances.push(distance);
            }
            per_frame.push(Some(distances));
        }
        Ok(per_frame)
    }
}
