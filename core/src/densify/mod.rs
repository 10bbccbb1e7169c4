//! Frame-to-agent densification
//!
//! This module converts the sparse, variably-sized per-frame agent lists of
//! a scene into a fixed-shape, track-indexed tensor: four parallel channels
//! shaped `[track_capacity, num_frames, 2]` plus an explicit presence mask.
//! The tensor is built once per scene, held immutably, and read by the path
//! matcher, the density estimator, and the visualization adapters.
//!
//! # Channel contract
//! Unset cells retain channel-specific sentinel values (position 1,
//! velocity -1, yaw 2, tag -1) for consumers that expect the raw channel
//! shape. In-crate consumers never test sentinels: presence is carried in a
//! dedicated boolean mask, so a legitimate coordinate that happens to equal
//! a sentinel cannot be misread as an empty cell.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use ndarray::{Array2, Array3, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{map_agent_record, map_frame_record, RawAgent, RawFrame, RecordError};
use crate::scene::{AgentRecord, Frame, IndexInterval, Scene, TrackId, DEFAULT_TRACK_CAPACITY};

/// Sentinel filling unset cells of the position channel.
pub const POSITION_SENTINEL: f64 = 1.0;
/// Sentinel filling unset cells of the velocity channel.
pub const VELOCITY_SENTINEL: f64 = -1.0;
/// Sentinel filling unset cells of the yaw channel.
pub const YAW_SENTINEL: f64 = 2.0;
/// Sentinel filling unset cells of the tag channel.
pub const TAG_SENTINEL: f64 = -1.0;

/// Densification failures. All are fatal data-integrity errors; nothing is
/// retried or clipped.
#[derive(Debug, Error)]
pub enum DensifyError {
    #[error("Scene frame interval {interval} exceeds frame log of length {log_len}")]
    SceneOutOfBounds {
        interval: IndexInterval,
        log_len: usize,
    },

    #[error("Scene agent span {span} exceeds agent log of length {log_len}")]
    AgentSpanOutOfBounds {
        span: IndexInterval,
        log_len: usize,
    },

    #[error("Track id {track_id} out of capacity {capacity}")]
    TrackOutOfRange { track_id: usize, capacity: usize },

    #[error("Malformed raw record: {0}")]
    Record(#[from] RecordError),
}

/// Dense, track-indexed view of one scene.
///
/// Immutable after construction; every accessor takes `&self`, so shared
/// concurrent reads are safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensifiedTensor {
    coordinates: Array3<f64>,
    velocity: Array3<f64>,
    yaws: Array3<f64>,
    tags: Array3<f64>,
    present: Array2<bool>,
    track_capacity: usize,
    num_frames: usize,
    /// Absolute agent-log span covered by this scene's frames.
    agent_span: IndexInterval,
}

/// Owned copy of one track's row across all four channels, shaped
/// `[num_frames, 2]` per channel (yaw and tag use component 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSlice {
    pub track_id: TrackId,
    pub coordinates: Array2<f64>,
    pub velocity: Array2<f64>,
    pub yaws: Array2<f64>,
    pub tags: Array2<f64>,
}

impl DensifiedTensor {
    /// Position channel, `[track_capacity, num_frames, 2]`.
    #[inline]
    pub fn coordinates(&self) -> &Array3<f64> {
        &self.coordinates
    }

    /// Velocity channel, `[track_capacity, num_frames, 2]`.
    #[inline]
    pub fn velocity(&self) -> &Array3<f64> {
        &self.velocity
    }

    /// Yaw channel; only component 0 of the trailing axis is meaningful.
    #[inline]
    pub fn yaws(&self) -> &Array3<f64> {
        &self.yaws
    }

    /// Source-tag channel; only component 0 of the trailing axis is
    /// meaningful. Prefer [`DensifiedTensor::source_index`] over reading
    /// this channel directly.
    #[inline]
    pub fn tags(&self) -> &Array3<f64> {
        &self.tags
    }

    /// Presence mask, `[track_capacity, num_frames]`.
    #[inline]
    pub fn present(&self) -> &Array2<bool> {
        &self.present
    }

    #[inline]
    pub fn track_capacity(&self) -> usize {
        self.track_capacity
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Absolute agent-log span covered by this scene.
    #[inline]
    pub fn agent_span(&self) -> IndexInterval {
        self.agent_span
    }

    /// Whether `(track, frame)` holds observed data.
    #[inline]
    pub fn is_present(&self, track: TrackId, frame: usize) -> bool {
        self.present
            .get((track.as_usize(), frame))
            .copied()
            .unwrap_or(false)
    }

    /// Number of frames in which the track was observed.
    pub fn present_sample_count(&self, track: TrackId) -> usize {
        match track.as_usize() {
            t if t < self.track_capacity => {
                self.present.row(t).iter().filter(|&&p| p).count()
            }
            _ => 0,
        }
    }

    /// Non-owning back-reference into the full agent log for the
    /// observation at `(track, frame)`, if one was recorded. The ego slot
    /// has no backing agent record, so its cells return `None`.
    pub fn source_index(&self, track: TrackId, frame: usize) -> Option<usize> {
        if !self.is_present(track, frame) {
            return None;
        }
        let tag = self.tags[[track.as_usize(), frame, 0]];
        if tag < 0.0 {
            return None;
        }
        Some(tag as usize)
    }

    /// Owned 4-channel copy of one track row, or `None` when the track id
    /// exceeds capacity.
    pub fn track_slice(&self, track: TrackId) -> Option<TrackSlice> {
        let t = track.as_usize();
        if t >= self.track_capacity {
            return None;
        }
        Some(TrackSlice {
            track_id: track,
            coordinates: self.coordinates.index_axis(Axis(0), t).to_owned(),
            velocity: self.velocity.index_axis(Axis(0), t).to_owned(),
            yaws: self.yaws.index_axis(Axis(0), t).to_owned(),
            tags: self.tags.index_axis(Axis(0), t).to_owned(),
        })
    }
}

/// Maps one scene's frame and agent spans out of the raw logs.
///
/// Returns the named-field frame slice in local order, the named-field
/// agent slice, and the absolute agent-log span the slice covers. Frames in
/// the scene must carry monotonically non-decreasing, contiguous agent
/// intervals spanning a single contiguous slice of the agent log.
pub fn map_scene(
    scene: &Scene,
    raw_frames: &[RawFrame],
    raw_agents: &[RawAgent],
) -> Result<(Vec<Frame>, Vec<AgentRecord>, IndexInterval), DensifyError> {
    let frame_interval = scene.frame_index_interval;
    if frame_interval.end > raw_frames.len() || frame_interval.start > frame_interval.end {
        return Err(DensifyError::SceneOutOfBounds {
            interval: frame_interval,
            log_len: raw_frames.len(),
        });
    }

    let frames = raw_frames[frame_interval.indices()]
        .iter()
        .map(map_frame_record)
        .collect::<Result<Vec<Frame>, RecordError>>()?;

    let agent_span = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => IndexInterval::new(
            first.agent_index_interval.start,
            last.agent_index_interval.end,
        ),
        _ => IndexInterval::new(0, 0),
    };
    if agent_span.end > raw_agents.len() || agent_span.start > agent_span.end {
        return Err(DensifyError::AgentSpanOutOfBounds {
            span: agent_span,
            log_len: raw_agents.len(),
        });
    }

    let agents = raw_agents[agent_span.indices()]
        .iter()
        .map(map_agent_record)
        .collect::<Result<Vec<AgentRecord>, RecordError>>()?;

    Ok((frames, agents, agent_span))
}

/// Builder of [`DensifiedTensor`] values.
#[derive(Debug, Clone, Copy)]
pub struct Densifier {
    track_capacity: usize,
}

impl Default for Densifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Densifier {
    #[inline]
    pub fn new() -> Self {
        Self {
            track_capacity: DEFAULT_TRACK_CAPACITY,
        }
    }

    #[inline]
    pub fn with_capacity(track_capacity: usize) -> Self {
        Self { track_capacity }
    }

    /// Densifies one scene out of the raw frame and agent logs.
    pub fn build(
        &self,
        scene: &Scene,
        raw_frames: &[RawFrame],
        raw_agents: &[RawAgent],
    ) -> Result<DensifiedTensor, DensifyError> {
        let (frames, agents, agent_span) = map_scene(scene, raw_frames, raw_agents)?;
        self.densify(&frames, &agents, agent_span)
    }

    /// Densifies an already-mapped scene slice.
    ///
    /// `frames` is the scene's frame slice in local order; `agents` covers
    /// exactly `agent_span` of the full agent log. Writes are idempotent per
    /// `(track, frame)` within the pass; if two observations in the same
    /// frame share a track id the later one wins silently, a known
    /// limitation of the upstream data.
    pub fn densify(
        &self,
        frames: &[Frame],
        agents: &[AgentRecord],
        agent_span: IndexInterval,
    ) -> Result<DensifiedTensor, DensifyError> {
        let num_frames = frames.len();
        let capacity = self.track_capacity;

        let mut coordinates = Array3::from_elem((capacity, num_frames, 2), POSITION_SENTINEL);
        let mut velocity = Array3::from_elem((capacity, num_frames, 2), VELOCITY_SENTINEL);
        let mut yaws = Array3::from_elem((capacity, num_frames, 2), YAW_SENTINEL);
        let mut tags = Array3::from_elem((capacity, num_frames, 2), TAG_SENTINEL);
        let mut present = Array2::from_elem((capacity, num_frames), false);

        for (frame_num, frame) in frames.iter().enumerate() {
            // Ego occupies the reserved track slot 0 every frame.
            coordinates[[0, frame_num, 0]] = frame.ego_translation.x;
            coordinates[[0, frame_num, 1]] = frame.ego_translation.y;
            yaws[[0, frame_num, 0]] = frame.ego_heading();
            present[[0, frame_num]] = true;

            for absolute_index in frame.agent_index_interval.indices() {
                let agent = &agents[absolute_index - agent_span.start];
                let track = agent.track_id.as_usize();
                if track >= capacity {
                    return Err(DensifyError::TrackOutOfRange {
                        track_id: track,
                        capacity,
                    });
                }
                coordinates[[track, frame_num, 0]] = agent.centroid.x;
                coordinates[[track, frame_num, 1]] = agent.centroid.y;
                velocity[[track, frame_num, 0]] = agent.velocity.x;
                velocity[[track, frame_num, 1]] = agent.velocity.y;
                yaws[[track, frame_num, 0]] = agent.yaw;
                tags[[track, frame_num, 0]] = absolute_index as f64;
                present[[track, frame_num]] = true;
            }
        }

        debug!(
            "densified scene: {} frames, {} agent records, capacity {}",
            num_frames,
            agents.len(),
            capacity
        );

        Ok(DensifiedTensor {
            coordinates,
            velocity,
            yaws,
            tags,
            present,
            track_capacity: capacity,
            num_frames,
            agent_span,
        })
    }
}
