//! Scene data model for trajectory densification
//!
//! This module defines the named-field record types the densification
//! pipeline operates on: scenes as half-open frame ranges, frames carrying
//! ego pose and agent-index intervals, and per-observation agent records
//! keyed by persistent track identity.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Maximum number of persistent track identities a scene may carry.
///
/// Track id 0 is reserved for the ego vehicle; real agents occupy
/// `1..DEFAULT_TRACK_CAPACITY`.
pub const DEFAULT_TRACK_CAPACITY: usize = 3000;

/// Persistent integer identity of a tracked agent, stable across frames.
///
/// Used as the primary key of the densified tensor, preventing accidental
/// mixing with frame indices or agent-log indices.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TrackId(pub usize);

impl TrackId {
    /// The ego vehicle's reserved track slot.
    pub const EGO: TrackId = TrackId(0);

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }

    #[inline]
    pub fn is_ego(self) -> bool {
        self.0 == 0
    }
}

/// Half-open index interval `[start, end)` into a global record log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInterval {
    pub start: usize,
    pub end: usize,
}

impl IndexInterval {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "interval start must not exceed end");
        Self { start, end }
    }

    /// Number of indices covered by the interval.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Iterator over the absolute indices in `[start, end)`.
    #[inline]
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

impl std::fmt::Display for IndexInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Scene descriptor: a contiguous half-open range of frame indices within
/// the global frame log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Frame range `[frame_start, frame_end)` owned by this scene.
    pub frame_index_interval: IndexInterval,
}

impl Scene {
    #[inline]
    pub fn new(frame_start: usize, frame_end: usize) -> Self {
        Self {
            frame_index_interval: IndexInterval::new(frame_start, frame_end),
        }
    }

    /// Number of frames in the scene; fixed for the lifetime of any tensor
    /// densified from it.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frame_index_interval.len()
    }
}

/// One time step of the log: ego pose plus the contiguous span of agent
/// observations recorded at this step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Ego translation in world coordinates.
    pub ego_translation: Vector2<f64>,
    /// Ego rotation as a full 2x2 matrix; heading is recovered from it with
    /// sign intact via [`Frame::ego_heading`].
    pub ego_rotation: Matrix2<f64>,
    /// Agent observations present at this frame, as absolute indices into
    /// the global agent log.
    pub agent_index_interval: IndexInterval,
}

impl Frame {
    /// Signed ego heading in radians, derived from two rotation-matrix
    /// entries. `acos` of the cosine component alone cannot recover the
    /// sign of the angle.
    #[inline]
    pub fn ego_heading(&self) -> f64 {
        self.ego_rotation[(1, 0)].atan2(self.ego_rotation[(0, 0)])
    }
}

/// One (frame, entity) observation from the agent log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// World-frame centroid of the agent's bounding footprint.
    pub centroid: Vector2<f64>,
    /// World-frame velocity.
    pub velocity: Vector2<f64>,
    /// Heading in radians.
    pub yaw: f64,
    /// Physical extent (length, width) of the agent's footprint.
    pub extent: Vector2<f64>,
    /// Persistent identity, stable across frames.
    pub track_id: TrackId,
}

impl AgentRecord {
    /// Velocity magnitude.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Edge-to-edge separation between two agents: centroid distance minus
    /// both half-extent diagonals, floored at zero so overlapping or
    /// touching footprints read as contact.
    pub fn distance_from_edge(&self, other: &AgentRecord) -> f64 {
        let center_distance = (self.centroid - other.centroid).norm();
        let reach = (self.extent.norm() + other.extent.norm()) / 2.0;
        (center_distance - reach).max(0.0)
    }
}
