//! DENSETRACK Core
//!
//! Frame-to-agent densification for autonomous-driving scene logs: sparse,
//! variably-sized per-frame agent lists are reshaped into a fixed-shape,
//! track-indexed tensor, and trajectory matching plus local neighbor-density
//! estimation are built on top of it.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod densify;
pub mod density;
pub mod loader;
pub mod matching;
pub mod record;
pub mod scene;

#[cfg(test)]
pub(crate) mod testutil;

pub use self::densify::{DensifiedTensor, Densifier, DensifyError, TrackSlice};
pub use self::density::{AgentFilter, DensityError, DensityEstimator, DensityMetric};
pub use self::loader::SceneLoader;
pub use self::matching::find_path_match;
pub use self::record::{map_agent_record, map_frame_record, RawAgent, RawFrame, RecordError};
pub use self::scene::{AgentRecord, Frame, IndexInterval, Scene, TrackId, DEFAULT_TRACK_CAPACITY};
