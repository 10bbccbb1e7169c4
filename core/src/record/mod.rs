//! Raw record mapping
//!
//! The upstream dataset delivers frames and agent observations as
//! positional, array-encoded rows. This module fixes the row layouts and
//! converts them into the named-field records of [`crate::scene`]. The
//! conversion is a pure structural transform: the only failure mode is a
//! field lookup on a row too short to hold it, surfaced to the caller
//! rather than masked.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::{AgentRecord, Frame, IndexInterval, TrackId};

/// Field offsets within a raw frame row:
/// `[ego_tx, ego_ty, r00, r01, r10, r11, agent_start, agent_end]`.
pub mod frame_layout {
    pub const EGO_TX: usize = 0;
    pub const EGO_TY: usize = 1;
    pub const ROT_00: usize = 2;
    pub const ROT_01: usize = 3;
    pub const ROT_10: usize = 4;
    pub const ROT_11: usize = 5;
    pub const AGENT_START: usize = 6;
    pub const AGENT_END: usize = 7;
    pub const WIDTH: usize = 8;
}

/// Field offsets within a raw agent row:
/// `[cx, cy, vx, vy, yaw, ext_x, ext_y, track_id]`.
pub mod agent_layout {
    pub const CENTROID_X: usize = 0;
    pub const CENTROID_Y: usize = 1;
    pub const VELOCITY_X: usize = 2;
    pub const VELOCITY_Y: usize = 3;
    pub const YAW: usize = 4;
    pub const EXTENT_X: usize = 5;
    pub const EXTENT_Y: usize = 6;
    pub const TRACK_ID: usize = 7;
    pub const WIDTH: usize = 8;
}

/// One array-encoded frame row as read from the frame log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFrame(pub Vec<f64>);

/// One array-encoded agent row as read from the agent log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAgent(pub Vec<f64>);

/// Structural extraction failures on raw rows.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Field '{field}' missing from raw record: index {index} out of {len}")]
    MissingField {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Field '{field}' holds non-representable value {value}")]
    MalformedField { field: &'static str, value: f64 },
}

fn field(row: &[f64], index: usize, name: &'static str) -> Result<f64, RecordError> {
    row.get(index).copied().ok_or(RecordError::MissingField {
        field: name,
        index,
        len: row.len(),
    })
}

fn index_field(row: &[f64], index: usize, name: &'static str) -> Result<usize, RecordError> {
    let value = field(row, index, name)?;
    if value < 0.0 || !value.is_finite() {
        return Err(RecordError::MalformedField { field: name, value });
    }
    Ok(value as usize)
}

/// Converts one raw frame row into a named-field [`Frame`].
pub fn map_frame_record(raw: &RawFrame) -> Result<Frame, RecordError> {
    use frame_layout::*;
    let row = raw.0.as_slice();
    Ok(Frame {
        ego_translation: Vector2::new(field(row, EGO_TX, "ego_tx")?, field(row, EGO_TY, "ego_ty")?),
        ego_rotation: Matrix2::new(
            field(row, ROT_00, "rot_00")?,
            field(row, ROT_01, "rot_01")?,
            field(row, ROT_10, "rot_10")?,
            field(row, ROT_11, "rot_11")?,
        ),
        agent_index_interval: IndexInterval::new(
            index_field(row, AGENT_START, "agent_start")?,
            index_field(row, AGENT_END, "agent_end")?,
        ),
    })
}

/// Converts one raw agent row into a named-field [`AgentRecord`].
pub fn map_agent_record(raw: &RawAgent) -> Result<AgentRecord, RecordError> {
    use agent_layout::*;
    let row = raw.0.as_slice();
    Ok(AgentRecord {
        centroid: Vector2::new(
            field(row, CENTROID_X, "centroid_x")?,
            field(row, CENTROID_Y, "centroid_y")?,
        ),
        velocity: Vector2::new(
            field(row, VELOCITY_X, "velocity_x")?,
            field(row, VELOCITY_Y, "velocity_y")?,
        ),
        yaw: field(row, YAW, "yaw")?,
        extent: Vector2::new(
            field(row, EXTENT_X, "extent_x")?,
            field(row, EXTENT_Y, "extent_y")?,
        ),
        track_id: TrackId(index_field(row, TRACK_ID, "track_id")?),
    })
}
