//! Shared synthetic-log builders for module tests.

use crate::record::{agent_layout, frame_layout, RawAgent, RawFrame};

/// Raw frame row with the given ego pose and absolute agent interval.
pub(crate) fn raw_frame(tx: f64, ty: f64, heading: f64, agents: (usize, usize)) -> RawFrame {
    let mut row = vec![0.0; frame_layout::WIDTH];
    row[frame_layout::EGO_TX] = tx;
    row[frame_layout::EGO_TY] = ty;
    row[frame_layout::ROT_00] = heading.cos();
    row[frame_layout::ROT_01] = -heading.sin();
    row[frame_layout::ROT_10] = heading.sin();
    row[frame_layout::ROT_11] = heading.cos();
    row[frame_layout::AGENT_START] = agents.0 as f64;
    row[frame_layout::AGENT_END] = agents.1 as f64;
    RawFrame(row)
}

/// Raw agent row with a deterministic yaw and a 4x2 footprint.
pub(crate) fn raw_agent(track: usize, x: f64, y: f64, vx: f64, vy: f64) -> RawAgent {
    let mut row = vec![0.0; agent_layout::WIDTH];
    row[agent_layout::CENTROID_X] = x;
    row[agent_layout::CENTROID_Y] = y;
    row[agent_layout::VELOCITY_X] = vx;
    row[agent_layout::VELOCITY_Y] = vy;
    row[agent_layout::YAW] = 0.1 * track as f64;
    row[agent_layout::EXTENT_X] = 4.0;
    row[agent_layout::EXTENT_Y] = 2.0;
    row[agent_layout::TRACK_ID] = track as f64;
    RawAgent(row)
}

/// Raw agent row with explicit footprint extent.
pub(crate) fn raw_agent_with_extent(
    track: usize,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    extent: (f64, f64),
) -> RawAgent {
    let mut row = raw_agent(track, x, y, vx, vy).0;
    row[agent_layout::EXTENT_X] = extent.0;
    row[agent_layout::EXTENT_Y] = extent.1;
    RawAgent(row)
}
