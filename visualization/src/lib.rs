//! DENSETRACK Visualization Adapters
//!
//! Thin, read-only adapters between densified scene tensors and plotting or
//! topological-analysis consumers. Everything here filters unset cells out
//! through the tensor's presence mask and stops at the plot-input contract;
//! no rendering happens in this crate.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod point_cloud;
pub mod series;

pub use self::point_cloud::{frame_point_cloud, track_point_cloud};
pub use self::series::{
    density_series, position_series, speed_series, velocity_series, yaw_series, PointSeries,
    ScalarSeries,
};
