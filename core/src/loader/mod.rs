//! Scene loading facade
//!
//! A [`SceneLoader`] maps one scene's spans out of the raw frame and agent
//! logs, densifies them once at construction, and holds the result
//! immutably for the lifetime of the instance. Path matching and density
//! estimation are pure reads over that state; concurrent callers may share
//! a loader freely.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::info;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::densify::{map_scene, DensifiedTensor, Densifier, DensifyError, TrackSlice};
use crate::density::{AgentFilter, DensityEstimator, DensityError, DensityMetric};
use crate::matching;
use crate::record::{RawAgent, RawFrame};
use crate::scene::{AgentRecord, Frame, Scene, TrackId};

/// One scene's worth of mapped records plus its densified tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneLoader {
    scene: Scene,
    /// Scene frame slice in local order; index `i` is tensor frame `i`.
    frames: Vec<Frame>,
    /// Mapped copy of the agent-log span the scene covers. Tensor tags
    /// back-reference into this span by absolute log index.
    agents: Vec<AgentRecord>,
    tensor: DensifiedTensor,
}

impl SceneLoader {
    /// Maps and densifies one scene with the default track capacity.
    pub fn new(
        scene: Scene,
        raw_frames: &[RawFrame],
        raw_agents: &[RawAgent],
    ) -> Result<Self, DensifyError> {
        Self::with_densifier(scene, raw_frames, raw_agents, Densifier::new())
    }

    /// Maps and densifies one scene with an explicitly configured densifier.
    pub fn with_densifier(
        scene: Scene,
        raw_frames: &[RawFrame],
        raw_agents: &[RawAgent],
        densifier: Densifier,
    ) -> Result<Self, DensifyError> {
        let (frames, agents, agent_span) = map_scene(&scene, raw_frames, raw_agents)?;
        let tensor = densifier.densify(&frames, &agents, agent_span)?;
        info!(
            "scene loader ready: frames {}, agent span {}",
            scene.frame_index_interval, agent_span
        );
        Ok(Self {
            scene,
            frames,
            agents,
            tensor,
        })
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene's frames in local order.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Mapped agent records covering the scene's agent span.
    #[inline]
    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    /// The densified tensor built at construction.
    #[inline]
    pub fn tensor(&self) -> &DensifiedTensor {
        &self.tensor
    }

    /// Every track whose trajectory visits both query points; see
    /// [`matching::find_path_match`].
    pub fn find_path_match(&self, start: Vector2<f64>, end: Vector2<f64>) -> Vec<TrackSlice> {
        matching::find_path_match(&self.tensor, start, end)
    }

    /// Per-frame neighbor-density scalars for one track; see
    /// [`DensityEstimator::agent_densities`].
    pub fn agent_densities(
        &self,
        track: TrackId,
        filter: AgentFilter,
        metric: DensityMetric,
    ) -> Result<Vec<f64>, DensityError> {
        DensityEstimator::new(&self.tensor, &self.frames, &self.agents)
            .agent_densities(track, filter, metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::densify::{POSITION_SENTINEL, TAG_SENTINEL, VELOCITY_SENTINEL, YAW_SENTINEL};
    use crate::testutil::{raw_agent, raw_frame};
    use approx::assert_relative_eq;

    /// 30-frame scene with a global frame log offset: the scene covers
    /// frames [4, 34) of a longer log. Track 3 drives the diagonal from
    /// (0,0) to (10,10); track 6 shadows it at a fixed offset.
    fn offset_scene() -> (Scene, Vec<RawFrame>, Vec<RawAgent>) {
        let mut frames = Vec::new();
        let mut agents = Vec::new();
        // Four leading frames outside the scene, each with one agent the
        // scene must never touch.
        for _ in 0..4 {
            let begin = agents.len();
            agents.push(raw_agent(11, -99.0, -99.0, 0.0, 0.0));
            frames.push(raw_frame(0.0, 0.0, 0.0, (begin, agents.len())));
        }
        let scene_frames = 30;
        for i in 0..scene_frames {
            let begin = agents.len();
            let t = i as f64 / (scene_frames - 1) as f64;
            agents.push(raw_agent(3, 10.0 * t, 10.0 * t, 1.4, 1.4));
            agents.push(raw_agent(6, 10.0 * t + 2.0, 10.0 * t, 1.4, 1.4));
            frames.push(raw_frame(200.0 + i as f64, 200.0, 0.1, (begin, agents.len())));
        }
        (Scene::new(4, 34), frames, agents)
    }

    fn loader() -> SceneLoader {
        let (scene, frames, agents) = offset_scene();
        SceneLoader::with_densifier(scene, &frames, &agents, Densifier::with_capacity(32)).unwrap()
    }

    #[test]
    fn frame_dimension_equals_scene_interval() {
        let loader = loader();
        assert_eq!(loader.tensor().num_frames(), 30);
        assert_eq!(loader.frames().len(), 30);
    }

    #[test]
    fn channels_round_trip_source_agents() {
        let loader = loader();
        let tensor = loader.tensor();
        for frame in 0..tensor.num_frames() {
            let index = tensor.source_index(TrackId(3), frame).unwrap();
            let source = &loader.agents()[index - tensor.agent_span().start];
            assert_relative_eq!(tensor.coordinates()[[3, frame, 0]], source.centroid.x);
            assert_relative_eq!(tensor.coordinates()[[3, frame, 1]], source.centroid.y);
            assert_relative_eq!(tensor.velocity()[[3, frame, 0]], source.velocity.x);
            assert_relative_eq!(tensor.yaws()[[3, frame, 0]], source.yaw);
        }
    }

    #[test]
    fn ego_slot_is_never_overwritten() {
        let loader = loader();
        let tensor = loader.tensor();
        for frame in 0..tensor.num_frames() {
            assert!(tensor.is_present(TrackId::EGO, frame));
            assert_relative_eq!(tensor.coordinates()[[0, frame, 0]], 200.0 + frame as f64);
            assert_eq!(tensor.source_index(TrackId::EGO, frame), None);
        }
    }

    #[test]
    fn untracked_slot_holds_sentinels() {
        let loader = loader();
        let tensor = loader.tensor();
        // Track 11 only exists outside the scene's frame range.
        for frame in 0..tensor.num_frames() {
            assert_eq!(tensor.coordinates()[[11, frame, 0]], POSITION_SENTINEL);
            assert_eq!(tensor.velocity()[[11, frame, 0]], VELOCITY_SENTINEL);
            assert_eq!(tensor.yaws()[[11, frame, 0]], YAW_SENTINEL);
            assert_eq!(tensor.tags()[[11, frame, 0]], TAG_SENTINEL);
        }
    }

    #[test]
    fn path_match_returns_visiting_track() {
        let loader = loader();
        let matched = loader.find_path_match(Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0));
        // Track 6 starts at (2,0), squared distance 4 from the origin, so it
        // matches as well; track 3 must come first in track-id order.
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].track_id, TrackId(3));
        assert_eq!(matched[1].track_id, TrackId(6));
        assert_eq!(
            matched[0].yaws,
            loader.tensor().track_slice(TrackId(3)).unwrap().yaws
        );

        let none = loader.find_path_match(Vector2::new(90.0, 0.0), Vector2::new(0.0, 90.0));
        assert!(none.is_empty());
    }

    #[test]
    fn density_queries_are_pure() {
        let loader = loader();
        let metric = DensityMetric::KthNearest { k: 0 };
        let first = loader
            .agent_densities(TrackId(3), AgentFilter::All, metric)
            .unwrap();
        let second = loader
            .agent_densities(TrackId(3), AgentFilter::All, metric)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 30);
        // Track 6 shadows track 3 at centroid offset 2 with 4x2 footprints:
        // edge distance 2 - (sqrt(20)/2 + sqrt(20)/2) < 0, floored to 0.
        assert!(first.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn track_slices_serialize() {
        let loader = loader();
        let slice = loader.tensor().track_slice(TrackId(3)).unwrap();
        let json = serde_json::to_string(&slice).unwrap();
        let back: TrackSlice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slice);
    }
}
