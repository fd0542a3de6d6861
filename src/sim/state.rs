//! Committed game state
//!
//! Everything render/audio layers may read lives here. The store hands out
//! `&GameState` only, so collaborators cannot write fields directly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Connection, EnvironmentFeature, FeatureTag, Node};
use super::generate::LevelLayout;
use super::level::{InteractionMode, Level, LevelPolicy};
use crate::consts::MIN_PLAYER_SCALE;

/// Per-level mechanic counters
///
/// `Default` is the zero value every level starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanics {
    /// Name: bubbles popped
    pub bubbles_popped: u32,
    /// Name: fragments absorbed
    pub fragments_collected: u32,
    /// Chewing/Wind: player scale in [1, max]
    pub player_scale: f32,
    /// Wind: leaf health in [0, 100]
    pub leaf_health: f32,
    /// Sun: rain level in [0, max_rain]
    pub rain_level: f32,
    /// Sun: rain has put the sun out
    pub sun_extinguished: bool,
    /// Language: index of the next pair in the sequence order
    pub sequence_cursor: usize,
}

impl Default for Mechanics {
    fn default() -> Self {
        Self {
            bubbles_popped: 0,
            fragments_collected: 0,
            player_scale: MIN_PLAYER_SCALE,
            leaf_health: 0.0,
            rain_level: 0.0,
            sun_extinguished: false,
            sequence_cursor: 0,
        }
    }
}

/// Player and pointer state written by the render/physics loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub cursor_world_pos: Vec3,
    pub mouse_down: bool,
    pub hovered_node: Option<String>,
    /// Pointer is over any interactive prop
    pub interactive_hover: bool,
    /// Source node of an in-progress drag
    pub dragging_node: Option<String>,
    /// Node the player is currently tethered to
    pub tethered_node: Option<String>,
}

impl PlayerState {
    /// Fresh player standing at `spawn` with the cursor on top of them
    pub fn at(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            cursor_world_pos: spawn,
            mouse_down: false,
            hovered_node: None,
            interactive_hover: false,
            dragging_node: None,
            tethered_node: None,
        }
    }
}

/// Complete committed state of the current level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub level: Level,
    pub mode: InteractionMode,
    /// Cursor into the level's narrative lines
    pub narrative_index: u32,
    pub is_level_complete: bool,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub features: Vec<EnvironmentFeature>,
    /// Required connection order (sequence-validated levels only)
    pub sequence_order: Vec<String>,
    pub mechanics: Mechanics,
    pub player: PlayerState,
    /// Next id suffix for features spawned during play
    next_id: u32,
}

impl GameState {
    /// Initial state for a level: generated entities, zeroed counters
    pub fn fresh(policy: &LevelPolicy, layout: LevelLayout) -> Self {
        Self {
            level: policy.level,
            mode: policy.mode,
            narrative_index: 0,
            is_level_complete: false,
            nodes: layout.nodes,
            connections: Vec::new(),
            features: layout.features,
            sequence_order: layout.sequence_order,
            mechanics: Mechanics::default(),
            player: PlayerState::at(policy.spawn),
            next_id: 0,
        }
    }

    /// Allocate an id for a feature spawned mid-level
    pub fn next_feature_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn feature(&self, id: &str) -> Option<&EnvironmentFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Number of features with the given tag
    pub fn count_features(&self, tag: FeatureTag) -> usize {
        self.features.iter().filter(|f| f.tag() == tag).count()
    }

    /// Ids of all features with the given tag, in scene order
    pub fn feature_ids(&self, tag: FeatureTag) -> Vec<String> {
        self.features
            .iter()
            .filter(|f| f.tag() == tag)
            .map(|f| f.id.clone())
            .collect()
    }

    pub fn has_connection(&self, a: &str, b: &str) -> bool {
        self.connections.iter().any(|c| c.joins(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::FeatureKind;

    #[test]
    fn test_mechanics_zero_value() {
        let m = Mechanics::default();
        assert_eq!(m.player_scale, 1.0);
        assert_eq!(m.leaf_health, 0.0);
        assert_eq!(m.rain_level, 0.0);
        assert_eq!(m.bubbles_popped, 0);
        assert_eq!(m.fragments_collected, 0);
        assert_eq!(m.sequence_cursor, 0);
        assert!(!m.sun_extinguished);
    }

    #[test]
    fn test_fresh_state_places_player_at_spawn() {
        let policy = Level::Wind.policy();
        let layout = LevelLayout {
            features: vec![EnvironmentFeature::new(
                "leaf",
                FeatureKind::WitheredLeaf,
                Vec3::ZERO,
            )],
            ..Default::default()
        };
        let state = GameState::fresh(&policy, layout);
        assert_eq!(state.player.position, policy.spawn);
        assert_eq!(state.player.cursor_world_pos, policy.spawn);
        assert_eq!(state.mode, InteractionMode::Lure);
        assert_eq!(state.count_features(FeatureTag::WitheredLeaf), 1);
        assert!(state.feature("leaf").is_some());
        assert!(state.node("leaf").is_none());
    }

    #[test]
    fn test_feature_ids_are_sequential() {
        let mut state = GameState::fresh(&Level::Name.policy(), LevelLayout::default());
        assert_eq!(state.next_feature_id("fragment"), "fragment-0");
        assert_eq!(state.next_feature_id("fragment"), "fragment-1");
    }
}
