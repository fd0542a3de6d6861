//! Store actions
//!
//! Every mutation collaborators may perform. Invalid actions are silent
//! no-ops on committed state; the return value says whether anything changed
//! (and, for connections, why an attempt was refused).

use std::collections::HashSet;

use glam::Vec3;
use rand::Rng;

use super::entity::{Connection, Emotion, EnvironmentFeature, FeatureKind, FeatureTag};
use super::event::{GameEvent, RejectReason};
use super::level::Level;
use super::store::GameStore;
use crate::consts::*;
use crate::planar_distance;

/// Outcome of [`GameStore::complete_connection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionResult {
    Accepted { level_complete: bool },
    Rejected(RejectReason),
}

impl ConnectionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ConnectionResult::Accepted { .. })
    }
}

// === Frame-loop inputs ===
impl GameStore {
    pub fn set_cursor_world_pos(&mut self, pos: Vec3) {
        self.state_mut().player.cursor_world_pos = pos;
    }

    pub fn update_player_pos(&mut self, pos: Vec3) {
        self.state_mut().player.position = pos;
    }

    /// Also: the first press on the Prologue starts its narrative
    pub fn set_mouse_down(&mut self, down: bool) {
        self.state_mut().player.mouse_down = down;

        let state = self.state();
        if down && state.level == Level::Prologue && state.narrative_index == 0 {
            self.advance_narrative();
        }
    }

    pub fn set_hovered_node(&mut self, id: Option<&str>) {
        self.state_mut().player.hovered_node = id.map(str::to_string);
    }

    pub fn set_interactive_hover(&mut self, hover: bool) {
        self.state_mut().player.interactive_hover = hover;
    }
}

// === Connections ===
impl GameStore {
    /// Begin dragging a connection out of node `id`
    pub fn start_drag_connection(&mut self, id: &str) -> bool {
        if self.state().node(id).is_none() {
            log::debug!("Drag from unknown node {}", id);
            return false;
        }
        self.state_mut().player.dragging_node = Some(id.to_string());
        true
    }

    pub fn cancel_drag(&mut self) {
        self.state_mut().player.dragging_node = None;
    }

    /// Tether the player to a node (or release with `None`)
    pub fn set_tethered_node(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.state().node(id).is_none() => false,
            Some(id) => {
                self.state_mut().player.tethered_node = Some(id.to_string());
                true
            }
            None => {
                self.state_mut().player.tethered_node = None;
                true
            }
        }
    }

    /// Try to connect the dragged (or else tethered) node to `target`
    pub fn complete_connection(&mut self, target: &str) -> ConnectionResult {
        // Every attempt ends the drag
        let player = &mut self.state_mut().player;
        let dragged = player.dragging_node.take();
        player.hovered_node = None;

        let (source, via_tether) = match dragged {
            Some(id) => (id, false),
            None => match &self.state().player.tethered_node {
                Some(id) => (id.clone(), true),
                None => return self.reject(RejectReason::NoSource),
            },
        };

        if let Err(reason) = self.validate_connection(&source, target) {
            return self.reject(reason);
        }

        // Commit
        let state = self.state_mut();
        state.connections.push(Connection::new(&source, target));
        for node in state.nodes.iter_mut() {
            if node.id == source || node.id == target {
                node.connected = true;
            }
        }
        let first_connection = state.connections.len() == 1;
        let sequenced = self.policy().sequenced;
        if sequenced {
            self.state_mut().mechanics.sequence_cursor += 1;
        }
        if via_tether {
            self.state_mut().player.tethered_node = Some(target.to_string());
        }

        log::debug!("Connected {} <-> {}", source, target);
        self.emit(GameEvent::ConnectionMade {
            a: source,
            b: target.to_string(),
        });

        let level_complete = if self.all_nodes_covered() {
            self.mark_complete();
            true
        } else {
            if sequenced || via_tether {
                if first_connection {
                    let checkpoint = self.policy().narrative.first_connection;
                    match checkpoint {
                        Some(checkpoint) => self.jump_narrative(checkpoint),
                        None => self.advance_narrative(),
                    };
                }
            } else {
                self.advance_narrative();
            }
            false
        };

        ConnectionResult::Accepted { level_complete }
    }

    fn validate_connection(&self, source: &str, target: &str) -> Result<(), RejectReason> {
        let state = self.state();
        if source == target {
            return Err(RejectReason::SelfLoop);
        }
        if state.node(source).is_none() || state.node(target).is_none() {
            return Err(RejectReason::UnknownNode);
        }
        if state.has_connection(source, target) {
            return Err(RejectReason::Duplicate);
        }
        if self.policy().sequenced {
            let cursor = state.mechanics.sequence_cursor;
            let expected = (
                state.sequence_order.get(cursor),
                state.sequence_order.get(cursor + 1),
            );
            match expected {
                (Some(a), Some(b)) if Connection::new(a, b).joins(source, target) => {}
                _ => return Err(RejectReason::OutOfSequence),
            }
        }
        Ok(())
    }

    fn reject(&mut self, reason: RejectReason) -> ConnectionResult {
        log::debug!("Connection rejected: {:?}", reason);
        self.emit(GameEvent::ConnectionRejected(reason));
        ConnectionResult::Rejected(reason)
    }

    /// Every node id appears in at least one connection
    fn all_nodes_covered(&self) -> bool {
        let state = self.state();
        if state.nodes.is_empty() {
            return false;
        }
        let covered: HashSet<&str> = state
            .connections
            .iter()
            .flat_map(|c| {
                let (a, b) = c.ends();
                [a, b]
            })
            .collect();
        state.nodes.iter().all(|n| covered.contains(n.id.as_str()))
    }
}

// === Per-level mechanics ===
impl GameStore {
    /// Burst a bubble into fragments carrying the same glyph
    pub fn pop_bubble(&mut self, id: &str) -> bool {
        let Some(idx) = self
            .state()
            .features
            .iter()
            .position(|f| f.id == id && f.tag() == FeatureTag::Bubble)
        else {
            return false;
        };

        let bubble = self.state_mut().features.remove(idx);
        let glyph = match &bubble.kind {
            FeatureKind::Bubble { glyph } => glyph.clone(),
            _ => String::new(),
        };

        for _ in 0..FRAGMENTS_PER_BUBBLE {
            let rng = self.rng();
            let offset = Vec3::new(
                rng.random_range(-FRAGMENT_SCATTER..=FRAGMENT_SCATTER),
                rng.random_range(-FRAGMENT_SCATTER..=FRAGMENT_SCATTER),
                rng.random_range(-FRAGMENT_SCATTER..=FRAGMENT_SCATTER),
            );
            let state = self.state_mut();
            let fragment_id = state.next_feature_id("fragment");
            state.features.push(
                EnvironmentFeature::new(
                    fragment_id,
                    FeatureKind::Fragment {
                        glyph: glyph.clone(),
                    },
                    bubble.position + offset,
                )
                .with_scale(bubble.scale * 0.35),
            );
        }

        self.state_mut().mechanics.bubbles_popped += 1;
        self.emit(GameEvent::BubblePopped { id: id.to_string() });
        true
    }

    pub fn absorb_fragment(&mut self, id: &str) -> bool {
        let Some(idx) = self
            .state()
            .features
            .iter()
            .position(|f| f.id == id && f.tag() == FeatureTag::Fragment)
        else {
            return false;
        };

        let state = self.state_mut();
        state.features.remove(idx);
        state.mechanics.fragments_collected += 1;
        let total = state.mechanics.fragments_collected;
        self.emit(GameEvent::FragmentAbsorbed { total });

        if self.level() == Level::Name && total >= self.tuning().fragment_goal {
            self.mark_complete();
        }
        true
    }

    /// Grow the player by `amount` (capped, never shrinks)
    pub fn grow_player(&mut self, amount: f32) -> bool {
        if amount.is_nan() || amount <= 0.0 {
            return false;
        }
        let max = self.tuning().max_player_scale;
        let before = self.state().mechanics.player_scale;
        if before >= max {
            return false;
        }
        let after = (before + amount).min(max);
        self.state_mut().mechanics.player_scale = after;
        self.emit(GameEvent::PlayerGrew { scale: after });

        let growth = self.policy().growth;
        let crossed = |threshold: Option<f32>| {
            threshold.is_some_and(|t| before < t && after >= t)
        };
        if crossed(growth.narrative_at) {
            self.advance_narrative();
        }
        if crossed(growth.complete_at) {
            self.mark_complete();
        }
        true
    }

    pub fn damage_leaf(&mut self, amount: f32) -> bool {
        if !self.leaf_mutable(amount) {
            return false;
        }
        let m = &mut self.state_mut().mechanics;
        let health = (m.leaf_health - amount).max(MIN_LEAF_HEALTH);
        m.leaf_health = health;
        self.emit(GameEvent::LeafHealthChanged { health });
        true
    }

    /// Heal the leaf; full health wins the Wind level
    pub fn heal_leaf(&mut self, amount: f32) -> bool {
        if !self.leaf_mutable(amount) {
            return false;
        }
        let m = &mut self.state_mut().mechanics;
        let health = (m.leaf_health + amount).min(MAX_LEAF_HEALTH);
        m.leaf_health = health;
        self.emit(GameEvent::LeafHealthChanged { health });

        if health >= MAX_LEAF_HEALTH {
            self.mark_complete();
        }
        true
    }

    /// Leaf health is frozen outside Wind and after the win
    fn leaf_mutable(&self, amount: f32) -> bool {
        amount > 0.0 && self.level() == Level::Wind && !self.state().is_level_complete
    }

    /// Start the rain ramp on the Sun level (once per play-through)
    pub fn trigger_rain(&mut self) -> bool {
        if self.level() != Level::Sun || self.state().is_level_complete {
            return false;
        }
        self.start_rain()
    }

    /// Board an emotion vehicle; only a tear completes the Travel level
    pub fn select_vehicle(&mut self, emotion: Emotion) -> bool {
        if self.level() != Level::Travel || emotion != Emotion::Tear {
            return false;
        }
        self.emit(GameEvent::VehicleSelected(emotion));
        self.mark_complete()
    }

    /// Finish the Prologue if the player is standing at the exit gate
    pub fn reach_exit(&mut self) -> bool {
        if self.level() != Level::Prologue {
            return false;
        }
        let state = self.state();
        let at_gate = state
            .features
            .iter()
            .filter(|f| f.tag() == FeatureTag::Gate)
            .any(|gate| {
                planar_distance(state.player.position, gate.position) <= self.tuning().exit_radius
            });
        at_gate && self.mark_complete()
    }

    /// Finish the Home level once its observer scene has played through
    pub fn finish_observing(&mut self) -> bool {
        if self.level() != Level::Home {
            return false;
        }
        self.mark_complete()
    }
}
