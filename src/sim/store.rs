//! The game store: single owner of committed state
//!
//! Collaborators hold a `&mut GameStore` (or pass actions to whoever does)
//! and read through [`GameStore::state`]. Level transitions always replace
//! the whole state; nothing from the previous play-through survives.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::event::GameEvent;
use super::generate::{LevelLayout, generate_level};
use super::level::{Level, LevelPolicy};
use super::rain::RainRamp;
use super::state::GameState;
use crate::tuning::Tuning;

pub struct GameStore {
    state: GameState,
    /// Rules of the current level, captured at `start_level`
    policy: LevelPolicy,
    tuning: Tuning,
    rng: Pcg32,
    rain: RainRamp,
    events: Vec<GameEvent>,
}

impl GameStore {
    /// New store on the first level, reproducible from `seed`
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// New store with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let policy = Level::FIRST.policy();
        let mut store = Self {
            state: GameState::fresh(&policy, LevelLayout::default()),
            policy,
            tuning: tuning.sanitized(),
            rng: Pcg32::seed_from_u64(seed),
            rain: RainRamp::default(),
            events: Vec::new(),
        };
        store.reset_game();
        store
    }

    /// Read-only view of the committed state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy for collaborators that keep state across frames
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }

    pub fn level(&self) -> Level {
        self.state.level
    }

    pub fn policy(&self) -> &LevelPolicy {
        &self.policy
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_raining(&self) -> bool {
        self.rain.is_running()
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter `level` from scratch: regenerate entities and zero every counter
    pub fn start_level(&mut self, level: Level) {
        let layout = generate_level(level, &mut self.rng, &self.tuning);
        self.policy = level.policy();
        self.rain = RainRamp::default();
        self.state = GameState::fresh(&self.policy, layout);

        log::info!(
            "Level {} started ({:?} mode, {} nodes, {} features)",
            level.as_str(),
            self.state.mode,
            self.state.nodes.len(),
            self.state.features.len()
        );
        self.events.push(GameEvent::LevelStarted(level));
    }

    /// Back to the first level
    pub fn reset_game(&mut self) {
        self.start_level(Level::FIRST);
    }

    /// Move on to the next level once the current one is complete
    pub fn proceed(&mut self) -> Option<Level> {
        if !self.state.is_level_complete {
            return None;
        }
        let next = self.state.level.next()?;
        self.start_level(next);
        Some(next)
    }

    /// Advance time-driven mechanics by `dt` seconds (called per frame)
    pub fn tick(&mut self, dt: f32) {
        let steps = self.rain.advance(dt, self.tuning.rain_interval);
        for _ in 0..steps {
            if !self.rain_step() {
                break;
            }
        }
    }

    /// One ramp interval. Returns false once the ramp has stopped.
    fn rain_step(&mut self) -> bool {
        let m = &mut self.state.mechanics;
        m.rain_level = (m.rain_level + self.tuning.rain_step).min(self.tuning.max_rain);
        let rain = m.rain_level;

        if !m.sun_extinguished && rain > self.tuning.rain_extinguish {
            m.sun_extinguished = true;
            log::info!("Sun extinguished at rain level {:.1}", rain);
            self.events.push(GameEvent::SunExtinguished);
            self.advance_narrative();
        }

        if rain >= self.tuning.rain_completion {
            self.mark_complete();
        }

        if rain >= self.tuning.max_rain {
            if self.rain.stop() {
                log::debug!("Rain ramp stopped at {:.1}", rain);
                self.events.push(GameEvent::RainStopped);
            }
            return false;
        }
        true
    }

    pub(super) fn start_rain(&mut self) -> bool {
        if !self.rain.start() {
            return false;
        }
        log::debug!("Rain ramp started");
        self.events.push(GameEvent::RainStarted);
        true
    }

    pub(super) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub(super) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Flip completion and jump to the completion checkpoint in one step.
    /// Returns false if the level was already complete.
    pub(super) fn mark_complete(&mut self) -> bool {
        if self.state.is_level_complete {
            return false;
        }
        self.state.is_level_complete = true;
        self.state.narrative_index = self.policy.narrative.completion;

        log::info!("Level {} complete", self.state.level.as_str());
        self.events.push(GameEvent::LevelCompleted(self.state.level));
        self.events
            .push(GameEvent::NarrativeAdvanced(self.state.narrative_index));
        true
    }

    /// Step the narrative forward by one line, stopping short of the
    /// completion checkpoint
    pub(super) fn advance_narrative(&mut self) -> bool {
        if self.state.is_level_complete {
            return false;
        }
        if self.state.narrative_index >= self.policy.narrative.last_pre_completion() {
            return false;
        }
        self.state.narrative_index += 1;
        self.events
            .push(GameEvent::NarrativeAdvanced(self.state.narrative_index));
        true
    }

    /// Jump forward to a fixed checkpoint (never backwards)
    pub(super) fn jump_narrative(&mut self, checkpoint: u32) -> bool {
        if self.state.is_level_complete || checkpoint <= self.state.narrative_index {
            return false;
        }
        self.state.narrative_index = checkpoint;
        self.events.push(GameEvent::NarrativeAdvanced(checkpoint));
        true
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Emotion, FeatureTag};
    use crate::sim::level::InteractionMode;
    use crate::sim::state::Mechanics;

    #[test]
    fn test_new_store_starts_on_first_level() {
        let mut store = GameStore::new(42);
        assert_eq!(store.level(), Level::Prologue);
        assert_eq!(store.state().mode, InteractionMode::Slingshot);
        assert_eq!(
            store.drain_events(),
            vec![GameEvent::LevelStarted(Level::Prologue)]
        );
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_start_level_zeroes_everything() {
        let mut store = GameStore::new(1);
        for level in Level::ALL {
            // Dirty the state before every transition
            store.state_mut().mechanics.player_scale = 7.0;
            store.state_mut().mechanics.rain_level = 12.0;
            store.state_mut().mechanics.fragments_collected = 4;
            store.state_mut().player.tethered_node = Some("x".into());
            store.state_mut().player.dragging_node = Some("y".into());
            store.state_mut().player.hovered_node = Some("z".into());
            store.state_mut().is_level_complete = true;
            store.state_mut().narrative_index = 2;

            store.start_level(level);
            let state = store.state();
            assert_eq!(state.level, level);
            assert_eq!(state.mechanics, Mechanics::default());
            assert!(!state.is_level_complete);
            assert_eq!(state.narrative_index, 0);
            assert!(state.connections.is_empty());
            assert!(state.player.tethered_node.is_none());
            assert!(state.player.dragging_node.is_none());
            assert!(state.player.hovered_node.is_none());
            assert_eq!(state.player.position, level.spawn_position());
            assert_eq!(state.mode, level.interaction_mode());
        }
    }

    #[test]
    fn test_restart_is_structurally_equivalent() {
        let mut store = GameStore::new(9);
        store.start_level(Level::Name);
        let first = store.snapshot();
        store.start_level(Level::Name);
        let second = store.snapshot();
        assert_eq!(
            first.count_features(FeatureTag::Bubble),
            second.count_features(FeatureTag::Bubble)
        );
        assert_eq!(first.mechanics, second.mechanics);
        // Fresh randomness each time
        assert_ne!(first.features, second.features);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = GameStore::new(1234);
        let mut b = GameStore::new(1234);
        a.start_level(Level::Connection);
        b.start_level(Level::Connection);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_proceed_requires_completion() {
        let mut store = GameStore::new(5);
        store.start_level(Level::Travel);
        assert_eq!(store.proceed(), None);
        assert_eq!(store.level(), Level::Travel);

        store.select_vehicle(Emotion::Tear);
        assert_eq!(store.proceed(), Some(Level::Connection));
        assert_eq!(store.level(), Level::Connection);
        assert!(!store.state().is_level_complete);
    }

    #[test]
    fn test_proceed_stops_after_last_level() {
        let mut store = GameStore::new(5);
        store.start_level(Level::Home);
        assert!(store.finish_observing());
        assert_eq!(store.proceed(), None);
        assert_eq!(store.level(), Level::Home);
    }

    #[test]
    fn test_reset_game_returns_to_prologue() {
        let mut store = GameStore::new(3);
        store.start_level(Level::Sun);
        store.trigger_rain();
        store.reset_game();
        assert_eq!(store.level(), Level::Prologue);
        assert!(!store.is_raining());
    }

    #[test]
    fn test_snapshot_json_contains_level() {
        let store = GameStore::new(8);
        let json = store.snapshot_json().unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, store.state());
    }
}
