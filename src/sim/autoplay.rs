//! Idle/demo mode - plays every level through the public action set
//!
//! Acts as the render/physics collaborator would: it reads the committed
//! state, moves the player, and calls actions. It never touches state
//! directly, so a full play-through exercises the same paths a real
//! frontend does.

use glam::Vec3;

use super::entity::{FeatureKind, FeatureTag};
use super::level::Level;
use super::store::GameStore;

/// Player speed while walking toward a target (units per second)
const WALK_SPEED: f32 = 24.0;

/// Perform one frame's worth of demo input for the current level
pub fn autoplay_step(store: &mut GameStore, dt: f32) {
    if store.state().is_level_complete {
        return;
    }

    match store.level() {
        Level::Prologue => {
            if store.state().narrative_index == 0 {
                store.set_mouse_down(true);
                store.set_mouse_down(false);
                return;
            }
            let exit = store
                .state()
                .features
                .iter()
                .find(|f| f.tag() == FeatureTag::Gate)
                .map(|f| f.position);
            if let Some(exit) = exit {
                walk_toward(store, exit, dt);
                store.reach_exit();
            }
        }

        Level::Language => {
            let state = store.state();
            let cursor = state.mechanics.sequence_cursor;
            let pair = (
                state.sequence_order.get(cursor).cloned(),
                state.sequence_order.get(cursor + 1).cloned(),
            );
            if let (Some(a), Some(b)) = pair {
                store.start_drag_connection(&a);
                store.set_hovered_node(Some(b.as_str()));
                store.complete_connection(&b);
            }
        }

        Level::Name => {
            let fragments = store.state().feature_ids(FeatureTag::Fragment);
            if let Some(fragment) = fragments.first() {
                store.absorb_fragment(fragment);
            } else if let Some(bubble) = store.state().feature_ids(FeatureTag::Bubble).first() {
                store.pop_bubble(bubble);
            }
        }

        Level::Chewing => {
            store.grow_player(0.5);
        }

        Level::Wind => {
            store.heal_leaf(10.0);
        }

        Level::Travel => {
            // Try each orb in scene order; only one of them is the way on
            let emotions: Vec<_> = store
                .state()
                .features
                .iter()
                .filter_map(|f| match f.kind {
                    FeatureKind::EmotionOrb { emotion } => Some(emotion),
                    _ => None,
                })
                .collect();
            for emotion in emotions {
                if store.select_vehicle(emotion) {
                    break;
                }
            }
        }

        Level::Connection => {
            let state = store.state();
            let next = state
                .nodes
                .iter()
                .find(|n| !n.connected && state.player.tethered_node.as_deref() != Some(n.id.as_str()))
                .map(|n| n.id.clone());
            let tethered = state.player.tethered_node.clone();
            match (tethered, next) {
                (None, Some(first)) => {
                    store.set_tethered_node(Some(first.as_str()));
                }
                (Some(_), Some(target)) => {
                    store.complete_connection(&target);
                }
                _ => {}
            }
        }

        Level::Sun => {
            if !store.is_raining() {
                store.trigger_rain();
            }
        }

        Level::Home => {
            store.finish_observing();
        }
    }

    store.tick(dt);
}

/// Move the player toward `target`, as the physics loop would
fn walk_toward(store: &mut GameStore, target: Vec3, dt: f32) {
    let pos = store.state().player.position;
    let step = (target - pos).clamp_length_max(WALK_SPEED * dt);
    store.set_cursor_world_pos(target);
    store.update_player_pos(pos + step);
}

/// Play from the current level to the end of the game.
/// Returns the levels completed, in order.
pub fn play_through(store: &mut GameStore, dt: f32, max_frames_per_level: u32) -> Vec<Level> {
    let mut completed = Vec::new();

    loop {
        let level = store.level();
        let mut frames = 0;
        while !store.state().is_level_complete && frames < max_frames_per_level {
            autoplay_step(store, dt);
            frames += 1;
        }

        if !store.state().is_level_complete {
            log::warn!("Autoplay stuck on {} after {} frames", level.as_str(), frames);
            break;
        }
        log::info!("Autoplay finished {} in {} frames", level.as_str(), frames);
        completed.push(level);

        if store.proceed().is_none() {
            break;
        }
    }

    completed
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_autoplay_finishes_every_level() {
        for seed in [1, 2, 3, 99] {
            let mut store = GameStore::new(seed);
            let completed = play_through(&mut store, DT, 5_000);
            assert_eq!(completed, Level::ALL.to_vec(), "seed {}", seed);
        }
    }

    #[test]
    fn test_autoplay_single_level_from_middle() {
        let mut store = GameStore::new(7);
        store.start_level(Level::Connection);
        for _ in 0..100 {
            autoplay_step(&mut store, DT);
        }
        assert!(store.state().is_level_complete);
        assert!(store.state().nodes.iter().all(|n| n.connected));
    }

    #[test]
    fn test_autoplay_does_nothing_once_complete() {
        let mut store = GameStore::new(7);
        store.start_level(Level::Home);
        autoplay_step(&mut store, DT);
        assert!(store.state().is_level_complete);
        let before = store.snapshot();
        autoplay_step(&mut store, DT);
        assert_eq!(store.state(), &before);
    }
}
