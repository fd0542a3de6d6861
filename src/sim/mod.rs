//! Game store and level lifecycle
//!
//! All gameplay state lives here. This module must stay free of rendering,
//! audio and platform code:
//! - Collaborators read through `&GameState` and write through actions
//! - Randomness comes from the store's seeded RNG only
//! - Timers are driven by `GameStore::tick`, never by threads

pub mod actions;
pub mod autoplay;
pub mod entity;
pub mod event;
pub mod generate;
pub mod level;
pub mod rain;
pub mod state;
pub mod store;

pub use actions::ConnectionResult;
pub use autoplay::{autoplay_step, play_through};
pub use entity::{Connection, Emotion, EnvironmentFeature, FeatureKind, FeatureTag, Node, Sprite};
pub use event::{GameEvent, RejectReason};
pub use generate::{LevelLayout, generate_level};
pub use level::{GrowthPolicy, InteractionMode, Level, LevelPolicy, NarrativeScript};
pub use rain::{RainRamp, RampPhase};
pub use state::{GameState, Mechanics, PlayerState};
pub use store::GameStore;
