//! Level table
//!
//! Every per-level rule (interaction mode, spawn point, growth thresholds,
//! narrative checkpoints) is an exhaustive match over [`Level`], so a new
//! level cannot be added without deciding each of them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Narrative stages, in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Prologue,
    /// Chapter one: constellation of words that must be linked in order
    Language,
    Name,
    Chewing,
    Wind,
    Travel,
    Connection,
    Sun,
    Home,
}

impl Level {
    /// The level a new game starts on
    pub const FIRST: Level = Level::Prologue;

    /// All levels in play order
    pub const ALL: [Level; 9] = [
        Level::Prologue,
        Level::Language,
        Level::Name,
        Level::Chewing,
        Level::Wind,
        Level::Travel,
        Level::Connection,
        Level::Sun,
        Level::Home,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Prologue => "prologue",
            Level::Language => "language",
            Level::Name => "name",
            Level::Chewing => "chewing",
            Level::Wind => "wind",
            Level::Travel => "travel",
            Level::Connection => "connection",
            Level::Sun => "sun",
            Level::Home => "home",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Level::ALL.into_iter().find(|level| level.as_str() == s)
    }

    /// The level after this one (None after the last)
    pub fn next(&self) -> Option<Level> {
        let idx = Level::ALL.iter().position(|l| l == self)?;
        Level::ALL.get(idx + 1).copied()
    }

    /// Input-to-motion mapping used while this level is active
    pub fn interaction_mode(&self) -> InteractionMode {
        match self {
            Level::Prologue => InteractionMode::Slingshot,
            Level::Home => InteractionMode::Observer,
            Level::Sun => InteractionMode::Click,
            Level::Language
            | Level::Name
            | Level::Chewing
            | Level::Wind
            | Level::Travel
            | Level::Connection => InteractionMode::Lure,
        }
    }

    /// Where the player (and cursor) are placed on level entry
    pub fn spawn_position(&self) -> Vec3 {
        match self {
            Level::Prologue => Vec3::new(0.0, 1.0, 0.0),
            Level::Language => Vec3::new(0.0, 1.0, 8.0),
            Level::Name => Vec3::new(0.0, 1.0, 4.0),
            Level::Chewing => Vec3::new(0.0, 1.0, 0.0),
            Level::Wind => Vec3::new(0.0, 1.0, 5.0),
            Level::Travel => Vec3::new(0.0, 1.0, 6.0),
            Level::Connection => Vec3::new(0.0, 1.0, 0.0),
            Level::Sun => Vec3::new(0.0, 1.0, 0.0),
            Level::Home => Vec3::new(0.0, 1.0, 4.0),
        }
    }

    /// Rules captured by the store when the level starts
    pub fn policy(&self) -> LevelPolicy {
        let (growth, narrative) = match self {
            Level::Prologue => (
                GrowthPolicy::NONE,
                NarrativeScript {
                    len: 3,
                    completion: 2,
                    first_connection: None,
                },
            ),
            Level::Language => (
                GrowthPolicy::NONE,
                NarrativeScript {
                    len: 4,
                    completion: 3,
                    first_connection: Some(1),
                },
            ),
            Level::Name => (GrowthPolicy::NONE, NarrativeScript::simple(3)),
            Level::Chewing => (
                GrowthPolicy {
                    narrative_at: Some(3.0),
                    complete_at: Some(8.0),
                },
                NarrativeScript::simple(3),
            ),
            Level::Wind => (
                GrowthPolicy {
                    narrative_at: Some(3.0),
                    complete_at: None,
                },
                NarrativeScript::simple(4),
            ),
            Level::Travel => (GrowthPolicy::NONE, NarrativeScript::simple(3)),
            Level::Connection => (
                GrowthPolicy::NONE,
                NarrativeScript {
                    len: 6,
                    completion: 5,
                    first_connection: Some(1),
                },
            ),
            Level::Sun => (GrowthPolicy::NONE, NarrativeScript::simple(4)),
            Level::Home => (GrowthPolicy::NONE, NarrativeScript::simple(2)),
        };

        LevelPolicy {
            level: *self,
            mode: self.interaction_mode(),
            spawn: self.spawn_position(),
            sequenced: matches!(self, Level::Language),
            growth,
            narrative,
        }
    }
}

/// How raw pointer input becomes player motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Pull back and release
    Slingshot,
    /// Player drifts toward the cursor
    Lure,
    /// No direct control, camera only
    Observer,
    /// Point-and-click on scene props
    Click,
}

/// Scale thresholds that trigger side effects in `grow_player`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    /// Crossing this scale advances the narrative once
    pub narrative_at: Option<f32>,
    /// Crossing this scale completes the level
    pub complete_at: Option<f32>,
}

impl GrowthPolicy {
    pub const NONE: GrowthPolicy = GrowthPolicy {
        narrative_at: None,
        complete_at: None,
    };
}

/// Checkpoints in a level's narrative line sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeScript {
    /// Number of lines; the index never reaches this value
    pub len: u32,
    /// Index shown once the level is complete
    pub completion: u32,
    /// Index jumped to by the first milestone connection
    pub first_connection: Option<u32>,
}

impl NarrativeScript {
    /// Script whose last line is the completion line
    const fn simple(len: u32) -> Self {
        Self {
            len,
            completion: len - 1,
            first_connection: None,
        }
    }

    /// Last index reachable by stepwise advances before completion
    pub fn last_pre_completion(&self) -> u32 {
        self.completion.saturating_sub(1)
    }
}

/// Per-level rules, fixed for the duration of a play-through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPolicy {
    pub level: Level,
    pub mode: InteractionMode,
    pub spawn: Vec3,
    /// Connections must follow the generated sequence order
    pub sequenced: bool,
    pub growth: GrowthPolicy,
    pub narrative: NarrativeScript,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_table() {
        assert_eq!(Level::Prologue.interaction_mode(), InteractionMode::Slingshot);
        assert_eq!(Level::Home.interaction_mode(), InteractionMode::Observer);
        assert_eq!(Level::Sun.interaction_mode(), InteractionMode::Click);
        for level in [Level::Language, Level::Name, Level::Wind, Level::Connection] {
            assert_eq!(level.interaction_mode(), InteractionMode::Lure);
        }
    }

    #[test]
    fn test_level_order() {
        assert_eq!(Level::FIRST.next(), Some(Level::Language));
        assert_eq!(Level::Sun.next(), Some(Level::Home));
        assert_eq!(Level::Home.next(), None);
    }

    #[test]
    fn test_name_roundtrip() {
        for level in Level::ALL {
            assert_eq!(Level::from_name(level.as_str()), Some(level));
        }
        assert_eq!(Level::from_name("WIND"), Some(Level::Wind));
        assert_eq!(Level::from_name("nowhere"), None);
    }

    #[test]
    fn test_checkpoints_inside_script() {
        for level in Level::ALL {
            let script = level.policy().narrative;
            assert!(script.completion < script.len, "{:?}", level);
            if let Some(first) = script.first_connection {
                assert!(first < script.completion, "{:?}", level);
            }
        }
    }

    #[test]
    fn test_only_language_is_sequenced() {
        for level in Level::ALL {
            assert_eq!(level.policy().sequenced, level == Level::Language);
        }
    }
}
