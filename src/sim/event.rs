//! Fire-and-forget notifications for audio and UI layers
//!
//! The store queues events as side effects of actions; collaborators drain
//! them once per frame. Events never feed back into game state.

use serde::{Deserialize, Serialize};

use super::entity::Emotion;
use super::level::Level;

/// Why a connection attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No dragged or tethered source node
    NoSource,
    /// Source and target are the same node
    SelfLoop,
    /// Target (or source) is not a node of this level
    UnknownNode,
    /// The pair is already connected
    Duplicate,
    /// The pair is not the next one in the sequence order
    OutOfSequence,
}

/// Something that happened inside the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted(Level),
    LevelCompleted(Level),
    NarrativeAdvanced(u32),
    ConnectionMade { a: String, b: String },
    ConnectionRejected(RejectReason),
    BubblePopped { id: String },
    FragmentAbsorbed { total: u32 },
    PlayerGrew { scale: f32 },
    LeafHealthChanged { health: f32 },
    RainStarted,
    /// Rain crossed the extinguish threshold (fires once per play-through)
    SunExtinguished,
    RainStopped,
    VehicleSelected(Emotion),
}
