//! Entity model shared by generators and actions
//!
//! Nodes are puzzle vertices, connections are edges between them, and
//! environment features are every other scene prop. Feature payloads are a
//! tagged union so each kind carries only the data it needs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A puzzle vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique within the level
    pub id: String,
    pub position: Vec3,
    /// Part of at least one connection
    pub connected: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            connected: false,
        }
    }
}

/// An unordered edge between two nodes
///
/// Stored with ids in sorted order so `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    a: String,
    b: String,
}

impl Connection {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                a: a.to_string(),
                b: b.to_string(),
            }
        } else {
            Self {
                a: b.to_string(),
                b: a.to_string(),
            }
        }
    }

    /// Endpoint ids in normalized order
    pub fn ends(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }

    /// Does this edge join `x` and `y` (in either direction)?
    pub fn joins(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    pub fn touches(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }
}

/// Emotion carried by the Travel level orbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Angry,
    Envy,
    /// The only vehicle that finishes the journey
    Tear,
}

/// Sprite drawn by a decoration feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Letter,
    Star,
    Cloud,
}

/// Feature kind with its per-kind payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    TunnelSegment { width: f32 },
    Platform,
    Lake,
    Decoration { sprite: Sprite },
    /// Exit marker
    Gate,
    Bubble { glyph: String },
    Fragment { glyph: String },
    FleshBall,
    WindEmitter { strength: f32 },
    WitheredLeaf,
    EmotionOrb { emotion: Emotion },
    Sun,
    Mushroom,
}

/// Payload-free feature tag, for counting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureTag {
    TunnelSegment,
    Platform,
    Lake,
    Decoration,
    Gate,
    Bubble,
    Fragment,
    FleshBall,
    WindEmitter,
    WitheredLeaf,
    EmotionOrb,
    Sun,
    Mushroom,
}

impl FeatureKind {
    pub fn tag(&self) -> FeatureTag {
        match self {
            FeatureKind::TunnelSegment { .. } => FeatureTag::TunnelSegment,
            FeatureKind::Platform => FeatureTag::Platform,
            FeatureKind::Lake => FeatureTag::Lake,
            FeatureKind::Decoration { .. } => FeatureTag::Decoration,
            FeatureKind::Gate => FeatureTag::Gate,
            FeatureKind::Bubble { .. } => FeatureTag::Bubble,
            FeatureKind::Fragment { .. } => FeatureTag::Fragment,
            FeatureKind::FleshBall => FeatureTag::FleshBall,
            FeatureKind::WindEmitter { .. } => FeatureTag::WindEmitter,
            FeatureKind::WitheredLeaf => FeatureTag::WitheredLeaf,
            FeatureKind::EmotionOrb { .. } => FeatureTag::EmotionOrb,
            FeatureKind::Sun => FeatureTag::Sun,
            FeatureKind::Mushroom => FeatureTag::Mushroom,
        }
    }
}

/// Any non-puzzle, non-player scene entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentFeature {
    pub id: String,
    pub kind: FeatureKind,
    pub position: Vec3,
    pub scale: Vec3,
    /// Euler angles (radians)
    #[serde(default)]
    pub rotation: Option<Vec3>,
    /// Hex color override
    #[serde(default)]
    pub color: Option<String>,
}

impl EnvironmentFeature {
    pub fn new(id: impl Into<String>, kind: FeatureKind, position: Vec3) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            scale: Vec3::ONE,
            rotation: None,
            color: None,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn tag(&self) -> FeatureTag {
        self.kind.tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_is_unordered() {
        let ab = Connection::new("n1", "n2");
        let ba = Connection::new("n2", "n1");
        assert_eq!(ab, ba);
        assert_eq!(ab.ends(), ("n1", "n2"));
        assert!(ba.joins("n1", "n2"));
        assert!(ba.joins("n2", "n1"));
        assert!(!ab.joins("n1", "n3"));
        assert!(ab.touches("n2"));
    }

    #[test]
    fn test_feature_tags() {
        let bubble = EnvironmentFeature::new(
            "bubble-0",
            FeatureKind::Bubble {
                glyph: "名".to_string(),
            },
            Vec3::ZERO,
        );
        assert_eq!(bubble.tag(), FeatureTag::Bubble);
        assert_eq!(bubble.scale, Vec3::ONE);
        assert!(bubble.rotation.is_none());

        let orb = EnvironmentFeature::new(
            "orb-tear",
            FeatureKind::EmotionOrb {
                emotion: Emotion::Tear,
            },
            Vec3::ZERO,
        )
        .with_color("#7fb8ff");
        assert_eq!(orb.tag(), FeatureTag::EmotionOrb);
        assert_eq!(orb.color.as_deref(), Some("#7fb8ff"));
    }
}
