//! Procedural level generation
//!
//! One generator per level. Generators never fail: placement is uniform
//! random inside fixed bounds, so only counts and kinds are guaranteed,
//! never exact positions.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use super::entity::{Emotion, EnvironmentFeature, FeatureKind, Node, Sprite};
use super::level::Level;
use crate::consts::*;
use crate::spiral_point;
use crate::tuning::Tuning;

/// Glyphs shown inside Name level bubbles
const GLYPHS: [&str; 12] = [
    "名", "前", "あ", "な", "た", "の", "声", "夢", "光", "水", "風", "空",
];

/// Everything a level starts with
#[derive(Debug, Clone, Default)]
pub struct LevelLayout {
    pub nodes: Vec<Node>,
    pub features: Vec<EnvironmentFeature>,
    /// Required connection order (empty for free-form levels)
    pub sequence_order: Vec<String>,
}

/// Build the initial entity set for a level
pub fn generate_level<R: Rng>(level: Level, rng: &mut R, tuning: &Tuning) -> LevelLayout {
    let layout = match level {
        Level::Prologue => generate_prologue(),
        Level::Language => generate_language(rng),
        Level::Name => generate_name(rng),
        Level::Chewing => generate_chewing(rng),
        Level::Wind => generate_wind(),
        Level::Travel => generate_travel(),
        Level::Connection => generate_connection(rng, tuning),
        Level::Home => generate_home(),
        Level::Sun => generate_sun(),
    };
    log::debug!(
        "Generated {:?}: {} nodes, {} features",
        level,
        layout.nodes.len(),
        layout.features.len()
    );
    layout
}

/// Narrowing corridor with an exit gate at the far end
fn generate_prologue() -> LevelLayout {
    let start_width = 9.0;
    let end_width = 3.0;
    let spacing = 6.0;

    let mut features = Vec::with_capacity(TUNNEL_SEGMENTS + 1);
    for i in 0..TUNNEL_SEGMENTS {
        let t = i as f32 / (TUNNEL_SEGMENTS - 1) as f32;
        let width = start_width + (end_width - start_width) * t;
        features.push(
            EnvironmentFeature::new(
                format!("tunnel-{}", i),
                FeatureKind::TunnelSegment { width },
                Vec3::new(0.0, 0.0, -(i as f32) * spacing),
            )
            .with_scale(Vec3::new(width, width, spacing)),
        );
    }

    features.push(
        EnvironmentFeature::new("exit", FeatureKind::Gate, prologue_exit_position())
            .with_color("#fff4d6"),
    );

    LevelLayout {
        features,
        ..Default::default()
    }
}

/// Where the Prologue exit gate sits
pub fn prologue_exit_position() -> Vec3 {
    Vec3::new(0.0, 0.0, -80.0)
}

/// Six word-nodes in a fixed constellation, linked in array order
fn generate_language<R: Rng>(rng: &mut R) -> LevelLayout {
    let positions = [
        Vec3::new(-8.0, 2.0, -4.0),
        Vec3::new(-4.0, 4.0, -8.0),
        Vec3::new(0.0, 2.5, -5.0),
        Vec3::new(4.0, 4.5, -9.0),
        Vec3::new(8.0, 2.0, -6.0),
        Vec3::new(2.0, 6.0, -13.0),
    ];
    debug_assert_eq!(positions.len(), LANGUAGE_NODE_COUNT);

    let nodes: Vec<Node> = positions
        .iter()
        .enumerate()
        .map(|(i, &pos)| Node::new(format!("word-{}", i), pos))
        .collect();
    let sequence_order = nodes.iter().map(|n| n.id.clone()).collect();

    let sprites = [Sprite::Letter, Sprite::Star];
    let features = (0..8)
        .map(|i| {
            let pos = Vec3::new(
                rng.random_range(-14.0..14.0),
                rng.random_range(1.0..10.0),
                rng.random_range(-20.0..-2.0),
            );
            let sprite = sprites[rng.random_range(0..sprites.len())];
            EnvironmentFeature::new(format!("sprite-{}", i), FeatureKind::Decoration { sprite }, pos)
                .with_scale(Vec3::splat(rng.random_range(0.4..1.2)))
        })
        .collect();

    LevelLayout {
        nodes,
        features,
        sequence_order,
    }
}

/// Floating glyph bubbles inside a bounded volume
fn generate_name<R: Rng>(rng: &mut R) -> LevelLayout {
    let features = (0..BUBBLE_COUNT)
        .map(|i| {
            let pos = Vec3::new(
                rng.random_range(-10.0..=10.0),
                rng.random_range(1.5..=8.0),
                rng.random_range(-14.0..=-2.0),
            );
            let glyph = GLYPHS[rng.random_range(0..GLYPHS.len())].to_string();
            EnvironmentFeature::new(format!("bubble-{}", i), FeatureKind::Bubble { glyph }, pos)
                .with_scale(Vec3::splat(rng.random_range(0.8..1.4)))
        })
        .collect();

    LevelLayout {
        features,
        ..Default::default()
    }
}

/// Flesh-ball obstacles strung along a corridor
fn generate_chewing<R: Rng>(rng: &mut R) -> LevelLayout {
    let features = (0..FLESH_BALL_COUNT)
        .map(|i| {
            let size: f32 = rng.random_range(0.6..=2.2);
            let pos = Vec3::new(
                rng.random_range(-4.0..=4.0),
                size * 0.5,
                -6.0 - i as f32 * 4.5,
            );
            EnvironmentFeature::new(format!("flesh-{}", i), FeatureKind::FleshBall, pos)
                .with_scale(Vec3::splat(size))
                .with_color("#c9736b")
        })
        .collect();

    LevelLayout {
        features,
        ..Default::default()
    }
}

fn generate_wind() -> LevelLayout {
    let features = vec![
        EnvironmentFeature::new(
            "wind-emitter",
            FeatureKind::WindEmitter { strength: 1.0 },
            Vec3::new(-6.0, 2.0, -6.0),
        ),
        EnvironmentFeature::new(
            "withered-leaf",
            FeatureKind::WitheredLeaf,
            Vec3::new(0.0, 1.5, -12.0),
        )
        .with_color("#8a6b3d"),
    ];

    LevelLayout {
        features,
        ..Default::default()
    }
}

fn generate_travel() -> LevelLayout {
    let orbs = [
        (Emotion::Happy, Vec3::new(-6.0, 2.0, -6.0), "#ffd94a"),
        (Emotion::Angry, Vec3::new(-2.0, 2.0, -8.0), "#e5483b"),
        (Emotion::Envy, Vec3::new(2.0, 2.0, -8.0), "#5fbf5a"),
        (Emotion::Tear, Vec3::new(6.0, 2.0, -6.0), "#7fb8ff"),
    ];

    let features = orbs
        .into_iter()
        .map(|(emotion, pos, color)| {
            EnvironmentFeature::new(
                format!("orb-{:?}", emotion).to_lowercase(),
                FeatureKind::EmotionOrb { emotion },
                pos,
            )
            .with_color(color)
        })
        .collect();

    LevelLayout {
        features,
        ..Default::default()
    }
}

/// Nodes along a jittered spiral with minimum-separation retries
///
/// After `placement_attempts` failed tries the last candidate is accepted
/// unchecked, so occasional close pairs are expected.
fn generate_connection<R: Rng>(rng: &mut R, tuning: &Tuning) -> LevelLayout {
    let count = rng.random_range(MIN_CONNECTION_NODES..=MAX_CONNECTION_NODES);
    let mut nodes: Vec<Node> = Vec::with_capacity(count);
    let mut features = Vec::new();

    for i in 0..count {
        let t = i as f32 / (count - 1) as f32;
        let base_theta = t * PI * 2.5;
        let base_radius = 5.0 + t * 12.0;

        let mut candidate = Vec3::ZERO;
        for _attempt in 0..tuning.placement_attempts.max(1) {
            let theta = base_theta + rng.random_range(-0.35_f32..0.35);
            let radius = base_radius + rng.random_range(-1.5_f32..1.5);
            let y = 1.5 + t * 6.0 + rng.random_range(-1.0_f32..1.0);
            candidate = spiral_point(radius, theta, y);

            let clear = nodes
                .iter()
                .all(|n| n.position.distance(candidate) >= tuning.min_node_separation);
            if clear {
                break;
            }
        }

        let id = format!("star-{}", i);
        if rng.random_bool(tuning.platform_chance) {
            let offset = Vec3::new(
                rng.random_range(-0.5..0.5),
                -1.2,
                rng.random_range(-0.5..0.5),
            );
            features.push(
                EnvironmentFeature::new(
                    format!("platform-{}", i),
                    FeatureKind::Platform,
                    candidate + offset,
                )
                .with_scale(Vec3::new(2.5, 0.3, 2.5)),
            );
        }
        nodes.push(Node::new(id, candidate));
    }

    for i in 0..10 {
        let pos = spiral_point(
            rng.random_range(4.0..24.0),
            rng.random_range(0.0..TAU),
            rng.random_range(2.0..14.0),
        );
        features.push(
            EnvironmentFeature::new(
                format!("drift-{}", i),
                FeatureKind::Decoration {
                    sprite: Sprite::Cloud,
                },
                pos,
            )
            .with_rotation(Vec3::new(0.0, rng.random_range(0.0..TAU), 0.0)),
        );
    }

    LevelLayout {
        nodes,
        features,
        sequence_order: Vec::new(),
    }
}

fn generate_home() -> LevelLayout {
    LevelLayout {
        features: vec![
            EnvironmentFeature::new("lake", FeatureKind::Lake, Vec3::new(0.0, 0.0, -10.0))
                .with_scale(Vec3::new(20.0, 1.0, 20.0))
                .with_color("#2b4a6f"),
        ],
        ..Default::default()
    }
}

fn generate_sun() -> LevelLayout {
    let spawn = Level::Sun.spawn_position();
    LevelLayout {
        features: vec![
            EnvironmentFeature::new("sun", FeatureKind::Sun, Vec3::new(0.0, 30.0, -40.0))
                .with_scale(Vec3::splat(6.0))
                .with_color("#ffb347"),
            EnvironmentFeature::new(
                "mushroom",
                FeatureKind::Mushroom,
                Vec3::new(spawn.x + 2.0, 0.0, spawn.z - 3.0),
            ),
        ],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::FeatureTag;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn count(layout: &LevelLayout, tag: FeatureTag) -> usize {
        layout.features.iter().filter(|f| f.tag() == tag).count()
    }

    #[test]
    fn test_connection_node_count_range() {
        let tuning = Tuning::default();
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = generate_level(Level::Connection, &mut rng, &tuning);
            assert!(
                (MIN_CONNECTION_NODES..=MAX_CONNECTION_NODES).contains(&layout.nodes.len()),
                "seed {} produced {} nodes",
                seed,
                layout.nodes.len()
            );
            assert_eq!(count(&layout, FeatureTag::Decoration), 10);
            assert!(count(&layout, FeatureTag::Platform) <= layout.nodes.len());
        }
    }

    #[test]
    fn test_connection_separation_usually_holds() {
        // Fallback placement may violate separation, but with 20 retries on a
        // widening spiral it should be rare.
        let tuning = Tuning::default();
        let mut violations = 0;
        for seed in 0..100 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = generate_level(Level::Connection, &mut rng, &tuning);
            for (i, a) in layout.nodes.iter().enumerate() {
                for b in &layout.nodes[i + 1..] {
                    if a.position.distance(b.position) < tuning.min_node_separation {
                        violations += 1;
                    }
                }
            }
        }
        assert!(violations < 20, "{} close pairs", violations);
    }

    #[test]
    fn test_language_has_six_ordered_nodes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let layout = generate_level(Level::Language, &mut rng, &Tuning::default());
        assert_eq!(layout.nodes.len(), LANGUAGE_NODE_COUNT);
        let ids: Vec<_> = layout.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(layout.sequence_order, ids);
        assert!(layout.nodes.iter().all(|n| !n.connected));
    }

    #[test]
    fn test_name_bubbles_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let layout = generate_level(Level::Name, &mut rng, &Tuning::default());
        assert_eq!(count(&layout, FeatureTag::Bubble), BUBBLE_COUNT);
        for f in &layout.features {
            assert!((-10.0..=10.0).contains(&f.position.x));
            assert!((1.5..=8.0).contains(&f.position.y));
            assert!((-14.0..=-2.0).contains(&f.position.z));
            match &f.kind {
                FeatureKind::Bubble { glyph } => assert!(GLYPHS.contains(&glyph.as_str())),
                other => panic!("unexpected feature {:?}", other),
            }
        }
    }

    #[test]
    fn test_fixed_levels() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = Tuning::default();

        let chewing = generate_level(Level::Chewing, &mut rng, &tuning);
        assert_eq!(count(&chewing, FeatureTag::FleshBall), FLESH_BALL_COUNT);

        let wind = generate_level(Level::Wind, &mut rng, &tuning);
        assert_eq!(count(&wind, FeatureTag::WindEmitter), 1);
        assert_eq!(count(&wind, FeatureTag::WitheredLeaf), 1);

        let travel = generate_level(Level::Travel, &mut rng, &tuning);
        assert_eq!(count(&travel, FeatureTag::EmotionOrb), 4);
        let tears = travel
            .features
            .iter()
            .filter(|f| {
                matches!(
                    f.kind,
                    FeatureKind::EmotionOrb {
                        emotion: Emotion::Tear
                    }
                )
            })
            .count();
        assert_eq!(tears, 1);

        let home = generate_level(Level::Home, &mut rng, &tuning);
        assert_eq!(home.features.len(), 1);
        assert_eq!(count(&home, FeatureTag::Lake), 1);

        let sun = generate_level(Level::Sun, &mut rng, &tuning);
        assert_eq!(count(&sun, FeatureTag::Sun), 1);
        assert_eq!(count(&sun, FeatureTag::Mushroom), 1);
    }

    #[test]
    fn test_prologue_tunnel_narrows() {
        let mut rng = Pcg32::seed_from_u64(1);
        let layout = generate_level(Level::Prologue, &mut rng, &Tuning::default());
        let widths: Vec<f32> = layout
            .features
            .iter()
            .filter_map(|f| match f.kind {
                FeatureKind::TunnelSegment { width } => Some(width),
                _ => None,
            })
            .collect();
        assert_eq!(widths.len(), TUNNEL_SEGMENTS);
        assert!(widths.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(count(&layout, FeatureTag::Gate), 1);
        assert!(layout.nodes.is_empty());
    }

    #[test]
    fn test_ids_unique_per_level() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for level in Level::ALL {
            let layout = generate_level(level, &mut rng, &tuning);
            let mut ids: Vec<&str> = layout
                .nodes
                .iter()
                .map(|n| n.id.as_str())
                .chain(layout.features.iter().map(|f| f.id.as_str()))
                .collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), total, "{:?} has duplicate ids", level);
        }
    }

    #[test]
    fn test_every_sprite_is_generated() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut seen = Vec::new();
        for _ in 0..4 {
            for level in [Level::Language, Level::Connection] {
                for f in generate_level(level, &mut rng, &tuning).features {
                    if let FeatureKind::Decoration { sprite } = f.kind {
                        if !seen.contains(&sprite) {
                            seen.push(sprite);
                        }
                    }
                }
            }
        }
        for sprite in [Sprite::Letter, Sprite::Star, Sprite::Cloud] {
            // Exhaustive so a new variant must be wired into a generator
            match sprite {
                Sprite::Letter | Sprite::Star | Sprite::Cloud => {}
            }
            assert!(seen.contains(&sprite), "{:?} never generated", sprite);
        }
    }
}
