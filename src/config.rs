//! Game configuration and entity templates
//!
//! Everything tunable lives here as plain serde records: loop timing, spawner
//! tuning, key bindings, sprite-sheet geometry and the template tables that
//! gameplay constructors consume. Defaults reproduce the stock arena.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CULL_EVERY_N_TICKS, PARTICLE_MUZZLE_OFFSET, PROJECTILE_MUZZLE_OFFSET, TICKS_PER_SECOND,
    VIEW_HEIGHT, VIEW_WIDTH,
};
use crate::error::ConfigError;
use crate::input::Key;
use crate::renderer::Shadow;
use crate::rng::{Rng, Seed};

/// Lifetime in ticks: either fixed or drawn uniformly from a range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationSpec {
    Fixed(f32),
    Range { min: f32, max: f32 },
}

impl DurationSpec {
    pub fn sample(&self, rng: &mut Rng) -> f32 {
        match *self {
            DurationSpec::Fixed(ticks) => ticks,
            DurationSpec::Range { min, max } => rng.float(min, max),
        }
    }
}

/// Sprite-sheet geometry; pixel sizes are multiplied by `inner_scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub sprite_width: f32,
    pub sprite_height: f32,
    #[serde(default)]
    pub border: f32,
    #[serde(default = "default_inner_scale")]
    pub inner_scale: f32,
}

impl SheetConfig {
    /// Pixel-art sheet: `width`×`height` sprites with a 1px border, upscaled 4×
    pub fn pixel_art(width: f32, height: f32) -> Self {
        Self {
            sprite_width: width,
            sprite_height: height,
            border: 1.0,
            inner_scale: 4.0,
        }
    }
}

fn default_inner_scale() -> f32 {
    1.0
}

/// Cooldown-gated ranged attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackTemplate {
    /// Key into `GameConfig::projectiles`
    pub projectile: String,
    /// Ticks between shots (the attack fires at most once every cooldown + 1 ticks)
    pub cooldown: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub hit_circle_radius: f32,
    pub sprite_sheet: String,
    #[serde(default)]
    pub shadow: Option<Shadow>,
    pub move_animation_breakpoints: [u32; 4],
    pub move_speed: f32,
    #[serde(default)]
    pub attack: Option<AttackTemplate>,
    #[serde(default = "default_health")]
    pub health: u32,
    /// Particle template spilled when hit
    #[serde(default)]
    pub blood: Option<String>,
    /// Particles spilled on death
    #[serde(default = "default_burst_count")]
    pub burst_count: usize,
    /// Max angular jitter (radians) of each death-burst particle
    #[serde(default = "default_burst_spread")]
    pub burst_spread: f32,
}

fn default_health() -> u32 {
    1
}

fn default_burst_count() -> usize {
    10
}

fn default_burst_spread() -> f32 {
    0.6
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTemplate {
    pub hit_circle_radius: f32,
    pub sprite_sheet: String,
    #[serde(default)]
    pub shadow: Option<Shadow>,
    pub move_animation_breakpoints: [u32; 4],
    /// Initial impulse
    pub move_speed: f32,
    /// Max angular jitter (radians) added to every shot
    #[serde(default)]
    pub accuracy: f32,
    #[serde(default = "default_projectile_muzzle")]
    pub muzzle_offset: f32,
    /// Acceleration applied along the fire direction every tick
    #[serde(default)]
    pub thrust: f32,
    #[serde(default = "default_damage")]
    pub damage: u32,
    /// `None` flies until it hits something
    #[serde(default)]
    pub duration: Option<DurationSpec>,
}

fn default_projectile_muzzle() -> f32 {
    PROJECTILE_MUZZLE_OFFSET
}

fn default_damage() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTemplate {
    pub hit_circle_radius: f32,
    pub sprite_sheet: String,
    #[serde(default)]
    pub shadow: Option<Shadow>,
    pub move_animation_breakpoints: [u32; 4],
    pub move_speed: f32,
    /// Each particle's speed is jittered by up to ± this much
    #[serde(default)]
    pub move_speed_offset: f32,
    /// Velocity multiplier applied every tick
    #[serde(default = "default_traction")]
    pub traction: f32,
    /// Rotation (radians) applied every tick
    #[serde(default = "default_spin")]
    pub spin: f32,
    #[serde(default = "default_particle_muzzle")]
    pub muzzle_offset: f32,
    #[serde(default)]
    pub duration: Option<DurationSpec>,
    /// Debris template left behind when the particle dies
    #[serde(default)]
    pub debris: Option<String>,
}

fn default_traction() -> f32 {
    0.95
}

fn default_spin() -> f32 {
    0.04
}

fn default_particle_muzzle() -> f32 {
    PARTICLE_MUZZLE_OFFSET
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisTemplate {
    pub sprite_sheet: String,
    #[serde(default)]
    pub shadow: Option<Shadow>,
    /// Frames are picked from `[0, x) × [0, y)`
    pub sprite_choice_range: [u32; 2],
    pub duration: DurationSpec,
}

/// Movement key bindings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub up: Key,
    pub left: Key,
    pub down: Key,
    pub right: Key,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            up: Key::W,
            left: Key::A,
            down: Key::S,
            right: Key::D,
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ticks_per_second: u32,
    /// Expired entities are swept every N ticks
    pub cull_every: u64,
    /// Logical view size the gameplay layer is scaled to fit
    pub view_size: Vec2,
    /// `None` seeds from system randomness (non-reproducible)
    pub seed: Option<Seed>,

    // === Spawner ===
    /// Per-tick probability of a monster spawn
    pub spawn_chance: f32,
    /// Monsters appear uniformly in `[-x, x) × [-y, y)`
    pub spawn_area: Vec2,

    // === Templates in play ===
    pub player: String,
    pub monster: String,
    pub background: Option<String>,
    /// Draw hit circles (debug)
    pub show_hit_circles: bool,

    pub controls: Controls,

    pub sheets: BTreeMap<String, SheetConfig>,
    pub creatures: BTreeMap<String, CreatureTemplate>,
    pub projectiles: BTreeMap<String, ProjectileTemplate>,
    pub particles: BTreeMap<String, ParticleTemplate>,
    pub debris: BTreeMap<String, DebrisTemplate>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let sheets = [
            ("player", SheetConfig::pixel_art(24.0, 24.0)),
            ("green_laser", SheetConfig::pixel_art(24.0, 24.0)),
            ("green_spark", SheetConfig::pixel_art(24.0, 24.0)),
            ("zombie1", SheetConfig::pixel_art(24.0, 24.0)),
            ("blood", SheetConfig::pixel_art(24.0, 24.0)),
            ("blood_stain", SheetConfig::pixel_art(24.0, 24.0)),
            ("background", SheetConfig::pixel_art(400.0, 225.0)),
        ]
        .into_iter()
        .map(|(name, sheet)| (name.to_string(), sheet))
        .collect();

        let mut creatures = BTreeMap::new();
        creatures.insert(
            "PLAYER".to_string(),
            CreatureTemplate {
                hit_circle_radius: 30.0,
                sprite_sheet: "player".into(),
                shadow: Some(Shadow::new("#000000", 20.0)),
                move_animation_breakpoints: [15, 30, 45, 60],
                move_speed: 2.0,
                attack: Some(AttackTemplate {
                    projectile: "GREEN_LASER".into(),
                    cooldown: 3,
                }),
                health: 1,
                blood: None,
                burst_count: 0,
                burst_spread: 0.0,
            },
        );
        creatures.insert(
            "ZOMBIE_1".to_string(),
            CreatureTemplate {
                hit_circle_radius: 30.0,
                sprite_sheet: "zombie1".into(),
                shadow: Some(Shadow::new("#000000", 20.0)),
                move_animation_breakpoints: [15, 30, 45, 60],
                move_speed: 1.0,
                attack: None,
                health: default_health(),
                blood: Some("BLOOD".into()),
                burst_count: default_burst_count(),
                burst_spread: default_burst_spread(),
            },
        );

        let mut projectiles = BTreeMap::new();
        projectiles.insert(
            "GREEN_LASER".to_string(),
            ProjectileTemplate {
                hit_circle_radius: 10.0,
                sprite_sheet: "green_laser".into(),
                shadow: Some(Shadow::new("#00ff00", 10.0)),
                move_animation_breakpoints: [5, 10, 15, 20],
                move_speed: 20.0,
                accuracy: 0.02,
                muzzle_offset: PROJECTILE_MUZZLE_OFFSET,
                thrust: 0.5,
                damage: 1,
                duration: Some(DurationSpec::Fixed(50.0)),
            },
        );

        let mut particles = BTreeMap::new();
        particles.insert(
            "GREEN_SPARK".to_string(),
            ParticleTemplate {
                hit_circle_radius: 10.0,
                sprite_sheet: "green_spark".into(),
                shadow: Some(Shadow::new("#00ff00", 5.0)),
                move_animation_breakpoints: [3, 6, 9, 12],
                move_speed: 5.0,
                move_speed_offset: 0.0,
                traction: default_traction(),
                spin: default_spin(),
                muzzle_offset: PARTICLE_MUZZLE_OFFSET,
                duration: Some(DurationSpec::Fixed(20.0)),
                debris: None,
            },
        );
        particles.insert(
            "BLOOD".to_string(),
            ParticleTemplate {
                hit_circle_radius: 6.0,
                sprite_sheet: "blood".into(),
                shadow: Some(Shadow::new("#550000", 4.0)),
                move_animation_breakpoints: [3, 6, 9, 12],
                move_speed: 3.0,
                move_speed_offset: 1.5,
                traction: default_traction(),
                spin: default_spin(),
                muzzle_offset: PARTICLE_MUZZLE_OFFSET,
                duration: Some(DurationSpec::Range {
                    min: 15.0,
                    max: 30.0,
                }),
                debris: Some("BLOOD_STAIN".into()),
            },
        );

        let mut debris = BTreeMap::new();
        debris.insert(
            "BLOOD_STAIN".to_string(),
            DebrisTemplate {
                sprite_sheet: "blood_stain".into(),
                shadow: None,
                sprite_choice_range: [3, 2],
                duration: DurationSpec::Range {
                    min: 300.0,
                    max: 600.0,
                },
            },
        );

        Self {
            ticks_per_second: TICKS_PER_SECOND,
            cull_every: CULL_EVERY_N_TICKS,
            view_size: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            seed: None,

            spawn_chance: 0.05,
            spawn_area: Vec2::new(800.0, 450.0),

            player: "PLAYER".into(),
            monster: "ZOMBIE_1".into(),
            background: Some("background".into()),
            show_hit_circles: false,

            controls: Controls::default(),

            sheets,
            creatures,
            projectiles,
            particles,
            debris,
        }
    }
}

impl GameConfig {
    /// Parse a configuration; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Wall-clock time between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second.max(1) as f64)
    }

    /// RNG for a new game: seeded when configured, system-random otherwise
    pub fn make_rng(&self) -> Rng {
        match &self.seed {
            Some(seed) => Rng::new(seed.clone()),
            None => Rng::from_system_random(),
        }
    }

    pub fn creature(&self, name: &str) -> Result<&CreatureTemplate, ConfigError> {
        lookup(&self.creatures, "creature", name)
    }

    pub fn projectile(&self, name: &str) -> Result<&ProjectileTemplate, ConfigError> {
        lookup(&self.projectiles, "projectile", name)
    }

    pub fn particle(&self, name: &str) -> Result<&ParticleTemplate, ConfigError> {
        lookup(&self.particles, "particle", name)
    }

    pub fn debris_template(&self, name: &str) -> Result<&DebrisTemplate, ConfigError> {
        lookup(&self.debris, "debris", name)
    }
}

fn lookup<'a, T>(
    table: &'a BTreeMap<String, T>,
    kind: &'static str,
    name: &str,
) -> Result<&'a T, ConfigError> {
    table.get(name).ok_or_else(|| ConfigError::UnknownTemplate {
        kind,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let config = GameConfig::default();
        let player = config.creature("PLAYER").unwrap();
        assert_eq!(player.hit_circle_radius, 30.0);
        assert_eq!(player.move_speed, 2.0);
        assert_eq!(player.attack.as_ref().unwrap().cooldown, 3);

        let laser = config.projectile("GREEN_LASER").unwrap();
        assert_eq!(laser.move_speed, 20.0);
        assert_eq!(laser.accuracy, 0.02);
        assert_eq!(laser.duration, Some(DurationSpec::Fixed(50.0)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let json = config.to_json().unwrap();
        let parsed = GameConfig::from_json(&json).unwrap();
        assert_eq!(parsed.creatures, config.creatures);
        assert_eq!(parsed.particles, config.particles);
        assert_eq!(parsed.controls, config.controls);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "spawn_chance": 0.5, "seed": "arena" }"#).unwrap();
        assert_eq!(config.spawn_chance, 0.5);
        assert_eq!(config.seed, Some(Seed::Text("arena".into())));
        assert_eq!(config.ticks_per_second, TICKS_PER_SECOND);
        assert!(config.creatures.contains_key("ZOMBIE_1"));
    }

    #[test]
    fn test_duration_spec_forms() {
        let fixed: DurationSpec = serde_json::from_str("50").unwrap();
        assert_eq!(fixed, DurationSpec::Fixed(50.0));
        let range: DurationSpec = serde_json::from_str(r#"{"min": 10, "max": 20}"#).unwrap();
        assert_eq!(range, DurationSpec::Range { min: 10.0, max: 20.0 });

        let mut rng = Rng::new(4);
        for _ in 0..100 {
            let ticks = range.sample(&mut rng);
            assert!((10.0..20.0).contains(&ticks));
        }
    }

    #[test]
    fn test_template_defaults_when_omitted() {
        let json = r#"{
            "hit_circle_radius": 4,
            "sprite_sheet": "green_spark",
            "move_animation_breakpoints": [1, 2, 3, 4],
            "move_speed": 2
        }"#;
        let particle: ParticleTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(particle.traction, 0.95);
        assert_eq!(particle.spin, 0.04);
        assert_eq!(particle.muzzle_offset, PARTICLE_MUZZLE_OFFSET);
        assert!(particle.duration.is_none());
    }

    #[test]
    fn test_unknown_template_and_bad_json() {
        let config = GameConfig::default();
        assert!(matches!(
            config.projectile("RAILGUN"),
            Err(ConfigError::UnknownTemplate { kind: "projectile", .. })
        ));
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            GameConfig::load("/nonexistent/arena.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
