//! Gameplay
//!
//! Concrete entities built on the `sim` core:
//! - `Actor` is the shared composite (sprites + hit circle + walk cycle)
//! - `Player`, `Monster`, `Projectile`, `Particle` and `Debris` wrap an actor
//! - Entities talk to the view only through the per-tick `Frame`
//! - `GameplayView` owns the arena layer and applies hits and spawns

pub mod ability;
pub mod actor;
pub mod autopilot;
pub mod catalog;
pub mod counters;
pub mod frame;
pub mod monster;
pub mod particle;
pub mod player;
pub mod projectile;
pub mod spawner;
pub mod view;

pub use ability::{Cooldown, CooldownAbility, LaserAttack};
pub use actor::Actor;
pub use autopilot::Autopilot;
pub use catalog::Catalog;
pub use counters::{DurationCounter, MovementAnimation};
pub use frame::{Frame, Hit, Spawn, Target};
pub use monster::Monster;
pub use particle::{Debris, Particle};
pub use player::Player;
pub use projectile::Projectile;
pub use spawner::{EntityIds, MonsterSpawner};
pub use view::{Game, GameplayView, Stage, Stats, View, ViewContext};
