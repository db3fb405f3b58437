//! Monster spawning

use std::rc::Rc;

use glam::Vec2;

use super::catalog::CreatureBlueprint;
use super::monster::Monster;
use crate::rng::Rng;

/// Monotonic id allocator for entities that need identity
#[derive(Debug, Clone)]
pub struct EntityIds {
    next_id: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Rolls once per tick for a new monster somewhere in the arena
#[derive(Debug, Clone)]
pub struct MonsterSpawner {
    pub chance: f32,
    /// Half extents of the spawn rectangle, centred on the origin
    pub area: Vec2,
    blueprint: Rc<CreatureBlueprint>,
}

impl MonsterSpawner {
    pub fn new(chance: f32, area: Vec2, blueprint: Rc<CreatureBlueprint>) -> Self {
        Self {
            chance,
            area,
            blueprint,
        }
    }

    pub fn handle(&self, rng: &mut Rng, ids: &mut EntityIds) -> Option<Monster> {
        if !rng.chance(self.chance) {
            return None;
        }
        let pos = Vec2::new(
            rng.float(-self.area.x, self.area.x),
            rng.float(-self.area.y, self.area.y),
        );
        let monster = Monster::new(ids.next_entity_id(), pos, &self.blueprint);
        log::debug!("Spawned {} #{} at {pos}", self.blueprint.name, monster.id());
        Some(monster)
    }
}
