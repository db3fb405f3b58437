//! Views and the gameplay scene
//!
//! A `Game` owns the renderer, the input state and exactly one active `View`,
//! and forwards every loop tick to it. `GameplayView` is the arena: one layer
//! whose stages draw bottom to top as backdrop, floor debris, monsters, the
//! player, airborne particles and projectiles.

use std::any::Any;
use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;

use super::autopilot::Autopilot;
use super::catalog::Catalog;
use super::frame::{Frame, Hit, Spawn};
use super::monster::Monster;
use super::particle::{Debris, Particle};
use super::player::Player;
use super::projectile::Projectile;
use super::spawner::{EntityIds, MonsterSpawner};
use crate::config::{Controls, GameConfig};
use crate::error::ConfigError;
use crate::input::{InputState, Pointer};
use crate::renderer::Renderer;
use crate::rng::Rng;
use crate::sim::{
    Body, Circle, Clock, Container, Entity, Layer, Rect, Sprite, TickHandler, Transform,
};

/// What a view may touch during one tick
pub struct ViewContext<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub input: &'a mut InputState,
    pub clock: &'a mut Clock,
}

pub trait View {
    /// Canvas size changed (also called when the view becomes active)
    fn on_resize(&mut self, _canvas: Vec2) {}

    fn on_update(&mut self, ctx: &mut ViewContext<'_>);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// One slot of the gameplay layer
#[derive(Debug)]
pub enum Stage {
    Backdrop(Sprite),
    Floor(Container<Debris>),
    Monsters(Container<Monster>),
    Player(Player),
    Air(Container<Particle>),
    Projectiles(Container<Projectile>),
}

macro_rules! each_stage {
    ($stage:expr, $inner:ident => $body:expr) => {
        match $stage {
            Stage::Backdrop($inner) => $body,
            Stage::Floor($inner) => $body,
            Stage::Monsters($inner) => $body,
            Stage::Player($inner) => $body,
            Stage::Air($inner) => $body,
            Stage::Projectiles($inner) => $body,
        }
    };
}

impl Transform for Stage {
    fn body(&self) -> &Body {
        each_stage!(self, s => s.body())
    }

    fn body_mut(&mut self) -> &mut Body {
        each_stage!(self, s => s.body_mut())
    }

    fn move_by(&mut self, delta: Vec2) {
        each_stage!(self, s => s.move_by(delta))
    }

    fn place(&mut self, pos: Vec2) {
        each_stage!(self, s => s.place(pos))
    }

    fn move_polar(&mut self, phi: f32, r: f32) {
        each_stage!(self, s => s.move_polar(phi, r))
    }

    fn scale_about(&mut self, factor: f32, origin: Vec2) {
        each_stage!(self, s => s.scale_about(factor, origin))
    }

    fn rotate_about(&mut self, phi: f32, origin: Vec2) {
        each_stage!(self, s => s.rotate_about(phi, origin))
    }

    fn center(&self) -> Vec2 {
        each_stage!(self, s => s.center())
    }

    fn bounding_rect(&self) -> Rect {
        each_stage!(self, s => s.bounding_rect())
    }

    fn bounding_circle(&self) -> Circle {
        each_stage!(self, s => s.bounding_circle())
    }

    fn is_point_over(&self, point: Vec2) -> bool {
        each_stage!(self, s => s.is_point_over(point))
    }

    fn get_drawn(&self, renderer: &mut dyn Renderer) {
        each_stage!(self, s => s.get_drawn(renderer))
    }

    fn cull(&mut self) -> usize {
        each_stage!(self, s => s.cull())
    }

    fn travel(&mut self) {
        each_stage!(self, s => s.travel())
    }

    fn listen(&mut self, pointer: &Pointer<'_>) {
        each_stage!(self, s => s.listen(pointer))
    }

    fn animate(&mut self)
    where
        Self: Sized,
    {
        each_stage!(self, s => s.animate())
    }
}

impl<'a> Entity<Frame<'a>> for Stage {
    fn update(&mut self, ctx: &mut Frame<'a>) {
        each_stage!(self, s => s.update(ctx))
    }

    /// Monsters refresh the hit registry as soon as they have moved, so the
    /// projectile stage tests against this tick's positions
    fn step(&mut self, ctx: &mut Frame<'a>)
    where
        Self: Sized,
    {
        each_stage!(self, s => s.step(ctx));
        if let Stage::Monsters(monsters) = self {
            ctx.refresh_targets(monsters.children());
        }
    }
}

/// Running totals for one gameplay session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub hits: u64,
    pub kills: u64,
    pub spawned: u64,
    pub culled: u64,
}

pub struct GameplayView {
    layer: Layer<Stage>,
    rng: Rng,
    catalog: Catalog,
    controls: Controls,
    spawner: MonsterSpawner,
    ids: EntityIds,
    cull_every: u64,
    view_size: Vec2,
    show_hit_circles: bool,
    autopilot: Option<Autopilot>,
    stats: Stats,
}

impl GameplayView {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let catalog = Catalog::resolve(config)?;
        let rng = config.make_rng();

        let mut layer = Layer::new();
        if let Some(sheet) = &catalog.background {
            layer.add(Stage::Backdrop(sheet.get(0, 0)));
        }
        let mut player = Player::new(Vec2::ZERO, &catalog.player);
        if config.show_hit_circles {
            player.actor_mut().show_hit_circle();
        }
        layer.adds([
            Stage::Floor(Container::default()),
            Stage::Monsters(Container::default()),
            Stage::Player(player),
            Stage::Air(Container::default()),
            Stage::Projectiles(Container::default()),
        ]);

        let spawner = MonsterSpawner::new(
            config.spawn_chance,
            config.spawn_area,
            Rc::clone(&catalog.monster),
        );
        log::info!(
            "Gameplay view ready: player {}, monster {}, seed {:?}",
            catalog.player.name,
            catalog.monster.name,
            rng.seed()
        );

        Ok(Self {
            layer,
            rng,
            catalog,
            controls: config.controls,
            spawner,
            ids: EntityIds::default(),
            cull_every: config.cull_every,
            view_size: config.view_size,
            show_hit_circles: config.show_hit_circles,
            autopilot: None,
            stats: Stats::default(),
        })
    }

    pub fn with_autopilot(mut self) -> Self {
        self.autopilot = Some(Autopilot::new(self.controls));
        self
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layer(&self) -> &Layer<Stage> {
        &self.layer
    }

    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.rng
    }

    pub fn player(&self) -> Option<&Player> {
        self.layer.entities().iter().find_map(|stage| match stage {
            Stage::Player(player) => Some(player),
            _ => None,
        })
    }

    pub fn monsters(&self) -> Option<&Container<Monster>> {
        self.layer.entities().iter().find_map(|stage| match stage {
            Stage::Monsters(monsters) => Some(monsters),
            _ => None,
        })
    }

    pub fn projectiles(&self) -> Option<&Container<Projectile>> {
        self.layer.entities().iter().find_map(|stage| match stage {
            Stage::Projectiles(projectiles) => Some(projectiles),
            _ => None,
        })
    }

    pub fn particles(&self) -> Option<&Container<Particle>> {
        self.layer.entities().iter().find_map(|stage| match stage {
            Stage::Air(particles) => Some(particles),
            _ => None,
        })
    }

    pub fn debris(&self) -> Option<&Container<Debris>> {
        self.layer.entities().iter().find_map(|stage| match stage {
            Stage::Floor(debris) => Some(debris),
            _ => None,
        })
    }

    fn player_position(&self) -> Vec2 {
        self.player().map_or(Vec2::ZERO, |player| player.position())
    }

    /// Place a new monster outside the spawner's schedule; returns its id
    pub fn spawn_monster(&mut self, pos: Vec2) -> u32 {
        let mut monster = Monster::new(self.ids.next_entity_id(), pos, &self.catalog.monster);
        let id = monster.id();
        if self.show_hit_circles {
            monster.actor_mut().show_hit_circle();
        }
        self.add_monster(monster);
        id
    }

    fn add_monster(&mut self, monster: Monster) {
        if let Some(monsters) = monsters_mut(&mut self.layer) {
            monsters.add(monster);
            self.stats.spawned += 1;
        }
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.drain_spawns(vec![Spawn::Projectile(projectile)]);
    }

    fn apply_hits(&mut self, hits: Vec<Hit>) {
        if hits.is_empty() {
            return;
        }
        let mut spilled = Vec::new();
        if let Some(monsters) = monsters_mut(&mut self.layer) {
            for hit in &hits {
                let Some(monster) = monsters
                    .children_mut()
                    .iter_mut()
                    .find(|monster| monster.id() == hit.target)
                else {
                    log::warn!("Hit on unknown monster {}", hit.target);
                    continue;
                };
                let was_alive = monster.health() > 0;
                spilled.extend(monster.take_damage(hit, &mut self.rng));
                self.stats.hits += 1;
                if was_alive && monster.health() == 0 {
                    self.stats.kills += 1;
                }
            }
        }
        self.drain_spawns(spilled.into_iter().map(Spawn::Particle).collect());
    }

    fn drain_spawns(&mut self, spawns: Vec<Spawn>) {
        for spawn in spawns {
            let stage = self
                .layer
                .entities_mut()
                .iter_mut()
                .find(|stage| accepts(stage, &spawn));
            match (stage, spawn) {
                (Some(Stage::Projectiles(projectiles)), Spawn::Projectile(projectile)) => {
                    projectiles.add(projectile)
                }
                (Some(Stage::Air(particles)), Spawn::Particle(particle)) => particles.add(particle),
                (Some(Stage::Floor(floor)), Spawn::Debris(debris)) => floor.add(debris),
                (_, spawn) => log::warn!("No stage accepts {spawn:?}"),
            }
        }
    }
}

fn accepts(stage: &Stage, spawn: &Spawn) -> bool {
    matches!(
        (stage, spawn),
        (Stage::Projectiles(_), Spawn::Projectile(_))
            | (Stage::Air(_), Spawn::Particle(_))
            | (Stage::Floor(_), Spawn::Debris(_))
    )
}

fn monsters_mut(layer: &mut Layer<Stage>) -> Option<&mut Container<Monster>> {
    layer.entities_mut().iter_mut().find_map(|stage| match stage {
        Stage::Monsters(monsters) => Some(monsters),
        _ => None,
    })
}

impl View for GameplayView {
    fn on_resize(&mut self, canvas: Vec2) {
        self.layer.center(canvas).scale_to_size(canvas, self.view_size);
    }

    fn on_update(&mut self, ctx: &mut ViewContext<'_>) {
        ctx.renderer.clear();
        let tick = ctx.clock.tick_count();

        if let Some(autopilot) = &self.autopilot {
            let viewport = self.layer.effective_viewport(ctx.renderer.viewport());
            let targets: Vec<Vec2> = self
                .monsters()
                .map(|monsters| {
                    monsters
                        .iter()
                        .filter(|monster| !monster.is_expired())
                        .map(|monster| monster.position())
                        .collect()
                })
                .unwrap_or_default();
            autopilot.drive(tick, ctx.input, self.player_position(), targets, viewport);
        }

        if let Some(mut monster) = self.spawner.handle(&mut self.rng, &mut self.ids) {
            if self.show_hit_circles {
                monster.actor_mut().show_hit_circle();
            }
            self.add_monster(monster);
        }

        let player_pos = self.player_position();
        let pointer = self
            .layer
            .to_local(ctx.renderer.viewport(), ctx.input.mouse.raw);
        let mut frame = Frame::new(&*ctx.input, self.controls, &mut self.rng);
        frame.player_pos = player_pos;
        frame.pointer = pointer;
        if let Some(monsters) = self.layer.entities().iter().find_map(|stage| match stage {
            Stage::Monsters(monsters) => Some(monsters),
            _ => None,
        }) {
            frame.refresh_targets(monsters.children());
        }
        self.layer.handle_draw(&mut *ctx.renderer, &mut frame);
        let Frame { hits, spawns, .. } = frame;

        self.layer.handle_listen(&*ctx.renderer, &*ctx.input);

        self.apply_hits(hits);
        self.drain_spawns(spawns);

        let culled = self.layer.cull_if_nth_frame(tick, self.cull_every);
        if culled > 0 {
            self.stats.culled += culled as u64;
            log::debug!("Tick {tick}: culled {culled} expired entities");
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Renderer, input and the active view, driven by the game loop
pub struct Game<R: Renderer> {
    renderer: R,
    input: InputState,
    view: Box<dyn View>,
}

impl<R: Renderer> Game<R> {
    pub fn new(renderer: R, view: Box<dyn View>) -> Self {
        let mut game = Self {
            renderer,
            input: InputState::new(),
            view,
        };
        game.refit();
        game
    }

    /// Switch to another view; it is sized to the canvas at once
    pub fn to_view(&mut self, view: Box<dyn View>) {
        self.view = view;
        self.refit();
        log::info!("View switched");
    }

    /// Re-run the active view's resize hook against the canvas
    pub fn refit(&mut self) {
        let canvas = self.renderer.canvas_size();
        self.view.on_resize(canvas);
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The active view, if it is a `V`
    pub fn view<V: View + 'static>(&self) -> Option<&V> {
        self.view.as_any().downcast_ref()
    }

    pub fn view_mut<V: View + 'static>(&mut self) -> Option<&mut V> {
        self.view.as_any_mut().downcast_mut()
    }
}

impl<R: Renderer> TickHandler for Game<R> {
    fn on_tick(&mut self, clock: &mut Clock) {
        let mut ctx = ViewContext {
            renderer: &mut self.renderer,
            input: &mut self.input,
            clock,
        };
        self.view.on_update(&mut ctx);
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Recorder;
    use crate::rng::Seed;
    use crate::sim::GameLoop;

    fn arena_config() -> GameConfig {
        GameConfig {
            seed: Some(Seed::Number(7)),
            ..Default::default()
        }
    }

    fn canvas() -> Vec2 {
        Vec2::new(1600.0, 900.0)
    }

    #[test]
    fn test_projectile_kills_monster_on_its_path_once() {
        let mut config = GameConfig {
            spawn_chance: 0.0,
            ..arena_config()
        };
        if let Some(laser) = config.projectiles.get_mut("GREEN_LASER") {
            laser.accuracy = 0.0;
            laser.duration = None;
        }
        let mut view = GameplayView::new(&config).unwrap();
        let id = view.spawn_monster(Vec2::new(300.0, 0.0));
        let blueprint = view
            .catalog()
            .player
            .attack
            .as_ref()
            .map(|attack| Rc::clone(&attack.projectile))
            .unwrap();
        let laser = Projectile::new(Vec2::ZERO, &blueprint, view.rng_mut()).fire(0.0, view.rng_mut());
        view.add_projectile(laser);

        let mut game = Game::new(Recorder::new(canvas()), Box::new(view));
        let mut game_loop = GameLoop::new(60);
        game_loop.start(&mut game);
        for _ in 0..20 {
            game_loop.step(&mut game);
        }

        let view = game.view::<GameplayView>().unwrap();
        assert_eq!(view.stats().hits, 1);
        assert_eq!(view.stats().kills, 1);
        let monster = view.monsters().unwrap().iter().find(|m| m.id() == id).unwrap();
        assert!(monster.is_expired());
        assert!(view.projectiles().unwrap().iter().all(|p| p.is_expired()));
        // One directional particle plus the death burst
        assert_eq!(view.particles().unwrap().len(), 11);

        // The next cull sweeps both
        for _ in 0..10 {
            game_loop.step(&mut game);
        }
        let view = game.view::<GameplayView>().unwrap();
        assert!(view.monsters().unwrap().is_empty());
        assert!(view.projectiles().unwrap().is_empty());
        assert_eq!(view.stats().hits, 1);
    }

    #[test]
    fn test_stage_draw_order() {
        let view = GameplayView::new(&GameConfig {
            spawn_chance: 0.0,
            ..arena_config()
        })
        .unwrap();
        let mut game = Game::new(Recorder::new(canvas()), Box::new(view));
        GameLoop::new(60).run_unpaced(&mut game, 1);

        let sheets: Vec<&str> = game
            .renderer()
            .sprites_since_clear()
            .map(|sprite| sprite.sheet.as_str())
            .collect();
        assert_eq!(sheets, vec!["background", "player", "player"]);
        assert_eq!(game.renderer().depth(), 0);
    }

    #[test]
    fn test_layer_fits_view_size() {
        let view = GameplayView::new(&arena_config()).unwrap();
        let game = Game::new(Recorder::new(Vec2::new(800.0, 900.0)), Box::new(view));
        let camera = game.view::<GameplayView>().unwrap().layer().camera;
        assert_eq!(camera.offset, Some(Vec2::new(400.0, 450.0)));
        assert_eq!(camera.scale, Some(0.5));
    }

    #[test]
    fn test_autopilot_replay_is_deterministic() {
        let run = || {
            let view = GameplayView::new(&arena_config()).unwrap().with_autopilot();
            let mut game = Game::new(Recorder::new(canvas()), Box::new(view));
            GameLoop::new(60).run_unpaced(&mut game, 600);
            let view = game.view::<GameplayView>().unwrap();
            (view.stats(), view.player().unwrap().position())
        };
        let (stats, player_pos) = run();
        assert!(stats.spawned > 0);
        assert_eq!(run(), (stats, player_pos));
    }

    #[test]
    fn test_view_switch_and_downcast() {
        struct Blank;

        impl View for Blank {
            fn on_update(&mut self, ctx: &mut ViewContext<'_>) {
                ctx.renderer.clear();
                if ctx.clock.tick_count() == 2 {
                    ctx.clock.stop();
                }
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }

        let view = GameplayView::new(&arena_config()).unwrap();
        let mut game = Game::new(Recorder::new(canvas()), Box::new(view));
        assert!(game.view::<GameplayView>().is_some());

        game.to_view(Box::new(Blank));
        assert!(game.view::<GameplayView>().is_none());
        assert!(game.view_mut::<Blank>().is_some());

        let mut game_loop = GameLoop::new(60);
        game_loop.run_unpaced(&mut game, 100);
        assert_eq!(game_loop.clock().tick_count(), 2);
    }
}
