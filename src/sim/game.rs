//! Game composition and fixed timestep tick
//!
//! `Game` owns everything with a lifetime longer than a single entity: the
//! progression session, the timer queue, the seeded RNG and the host services.
//! Entities receive what they need by `&mut` and report back through return
//! values or scheduled [`Timer`]s, which `Game` executes.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::brick::{BrickHit, BrickId};
use super::collision::{Aabb, Collider, CollisionEvent, ball_aabb_collision};
use super::level::Level;
use super::progression::{GameSession, SceneId, SceneLoader};
use super::scheduler::Scheduler;
use crate::consts::*;
use crate::effects::{EffectSink, SoundEffect};
use crate::hud::Hud;
use crate::settings::Settings;

/// Delayed game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timer {
    /// Census for a freshly loaded scene
    CountBricks,
    /// Re-derive the brick counter after a destruction
    VerifyBrickCount,
    LoadScene(SceneId),
    /// Temporary speed change expired
    RestoreBallSpeed,
    /// Hit flash expired
    RestoreBrickColor(BrickId),
    RegenerateBrick(BrickId),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal paddle input in [-1, 1]
    pub axis: f32,
    /// Launch the resting ball
    pub launch: bool,
    /// Demo mode - the paddle plays by itself
    pub autopilot: bool,
}

/// A running game
pub struct Game {
    settings: Settings,
    session: GameSession,
    scheduler: Scheduler<Timer>,
    level: Option<Level>,
    rng: Pcg32,
    loader: Box<dyn SceneLoader>,
    effects: Box<dyn EffectSink>,
    accumulator: f32,
}

impl Game {
    pub fn new(
        settings: Settings,
        loader: impl SceneLoader + 'static,
        effects: impl EffectSink + 'static,
    ) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed);
        let session = GameSession::new(settings.progression.clone());
        Self {
            settings,
            session,
            scheduler: Scheduler::new(),
            level: None,
            rng,
            loader: Box::new(loader),
            effects: Box::new(effects),
            accumulator: 0.0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn scheduler(&self) -> &Scheduler<Timer> {
        &self.scheduler
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    /// Bricks still to be destroyed in the loaded level
    pub fn live_brick_count(&self) -> usize {
        self.level.as_ref().map_or(0, Level::live_brick_count)
    }

    /// Fresh run from level 1
    pub fn start_game(&mut self) {
        self.session.reset_game();
        self.loader.load_scene(SceneId::Level(1));
    }

    /// Same as [`start_game`](Self::start_game), from the victory/defeat screens
    pub fn restart_game(&mut self) {
        self.start_game();
    }

    pub fn back_to_menu(&mut self) {
        self.loader.load_scene(SceneId::MainMenu);
    }

    /// The host finished loading `scene`
    ///
    /// Pending timers belong to the previous scene and are dropped.
    pub fn on_scene_loaded(&mut self, scene: SceneId, level: Option<Level>, hud: Hud) {
        self.scheduler.clear();
        self.level = level;
        self.session.on_scene_loaded(scene, hud, &mut self.scheduler);
    }

    /// Load `scene` with the standard layout for playable levels
    pub fn load_standard_scene(&mut self, scene: SceneId, hud: Hud) {
        let level = match scene {
            SceneId::Level(n) => Some(Level::standard(n, &self.settings)),
            _ => None,
        };
        self.on_scene_loaded(scene, level, hud);
    }

    /// Scale the ball's target speed, optionally for `duration` seconds
    pub fn apply_speed_multiplier(&mut self, multiplier: f32, duration: f32) {
        if let Some(level) = &mut self.level {
            level
                .ball
                .apply_speed_multiplier(multiplier, duration, &mut self.scheduler);
        }
    }

    /// Put the ball back on the paddle. Pending timers are kept.
    pub fn reset_ball(&mut self) {
        if let Some(level) = &mut self.level {
            level.ball.reset();
            level.ball.follow(&level.paddle);
        }
    }

    /// Debug recount of the live bricks
    pub fn force_count_bricks(&mut self) {
        let live = self.live_brick_count();
        self.session.force_count_bricks(live, &mut self.scheduler);
    }

    /// Hide brick `id` and bring it back after the configured regeneration delay
    ///
    /// Returns false if the level has no such brick.
    pub fn regenerate_brick(&mut self, id: BrickId) -> bool {
        let delay = self.settings.brick.regeneration_delay;
        match self.level.as_mut().and_then(|l| l.brick_mut(id)) {
            Some(brick) => {
                brick.begin_regeneration(delay, &mut self.scheduler);
                true
            }
            None => false,
        }
    }

    /// Accumulate frame time and run whole simulation steps
    ///
    /// Returns the number of steps run.
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut input = input.clone();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(&input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs apply to the first step only
            input.launch = false;
        }
        substeps
    }

    /// Advance the game by one fixed step
    ///
    /// Timers due at the start of the step run first, so anything scheduled
    /// for the next step by the previous one sees a settled level.
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        for timer in self.scheduler.advance(dt) {
            self.run_timer(timer);
        }

        let input = if input.autopilot {
            self.autopilot_input(dt)
        } else {
            input.clone()
        };

        let Some(level) = &mut self.level else {
            return;
        };

        level.paddle.update(input.axis, dt);
        level.ball.follow(&level.paddle);
        if input.launch && level.ball.launch(&mut self.rng) {
            self.effects.play_sound(SoundEffect::Launch, level.ball.pos);
        }

        if level.ball.launched {
            self.integrate_ball(dt);
        }

        if let Some(level) = &mut self.level {
            level.ball.tick();
            level.remove_destroyed();
        }
    }

    /// Move the ball in slices no longer than its radius, resolving contacts per slice
    fn integrate_ball(&mut self, dt: f32) {
        let Some(level) = &self.level else {
            return;
        };
        let travel = level.ball.vel.length() * dt;
        let slices = (travel / level.ball.radius).ceil().clamp(1.0, 16.0) as u32;
        let slice_dt = dt / slices as f32;

        for _ in 0..slices {
            let Some(level) = &mut self.level else {
                return;
            };
            if !level.ball.launched {
                return;
            }
            level.ball.pos += level.ball.vel * slice_dt;
            self.resolve_contacts();
        }
    }

    /// Built-in contact generation against the level's boxes
    fn resolve_contacts(&mut self) {
        let Some(level) = &mut self.level else {
            return;
        };

        let mut contacts: Vec<(Collider, Aabb)> = level
            .walls
            .iter()
            .map(|wall| (Collider::Wall, *wall))
            .collect();
        contacts.push((Collider::Paddle(level.paddle.bounds()), level.paddle.aabb()));
        contacts.extend(
            level
                .bricks
                .iter()
                .filter(|b| b.collidable)
                .map(|b| (Collider::Brick(b.id), b.aabb)),
        );

        for (other, aabb) in contacts {
            let Some(level) = &mut self.level else {
                return;
            };
            let ball = &mut level.ball;
            let result = ball_aabb_collision(ball.pos, ball.radius, &aabb);
            // Only surfaces the ball is moving into
            if !result.hit || ball.vel.dot(result.normal) >= 0.0 {
                continue;
            }
            ball.pos += result.normal * result.penetration;
            self.handle_collision(CollisionEvent {
                other,
                point: result.point,
                normal: result.normal,
            });
        }

        let in_boundary = self
            .level
            .as_ref()
            .is_some_and(|l| l.boundary.overlaps(l.ball.pos, l.ball.radius));
        if in_boundary {
            self.handle_trigger(Collider::Boundary);
        }
    }

    /// Dispatch a contact to the entities involved
    pub fn handle_collision(&mut self, event: CollisionEvent) {
        let Some(level) = &mut self.level else {
            return;
        };
        if !level.ball.launched {
            return;
        }

        match event.other {
            Collider::Brick(id) => {
                let Some(brick) = level.bricks.iter_mut().find(|b| b.id == id) else {
                    level.ball.on_collision(&event, &mut self.rng);
                    return;
                };
                let hit = brick.on_ball_hit(
                    &mut level.ball,
                    event.normal,
                    &mut self.rng,
                    &mut self.scheduler,
                    &mut *self.effects,
                );
                if let BrickHit::Destroyed { points } = hit {
                    self.session.add_score(points);
                    self.session.brick_destroyed(&mut self.scheduler);
                }
            }
            Collider::Boundary => self.handle_trigger(Collider::Boundary),
            Collider::Paddle(_) => {
                self.effects.play_sound(SoundEffect::PaddleHit, event.point);
                level.ball.on_collision(&event, &mut self.rng);
            }
            Collider::Wall => {
                self.effects.play_sound(SoundEffect::WallHit, event.point);
                level.ball.on_collision(&event, &mut self.rng);
            }
            Collider::Other => level.ball.on_collision(&event, &mut self.rng),
        }
    }

    /// The ball entered a trigger region
    pub fn handle_trigger(&mut self, other: Collider) {
        let Some(level) = &mut self.level else {
            return;
        };
        if other != Collider::Boundary || !level.ball.launched {
            return;
        }

        self.effects.play_sound(SoundEffect::LifeLost, level.ball.pos);
        level
            .boundary
            .on_ball_enter(&mut level.ball, &mut self.session, &mut self.scheduler);
        level.ball.follow(&level.paddle);
    }

    fn run_timer(&mut self, timer: Timer) {
        match timer {
            Timer::CountBricks => {
                let live = self.live_brick_count();
                self.session.count_bricks(live);
            }
            Timer::VerifyBrickCount => {
                let live = self.live_brick_count();
                self.session.verify_brick_count(live, &mut self.scheduler);
            }
            Timer::LoadScene(scene) => {
                log::info!("Loading scene {scene}");
                self.loader.load_scene(scene);
            }
            Timer::RestoreBallSpeed => {
                if let Some(level) = &mut self.level {
                    level.ball.restore_speed();
                }
            }
            Timer::RestoreBrickColor(id) => {
                if let Some(brick) = self.level.as_mut().and_then(|l| l.brick_mut(id)) {
                    brick.end_flash();
                }
            }
            Timer::RegenerateBrick(id) => {
                if let Some(brick) = self.level.as_mut().and_then(|l| l.brick_mut(id)) {
                    brick.regenerate(&mut self.scheduler);
                }
            }
        }
    }

    /// Track the ball, aiming bounces toward the nearest remaining brick
    fn autopilot_input(&self, dt: f32) -> TickInput {
        let Some(level) = &self.level else {
            return TickInput::default();
        };
        let ball = &level.ball;
        let paddle = &level.paddle;

        let mut target_x = ball.pos.x;
        if ball.launched && ball.vel.y < 0.0 {
            let aim = level
                .bricks
                .iter()
                .filter(|b| b.counts_for_clear() && b.collidable)
                .map(|b| b.pos())
                .min_by(|a, b| {
                    a.distance_squared(ball.pos)
                        .total_cmp(&b.distance_squared(ball.pos))
                });
            if let Some(aim) = aim {
                // Hitting right of centre sends the ball right
                let lean = ((aim.x - ball.pos.x) / 8.0).clamp(-1.0, 1.0);
                target_x -= lean * paddle.width() * 0.4;
            }
        }

        TickInput {
            axis: paddle.axis_toward(target_x, dt),
            launch: !ball.launched,
            autopilot: true,
        }
    }
}
