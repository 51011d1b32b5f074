//! Whole-game progression scenarios driven through the public API

use std::sync::mpsc::{self, Receiver};

use brickfall::Settings;
use brickfall::consts::SIM_DT;
use brickfall::effects::NullEffects;
use brickfall::hud::{Hud, SharedText};
use brickfall::sim::{Collider, CollisionEvent, Game, Phase, SceneId, TickInput};
use glam::Vec2;

struct Harness {
    game: Game,
    scenes: Receiver<SceneId>,
    score: SharedText,
    lives: SharedText,
    message: SharedText,
}

impl Harness {
    fn new() -> Self {
        let (tx, scenes) = mpsc::channel();
        Self {
            game: Game::new(Settings::default(), tx, NullEffects),
            scenes,
            score: SharedText::new(),
            lives: SharedText::new(),
            message: SharedText::new(),
        }
    }

    /// Load every queued scene, returning what was loaded
    fn pump(&mut self) -> Vec<SceneId> {
        let mut loaded = Vec::new();
        while let Ok(scene) = self.scenes.try_recv() {
            let hud = Hud::unbound()
                .with_score(self.score.clone())
                .with_lives(self.lives.clone())
                .with_message(self.message.clone());
            self.game.load_standard_scene(scene, hud);
            loaded.push(scene);
        }
        loaded
    }

    /// Run `seconds` of idle simulation, loading scenes as they are requested
    fn run(&mut self, seconds: f32) -> Vec<SceneId> {
        let mut loaded = Vec::new();
        let steps = (seconds / SIM_DT).round() as u32;
        for _ in 0..steps {
            self.game.step(&TickInput::default(), SIM_DT);
            loaded.extend(self.pump());
        }
        loaded
    }

    fn lose_life(&mut self) {
        let Some(level) = self.game.level_mut() else {
            return;
        };
        level.ball.launched = true;
        level.ball.pos = Vec2::new(0.0, -5.2);
        level.ball.vel = Vec2::new(0.0, -12.0);
        self.game.handle_trigger(Collider::Boundary);
    }

    /// Hit every brick from below until it breaks
    fn destroy_all_bricks(&mut self) {
        let ids: Vec<u32> = match self.game.level() {
            Some(level) => level.bricks.iter().map(|b| b.id).collect(),
            None => return,
        };
        for id in ids {
            loop {
                let Some(level) = self.game.level_mut() else {
                    return;
                };
                let Some(brick) = level.brick_mut(id) else {
                    break;
                };
                if brick.is_destroyed() {
                    break;
                }
                let below = brick.pos() - Vec2::new(0.0, 0.26);
                level.ball.launched = true;
                level.ball.pos = below;
                level.ball.vel = Vec2::new(0.0, 12.0);
                level.ball.last_velocity = level.ball.vel;
                self.game.handle_collision(CollisionEvent {
                    other: Collider::Brick(id),
                    point: below + Vec2::new(0.0, 0.1),
                    normal: Vec2::NEG_Y,
                });
            }
        }
        self.game.reset_ball();
    }
}

#[test]
fn three_life_losses_lead_to_one_defeat() {
    let mut h = Harness::new();
    h.game.start_game();
    assert_eq!(h.pump(), vec![SceneId::Level(1)]);
    h.run(0.1);

    for _ in 0..3 {
        h.lose_life();
    }
    assert_eq!(h.game.session().lives(), 0);
    assert_eq!(h.lives.text(), "Lives: 0");
    assert_eq!(h.game.session().phase(), Phase::Defeat);

    // A stray fourth trigger changes nothing
    h.lose_life();
    assert_eq!(h.game.session().lives(), 0);

    assert!(h.run(0.9).is_empty());
    assert_eq!(h.run(0.2), vec![SceneId::Defeat]);
    assert!(h.run(2.0).is_empty());
    assert_eq!(h.game.session().final_score_text(), "Final Score: 0");
}

#[test]
fn clearing_fifty_bricks_loads_next_level_once() {
    let mut h = Harness::new();
    h.game.start_game();
    h.pump();
    h.run(0.1);
    assert_eq!(h.game.session().bricks_remaining(), 50);

    h.destroy_all_bricks();
    assert_eq!(h.game.session().score(), 5000);
    assert_eq!(h.score.text(), "Score: 5000");

    let loaded = h.run(0.1);
    assert!(loaded.is_empty());
    assert!(h.game.session().level_completed());
    assert_eq!(h.message.text(), "LEVEL COMPLETE!");

    let loaded = h.run(1.0);
    assert_eq!(loaded, vec![SceneId::Level(2)]);
    assert_eq!(h.game.session().scene(), SceneId::Level(2));
    assert!(!h.game.session().level_completed());
    assert_eq!(h.game.session().bricks_remaining(), 50);
    // Score and lives carry over
    assert_eq!(h.game.session().score(), 5000);
    assert_eq!(h.game.session().lives(), 3);
}

#[test]
fn clearing_last_level_loads_victory() {
    let mut h = Harness::new();
    h.game.start_game();
    h.pump();
    h.run(0.1);
    h.destroy_all_bricks();
    assert_eq!(h.run(1.0), vec![SceneId::Level(2)]);
    h.run(0.1);

    h.destroy_all_bricks();
    h.run(0.1);
    assert_eq!(h.game.session().phase(), Phase::Victory);
    assert_eq!(h.run(1.0), vec![SceneId::Victory]);
    // Top row takes two hits on level 2, still 100 points per brick
    assert_eq!(h.game.session().final_score_text(), "Final Score: 10000");
}

#[test]
fn restart_after_defeat_resets_session() {
    let mut h = Harness::new();
    h.game.start_game();
    h.pump();
    h.run(0.1);

    // Score five bricks, then lose every life
    let ids: Vec<u32> = h.game.level().unwrap().bricks.iter().take(5).map(|b| b.id).collect();
    for id in ids {
        let level = h.game.level_mut().unwrap();
        let pos = level.brick_mut(id).unwrap().pos();
        level.ball.launched = true;
        level.ball.pos = pos - Vec2::new(0.0, 0.26);
        level.ball.vel = Vec2::new(0.0, 12.0);
        level.ball.last_velocity = level.ball.vel;
        h.game.handle_collision(CollisionEvent {
            other: Collider::Brick(id),
            point: pos - Vec2::new(0.0, 0.16),
            normal: Vec2::NEG_Y,
        });
    }
    for _ in 0..3 {
        h.lose_life();
    }
    assert_eq!(h.game.session().score(), 500);
    assert_eq!(h.run(1.2), vec![SceneId::Defeat]);

    h.game.restart_game();
    assert_eq!(h.game.session().score(), 0);
    assert_eq!(h.game.session().lives(), 3);
    assert_eq!(h.pump(), vec![SceneId::Level(1)]);
    assert_eq!(h.score.text(), "Score: 0");
    assert_eq!(h.lives.text(), "Lives: 3");
}

#[test]
fn back_to_menu_leaves_play() {
    let mut h = Harness::new();
    h.game.start_game();
    h.pump();
    h.game.back_to_menu();
    assert_eq!(h.pump(), vec![SceneId::MainMenu]);
    assert!(h.game.level().is_none());
    assert_eq!(h.game.session().phase(), Phase::OutOfPlay);
    h.run(0.1);
    assert_eq!(h.game.session().bricks_remaining(), 0);
}

#[test]
fn same_seed_same_run() {
    let autopilot = TickInput {
        autopilot: true,
        ..TickInput::default()
    };
    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut h = Harness::new();
        h.game.start_game();
        h.pump();
        for _ in 0..1500 {
            h.game.step(&autopilot, SIM_DT);
            h.pump();
        }
        let ball = h.game.level().map(|l| l.ball.pos);
        runs.push((h.game.session().snapshot(), ball));
    }
    assert_eq!(runs[0], runs[1]);
}
