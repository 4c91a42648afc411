//! The courtyard dash: a side-scrolling sprint to 4000 points.
//!
//! One fixed-timestep frame per [`Runner::step`] call. Cacti roll in along
//! the ground in clumps of one to three, birds fly in on three lanes, and
//! the scroll speed creeps up every 250 points. Jumping clears cacti;
//! ducking shrinks the hitbox. Touch anything and the run is over.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const GRAVITY: f64 = 0.7;
pub const JUMP_VELOCITY: f64 = -16.0;
pub const PASS_SCORE: u32 = 4000;
pub const TOP_SPEED: f64 = 14.0;

const GROUND_RATIO: f64 = 0.7;
const DUCK_HEIGHT_SCALE: f64 = 0.58;
const DUCK_WIDTH_SCALE: f64 = 1.25;
const HITBOX_W: f64 = 28.0;
const HITBOX_H: f64 = 20.0;
const HITBOX_PAD: f64 = 4.0;
const OBSTACLE_INSET: f64 = 2.0;
const BEHIND_MARGIN: f64 = 6.0;
const PLAYER_MIN_X: f64 = 30.0;
const SPAWN_EVERY_START: u32 = 100;
const SPAWN_EVERY_MIN: u32 = 36;
const SPAWN_LEAD: f64 = 30.0;
const CULL_X: f64 = -120.0;
const SPEED_START: f64 = 4.0;
const SPEED_STEP: f64 = 0.3;
const SPEED_EVERY: u32 = 250;
const BIRD_CHANCE: f64 = 0.35;
const BIRD_HEIGHT: f64 = 24.0;
const BIRD_LANES: [f64; 3] = [40.0, 80.0, 130.0];
const CACTUS_GAP: f64 = 8.0;

/// Viewport the course is laid out against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunnerConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ObstacleKind {
    Cactus,
    Bird,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub v: f64,
    pub kind: ObstacleKind,
}

/// Held controls for one frame. `jump` fires on the frame it is set;
/// `duck` applies for as long as it stays set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunnerInput {
    pub jump: bool,
    pub duck: bool,
}

impl RunnerInput {
    pub const COAST: RunnerInput = RunnerInput { jump: false, duck: false };
    pub const JUMP: RunnerInput = RunnerInput { jump: true, duck: false };
    pub const DUCK: RunnerInput = RunnerInput { jump: false, duck: true };
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunnerStatus {
    Running,
    Crashed,
    Passed,
}

/// The dash in progress. Fields are open so front ends can draw the scene
/// directly.
#[derive(Clone, Debug)]
pub struct Runner {
    pub config: RunnerConfig,
    pub x: f64,
    pub y: f64,
    pub vy: f64,
    pub jumping: bool,
    pub ducking: bool,
    pub speed: f64,
    pub spawn_every: u32,
    pub spawn_tick: u32,
    pub score: u32,
    pub obstacles: Vec<Obstacle>,
    pub status: RunnerStatus,
    rng: SmallRng,
}

impl Runner {
    pub fn new(seed: u64) -> Self {
        Self::with_config(RunnerConfig::default(), seed)
    }

    pub fn with_config(config: RunnerConfig, seed: u64) -> Self {
        let ground = (config.height * GROUND_RATIO).floor();
        Self {
            x: (config.width * 0.06).floor().max(PLAYER_MIN_X),
            y: ground,
            vy: 0.0,
            jumping: false,
            ducking: false,
            speed: SPEED_START,
            spawn_every: SPAWN_EVERY_START,
            spawn_tick: 0,
            score: 0,
            obstacles: Vec::new(),
            status: RunnerStatus::Running,
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Back to the start line. The RNG stream carries on, so a reset run
    /// sees a fresh track rather than a repeat of the last one.
    pub fn reset(&mut self) {
        let ground = self.ground();
        self.x = (self.config.width * 0.06).floor().max(PLAYER_MIN_X);
        self.y = ground;
        self.vy = 0.0;
        self.jumping = false;
        self.ducking = false;
        self.speed = SPEED_START;
        self.spawn_every = SPAWN_EVERY_START;
        self.spawn_tick = 0;
        self.score = 0;
        self.obstacles.clear();
        self.status = RunnerStatus::Running;
    }

    pub fn ground(&self) -> f64 {
        (self.config.height * GROUND_RATIO).floor()
    }

    pub fn grounded(&self) -> bool {
        self.y >= self.ground()
    }

    /// Advance one frame. Returns the status after the frame; once the run
    /// has crashed or passed, further calls change nothing.
    pub fn step(&mut self, input: RunnerInput) -> RunnerStatus {
        if self.status != RunnerStatus::Running {
            return self.status;
        }
        if input.jump && !self.jumping && !self.ducking {
            self.vy = JUMP_VELOCITY;
            self.jumping = true;
        }

        let ground = self.ground();
        self.vy += GRAVITY;
        self.y += self.vy;
        if self.y >= ground {
            self.y = ground;
            self.vy = 0.0;
            self.jumping = false;
        }
        self.ducking = input.duck && self.y >= ground;

        self.spawn_tick += 1;
        if self.spawn_tick >= self.spawn_every {
            self.spawn_obstacle();
            self.spawn_tick = 0;
            self.spawn_every = self.spawn_every.saturating_sub(1).max(SPAWN_EVERY_MIN);
        }

        let pace = self.speed;
        for o in &mut self.obstacles {
            o.x -= o.v.max(pace);
        }
        self.obstacles.retain(|o| o.x > CULL_X);

        let mut crashed = false;
        for o in &self.obstacles {
            if o.x + o.w < self.x - BEHIND_MARGIN {
                continue;
            }
            if self.hits(o) {
                crashed = true;
                break;
            }
        }

        // score ticks even on the crash frame
        self.score += 1;
        if self.score % SPEED_EVERY == 0 {
            self.speed = (self.speed + SPEED_STEP).min(TOP_SPEED);
        }

        if crashed {
            self.status = RunnerStatus::Crashed;
        } else if self.score >= PASS_SCORE {
            self.status = RunnerStatus::Passed;
        }
        self.status
    }

    fn spawn_obstacle(&mut self) {
        let ground = self.ground();
        let start = self.config.width + SPAWN_LEAD;
        if self.rng.gen_bool(BIRD_CHANCE) {
            let lane = *BIRD_LANES.choose(&mut self.rng).unwrap_or(&BIRD_LANES[0]);
            self.obstacles.push(Obstacle {
                x: start,
                y: ground - lane - BIRD_HEIGHT,
                w: self.rng.gen_range(34.0..56.0),
                h: BIRD_HEIGHT,
                v: self.speed + 0.5,
                kind: ObstacleKind::Bird,
            });
        } else {
            let pieces = self.rng.gen_range(1..=3);
            let mut x = start;
            for _ in 0..pieces {
                let w = self.rng.gen_range(16.0..34.0);
                let h = self.rng.gen_range(22.0..50.0);
                self.obstacles.push(Obstacle {
                    x,
                    y: ground - h,
                    w,
                    h,
                    v: self.speed,
                    kind: ObstacleKind::Cactus,
                });
                x += w + CACTUS_GAP;
            }
        }
    }

    /// Axis-aligned overlap between the padded player box and the obstacle,
    /// both shrunk a little so grazes do not count.
    fn hits(&self, o: &Obstacle) -> bool {
        let rh = if self.ducking {
            (HITBOX_H * DUCK_HEIGHT_SCALE).floor()
        } else {
            HITBOX_H
        };
        let rw = if self.ducking {
            (HITBOX_W * DUCK_WIDTH_SCALE).floor()
        } else {
            HITBOX_W
        };
        let rx = self.x - (rw * 0.5).floor();
        let ry = self.y - rh;
        let (ax1, ay1) = (rx + HITBOX_PAD, ry + HITBOX_PAD);
        let (ax2, ay2) = (rx + rw - HITBOX_PAD, ry + rh - HITBOX_PAD);
        let (bx1, by1) = (o.x + OBSTACLE_INSET, o.y + OBSTACLE_INSET);
        let (bx2, by2) = (o.x + o.w - OBSTACLE_INSET, o.y + o.h - OBSTACLE_INSET);
        !(ax2 < bx1 || ax1 > bx2 || ay2 < by1 || ay1 > by2)
    }
}
