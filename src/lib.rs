//! Gemfall - a gem-collecting platform game
//!
//! Core modules:
//! - `phys`: Deterministic physics core (bodies, SAT collision, scene)
//! - `game`: Level data, input handling, and the screen state machine
//! - `assets`: Renderer-facing asset cache and sprite descriptors
//! - `progress`: Per-level best scores and completion flags

pub mod assets;
pub mod game;
pub mod phys;
pub mod progress;

pub use game::{Game, Key, KeyEventKind, Screen, SoundEffect};
pub use phys::{Body, BodyKind, CollisionResult, Color, Scene, find_collision};
pub use progress::{Medal, Progress};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// World bounds (matches the renderer's logical viewport)
    pub const WORLD_MIN: Vec2 = Vec2::new(0.0, 0.0);
    pub const WORLD_MAX: Vec2 = Vec2::new(750.0, 500.0);

    /// Where the player spawns in every level
    pub const PLAYER_START: Vec2 = Vec2::new(40.0, 40.0);
    /// Where defeated/finished players are parked, well outside the world
    pub const OFFSCREEN: Vec2 = Vec2::new(-500.0, -500.0);

    /// Player lobe dimensions (horizontal and vertical semi-axes)
    pub const PLAYER_RADIUS_X: f32 = 15.0;
    pub const PLAYER_RADIUS_Y: f32 = 15.0;
    /// Vertex count for the player/gem lobes
    pub const LOBE_POINTS: usize = 20;

    /// A landing counts while the player centroid sits at most this far
    /// below an obstacle's top face
    pub const LANDING_SLACK: f32 = PLAYER_RADIUS_X - 8.0;

    /// Horizontal walk speed (units/s)
    pub const WALK_SPEED: f32 = 200.0;
    /// Jump launch speed (units/s)
    pub const JUMP_SPEED: f32 = 240.0;
    /// Elevator travel speed (units/s)
    pub const ELEVATOR_SPEED: f32 = 20.0;
    /// Downward acceleration applied to the airborne player (units/s²)
    pub const GRAVITY: f32 = 320.0;

    /// Frames longer than this are dropped rather than integrated
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Number of levels and gems per level
    pub const LEVEL_COUNT: usize = 3;
    pub const GEMS_PER_LEVEL: usize = 3;

    /// Level par time used by the score formula
    pub const PAR_TIME: f32 = 60.0;

    /// Medal thresholds for the homepage gems
    pub const RED_THRESHOLD: f32 = 0.0;
    pub const ORANGE_THRESHOLD: f32 = 5.0;
    pub const GREEN_THRESHOLD: f32 = 15.0;

    /// Seconds per animation frame for three-frame animations (lava, water)
    pub const ANIM_FRAME_SECS: f32 = 0.25;
}
