//! Level geometry tables and scene factories
//!
//! Three hand-laid maps, each a set of axis-aligned rectangles (bricks,
//! lava strips, water strips, exit, elevators, doors, buttons) plus gem
//! positions. Rectangles are stored center + size, matching how the level
//! editor sketches them.

use glam::Vec2;

use crate::consts;
use crate::phys::{Body, BodyKind, BodyRef, Color, CollisionResponse, Scene};

pub const OBSTACLE_COLOR: Color = Color::rgb(0.2, 0.2, 0.3);
pub const PLAYER_COLOR: Color = Color::rgb(0.1, 0.9, 0.2);

/// An axis-aligned rectangle given by center and size.
#[derive(Debug, Clone, Copy)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

const fn rect(x: f32, y: f32, w: f32, h: f32) -> RectDef {
    RectDef { x, y, w, h }
}

/// Everything needed to build one map.
pub struct LevelDef {
    pub bricks: &'static [RectDef],
    pub lava: &'static [RectDef],
    pub water: &'static [RectDef],
    pub gems: &'static [Vec2],
    pub exit: RectDef,
    pub elevators: &'static [RectDef],
    /// (top, bottom) travel bounds per elevator, same order as `elevators`
    pub elevator_ranges: &'static [(f32, f32)],
    pub elevator_buttons: &'static [RectDef],
    pub doors: &'static [RectDef],
    pub door_buttons: &'static [RectDef],
}

const BRICKS_1: [RectDef; 14] = [
    rect(375.0, -500.0, 750.0, 30.0),
    rect(160.0, 425.0, 320.0, 20.0),
    rect(560.0, 425.0, 150.0, 20.0),
    rect(425.0, 300.0, 650.0, 20.0),
    rect(325.0, 200.0, 650.0, 20.0),
    rect(180.0, 75.0, 175.0, 20.0),
    rect(500.0, 75.0, 175.0, 20.0),
    rect(730.0, 330.0, 40.0, 60.0),
    rect(30.0, 235.0, 60.0, 70.0),
    rect(730.0, 90.0, 40.0, 60.0),
    rect(715.0, 35.0, 70.0, 70.0),
    rect(375.0, 0.0, 750.0, 30.0),
    rect(0.0, 250.0, 30.0, 500.0),
    rect(750.0, 250.0, 30.0, 500.0),
];

const BRICKS_2: [RectDef; 12] = [
    rect(100.0, 390.0, 200.0, 20.0), // where the door is
    rect(450.0, 390.0, 300.0, 20.0),
    rect(350.0, 290.0, 350.0, 20.0),
    rect(630.0, 270.0, 300.0, 20.0),
    rect(715.0, 290.0, 70.0, 60.0),
    rect(225.0, 200.0, 450.0, 20.0),
    rect(500.0, 130.0, 300.0, 20.0),
    rect(100.0, 80.0, 200.0, 20.0), // starting platform
    rect(710.0, 30.0, 80.0, 60.0),
    rect(375.0, 0.0, 750.0, 30.0), // border
    rect(0.0, 250.0, 30.0, 500.0),
    rect(750.0, 250.0, 30.0, 500.0),
];

const BRICKS_3: [RectDef; 12] = [
    rect(50.0, 390.0, 100.0, 20.0), // where the door is
    rect(185.0, 275.0, 20.0, 200.0),
    rect(375.0, 250.0, 20.0, 250.0),
    rect(435.0, 315.0, 120.0, 20.0),
    rect(580.0, 230.0, 90.0, 20.0),
    rect(690.0, 370.0, 120.0, 20.0),
    rect(240.0, 230.0, 90.0, 20.0),
    rect(140.0, 325.0, 90.0, 20.0),
    rect(325.0, 120.0, 650.0, 20.0), // starting platform
    rect(375.0, 0.0, 750.0, 30.0),   // border
    rect(0.0, 250.0, 30.0, 500.0),
    rect(750.0, 250.0, 30.0, 500.0),
];

const LAVA_1: [RectDef; 4] = [
    rect(180.0, 15.0, 165.0, 11.0),
    rect(500.0, 85.0, 165.0, 11.0),
    rect(500.0, 310.0, 100.0, 11.0),
    rect(252.0, 310.0, 140.0, 11.0),
];

const LAVA_2: [RectDef; 4] = [
    rect(500.0, 15.0, 140.0, 11.0),
    rect(580.0, 140.0, 80.0, 11.0),
    rect(510.0, 400.0, 60.0, 11.0),
    rect(390.0, 400.0, 60.0, 11.0),
];

const LAVA_3: [RectDef; 2] = [rect(550.0, 15.0, 90.0, 11.0), rect(225.0, 240.0, 50.0, 11.0)];

const WATER_1: [RectDef; 2] = [rect(500.0, 210.0, 165.0, 11.0), rect(220.0, 210.0, 120.0, 11.0)];
const WATER_2: [RectDef; 2] = [rect(300.0, 300.0, 120.0, 11.0), rect(110.0, 90.0, 100.0, 11.0)];
const WATER_3: [RectDef; 2] = [rect(280.0, 15.0, 160.0, 11.0), rect(670.0, 380.0, 70.0, 11.0)];

const GEMS_1: [Vec2; 3] = [
    Vec2::new(180.0, 100.0),
    Vec2::new(560.0, 450.0),
    Vec2::new(375.0, 325.0),
];
const GEMS_2: [Vec2; 3] = [
    Vec2::new(120.0, 100.0),
    Vec2::new(430.0, 310.0),
    Vec2::new(450.0, 410.0),
];
const GEMS_3: [Vec2; 3] = [
    Vec2::new(670.0, 390.0),
    Vec2::new(580.0, 250.0),
    Vec2::new(135.0, 345.0),
];

const ELEVATORS: [RectDef; 3] = [
    rect(50.0, 220.0, 70.0, 20.0),
    rect(700.0, 25.0, 70.0, 20.0),
    rect(50.0, 200.0, 70.0, 20.0),
];

const ELEVATOR_RANGES: [(f32, f32); 3] = [(310.0, 230.0), (310.0, 35.0), (310.0, 210.0)];

const E_BUTTONS: [RectDef; 2] = [rect(475.0, 150.0, 30.0, 20.0), rect(400.0, 25.0, 30.0, 20.0)];

const DOORS: [RectDef; 2] = [rect(300.0, 245.0, 30.0, 70.0), rect(250.0, 175.0, 30.0, 90.0)];

const BUTTONS: [RectDef; 2] = [rect(40.0, 100.0, 30.0, 20.0), rect(500.0, 140.0, 30.0, 20.0)];

pub const LEVELS: [LevelDef; consts::LEVEL_COUNT] = [
    LevelDef {
        bricks: &BRICKS_1,
        lava: &LAVA_1,
        water: &WATER_1,
        gems: &GEMS_1,
        exit: rect(60.0, 458.0, 45.0, 45.0),
        elevators: &[],
        elevator_ranges: &[],
        elevator_buttons: &[],
        doors: &[],
        door_buttons: &[],
    },
    LevelDef {
        bricks: &BRICKS_2,
        lava: &LAVA_2,
        water: &WATER_2,
        gems: &GEMS_2,
        exit: rect(60.0, 424.0, 45.0, 45.0),
        elevators: &[ELEVATORS[0]],
        elevator_ranges: &[ELEVATOR_RANGES[0]],
        elevator_buttons: &[E_BUTTONS[0]],
        doors: &[DOORS[0]],
        door_buttons: &[BUTTONS[0]],
    },
    LevelDef {
        bricks: &BRICKS_3,
        lava: &LAVA_3,
        water: &WATER_3,
        gems: &GEMS_3,
        exit: rect(60.0, 424.0, 45.0, 45.0),
        elevators: &[ELEVATORS[1], ELEVATORS[2]],
        elevator_ranges: &[ELEVATOR_RANGES[1], ELEVATOR_RANGES[2]],
        elevator_buttons: &[E_BUTTONS[1]],
        doors: &[DOORS[1]],
        door_buttons: &[BUTTONS[1]],
    },
];

/// An immovable rectangular obstacle centered on the table entry.
pub fn obstacle(def: &RectDef, kind: BodyKind) -> Body {
    let shape = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(def.w, 0.0),
        Vec2::new(def.w, def.h),
        Vec2::new(0.0, def.h),
    ];
    let mut body = Body::with_kind(shape, f32::INFINITY, OBSTACLE_COLOR, Some(kind));
    body.set_centroid(Vec2::new(def.x, def.y));
    body
}

/// The rounded lobe outline shared by the player and the gems.
fn lobe(center: Vec2, radius_x: f32, radius_y: f32) -> Vec<Vec2> {
    let center = center + Vec2::new(0.0, radius_y);
    (0..consts::LOBE_POINTS)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / consts::LOBE_POINTS as f32;
            center + Vec2::new(radius_x * angle.cos(), radius_y * angle.sin())
        })
        .collect()
}

/// The player body, at rest with no kind tag.
pub fn player_body() -> Body {
    Body::new(
        lobe(Vec2::ZERO, consts::PLAYER_RADIUS_X, consts::PLAYER_RADIUS_Y),
        1.0,
        PLAYER_COLOR,
    )
}

/// A collectible gem at the given position.
pub fn gem_body(center: Vec2) -> Body {
    Body::with_kind(
        lobe(center, consts::PLAYER_RADIUS_X, consts::PLAYER_RADIUS_Y),
        1.0,
        OBSTACLE_COLOR,
        Some(BodyKind::Gem),
    )
}

/// A freshly built level: the scene, the player handle, and the elevators
/// paired with their travel ranges.
pub struct LevelScene {
    pub scene: Scene,
    pub player: BodyRef,
    pub elevators: Vec<(BodyRef, (f32, f32))>,
}

const PLATFORM_CLAMP: CollisionResponse = CollisionResponse::PlatformClamp {
    half_extents: Vec2::new(consts::PLAYER_RADIUS_X, consts::PLAYER_RADIUS_Y),
    landing_slack: consts::LANDING_SLACK,
};

/// Builds the scene for one level: the player first (index 0, as the rest
/// of the game assumes), then every obstacle with its collision response
/// registered against the player.
pub fn build_level(index: usize) -> LevelScene {
    let def = &LEVELS[index];
    let mut scene = Scene::new();

    let mut body = player_body();
    body.set_centroid(consts::PLAYER_START);
    let player = scene.add_body(body);

    for brick in def.bricks {
        let handle = scene.add_body(obstacle(brick, BodyKind::Platform));
        scene.create_collision(&player, &handle, PLATFORM_CLAMP);
    }

    for strip in def.lava {
        let handle = scene.add_body(obstacle(strip, BodyKind::Lava));
        scene.create_collision(&player, &handle, CollisionResponse::EndLevelLose);
    }

    // water is scenery: no response registered
    for strip in def.water {
        scene.add_body(obstacle(strip, BodyKind::Water));
    }

    for center in def.gems {
        let handle = scene.add_body(gem_body(*center));
        scene.create_collision(&player, &handle, CollisionResponse::RemoveTarget);
    }

    let exit = scene.add_body(obstacle(&def.exit, BodyKind::Exit));
    scene.create_collision(&player, &exit, CollisionResponse::EndLevelWin);

    let mut elevators = Vec::new();
    for (entry, range) in def.elevators.iter().zip(def.elevator_ranges) {
        let handle = scene.add_body(obstacle(entry, BodyKind::Elevator));
        scene.create_collision(&player, &handle, PLATFORM_CLAMP);
        elevators.push((handle, *range));
    }

    for entry in def.elevator_buttons {
        let handle = scene.add_body(obstacle(entry, BodyKind::ElevatorButton));
        scene.create_collision(&player, &handle, PLATFORM_CLAMP);
    }

    for entry in def.doors {
        let handle = scene.add_body(obstacle(entry, BodyKind::Door));
        scene.create_collision(&player, &handle, PLATFORM_CLAMP);
    }

    for entry in def.door_buttons {
        let handle = scene.add_body(obstacle(entry, BodyKind::DoorButton));
        scene.create_collision(&player, &handle, PLATFORM_CLAMP);
    }

    LevelScene {
        scene,
        player,
        elevators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_is_centered_and_immovable() {
        let def = rect(375.0, 0.0, 750.0, 30.0);
        let body = obstacle(&def, BodyKind::Platform);
        assert!((body.centroid() - Vec2::new(375.0, 0.0)).length() < 1e-3);
        assert!(body.mass().is_infinite());
        let (lo, hi) = body.bounds();
        assert!((hi.x - lo.x - 750.0).abs() < 1e-3);
        assert!((hi.y - lo.y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_player_body_shape() {
        let body = player_body();
        assert_eq!(body.shape().len(), consts::LOBE_POINTS);
        assert_eq!(body.mass(), 1.0);
        assert_eq!(body.kind(), None);
    }

    #[test]
    fn test_build_level_puts_player_first() {
        for index in 0..consts::LEVEL_COUNT {
            let level = build_level(index);
            assert!(std::rc::Rc::ptr_eq(&level.player, &level.scene.get_body(0)));
            assert!((level.player.borrow().centroid() - consts::PLAYER_START).length() < 1e-3);
        }
    }

    #[test]
    fn test_build_level_body_counts() {
        let def = &LEVELS[0];
        let level = build_level(0);
        let expected = 1 // player
            + def.bricks.len()
            + def.lava.len()
            + def.water.len()
            + def.gems.len()
            + 1; // exit
        assert_eq!(level.scene.bodies_count(), expected);
        assert!(level.elevators.is_empty());

        let level2 = build_level(1);
        assert_eq!(level2.elevators.len(), 1);
    }

    #[test]
    fn test_every_level_has_three_gems() {
        for def in &LEVELS {
            assert_eq!(def.gems.len(), consts::GEMS_PER_LEVEL);
            assert_eq!(def.elevators.len(), def.elevator_ranges.len());
        }
    }
}
