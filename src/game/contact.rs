//! Direction-classified contact probing
//!
//! Movement clamping and jump eligibility need to know not just *that* the
//! player touches something solid but *where* the obstacle sits relative to
//! the player. Each solid body in contact contributes one direction,
//! classified from the player centroid against the obstacle's bounds.

use std::rc::Rc;

use bitflags::bitflags;

use crate::consts;
use crate::phys::{BodyRef, Scene, find_collision};

bitflags! {
    /// Where solid obstacles currently touch the player.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ContactDirs: u8 {
        /// Standing on top of an obstacle
        const GROUND = 1 << 0;
        /// Obstacle overhead (head bump)
        const CEILING = 1 << 1;
        /// Obstacle flush against the player's left side
        const WALL_LEFT = 1 << 2;
        /// Obstacle flush against the player's right side
        const WALL_RIGHT = 1 << 3;
    }
}

/// Classifies every solid body overlapping the player.
///
/// A body counts as ground while the player centroid is horizontally within
/// the body's extended span and sits no lower than `LANDING_SLACK` above its
/// top face; the remaining directions follow the same scheme. Each body
/// contributes at most one direction.
pub fn probe_contacts(scene: &Scene, player: &BodyRef) -> ContactDirs {
    let mut dirs = ContactDirs::empty();
    let probe = player.borrow();
    let cen = probe.centroid();

    for body in scene.bodies() {
        if Rc::ptr_eq(body, player) {
            continue;
        }
        let other = body.borrow();
        if !other.kind().is_some_and(|k| k.is_solid()) {
            continue;
        }
        if !find_collision(&probe, &other).collided {
            continue;
        }

        let (lo, hi) = other.bounds();
        let in_x_span =
            cen.x > lo.x - consts::PLAYER_RADIUS_X && cen.x < hi.x + consts::PLAYER_RADIUS_X;
        let in_y_span =
            cen.y > lo.y - consts::PLAYER_RADIUS_Y && cen.y < hi.y + consts::PLAYER_RADIUS_Y;

        if in_x_span && cen.y - consts::LANDING_SLACK >= hi.y {
            dirs |= ContactDirs::GROUND;
        } else if in_x_span && cen.y < lo.y {
            dirs |= ContactDirs::CEILING;
        } else if in_y_span && cen.x < lo.x {
            dirs |= ContactDirs::WALL_RIGHT;
        } else if in_y_span && cen.x > hi.x {
            dirs |= ContactDirs::WALL_LEFT;
        }
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::levels::{RectDef, obstacle, player_body};
    use crate::phys::BodyKind;
    use glam::Vec2;

    fn scene_with_player(center: Vec2) -> (Scene, BodyRef) {
        let mut scene = Scene::new();
        let mut body = player_body();
        body.set_centroid(center);
        let player = scene.add_body(body);
        (scene, player)
    }

    fn platform(x: f32, y: f32, w: f32, h: f32) -> RectDef {
        RectDef { x, y, w, h }
    }

    #[test]
    fn test_standing_on_platform_is_ground() {
        // platform top face at y = 30; player centroid 14 above it
        let (mut scene, player) = scene_with_player(Vec2::new(100.0, 44.0));
        scene.add_body(obstacle(&platform(100.0, 20.0, 200.0, 20.0), BodyKind::Platform));

        let dirs = probe_contacts(&scene, &player);
        assert!(dirs.contains(ContactDirs::GROUND));
        assert!(!dirs.contains(ContactDirs::CEILING));
    }

    #[test]
    fn test_wall_on_the_right() {
        let (mut scene, player) = scene_with_player(Vec2::new(88.0, 50.0));
        scene.add_body(obstacle(&platform(110.0, 50.0, 20.0, 100.0), BodyKind::Platform));

        let dirs = probe_contacts(&scene, &player);
        assert!(dirs.contains(ContactDirs::WALL_RIGHT));
        assert!(!dirs.contains(ContactDirs::WALL_LEFT));
    }

    #[test]
    fn test_obstacle_overhead_is_ceiling() {
        // platform underside at y = 90; player centroid below it
        let (mut scene, player) = scene_with_player(Vec2::new(100.0, 76.0));
        scene.add_body(obstacle(&platform(100.0, 100.0, 200.0, 20.0), BodyKind::Platform));

        let dirs = probe_contacts(&scene, &player);
        assert!(dirs.contains(ContactDirs::CEILING));
    }

    #[test]
    fn test_water_is_not_solid() {
        let (mut scene, player) = scene_with_player(Vec2::new(100.0, 44.0));
        scene.add_body(obstacle(&platform(100.0, 20.0, 200.0, 20.0), BodyKind::Water));

        assert!(probe_contacts(&scene, &player).is_empty());
    }

    #[test]
    fn test_no_contact_when_clear_of_everything() {
        let (mut scene, player) = scene_with_player(Vec2::new(100.0, 200.0));
        scene.add_body(obstacle(&platform(100.0, 20.0, 200.0, 20.0), BodyKind::Platform));

        assert!(probe_contacts(&scene, &player).is_empty());
    }
}
