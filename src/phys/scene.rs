//! Scene: body ownership, per-tick integration, and collision dispatch
//!
//! The scene owns every body (strong `Rc` handles). Collision bindings and
//! any game-side interest hold `Weak` references; once a body is marked
//! removed and compacted out, its bindings go inert and are dropped.
//!
//! Side effects of a collision are confined to the two bodies involved;
//! everything else (sounds, game-over flags, score bookkeeping) is reported
//! to the caller as `TickEvent`s.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;

use super::body::{Body, BodyKind};
use super::collision::find_collision;

use crate::consts;

/// Shared handle to a body owned by a scene.
pub type BodyRef = Rc<RefCell<Body>>;

/// The closed set of collision responses.
///
/// Registering a pair means picking one of these instead of supplying an
/// arbitrary callback; dispatch stays exhaustive and each variant carries
/// the data its policy needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResponse {
    /// Mark the second body removed (gems and other consumables).
    RemoveTarget,
    /// Park the first body offscreen and report defeat (lava).
    EndLevelLose,
    /// Park the first body offscreen and report victory (exit door).
    EndLevelWin,
    /// Clamp the first body's velocity against the second body's faces:
    /// kill downward speed when standing on top, reflect upward speed when
    /// bumping the underside, kill horizontal speed against either side.
    /// `half_extents` are the first body's semi-axes, `landing_slack` how
    /// far the centroid may sink below the top face and still count as
    /// standing.
    PlatformClamp {
        half_extents: Vec2,
        landing_slack: f32,
    },
}

/// What a scene tick observed, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// A `RemoveTarget` response consumed a body of this kind.
    Consumed { kind: Option<BodyKind> },
    LevelLost,
    LevelWon,
}

/// A registered (first, second, response) triple watched each tick.
struct Binding {
    first: Weak<RefCell<Body>>,
    second: Weak<RefCell<Body>>,
    response: CollisionResponse,
    /// Whether the pair overlapped at the last evaluation. Dispatch does
    /// not debounce on this; it only records the contact state.
    in_contact: bool,
}

impl Binding {
    /// Both bodies still owned by the scene and not marked removed.
    fn live_pair(&self) -> Option<(BodyRef, BodyRef)> {
        let first = self.first.upgrade()?;
        let second = self.second.upgrade()?;
        if first.borrow().is_removed() || second.borrow().is_removed() {
            return None;
        }
        Some((first, second))
    }
}

/// An ordered collection of bodies plus the collision bindings watching
/// pairs of them.
#[derive(Default)]
pub struct Scene {
    bodies: Vec<BodyRef>,
    bindings: Vec<Binding>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a body, returning the shared handle.
    pub fn add_body(&mut self, body: Body) -> BodyRef {
        let handle = Rc::new(RefCell::new(body));
        self.bodies.push(handle.clone());
        handle
    }

    pub fn bodies_count(&self) -> usize {
        self.bodies.len()
    }

    /// Handle to the body at `index`. Panics on out-of-range, matching the
    /// positional-addressing contract.
    pub fn get_body(&self, index: usize) -> BodyRef {
        self.bodies[index].clone()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &BodyRef> {
        self.bodies.iter()
    }

    /// Whether the binding registered between these two bodies found them
    /// overlapping at the last tick.
    pub fn in_contact(&self, first: &BodyRef, second: &BodyRef) -> bool {
        self.bindings.iter().any(|binding| {
            binding.in_contact
                && binding
                    .first
                    .upgrade()
                    .is_some_and(|body| Rc::ptr_eq(&body, first))
                && binding
                    .second
                    .upgrade()
                    .is_some_and(|body| Rc::ptr_eq(&body, second))
        })
    }

    /// Registers a collision response for a body pair. Both handles must
    /// belong to live bodies of this scene; registering a removed body is a
    /// caller error and simply never fires.
    pub fn create_collision(
        &mut self,
        first: &BodyRef,
        second: &BodyRef,
        response: CollisionResponse,
    ) {
        self.bindings.push(Binding {
            first: Rc::downgrade(first),
            second: Rc::downgrade(second),
            response,
            in_contact: false,
        });
    }

    /// Advances the scene by `dt` seconds.
    ///
    /// Every body integrates first; then each live binding runs the SAT
    /// test and applies its response when the pair overlaps (again every
    /// tick the overlap persists - responses are built to be idempotent);
    /// finally inert bindings and removed bodies are compacted out, in that
    /// order, so a response may still observe a body removed this tick.
    pub fn tick(&mut self, dt: f32) -> Vec<TickEvent> {
        for body in &self.bodies {
            body.borrow_mut().tick(dt);
        }

        let mut events = Vec::new();
        for binding in &mut self.bindings {
            let Some((first, second)) = binding.live_pair() else {
                binding.in_contact = false;
                continue;
            };

            let result = find_collision(&first.borrow(), &second.borrow());
            if result.collided {
                if let Some(event) = apply_response(binding.response, &first, &second) {
                    events.push(event);
                }
            }
            binding.in_contact = result.collided;
        }

        self.bindings.retain(|b| b.live_pair().is_some());
        self.bodies.retain(|b| !b.borrow().is_removed());
        events
    }
}

/// Applies one response to a colliding pair, reporting any event.
fn apply_response(
    response: CollisionResponse,
    first: &BodyRef,
    second: &BodyRef,
) -> Option<TickEvent> {
    match response {
        CollisionResponse::RemoveTarget => {
            let mut target = second.borrow_mut();
            let kind = target.kind();
            target.remove();
            Some(TickEvent::Consumed { kind })
        }
        CollisionResponse::EndLevelLose => {
            first.borrow_mut().set_centroid(consts::OFFSCREEN);
            Some(TickEvent::LevelLost)
        }
        CollisionResponse::EndLevelWin => {
            first.borrow_mut().set_centroid(consts::OFFSCREEN);
            Some(TickEvent::LevelWon)
        }
        CollisionResponse::PlatformClamp {
            half_extents,
            landing_slack,
        } => {
            let (lo, hi) = second.borrow().bounds();
            let mut body = first.borrow_mut();
            let cen = body.centroid();
            let mut vel = body.velocity();

            let in_x_span = cen.x > lo.x - half_extents.x && cen.x < hi.x + half_extents.x;
            let in_y_span = cen.y > lo.y - half_extents.y && cen.y < hi.y + half_extents.y;

            // standing on the top face
            if in_x_span && cen.y - landing_slack >= hi.y {
                vel.y = 0.0;
            }
            // bumping the underside
            if in_x_span && cen.y < lo.y {
                vel.y = -vel.y;
            }
            // pressed against the left or right face
            if in_y_span && cen.x < lo.x {
                vel.x = 0.0;
            }
            if in_y_span && cen.x > hi.x {
                vel.x = 0.0;
            }

            body.set_velocity(vel);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phys::body::Color;

    fn rect_shape(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }

    fn rect_body(x0: f32, y0: f32, x1: f32, y1: f32, mass: f32) -> Body {
        Body::new(rect_shape(x0, y0, x1, y1), mass, Color::default())
    }

    #[test]
    fn test_tick_integrates_all_bodies() {
        let mut scene = Scene::new();
        let a = scene.add_body(rect_body(0.0, 0.0, 10.0, 10.0, 1.0));
        let b = scene.add_body(rect_body(100.0, 0.0, 110.0, 10.0, 1.0));
        a.borrow_mut().set_velocity(Vec2::new(10.0, 0.0));
        b.borrow_mut().set_velocity(Vec2::new(-10.0, 0.0));

        scene.tick(1.0);

        assert!((a.borrow().centroid().x - 15.0).abs() < 1e-3);
        assert!((b.borrow().centroid().x - 95.0).abs() < 1e-3);
    }

    #[test]
    fn test_removed_bodies_are_compacted_after_dispatch() {
        let mut scene = Scene::new();
        let a = scene.add_body(rect_body(0.0, 0.0, 10.0, 10.0, 1.0));
        let _b = scene.add_body(rect_body(50.0, 0.0, 60.0, 10.0, 1.0));
        assert_eq!(scene.bodies_count(), 2);

        a.borrow_mut().remove();
        scene.tick(0.01);
        assert_eq!(scene.bodies_count(), 1);
    }

    #[test]
    fn test_remove_target_fires_and_consumes() {
        let mut scene = Scene::new();
        let player = scene.add_body(rect_body(0.0, 0.0, 10.0, 10.0, 1.0));
        let gem = scene.add_body(Body::with_kind(
            rect_shape(5.0, 5.0, 15.0, 15.0),
            1.0,
            Color::default(),
            Some(BodyKind::Gem),
        ));
        scene.create_collision(&player, &gem, CollisionResponse::RemoveTarget);

        let events = scene.tick(0.01);
        assert_eq!(
            events,
            vec![TickEvent::Consumed {
                kind: Some(BodyKind::Gem)
            }]
        );
        assert_eq!(scene.bodies_count(), 1);

        // the binding went inert with its body
        let events = scene.tick(0.01);
        assert!(events.is_empty());
    }

    #[test]
    fn test_persistent_overlap_fires_every_tick() {
        let mut scene = Scene::new();
        let player = scene.add_body(rect_body(0.0, 0.0, 10.0, 10.0, 1.0));
        let lava = scene.add_body(rect_body(5.0, 5.0, 15.0, 15.0, f32::INFINITY));
        // a response without body-removing side effects would re-fire; use
        // EndLevelLose but drag the player back each tick to keep the
        // overlap alive
        scene.create_collision(&player, &lava, CollisionResponse::EndLevelLose);

        let events = scene.tick(0.01);
        assert_eq!(events, vec![TickEvent::LevelLost]);
        assert!((player.borrow().centroid() - crate::consts::OFFSCREEN).length() < 1e-3);
        // the pair overlapped when the binding was evaluated
        assert!(scene.in_contact(&player, &lava));

        player.borrow_mut().set_centroid(Vec2::new(5.0, 5.0));
        let events = scene.tick(0.01);
        assert_eq!(events, vec![TickEvent::LevelLost]);
    }

    #[test]
    fn test_binding_with_removed_body_never_dispatches() {
        let mut scene = Scene::new();
        let player = scene.add_body(rect_body(0.0, 0.0, 10.0, 10.0, 1.0));
        let gem = scene.add_body(rect_body(5.0, 5.0, 15.0, 15.0, 1.0));
        scene.create_collision(&player, &gem, CollisionResponse::RemoveTarget);

        gem.borrow_mut().remove();
        let events = scene.tick(0.01);
        assert!(events.is_empty());
        assert_eq!(scene.bodies_count(), 1);
    }

    #[test]
    fn test_platform_clamp_zeroes_landing_velocity() {
        let mut scene = Scene::new();
        // platform top face at y = 20
        let platform = scene.add_body(rect_body(0.0, 0.0, 200.0, 20.0, f32::INFINITY));
        // centroid at y=29: above top + landing slack, bottom edge overlapping
        let player = scene.add_body(rect_body(90.0, 19.0, 110.0, 39.0, 1.0));
        player.borrow_mut().set_velocity(Vec2::new(0.0, -50.0));
        scene.create_collision(
            &player,
            &platform,
            CollisionResponse::PlatformClamp {
                half_extents: Vec2::new(10.0, 10.0),
                landing_slack: 7.0,
            },
        );

        // integration over a tiny dt keeps the centroid above top + slack,
        // so the landing clamp must zero the fall
        scene.tick(0.001);
        assert_eq!(player.borrow().velocity().y, 0.0);
    }

    #[test]
    fn test_platform_clamp_blocks_sideways_motion() {
        let mut scene = Scene::new();
        // wall spanning x in [100, 120]
        let wall = scene.add_body(rect_body(100.0, 0.0, 120.0, 100.0, f32::INFINITY));
        let player = scene.add_body(rect_body(85.0, 40.0, 105.0, 60.0, 1.0));
        player.borrow_mut().set_velocity(Vec2::new(30.0, 0.0));
        scene.create_collision(
            &player,
            &wall,
            CollisionResponse::PlatformClamp {
                half_extents: Vec2::new(10.0, 10.0),
                landing_slack: 7.0,
            },
        );

        scene.tick(0.001);
        assert_eq!(player.borrow().velocity().x, 0.0);
    }
}
