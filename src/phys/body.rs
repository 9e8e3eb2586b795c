//! Rigid bodies constrained to the plane
//!
//! A body is a convex polygon with uniform density. Vertices are stored in
//! world coordinates and shifted in place when the body moves; there is no
//! separate local/world transform.

use glam::Vec2;

/// An RGB color, each channel in [0, 1]. Carried for the renderer only;
/// physics never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// What a body is to the game layer.
///
/// The scene dispatches on these instead of opaque tags so a missing case
/// fails at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Platform,
    Lava,
    Water,
    Gem,
    Exit,
    Elevator,
    Door,
    DoorButton,
    ElevatorButton,
}

impl BodyKind {
    /// Solid kinds stop the player; the rest are overlap-only triggers.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            BodyKind::Platform
                | BodyKind::Elevator
                | BodyKind::Door
                | BodyKind::DoorButton
                | BodyKind::ElevatorButton
        )
    }
}

/// A rigid body: polygon shape, mass, kinematic state, and accumulated
/// forces/impulses for the current tick.
///
/// A mass of `f32::INFINITY` marks an immovable body; integration never
/// changes its velocity, but the velocity may still be set explicitly
/// (that is how elevators move).
#[derive(Debug, Clone)]
pub struct Body {
    /// Vertices in counter-clockwise order, world coordinates
    shape: Vec<Vec2>,
    mass: f32,
    color: Color,
    velocity: Vec2,
    force: Vec2,
    impulse: Vec2,
    /// Absolute orientation in radians, counter-clockwise positive
    rotation: f32,
    kind: Option<BodyKind>,
    removed: bool,
}

impl Body {
    /// Creates a body without a kind tag. The body is initially at rest.
    ///
    /// The shape must have at least three vertices and the mass must be
    /// positive (or infinite); both are caller contract violations, not
    /// recoverable errors.
    pub fn new(shape: Vec<Vec2>, mass: f32, color: Color) -> Self {
        Self::with_kind(shape, mass, color, None)
    }

    /// Creates a body tagged with a kind for game-layer dispatch.
    pub fn with_kind(shape: Vec<Vec2>, mass: f32, color: Color, kind: Option<BodyKind>) -> Self {
        assert!(shape.len() >= 3, "body shape needs at least 3 vertices");
        assert!(mass > 0.0, "body mass must be positive or infinite");
        Self {
            shape,
            mass,
            color,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            impulse: Vec2::ZERO,
            rotation: 0.0,
            kind,
            removed: false,
        }
    }

    /// The current vertices. Mutation goes through `&mut self` methods only,
    /// so handing out the borrow cannot corrupt physics state.
    pub fn shape(&self) -> &[Vec2] {
        &self.shape
    }

    /// An owned copy of the vertices, for callers that outlive the borrow.
    pub fn shape_owned(&self) -> Vec<Vec2> {
        self.shape.clone()
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn kind(&self) -> Option<BodyKind> {
        self.kind
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Sets the velocity directly. Gameplay uses this for walking, jumping
    /// and elevator motion; it is not reserved for integration.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Signed polygon area via the shoelace formula, returned as magnitude.
    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    fn signed_area(&self) -> f32 {
        let mut twice_area = 0.0;
        for (i, v) in self.shape.iter().enumerate() {
            let w = self.shape[(i + 1) % self.shape.len()];
            twice_area += v.x * w.y - w.x * v.y;
        }
        twice_area / 2.0
    }

    /// Area-weighted centroid of the polygon. Derived from the vertices,
    /// never stored.
    pub fn centroid(&self) -> Vec2 {
        let area = self.signed_area();
        let mut acc = Vec2::ZERO;
        for (i, v) in self.shape.iter().enumerate() {
            let w = self.shape[(i + 1) % self.shape.len()];
            let cross = v.x * w.y - w.x * v.y;
            acc += (*v + w) * cross;
        }
        acc / (6.0 * area)
    }

    /// Translates the body so its centroid lands on `target`.
    pub fn set_centroid(&mut self, target: Vec2) {
        let delta = target - self.centroid();
        self.translate(delta);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotates the body about its centroid to an *absolute* angle. Setting
    /// the current angle again is a no-op delta.
    pub fn set_rotation(&mut self, angle: f32) {
        let delta = angle - self.rotation;
        let center = self.centroid();
        let rot = Vec2::from_angle(delta);
        for v in &mut self.shape {
            *v = center + rot.rotate(*v - center);
        }
        self.rotation = angle;
    }

    /// Axis-aligned bounds of the current shape as `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let mut lo = self.shape[0];
        let mut hi = self.shape[0];
        for v in &self.shape[1..] {
            lo = lo.min(*v);
            hi = hi.max(*v);
        }
        (lo, hi)
    }

    /// Accumulates a force over the current tick. Repeated calls add.
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Accumulates an impulse (instantaneous velocity change at the next
    /// tick). Repeated calls add.
    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.impulse += impulse;
    }

    /// Clears accumulated forces and impulses without integrating them.
    pub fn reset(&mut self) {
        self.force = Vec2::ZERO;
        self.impulse = Vec2::ZERO;
    }

    /// Advances the body by `dt` seconds.
    ///
    /// Finite mass: velocity picks up `force/mass * dt` plus the impulse
    /// divided by mass, then the body translates at the average of the old
    /// and new velocities. Infinite mass skips the velocity update but
    /// still translates, so a platform given a velocity becomes a mover.
    /// Accumulators are cleared afterwards.
    pub fn tick(&mut self, dt: f32) {
        let old_velocity = self.velocity;
        if self.mass.is_finite() {
            self.velocity += self.force * (dt / self.mass) + self.impulse / self.mass;
        }
        self.translate((old_velocity + self.velocity) * 0.5 * dt);
        self.force = Vec2::ZERO;
        self.impulse = Vec2::ZERO;
    }

    /// Marks the body for lazy deletion. Idempotent; never unset.
    pub fn remove(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    fn translate(&mut self, delta: Vec2) {
        for v in &mut self.shape {
            *v += delta;
        }
    }
}
