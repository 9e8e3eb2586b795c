//! Renderer-facing asset cache and sprite descriptors
//!
//! The core never touches textures; it only names them. The cache maps a
//! resource path to a shared handle with get-or-create semantics, and the
//! sprite layer binds handles to bodies (or fixed screen rectangles) and
//! turns them into a per-frame draw list for an external renderer. Texture
//! decoding and upload happen on the other side of that list.
//!
//! The cache is an explicit value owned by its consumer and lives exactly
//! as long as the renderer that drains it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::phys::{Body, BodyRef};

/// What a cached path resolves to on the renderer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Font,
}

/// A shared, immutable reference to one cached resource.
#[derive(Debug, PartialEq, Eq)]
pub struct AssetHandle {
    kind: AssetKind,
    path: String,
}

impl AssetHandle {
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Path-keyed cache with get-or-create semantics.
#[derive(Default)]
pub struct AssetCache {
    entries: HashMap<String, Rc<AssetHandle>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `path`, creating it on first use.
    ///
    /// Asking for an existing path with a different kind is a caller error:
    /// one path is one resource.
    pub fn get_or_create(&mut self, kind: AssetKind, path: &str) -> Rc<AssetHandle> {
        if let Some(handle) = self.entries.get(path) {
            assert_eq!(handle.kind(), kind, "asset kind mismatch for {path}");
            return handle.clone();
        }
        let handle = Rc::new(AssetHandle {
            kind,
            path: path.to_owned(),
        });
        self.entries.insert(path.to_owned(), handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which way a directional sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Front,
    Left,
    Right,
}

/// A rectangle in world/draw coordinates, minimum corner plus size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ScreenRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    fn of_body(body: &Body) -> Self {
        let (lo, hi) = body.bounds();
        Self::new(lo.x, lo.y, hi.x - lo.x, hi.y - lo.y)
    }
}

/// The texture-selection variants the game needs.
enum Sprite {
    Still {
        texture: Rc<AssetHandle>,
    },
    /// Three frames cycled on a fixed period (lava, water)
    Anim {
        frames: [Rc<AssetHandle>; 3],
        period: f32,
    },
    /// Front/left/right texture switched by movement keys (the player)
    Directional {
        facing: Facing,
        front: Rc<AssetHandle>,
        left: Rc<AssetHandle>,
        right: Rc<AssetHandle>,
    },
    /// Unpressed/pressed texture pair
    Button {
        pressed: bool,
        unpressed: Rc<AssetHandle>,
        pressed_texture: Rc<AssetHandle>,
    },
}

impl Sprite {
    fn texture(&self, elapsed: f32) -> Rc<AssetHandle> {
        match self {
            Sprite::Still { texture } => texture.clone(),
            Sprite::Anim { frames, period } => {
                let frame = (elapsed / period) as usize % frames.len();
                frames[frame].clone()
            }
            Sprite::Directional {
                facing,
                front,
                left,
                right,
            } => match facing {
                Facing::Front => front.clone(),
                Facing::Left => left.clone(),
                Facing::Right => right.clone(),
            },
            Sprite::Button {
                pressed,
                unpressed,
                pressed_texture,
            } => {
                if *pressed {
                    pressed_texture.clone()
                } else {
                    unpressed.clone()
                }
            }
        }
    }
}

/// What a sprite follows: a body's current bounds, or a fixed rectangle
/// (backgrounds, popups).
enum Anchor {
    Fixed(ScreenRect),
    Body(Weak<RefCell<Body>>),
}

struct SpriteInstance {
    anchor: Anchor,
    sprite: Sprite,
}

/// One textured quad for the external renderer.
#[derive(Debug, Clone)]
pub struct DrawCmd {
    pub rect: ScreenRect,
    pub texture: Rc<AssetHandle>,
}

/// Ordered sprite list; draw order is registration order.
#[derive(Default)]
pub struct SpriteLayer {
    sprites: Vec<SpriteInstance>,
}

impl SpriteLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fixed(&mut self, rect: ScreenRect, texture: Rc<AssetHandle>) {
        self.sprites.push(SpriteInstance {
            anchor: Anchor::Fixed(rect),
            sprite: Sprite::Still { texture },
        });
    }

    pub fn add_still(&mut self, body: &BodyRef, texture: Rc<AssetHandle>) {
        self.push_for(body, Sprite::Still { texture });
    }

    pub fn add_anim(&mut self, body: &BodyRef, frames: [Rc<AssetHandle>; 3], period: f32) {
        self.push_for(body, Sprite::Anim { frames, period });
    }

    pub fn add_directional(
        &mut self,
        body: &BodyRef,
        front: Rc<AssetHandle>,
        left: Rc<AssetHandle>,
        right: Rc<AssetHandle>,
    ) {
        self.push_for(
            body,
            Sprite::Directional {
                facing: Facing::Front,
                front,
                left,
                right,
            },
        );
    }

    pub fn add_button(
        &mut self,
        body: &BodyRef,
        unpressed: Rc<AssetHandle>,
        pressed_texture: Rc<AssetHandle>,
    ) {
        self.push_for(
            body,
            Sprite::Button {
                pressed: false,
                unpressed,
                pressed_texture,
            },
        );
    }

    fn push_for(&mut self, body: &BodyRef, sprite: Sprite) {
        self.sprites.push(SpriteInstance {
            anchor: Anchor::Body(Rc::downgrade(body)),
            sprite,
        });
    }

    /// Points every directional sprite the given way.
    pub fn set_facing(&mut self, new_facing: Facing) {
        for instance in &mut self.sprites {
            if let Sprite::Directional { facing, .. } = &mut instance.sprite {
                *facing = new_facing;
            }
        }
    }

    /// Switches the button sprite bound to `body` to its pressed texture.
    pub fn press_button(&mut self, body: &BodyRef) {
        for instance in &mut self.sprites {
            if let (Anchor::Body(anchor), Sprite::Button { pressed, .. }) =
                (&instance.anchor, &mut instance.sprite)
            {
                if anchor.upgrade().is_some_and(|b| Rc::ptr_eq(&b, body)) {
                    *pressed = true;
                }
            }
        }
    }

    /// Drops the most recently added sprite (used to dismiss popups).
    pub fn pop(&mut self) {
        self.sprites.pop();
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Emits the frame's draw commands in sprite order, pruning sprites
    /// whose bodies have been compacted out of the scene.
    pub fn draw_list(&mut self, elapsed: f32) -> Vec<DrawCmd> {
        self.sprites.retain(|instance| match &instance.anchor {
            Anchor::Fixed(_) => true,
            Anchor::Body(body) => body.upgrade().is_some(),
        });

        self.sprites
            .iter()
            .filter_map(|instance| {
                let rect = match &instance.anchor {
                    Anchor::Fixed(rect) => *rect,
                    Anchor::Body(body) => ScreenRect::of_body(&body.upgrade()?.borrow()),
                };
                Some(DrawCmd {
                    rect,
                    texture: instance.sprite.texture(elapsed),
                })
            })
            .collect()
    }
}
