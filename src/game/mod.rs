//! Screen state machine and per-frame orchestration
//!
//! Owns the scene for the current screen, translates key events into player
//! velocity, applies gravity and elevator motion, and reacts to the
//! collision events each scene tick reports. Rendering and audio stay
//! external: the renderer drains `draw_list`, an audio sink drains the
//! `SoundEffect`s returned from `update` and `handle_key`.

pub mod contact;
pub mod levels;

use glam::Vec2;

use crate::assets::{AssetCache, AssetKind, DrawCmd, Facing, ScreenRect, SpriteLayer};
use crate::consts;
use crate::phys::{BodyKind, BodyRef, Scene, TickEvent, find_collision};
use crate::progress::{Medal, Progress};

use contact::{ContactDirs, probe_contacts};

/// Texture paths handed to the external renderer through the asset cache.
pub mod paths {
    pub const HOMEPAGE: &str = "assets/homepage.png";
    pub const BACKGROUND: &str = "assets/dungeon_background.png";
    pub const PAUSE: &str = "assets/pause.png";
    pub const GAME_OVER: &str = "assets/game_over.png";
    pub const LEVEL_COMPLETED: &str = "assets/level_completed.png";

    pub const PLAYER_FRONT: &str = "assets/player_front.png";
    pub const PLAYER_LEFT: &str = "assets/player_left.png";
    pub const PLAYER_RIGHT: &str = "assets/player_right.png";

    pub const BRICK: &str = "assets/brick_texture.png";
    pub const GEM: &str = "assets/gem.png";
    pub const EXIT_DOOR: &str = "assets/exit_door.png";
    pub const ELEVATOR: &str = "assets/elevator.png";
    pub const DOOR: &str = "assets/door.png";

    pub const RED_GEM: &str = "assets/red_gem.png";
    pub const ORANGE_GEM: &str = "assets/orange_gem.png";
    pub const GREEN_GEM: &str = "assets/green_gem.png";

    pub const DOOR_BUTTON_UNPRESSED: &str = "assets/button_unpressed.png";
    pub const DOOR_BUTTON_PRESSED: &str = "assets/button_pressed.png";
    pub const ELEVATOR_BUTTON_UNPRESSED: &str = "assets/elevator_button_unpressed.png";
    pub const ELEVATOR_BUTTON_PRESSED: &str = "assets/elevator_button_pressed.png";

    pub const LAVA_FRAMES: [&str; 3] = [
        "assets/lava_frame1.png",
        "assets/lava_frame2.png",
        "assets/lava_frame3.png",
    ];
    pub const WATER_FRAMES: [&str; 3] = [
        "assets/water_frame1.png",
        "assets/water_frame2.png",
        "assets/water_frame3.png",
    ];
}

const BACKGROUND_BOX: ScreenRect = ScreenRect::new(
    consts::WORLD_MIN.x,
    consts::WORLD_MIN.y,
    consts::WORLD_MAX.x,
    consts::WORLD_MAX.y,
);
const POPUP_BOX: ScreenRect = ScreenRect::new(100.0, 50.0, 550.0, 400.0);
const HOMEPAGE_GEM_BOXES: [ScreenRect; consts::LEVEL_COUNT] = [
    ScreenRect::new(148.0, 375.0, 50.0, 50.0),
    ScreenRect::new(350.0, 375.0, 50.0, 50.0),
    ScreenRect::new(552.0, 375.0, 50.0, 50.0),
];

/// Which screen the game currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Homepage,
    Level(usize),
}

/// Semantic key actions, already mapped from physical keys by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
    Home,
    Pause,
    Resume,
    Restart,
    Level1,
    Level2,
    Level3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Pressed,
    Released,
}

/// Sound cues for the external audio sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    GemCollected,
    LevelCompleted,
    LevelFailed,
}

/// The whole game: current screen, its scene, and session bookkeeping.
pub struct Game {
    screen: Screen,
    scene: Scene,
    player: Option<BodyRef>,
    /// Elevator bodies paired with their (top, bottom) travel bounds
    elevators: Vec<(BodyRef, (f32, f32))>,
    contacts: ContactDirs,
    paused: bool,
    game_over: bool,
    elevator_active: bool,
    /// Seconds played in the current level attempt
    time: f32,
    progress: Progress,
    cache: AssetCache,
    sprites: SpriteLayer,
}

impl Game {
    pub fn new(progress: Progress) -> Self {
        let mut game = Self {
            screen: Screen::Homepage,
            scene: Scene::new(),
            player: None,
            elevators: Vec::new(),
            contacts: ContactDirs::empty(),
            paused: false,
            game_over: false,
            elevator_active: false,
            time: 0.0,
            progress,
            cache: AssetCache::new(),
            sprites: SpriteLayer::new(),
        };
        game.enter_homepage();
        game
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn player(&self) -> Option<&BodyRef> {
        self.player.as_ref()
    }

    pub fn contacts(&self) -> ContactDirs {
        self.contacts
    }

    /// Gems still waiting to be collected on the current level.
    pub fn gems_remaining(&self) -> usize {
        self.scene
            .bodies()
            .filter(|b| b.borrow().kind() == Some(BodyKind::Gem))
            .count()
    }

    /// The frame's draw commands for the external renderer.
    pub fn draw_list(&mut self) -> Vec<DrawCmd> {
        self.sprites.draw_list(self.time)
    }

    /// Routes one key event. Returns a sound cue when the action has one.
    pub fn handle_key(&mut self, key: Key, kind: KeyEventKind) -> Option<SoundEffect> {
        match self.screen {
            Screen::Homepage => {
                if kind == KeyEventKind::Pressed {
                    match key {
                        Key::Level1 => self.go_to_level(0),
                        Key::Level2 if self.progress.unlocked(1) => self.go_to_level(1),
                        Key::Level3 if self.progress.unlocked(2) => self.go_to_level(2),
                        _ => {}
                    }
                }
                None
            }
            Screen::Level(index) => match kind {
                KeyEventKind::Pressed if !self.paused => self.level_key_pressed(key),
                KeyEventKind::Pressed => self.pause_key_pressed(index, key),
                KeyEventKind::Released => {
                    if matches!(key, Key::Left | Key::Right) {
                        if let Some(player) = self.player.clone() {
                            let vel = player.borrow().velocity();
                            player.borrow_mut().set_velocity(Vec2::new(0.0, vel.y));
                        }
                        self.sprites.set_facing(Facing::Front);
                    }
                    None
                }
            },
        }
    }

    fn level_key_pressed(&mut self, key: Key) -> Option<SoundEffect> {
        let player = self.player.clone()?;
        match key {
            Key::Home => {
                self.enter_homepage();
                None
            }
            Key::Left => {
                if !self.contacts.contains(ContactDirs::WALL_LEFT) {
                    let vel = player.borrow().velocity();
                    player
                        .borrow_mut()
                        .set_velocity(Vec2::new(-consts::WALK_SPEED, vel.y));
                }
                self.sprites.set_facing(Facing::Left);
                None
            }
            Key::Right => {
                if !self.contacts.contains(ContactDirs::WALL_RIGHT) {
                    let vel = player.borrow().velocity();
                    player
                        .borrow_mut()
                        .set_velocity(Vec2::new(consts::WALK_SPEED, vel.y));
                }
                self.sprites.set_facing(Facing::Right);
                None
            }
            Key::Jump => {
                if self.contacts.contains(ContactDirs::GROUND) {
                    let vel = player.borrow().velocity();
                    player
                        .borrow_mut()
                        .set_velocity(Vec2::new(vel.x, consts::JUMP_SPEED));
                } else {
                    self.sprites.set_facing(Facing::Front);
                }
                Some(SoundEffect::Jump)
            }
            Key::Pause => {
                self.paused = true;
                let pause = self.cache.get_or_create(AssetKind::Image, paths::PAUSE);
                self.sprites.add_fixed(POPUP_BOX, pause);
                None
            }
            _ => None,
        }
    }

    fn pause_key_pressed(&mut self, index: usize, key: Key) -> Option<SoundEffect> {
        match key {
            Key::Home => self.enter_homepage(),
            Key::Restart => {
                log::info!("Restarting level {}", index + 1);
                self.go_to_level(index);
            }
            Key::Resume => {
                self.paused = false;
                self.sprites.pop();
            }
            _ => {}
        }
        None
    }

    /// Returns to the level-select screen, discarding any running level.
    pub fn enter_homepage(&mut self) {
        self.screen = Screen::Homepage;
        self.scene = Scene::new();
        self.player = None;
        self.elevators.clear();
        self.contacts = ContactDirs::empty();
        self.paused = false;
        self.game_over = false;
        self.elevator_active = false;
        self.time = 0.0;

        self.sprites.clear();
        let homepage = self.cache.get_or_create(AssetKind::Image, paths::HOMEPAGE);
        self.sprites.add_fixed(BACKGROUND_BOX, homepage);
        for level in 0..consts::LEVEL_COUNT {
            if let Some(medal) = self.progress.medal(level) {
                let path = match medal {
                    Medal::Red => paths::RED_GEM,
                    Medal::Orange => paths::ORANGE_GEM,
                    Medal::Green => paths::GREEN_GEM,
                };
                let texture = self.cache.get_or_create(AssetKind::Image, path);
                self.sprites.add_fixed(HOMEPAGE_GEM_BOXES[level], texture);
            }
        }
    }

    /// Tears down the current scene and builds the given level.
    pub fn go_to_level(&mut self, index: usize) {
        log::info!("Entering level {}", index + 1);
        let levels::LevelScene {
            scene,
            player,
            elevators,
        } = levels::build_level(index);
        self.screen = Screen::Level(index);
        self.scene = scene;
        self.player = Some(player);
        self.elevators = elevators;
        self.contacts = ContactDirs::empty();
        self.paused = false;
        self.game_over = false;
        self.elevator_active = false;
        self.time = 0.0;
        self.wire_level_sprites();
    }

    fn wire_level_sprites(&mut self) {
        self.sprites.clear();
        let background = self.cache.get_or_create(AssetKind::Image, paths::BACKGROUND);
        self.sprites.add_fixed(BACKGROUND_BOX, background);

        let player = self.player.clone().expect("level has a player");
        let front = self
            .cache
            .get_or_create(AssetKind::Image, paths::PLAYER_FRONT);
        let left = self
            .cache
            .get_or_create(AssetKind::Image, paths::PLAYER_LEFT);
        let right = self
            .cache
            .get_or_create(AssetKind::Image, paths::PLAYER_RIGHT);
        self.sprites.add_directional(&player, front, left, right);

        let bodies: Vec<BodyRef> = self.scene.bodies().cloned().collect();
        for body in bodies {
            let kind = body.borrow().kind();
            match kind {
                Some(BodyKind::Platform) => {
                    let brick = self.cache.get_or_create(AssetKind::Image, paths::BRICK);
                    self.sprites.add_still(&body, brick);
                }
                Some(BodyKind::Lava) => {
                    let frames = paths::LAVA_FRAMES
                        .map(|p| self.cache.get_or_create(AssetKind::Image, p));
                    self.sprites.add_anim(&body, frames, consts::ANIM_FRAME_SECS);
                }
                Some(BodyKind::Water) => {
                    let frames = paths::WATER_FRAMES
                        .map(|p| self.cache.get_or_create(AssetKind::Image, p));
                    self.sprites.add_anim(&body, frames, consts::ANIM_FRAME_SECS);
                }
                Some(BodyKind::Gem) => {
                    let gem = self.cache.get_or_create(AssetKind::Image, paths::GEM);
                    self.sprites.add_still(&body, gem);
                }
                Some(BodyKind::Exit) => {
                    let door = self.cache.get_or_create(AssetKind::Image, paths::EXIT_DOOR);
                    self.sprites.add_still(&body, door);
                }
                Some(BodyKind::Elevator) => {
                    let tex = self.cache.get_or_create(AssetKind::Image, paths::ELEVATOR);
                    self.sprites.add_still(&body, tex);
                }
                Some(BodyKind::Door) => {
                    let tex = self.cache.get_or_create(AssetKind::Image, paths::DOOR);
                    self.sprites.add_still(&body, tex);
                }
                Some(BodyKind::DoorButton) => {
                    let up = self
                        .cache
                        .get_or_create(AssetKind::Image, paths::DOOR_BUTTON_UNPRESSED);
                    let down = self
                        .cache
                        .get_or_create(AssetKind::Image, paths::DOOR_BUTTON_PRESSED);
                    self.sprites.add_button(&body, up, down);
                }
                Some(BodyKind::ElevatorButton) => {
                    let up = self
                        .cache
                        .get_or_create(AssetKind::Image, paths::ELEVATOR_BUTTON_UNPRESSED);
                    let down = self
                        .cache
                        .get_or_create(AssetKind::Image, paths::ELEVATOR_BUTTON_PRESSED);
                    self.sprites.add_button(&body, up, down);
                }
                None => {} // the player, already wired
            }
        }
    }

    /// Advances one frame. Over-long frames (tab switches, debugger stops)
    /// are dropped rather than integrated.
    pub fn update(&mut self, dt: f32) -> Vec<SoundEffect> {
        let Screen::Level(index) = self.screen else {
            return Vec::new();
        };
        if self.paused || self.game_over || dt >= consts::MAX_FRAME_DT {
            return Vec::new();
        }
        let player = self.player.clone().expect("level has a player");

        self.contacts = probe_contacts(&self.scene, &player);

        // gravity is suspended while standing; the clamp handles the rest
        if !self.contacts.contains(ContactDirs::GROUND) {
            let vel = player.borrow().velocity();
            player
                .borrow_mut()
                .set_velocity(Vec2::new(vel.x, vel.y - consts::GRAVITY * dt));
        }

        self.press_buttons(&player);
        if self.elevator_active {
            self.drive_elevators(&player);
        }
        self.check_level_complete(index, &player);
        self.update_points(index);

        let mut sounds = Vec::new();
        for event in self.scene.tick(dt) {
            match event {
                TickEvent::Consumed { kind } => {
                    if kind == Some(BodyKind::Gem) {
                        log::info!("Gem collected ({} left)", self.gems_remaining());
                        sounds.push(SoundEffect::GemCollected);
                    }
                }
                TickEvent::LevelLost => {
                    log::info!("Level {} failed after {:.1}s", index + 1, self.time);
                    self.game_over = true;
                    let popup = self.cache.get_or_create(AssetKind::Image, paths::GAME_OVER);
                    self.sprites.add_fixed(POPUP_BOX, popup);
                    sounds.push(SoundEffect::LevelFailed);
                }
                TickEvent::LevelWon => {
                    log::info!("Level {} completed in {:.1}s", index + 1, self.time);
                    self.game_over = true;
                    // the pre-tick completion check misses an overlap that
                    // first appeared during this tick's integration
                    self.progress.completed[index] = true;
                    self.update_points(index);
                    let popup = self
                        .cache
                        .get_or_create(AssetKind::Image, paths::LEVEL_COMPLETED);
                    self.sprites.add_fixed(POPUP_BOX, popup);
                    sounds.push(SoundEffect::LevelCompleted);
                }
            }
        }

        self.time += dt;
        sounds
    }

    /// Buttons react while the player overlaps them: a door button opens
    /// the level's door, an elevator button starts the elevators.
    fn press_buttons(&mut self, player: &BodyRef) {
        let mut pressed = Vec::new();
        {
            let probe = player.borrow();
            for body in self.scene.bodies() {
                let other = body.borrow();
                if !matches!(
                    other.kind(),
                    Some(BodyKind::DoorButton | BodyKind::ElevatorButton)
                ) {
                    continue;
                }
                if find_collision(&probe, &other).collided {
                    pressed.push(body.clone());
                }
            }
        }

        for button in pressed {
            self.sprites.press_button(&button);
            match button.borrow().kind() {
                Some(BodyKind::DoorButton) => {
                    let door = self
                        .scene
                        .bodies()
                        .find(|b| {
                            let b = b.borrow();
                            b.kind() == Some(BodyKind::Door) && !b.is_removed()
                        })
                        .cloned();
                    if let Some(door) = door {
                        log::info!("Door opened");
                        door.borrow_mut().remove();
                    }
                }
                Some(BodyKind::ElevatorButton) => {
                    if !self.elevator_active {
                        log::info!("Elevators activated");
                    }
                    self.elevator_active = true;
                }
                _ => {}
            }
        }
    }

    /// Bounces each elevator between its travel bounds and carries a
    /// grounded player standing on it.
    fn drive_elevators(&mut self, player: &BodyRef) {
        for (elevator, (top, bottom)) in &self.elevators {
            let centroid_y = elevator.borrow().centroid().y;
            if centroid_y > *top {
                elevator
                    .borrow_mut()
                    .set_velocity(Vec2::new(0.0, -consts::ELEVATOR_SPEED));
            } else if centroid_y < *bottom {
                elevator
                    .borrow_mut()
                    .set_velocity(Vec2::new(0.0, consts::ELEVATOR_SPEED));
            }

            let riding = find_collision(&elevator.borrow(), &player.borrow()).collided
                && self.contacts.contains(ContactDirs::GROUND);
            if riding {
                let player_vel = player.borrow().velocity();
                let elevator_vel = elevator.borrow().velocity();
                if player_vel.y <= elevator_vel.y {
                    player
                        .borrow_mut()
                        .set_velocity(Vec2::new(player_vel.x, elevator_vel.y));
                }
            }
        }
    }

    fn check_level_complete(&mut self, index: usize, player: &BodyRef) {
        let probe = player.borrow();
        let reached = self.scene.bodies().any(|body| {
            let other = body.borrow();
            other.kind() == Some(BodyKind::Exit) && find_collision(&probe, &other).collided
        });
        if reached && !self.progress.completed[index] {
            log::info!("Level {} marked complete", index + 1);
            self.progress.completed[index] = true;
        }
    }

    /// Score favors collecting every gem quickly; the best completed run is
    /// kept per level.
    fn update_points(&mut self, index: usize) {
        if self.time <= 0.0 {
            return;
        }
        let collected = (consts::GEMS_PER_LEVEL - self.gems_remaining()) as f32;
        let score = collected * collected * (consts::PAR_TIME / self.time);
        if self.progress.completed[index] && score > self.progress.points[index] {
            self.progress.points[index] = score;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phys::CollisionResponse;

    const DT: f32 = 1.0 / 60.0;

    /// The landing scenario end to end: a lobed player dropped over a
    /// static platform must come to rest on its top face instead of
    /// falling through.
    #[test]
    fn test_gravity_landing_on_platform() {
        let mut scene = Scene::new();
        let mut body = levels::player_body();
        body.set_centroid(Vec2::new(40.0, 80.0));
        let player = scene.add_body(body);
        let platform = scene.add_body(levels::obstacle(
            &levels::RectDef {
                x: 100.0,
                y: 20.0,
                w: 200.0,
                h: 20.0,
            },
            BodyKind::Platform,
        ));
        scene.create_collision(
            &player,
            &platform,
            CollisionResponse::PlatformClamp {
                half_extents: Vec2::new(consts::PLAYER_RADIUS_X, consts::PLAYER_RADIUS_Y),
                landing_slack: consts::LANDING_SLACK,
            },
        );

        let platform_top = 30.0;
        let mut lowest = f32::MAX;
        for _ in 0..300 {
            let contacts = probe_contacts(&scene, &player);
            if !contacts.contains(ContactDirs::GROUND) {
                let vel = player.borrow().velocity();
                player
                    .borrow_mut()
                    .set_velocity(Vec2::new(vel.x, vel.y - consts::GRAVITY * DT));
            }
            scene.tick(DT);
            lowest = lowest.min(player.borrow().centroid().y);
        }

        let final_contacts = probe_contacts(&scene, &player);
        assert!(final_contacts.contains(ContactDirs::GROUND));
        assert_eq!(player.borrow().velocity().y, 0.0);
        // resting: centroid within the landing band above the top face
        let resting = player.borrow().centroid().y;
        assert!(resting - consts::LANDING_SLACK >= platform_top);
        // never tunneled through the platform
        assert!(lowest > platform_top - consts::PLAYER_RADIUS_Y);
    }

    #[test]
    fn test_level_select_is_gated() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level2, KeyEventKind::Pressed);
        assert_eq!(game.screen(), Screen::Homepage);
        game.handle_key(Key::Level3, KeyEventKind::Pressed);
        assert_eq!(game.screen(), Screen::Homepage);

        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        assert_eq!(game.screen(), Screen::Level(0));
        assert_eq!(game.gems_remaining(), consts::GEMS_PER_LEVEL);
    }

    #[test]
    fn test_unlocked_level_two_opens() {
        let mut progress = Progress::default();
        progress.record(0, 1.0);
        let mut game = Game::new(progress);
        game.handle_key(Key::Level2, KeyEventKind::Pressed);
        assert_eq!(game.screen(), Screen::Level(1));
    }

    #[test]
    fn test_walk_keys_and_grounded_jump() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);

        game.handle_key(Key::Right, KeyEventKind::Released);
        // let the player settle onto the floor brick
        for _ in 0..120 {
            game.update(DT);
        }
        assert!(game.contacts().contains(ContactDirs::GROUND));

        let player = game.player().unwrap().clone();
        game.handle_key(Key::Right, KeyEventKind::Pressed);
        assert_eq!(player.borrow().velocity().x, consts::WALK_SPEED);
        game.handle_key(Key::Right, KeyEventKind::Released);
        assert_eq!(player.borrow().velocity().x, 0.0);

        let sound = game.handle_key(Key::Jump, KeyEventKind::Pressed);
        assert_eq!(sound, Some(SoundEffect::Jump));
        assert_eq!(player.borrow().velocity().y, consts::JUMP_SPEED);
    }

    #[test]
    fn test_airborne_jump_does_not_launch() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        // player spawns airborne at the start position
        let player = game.player().unwrap().clone();
        let sound = game.handle_key(Key::Jump, KeyEventKind::Pressed);
        assert_eq!(sound, Some(SoundEffect::Jump));
        assert_eq!(player.borrow().velocity().y, 0.0);
    }

    #[test]
    fn test_lava_ends_the_level() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        // drop the player straight onto the first lava strip
        game.player()
            .unwrap()
            .borrow_mut()
            .set_centroid(Vec2::new(180.0, 40.0));

        let mut failed = false;
        for _ in 0..240 {
            if game.update(DT).contains(&SoundEffect::LevelFailed) {
                failed = true;
                break;
            }
        }
        assert!(failed);
        assert!(game.is_game_over());
        assert!(!game.progress().completed[0]);
        // frozen after defeat
        assert!(game.update(DT).is_empty());
    }

    #[test]
    fn test_reaching_the_exit_wins_and_records() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        game.player()
            .unwrap()
            .borrow_mut()
            .set_centroid(Vec2::new(60.0, 458.0));

        let sounds = game.update(DT);
        assert!(sounds.contains(&SoundEffect::LevelCompleted));
        assert!(game.is_game_over());
        assert!(game.progress().completed[0]);
        assert!(game.progress().unlocked(1));
        assert_eq!(game.progress().medal(0), Some(Medal::Red));
    }

    #[test]
    fn test_pause_freezes_the_clock() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        game.update(DT);
        let elapsed = game.time();

        game.handle_key(Key::Pause, KeyEventKind::Pressed);
        assert!(game.is_paused());
        assert!(game.update(DT).is_empty());
        assert_eq!(game.time(), elapsed);

        game.handle_key(Key::Resume, KeyEventKind::Pressed);
        assert!(!game.is_paused());
        game.update(DT);
        assert!(game.time() > elapsed);
    }

    #[test]
    fn test_overlong_frames_are_dropped() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        game.update(consts::MAX_FRAME_DT);
        assert_eq!(game.time(), 0.0);
    }

    #[test]
    fn test_elevator_button_starts_elevator() {
        let mut progress = Progress::default();
        progress.record(0, 1.0);
        let mut game = Game::new(progress);
        game.handle_key(Key::Level2, KeyEventKind::Pressed);

        // stand on the elevator button
        game.player()
            .unwrap()
            .borrow_mut()
            .set_centroid(Vec2::new(475.0, 170.0));

        let elevator = game.elevators[0].0.clone();
        let start_y = elevator.borrow().centroid().y;
        for _ in 0..60 {
            game.update(DT);
        }
        assert!(game.elevator_active);
        assert!(elevator.borrow().centroid().y > start_y);
    }

    #[test]
    fn test_door_button_opens_door() {
        let mut progress = Progress::default();
        progress.record(0, 1.0);
        let mut game = Game::new(progress);
        game.handle_key(Key::Level2, KeyEventKind::Pressed);

        let doors = |game: &Game| {
            game.scene()
                .bodies()
                .filter(|b| b.borrow().kind() == Some(BodyKind::Door))
                .count()
        };
        assert_eq!(doors(&game), 1);

        // stand on the door button
        game.player()
            .unwrap()
            .borrow_mut()
            .set_centroid(Vec2::new(40.0, 124.0));
        game.update(DT);
        game.update(DT);
        assert_eq!(doors(&game), 0);
    }

    #[test]
    fn test_restart_rebuilds_the_level() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        // collect nothing, just drift and pause
        for _ in 0..30 {
            game.update(DT);
        }
        game.handle_key(Key::Pause, KeyEventKind::Pressed);
        game.handle_key(Key::Restart, KeyEventKind::Pressed);

        assert_eq!(game.screen(), Screen::Level(0));
        assert!(!game.is_paused());
        assert_eq!(game.time(), 0.0);
        let player = game.player().unwrap().borrow();
        assert!((player.centroid() - consts::PLAYER_START).length() < 1e-3);
    }

    #[test]
    fn test_homepage_resets_scene() {
        let mut game = Game::new(Progress::default());
        game.handle_key(Key::Level1, KeyEventKind::Pressed);
        assert!(game.scene().bodies_count() > 0);
        game.handle_key(Key::Home, KeyEventKind::Pressed);
        assert_eq!(game.screen(), Screen::Homepage);
        assert_eq!(game.scene().bodies_count(), 0);
        assert!(game.player().is_none());
    }
}
