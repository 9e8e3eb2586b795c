//! Gemfall entry point
//!
//! The shipping build wraps this crate in an SDL front end that pumps real
//! key events and drains `draw_list` into a renderer. This binary stands in
//! for that loop: it runs a scripted headless session so the whole stack
//! (levels, physics, collisions, scoring, persistence) can be exercised
//! from the command line.

use std::path::PathBuf;

use gemfall::{Game, Key, KeyEventKind, Progress, Screen};

const DT: f32 = 1.0 / 60.0;
const SESSION_SECS: f32 = 20.0;

fn main() {
    env_logger::init();
    log::info!("Gemfall (headless) starting...");

    let save_path = PathBuf::from("gemfall_progress.json");
    let progress = Progress::load(&save_path);
    let mut game = Game::new(progress);

    game.handle_key(Key::Level1, KeyEventKind::Pressed);
    assert_eq!(game.screen(), Screen::Level(0));

    // Scripted input: walk right, hop every 1.5 seconds.
    let frames = (SESSION_SECS / DT) as usize;
    for frame in 0..frames {
        if frame % 90 == 0 {
            if let Some(sound) = game.handle_key(Key::Jump, KeyEventKind::Pressed) {
                log::debug!("sfx: {sound:?}");
            }
        }
        // keys auto-repeat while held
        game.handle_key(Key::Right, KeyEventKind::Pressed);

        for sound in game.update(DT) {
            log::info!("sfx: {sound:?}");
        }
        if game.is_game_over() {
            break;
        }
    }

    if let Err(err) = game.progress().save(&save_path) {
        log::warn!("Could not save progress: {err}");
    }

    let draw_cmds = game.draw_list().len();
    println!(
        "session over after {:.1}s - {} gems left, game over: {}, {} sprites in the draw list",
        game.time(),
        game.gems_remaining(),
        game.is_game_over(),
        draw_cmds
    );
}
