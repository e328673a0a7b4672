/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use rand::Rng;

use config::GameConfig;
use error::GameError;
use sim::event::GameEvent;
use sim::level;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

fn main() {
    let (config, config_err) = match GameConfig::load() {
        Ok(c) => (c, None),
        Err(e) => {
            eprintln!("{e}; using built-in defaults");
            (GameConfig::default(), Some(e))
        }
    };

    if let Err(e) = logging::init(&config.general) {
        eprintln!("Logging disabled: {e}");
    }
    if let Some(e) = config_err {
        tracing::warn!(error = %e, "config rejected, using defaults");
    }

    let mut world = WorldState::new(config.field.clone());
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let mut rng = rand::thread_rng();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, &mut rng);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "game loop aborted");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for herding!");
    println!("Final Score: {}  Level: {}", world.score, world.difficulty);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Result<(), GameError> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let frame_sleep = Duration::from_millis(config.speed.frame_ms);
    let anim_interval = Duration::from_millis(config.speed.anim_interval_ms);
    let mut last_anim = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        let mut commands = kb.commands().to_vec();
        commands.extend(gp.commands());

        for cmd in commands {
            if cmd == Command::Quit {
                tracing::info!("quit requested");
                return Ok(());
            }
            handle_command(world, cmd, sound, rng);
            if world.phase == Phase::Halted {
                tracing::info!(score = world.score, "player declined, halting");
                return Ok(());
            }
        }

        if last_anim.elapsed() >= anim_interval {
            step::animate(world);
            last_anim = Instant::now();
        }

        renderer.render(world, gp.connected)?;
        std::thread::sleep(frame_sleep);
    }
}

fn handle_command(
    world: &mut WorldState,
    cmd: Command,
    sound: Option<&SoundEngine>,
    rng: &mut impl Rng,
) {
    match (world.phase, cmd) {
        (Phase::Playing, Command::Move(dir)) => {
            let events = step::tick(world, dir, rng);
            log_events(&events);
            sound::play_events(sound, &events);
        }
        // No prompt during play, so "no" leaves the game.
        (Phase::Playing, Command::Cancel) => {
            world.phase = Phase::Halted;
        }
        (Phase::Title | Phase::LevelComplete | Phase::GameOver, Command::Confirm) => {
            level::answer_prompt(world, true, rng);
        }
        (Phase::Title | Phase::LevelComplete | Phase::GameOver, Command::Cancel) => {
            level::answer_prompt(world, false, rng);
        }
        _ => {}
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::CatFled { .. } => tracing::trace!(?event),
            GameEvent::ScoreChanged { .. } => tracing::debug!(?event),
            _ => tracing::info!(?event),
        }
    }
}
