mod config;
mod game;
mod glyphs;
mod input;
mod render;
mod snake;
mod state;
mod term;

#[cfg(feature = "audio")]
mod audio;

use std::{fs::File, process::exit};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::WriteLogger;

use crate::config::{Cli, Config};
use crate::game::{GameLoop, LoopExit};
use crate::input::InputSource;
use crate::state::GameState;
use crate::term::TermRenderer;

pub type Cell = (i16, i16);

pub const GRID_WIDTH: i16 = 34;
pub const GRID_HEIGHT: i16 = 23;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            println!("{}", err);
            exit(1);
        }
    };

    match play(&config) {
        Ok(LoopExit::Quit) => info!("bye"),
        Ok(LoopExit::RenderFailed) => warn!("stopped after a display error"),
        Err(err) => {
            // The terminal has been handed back by now.
            error!("{:#}", err);
            eprintln!("retro-snake: {:#}", err);
        }
    }
}

fn play(config: &Config) -> Result<LoopExit> {
    let _music = start_music(config);

    let mut renderer = TermRenderer::new(config);
    renderer.setup()?;

    let input = InputSource::spawn().context("starting the input thread")?;
    let mut game = GameLoop::new(config, GameState::new(config), renderer, input.signals());
    let exit = game.run();
    info!("final length {}", game.state().len());

    input.shutdown();
    Ok(exit)
}

fn init_logging(cli: &Cli) {
    // stdout belongs to the game, so logs only go to a file when asked for.
    let path = match &cli.log_file {
        Some(path) => path,
        None => return,
    };

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("retro-snake: not logging, cannot create {}: {}", path.display(), err);
            return;
        }
    };

    if let Err(err) = WriteLogger::init(level, simplelog::Config::default(), file) {
        eprintln!("retro-snake: not logging: {}", err);
    }
}

#[cfg(feature = "audio")]
fn start_music(config: &Config) -> Option<audio::AudioPlayer> {
    let track = config.music.as_ref()?;

    match audio::AudioPlayer::play_loop(track) {
        Ok(player) => Some(player),
        Err(err) => {
            warn!("playing without music: {:#}", err);
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn start_music(config: &Config) -> Option<()> {
    if let Some(track) = &config.music {
        warn!("built without the audio feature, not playing {}", track.display());
    }
    None
}
