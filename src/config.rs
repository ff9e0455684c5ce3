use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use thiserror::Error;

use crate::state::FoodPlacement;

/// Named game speed. Each one maps to the pause between two ticks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hardcore,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hardcore,
        Difficulty::Extreme,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hardcore => "hardcore",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn tick_interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(500),
            Difficulty::Normal => Duration::from_millis(200),
            Difficulty::Hardcore => Duration::from_millis(100),
            Difficulty::Extreme => Duration::from_millis(50),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownDifficulty(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("[X] Difficulties: {}", difficulty_list())]
    UnknownDifficulty(String),
}

fn difficulty_list() -> String {
    Difficulty::ALL.iter().map(|d| d.name()).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Retro Snake for the Open Day",
    after_help = "Difficulties are: easy, normal, hardcore and extreme"
)]
pub struct Cli {
    /// Show the GAME OVER screen
    #[arg(short, long)]
    pub endgame: bool,

    /// Print the alternative GAME OVER screen
    #[arg(short = 'w', long = "hacker-wars")]
    pub hacker_wars: bool,

    /// How difficult the game should be
    #[arg(short, long, default_value = "easy")]
    pub difficulty: String,

    /// Spawn food anywhere on the board instead of along the top band
    #[arg(short, long)]
    pub uniform_food: bool,

    /// Ignore a key press that would turn the snake back onto itself
    #[arg(short = 'r', long)]
    pub no_reverse: bool,

    /// Loop this audio file as background music
    #[arg(short, long, value_name = "PATH")]
    pub music: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log debug details as well
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything the game needs to know about how it was launched. Built once
/// in `main` and handed to the loop, the state and the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub difficulty: Difficulty,
    pub endgame: bool,
    pub hacker_wars: bool,
    pub food_placement: FoodPlacement,
    pub reverse_guard: bool,
    pub music: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let food_placement = if cli.uniform_food {
            FoodPlacement::Uniform
        } else {
            FoodPlacement::Border
        };

        Ok(Config {
            difficulty: cli.difficulty.parse()?,
            endgame: cli.endgame,
            hacker_wars: cli.hacker_wars,
            food_placement,
            reverse_guard: cli.no_reverse,
            music: cli.music.clone(),
        })
    }
}
