use log::{debug, info};
use rand::{rngs::ThreadRng, seq::SliceRandom, Rng};

use crate::config::Config;
use crate::snake::{Direction, Moved, Snake};
use crate::{Cell, GRID_HEIGHT, GRID_WIDTH};

pub const INITIAL_SNAKE: [Cell; 2] = [(15, 8), (16, 8)];
pub const INITIAL_FOOD: Cell = (17, 3);

// Draws from the border band before giving up on it and sampling free cells.
const BAND_DRAW_ATTEMPTS: usize = 1_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    GameOver,
}

/// How a new food cell is picked after the snake eats.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FoodPlacement {
    /// Draws an index from a perimeter-sized range and folds it into the top
    /// rows of the board (`index % W`, `index / W + 1`). Food therefore only
    /// ever shows up in a thin band near the top edge.
    #[default]
    Border,
    /// Any free playable cell, with equal probability.
    Uniform,
}

/// The whole game model: board size, snake, food and phase. No I/O happens
/// here; the loop feeds it directions and reads it back for rendering.
pub struct GameState<R = ThreadRng> {
    width: i16,
    height: i16,
    snake: Snake,
    food: Cell,
    phase: GamePhase,
    board_full: bool,
    placement: FoodPlacement,
    rng: R,
}

impl GameState<ThreadRng> {
    pub fn new(config: &Config) -> Self {
        GameState::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(config: &Config, rng: R) -> Self {
        let mut state = GameState::from_parts(
            Snake::new(INITIAL_SNAKE.to_vec()),
            INITIAL_FOOD,
            config.food_placement,
            rng,
        );

        if config.endgame {
            state.phase = GamePhase::GameOver;
        }

        state
    }

    pub fn from_parts(snake: Snake, food: Cell, placement: FoodPlacement, rng: R) -> Self {
        GameState {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            snake,
            food,
            phase: GamePhase::Running,
            board_full: false,
            placement,
            rng,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn grid(&self) -> (i16, i16) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    /// Moves the snake one cell. Landing on the food keeps the tail in place
    /// and moves the food somewhere else.
    pub fn advance(&mut self, direction: Direction) -> Moved {
        let grew = self.snake.next_head(direction) == self.food;
        let moved = self.snake.step(direction, grew);

        if grew {
            match self.place_food() {
                Some(food) => {
                    debug!("snake ate {:?}, length {}, food now at {:?}", moved.new_head, self.len(), food);
                    self.food = food;
                }
                None => {
                    info!("no free cell left for food, the board is full");
                    self.board_full = true;
                }
            }
        }

        moved
    }

    /// The snake bit itself, left the playable area, or filled the board.
    pub fn is_terminal(&self) -> bool {
        self.board_full || self.snake.overlaps_itself() || !self.is_playable(self.snake.head())
    }

    /// The bottom margin is one row wider than the others; the last row is
    /// kept free for the status line.
    pub fn is_playable(&self, (x, y): Cell) -> bool {
        x > 0 && x < self.width - 1 && y > 0 && y < self.height - 2
    }

    /// One game step: advance, then check for the end of the game. Ticking a
    /// finished game leaves it untouched.
    pub fn tick(&mut self, direction: Direction) -> GamePhase {
        if self.phase == GamePhase::GameOver {
            return self.phase;
        }

        self.advance(direction);

        if self.is_terminal() {
            info!("game over with the head at {:?}, length {}", self.snake.head(), self.len());
            self.phase = GamePhase::GameOver;
        }

        self.phase
    }

    fn place_food(&mut self) -> Option<Cell> {
        match self.placement {
            FoodPlacement::Border => self.place_food_in_band().or_else(|| self.place_food_anywhere()),
            FoodPlacement::Uniform => self.place_food_anywhere(),
        }
    }

    fn place_food_in_band(&mut self) -> Option<Cell> {
        let band = (self.width + self.height) * 2 - 4;

        for _ in 0..BAND_DRAW_ATTEMPTS {
            let index = self.rng.gen_range(0..band);
            let mut cell = (index % self.width, index / self.width + 1);
            if cell.0 == 0 {
                cell.0 = 1;
            }

            if self.is_playable(cell) && !self.snake.contains(&cell) {
                return Some(cell);
            }
        }

        None
    }

    fn place_food_anywhere(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (1..self.height - 2)
            .flat_map(|y| (1..self.width - 1).map(move |x| (x, y)))
            .filter(|cell| !self.snake.contains(cell))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
