use std::{sync::Arc, thread::sleep, time::Duration};

use log::{debug, error, info};
use rand::{rngs::ThreadRng, Rng};

use crate::config::Config;
use crate::input::InputSignals;
use crate::render::Renderer;
use crate::snake::Direction;
use crate::state::{GamePhase, GameState};

const GAME_OVER_REFRESH: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);
const RENDER_FAILURE_PAUSE: Duration = Duration::from_secs(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    RenderFailed,
}

/// Drives the game: draw, wait one tick, read the keyboard, step the state.
/// Once the game is over it keeps the game over screen up until the player
/// quits.
pub struct GameLoop<V, R = ThreadRng> {
    state: GameState<R>,
    renderer: V,
    input: Arc<InputSignals>,
    tick_interval: Duration,
    reverse_guard: bool,
    last_direction: Direction,
}

impl<V: Renderer, R: Rng> GameLoop<V, R> {
    pub fn new(config: &Config, state: GameState<R>, renderer: V, input: Arc<InputSignals>) -> Self {
        GameLoop {
            state,
            renderer,
            last_direction: input.direction(),
            input,
            tick_interval: config.difficulty.tick_interval(),
            reverse_guard: config.reverse_guard,
        }
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &V {
        &self.renderer
    }

    pub fn run(&mut self) -> LoopExit {
        info!("starting on a {:?} grid, one tick every {:?}", self.state.grid(), self.tick_interval);

        while self.state.phase() == GamePhase::Running {
            if self.input.quit_requested() {
                info!("quit while playing, length {}", self.state.len());
                return self.finish(LoopExit::Quit);
            }

            if !self.draw() {
                return LoopExit::RenderFailed;
            }

            sleep(self.tick_interval);
            self.tick();
        }

        info!("game over, final length {}", self.state.len());

        loop {
            if !self.draw() {
                return LoopExit::RenderFailed;
            }
            if self.input.quit_requested() {
                break;
            }
            sleep(GAME_OVER_REFRESH);
        }

        self.finish(LoopExit::Quit)
    }

    /// Reads the latest direction and advances the game by one step.
    pub fn tick(&mut self) -> GamePhase {
        let direction = self.next_direction();
        if direction != self.last_direction {
            debug!("turning {:?}", direction);
        }

        self.last_direction = direction;
        self.state.tick(direction)
    }

    fn next_direction(&self) -> Direction {
        let wanted = self.input.direction();

        if self.reverse_guard && wanted == self.last_direction.opposite() {
            self.last_direction
        } else {
            wanted
        }
    }

    fn draw(&mut self) -> bool {
        let phase = self.state.phase();

        match self.renderer.render(phase, self.state.snake().body(), self.state.food()) {
            Ok(()) => true,
            Err(err) => {
                error!("rendering failed, giving up: {:#}", err);
                self.input.stop();
                sleep(RENDER_FAILURE_PAUSE);
                false
            }
        }
    }

    fn finish(&self, exit: LoopExit) -> LoopExit {
        self.input.stop();
        sleep(SHUTDOWN_GRACE);
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use crate::snake::{Direction::*, Snake};
    use crate::state::FoodPlacement;
    use crate::Cell;
    use anyhow::{anyhow, Result};
    use rand::{rngs::StdRng, SeedableRng};

    /// Keeps every frame it is asked to draw. Can ask to quit after a number
    /// of game over frames, or fail outright.
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(GamePhase, Vec<Cell>, Cell)>,
        quit_after_game_over: Option<(usize, Arc<InputSignals>)>,
        fail: bool,
    }

    impl Renderer for Recorder {
        fn render(&mut self, phase: GamePhase, snake: &[Cell], food: Cell) -> Result<()> {
            if self.fail {
                return Err(anyhow!("display went away"));
            }

            self.frames.push((phase, snake.to_vec(), food));

            if let Some((limit, input)) = &self.quit_after_game_over {
                let seen = self.frames.iter().filter(|f| f.0 == GamePhase::GameOver).count();
                if seen >= *limit {
                    input.request_quit();
                }
            }

            Ok(())
        }
    }

    fn fast_config() -> Config {
        Config { difficulty: Difficulty::Extreme, ..Config::default() }
    }

    fn new_loop(config: &Config, recorder: Recorder, input: &Arc<InputSignals>) -> GameLoop<Recorder, StdRng> {
        let state = GameState::with_rng(config, StdRng::seed_from_u64(11));
        GameLoop::new(config, state, recorder, Arc::clone(input))
    }

    #[test]
    fn tick_follows_the_input() {
        let input = Arc::new(InputSignals::new());
        let mut game = new_loop(&fast_config(), Recorder::default(), &input);

        assert_eq!(game.tick(), GamePhase::Running);
        assert_eq!(game.state().snake().body(), &[(16, 8), (17, 8)]);

        input.set_direction(Up);
        game.tick();
        assert_eq!(game.state().snake().head(), (17, 7));
    }

    #[test]
    fn reversal_goes_through_by_default() {
        let input = Arc::new(InputSignals::new());
        let mut game = new_loop(&fast_config(), Recorder::default(), &input);

        input.set_direction(Left);
        game.tick();
        assert_eq!(game.state().snake().head(), (15, 8));
    }

    #[test]
    fn reversal_guard_keeps_the_heading() {
        let config = Config { reverse_guard: true, ..fast_config() };
        let input = Arc::new(InputSignals::new());
        let mut game = new_loop(&config, Recorder::default(), &input);

        input.set_direction(Left);
        game.tick();
        assert_eq!(game.state().snake().head(), (17, 8));

        input.set_direction(Up);
        game.tick();
        assert_eq!(game.state().snake().head(), (17, 7));
    }

    #[test]
    fn crashing_shows_game_over_until_quit() {
        let config = fast_config();
        let input = Arc::new(InputSignals::new());
        let recorder = Recorder { quit_after_game_over: Some((3, Arc::clone(&input))), ..Recorder::default() };
        let state = GameState::from_parts(
            Snake::new(vec![(30, 5), (31, 5)]),
            (10, 10),
            FoodPlacement::Border,
            StdRng::seed_from_u64(5),
        );
        let mut game = GameLoop::new(&config, state, recorder, Arc::clone(&input));

        assert_eq!(game.run(), LoopExit::Quit);
        assert!(input.is_stopped());

        let frames = &game.renderer().frames;
        let phases: Vec<GamePhase> = frames.iter().map(|f| f.0).collect();
        assert_eq!(
            phases,
            vec![
                GamePhase::Running,
                GamePhase::Running,
                GamePhase::GameOver,
                GamePhase::GameOver,
                GamePhase::GameOver,
            ]
        );

        // Redrawing the end screen never touches the game.
        let (_, last_snake, last_food) = &frames[2];
        assert_eq!(last_snake, &vec![(32, 5), (33, 5)]);
        for frame in &frames[3..] {
            assert_eq!(&frame.1, last_snake);
            assert_eq!(&frame.2, last_food);
        }
    }

    #[test]
    fn endgame_waits_for_quit() {
        let config = Config { endgame: true, ..fast_config() };
        let input = Arc::new(InputSignals::new());
        input.request_quit();
        let mut game = new_loop(&config, Recorder::default(), &input);

        assert_eq!(game.run(), LoopExit::Quit);
        assert_eq!(game.renderer().frames.len(), 1);
        assert_eq!(game.renderer().frames[0].0, GamePhase::GameOver);
    }

    #[test]
    fn quitting_mid_game_stops_without_drawing() {
        let input = Arc::new(InputSignals::new());
        input.request_quit();
        let mut game = new_loop(&fast_config(), Recorder::default(), &input);

        assert_eq!(game.run(), LoopExit::Quit);
        assert!(game.renderer().frames.is_empty());
        assert!(input.is_stopped());
    }

    #[test]
    fn render_failure_ends_the_loop() {
        let input = Arc::new(InputSignals::new());
        let recorder = Recorder { fail: true, ..Recorder::default() };
        let mut game = new_loop(&fast_config(), recorder, &input);

        assert_eq!(game.run(), LoopExit::RenderFailed);
        assert!(input.is_stopped());
        assert_eq!(game.state().snake().body(), &[(15, 8), (16, 8)]);
    }
}
