use anyhow::Result;

use crate::state::GamePhase;
use crate::Cell;

/// Draws one frame of the game. Implementations only read what they are
/// given. An error means the display is gone and the game should stop.
pub trait Renderer {
    fn render(&mut self, phase: GamePhase, snake: &[Cell], food: Cell) -> Result<()>;
}
