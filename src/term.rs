use std::io::{stdout, Stdout, Write};

use anyhow::{bail, Context, Result};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use log::{debug, warn};

use crate::config::{Config, Difficulty};
use crate::glyphs::{self, HACKER_WARS};
use crate::render::Renderer;
use crate::state::GamePhase;
use crate::{Cell, GRID_HEIGHT, GRID_WIDTH};

// Each board cell takes two terminal columns so it comes out roughly square.
const CELL_COLUMNS: u16 = 2;
const FILLED_CELL: &str = "██";
const EMPTY_CELL: &str = "  ";

const BORDER_COLOR: Color = Color::White;
const FOOD_COLOR: Color = Color::Red;
const SNAKE_COLOR: Color = Color::Green;
const BACKGROUND_COLOR: Color = Color::Rgb { r: 0x10, g: 0x10, b: 0x10 };

const GAME_OVER_LINES: [&str; 4] = ["", "GAME OVER", "", "Press Q or ESCAPE to exit"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Paint {
    Empty,
    Border,
    Food,
    Snake,
}

impl Paint {
    fn color(self) -> Color {
        match self {
            Paint::Empty => BACKGROUND_COLOR,
            Paint::Border => BORDER_COLOR,
            Paint::Food => FOOD_COLOR,
            Paint::Snake => SNAKE_COLOR,
        }
    }
}

/// Cells the frame is made of. Tall enough for the game over picture, which
/// runs a little past the bottom of the board.
struct Canvas {
    width: i16,
    height: i16,
    cells: Vec<Paint>,
}

impl Canvas {
    fn new(width: i16, height: i16) -> Self {
        Canvas { width, height, cells: vec![Paint::Empty; width as usize * height as usize] }
    }

    fn index(&self, (x, y): Cell) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn get(&self, cell: Cell) -> Paint {
        self.index(cell).map_or(Paint::Empty, |i| self.cells[i])
    }

    fn set(&mut self, cell: Cell, paint: Paint) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = paint;
        }
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = Paint::Empty);
    }

    /// Frame for the running game: walls around the playable area, then the
    /// food, then the snake on top.
    fn compose_board(&mut self, snake: &[Cell], food: Cell) {
        self.clear();

        let right = GRID_WIDTH - 1;
        let bottom = GRID_HEIGHT - 2;

        for x in 0..GRID_WIDTH {
            self.set((x, 0), Paint::Border);
            self.set((x, bottom), Paint::Border);
        }

        for y in 0..=bottom {
            self.set((0, y), Paint::Border);
            self.set((right, y), Paint::Border);
        }

        self.set(food, Paint::Food);

        for cell in snake {
            self.set(*cell, Paint::Snake);
        }
    }

    fn compose_game_over(&mut self, hacker_wars: bool) {
        self.clear();

        if hacker_wars {
            for cell in HACKER_WARS.iter().flat_map(|g| g.cells.iter()) {
                self.set(*cell, Paint::Snake);
            }
        }
    }
}

pub struct TermRenderer {
    stdout: Stdout,
    hacker_wars: bool,
    difficulty: Difficulty,
    origin: (u16, u16),
    visible_rows: i16,
    screen: Canvas,
    frame: Canvas,
    status: String,
    message_shown: bool,
    active: bool,
}

impl TermRenderer {
    pub fn new(config: &Config) -> Self {
        let (glyph_width, glyph_height) = glyphs::extent(&HACKER_WARS);
        let width = GRID_WIDTH.max(glyph_width);
        let height = GRID_HEIGHT.max(glyph_height);

        TermRenderer {
            stdout: stdout(),
            hacker_wars: config.hacker_wars,
            difficulty: config.difficulty,
            origin: (0, 0),
            visible_rows: height,
            screen: Canvas::new(width, height),
            frame: Canvas::new(width, height),
            status: String::new(),
            message_shown: false,
            active: false,
        }
    }

    /// Takes over the terminal. The board and its status row have to fit;
    /// the bottom of the game over picture is cut off on short terminals.
    pub fn setup(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size().context("reading the terminal size")?;
        let needed = (GRID_WIDTH as u16 * CELL_COLUMNS, GRID_HEIGHT as u16);
        if cols < needed.0 || rows < needed.1 {
            bail!("terminal is {}x{}, the game needs at least {}x{}", cols, rows, needed.0, needed.1);
        }

        let canvas_cols = self.screen.width as u16 * CELL_COLUMNS;
        let canvas_rows = (self.screen.height as u16).min(rows);
        self.visible_rows = canvas_rows as i16;
        self.origin = (cols.saturating_sub(canvas_cols) / 2, (rows - canvas_rows) / 2);
        debug!("terminal {}x{}, canvas origin {:?}", cols, rows, self.origin);
        if self.hacker_wars {
            let picture: Vec<&str> = HACKER_WARS.iter().map(|g| g.name).collect();
            debug!("game over picture: {}", picture.join(" "));
        }

        execute!(self.stdout, EnterAlternateScreen).context("entering the alternate screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("hiding the cursor")?;

        self.clear_all()
    }

    /// Gives the terminal back. Safe to call more than once.
    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Err(err) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {}", err);
        }
        if let Err(err) = execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen) {
            warn!("failed to leave the alternate screen: {}", err);
        }
    }

    fn clear_all(&mut self) -> Result<()> {
        execute!(self.stdout, SetBackgroundColor(BACKGROUND_COLOR), terminal::Clear(ClearType::All))
            .context("clearing the screen")?;
        self.screen.clear();
        self.status.clear();
        self.message_shown = false;

        // Paint the whole canvas once so the background colour is even.
        for y in 0..self.visible_rows {
            for x in 0..self.screen.width {
                self.print_cell((x, y), Paint::Empty)?;
            }
        }
        self.flush()
    }

    /// Queues only the cells that differ from what is already on screen.
    fn draw_changes(&mut self) -> Result<()> {
        for y in 0..self.visible_rows {
            for x in 0..self.frame.width {
                let paint = self.frame.get((x, y));
                if self.screen.get((x, y)) != paint {
                    self.print_cell((x, y), paint)?;
                    self.screen.set((x, y), paint);
                }
            }
        }
        Ok(())
    }

    fn draw_status(&mut self, text: String) -> Result<()> {
        if text == self.status {
            return Ok(());
        }

        let width = (self.screen.width as u16 * CELL_COLUMNS) as usize;
        let line = format!("{:<width$}", text, width = width);
        let pos = self.status_position();
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetBackgroundColor(BACKGROUND_COLOR),
            SetForegroundColor(BORDER_COLOR),
            Print(line)
        )?;

        self.status = text;
        Ok(())
    }

    /// Terminal position of the row under the bottom wall.
    fn status_position(&self) -> (u16, u16) {
        (self.origin.0, self.origin.1 + GRID_HEIGHT as u16 - 1)
    }

    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_width = lines.iter().map(|l| l.len()).max().unwrap_or(0) as u16 + 4;
        let msg_height = lines.len() as u16 + 2;
        let center = (
            self.origin.0 + GRID_WIDTH as u16 * CELL_COLUMNS / 2,
            self.origin.1 + GRID_HEIGHT as u16 / 2,
        );
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.stdout, SetBackgroundColor(BACKGROUND_COLOR), SetForegroundColor(SNAKE_COLOR))?;

        for row in 0..msg_height {
            let text = match row {
                0 => "",
                r if r <= lines.len() as u16 => lines[r as usize - 1],
                _ => "",
            };
            let padded = format!("{line: ^width$}", line = text, width = msg_width as usize);
            queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1 + row), Print(padded))?;
        }

        Ok(())
    }

    fn print_cell(&mut self, (x, y): Cell, paint: Paint) -> Result<()> {
        let pos = (self.origin.0 + x as u16 * CELL_COLUMNS, self.origin.1 + y as u16);
        let text = if paint == Paint::Empty { EMPTY_CELL } else { FILLED_CELL };

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetBackgroundColor(BACKGROUND_COLOR),
            SetForegroundColor(paint.color()),
            Print(text)
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("flushing the terminal")
    }
}

impl Renderer for TermRenderer {
    fn render(&mut self, phase: GamePhase, snake: &[Cell], food: Cell) -> Result<()> {
        match phase {
            GamePhase::Running => {
                self.frame.compose_board(snake, food);
                self.draw_status(format!(" {}  length {}", self.difficulty, snake.len()))?;
                self.draw_changes()?;
            }
            GamePhase::GameOver => {
                self.frame.compose_game_over(self.hacker_wars);
                self.draw_status(String::new())?;
                self.draw_changes()?;

                if !self.hacker_wars && !self.message_shown {
                    self.show_message(&GAME_OVER_LINES)?;
                    self.message_shown = true;
                }
            }
        }

        self.flush()
    }
}

impl Drop for TermRenderer {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(GRID_WIDTH, GRID_HEIGHT + 2)
    }

    #[test]
    fn board_has_walls_on_the_losing_lines() {
        let mut c = canvas();
        c.compose_board(&[(15, 8), (16, 8)], (17, 3));

        for x in 0..GRID_WIDTH {
            assert_eq!(c.get((x, 0)), Paint::Border);
            assert_eq!(c.get((x, GRID_HEIGHT - 2)), Paint::Border);
            assert_eq!(c.get((x, GRID_HEIGHT - 1)), Paint::Empty, "status row stays clear");
        }
        for y in 0..GRID_HEIGHT - 1 {
            assert_eq!(c.get((0, y)), Paint::Border);
            assert_eq!(c.get((GRID_WIDTH - 1, y)), Paint::Border);
        }

        assert_eq!(c.get((1, 1)), Paint::Empty);
        assert_eq!(c.get((GRID_WIDTH - 2, GRID_HEIGHT - 3)), Paint::Empty);
    }

    #[test]
    fn board_shows_snake_and_food() {
        let mut c = canvas();
        c.compose_board(&[(15, 8), (16, 8)], (17, 3));

        assert_eq!(c.get((15, 8)), Paint::Snake);
        assert_eq!(c.get((16, 8)), Paint::Snake);
        assert_eq!(c.get((17, 3)), Paint::Food);

        let painted = c.cells.iter().filter(|p| matches!(p, Paint::Snake | Paint::Food)).count();
        assert_eq!(painted, 3);
    }

    #[test]
    fn cells_off_the_canvas_are_dropped() {
        let mut c = canvas();
        c.set((-1, 3), Paint::Snake);
        c.set((GRID_WIDTH, 3), Paint::Snake);
        c.set((3, 100), Paint::Snake);

        assert!(c.cells.iter().all(|p| *p == Paint::Empty));
        assert_eq!(c.get((-1, 3)), Paint::Empty);
    }

    #[test]
    fn status_row_sits_below_the_board() {
        let mut renderer = TermRenderer::new(&Config::default());
        assert_eq!(renderer.status_position(), (0, GRID_HEIGHT as u16 - 1));

        renderer.origin = (5, 2);
        assert_eq!(renderer.status_position(), (5, GRID_HEIGHT as u16 + 1));
    }

    #[test]
    fn game_over_screens() {
        let mut c = Canvas::new(35, 26);

        c.compose_game_over(false);
        assert!(c.cells.iter().all(|p| *p == Paint::Empty));

        c.compose_game_over(true);
        let lit = c.cells.iter().filter(|p| **p == Paint::Snake).count();
        let expected: usize = HACKER_WARS.iter().map(|g| g.cells.len()).sum();
        assert_eq!(lit, expected);
        assert_eq!(c.get((17, 10)), Paint::Snake);
        assert_eq!(c.get((32, 24)), Paint::Snake);
    }
}
