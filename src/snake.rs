use crate::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step for this direction. `y` grows downwards, like terminal rows.
    pub fn offset(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            Up => 0,
            Down => 1,
            Left => 2,
            Right => 3,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Direction {
        match value {
            0 => Up,
            1 => Down,
            2 => Left,
            _ => Right,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Moved {
    pub new_head: Cell,
    pub old_tail: Option<Cell>,
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Cell>,
}

impl Snake {
    /// Builds a snake from its cells, ordered from tail to head.
    pub fn new(body: Vec<Cell>) -> Self {
        debug_assert!(body.len() >= 2, "a snake needs at least a tail and a head");
        Snake { body }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    /// Where the head would land after one step in `direction`.
    pub fn next_head(&self, direction: Direction) -> Cell {
        let head = self.head();
        let (dx, dy) = direction.offset();
        (head.0 + dx, head.1 + dy)
    }

    /// Moves one cell in `direction`. With `grow` set the tail stays put,
    /// so the body gets one cell longer.
    pub fn step(&mut self, direction: Direction, grow: bool) -> Moved {
        let new_head = self.next_head(direction);
        self.body.push(new_head);

        let old_tail = if grow {
            None
        } else {
            Some(self.body.remove(0))
        };

        Moved { new_head, old_tail }
    }

    /// True if any two cells of the body coincide.
    pub fn overlaps_itself(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.body.len());
        !self.body.iter().all(|cell| seen.insert(*cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [Up, Down, Left, Right];

    #[test]
    fn step_keeps_length_when_not_growing() {
        let mut snake = Snake::new(vec![(15, 8), (16, 8)]);
        let moved = snake.step(Right, false);

        assert_eq!(moved, Moved { new_head: (17, 8), old_tail: Some((15, 8)) });
        assert_eq!(snake.body(), &[(16, 8), (17, 8)]);
    }

    #[test]
    fn step_keeps_tail_when_growing() {
        let mut snake = Snake::new(vec![(15, 8), (16, 8)]);
        let moved = snake.step(Down, true);

        assert_eq!(moved.old_tail, None);
        assert_eq!(snake.body(), &[(15, 8), (16, 8), (16, 9)]);
        assert_eq!(snake.head(), (16, 9));
    }

    #[test]
    fn reversing_a_long_snake_overlaps() {
        let mut snake = Snake::new(vec![(5, 5), (6, 5), (7, 5), (8, 5)]);
        assert!(!snake.overlaps_itself());

        snake.step(Left, false);
        assert!(snake.overlaps_itself());
    }

    #[test]
    fn opposites_pair_up() {
        for dir in ALL.iter() {
            assert_ne!(dir.opposite(), *dir);
            assert_eq!(dir.opposite().opposite(), *dir);

            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }
}
