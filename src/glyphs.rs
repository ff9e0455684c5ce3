//! Cell bitmaps for the alternative game over screen: "C++ < PYTHON...",
//! drawn in board cells rather than with a font.

use crate::Cell;

pub struct Glyph {
    pub name: &'static str,
    pub cells: &'static [Cell],
}

pub const HACKER_WARS: [Glyph; 8] = [
    Glyph {
        name: "C",
        cells: &[
            (3, 1), (4, 1), (5, 1), (6, 2),
            (2, 2), (2, 3), (2, 4), (2, 5), (2, 6),
            (6, 6), (3, 7), (4, 7), (5, 7),
        ],
    },
    Glyph {
        name: "+",
        cells: &[
            (8, 4), (9, 4), (10, 4), (11, 4), (12, 4),
            (10, 2), (10, 3), (10, 5), (10, 6),
        ],
    },
    Glyph {
        name: "+",
        cells: &[
            (14, 4), (15, 4), (16, 4), (17, 4), (18, 4),
            (16, 2), (16, 3), (16, 5), (16, 6),
        ],
    },
    Glyph {
        name: "<",
        cells: &[(17, 10), (16, 11), (15, 12), (16, 13), (17, 14)],
    },
    Glyph {
        name: "P",
        cells: &[
            (2, 18), (2, 19), (2, 20), (2, 21), (2, 22), (2, 23), (2, 24),
            (3, 18), (4, 18), (5, 18),
            (3, 21), (4, 21), (5, 21),
            (6, 19), (6, 20),
        ],
    },
    Glyph {
        name: "Y",
        cells: &[
            (9, 18), (10, 19), (11, 20), (12, 19), (13, 18),
            (11, 21), (11, 22), (11, 23), (11, 24),
        ],
    },
    Glyph {
        name: "T",
        cells: &[
            (16, 18), (17, 18), (18, 18), (19, 18), (20, 18),
            (18, 19), (18, 20), (18, 21), (18, 22), (18, 23), (18, 24),
        ],
    },
    Glyph {
        name: "...",
        cells: &[
            (23, 23), (24, 23), (23, 24), (24, 24),
            (27, 23), (28, 23), (27, 24), (28, 24),
            (31, 23), (32, 23), (31, 24), (32, 24),
        ],
    },
];

/// Bottom-right corner, exclusive, of the area the table covers.
pub fn extent(glyphs: &[Glyph]) -> (i16, i16) {
    glyphs
        .iter()
        .flat_map(|g| g.cells.iter())
        .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)))
}
