//! Board storage for Little-Go.
//!
//! A [`Board`] is a plain NxN grid of cells, each either empty or holding a
//! stone of one [`Color`]. It carries no game logic; see [`crate::rules`].
//! Boards are values: the rules engine never mutates a caller's board, it
//! hands back a new one.

use std::fmt;

use thiserror::Error;

/// Stone color. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Numeric code used by the text formats (1 = Black, 2 = White).
    pub fn code(self) -> u8 {
        match self {
            Color::Black => 1,
            Color::White => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Color> {
        match code {
            1 => Some(Color::Black),
            2 => Some(Color::White),
            _ => None,
        }
    }
}

/// A board coordinate `(row, col)`, 0-indexed.
pub type Point = (usize, usize);

/// Rejection reasons when building a board from raw cell codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board is empty")]
    Empty,
    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("cell ({row}, {col}) has invalid code {code}")]
    BadCell { row: usize, col: usize, code: u8 },
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from rows of cell codes (0 = empty, 1 = Black, 2 = White).
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        let mut board = Board::new(size);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: cells.len(),
                    size,
                });
            }
            for (col, &code) in cells.iter().enumerate() {
                let cell = match code {
                    0 => None,
                    _ => Some(Color::from_code(code).ok_or(BoardError::BadCell {
                        row,
                        col,
                        code,
                    })?),
                };
                board.set((row, col), cell);
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, (row, col): Point) -> usize {
        row * self.size + col
    }

    pub fn contains(&self, (row, col): Point) -> bool {
        row < self.size && col < self.size
    }

    /// Cell content, `None` for empty or off-board points.
    pub fn get(&self, pt: Point) -> Option<Color> {
        if !self.contains(pt) {
            return None;
        }
        self.cells[self.idx(pt)]
    }

    pub fn is_empty_at(&self, pt: Point) -> bool {
        self.contains(pt) && self.get(pt).is_none()
    }

    /// Overwrite a single cell. Only used on working copies.
    ///
    /// # Panics
    ///
    /// Panics if `pt` is off the board.
    pub fn set(&mut self, pt: Point, cell: Option<Color>) {
        assert!(
            self.contains(pt),
            "point {pt:?} is off the {size}x{size} board",
            size = self.size
        );
        let i = self.idx(pt);
        self.cells[i] = cell;
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// The center point, played directly on an empty board.
    pub fn center(&self) -> Point {
        (self.size / 2, self.size / 2)
    }

    /// Cell codes row by row, the inverse of [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|c| c.map_or(0, Color::code)).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let ch = match self.get((row, col)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}
