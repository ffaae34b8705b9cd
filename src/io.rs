//! Text-file adapters used by the command-line player.
//!
//! ## Formats
//!
//! - Input: first line is the color to play (`1` or `2`), followed by N lines
//!   of the previous board and N lines of the current board, each line N
//!   digits `0`-`2`.
//! - Output: `row,col` or `PASS`.
//! - Move counter: a single integer, the moves left in the game as seen by
//!   this player. It is created on the first turn and removed once spent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::agent::{Move, Turn};
use crate::board::{Board, BoardError, Color};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("input has {found} lines, expected {expected}")]
    Truncated { found: usize, expected: usize },
    #[error("invalid color line '{0}'")]
    BadColor(String),
    #[error("invalid character '{ch}' on line {line}")]
    BadDigit { line: usize, ch: char },
    #[error("board starting on line {line}: {source}")]
    Board {
        line: usize,
        #[source]
        source: BoardError,
    },
    #[error("invalid move count '{0}'")]
    BadMoveCount(String),
}

/// The parsed contents of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub color: Color,
    pub previous: Board,
    pub board: Board,
}

impl Input {
    pub fn into_turn(self, moves_remaining: usize) -> Turn {
        Turn::new(self.color, self.previous, self.board, moves_remaining)
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> InputError + '_ {
    move |source| InputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Parse `size` board lines starting at 1-based line number `first`.
fn parse_board(lines: &[&str], first: usize) -> Result<Board, InputError> {
    let mut rows = Vec::with_capacity(lines.len());
    for (offset, line) in lines.iter().enumerate() {
        let row = line
            .chars()
            .map(|ch| {
                ch.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or(InputError::BadDigit {
                        line: first + offset,
                        ch,
                    })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        rows.push(row);
    }
    Board::from_rows(&rows).map_err(|source| InputError::Board {
        line: first,
        source,
    })
}

pub fn parse_input(text: &str, size: usize) -> Result<Input, InputError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let expected = 2 * size + 1;
    if lines.len() < expected {
        return Err(InputError::Truncated {
            found: lines.len(),
            expected,
        });
    }

    let color = lines[0]
        .parse::<u8>()
        .ok()
        .and_then(Color::from_code)
        .ok_or_else(|| InputError::BadColor(lines[0].to_string()))?;
    let previous = parse_board(&lines[1..=size], 2)?;
    let board = parse_board(&lines[size + 1..expected], size + 2)?;

    Ok(Input {
        color,
        previous,
        board,
    })
}

pub fn read_input(path: &Path, size: usize) -> Result<Input, InputError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    parse_input(&text, size)
}

pub fn write_output(path: &Path, mv: Move) -> Result<(), InputError> {
    fs::write(path, mv.to_string()).map_err(io_error(path))
}

/// Moves left for `color`, updating the counter file for the next turn.
///
/// Without a counter file this is the first turn: the budget is the number
/// of board points minus the color code (24 for Black, 23 for White on 5x5).
/// The stored value drops by two per turn and the file is removed once it
/// reaches zero.
pub fn read_moves_remaining(
    path: &Path,
    color: Color,
    size: usize,
) -> Result<usize, InputError> {
    let moves = if path.exists() {
        let text = fs::read_to_string(path).map_err(io_error(path))?;
        text.trim()
            .parse::<i64>()
            .map_err(|_| InputError::BadMoveCount(text.trim().to_string()))?
    } else {
        (size * size) as i64 - i64::from(color.code())
    };

    let next = moves - 2;
    if next > 0 {
        fs::write(path, next.to_string()).map_err(io_error(path))?;
    } else if path.exists() {
        fs::remove_file(path).map_err(io_error(path))?;
    }
    Ok(moves.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "2\n00000\n00000\n00100\n00000\n00000\n\
                          00000\n00000\n00100\n00020\n00000\n";

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("little-go-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_input() {
        let input = parse_input(SAMPLE, 5).unwrap();
        assert_eq!(input.color, Color::White);
        assert_eq!(input.previous.get((2, 2)), Some(Color::Black));
        assert_eq!(input.board.get((3, 3)), Some(Color::White));
        assert_eq!(input.board.count(Color::Black), 1);
    }

    #[test]
    fn test_parse_input_tolerates_crlf() {
        let text = SAMPLE.replace('\n', "\r\n");
        assert_eq!(parse_input(&text, 5).unwrap(), parse_input(SAMPLE, 5).unwrap());
    }

    #[test]
    fn test_parse_input_errors() {
        assert!(matches!(
            parse_input("1\n00000\n", 5),
            Err(InputError::Truncated {
                found: 2,
                expected: 11
            })
        ));
        let bad_color = SAMPLE.replacen('2', "3", 1);
        assert!(matches!(
            parse_input(&bad_color, 5),
            Err(InputError::BadColor(_))
        ));
        let bad_digit = SAMPLE.replacen("00100", "00x00", 1);
        assert!(matches!(
            parse_input(&bad_digit, 5),
            Err(InputError::BadDigit { line: 4, ch: 'x' })
        ));
        let bad_cell = SAMPLE.replacen("00100", "00700", 1);
        assert!(matches!(
            parse_input(&bad_cell, 5),
            Err(InputError::Board { line: 2, .. })
        ));
        let short_row = SAMPLE.replacen("00100", "0010", 1);
        assert!(matches!(
            parse_input(&short_row, 5),
            Err(InputError::Board { line: 2, .. })
        ));
    }

    #[test]
    fn test_write_output() {
        let dir = scratch("output");
        let path = dir.join("output.txt");
        write_output(&path, Move::Place((1, 4))).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1,4");
        write_output(&path, Move::Pass).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "PASS");
    }

    #[test]
    fn test_move_counter_lifecycle() {
        let dir = scratch("moves");
        let path = dir.join("moves.txt");
        let _ = fs::remove_file(&path);

        assert_eq!(read_moves_remaining(&path, Color::White, 5).unwrap(), 23);
        assert_eq!(fs::read_to_string(&path).unwrap(), "21");
        assert_eq!(read_moves_remaining(&path, Color::White, 5).unwrap(), 21);

        fs::write(&path, "2").unwrap();
        assert_eq!(read_moves_remaining(&path, Color::White, 5).unwrap(), 2);
        assert!(!path.exists());

        fs::write(&path, "many").unwrap();
        assert!(matches!(
            read_moves_remaining(&path, Color::Black, 5),
            Err(InputError::BadMoveCount(_))
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_input_into_turn_arms_ko_after_loss() {
        let text = "1\n10000\n20000\n00000\n00000\n00000\n02000\n20000\n00000\n00000\n00000\n";
        let turn = parse_input(text, 5).unwrap().into_turn(20);
        assert!(turn.captures_seen);
        assert_eq!(turn.moves_remaining, 20);
    }
}
