//! Text protocol spoken with agents.
//!
//! * Judge -> Agent: `COLOR <1|2>` then `MOVE BOARD:<64 digits>`
//! * Agent -> Judge: `pass` or a coordinate such as `c4` (file letter, rank digit)

use std::fmt::Display;
use std::str::FromStr;

use crate::board::{Side, BOARD_SIZE};

/// Token an agent answers with when it has no legal placement.
pub const PASS_TOKEN: &str = "pass";

/// Prefix an agent may use to report its own failure.
pub const AGENT_ERROR_PREFIX: &str = "[ERROR]";

/// A ply as decoded from an agent response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Skip the turn.
    Pass,
    /// Put a stone at `row` (rank - 1) and `col` (file index).
    Place {
        /// 0-based row, `0` is rank `1`.
        row: usize,
        /// 0-based column, `0` is file `a`.
        col: usize,
    },
}

/// Error returned for a response that is neither `pass` nor a coordinate on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoveError(String);

impl Display for ParseMoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a move", self.0)
    }
}

impl std::error::Error for ParseMoveError {}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(PASS_TOKEN) {
            return Ok(Move::Pass);
        }

        let err = || ParseMoveError(s.to_string());
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(err());
        }
        let rank = rank.to_digit(10).ok_or_else(err)? as usize;
        if !(1..=BOARD_SIZE).contains(&rank) {
            return Err(err());
        }

        Ok(Move::Place {
            row: rank - 1,
            col: (file as u8 - b'a') as usize,
        })
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Move::Pass => write!(f, "{PASS_TOKEN}"),
            Move::Place { row, col } => write!(f, "{}{}", (b'a' + col as u8) as char, row + 1),
        }
    }
}

/// The two lines sent to an agent for one move request, newline terminated.
pub fn move_request(side: Side, board_snapshot: &str) -> String {
    format!(
        "COLOR {}\nMOVE BOARD:{board_snapshot}\n",
        side.protocol_id()
    )
}
