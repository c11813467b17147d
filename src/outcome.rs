//! Terminal states of a match and how they decide the winner.

use std::fmt::Display;

use crate::board::{Board, Cell, Side};
use crate::protocol::Move;

/// Why a match ended.
///
/// Every variant except [`Termination::Stalemate`] and [`Termination::BoardFull`] is a forfeit
/// by `offender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The agent did not answer before the deadline.
    Timeout {
        /// Side that failed to answer.
        offender: Side,
    },
    /// The agent process failed, closed its output or sent a blank line.
    CommunicationFailure {
        /// Side whose agent failed.
        offender: Side,
        /// Channel level description.
        cause: String,
    },
    /// Pass while a legal placement existed.
    IllegalPass {
        /// Side that passed.
        offender: Side,
    },
    /// Unparsable answer, coordinate off the board, or placement refused by the rules.
    IllegalMove {
        /// Side that answered.
        offender: Side,
        /// Raw answer.
        response: String,
    },
    /// Placement attempted while the side had no legal move and had to pass.
    MissedPass {
        /// Side that answered.
        offender: Side,
        /// Raw answer.
        response: String,
    },
    /// Neither side can move after a legal pass.
    Stalemate,
    /// No empty cell remains.
    BoardFull,
}

impl Termination {
    /// The side that lost by violating the rules or the protocol, if any.
    pub fn offender(&self) -> Option<Side> {
        match self {
            Termination::Timeout { offender }
            | Termination::CommunicationFailure { offender, .. }
            | Termination::IllegalPass { offender }
            | Termination::IllegalMove { offender, .. }
            | Termination::MissedPass { offender, .. } => Some(*offender),
            Termination::Stalemate | Termination::BoardFull => None,
        }
    }

    /// True for every rule or protocol violation.
    pub fn is_forfeit(&self) -> bool {
        self.offender().is_some()
    }
}

/// Winner of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    /// Black won.
    Black,
    /// White won.
    White,
    /// Equal counts without forfeit.
    Draw,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Winner {
        match side {
            Side::Black => Winner::Black,
            Side::White => Winner::White,
        }
    }
}

impl Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Black => write!(f, "Black"),
            Winner::White => write!(f, "White"),
            Winner::Draw => write!(f, "Draw"),
        }
    }
}

/// One applied ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    /// Side that played.
    pub side: Side,
    /// What it played.
    pub mv: Move,
}

/// Final result of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Black stones on the final board.
    pub black_count: usize,
    /// White stones on the final board.
    pub white_count: usize,
    /// Human readable cause, naming the offending player for forfeits.
    pub reason: String,
    /// Winning side, or draw.
    pub winner: Winner,
    /// How the match ended.
    pub termination: Termination,
    /// Every successfully applied ply, in order.
    pub history: Vec<PlayedMove>,
}

impl MatchOutcome {
    /// Decide the winner for `termination` on the final `board`.
    ///
    /// Forfeits go to the opponent of the offender whatever the counts; otherwise the side with
    /// more stones wins and equal counts draw.
    pub fn decide(
        board: &Board,
        termination: Termination,
        reason: String,
        history: Vec<PlayedMove>,
    ) -> MatchOutcome {
        let black_count = board.count(Cell::Black);
        let white_count = board.count(Cell::White);
        let winner = match termination.offender() {
            Some(offender) => Winner::from(offender.opponent()),
            None => match black_count.cmp(&white_count) {
                std::cmp::Ordering::Greater => Winner::Black,
                std::cmp::Ordering::Less => Winner::White,
                std::cmp::Ordering::Equal => Winner::Draw,
            },
        };
        MatchOutcome {
            black_count,
            white_count,
            reason,
            winner,
            termination,
            history,
        }
    }
}

impl Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Black({}) - White({}), winner: {} : {}",
            self.black_count, self.white_count, self.winner, self.reason
        )
    }
}
