//! Turn loop of a match, written as an explicit state machine.
//!
//! ```text
//! TurnStart(side) -> AwaitResponse -> Validate -> SwitchOrEnd -> TurnStart(opponent) ...
//!                          |              |            |
//!                          +--------------+------------+--> Completed(termination)
//! ```
//!
//! The arbiter only talks to agents through [`MoveSource`], so the whole rule set can be driven
//! by scripted sources without spawning any process.

use tracing::{debug, info, instrument, trace, warn};

use crate::agent_channel::{ChannelError, MoveSource};
use crate::board::{Board, Cell, Side};
use crate::outcome::{MatchOutcome, PlayedMove, Termination};
use crate::protocol::Move;

/// Where the turn loop stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArbiterState {
    /// `side` is about to be asked for a move.
    TurnStart(Side),
    /// Waiting for `side`'s answer. `has_legal` was computed before asking.
    AwaitResponse {
        /// Side to play.
        side: Side,
        /// Whether `side` had a legal placement.
        has_legal: bool,
    },
    /// Checking `response` against the rules.
    Validate {
        /// Side that answered.
        side: Side,
        /// Whether `side` had a legal placement.
        has_legal: bool,
        /// Trimmed answer.
        response: String,
    },
    /// `side` completed a ply.
    SwitchOrEnd(Side),
    /// The match is over.
    Completed(Termination),
}

/// Referee of a single match.
pub struct Arbiter<'a> {
    board: Board,
    black: &'a mut dyn MoveSource,
    white: &'a mut dyn MoveSource,
    history: Vec<PlayedMove>,
}

impl<'a> Arbiter<'a> {
    /// Arbiter for a match starting from the standard position.
    pub fn new(black: &'a mut dyn MoveSource, white: &'a mut dyn MoveSource) -> Self {
        Self::with_board(Board::new(), black, white)
    }

    /// Arbiter for a match starting from `board`, with its active side to move.
    pub fn with_board(
        board: Board,
        black: &'a mut dyn MoveSource,
        white: &'a mut dyn MoveSource,
    ) -> Self {
        Arbiter {
            board,
            black,
            white,
            history: vec![],
        }
    }

    /// Current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Drive the state machine until the match completes.
    #[instrument(skip_all, fields(black = self.black.name(), white = self.white.name()))]
    pub fn run(&mut self) -> MatchOutcome {
        info!("match started");
        let mut state = ArbiterState::TurnStart(self.board.active_side());
        let termination = loop {
            state = match self.step(state) {
                ArbiterState::Completed(termination) => break termination,
                next => next,
            };
        };

        let reason = self.reason(&termination);
        if termination.is_forfeit() {
            warn!(reason = reason.as_str(), "forfeit");
        }
        let outcome = MatchOutcome::decide(
            &self.board,
            termination,
            reason,
            std::mem::take(&mut self.history),
        );
        trace!("final board:\n{}", self.board);
        info!(%outcome, "match finished");
        outcome
    }

    /// Compute the state following `state`.
    pub fn step(&mut self, state: ArbiterState) -> ArbiterState {
        match state {
            ArbiterState::TurnStart(side) => {
                let has_legal = self.board.has_legal_move(side);
                trace!(%side, legal = ?self.legal_moves_text(side), "turn start");
                ArbiterState::AwaitResponse { side, has_legal }
            }
            ArbiterState::AwaitResponse { side, has_legal } => {
                let snapshot = self.board.serialize();
                match self.source(side).request_move(&snapshot) {
                    Ok(response) => {
                        debug!(
                            player = self.name(side),
                            response = response.as_str(),
                            "answer"
                        );
                        ArbiterState::Validate {
                            side,
                            has_legal,
                            response,
                        }
                    }
                    Err(ChannelError::Timeout(deadline)) => {
                        debug!(player = self.name(side), ?deadline, "timeout");
                        ArbiterState::Completed(Termination::Timeout { offender: side })
                    }
                    Err(ChannelError::Communication(cause)) => {
                        ArbiterState::Completed(Termination::CommunicationFailure {
                            offender: side,
                            cause,
                        })
                    }
                }
            }
            ArbiterState::Validate {
                side,
                has_legal,
                response,
            } => self.validate(side, has_legal, response),
            ArbiterState::SwitchOrEnd(side) => {
                self.board.switch_side();
                if self.board.count(Cell::Empty) == 0 {
                    ArbiterState::Completed(Termination::BoardFull)
                } else {
                    ArbiterState::TurnStart(side.opponent())
                }
            }
            completed @ ArbiterState::Completed(_) => completed,
        }
    }

    fn validate(&mut self, side: Side, has_legal: bool, response: String) -> ArbiterState {
        let Ok(mv) = response.parse::<Move>() else {
            return ArbiterState::Completed(Termination::IllegalMove {
                offender: side,
                response,
            });
        };

        match mv {
            Move::Pass => {
                if has_legal {
                    return ArbiterState::Completed(Termination::IllegalPass { offender: side });
                }
                self.history.push(PlayedMove { side, mv });
                debug!(player = self.name(side), "passed without a legal move");
                if !self.board.has_legal_move(side.opponent()) {
                    return ArbiterState::Completed(Termination::Stalemate);
                }
            }
            Move::Place { row, col } => {
                if !has_legal {
                    return ArbiterState::Completed(Termination::MissedPass {
                        offender: side,
                        response,
                    });
                }
                if !self.board.place(side, row, col) {
                    return ArbiterState::Completed(Termination::IllegalMove {
                        offender: side,
                        response,
                    });
                }
                self.history.push(PlayedMove { side, mv });
                debug!(player = self.name(side), %mv, "move applied");
                trace!("\n{}MOVE BOARD:{}", self.board, self.board.serialize());
            }
        }
        ArbiterState::SwitchOrEnd(side)
    }

    fn source(&mut self, side: Side) -> &mut dyn MoveSource {
        match side {
            Side::Black => &mut *self.black,
            Side::White => &mut *self.white,
        }
    }

    fn name(&self, side: Side) -> &str {
        match side {
            Side::Black => self.black.name(),
            Side::White => self.white.name(),
        }
    }

    fn legal_moves_text(&self, side: Side) -> String {
        self.board
            .legal_moves(side)
            .iter()
            .map(Move::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn reason(&self, termination: &Termination) -> String {
        match termination {
            Termination::Timeout { offender } => {
                format!("{} did not respond within the deadline", self.name(*offender))
            }
            Termination::CommunicationFailure { offender, cause } => {
                format!("{}'s process failed: {cause}", self.name(*offender))
            }
            Termination::IllegalPass { offender } => format!(
                "{} passed despite having a legal move",
                self.name(*offender)
            ),
            Termination::IllegalMove { offender, response } => {
                format!("{} played an illegal move '{response}'", self.name(*offender))
            }
            Termination::MissedPass { offender, response } => format!(
                "{} played an illegal move '{response}' while it had to pass",
                self.name(*offender)
            ),
            Termination::Stalemate => "both sides are out of moves".to_string(),
            Termination::BoardFull => "board full".to_string(),
        }
    }
}
