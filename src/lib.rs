//! # Othello Judge
//!
//! A referee for Othello (Reversi) matches between two external AI programs.
//!
//! It provides:
//! - The rules engine of the fixed 8x8 game ([`board`])
//! - A line based connection to agent processes with a per-answer deadline ([`agent_channel`])
//! - The turn loop deciding forfeits, stalemates and final scores ([`arbiter`])
//! - A scoped runner tying both together for one match ([`Judge`](crate::judge::Judge))
//!
//! Each agent runs as a separate OS process for the whole match. Its process is killed before the
//! match result is returned, whether the match ended normally, by timeout, or by error.
//!
//! # Usage Example
//!
//! ```no_run
//! use othello_judge::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new().with_log(true);
//!     let judge = Judge::new(config)?;
//!
//!     let black = Agent::new("./agents/greedy");
//!     let white = Agent::with_args("./agents/minimax", vec!["--depth".into(), "4".into()]);
//!     let outcome = judge.run_match(&black, &white)?;
//!
//!     println!("{} ({})", outcome.winner, outcome.reason);
//!     Ok(())
//! }
//! ```
//!
//! # Example Agent
//!
//! An agent reads requests on stdin and answers on stdout, one line per request:
//!
//! ```no_run
//! use std::io::{self, BufRead, Write};
//!
//! fn main() -> io::Result<()> {
//!     let stdin = io::stdin();
//!     let mut lines = stdin.lock().lines();
//!     while let (Some(color), Some(request)) = (lines.next(), lines.next()) {
//!         let _color = color?; // "COLOR 1" or "COLOR 2"
//!         let _board = request?; // "MOVE BOARD:" followed by 64 digits
//!         // ... pick a move ...
//!         writeln!(io::stdout(), "pass")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Agent Requirements
//!
//! - Answer each request with exactly one line: `pass` or a coordinate `a1`..`h8`
//!   (letter = column, digit = row)
//! - Answer within the configured deadline (5 seconds by default)
//! - Passing while a placement is possible, placing while a pass is mandatory, or any illegal or
//!   malformed answer loses the match
//! - A line starting with `[ERROR]` reports an agent-side failure and loses the match
#![warn(missing_docs)]

pub use anyhow;
mod agent;
pub mod agent_channel;
pub mod arbiter;
pub mod board;
pub mod configuration;
pub mod judge;
mod logger;
pub mod outcome;
mod process;
pub mod protocol;

pub use agent::Agent;

/// Commonly used types for quick access.
///
/// ```rust
/// use othello_judge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::Agent;
    pub use crate::board::{Board, Cell, Side};
    pub use crate::configuration::Configuration;
    pub use crate::judge::Judge;
    pub use crate::outcome::{MatchOutcome, Termination, Winner};
    pub use crate::protocol::Move;
}
