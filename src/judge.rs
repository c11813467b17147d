//! Runs one match between two agent programs.
//!
//! [`Judge::run_match`] owns both [`AgentChannel`]s for the duration of the match: they are
//! created before the first request and dropped, killing their processes, before the outcome is
//! returned, whatever the way the match ended.
//!
//! # Example
//!
//! ```no_run
//! use othello_judge::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let judge = Judge::new(Configuration::from_env())?;
//!     let outcome = judge.run_match(&Agent::new("./agents/greedy"), &Agent::new("bots/SampleAI.jar"))?;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

use tracing::{info, instrument, trace, warn};

use crate::agent::Agent;
use crate::agent_channel::AgentChannel;
use crate::arbiter::Arbiter;
use crate::board::Side;
use crate::configuration::Configuration;
use crate::logger::init_logger;
use crate::outcome::{MatchOutcome, Winner};

/// Entry point for refereeing matches.
#[derive(Debug, Clone)]
pub struct Judge {
    config: Configuration,
}

impl Judge {
    /// Create a [`Judge`]. Installs the file logger when [`Configuration::with_log`] is set.
    #[instrument(skip_all)]
    pub fn new(config: Configuration) -> anyhow::Result<Judge> {
        if config.log {
            init_logger()?;
        }
        trace!(?config);
        Ok(Judge { config })
    }

    /// Configuration used for every match.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Play one match, `black` moving first.
    ///
    /// # Errors
    /// Only when an agent cannot be launched. Anything going wrong during the match is a forfeit
    /// reported in the returned [`MatchOutcome`].
    #[instrument(skip_all, fields(black = %black, white = %white))]
    pub fn run_match(&self, black: &Agent, white: &Agent) -> anyhow::Result<MatchOutcome> {
        let mut black_channel = AgentChannel::spawn(black, Side::Black, &self.config)?;
        let mut white_channel = AgentChannel::spawn(white, Side::White, &self.config)?;
        info!(
            black_pid = black_channel.process_id(),
            white_pid = white_channel.process_id(),
            "agents launched"
        );

        let outcome = Arbiter::new(&mut black_channel, &mut white_channel).run();

        for channel in [&mut black_channel, &mut white_channel] {
            if let Err(e) = channel.terminate() {
                // dropping the channel retries the kill
                warn!("{e:#}");
            }
        }

        if self.config.verbose {
            print_outcome(black, white, &outcome);
        }
        Ok(outcome)
    }
}

fn print_outcome(black: &Agent, white: &Agent, outcome: &MatchOutcome) {
    let winner = match outcome.winner {
        Winner::Black => format!("winner: Black {black}"),
        Winner::White => format!("winner: White {white}"),
        Winner::Draw => "draw".to_string(),
    };
    // green match, default results, red reason
    println!(
        "\x1b[32mBlack: {black}, White: {white}: \x1b[39mBlack({}) White({}), {winner} \x1b[31m{}\x1b[39m",
        outcome.black_count, outcome.white_count, outcome.reason
    );
}
