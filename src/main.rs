use std::process::ExitCode;

use othello_judge::prelude::*;

/// Referee one match: `othello-judge <black-agent> <white-agent>`
fn main() -> ExitCode {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "othello-judge".to_string());
    let (Some(black), Some(white), None) = (args.next(), args.next(), args.next()) else {
        eprintln!("usage: {program} <black-agent> <white-agent>");
        return ExitCode::FAILURE;
    };

    match run(&black, &white) {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("fatal error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(black: &str, white: &str) -> anyhow::Result<MatchOutcome> {
    let judge = Judge::new(Configuration::from_env().with_verbose(false))?;
    judge.run_match(&Agent::new(black), &Agent::new(white))
}
