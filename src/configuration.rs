//! Config for the judge behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are case-insensitive; set them to `"true"` to enable.
//!
//! - `JUDGE_VERBOSE` — Print one summary line per match on stdout (default: `true`)
//! - `JUDGE_LOG` — Enable logging to a file (default: `false`)
//! - `JUDGE_DEBUG_AGENT_STDERR` — Print agent stderr for debugging (default: `false`)
//! - `JUDGE_RESPONSE_TIMEOUT_MS` — Deadline for one agent answer, in milliseconds (default: `5000`, `0` is ignored)

use std::time::Duration;

/// Time an agent has to answer a single move request.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for judge behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) debug_agent_stderr: bool,
    pub(crate) response_timeout: Duration,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - A summary line is printed for each match.
    /// - Logging to file is disabled.
    /// - Agent stderr output is discarded.
    /// - Agents have 5 seconds to answer each request.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
            debug_agent_stderr: false,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their default value.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |var: &str, default: bool| match lookup(var) {
            Some(val) => val.eq_ignore_ascii_case("true"),
            None => default,
        };
        let response_timeout = lookup("JUDGE_RESPONSE_TIMEOUT_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RESPONSE_TIMEOUT);

        Self {
            verbose: flag("JUDGE_VERBOSE", true),
            log: flag("JUDGE_LOG", false),
            debug_agent_stderr: flag("JUDGE_DEBUG_AGENT_STDERR", false),
            response_timeout,
        }
    }

    /// Enable or disable the per-match summary line.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Enable or disable agent stderr output (debug purposes only).
    pub fn with_debug_agent_stderr(mut self, value: bool) -> Self {
        self.debug_agent_stderr = value;
        self
    }

    /// Change the answer deadline. Mostly useful to keep tests short.
    pub fn with_response_timeout(mut self, value: Duration) -> Self {
        self.response_timeout = value;
        self
    }

    /// Deadline for one agent answer.
    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> Configuration {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Configuration::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn empty_env_gives_defaults() {
        assert_eq!(from_map(&[]), Configuration::new());
    }

    #[test]
    fn env_overrides() {
        let config = from_map(&[
            ("JUDGE_VERBOSE", "FALSE"),
            ("JUDGE_LOG", "True"),
            ("JUDGE_DEBUG_AGENT_STDERR", "true"),
            ("JUDGE_RESPONSE_TIMEOUT_MS", "250"),
        ]);
        assert!(!config.verbose);
        assert!(config.log);
        assert!(config.debug_agent_stderr);
        assert_eq!(config.response_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let config = from_map(&[("JUDGE_RESPONSE_TIMEOUT_MS", "soon")]);
        assert_eq!(config.response_timeout(), DEFAULT_RESPONSE_TIMEOUT);
        let config = from_map(&[("JUDGE_RESPONSE_TIMEOUT_MS", "0")]);
        assert_eq!(config.response_timeout(), DEFAULT_RESPONSE_TIMEOUT);
    }

    #[test]
    fn builder() {
        let config = Configuration::new()
            .with_verbose(false)
            .with_log(true)
            .with_debug_agent_stderr(true)
            .with_response_timeout(Duration::from_millis(10));
        assert!(!config.verbose);
        assert!(config.log);
        assert!(config.debug_agent_stderr);
        assert_eq!(config.response_timeout(), Duration::from_millis(10));
    }
}
