//! CLI settings resolution.
//!
//! # Responsibility
//! - Merge command-line flags with environment fallbacks.
//!
//! # Invariants
//! - Flags always win over environment variables.
//! - Resolution is pure: it only reads the env map it is given.

use clap::Args;
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment fallback for `--url`.
pub const URL_ENV: &str = "DYNALIST_URL";

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Document URL; its zoom target selects the start node. Falls back to DYNALIST_URL.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// JSON document to load; reads stdin when omitted.
    #[arg(long, global = true, value_name = "PATH")]
    pub infile: Option<PathBuf>,

    /// Output file; writes stdout when omitted.
    #[arg(long, global = true, value_name = "PATH")]
    pub outfile: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub trace: bool,

    /// Write logs to rotating files in this absolute directory instead of stderr.
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<String>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: Option<String>,
    pub infile: Option<PathBuf>,
    pub outfile: Option<PathBuf>,
    pub log_level: &'static str,
    pub log_dir: Option<String>,
}

impl Settings {
    pub fn resolve(args: &CommonArgs, env: &HashMap<String, String>) -> Self {
        let url = args
            .url
            .clone()
            .or_else(|| env.get(URL_ENV).cloned())
            .filter(|url| !url.trim().is_empty());

        Self {
            url,
            infile: args.infile.clone(),
            outfile: args.outfile.clone(),
            log_level: if args.trace { "debug" } else { "warn" },
            log_dir: args.log_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommonArgs, Settings, URL_ENV};
    use std::collections::HashMap;

    fn env_with_url(url: &str) -> HashMap<String, String> {
        HashMap::from([(URL_ENV.to_string(), url.to_string())])
    }

    #[test]
    fn flag_wins_over_environment() {
        let args = CommonArgs {
            url: Some("https://dynalist.io/d/flag".to_string()),
            ..CommonArgs::default()
        };
        let settings = Settings::resolve(&args, &env_with_url("https://dynalist.io/d/env"));
        assert_eq!(settings.url.as_deref(), Some("https://dynalist.io/d/flag"));
    }

    #[test]
    fn environment_fills_missing_flag() {
        let settings =
            Settings::resolve(&CommonArgs::default(), &env_with_url("https://dynalist.io/d/env"));
        assert_eq!(settings.url.as_deref(), Some("https://dynalist.io/d/env"));
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn blank_url_counts_as_absent_and_trace_raises_level() {
        let args = CommonArgs {
            trace: true,
            ..CommonArgs::default()
        };
        let settings = Settings::resolve(&args, &env_with_url("  "));
        assert_eq!(settings.url, None);
        assert_eq!(settings.log_level, "debug");
    }
}
