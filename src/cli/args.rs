//! Command-line argument parsing for crunchdigest
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// crunchdigest - Summarize any TechCrunch article in seconds
#[derive(Parser, Debug)]
#[command(name = "crunchdigest")]
#[command(version)]
#[command(about = "Stream an AI-generated bullet summary of a TechCrunch article", long_about = None)]
pub struct Args {
    /// TechCrunch article URL
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Summarization endpoint base URL (overrides config)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Copy the summary to the clipboard when it finishes
    #[arg(long)]
    pub copy: bool,

    /// Print the raw summary text instead of bullet points
    #[arg(long)]
    pub raw: bool,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except the summary)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Summarize an article by its path, e.g. 2023/01/31/some-story
    Open {
        #[arg(value_name = "SLUG")]
        slug: String,
    },

    /// Summarize the article at the stored location again
    Resume,

    /// Copy the shareable link for the stored location
    Share,

    /// Check configuration and endpoint reachability
    Doctor,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check that exactly one of URL or subcommand is given
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.url.is_some() {
            return Err("Cannot specify a URL with a subcommand.".to_string());
        }
        if self.quiet && self.verbose > 0 {
            return Err("--quiet and --verbose are mutually exclusive.".to_string());
        }
        Ok(())
    }
}

impl Verbosity {
    /// Parse the config-file spelling
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "very_verbose" => Some(Verbosity::VeryVerbose),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "crunchdigest=info",
            Verbosity::VeryVerbose => "crunchdigest=debug",
        }
    }

    /// Check if should show spinner and notifications
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show session statistics
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_url_positional() {
        let args = parse(&["crunchdigest", "https://techcrunch.com/2023/01/31/example"]);
        assert_eq!(args.url.as_deref(), Some("https://techcrunch.com/2023/01/31/example"));
        assert!(args.command.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_open_subcommand() {
        let args = parse(&["crunchdigest", "open", "2023/01/31/example"]);
        assert_eq!(
            args.command,
            Some(Commands::Open {
                slug: "2023/01/31/example".to_string()
            })
        );
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["crunchdigest", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["crunchdigest"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["crunchdigest", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["crunchdigest", "-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_validate_quiet_and_verbose() {
        let args = parse(&["crunchdigest", "-q", "-v"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "crunchdigest",
            "--copy",
            "--raw",
            "--endpoint",
            "http://localhost:8080",
            "https://techcrunch.com/x",
        ]);
        assert!(args.copy);
        assert!(args.raw);
        assert_eq!(args.endpoint.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_verbosity_methods() {
        assert!(!Verbosity::Quiet.show_progress());
        assert!(Verbosity::Normal.show_progress());

        assert!(!Verbosity::Normal.show_events());
        assert!(Verbosity::Verbose.show_events());

        assert_eq!(Verbosity::parse("very_verbose"), Some(Verbosity::VeryVerbose));
        assert_eq!(Verbosity::parse("loud"), None);
        assert_eq!(Verbosity::Normal.log_filter(), "warn");
    }
}
