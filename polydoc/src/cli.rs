use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for polydoc
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "polydoc: polyglot API documentation, one language at a time"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the polydoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new polydoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "polydoc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render a single Markdown file.
  Render {
    /// Markdown file to render.
    input: PathBuf,

    /// Write the output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Language to render the document for.
    #[arg(short, long)]
    language: Option<String>,

    /// Emit the full render result (HTML, headers, tabs, ...) as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Render every Markdown file in a directory.
  Build {
    /// Path to the directory containing markdown files.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Output directory for the rendered HTML.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Language(s) to render for. With more than one, each language is
    /// written to its own subdirectory.
    #[arg(short, long, action = clap::ArgAction::Append)]
    language: Vec<String>,

    /// Number of threads to use for parallel processing.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,
  },

  /// Resolve doc tokens in a piece of text.
  Tokens {
    /// Language to resolve tokens for.
    #[arg(short, long)]
    language: String,

    /// Treat the text as pre-formatted (no semantic markup).
    #[arg(long)]
    pre: bool,

    /// Text to process. Read from stdin when omitted.
    text: Option<String>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  #[allow(clippy::panic)]
  fn test_build_arguments() {
    let cli = Cli::parse_from([
      "polydoc", "build", "-i", "docs", "-l", "ruby", "-l", "python", "-p", "2",
      "-c", "a.toml", "-c", "b.json",
    ]);
    let Commands::Build {
      input_dir,
      language,
      jobs,
      ..
    } = cli.command
    else {
      panic!("expected build");
    };
    assert_eq!(input_dir, Some(PathBuf::from("docs")));
    assert_eq!(language, vec!["ruby", "python"]);
    assert_eq!(jobs, Some(2));
    assert_eq!(cli.config_files.len(), 2);
  }

  #[test]
  fn test_tokens_arguments() {
    let cli =
      Cli::parse_from(["polydoc", "tokens", "-l", "csharp", "--pre", "x"]);
    assert!(matches!(
      cli.command,
      Commands::Tokens { ref language, pre: true, text: Some(_) } if language == "csharp"
    ));
  }
}
