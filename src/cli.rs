//! Command line options

use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};

/// Shell used when `$SHELL` is unset
const FALLBACK_SHELL: &str = "/bin/sh";

/// CLI arguments for miniterm
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "miniterm")]
#[command(about = "A minimalist terminal", long_about = None)]
#[command(disable_version_flag = true)]
pub struct CliArgs {
    /// Show version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Execute COMMAND instead of the default shell
    #[arg(short = 'e', long, value_name = "COMMAND")]
    pub execute: Option<String>,

    /// Start in PATH
    #[arg(short = 'd', long, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Keep the window open when the command exits
    #[arg(short = 'k', long)]
    pub keep: bool,

    /// Fixed window title
    #[arg(short = 't', long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Read settings from FILE instead of the user configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// What to run and how, resolved from [`CliArgs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub directory: Option<PathBuf>,
    pub keep: bool,
    pub title: Option<String>,
}

impl Invocation {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        Ok(Self {
            argv: command_argv(args.execute.as_deref())?,
            directory: args.directory.clone(),
            keep: args.keep,
            title: args.title.clone(),
        })
    }
}

/// Tokenize `command` shell-style, or fall back to the user's shell.
pub fn command_argv(command: Option<&str>) -> Result<Vec<String>> {
    match command {
        Some(command) => {
            let argv = shell_words::split(command)?;
            if argv.is_empty() {
                return Err(Error::EmptyCommand);
            }
            Ok(argv)
        }
        None => Ok(vec![user_shell()]),
    }
}

pub fn user_shell() -> String {
    env::var("SHELL")
        .ok()
        .filter(|shell| !shell.is_empty())
        .unwrap_or_else(|| FALLBACK_SHELL.to_string())
}
