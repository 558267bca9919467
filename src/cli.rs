use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::interpreter::DEFAULT_MAX_DEPTH;

#[derive(Parser, Debug)]
#[command(name = "minipy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for a small Python-like language", long_about = None)]
pub struct Args {
    /// Program to run; read from stdin when neither FILE nor --code is given
    #[arg(value_name = "FILE", conflicts_with = "code")]
    pub file: Option<PathBuf>,

    /// Program source passed as a string
    #[arg(short = 'c', long = "code", value_name = "CODE", global = true)]
    pub code: Option<String>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Log pipeline stages to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Maximum depth of nested function calls
    #[arg(long = "max-depth", value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the token table
    Tokens {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the syntax tree
    Ast {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
        /// Emit JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}
