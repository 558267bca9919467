use crate::cli::{Args, ColorChoice};

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub max_depth: usize,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            max_depth: args.max_depth,
        }
    }

    /// Log filter: `--verbose` wins, then `RUST_LOG`, then warnings only.
    pub fn log_filter(&self) -> String {
        if self.verbose {
            return "minipy=debug".to_string();
        }
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string())
    }
}
