use clap::Parser;
use minipy::cli::{generate_completions, Args, Commands};
use minipy::config::AppConfig;
use minipy::diagnostic::render_diagnostics;
use minipy::format::{ast_to_json, render_ast, token_table, tokens_to_json};
use minipy::{parse, tokenize, Error, Interpreter};
use owo_colors::OwoColorize;
use std::io::{self, BufWriter, Read};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

enum Mode {
    Run,
    Tokens { json: bool },
    Ast { json: bool },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = &args.command {
        generate_completions(*shell);
        return ExitCode::SUCCESS;
    }

    let config = AppConfig::from_args(&args);
    init_tracing(&config);

    let (file, mode) = match &args.command {
        Some(Commands::Tokens { file, json }) => (file.as_deref(), Mode::Tokens { json: *json }),
        Some(Commands::Ast { file, json }) => (file.as_deref(), Mode::Ast { json: *json }),
        _ => (args.file.as_deref(), Mode::Run),
    };

    let (source, name) = match read_source(file, args.code.as_deref()) {
        Ok(input) => input,
        Err(message) => {
            error_message(&config, &message);
            return ExitCode::FAILURE;
        }
    };
    debug!(bytes = source.len(), file = %name, "read source");

    let result = match mode {
        Mode::Run => run_program(&source, &config),
        Mode::Tokens { json } => dump_tokens(&source, json),
        Mode::Ast { json } => dump_ast(&source, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let rendered = render_diagnostics(&source, &name, &[err.to_diagnostic()], config.color_enabled);
            eprint!("{}", rendered);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter()))
        .with_writer(io::stderr)
        .with_ansi(config.color_enabled)
        .with_target(false)
        .init();
}

fn read_source(file: Option<&Path>, code: Option<&str>) -> Result<(String, String), String> {
    if let Some(code) = code {
        return Ok((code.to_string(), "<string>".to_string()));
    }
    if let Some(path) = file {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        return Ok((source, path.display().to_string()));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read from stdin: {}", e))?;
    Ok((buffer, "<stdin>".to_string()))
}

fn run_program(source: &str, config: &AppConfig) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    let program = parse(tokens)?;
    let stdout = io::stdout();
    let mut interpreter = Interpreter::new(BufWriter::new(stdout.lock())).with_max_depth(config.max_depth);
    interpreter.run(&program)?;
    Ok(())
}

fn dump_tokens(source: &str, json: bool) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    if json {
        println!("{:#}", tokens_to_json(&tokens));
    } else {
        print!("{}", token_table(&tokens));
    }
    Ok(())
}

fn dump_ast(source: &str, json: bool) -> Result<(), Error> {
    let program = parse(tokenize(source)?)?;
    if json {
        println!("{:#}", ast_to_json(&program));
    } else {
        print!("{}", render_ast(&program));
    }
    Ok(())
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{} {}", "error:".red().bold(), message);
    } else {
        eprintln!("error: {}", message);
    }
}
