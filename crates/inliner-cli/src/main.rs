//! Inliner - Main Entry Point
//!
//! Usage: inliner [--strip-attrs] [--leave-style] [--relaxed] [--strict]
//!                [--ignore-style-type] [--config <file.json>] [<input.html>]
//!
//! Reads the document from the file (or stdin), writes the inlined HTML to
//! stdout and reports warnings on stderr.

use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use inliner_engine::{Config, Inliner};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: inliner [--strip-attrs] [--leave-style] [--relaxed] [--strict] \
                     [--ignore-style-type] [--config <file.json>] [<input.html>]";

struct Args {
    config: Config,
    input: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut config = Config::default();
    let mut flags = Vec::new();
    let mut input = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file path")?;
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path))?;
                config = serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path))?;
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => flags.push(flag.to_string()),
            path if input.is_none() => input = Some(path.to_string()),
            _ => bail!("unexpected argument '{}'\n{}", arg, USAGE),
        }
    }

    // Flags override the config file
    for flag in flags {
        config = match flag.as_str() {
            "--strip-attrs" => config.with_strip_attrs(true),
            "--leave-style" => config.with_leave_style(true),
            "--relaxed" => config.with_relaxed(true),
            "--strict" => config.with_warnings_as_errors(true),
            "--ignore-style-type" => config.with_ignore_style_type_attr(true),
            _ => bail!("unknown option '{}'\n{}", flag, USAGE),
        };
    }

    Ok(Args { config, input })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let html = match &args.input {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };

    tracing::info!("Inliner v{} starting", inliner_engine::VERSION);

    let mut inliner = Inliner::new(args.config);
    inliner.read(&html)?;
    let output = inliner.inlinify()?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    if !inliner.warnings().is_empty() {
        tracing::info!("{} warnings", inliner.warnings().len());
    }
    Ok(())
}
