//! `paramtree-dump` — build a parameter tree over a JSON document, apply
//! edits, print the tree and the resulting document.
//!
//! Usage:
//!   paramtree-dump [--config FILE] [POINTER=VALUE]...
//!
//! The document is read from stdin. Each `POINTER=VALUE` edits the leaf at
//! `POINTER` (e.g. `/cars/0/price=420`) with `VALUE` as raw text input.
//! Logging goes to stderr at `warn` unless `RUST_LOG` is set; use
//! `RUST_LOG=debug` to trace the edit protocol.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use paramtree::{Binding, TreeBuilder, TreeConfig};
use paramtree_schema::Value;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` directives if present and valid, `warn` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() -> ExitCode {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = TreeConfig::default();
    let mut edits = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().ok_or("--config needs a file argument")?;
            config = TreeConfig::load(path)?;
        } else {
            let (pointer, raw) = arg
                .split_once('=')
                .ok_or_else(|| format!("expected POINTER=VALUE, got `{arg}`"))?;
            edits.push((pointer.to_string(), raw.to_string()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    let json: serde_json::Value = serde_json::from_str(buf.trim())?;

    let mut binding = Binding::new(TreeBuilder::new().config(config), Value::from_json(&json))?;
    for skipped in binding.tree().skipped() {
        eprintln!("skipped {} ({})", skipped.path, skipped.kind);
    }

    for (pointer, raw) in edits {
        let node = binding.tree().find(&pointer)?;
        match binding.edit(node, raw.as_str()) {
            Ok(accepted) => eprintln!("{pointer}: accepted {}", accepted.value.render()),
            Err(e) => eprintln!("{pointer}: {e}"),
        }
    }

    let mut out = io::stdout().lock();
    out.write_all(binding.tree().describe().as_bytes())?;
    writeln!(out, "{}", serde_json::to_string_pretty(&binding.tree().to_json())?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).to_string(), "warn");
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            log_filter(Some("paramtree=trace")).to_string(),
            "paramtree=trace"
        );
    }
}
