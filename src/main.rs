use anyhow::Result;
use funl::config::ReplConfig;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn print_usage() {
    println!("Usage: funl [PROGRAM]");
    println!();
    println!("Starts the Funl REPL, loading the function definitions in PROGRAM first.");
    println!();
    println!("Environment:");
    println!("  FUNL_MAX_DEPTH  maximum nested call depth (default 1000)");
    println!("  RUST_LOG        tracing filter, e.g. funl_core=debug");
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }
    if args.len() > 1 {
        print_usage();
        anyhow::bail!("expected at most one program file, got {}", args.len());
    }

    let config = ReplConfig::from_env()?;
    funl::repl::start(config, args.first().map(String::as_str))
}
