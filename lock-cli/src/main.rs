//! # Gesture Lock CLI
//!
//! Command-line host for the gesture lock.

use clap::Parser;
use lock_cli::{
    load_script, open_lock, replay, trace_gesture, CliArgs, CliConfig, CliLock, Command,
};
use lock_core::WorkflowOutcome;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays scriptable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_lock=info,lock_cli=info,lock_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = CliConfig::from(&args);

    tracing::debug!(
        "Lock config: {}x{} matrix {} in {}",
        config.lock.width,
        config.lock.height,
        config.lock.matrix,
        config.data_dir.display()
    );

    let mut lock = open_lock(&config)?;

    match args.command {
        Command::Trace { gestures } => {
            for gesture in &gestures {
                let report = trace_gesture(&mut lock, &gesture.0)?;
                let outcome = report.outcome.map_or("ignored", WorkflowOutcome::as_str);
                println!("[{gesture}] {outcome}: {}", report.title);
            }
        }
        Command::Replay { file } => {
            let events = load_script(&file)?;
            tracing::info!("Replaying {} events from {}", events.len(), file.display());
            for outcome in replay(&mut lock, &events)? {
                println!("{}", outcome.as_str());
            }
        }
        Command::Status => {}
        Command::Reset => {
            lock.reset_stored_pattern()?;
            println!("Stored pattern removed");
        }
    }

    print_status(&lock);
    Ok(())
}

fn print_status(lock: &CliLock) {
    println!("state: {}", lock.phase().as_str());
    println!("matrix: {}", lock.grid().matrix());
    match lock.stored_pattern() {
        Some(record) => println!("stored: {}", record.pattern),
        None => println!("stored: none"),
    }
}
