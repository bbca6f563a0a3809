//! Command-line demo of the todo screen.
//!
//! Loads seed entries through a delayed loader, adds and removes entries the
//! way a user would, and prints the screen after every step.

use clap::Parser;
use std::time::Duration;
use todo::{DelayedLoader, ScreenModel, TodoScreen, TodoScreenConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Todo screen demo
#[derive(Debug, Parser)]
#[command(name = "todo", about = "Drive the todo screen from the command line")]
struct Args {
    /// Entry returned by the loader (repeatable)
    #[arg(long = "seed-item", default_values_t = ["Buy milk".to_string(), "Walk the dog".to_string()])]
    seed_items: Vec<String>,

    /// Loader latency in milliseconds
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,

    /// Entry to type and add after loading (repeatable)
    #[arg(long)]
    add: Vec<String>,

    /// Position to remove at the end
    #[arg(long)]
    remove: Option<usize>,

    /// Minimum characters before "add" is enabled
    #[arg(long, default_value_t = 3)]
    min_text_len: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=debug,unidirection_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!("=== Todo Screen ===\n");

    let loader = DelayedLoader::new(args.seed_items, Duration::from_millis(args.delay_ms));
    let config = TodoScreenConfig::default().with_min_text_len(args.min_text_len);
    let mut screen = TodoScreen::new(ScreenModel::default(), loader, config);
    print!("{}", screen.presentation().render());

    println!("\n>>> Loading...");
    screen.load();
    screen.wait_for_pending().await?;
    print!("{}", screen.presentation().render());

    for entry in args.add {
        println!("\n>>> Typing {entry:?} and pressing add");
        screen.presentation_mut().input_text.clone_from(&entry);
        screen.text_changed(entry);
        if !screen.add_pressed() {
            println!("(add is disabled for this text)");
        }
        print!("{}", screen.presentation().render());
    }

    if let Some(position) = args.remove {
        println!("\n>>> Removing position {position}");
        if position < screen.state().count() {
            screen.remove_at(position);
            print!("{}", screen.presentation().render());
        } else {
            println!("(no entry at position {position})");
        }
    }

    println!("\nFinal state:");
    println!("{}", serde_json::to_string_pretty(&*screen.state())?);
    Ok(())
}
