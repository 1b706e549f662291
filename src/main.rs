use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use defaults::store::JsonStore;
use desktop::display::TerminalDisplay;
use desktop::prompt::{DialogPrompt, Prompt, TerminalPrompt};
use error::Result;
use pomodoro::pomodoro::Catalog;
use pomodoro::session::Session;

mod defaults;
mod desktop;
mod error;
mod pomodoro;

const APP_NAME: &str = "tomato-bar Pomodoro Timer";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();

    let store_path = if let Some(pos) = args.iter().position(|a| a == "--defaults") {
        args.get(pos + 1)
            .map(PathBuf::from)
            .unwrap_or_else(JsonStore::default_path)
    } else {
        JsonStore::default_path()
    };
    let mut store = JsonStore::open(store_path)?;
    info!(path = %store.path().display(), "loaded defaults");

    if args.contains(&"--settings".to_string()) {
        if defaults::settings::open(&mut store, &TerminalPrompt::stdio())? {
            println!("Saved. Restart tomato-bar for the new intervals to take effect.");
        }
        return Ok(());
    }

    let catalog = Catalog::initialize(&mut store)?;

    let prompt: Arc<dyn Prompt> = if args.contains(&"--terminal".to_string()) {
        Arc::new(TerminalPrompt::stdio())
    } else {
        Arc::new(DialogPrompt::new(APP_NAME))
    };

    println!("🍅 {}", APP_NAME);
    println!("======================================================");
    for (kind, def) in catalog.entries() {
        println!(
            "{} {} ({} min): {}",
            kind.emoji(),
            kind.as_str(),
            def.duration_minutes,
            def.description
        );
    }
    println!();

    Session::new(catalog, Arc::new(TerminalDisplay::new(APP_NAME)), prompt)
        .run()
        .await
}
