//! rules_sim - Headless exchange of blows driven by rules_core
//!
//! Usage: `rules_sim [encounter.toml]`. Without a path the bundled
//! encounter is used. Set `RUST_LOG=debug` to see every roll.

mod encounter;
mod simulation;

use anyhow::Result;
use encounter::{Encounter, DEFAULT_ENCOUNTER};
use rules_core::prompt::ScriptedPrompt;
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut encounter = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Encounter::load(&path)?,
        None => Encounter::parse(DEFAULT_ENCOUNTER)?,
    };

    // Nobody is at the table to answer prompts: every dialog takes its defaults
    let prompt = ScriptedPrompt::default();
    let summary = simulation::run_exchange(&mut encounter, &prompt).await;

    println!("{}", "=".repeat(60));
    println!("  {} vs {}", encounter.hero.sheet.name, encounter.foe.sheet.name);
    println!("{}", "=".repeat(60));
    println!("  Rounds:       {}", summary.rounds);
    println!(
        "  {} dealt {} over {} hits",
        encounter.hero.sheet.name, summary.hero_damage_dealt, summary.hero_hits
    );
    println!(
        "  {} dealt {} over {} hits",
        encounter.foe.sheet.name, summary.foe_damage_dealt, summary.foe_hits
    );
    match &summary.winner {
        Some(name) => println!("  Winner:       {name}"),
        None => println!("  No one fell within {} rounds", encounter.max_rounds),
    }
    Ok(())
}
