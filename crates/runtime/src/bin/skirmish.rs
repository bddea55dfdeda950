//! Headless skirmish runner: both sides play on autopilot and the battle log
//! streams to stdout.
use anyhow::Result;
use tactics_content::{ContentFactory, ContentPack};
use tactics_runtime::{AutoBattleProvider, EncounterSession, Event, RuntimeConfig, Topic};
use tokio::sync::broadcast::error::RecvError;

const MAX_STEPS: usize = 500;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    let pack = match &config.content_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), encounter = %config.encounter, "loading content");
            ContentFactory::new(dir).load_pack(&config.encounter)?
        }
        None => ContentPack::builtin(),
    };

    let mut session = EncounterSession::start(&pack, config)?;
    tracing::info!(seed = session.seed(), "replay with BATTLE_SEED={}", session.seed());
    for line in session.log_lines() {
        println!("{line}");
    }

    let mut log = session.subscribe(Topic::Log);
    let printer = tokio::spawn(async move {
        loop {
            match log.recv().await {
                Ok(Event::Log(event)) => println!("[T{}] {}", event.turn, event.entry),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "log printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let phase = session
        .run_to_completion(&AutoBattleProvider, MAX_STEPS)
        .await?;
    let rewards = session.state().rewards;
    let commands = session.commands().len();
    drop(session);
    printer.await?;

    println!("Outcome: {phase} after {commands} commands");
    if let Some(rewards) = rewards {
        println!("Rewards: {rewards}");
    }
    Ok(())
}
