//! Runtime configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Session-level settings. Battle rules live in `BattleConfig`.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Seed for the encounter's random source. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Pause between consecutive enemy turns.
    pub enemy_turn_delay: Duration,
    /// Snapshots kept for undo.
    pub history_limit: usize,
    /// Buffered events per topic.
    pub event_capacity: usize,
    /// Data directory for content; `None` uses the built-in skirmish.
    pub content_dir: Option<PathBuf>,
    /// Encounter file name under `encounters/`.
    pub encounter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            enemy_turn_delay: Duration::from_millis(300),
            history_limit: 64,
            event_capacity: 256,
            content_dir: None,
            encounter: "training".to_owned(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_SEED` - fixed seed for the random source
    /// - `ENEMY_TURN_DELAY_MS` - pause between enemy turns (default: 300)
    /// - `HISTORY_LIMIT` - undo depth (default: 64, minimum 1)
    /// - `EVENT_CAPACITY` - per-topic event buffer (default: 256, minimum 1)
    /// - `CONTENT_DIR` - content data directory
    /// - `ENCOUNTER` - encounter name (default: training)
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("BATTLE_SEED") {
            config.seed = Some(seed);
        }
        if let Some(delay) = read_env::<u64>("ENEMY_TURN_DELAY_MS") {
            config.enemy_turn_delay = Duration::from_millis(delay);
        }
        if let Some(limit) = read_env::<usize>("HISTORY_LIMIT") {
            config.history_limit = limit.max(1);
        }
        if let Some(capacity) = read_env::<usize>("EVENT_CAPACITY") {
            config.event_capacity = capacity.max(1);
        }
        if let Some(dir) = env::var_os("CONTENT_DIR").filter(|dir| !dir.is_empty()) {
            config.content_dir = Some(PathBuf::from(dir));
        }
        if let Some(encounter) = read_env::<String>("ENCOUNTER") {
            config.encounter = encounter;
        }

        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_enemy_turn_delay(mut self, delay: Duration) -> Self {
        self.enemy_turn_delay = delay;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
