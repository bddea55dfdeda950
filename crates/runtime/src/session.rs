//! Encounter session driver.
//!
//! [`EncounterSession`] owns the current battle snapshot and feeds commands
//! through the pure engine. Every accepted command pushes the previous
//! snapshot (and random source) onto a bounded history so it can be undone,
//! and the recorded commands plus the seed replay the encounter exactly.

use std::collections::VecDeque;

use tactics_content::ContentPack;
use tactics_core::{
    BattleConfig, BattleEngine, BattleEnv, BattlePhase, BattleState, CardTable, LogTag, PcgRng,
    Side,
};

use crate::api::{ActionProvider, Command, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, LogEvent, OutcomeEvent, Topic, TurnEvent};

#[derive(Clone, Debug)]
struct Snapshot {
    state: BattleState,
    rng: PcgRng,
}

/// What an accepted command changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandReport {
    pub command: Command,
    /// Number of battle log lines the command appended.
    pub log_lines: usize,
    pub phase: BattlePhase,
}

pub struct EncounterSession {
    config: RuntimeConfig,
    battle_config: BattleConfig,
    cards: CardTable,
    seed: u64,
    current: Snapshot,
    history: VecDeque<Snapshot>,
    commands: Vec<Command>,
    bus: EventBus,
}

impl EncounterSession {
    /// Builds the encounter described by `pack` and activates its first unit.
    pub fn start(pack: &ContentPack, config: RuntimeConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = PcgRng::new(seed);
        let state = pack
            .encounter_builder()?
            .build(&pack.config, &mut rng)?;
        tracing::info!(seed, units = state.units.len(), "encounter started");

        let bus = EventBus::with_capacity(config.event_capacity);
        Ok(Self {
            config,
            battle_config: pack.config.clone(),
            cards: pack.cards.clone(),
            seed,
            current: Snapshot { state, rng },
            history: VecDeque::new(),
            commands: Vec::new(),
            bus,
        })
    }

    /// Rebuilds an encounter from its seed and recorded commands.
    pub fn replay(
        pack: &ContentPack,
        config: RuntimeConfig,
        seed: u64,
        commands: &[Command],
    ) -> Result<Self> {
        let mut session = Self::start(pack, config.with_seed(seed))?;
        for (index, command) in commands.iter().enumerate() {
            session
                .submit(command.clone())
                .map_err(|source| RuntimeError::ReplayDiverged {
                    index,
                    source: Box::new(source),
                })?;
        }
        Ok(session)
    }

    pub fn state(&self) -> &BattleState {
        &self.current.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Runs one command through the engine and commits the new snapshot.
    ///
    /// Unit commands must come from the active unit. A rejected command leaves
    /// the session exactly as it was.
    pub fn submit(&mut self, command: Command) -> Result<CommandReport> {
        let before = &self.current.state;
        if let Some(action) = command.to_action() {
            if before.active.as_ref() != Some(action.actor()) {
                return Err(RuntimeError::InvalidActionActor {
                    expected: before.active.clone(),
                    provided: action.actor().clone(),
                });
            }
        }

        let mut rng = self.current.rng.clone();
        let env = BattleEnv::new(&self.battle_config, &self.cards);
        let mut engine = BattleEngine::new(env, &mut rng);
        let outcome = match &command {
            Command::EndTurn => engine.advance_turn(before).map(|o| o.into_state()),
            Command::Auto => engine.auto_turn(before).map(|o| o.into_state()),
            Command::EnemyTurn => engine.enemy_turn(before).map(|o| o.into_state()),
            unit_command => match unit_command.to_action() {
                Some(action) => engine.execute(before, &action).map(|o| o.into_state()),
                None => Ok(before.clone()),
            },
        };
        let next = match outcome {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(?command, error = %err, "command rejected");
                return Err(err.into());
            }
        };

        let report = self.commit(command, Snapshot { state: next, rng });
        Ok(report)
    }

    fn commit(&mut self, command: Command, next: Snapshot) -> CommandReport {
        let previous = std::mem::replace(&mut self.current, next);
        let previous_lines = previous.state.log.len();
        let previous_active = previous.state.active.clone();
        let previous_turn = previous.state.turn;
        let was_terminal = previous.state.is_terminal();

        self.history.push_back(previous);
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
        self.commands.push(command.clone());

        let state = &self.current.state;
        for entry in state.log.since(previous_lines) {
            self.bus.publish(Event::Log(LogEvent {
                turn: state.turn,
                entry: entry.clone(),
            }));
        }
        if let Some(active) = &state.active {
            if state.active != previous_active || state.turn != previous_turn {
                self.bus.publish(Event::Turn(TurnEvent {
                    active: active.clone(),
                    turn: state.turn,
                }));
            }
        }
        if state.is_terminal() && !was_terminal {
            tracing::info!(phase = %state.phase, turn = state.turn, "encounter finished");
            self.bus.publish(Event::Outcome(OutcomeEvent {
                phase: state.phase,
                rewards: state.rewards,
            }));
        }

        CommandReport {
            command,
            log_lines: state.log.len().saturating_sub(previous_lines),
            phase: state.phase,
        }
    }

    /// Ends the active unit's turn.
    pub fn advance(&mut self) -> Result<CommandReport> {
        self.submit(Command::EndTurn)
    }

    /// Restores the snapshot before the last accepted command.
    pub fn undo(&mut self) -> Result<()> {
        let previous = self.history.pop_back().ok_or(RuntimeError::NothingToUndo)?;
        self.current = previous;
        self.commands.pop();
        tracing::debug!(history = self.history.len(), "undo");
        Ok(())
    }

    fn enemy_active(&self) -> bool {
        let state = &self.current.state;
        !state.is_terminal()
            && state
                .active_unit()
                .is_some_and(|unit| unit.side == Side::Enemy)
    }

    /// Plays consecutive enemy turns until a squad member is active or the
    /// battle ends, pausing between turns. Returns how many turns ran.
    pub async fn run_enemy_turns(&mut self) -> Result<usize> {
        let mut turns = 0;
        while self.enemy_active() {
            if turns > 0 && !self.config.enemy_turn_delay.is_zero() {
                tokio::time::sleep(self.config.enemy_turn_delay).await;
            }
            let active_before = self.current.state.active.clone();
            self.submit(Command::EnemyTurn)?;
            turns += 1;

            // An enemy with no squad member on the grid stays active.
            if self.current.state.active == active_before && !self.current.state.is_terminal() {
                self.submit(Command::EndTurn)?;
            }
        }
        Ok(turns)
    }

    /// Drives the encounter to a terminal phase, asking `provider` for squad
    /// commands and playing enemy turns in between.
    pub async fn run_to_completion(
        &mut self,
        provider: &dyn ActionProvider,
        max_steps: usize,
    ) -> Result<BattlePhase> {
        for _ in 0..max_steps {
            if self.current.state.is_terminal() {
                return Ok(self.current.state.phase);
            }
            if self.enemy_active() {
                self.run_enemy_turns().await?;
                continue;
            }
            let command = provider.next_command(&self.current.state).await?;
            self.submit(command)?;
        }

        if self.current.state.is_terminal() {
            return Ok(self.current.state.phase);
        }
        Err(RuntimeError::StepLimit { max_steps })
    }

    /// Rendered battle log, one `SLK//TAG :: message` line per entry.
    pub fn log_lines(&self) -> Vec<String> {
        self.current.state.log.lines().collect()
    }

    /// Number of log lines carrying `tag`.
    pub fn count_log(&self, tag: LogTag) -> usize {
        self.current.state.log.count(tag)
    }
}
