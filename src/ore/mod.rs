//! Ore Idle: an incremental mining game engine.
//!
//! The economy itself lives in pure functions over [`GameState`]. [`Session`]
//! wraps one game with what a host needs around it: the clock, auto-sell
//! timers, debounced saves and the storage backend.

pub mod actions;
pub mod autosell;
pub mod logic;
pub mod milestone;
pub mod prestige;
pub mod save;
pub mod state;
pub mod unlock;
pub mod upgrade;

#[cfg(test)]
mod simulator;

use crate::config::EngineConfig;
use crate::error::{CommandError, EconomyError, PrestigeError, SaveError, StorageError};
use crate::storage::KeyValueStore;
use crate::time::{Clock, FrameClock};

use actions::Command;
use autosell::{AutoSale, AutoSellScheduler};
use logic::{BuyQuantity, Purchase};
use prestige::{CoreUpgradeKind, PrestigeOutcome};
use save::LoadOutcome;
use state::{GameState, ResourceId};
use upgrade::UpgradeId;

/// Result of a successfully dispatched [`Command`].
#[derive(Clone, Debug, PartialEq)]
pub enum CommandOutcome {
    Mined(f64),
    Sold(f64),
    Bought(Purchase),
    Unlocked(ResourceId),
    AutoSellToggled { resource: ResourceId, enabled: bool },
    Prestiged(PrestigeOutcome),
    CoreUpgraded { kind: CoreUpgradeKind, level: u32 },
    Saved,
}

/// Collapses bursts of save requests into one write.
#[derive(Debug, Default)]
struct SaveDebouncer {
    /// Monotonic time of the oldest unsaved request.
    dirty_since_ms: Option<f64>,
    since_autosave_secs: f64,
}

impl SaveDebouncer {
    fn request(&mut self, now_ms: f64) {
        self.dirty_since_ms.get_or_insert(now_ms);
    }

    fn is_dirty(&self) -> bool {
        self.dirty_since_ms.is_some()
    }

    fn debounce_elapsed(&self, now_ms: f64, debounce_secs: f64) -> bool {
        self.dirty_since_ms
            .is_some_and(|since| now_ms - since >= debounce_secs * 1000.0)
    }

    /// Count play time towards the periodic autosave.
    fn autosave_due(&mut self, elapsed_secs: f64, interval_secs: f64) -> bool {
        self.since_autosave_secs += elapsed_secs;
        self.since_autosave_secs >= interval_secs
    }

    fn clear(&mut self) {
        self.dirty_since_ms = None;
        self.since_autosave_secs = 0.0;
    }

    /// A write failed: keep the changes pending and try again one debounce
    /// window from now.
    fn retry_later(&mut self, now_ms: f64) {
        self.dirty_since_ms = Some(now_ms);
        self.since_autosave_secs = 0.0;
    }
}

/// One running game.
pub struct Session {
    config: EngineConfig,
    state: GameState,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    frame_clock: FrameClock,
    auto_sell: AutoSellScheduler,
    saver: SaveDebouncer,
    /// Set once the store reports it cannot be used. Automatic saves stop
    /// until an explicit save succeeds.
    storage_unavailable: bool,
    running: bool,
}

impl Session {
    /// A fresh game that is not running yet. Call [`Session::start`] to
    /// restore the last save and begin production.
    pub fn new(config: EngineConfig, store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            state: GameState::new(),
            store,
            clock,
            frame_clock: FrameClock::new(),
            auto_sell: AutoSellScheduler::new(),
            saver: SaveDebouncer::default(),
            storage_unavailable: false,
            running: false,
        }
    }

    /// Load the saved game (with offline catch-up) and start running.
    /// A storage failure is logged and the game starts fresh in memory.
    pub fn start(&mut self) -> LoadOutcome {
        let outcome = match self.load() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("could not read save, starting a new game: {e}");
                if e == StorageError::Unavailable {
                    self.storage_unavailable = true;
                }
                LoadOutcome::NoSave
            }
        };
        self.resume();
        outcome
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn auto_sell(&self) -> &AutoSellScheduler {
        &self.auto_sell
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a save has been requested but not written yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.saver.is_dirty()
    }

    fn request_save(&mut self) {
        let now = self.clock.monotonic_ms();
        self.saver.request(now);
    }

    fn sync_auto_sell(&mut self) {
        if self.running {
            self.auto_sell.sync(&self.state);
        }
    }

    pub fn mine(&mut self, id: ResourceId) -> Result<f64, EconomyError> {
        let gained = logic::mine(&mut self.state, id)?;
        self.request_save();
        Ok(gained)
    }

    pub fn sell(&mut self, id: ResourceId) -> Result<f64, EconomyError> {
        let cash = logic::sell(&mut self.state, id, false)?;
        self.request_save();
        Ok(cash)
    }

    pub fn buy_upgrade(
        &mut self,
        id: UpgradeId,
        quantity: BuyQuantity,
    ) -> Result<Purchase, EconomyError> {
        let purchase = logic::buy_upgrade(&mut self.state, id, quantity)?;
        self.sync_auto_sell();
        self.request_save();
        Ok(purchase)
    }

    pub fn attempt_unlock(&mut self, id: ResourceId) -> Result<(), EconomyError> {
        logic::attempt_unlock(&mut self.state, id)?;
        self.sync_auto_sell();
        self.request_save();
        Ok(())
    }

    /// Switch a tier's auto-seller on or off. Setting the current value
    /// again changes nothing.
    pub fn toggle_auto_sell(&mut self, id: ResourceId, enabled: bool) {
        if self.state.auto_sell_enabled[id.index()] == enabled {
            return;
        }
        logic::toggle_auto_sell(&mut self.state, id, enabled);
        self.sync_auto_sell();
        self.request_save();
    }

    /// Prestige and write the new epoch immediately.
    pub fn prestige(&mut self) -> Result<PrestigeOutcome, PrestigeError> {
        let outcome = prestige::prestige(&mut self.state, self.config.prestige.min_reward)?;
        self.auto_sell.stop_all();
        self.sync_auto_sell();
        self.flush();
        Ok(outcome)
    }

    pub fn purchase_core_upgrade(&mut self, kind: CoreUpgradeKind) -> Result<u32, PrestigeError> {
        let level = prestige::purchase_core_upgrade(&mut self.state, kind)?;
        self.request_save();
        Ok(level)
    }

    /// Write the game now.
    pub fn save(&mut self) -> Result<(), SaveError> {
        let now = self.clock.unix_ms();
        save::save_game(&self.state, self.store.as_mut(), &self.config.save, now)?;
        self.saver.clear();
        self.storage_unavailable = false;
        log::debug!("game saved");
        Ok(())
    }

    /// Save, logging instead of failing. The game keeps running in memory.
    fn flush(&mut self) {
        match self.save() {
            Ok(()) => {}
            Err(SaveError::Storage(StorageError::Unavailable)) => {
                if !self.storage_unavailable {
                    log::warn!("storage unavailable, autosave paused");
                }
                self.storage_unavailable = true;
            }
            Err(e) => {
                log::warn!("save failed: {e}");
                let now = self.clock.monotonic_ms();
                self.saver.retry_later(now);
            }
        }
    }

    /// Replace the current game with the stored one. The in-memory game is
    /// kept when there is no usable save.
    pub fn load(&mut self) -> Result<LoadOutcome, StorageError> {
        let now = self.clock.unix_ms();
        let outcome = save::load_game(
            &mut self.state,
            self.store.as_mut(),
            &self.config.save,
            &self.config.offline,
            now,
        )?;
        if outcome.restored() {
            self.auto_sell.stop_all();
            self.sync_auto_sell();
            self.saver.clear();
        }
        Ok(outcome)
    }

    /// Throw away the current game and its save.
    pub fn new_game(&mut self) {
        self.auto_sell.stop_all();
        self.state = GameState::new();
        self.saver.clear();
        if let Err(e) = save::delete_save(self.store.as_mut(), &self.config.save) {
            log::warn!("could not delete save: {e}");
        }
        self.sync_auto_sell();
        log::info!("new game");
    }

    /// Advance the game to the clock's current time. Returns the auto-sell
    /// sales that fired. Does nothing while suspended.
    pub fn tick(&mut self) -> Vec<AutoSale> {
        if !self.running {
            return Vec::new();
        }
        let now = self.clock.monotonic_ms();
        let elapsed_secs = self.frame_clock.update(now);
        if elapsed_secs <= 0.0 {
            return Vec::new();
        }

        logic::produce_all(&mut self.state, elapsed_secs);
        let sales = self.auto_sell.tick(&mut self.state, elapsed_secs);
        if !sales.is_empty() {
            self.saver.request(now);
        }

        let autosave = self
            .saver
            .autosave_due(elapsed_secs, self.config.save.autosave_interval_secs);
        let due = autosave || self.saver.debounce_elapsed(now, self.config.save.debounce_secs);
        if due && !self.storage_unavailable {
            self.flush();
        }
        sales
    }

    /// Stop production and every auto-sell timer, and flush the save
    /// (e.g. the player went back to the menu).
    pub fn suspend(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.auto_sell.stop_all();
        self.frame_clock.reset();
        self.flush();
    }

    /// Start producing again from now. Timers are rebuilt from the game
    /// state, so time spent suspended is not paid out.
    pub fn resume(&mut self) {
        self.running = true;
        self.frame_clock.reset();
        self.frame_clock.update(self.clock.monotonic_ms());
        self.auto_sell.stop_all();
        self.auto_sell.sync(&self.state);
    }

    /// Final save before the host goes away. Hands back the store.
    pub fn shutdown(mut self) -> Box<dyn KeyValueStore> {
        self.suspend();
        if self.saver.is_dirty() {
            self.flush();
        }
        self.store
    }

    /// Run a player command.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        let outcome = match command {
            Command::Mine(id) => CommandOutcome::Mined(self.mine(id)?),
            Command::Sell(id) => CommandOutcome::Sold(self.sell(id)?),
            Command::BuyUpgrade(id, quantity) => {
                CommandOutcome::Bought(self.buy_upgrade(id, quantity)?)
            }
            Command::Unlock(id) => {
                self.attempt_unlock(id)?;
                CommandOutcome::Unlocked(id)
            }
            Command::ToggleAutoSell(id, enabled) => {
                self.toggle_auto_sell(id, enabled);
                CommandOutcome::AutoSellToggled { resource: id, enabled }
            }
            Command::Prestige => CommandOutcome::Prestiged(self.prestige()?),
            Command::BuyCore(kind) => CommandOutcome::CoreUpgraded {
                kind,
                level: self.purchase_core_upgrade(kind)?,
            },
            Command::Save => {
                self.save()?;
                CommandOutcome::Saved
            }
        };
        Ok(outcome)
    }
}
