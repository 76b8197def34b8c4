//! Frame-driven game facade
//!
//! Owns one run plus the persisted best score. Hosts feed decoded intents
//! in, call [`Game::tick`] once per frame and render the returned snapshot.

use crate::highscores::BestScore;
use crate::platform::Storage;
use crate::settings::{DifficultyTier, Settings};
use crate::sim::{GamePhase, GameState, Intent, PlayerHud, Snapshot, TickInput, tick};

pub struct Game {
    state: GameState,
    input: TickInput,
    storage: Storage,
    best: BestScore,
    last_phase: GamePhase,
}

impl Game {
    /// Start a run against the platform's default storage
    pub fn initialize(settings: &Settings, seed: u64) -> Self {
        Self::with_storage(settings, seed, Storage::open())
    }

    /// Start a run with an explicit store for the best score
    pub fn with_storage(settings: &Settings, seed: u64, storage: Storage) -> Self {
        let best = BestScore::load(&storage);
        let state = GameState::new(seed, settings, best.score);
        Self::from_parts(state, storage, best)
    }

    /// Idle menu backdrop; no players, lanes scroll by on their own
    pub fn preview(seed: u64, difficulty: DifficultyTier, storage: Storage) -> Self {
        let best = BestScore::load(&storage);
        let mut state = GameState::preview(seed, difficulty);
        state.high_score = best.score;
        Self::from_parts(state, storage, best)
    }

    fn from_parts(state: GameState, storage: Storage, best: BestScore) -> Self {
        let last_phase = state.phase;
        Self {
            state,
            input: TickInput::default(),
            storage,
            best,
            last_phase,
        }
    }

    /// Replace the current run with a fresh one, keeping the best score
    pub fn restart(&mut self, settings: &Settings, seed: u64) {
        self.state = GameState::new(seed, settings, self.best.score);
        self.input.clear();
        self.last_phase = self.state.phase;
    }

    /// Queue an intent for the next tick. Unknown players are ignored.
    pub fn submit_intent(&mut self, player: usize, intent: Intent) -> bool {
        if player >= self.state.players.len() {
            return false;
        }
        self.input.submit(player, intent)
    }

    /// Advance one step and return what a renderer needs
    pub fn tick(&mut self) -> Snapshot<'_> {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);

        let phase = self.state.phase;
        if phase != self.last_phase {
            if phase == GamePhase::GameOver {
                self.finish_run();
            }
            self.last_phase = phase;
        }
        self.state.snapshot()
    }

    fn finish_run(&mut self) {
        if !self.best.record(self.state.score) {
            return;
        }
        if let Err(err) = self.best.save(&self.storage) {
            log::warn!("Could not save best score: {}", err);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn hud(&self, player: usize) -> Option<PlayerHud> {
        self.state.hud(player)
    }

    pub fn best_score(&self) -> u64 {
        self.best.score
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::settings::GameMode;
    use crate::sim::Direction;
    use crate::sim::hazard::take_damage;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lane_hopper_game_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_unknown_player_intent_is_ignored() {
        let dir = scratch_dir("intent");
        let mut game = Game::with_storage(&Settings::default(), 3, Storage::in_dir(&dir));
        assert!(!game.submit_intent(1, Intent::Shoot));
        assert!(game.submit_intent(0, Intent::Move(Direction::Up)));

        let coop = Settings::new(GameMode::Coop, DifficultyTier::Normal);
        let mut game = Game::with_storage(&coop, 3, Storage::in_dir(&dir));
        assert!(game.submit_intent(1, Intent::Shoot));
        assert!(!game.submit_intent(2, Intent::Shoot));
    }

    #[test]
    fn test_intent_is_consumed_by_one_tick() {
        let dir = scratch_dir("consume");
        let mut game = Game::with_storage(&Settings::default(), 3, Storage::in_dir(&dir));
        game.submit_intent(0, Intent::Shoot);
        game.tick();
        assert_eq!(game.input.intents, [None, None]);
    }

    #[test]
    fn test_game_over_saves_new_best() {
        let dir = scratch_dir("best");
        let storage = Storage::in_dir(&dir);
        let mut game = Game::with_storage(&Settings::default(), 9, storage.clone());
        assert_eq!(game.best_score(), 0);

        game.state.score = 12;
        take_damage(&mut game.state, 0);
        let phase = game.tick().phase;
        assert_eq!(phase, GamePhase::GameOver);
        assert_eq!(game.best_score(), 12);

        let next = Game::with_storage(&Settings::default(), 10, storage);
        assert_eq!(next.best_score(), 12);
        assert_eq!(next.state().high_score, 12);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let dir = scratch_dir("lower");
        let storage = Storage::in_dir(&dir);
        BestScore::new(30).save(&storage).unwrap();

        let mut game = Game::with_storage(&Settings::default(), 9, storage.clone());
        game.state.score = 4;
        take_damage(&mut game.state, 0);
        game.tick();
        assert_eq!(game.best_score(), 30);
        assert_eq!(BestScore::load(&storage).score, 30);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_restart_keeps_best() {
        let dir = scratch_dir("restart");
        let mut game = Game::with_storage(&Settings::default(), 9, Storage::in_dir(&dir));
        game.state.score = 5;
        take_damage(&mut game.state, 0);
        game.tick();

        game.restart(&Settings::default(), 11);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().high_score, 5);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_preview_has_no_players() {
        let dir = scratch_dir("preview");
        let mut game = Game::preview(1, DifficultyTier::Normal, Storage::in_dir(&dir));
        assert!(!game.submit_intent(0, Intent::Shoot));
        let snapshot = game.tick();
        assert_eq!(snapshot.phase, GamePhase::Menu);
        assert!(snapshot.players.is_empty());
    }
}
