//! Game settings and preferences
//!
//! Persisted separately from the best score through platform storage.

use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::platform;
use crate::sim::player::{Breed, Cosmetic};

/// Difficulty tiers selectable at game start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyTier {
    #[default]
    Normal,
    Impossible,
    ImpossibleX2,
    ChuckNorris,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Normal => "Normal",
            DifficultyTier::Impossible => "Impossible",
            DifficultyTier::ImpossibleX2 => "Impossible x2",
            DifficultyTier::ChuckNorris => "Chuck Norris",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "normal" => Some(DifficultyTier::Normal),
            "impossible" => Some(DifficultyTier::Impossible),
            "impossiblex2" => Some(DifficultyTier::ImpossibleX2),
            "chucknorris" | "chuck" => Some(DifficultyTier::ChuckNorris),
            _ => None,
        }
    }

    /// Scales both the distance difficulty curve and mover speed growth
    pub fn multiplier(&self) -> f32 {
        match self {
            DifficultyTier::Normal => 1.0,
            DifficultyTier::Impossible => 2.5,
            DifficultyTier::ImpossibleX2 => 5.0,
            DifficultyTier::ChuckNorris => 10.0,
        }
    }
}

/// Single player or two-player co-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    Single,
    Coop,
}

impl GameMode {
    pub fn player_count(&self) -> usize {
        match self {
            GameMode::Single => 1,
            GameMode::Coop => 2,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub mode: GameMode,
    pub difficulty: DifficultyTier,

    // === Presentation only ===
    pub breed: Breed,
    pub cosmetic: Cosmetic,
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "lane_hopper_settings";

    /// Settings envelope version
    const VERSION: u32 = 1;

    pub fn new(mode: GameMode, difficulty: DifficultyTier) -> Self {
        Self {
            mode,
            difficulty,
            ..Self::default()
        }
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(settings)) => {
                log::info!("Loaded settings ({:?}, {})", settings.mode, settings.difficulty.as_str());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring unreadable settings: {}", err);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Option<Self>, persistence::PersistenceError> {
        match platform::get_item(Self::STORAGE_KEY)? {
            Some(json) => Ok(Some(persistence::decode(&json, Self::VERSION)?)),
            None => Ok(None),
        }
    }

    /// Save settings
    pub fn save(&self) -> Result<(), persistence::PersistenceError> {
        let json = persistence::encode(self, Self::VERSION)?;
        platform::set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
