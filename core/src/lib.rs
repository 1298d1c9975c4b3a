#![no_std]

extern crate alloc;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use command::*;
pub use engine::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use ghost::*;
pub use hint::*;
pub use player::*;
pub use rules::*;
pub use state::*;
pub use tile::*;
pub use types::*;
pub use wall::*;

mod board;
mod command;
mod engine;
mod error;
mod event;
mod generator;
mod ghost;
mod hint;
mod player;
mod rules;
mod state;
mod tile;
mod types;
mod wall;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// Draw the number of doors to open instead of using the difficulty maximum
    pub random_door_count: bool,
    pub max_generation_attempts: u32,
}

impl GameConfig {
    pub const fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            random_door_count: false,
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }

    pub fn from_json(json: &str) -> core::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_generation_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "max_generation_attempts must be positive",
            ));
        }
        Ok(())
    }

    /// Rules for the configured difficulty, with the maximum number of doors.
    pub const fn rules(&self) -> RuleSet {
        RuleSet::for_difficulty(self.difficulty)
    }

    /// Rules for one game, drawing the door count when it is randomized.
    pub fn resolve_rules<R: Rng + ?Sized>(&self, rng: &mut R) -> RuleSet {
        let rules = self.rules();
        if !self.random_door_count {
            return rules;
        }
        let door_count = rng.random_range(1..=self.difficulty.max_door_count());
        log::debug!("Random door count: {}", door_count);
        rules.with_door_count(door_count)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Blocked,
    Passed,
    Won,
    GameOver,
}

impl MoveOutcome {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::GameOver)
    }
}

/// What a single move did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveReport {
    pub outcome: MoveOutcome,
    /// False when the move was the free bonus move and the player goes again
    pub turn_ended: bool,
    pub events: Events,
}

impl MoveReport {
    pub(crate) fn finished(outcome: MoveOutcome, events: Events) -> Self {
        Self {
            outcome,
            turn_ended: true,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = GameConfig::from_json(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert!(!config.random_door_count);
        assert_eq!(config.max_generation_attempts, MAX_GENERATION_ATTEMPTS);
        assert_eq!(config.rules().door_count, 3);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let config = GameConfig {
            max_generation_attempts: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
        let rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            Game::new(&config, rng),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn random_door_count_stays_in_range() {
        let config = GameConfig {
            random_door_count: true,
            ..GameConfig::new(Difficulty::Hard)
        };
        let mut rng = SmallRng::seed_from_u64(8);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let doors = config.resolve_rules(&mut rng).door_count;
            assert!((1..=3).contains(&doors));
            seen[doors as usize] = true;
        }
        assert_eq!(seen, [false, true, true, true]);
    }

    #[test]
    fn generated_game_matches_configured_doors() {
        for difficulty in Difficulty::ALL {
            let game = Game::new(&GameConfig::new(difficulty), SmallRng::seed_from_u64(11)).unwrap();
            assert_eq!(
                game.board().magic_doors().len(),
                usize::from(difficulty.max_door_count())
            );
            assert_eq!(game.rules().door_count, difficulty.max_door_count());
        }
    }
}
