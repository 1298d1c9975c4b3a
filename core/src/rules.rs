use serde::{Deserialize, Serialize};

/// Upper bound on wall-layout generation attempts before giving up.
pub const MAX_GENERATION_ATTEMPTS: u32 = 10_000;

pub const SUNSET_PERCENTAGE: u16 = 50;
pub const EVENING_PERCENTAGE: u16 = 70;
pub const CLOSE_TO_MIDNIGHT_PERCENTAGE: u16 = 90;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Number of magic doors that must be opened before the ghost wakes up.
    pub const fn max_door_count(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub const fn ghost_base_probability(self) -> f64 {
        match self {
            Self::Easy => 0.1,
            Self::Medium => 0.15,
            Self::Hard => 0.2,
        }
    }

    pub const fn ghost_probability_increment(self) -> f64 {
        match self {
            Self::Easy | Self::Medium | Self::Hard => 0.05,
        }
    }

    pub const fn moves_until_midnight(self) -> u16 {
        match self {
            Self::Easy => 100,
            Self::Medium => 70,
            Self::Hard => 50,
        }
    }

    pub const fn allow_game_over(self) -> bool {
        match self {
            Self::Easy | Self::Medium => false,
            Self::Hard => true,
        }
    }

    pub const fn hint_detail(self) -> HintDetail {
        match self {
            Self::Easy => HintDetail::Full,
            Self::Medium | Self::Hard => HintDetail::Partial,
        }
    }
}

/// How much of a creature a hint gives away.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintDetail {
    /// Color and creature type
    Full,
    /// Creature type only
    Partial,
}

/// Flavor milestones on the way to midnight. They carry no rule effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    Sunset,
    Evening,
    CloseToMidnight,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 3] = [Self::Sunset, Self::Evening, Self::CloseToMidnight];

    /// Share of the turn limit, in percent.
    pub const fn percentage(self) -> u16 {
        match self {
            Self::Sunset => SUNSET_PERCENTAGE,
            Self::Evening => EVENING_PERCENTAGE,
            Self::CloseToMidnight => CLOSE_TO_MIDNIGHT_PERCENTAGE,
        }
    }
}

/// Rule parameters resolved once per game from the configuration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub difficulty: Difficulty,
    pub door_count: u8,
    pub ghost_base_probability: f64,
    pub ghost_probability_increment: f64,
    pub turn_limit: u16,
    pub allow_game_over: bool,
    pub hint_detail: HintDetail,
}

impl RuleSet {
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            door_count: difficulty.max_door_count(),
            ghost_base_probability: difficulty.ghost_base_probability(),
            ghost_probability_increment: difficulty.ghost_probability_increment(),
            turn_limit: difficulty.moves_until_midnight(),
            allow_game_over: difficulty.allow_game_over(),
            hint_detail: difficulty.hint_detail(),
        }
    }

    pub const fn with_door_count(mut self, door_count: u8) -> Self {
        self.door_count = door_count;
        self
    }

    /// Turn at which `checkpoint` is reached, rounded down.
    pub const fn checkpoint_turn(&self, checkpoint: Checkpoint) -> u16 {
        let turn = self.turn_limit as u32 * checkpoint.percentage() as u32 / 100;
        turn as u16
    }

    /// The checkpoint reached exactly at `total_turns`, if any.
    pub fn checkpoint_at(&self, total_turns: u16) -> Option<Checkpoint> {
        Checkpoint::ALL
            .into_iter()
            .find(|&checkpoint| self.checkpoint_turn(checkpoint) == total_turns)
    }

    pub const fn is_midnight(&self, total_turns: u16) -> bool {
        total_turns >= self.turn_limit
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_counts_follow_difficulty() {
        assert_eq!(Difficulty::Easy.max_door_count(), 1);
        assert_eq!(Difficulty::Medium.max_door_count(), 2);
        assert_eq!(Difficulty::Hard.max_door_count(), 3);
    }

    #[test]
    fn only_hard_allows_game_over() {
        assert!(!RuleSet::for_difficulty(Difficulty::Easy).allow_game_over);
        assert!(!RuleSet::for_difficulty(Difficulty::Medium).allow_game_over);
        assert!(RuleSet::for_difficulty(Difficulty::Hard).allow_game_over);
    }

    #[test]
    fn checkpoints_scale_with_turn_limit() {
        let hard = RuleSet::for_difficulty(Difficulty::Hard);
        assert_eq!(hard.checkpoint_turn(Checkpoint::Sunset), 25);
        assert_eq!(hard.checkpoint_turn(Checkpoint::Evening), 35);
        assert_eq!(hard.checkpoint_turn(Checkpoint::CloseToMidnight), 45);
        assert_eq!(hard.checkpoint_at(35), Some(Checkpoint::Evening));
        assert_eq!(hard.checkpoint_at(36), None);
    }

    #[test]
    fn checkpoints_round_down_exactly() {
        let medium = RuleSet::for_difficulty(Difficulty::Medium);
        assert_eq!(medium.checkpoint_turn(Checkpoint::Sunset), 35);
        assert_eq!(medium.checkpoint_turn(Checkpoint::Evening), 49);
        assert_eq!(medium.checkpoint_turn(Checkpoint::CloseToMidnight), 63);

        let easy = RuleSet::for_difficulty(Difficulty::Easy);
        assert_eq!(easy.checkpoint_turn(Checkpoint::Evening), 70);

        let odd = RuleSet {
            turn_limit: 33,
            ..RuleSet::default()
        };
        assert_eq!(odd.checkpoint_turn(Checkpoint::Sunset), 16);
        assert_eq!(odd.checkpoint_turn(Checkpoint::Evening), 23);
        assert_eq!(odd.checkpoint_turn(Checkpoint::CloseToMidnight), 29);
    }
}
