use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - SelectingPlayers -> SelectingFirstPlayer
/// - SelectingFirstPlayer -> PlayingBeforeDoor
/// - PlayingBeforeDoor -> PlayingWithHubi
/// - PlayingWithHubi -> Won
/// - PlayingBeforeDoor | PlayingWithHubi -> GameOver
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Initial state, players are joining
    #[default]
    SelectingPlayers,
    SelectingFirstPlayer,
    /// Looking for the magic doors
    PlayingBeforeDoor,
    /// All doors open, hunting the ghost
    PlayingWithHubi,
    /// Two players cornered the ghost
    Won,
    /// Midnight came first
    GameOver,
}

impl GamePhase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::PlayingBeforeDoor | Self::PlayingWithHubi)
    }

    pub const fn is_hubi_awake(self) -> bool {
        matches!(self, Self::PlayingWithHubi)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::GameOver)
    }
}

/// What the turn clock reported after a turn ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockOutcome {
    Ticking,
    Checkpoint(Checkpoint),
    Midnight,
}

/// Phase plus the counters the rules consult.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    phase: GamePhase,
    opened_doors: u8,
    moves_in_turn: u8,
    total_turns: u16,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn opened_doors(&self) -> u8 {
        self.opened_doors
    }

    pub fn moves_in_turn(&self) -> u8 {
        self.moves_in_turn
    }

    pub fn total_turns(&self) -> u16 {
        self.total_turns
    }

    /// Rejects any request unless the game is in `phase`.
    pub fn expect_phase(&self, phase: GamePhase) -> Result<()> {
        self.check_not_final()?;
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongPhase(self.phase))
        }
    }

    pub fn check_playing(&self) -> Result<()> {
        self.check_not_final()?;
        if self.phase.is_playing() {
            Ok(())
        } else {
            Err(GameError::WrongPhase(self.phase))
        }
    }

    fn check_not_final(&self) -> Result<()> {
        if self.phase.is_final() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    /// Closes registration once at least one rabbit and one mouse joined.
    pub fn select_first_player(&mut self, roster: &Roster) -> Result<()> {
        self.expect_phase(GamePhase::SelectingPlayers)?;
        if !roster.has_both_species() {
            return Err(GameError::SpeciesRequired);
        }
        self.transition(GamePhase::SelectingFirstPlayer);
        Ok(())
    }

    /// Starts play once a registered first player was chosen.
    pub fn start_game(&mut self, first_player: Option<Player>, roster: &Roster) -> Result<()> {
        self.expect_phase(GamePhase::SelectingFirstPlayer)?;
        match first_player {
            None => Err(GameError::FirstPlayerNotSelected),
            Some(player) if !roster.contains(player) => Err(GameError::PlayerNotInGame(player)),
            Some(_) => {
                self.transition(GamePhase::PlayingBeforeDoor);
                Ok(())
            }
        }
    }

    /// Counts an opened door, returns true when it was the last one required and the ghost wakes up.
    pub fn door_opened(&mut self, required: u8) -> bool {
        self.opened_doors = self.opened_doors.saturating_add(1);
        if self.phase == GamePhase::PlayingBeforeDoor && self.opened_doors >= required {
            self.transition(GamePhase::PlayingWithHubi);
            true
        } else {
            false
        }
    }

    /// Two or more players on the ghost's tile win the game.
    pub fn check_win_condition(&mut self, players_on_ghost: usize) -> bool {
        if self.phase == GamePhase::PlayingWithHubi && players_on_ghost >= 2 {
            self.transition(GamePhase::Won);
            true
        } else {
            false
        }
    }

    /// Counts a move against an already known wall, returns true when it earns the bonus move.
    pub fn record_known_wall_move(&mut self) -> bool {
        self.moves_in_turn = self.moves_in_turn.saturating_add(1);
        self.moves_in_turn == 1
    }

    /// Hands the turn over without touching the clock.
    pub fn pass_turn(&mut self) {
        self.moves_in_turn = 0;
    }

    /// Ends the current turn and runs the clock.
    pub fn end_turn(&mut self, rules: &RuleSet) -> ClockOutcome {
        self.pass_turn();
        self.total_turns = self.total_turns.saturating_add(1);
        self.check_game_over_condition(rules)
    }

    pub fn check_game_over_condition(&mut self, rules: &RuleSet) -> ClockOutcome {
        if !self.phase.is_playing() {
            return ClockOutcome::Ticking;
        }
        if rules.allow_game_over && rules.is_midnight(self.total_turns) {
            self.transition(GamePhase::GameOver);
            return ClockOutcome::Midnight;
        }
        match rules.checkpoint_at(self.total_turns) {
            Some(checkpoint) => ClockOutcome::Checkpoint(checkpoint),
            None => ClockOutcome::Ticking,
        }
    }

    fn transition(&mut self, next: GamePhase) {
        log::debug!("Game phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
