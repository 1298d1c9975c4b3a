use serde::Serialize;
use thiserror::Error;

use crate::{GamePhase, Player};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameError {
    #[error("Invalid move direction ({d_row}, {d_col}), only single orthogonal steps are allowed")]
    InvalidDirection { d_row: i8, d_col: i8 },
    #[error("Operation not allowed while {0:?}")]
    WrongPhase(GamePhase),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("At least one rabbit and one mouse are required")]
    SpeciesRequired,
    #[error("First player has not been selected")]
    FirstPlayerNotSelected,
    #[error("{0} is not in the game")]
    PlayerNotInGame(Player),
    #[error("{0} is already in the game")]
    PlayerAlreadyInGame(Player),
    #[error("It is not the turn of {0}")]
    NotPlayersTurn(Player),
    #[error("No hint available")]
    NoHintAvailable,
    #[error("Could not generate a valid wall layout in {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl GameError {
    /// Stable reason code handed to the controller alongside a rejection.
    pub const fn code(&self) -> &'static str {
        use GameError::*;
        match self {
            InvalidDirection { .. } => "invalid_direction",
            WrongPhase(_) => "wrong_phase",
            AlreadyEnded => "already_ended",
            SpeciesRequired => "species_required",
            FirstPlayerNotSelected => "first_player_not_selected",
            PlayerNotInGame(_) => "player_not_in_game",
            PlayerAlreadyInGame(_) => "player_already_in_game",
            NotPlayersTurn(_) => "not_players_turn",
            NoHintAvailable => "no_hint_available",
            GenerationExhausted { .. } => "generation_exhausted",
            InvalidConfig(_) => "invalid_config",
        }
    }

    /// Whether the rejection is an ordinary rule violation the caller may retry.
    pub const fn is_rule_violation(&self) -> bool {
        !matches!(
            self,
            Self::GenerationExhausted { .. } | Self::InvalidConfig(_) | Self::NoHintAvailable
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
