use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Notifications for the narrator, in the order they happened.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerJoined {
        player: Player,
    },
    /// Registration closed, waiting for someone to start
    SelectingFirstPlayer,
    FirstPlayerSelected {
        player: Player,
    },
    GameStarted {
        first_player: Player,
    },
    TurnStarted {
        player: Player,
        tile: Tile,
    },
    WallAnnounced {
        player: Player,
        tile: Tile,
        kind: WallKind,
        already_known: bool,
    },
    Passed {
        player: Player,
        tile: Tile,
    },
    Blocked {
        player: Player,
    },
    BonusMove {
        player: Player,
    },
    DoorOpened {
        player: Player,
        door: WallId,
        opened: u8,
        required: u8,
    },
    GhostAwakened,
    GhostMoved,
    GhostFoundByOnePlayer {
        player: Player,
    },
    HintGiven {
        requester: Tile,
        hint: Hint,
    },
    PlayerPosition {
        position: PositionHint,
    },
    Clock {
        checkpoint: Checkpoint,
    },
    GameWon,
    GameOver,
}

impl GameEvent {
    /// Whether this door opening woke the ghost.
    pub const fn is_last_door(&self) -> bool {
        matches!(self, Self::DoorOpened { opened, required, .. } if *opened >= *required)
    }
}

/// Events produced by a single request.
pub type Events = SmallVec<[GameEvent; 8]>;

/// Where a player stands, relative to the owl landmark of its quadrant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionHint {
    pub player: Player,
    pub tile: Tile,
    pub landmark: Tile,
    /// Player whose home corner is in the same quadrant
    pub quadrant: Player,
}
