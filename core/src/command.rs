use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// A request from the voice front end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    AddPlayer { player: Player },
    AdvanceSetup,
    SetFirstPlayer { player: Player },
    Move { direction: Direction },
    /// Raw row/column delta as recognized by the front end
    MoveBy { d_row: i8, d_col: i8 },
    Hint,
    PlayerPosition { player: Player },
    /// Pass without moving, giving up a pending bonus move
    EndTurn,
}

/// Outcome of a command plus what the table may see afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response {
    pub result: core::result::Result<Events, GameError>,
    pub snapshot: Snapshot,
}

/// A wall as the table knows it once revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedWall {
    pub kind: WallKind,
    /// Only ever true for opened magic doors
    pub is_open: bool,
}

/// Public view of a game. Hidden wall kinds and the ghost never appear here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub current_player: Option<Player>,
    pub previous_player: Option<Player>,
    pub players: SmallVec<[(Player, Coord2); 4]>,
    /// Revealed walls with their door state, indexed like the board's lattices
    pub horizontal_walls: Array2<Option<RevealedWall>>,
    pub vertical_walls: Array2<Option<RevealedWall>>,
    pub open_doors: u8,
    pub required_doors: u8,
    pub moves_in_turn: u8,
    pub total_turns: u16,
    pub turn_limit: u16,
}

impl Snapshot {
    pub fn from_game<R: Rng>(game: &Game<R>) -> Self {
        let state = game.state();
        Self {
            phase: state.phase(),
            current_player: game.current_player(),
            previous_player: game.previous_player(),
            players: game.roster().iter().collect(),
            horizontal_walls: revealed_kinds(game.board().horizontal_walls()),
            vertical_walls: revealed_kinds(game.board().vertical_walls()),
            open_doors: state.opened_doors(),
            required_doors: game.rules().door_count,
            moves_in_turn: state.moves_in_turn(),
            total_turns: state.total_turns(),
            turn_limit: game.rules().turn_limit,
        }
    }

    /// The revealed state of a wall, `None` while still unknown.
    pub fn wall(&self, id: WallId) -> Option<RevealedWall> {
        let lattice = match id.orientation {
            Orientation::Horizontal => &self.horizontal_walls,
            Orientation::Vertical => &self.vertical_walls,
        };
        lattice[(id.row as usize, id.col as usize)]
    }

    pub fn wall_kind(&self, id: WallId) -> Option<WallKind> {
        self.wall(id).map(|wall| wall.kind)
    }

    pub fn position(&self, player: Player) -> Option<Coord2> {
        self.players
            .iter()
            .find(|(candidate, _)| *candidate == player)
            .map(|&(_, coords)| coords)
    }
}

fn revealed_kinds(walls: &Array2<Wall>) -> Array2<Option<RevealedWall>> {
    walls.map(|wall| {
        wall.is_revealed().then_some(RevealedWall {
            kind: wall.kind(),
            is_open: wall.is_open(),
        })
    })
}

impl<R: Rng> Game<R> {
    /// Dispatches one front-end command and reports the resulting public state.
    pub fn apply(&mut self, command: Command) -> Response {
        let result = match command {
            Command::AddPlayer { player } => self.add_player(player),
            Command::AdvanceSetup => self.advance_setup(),
            Command::SetFirstPlayer { player } => self.set_first_player(player),
            Command::Move { direction } => self
                .move_current_player(direction)
                .map(|report| report.events),
            Command::MoveBy { d_row, d_col } => self
                .move_by_delta(d_row, d_col)
                .map(|report| report.events),
            Command::Hint => self.give_hint(),
            Command::PlayerPosition { player } => self.player_position(player),
            Command::EndTurn => self.end_current_turn(),
        };
        match &result {
            Err(err) if err.is_rule_violation() => log::debug!("Rejected {:?}: {}", command, err),
            Err(err) => log::warn!("{:?} failed: {}", command, err),
            Ok(_) => {}
        }
        Response {
            result,
            snapshot: Snapshot::from_game(self),
        }
    }
}
