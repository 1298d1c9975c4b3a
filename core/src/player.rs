use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Rabbit,
    Mouse,
}

/// The four fixed player tokens. Each identity exists exactly once per game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    GreenRabbit,
    RedMouse,
    YellowMouse,
    BlueRabbit,
}

impl Player {
    /// Turn order.
    pub const ALL: [Player; 4] = [
        Self::GreenRabbit,
        Self::RedMouse,
        Self::YellowMouse,
        Self::BlueRabbit,
    ];

    pub const fn species(self) -> Species {
        match self {
            Self::GreenRabbit | Self::BlueRabbit => Species::Rabbit,
            Self::RedMouse | Self::YellowMouse => Species::Mouse,
        }
    }

    /// Home corner the token starts on.
    pub const fn start(self) -> Coord2 {
        match self {
            Self::GreenRabbit => (0, 0),
            Self::RedMouse => (0, BOARD_SIZE - 1),
            Self::BlueRabbit => (BOARD_SIZE - 1, 0),
            Self::YellowMouse => (BOARD_SIZE - 1, BOARD_SIZE - 1),
        }
    }

    /// The player whose home corner lies in the quadrant containing `coords`.
    pub const fn quadrant_owner((row, col): Coord2) -> Player {
        let half = BOARD_SIZE / 2;
        match (row < half, col < half) {
            (true, true) => Self::GreenRabbit,
            (true, false) => Self::RedMouse,
            (false, true) => Self::BlueRabbit,
            (false, false) => Self::YellowMouse,
        }
    }

    pub const fn next_in_turn_order(self) -> Player {
        match self {
            Self::GreenRabbit => Self::RedMouse,
            Self::RedMouse => Self::YellowMouse,
            Self::YellowMouse => Self::BlueRabbit,
            Self::BlueRabbit => Self::GreenRabbit,
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GreenRabbit => "green_rabbit",
            Self::RedMouse => "red_mouse",
            Self::YellowMouse => "yellow_mouse",
            Self::BlueRabbit => "blue_rabbit",
        })
    }
}

/// Registered players and where their tokens stand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    positions: [Option<Coord2>; 4],
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `player` on its home corner.
    pub fn add(&mut self, player: Player) -> Result<()> {
        let slot = &mut self.positions[player.slot()];
        if slot.is_some() {
            return Err(GameError::PlayerAlreadyInGame(player));
        }
        *slot = Some(player.start());
        Ok(())
    }

    pub fn contains(&self, player: Player) -> bool {
        self.positions[player.slot()].is_some()
    }

    pub fn position(&self, player: Player) -> Option<Coord2> {
        self.positions[player.slot()]
    }

    pub(crate) fn set_position(&mut self, player: Player, coords: Coord2) {
        debug_assert!(self.contains(player), "moving unregistered {player}");
        self.positions[player.slot()] = Some(coords);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Player, Coord2)> + '_ {
        Player::ALL
            .into_iter()
            .filter_map(|player| Some((player, self.position(player)?)))
    }

    pub fn len(&self) -> usize {
        self.positions.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_species(&self, species: Species) -> bool {
        self.iter().any(|(player, _)| player.species() == species)
    }

    /// Both a rabbit and a mouse have joined.
    pub fn has_both_species(&self) -> bool {
        self.has_species(Species::Rabbit) && self.has_species(Species::Mouse)
    }

    pub fn players_at(&self, coords: Coord2) -> impl Iterator<Item = Player> + '_ {
        self.iter()
            .filter(move |&(_, pos)| pos == coords)
            .map(|(player, _)| player)
    }

    pub fn count_at(&self, coords: Coord2) -> usize {
        self.players_at(coords).count()
    }

    pub fn is_occupied(&self, coords: Coord2) -> bool {
        self.count_at(coords) > 0
    }

    /// Next registered player after `current` in turn order.
    pub fn next_after(&self, current: Player) -> Option<Player> {
        let mut candidate = current.next_in_turn_order();
        for _ in 0..Player::ALL.len() {
            if self.contains(candidate) {
                return Some(candidate);
            }
            candidate = candidate.next_in_turn_order();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_start_in_their_corners() {
        assert_eq!(Player::GreenRabbit.start(), (0, 0));
        assert_eq!(Player::RedMouse.start(), (0, 3));
        assert_eq!(Player::BlueRabbit.start(), (3, 0));
        assert_eq!(Player::YellowMouse.start(), (3, 3));
        for player in Player::ALL {
            assert_eq!(Player::quadrant_owner(player.start()), player);
        }
    }

    #[test]
    fn adding_twice_is_rejected() {
        let mut roster = Roster::new();
        roster.add(Player::RedMouse).unwrap();
        assert_eq!(
            roster.add(Player::RedMouse),
            Err(GameError::PlayerAlreadyInGame(Player::RedMouse))
        );
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn species_check_needs_rabbit_and_mouse() {
        let mut roster = Roster::new();
        roster.add(Player::GreenRabbit).unwrap();
        roster.add(Player::BlueRabbit).unwrap();
        assert!(!roster.has_both_species());
        roster.add(Player::YellowMouse).unwrap();
        assert!(roster.has_both_species());
    }

    #[test]
    fn turn_order_skips_missing_players() {
        let mut roster = Roster::new();
        roster.add(Player::GreenRabbit).unwrap();
        roster.add(Player::YellowMouse).unwrap();
        assert_eq!(roster.next_after(Player::GreenRabbit), Some(Player::YellowMouse));
        assert_eq!(roster.next_after(Player::YellowMouse), Some(Player::GreenRabbit));
        assert_eq!(Roster::new().next_after(Player::RedMouse), None);
    }
}
