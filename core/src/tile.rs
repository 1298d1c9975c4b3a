use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureType {
    Owl,
    Millipede,
    Bat,
    Frog,
}

impl CreatureType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Owl => "owl",
            Self::Millipede => "millipede",
            Self::Bat => "bat",
            Self::Frog => "frog",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureColor {
    White,
    Black,
}

impl CreatureColor {
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// One of the 16 creature tiles on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub row: Coord,
    pub col: Coord,
    pub creature: CreatureType,
    pub color: CreatureColor,
    pub flipped: bool,
}

impl Tile {
    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.color.name(), self.creature.name())
    }
}

/// Creatures of the top half; the bottom half is the same picture turned 180°.
const TOP_HALF: [[CreatureType; 4]; 2] = {
    use CreatureType::*;
    [[Owl, Millipede, Frog, Owl], [Frog, Bat, Bat, Millipede]]
};

/// Builds the fixed creature layout of the board.
pub fn standard_tiles() -> Array2<Tile> {
    let last = usize::from(BOARD_SIZE - 1);
    Array2::from_shape_fn(
        (usize::from(BOARD_SIZE), usize::from(BOARD_SIZE)),
        |(row, col)| {
            let color = if row % 2 == col % 2 {
                CreatureColor::White
            } else {
                CreatureColor::Black
            };
            let flipped = row >= TOP_HALF.len();
            let creature = if flipped {
                TOP_HALF[last - row][last - col]
            } else {
                TOP_HALF[row][col]
            };
            Tile {
                row: row as Coord,
                col: col as Coord,
                creature,
                color,
                flipped,
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_half_mirrors_top_half() {
        let tiles = standard_tiles();
        for (row, col) in iter_tiles().filter(|&(row, _)| row < 2) {
            let top = tiles[(row, col).to_nd_index()];
            let bottom = tiles[(3 - row, 3 - col).to_nd_index()];
            assert_eq!(top.creature, bottom.creature);
            assert!(!top.flipped);
            assert!(bottom.flipped);
        }
    }

    #[test]
    fn corners_are_owls() {
        let tiles = standard_tiles();
        for corner in [(0, 0), (0, 3), (3, 0), (3, 3)] {
            assert_eq!(tiles[corner.to_nd_index()].creature, CreatureType::Owl);
        }
        assert_eq!(tiles[[0, 0]].color, CreatureColor::White);
        assert_eq!(tiles[[0, 3]].color, CreatureColor::Black);
    }

    #[test]
    fn display_names_color_and_creature() {
        let tiles = standard_tiles();
        assert_eq!(alloc::format!("{}", tiles[[1, 1]]), "white_bat");
    }
}
