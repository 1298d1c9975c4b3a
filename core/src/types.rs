use serde::{Deserialize, Serialize};

use crate::*;

/// Single coordinate axis used for tile rows and columns.
pub type Coord = u8;

/// Two-dimensional tile coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Tiles per board side.
pub const BOARD_SIZE: Coord = 4;

/// Wall slots per lattice side, one more than the tiles they separate.
pub const LATTICE_SIZE: Coord = BOARD_SIZE + 1;

/// Total number of creature tiles.
pub const TILE_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Flat node index of a tile, row-major.
pub const fn node_index((row, col): Coord2) -> usize {
    (row as usize) * (BOARD_SIZE as usize) + (col as usize)
}

pub const fn node_coords(index: usize) -> Coord2 {
    (
        (index / BOARD_SIZE as usize) as Coord,
        (index % BOARD_SIZE as usize) as Coord,
    )
}

pub const fn in_bounds((row, col): Coord2) -> bool {
    row < BOARD_SIZE && col < BOARD_SIZE
}

/// Cardinal direction a player can be asked to move in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Resolves a raw `(d_row, d_col)` delta, accepting only unit cardinal steps.
    pub fn from_delta(d_row: i8, d_col: i8) -> Result<Self> {
        match (d_row, d_col) {
            (-1, 0) => Ok(Self::North),
            (1, 0) => Ok(Self::South),
            (0, 1) => Ok(Self::East),
            (0, -1) => Ok(Self::West),
            _ => Err(GameError::InvalidDirection { d_row, d_col }),
        }
    }

    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    /// The tile one step away, if it is still on the board.
    pub fn step(self, coords: Coord2) -> Option<Coord2> {
        apply_delta(coords, self.delta())
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains on the board.
fn apply_delta(coords: Coord2, delta: (i8, i8)) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next = (row.checked_add_signed(d_row)?, col.checked_add_signed(d_col)?);
    in_bounds(next).then_some(next)
}

/// Iterates the (up to 8) on-board tiles surrounding a center tile.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2) -> Self {
        Self { center, index: 0 }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, DISPLACEMENTS[self.index as usize]);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

/// Iterates every tile on the board, row-major.
pub fn iter_tiles() -> impl Iterator<Item = Coord2> {
    (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0)).collect();
        assert_eq!(neighbors, [(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn center_has_eight_neighbors() {
        assert_eq!(NeighborIter::new((1, 2)).count(), 8);
    }

    #[test]
    fn from_delta_rejects_diagonal_and_zero() {
        assert_eq!(Direction::from_delta(0, 1), Ok(Direction::East));
        assert_eq!(
            Direction::from_delta(1, 1),
            Err(GameError::InvalidDirection { d_row: 1, d_col: 1 })
        );
        assert_eq!(
            Direction::from_delta(0, 0),
            Err(GameError::InvalidDirection { d_row: 0, d_col: 0 })
        );
        assert!(Direction::from_delta(0, 2).is_err());
    }

    #[test]
    fn step_off_board_is_none() {
        assert_eq!(Direction::North.step((0, 2)), None);
        assert_eq!(Direction::East.step((1, 3)), None);
        assert_eq!(Direction::South.step((2, 3)), Some((3, 3)));
    }

    #[test]
    fn node_index_round_trips() {
        assert!(iter_tiles().all(|coords| node_coords(node_index(coords)) == coords));
        assert_eq!(node_index((3, 0)), 12);
    }
}
