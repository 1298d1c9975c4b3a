use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Creature tiles plus the horizontal and vertical wall lattices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
    horizontal_walls: Array2<Wall>,
    vertical_walls: Array2<Wall>,
    magic_doors: Vec<WallId>,
}

impl Board {
    /// Standard tiles with untyped internal walls.
    pub fn empty() -> Self {
        let lattice = (usize::from(LATTICE_SIZE), usize::from(LATTICE_SIZE));
        let make = |orientation| {
            Array2::from_shape_fn(lattice, move |(row, col)| {
                Wall::new(WallId::new(orientation, row as Coord, col as Coord))
            })
        };
        Self {
            tiles: standard_tiles(),
            horizontal_walls: make(Orientation::Horizontal),
            vertical_walls: make(Orientation::Vertical),
            magic_doors: Vec::new(),
        }
    }

    /// Generates a fresh layout and builds the board around it.
    pub fn generate<G, R>(generator: &G, rng: &mut R, door_count: u8) -> Result<Self>
    where
        G: WallGenerator,
        R: rand::Rng + ?Sized,
    {
        let layout = generator.generate(rng, door_count)?;
        Self::from_layout(&layout)
    }

    /// Builds the board for a layout that types every internal edge.
    pub fn from_layout(layout: &WallLayout) -> Result<Self> {
        if !layout.is_complete() {
            return Err(GameError::InvalidConfig("layout leaves internal walls untyped"));
        }
        let mut board = Self::empty();
        for (edge, kind) in layout.iter() {
            board[edge.wall_id()].assign(kind);
        }
        board.magic_doors = layout.doors().iter().map(Edge::wall_id).collect();
        Ok(board)
    }

    /// Whether every internal wall has a kind.
    pub fn is_complete(&self) -> bool {
        self.internal_walls().all(|wall| wall.kind() != WallKind::None)
    }

    pub fn tile(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.horizontal_walls
            .iter()
            .chain(self.vertical_walls.iter())
    }

    pub fn internal_walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls().filter(|wall| !wall.is_external())
    }

    pub fn horizontal_walls(&self) -> &Array2<Wall> {
        &self.horizontal_walls
    }

    pub fn vertical_walls(&self) -> &Array2<Wall> {
        &self.vertical_walls
    }

    /// Magic doors in placement order, the primary door first.
    pub fn magic_doors(&self) -> &[WallId] {
        &self.magic_doors
    }

    pub fn first_closed_door(&self) -> Option<WallId> {
        self.magic_doors
            .iter()
            .copied()
            .find(|&id| !self[id].is_open())
    }

    pub fn open_door_count(&self) -> usize {
        self.magic_doors
            .iter()
            .filter(|&&id| self[id].is_open())
            .count()
    }

    /// The wall crossed when stepping from `coords` towards `direction`.
    pub fn wall_towards(&self, coords: Coord2, direction: Direction) -> &Wall {
        &self[WallId::towards(coords, direction)]
    }

    pub fn wall_between(&self, a: Coord2, b: Coord2) -> Option<&Wall> {
        WallId::between(a, b).map(|id| &self[id])
    }

    /// The two tiles on either side of an internal wall.
    pub fn tiles_on_both_sides(&self, id: WallId) -> Option<(Tile, Tile)> {
        let (a, b) = id.flanking_tiles()?;
        Some((self.tile(a), self.tile(b)))
    }

    /// Tiles reachable from `start` for `species` with the current open state of doors.
    pub fn reachable_from(&self, start: Coord2, species: Species) -> Vec<Coord2> {
        use alloc::collections::VecDeque;

        let mut visited = [false; TILE_COUNT];
        let mut reached = Vec::new();
        let mut to_visit = VecDeque::from([start]);
        visited[node_index(start)] = true;

        while let Some(coords) = to_visit.pop_front() {
            reached.push(coords);
            for direction in Direction::ALL {
                let Some(next) = direction.step(coords) else {
                    continue;
                };
                if visited[node_index(next)] {
                    continue;
                }
                let wall = self.wall_towards(coords, direction);
                if wall.kind() != WallKind::None && wall.can_pass(species) {
                    visited[node_index(next)] = true;
                    to_visit.push_back(next);
                }
            }
        }
        reached
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<WallId> for Board {
    type Output = Wall;

    fn index(&self, id: WallId) -> &Self::Output {
        let index = (id.row, id.col).to_nd_index();
        match id.orientation {
            Orientation::Horizontal => &self.horizontal_walls[index],
            Orientation::Vertical => &self.vertical_walls[index],
        }
    }
}

impl IndexMut<WallId> for Board {
    fn index_mut(&mut self, id: WallId) -> &mut Self::Output {
        let index = (id.row, id.col).to_nd_index();
        match id.orientation {
            Orientation::Horizontal => &mut self.horizontal_walls[index],
            Orientation::Vertical => &mut self.vertical_walls[index],
        }
    }
}
