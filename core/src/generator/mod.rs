use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use spanning::*;

mod spanning;

/// Number of internal lattice edges between orthogonally adjacent tiles.
pub const EDGE_COUNT: usize = 24;

const ROW_EDGES: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize - 1);

pub trait WallGenerator {
    /// Assigns a kind to every internal edge with exactly `door_count` magic doors.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, door_count: u8) -> Result<WallLayout>;
}

/// An internal lattice edge, stored with its endpoints in row-major order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    a: Coord2,
    b: Coord2,
}

impl Edge {
    /// The edge joining `a` and `b`, `None` unless they are orthogonal neighbors on the board.
    pub fn new(a: Coord2, b: Coord2) -> Option<Self> {
        WallId::between(a, b)?;
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Some(Self { a, b })
    }

    /// All internal edges: the ones inside each row first, then the ones between rows.
    pub fn all() -> impl Iterator<Item = Edge> {
        (0..EDGE_COUNT).map(Self::from_index)
    }

    pub fn from_index(index: usize) -> Self {
        let width = usize::from(BOARD_SIZE);
        let (a, b) = if index < ROW_EDGES {
            let row = (index / (width - 1)) as Coord;
            let col = (index % (width - 1)) as Coord;
            ((row, col), (row, col + 1))
        } else {
            let index = index - ROW_EDGES;
            let row = (index / width) as Coord;
            let col = (index % width) as Coord;
            ((row, col), (row + 1, col))
        };
        Self { a, b }
    }

    pub fn index(&self) -> usize {
        let width = usize::from(BOARD_SIZE);
        let (row, col) = (usize::from(self.a.0), usize::from(self.a.1));
        if self.a.0 == self.b.0 {
            row * (width - 1) + col
        } else {
            ROW_EDGES + row * width + col
        }
    }

    pub const fn endpoints(&self) -> (Coord2, Coord2) {
        (self.a, self.b)
    }

    pub const fn nodes(&self) -> (usize, usize) {
        (node_index(self.a), node_index(self.b))
    }

    pub fn wall_id(&self) -> WallId {
        match WallId::between(self.a, self.b) {
            Some(id) => id,
            None => unreachable!("edges always join adjacent tiles"),
        }
    }
}

/// Kind assignment over all internal edges.
///
/// Magic doors are also kept in the order they were placed, the first one
/// being the door hints point at first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallLayout {
    kinds: [WallKind; EDGE_COUNT],
    doors: SmallVec<[Edge; 3]>,
}

impl WallLayout {
    /// Every edge set to `kind`, useful as a starting point for hand-built boards.
    pub fn filled(kind: WallKind) -> Self {
        let doors = if kind == WallKind::MagicDoor {
            Edge::all().collect()
        } else {
            SmallVec::new()
        };
        Self {
            kinds: [kind; EDGE_COUNT],
            doors,
        }
    }

    pub fn with_edge(mut self, edge: Edge, kind: WallKind) -> Self {
        self.set(edge, kind);
        self
    }

    /// Assigns `kind` to `edge`. A new magic door goes to the end of the door order.
    pub fn set(&mut self, edge: Edge, kind: WallKind) {
        let previous = core::mem::replace(&mut self.kinds[edge.index()], kind);
        match (previous == WallKind::MagicDoor, kind == WallKind::MagicDoor) {
            (false, true) => self.doors.push(edge),
            (true, false) => self.doors.retain(|door| *door != edge),
            _ => {}
        }
    }

    pub fn kind(&self, edge: Edge) -> WallKind {
        self.kinds[edge.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Edge, WallKind)> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .map(|(index, &kind)| (Edge::from_index(index), kind))
    }

    pub fn count(&self, kind: WallKind) -> usize {
        self.kinds.iter().filter(|&&k| k == kind).count()
    }

    /// Magic doors in placement order.
    pub fn doors(&self) -> &[Edge] {
        &self.doors
    }

    pub fn is_complete(&self) -> bool {
        self.kinds.iter().all(|&kind| kind != WallKind::None)
    }

    /// Whether `species` can reach every tile, counting magic doors as open.
    pub fn is_connected_for(&self, species: Species, start: Coord2) -> bool {
        connected_count(
            self.iter()
                .filter(|&(_, kind)| kind.passable_for_layout(species))
                .map(|(edge, _)| edge),
            node_index(start),
        ) == TILE_COUNT
    }
}

impl Default for WallLayout {
    fn default() -> Self {
        Self::filled(WallKind::None)
    }
}

/// Size of the component containing `start` in the graph formed by `edges`.
fn connected_count(edges: impl Iterator<Item = Edge>, start: usize) -> usize {
    component(edges, start).iter().filter(|&&inside| inside).count()
}

/// Membership mask of the component containing `start`.
pub(crate) fn component(edges: impl Iterator<Item = Edge>, start: usize) -> [bool; TILE_COUNT] {
    use alloc::collections::VecDeque;

    let mut adjacency: [Vec<usize>; TILE_COUNT] = Default::default();
    for edge in edges {
        let (u, v) = edge.nodes();
        adjacency[u].push(v);
        adjacency[v].push(u);
    }

    let mut visited = [false; TILE_COUNT];
    visited[start] = true;
    let mut to_visit = VecDeque::from([start]);
    while let Some(node) = to_visit.pop_front() {
        for &next in &adjacency[node] {
            if !visited[next] {
                visited[next] = true;
                to_visit.push_back(next);
            }
        }
    }
    visited
}
