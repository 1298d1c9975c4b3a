use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallKind {
    /// Not assigned yet, never present on a generated board
    #[default]
    None,
    MouseHole,
    RabbitWindow,
    Wall,
    FreePassage,
    MagicDoor,
}

impl WallKind {
    /// Whether `species` may cross a wall of this kind in the given open state.
    pub fn can_pass(self, is_open: bool, species: Species) -> bool {
        match self {
            Self::Wall => false,
            Self::FreePassage => true,
            Self::MouseHole => species == Species::Mouse,
            Self::RabbitWindow => species == Species::Rabbit,
            Self::MagicDoor => is_open,
            Self::None => {
                log::error!("Untyped wall reached by a {:?}", species);
                debug_assert!(false, "untyped wall after generation");
                false
            }
        }
    }

    /// Passability used while validating a layout: doors count as open.
    pub const fn passable_for_layout(self, species: Species) -> bool {
        match self {
            Self::FreePassage | Self::MagicDoor => true,
            Self::RabbitWindow => matches!(species, Species::Rabbit),
            Self::MouseHole => matches!(species, Species::Mouse),
            Self::Wall | Self::None => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Lies above tile `(row, col)`
    Horizontal,
    /// Lies left of tile `(row, col)`
    Vertical,
}

/// Address of a wall slot in one of the two 5×5 lattices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId {
    pub orientation: Orientation,
    pub row: Coord,
    pub col: Coord,
}

impl WallId {
    pub const fn new(orientation: Orientation, row: Coord, col: Coord) -> Self {
        Self {
            orientation,
            row,
            col,
        }
    }

    /// The wall crossed when leaving `coords` towards `direction`.
    pub const fn towards(coords: Coord2, direction: Direction) -> Self {
        let (row, col) = coords;
        match direction {
            Direction::North => Self::new(Orientation::Horizontal, row, col),
            Direction::South => Self::new(Orientation::Horizontal, row + 1, col),
            Direction::West => Self::new(Orientation::Vertical, row, col),
            Direction::East => Self::new(Orientation::Vertical, row, col + 1),
        }
    }

    /// Slots on the board perimeter, plus the unused lattice slots that touch no tile.
    pub const fn is_external(&self) -> bool {
        let last = LATTICE_SIZE - 1;
        match self.orientation {
            Orientation::Horizontal => self.row == 0 || self.row == last || self.col == last,
            Orientation::Vertical => self.col == 0 || self.col == last || self.row == last,
        }
    }

    /// The two tiles this wall separates, only for internal walls.
    pub const fn flanking_tiles(&self) -> Option<(Coord2, Coord2)> {
        if self.is_external() {
            return None;
        }
        Some(match self.orientation {
            Orientation::Horizontal => ((self.row - 1, self.col), (self.row, self.col)),
            Orientation::Vertical => ((self.row, self.col - 1), (self.row, self.col)),
        })
    }

    /// The wall between two orthogonally adjacent tiles.
    pub fn between(a: Coord2, b: Coord2) -> Option<Self> {
        let ((r1, c1), (r2, c2)) = (a, b);
        let id = if r1 == r2 && c1.abs_diff(c2) == 1 {
            Self::new(Orientation::Vertical, r1, c1.max(c2))
        } else if c1 == c2 && r1.abs_diff(r2) == 1 {
            Self::new(Orientation::Horizontal, r1.max(r2), c1)
        } else {
            return None;
        };
        (in_bounds(a) && in_bounds(b)).then_some(id)
    }
}

/// A wall slot with its hidden kind and public state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    id: WallId,
    kind: WallKind,
    is_open: bool,
    is_revealed: bool,
}

impl Wall {
    /// External walls are blocking and known from the start, internal ones are untyped and hidden.
    pub const fn new(id: WallId) -> Self {
        let external = id.is_external();
        Self {
            id,
            kind: if external {
                WallKind::Wall
            } else {
                WallKind::None
            },
            is_open: false,
            is_revealed: external,
        }
    }

    pub const fn id(&self) -> WallId {
        self.id
    }

    pub const fn kind(&self) -> WallKind {
        self.kind
    }

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn is_external(&self) -> bool {
        self.id.is_external()
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub const fn is_closed_door(&self) -> bool {
        matches!(self.kind, WallKind::MagicDoor) && !self.is_open
    }

    pub fn can_pass(&self, species: Species) -> bool {
        self.kind.can_pass(self.is_open, species)
    }

    /// Marks the wall as known, returns whether it already was.
    pub fn reveal(&mut self) -> bool {
        core::mem::replace(&mut self.is_revealed, true)
    }

    pub(crate) fn assign(&mut self, kind: WallKind) {
        debug_assert!(!self.is_external(), "external wall {:?} is fixed", self.id);
        self.kind = kind;
        self.is_open = false;
    }

    pub(crate) fn open(&mut self) {
        debug_assert_eq!(self.kind, WallKind::MagicDoor);
        self.is_open = true;
    }
}
