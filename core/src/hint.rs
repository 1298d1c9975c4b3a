use core::fmt;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// What a hint discloses about one creature tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureClue {
    pub creature: CreatureType,
    pub color: Option<CreatureColor>,
}

impl CreatureClue {
    pub fn of(tile: &Tile, detail: HintDetail) -> Self {
        Self {
            creature: tile.creature,
            color: match detail {
                HintDetail::Full => Some(tile.color),
                HintDetail::Partial => None,
            },
        }
    }
}

impl fmt::Display for CreatureClue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{}_{}", color.name(), self.creature.name()),
            None => f.write_str(self.creature.name()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hint {
    /// Where the ghost is hiding
    Ghost { tile: Tile, detail: HintDetail },
    /// The two tiles flanking the next closed magic door
    Door {
        first: Tile,
        second: Tile,
        detail: HintDetail,
    },
}

impl Hint {
    pub fn ghost(tile: Tile, detail: HintDetail) -> Self {
        Self::Ghost { tile, detail }
    }

    pub fn door((first, second): (Tile, Tile), detail: HintDetail) -> Self {
        Self::Door {
            first,
            second,
            detail,
        }
    }

    /// The clues to narrate, filtered by the hint's level of detail.
    pub fn clues(&self) -> SmallVec<[CreatureClue; 2]> {
        match self {
            Self::Ghost { tile, detail } => SmallVec::from_iter([CreatureClue::of(tile, *detail)]),
            Self::Door {
                first,
                second,
                detail,
            } => SmallVec::from_iter([
                CreatureClue::of(first, *detail),
                CreatureClue::of(second, *detail),
            ]),
        }
    }
}

/// Hints already handed out, valid until the epoch changes.
///
/// The epoch moves forward whenever a door opens or the ghost moves, which
/// makes every cached hint stale at once.
#[derive(Clone, Debug, Default)]
pub struct HintCache {
    epoch: u32,
    given: HashMap<Coord2, (u32, Hint)>,
}

impl HintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Invalidates every hint given so far.
    pub fn advance_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        log::trace!("Hint epoch advanced to {}", self.epoch);
    }

    /// The hint already given to `requester` this epoch.
    pub fn get(&self, requester: Coord2) -> Option<Hint> {
        self.given
            .get(&requester)
            .filter(|(epoch, _)| *epoch == self.epoch)
            .map(|&(_, hint)| hint)
    }

    /// Returns the cached hint for `requester`, generating and storing it when missing or stale.
    pub fn get_or_try_insert_with<F>(&mut self, requester: Coord2, generate: F) -> Result<Hint>
    where
        F: FnOnce() -> Result<Hint>,
    {
        if let Some(hint) = self.get(requester) {
            return Ok(hint);
        }
        let hint = generate()?;
        self.given.insert(requester, (self.epoch, hint));
        Ok(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn tiles() -> (Tile, Tile) {
        let tiles = standard_tiles();
        (tiles[[0, 0]], tiles[[0, 1]])
    }

    #[test]
    fn easy_hints_name_color_and_creature() {
        let (owl, _) = tiles();
        let hint = Hint::ghost(owl, HintDetail::Full);
        let clues = hint.clues();
        assert_eq!(clues.len(), 1);
        assert_eq!(clues[0].to_string(), "white_owl");
    }

    #[test]
    fn partial_hints_name_creature_only() {
        let hint = Hint::door(tiles(), HintDetail::Partial);
        let clues: alloc::vec::Vec<_> = hint.clues().iter().map(ToString::to_string).collect();
        assert_eq!(clues, ["owl", "millipede"]);
    }

    #[test]
    fn cache_returns_same_hint_within_epoch() {
        let (owl, millipede) = tiles();
        let mut cache = HintCache::new();
        let first = cache
            .get_or_try_insert_with((0, 0), || Ok(Hint::ghost(owl, HintDetail::Full)))
            .unwrap();
        let again = cache
            .get_or_try_insert_with((0, 0), || Ok(Hint::ghost(millipede, HintDetail::Full)))
            .unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn new_epoch_forces_regeneration() {
        let (owl, millipede) = tiles();
        let mut cache = HintCache::new();
        cache
            .get_or_try_insert_with((0, 0), || Ok(Hint::ghost(owl, HintDetail::Full)))
            .unwrap();
        cache.advance_epoch();
        assert_eq!(cache.get((0, 0)), None);
        let fresh = cache
            .get_or_try_insert_with((0, 0), || Ok(Hint::ghost(millipede, HintDetail::Full)))
            .unwrap();
        assert_eq!(fresh, Hint::ghost(millipede, HintDetail::Full));
    }

    #[test]
    fn failed_generation_caches_nothing() {
        let mut cache = HintCache::new();
        let result = cache.get_or_try_insert_with((1, 1), || Err(GameError::NoHintAvailable));
        assert_eq!(result, Err(GameError::NoHintAvailable));
        assert_eq!(cache.get((1, 1)), None);
    }
}
