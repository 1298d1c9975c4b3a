use alloc::vec::Vec;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of one pursuit trigger.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GhostMove {
    /// Ghost is not awake yet
    Asleep,
    /// The draw failed, probability went up
    Stayed,
    /// The draw succeeded but every neighbor is occupied
    Stuck,
    Moved(Coord2),
}

impl GhostMove {
    pub const fn has_moved(self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

/// Hubi: sleeps until the doors are open, then drifts around the board away from players.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    position: Option<Coord2>,
    probability: f64,
    base_probability: f64,
    increment: f64,
}

impl Ghost {
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            position: None,
            probability: 0.0,
            base_probability: rules.ghost_base_probability,
            increment: rules.ghost_probability_increment,
        }
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    pub fn position(&self) -> Option<Coord2> {
        self.position
    }

    /// Chance of moving on the next trigger.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn base_probability(&self) -> f64 {
        self.base_probability
    }

    /// Wakes the ghost on a random tile free of players. Does nothing if already awake.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, roster: &Roster) -> Option<Coord2> {
        if self.position.is_some() {
            return self.position;
        }

        let free: Vec<Coord2> = iter_tiles()
            .filter(|&coords| !roster.is_occupied(coords))
            .collect();
        let Some(&choice) = free.choose(rng) else {
            log::warn!("No free tile to spawn the ghost on");
            return None;
        };

        self.position = Some(choice);
        self.probability = self.base_probability;
        log::debug!("Ghost spawned at {:?}", choice);
        self.position
    }

    /// One pursuit trigger, called after each resolved player move while awake.
    pub fn maybe_move<R: Rng + ?Sized>(&mut self, rng: &mut R, roster: &Roster) -> GhostMove {
        let Some(current) = self.position else {
            return GhostMove::Asleep;
        };

        let draw: f64 = rng.random();
        if draw > self.probability {
            self.probability = (self.probability + self.increment).min(1.0);
            log::trace!(
                "Ghost did not move, probability increased to {:.2}",
                self.probability
            );
            return GhostMove::Stayed;
        }

        self.probability = self.base_probability;

        let candidates: Vec<Coord2> = NeighborIter::new(current)
            .filter(|&coords| !roster.is_occupied(coords))
            .collect();
        match candidates.choose(rng) {
            Some(&next) => {
                self.position = Some(next);
                log::debug!("Ghost moved to {:?}", next);
                GhostMove::Moved(next)
            }
            None => {
                log::warn!("Ghost stuck at {:?}, no free neighbor", current);
                GhostMove::Stuck
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, coords: Coord2) {
        self.position = Some(coords);
        if self.probability < self.base_probability {
            self.probability = self.base_probability;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn roster(players: &[Player]) -> Roster {
        let mut roster = Roster::new();
        for &player in players {
            roster.add(player).unwrap();
        }
        roster
    }

    #[test]
    fn asleep_ghost_never_moves() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ghost = Ghost::new(&RuleSet::for_difficulty(Difficulty::Easy));
        assert_eq!(ghost.maybe_move(&mut rng, &Roster::new()), GhostMove::Asleep);
        assert!(!ghost.is_active());
    }

    #[test]
    fn spawn_avoids_players_and_sets_base_probability() {
        let players = roster(&Player::ALL);
        let rules = RuleSet::for_difficulty(Difficulty::Hard);
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut ghost = Ghost::new(&rules);
            let at = ghost.spawn(&mut rng, &players).unwrap();
            assert!(!players.is_occupied(at));
            assert_eq!(ghost.probability(), 0.2);
        }
    }

    #[test]
    fn spawn_twice_keeps_position() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ghost = Ghost::new(&RuleSet::default());
        let first = ghost.spawn(&mut rng, &Roster::new());
        assert_eq!(ghost.spawn(&mut rng, &Roster::new()), first);
    }

    #[test]
    fn probability_stays_between_base_and_one() {
        let rules = RuleSet::for_difficulty(Difficulty::Medium);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut ghost = Ghost::new(&rules);
        let players = Roster::new();
        ghost.spawn(&mut rng, &players);

        for _ in 0..500 {
            let before = ghost.probability();
            let outcome = ghost.maybe_move(&mut rng, &players);
            let after = ghost.probability();
            assert!(after >= rules.ghost_base_probability && after <= 1.0);
            match outcome {
                GhostMove::Moved(_) | GhostMove::Stuck => {
                    assert_eq!(after, rules.ghost_base_probability)
                }
                GhostMove::Stayed => assert_eq!(
                    after,
                    (before + rules.ghost_probability_increment).min(1.0)
                ),
                GhostMove::Asleep => unreachable!(),
            }
        }
    }

    #[test]
    fn single_free_neighbor_is_always_chosen() {
        // corner (0, 0) has neighbors (0, 1), (1, 0) and (1, 1)
        let mut players = roster(&[Player::GreenRabbit, Player::RedMouse]);
        players.set_position(Player::GreenRabbit, (0, 1));
        players.set_position(Player::RedMouse, (1, 0));

        let mut rng = SmallRng::seed_from_u64(21);
        let mut ghost = Ghost::new(&RuleSet::default());
        let mut moves = 0;
        for _ in 0..300 {
            ghost.place((0, 0));
            if let GhostMove::Moved(to) = ghost.maybe_move(&mut rng, &players) {
                assert_eq!(to, (1, 1));
                moves += 1;
            }
        }
        assert!(moves > 0);
    }

    #[test]
    fn surrounded_ghost_is_stuck() {
        let mut players = roster(&[Player::GreenRabbit, Player::RedMouse, Player::BlueRabbit]);
        players.set_position(Player::GreenRabbit, (0, 1));
        players.set_position(Player::RedMouse, (1, 0));
        players.set_position(Player::BlueRabbit, (1, 1));

        let mut rng = SmallRng::seed_from_u64(2);
        let mut ghost = Ghost::new(&RuleSet::default());
        ghost.place((0, 0));
        for _ in 0..100 {
            let outcome = ghost.maybe_move(&mut rng, &players);
            assert!(matches!(outcome, GhostMove::Stayed | GhostMove::Stuck));
            assert_eq!(ghost.position(), Some((0, 0)));
        }
    }
}
