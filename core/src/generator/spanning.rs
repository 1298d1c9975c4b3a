use super::*;
use rand::seq::SliceRandom;

/// Generation strategy that cuts a random spanning tree between the rabbit and the mouse corners, puts the magic
/// doors on that cut, and retries until both species can roam the whole board.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTreeGenerator {
    max_attempts: u32,
}

impl SpanningTreeGenerator {
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R, door_count: u8) -> Option<WallLayout> {
        use WallKind::{FreePassage, MagicDoor, MouseHole, RabbitWindow, Wall};

        let mut edges: Vec<Edge> = Edge::all().collect();
        edges.shuffle(rng);
        let tree = spanning_tree(&edges);

        // primary door: a tree edge whose removal leaves both rabbits on one side and no mouse with them
        let (primary, rabbit_side) = tree.iter().enumerate().find_map(|(cut, &edge)| {
            let remaining = tree
                .iter()
                .enumerate()
                .filter(move |&(i, _)| i != cut)
                .map(|(_, &edge)| edge);
            let side = component(remaining, node_index(Player::GreenRabbit.start()));
            separates_species(&side).then_some((edge, side))
        })?;

        let mut boundary: Vec<Edge> = edges
            .iter()
            .copied()
            .filter(|&edge| edge != primary && crosses(&rabbit_side, edge))
            .collect();

        let extra_doors = usize::from(door_count - 1);
        if boundary.len() < extra_doors {
            log::trace!(
                "Cut has {} boundary edges, {} extra doors needed",
                boundary.len(),
                extra_doors
            );
            return None;
        }

        let mut layout = WallLayout::default();
        let mut budget = KindBudget::new(door_count);
        layout.set(primary, MagicDoor);
        boundary.shuffle(rng);
        for door in boundary.drain(..extra_doors) {
            layout.set(door, MagicDoor);
        }

        for &edge in &boundary {
            if !budget.take(Wall) {
                break;
            }
            layout.set(edge, Wall);
        }

        let mut unassigned: Vec<Edge> = edges
            .iter()
            .copied()
            .filter(|&edge| layout.kind(edge) == WallKind::None)
            .collect();
        // tree edges first, they carry the connectivity
        unassigned.sort_by_key(|edge| !tree.contains(edge));

        for edge in unassigned {
            let kind = if boundary.contains(&edge) {
                if budget.left(MouseHole) > 0 && budget.left(RabbitWindow) > 0 {
                    let kind = if rng.random_bool(0.5) {
                        MouseHole
                    } else {
                        RabbitWindow
                    };
                    budget.take(kind);
                    Some(kind)
                } else {
                    budget.take_first(&[MouseHole, RabbitWindow, FreePassage, Wall])
                }
            } else if tree.contains(&edge) {
                budget.take_first(&[FreePassage, RabbitWindow, MouseHole, Wall])
            } else {
                budget.take_first(&[Wall, MouseHole, RabbitWindow, FreePassage])
            };
            layout.set(edge, kind?);
        }

        let connected = layout.is_connected_for(Species::Rabbit, Player::GreenRabbit.start())
            && layout.is_connected_for(Species::Mouse, Player::RedMouse.start());
        connected.then_some(layout)
    }
}

impl Default for SpanningTreeGenerator {
    fn default() -> Self {
        Self::new(MAX_GENERATION_ATTEMPTS)
    }
}

impl WallGenerator for SpanningTreeGenerator {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R, door_count: u8) -> Result<WallLayout> {
        if door_count == 0 || usize::from(door_count) > KindBudget::FREE_PASSAGES {
            return Err(GameError::InvalidConfig("door count out of range"));
        }

        for attempt in 1..=self.max_attempts {
            if let Some(layout) = self.attempt(rng, door_count) {
                log::debug!(
                    "Generated valid board in {} attempts with {} magic doors",
                    attempt,
                    door_count
                );
                return Ok(layout);
            }
            log::trace!("Layout attempt {} rejected", attempt);
        }

        log::error!(
            "Could not generate a valid board in {} attempts",
            self.max_attempts
        );
        Err(GameError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}

/// Remaining number of each non-door kind to hand out.
#[derive(Debug)]
struct KindBudget {
    walls: usize,
    rabbit_windows: usize,
    mouse_holes: usize,
    free_passages: usize,
}

impl KindBudget {
    const WALLS: usize = 2;
    const RABBIT_WINDOWS: usize = 4;
    const MOUSE_HOLES: usize = 4;
    const FREE_PASSAGES: usize = 14;

    fn new(door_count: u8) -> Self {
        Self {
            walls: Self::WALLS,
            rabbit_windows: Self::RABBIT_WINDOWS,
            mouse_holes: Self::MOUSE_HOLES,
            free_passages: Self::FREE_PASSAGES - usize::from(door_count),
        }
    }

    fn slot(&mut self, kind: WallKind) -> Option<&mut usize> {
        match kind {
            WallKind::Wall => Some(&mut self.walls),
            WallKind::RabbitWindow => Some(&mut self.rabbit_windows),
            WallKind::MouseHole => Some(&mut self.mouse_holes),
            WallKind::FreePassage => Some(&mut self.free_passages),
            WallKind::MagicDoor | WallKind::None => None,
        }
    }

    fn left(&mut self, kind: WallKind) -> usize {
        self.slot(kind).map_or(0, |left| *left)
    }

    fn take(&mut self, kind: WallKind) -> bool {
        match self.slot(kind) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }

    fn take_first(&mut self, preference: &[WallKind]) -> Option<WallKind> {
        preference.iter().copied().find(|&kind| self.take(kind))
    }
}

/// Union-find over the 16 tiles, with path halving.
struct DisjointSet {
    parent: [usize; TILE_COUNT],
}

impl DisjointSet {
    fn new() -> Self {
        Self {
            parent: core::array::from_fn(|i| i),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Joins the sets of `a` and `b`, returns false when they were already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        self.parent[root_a] = root_b;
        true
    }
}

/// Kruskal over the given (already shuffled) edge order.
fn spanning_tree(edges: &[Edge]) -> Vec<Edge> {
    let mut sets = DisjointSet::new();
    edges
        .iter()
        .copied()
        .filter(|edge| {
            let (u, v) = edge.nodes();
            sets.union(u, v)
        })
        .collect()
}

fn crosses(side: &[bool; TILE_COUNT], edge: Edge) -> bool {
    let (u, v) = edge.nodes();
    side[u] != side[v]
}

/// Both rabbit corners are inside `side` and no mouse corner is.
fn separates_species(side: &[bool; TILE_COUNT]) -> bool {
    Player::ALL.into_iter().all(|player| {
        side[node_index(player.start())] == (player.species() == Species::Rabbit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn spanning_tree_connects_all_tiles() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut edges: Vec<Edge> = Edge::all().collect();
        edges.shuffle(&mut rng);

        let tree = spanning_tree(&edges);

        assert_eq!(tree.len(), TILE_COUNT - 1);
        let side = component(tree.iter().copied(), 0);
        assert!(side.iter().all(|&inside| inside));
    }

    #[test]
    fn generated_layouts_hold_for_every_difficulty() {
        let generator = SpanningTreeGenerator::default();
        for difficulty in Difficulty::ALL {
            let doors = difficulty.max_door_count();
            for seed in 0..40 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let layout = generator.generate(&mut rng, doors).unwrap();

                assert!(layout.is_complete());
                assert_eq!(layout.count(WallKind::MagicDoor), usize::from(doors));
                assert_eq!(layout.count(WallKind::Wall), 2);
                assert_eq!(layout.count(WallKind::RabbitWindow), 4);
                assert_eq!(layout.count(WallKind::MouseHole), 4);
                assert_eq!(
                    layout.count(WallKind::FreePassage),
                    14 - usize::from(doors)
                );
                assert!(layout.is_connected_for(Species::Rabbit, (0, 0)));
                assert!(layout.is_connected_for(Species::Mouse, (0, 3)));
            }
        }
    }

    #[test]
    fn doors_are_listed_in_placement_order() {
        let generator = SpanningTreeGenerator::default();
        let mut out_of_lattice_order = 0;
        for seed in 0..60 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let layout = generator.generate(&mut rng, 3).unwrap();
            let doors = layout.doors();

            assert_eq!(doors.len(), 3);
            assert!(doors.iter().all(|&door| layout.kind(door) == WallKind::MagicDoor));
            if !doors.is_sorted_by_key(Edge::index) {
                out_of_lattice_order += 1;
            }
        }
        // the primary door comes first wherever it sits in the lattice
        assert!(out_of_lattice_order > 0);
    }

    #[test]
    fn separation_needs_both_rabbits_and_no_mouse() {
        let mut side = [false; TILE_COUNT];
        side[node_index((0, 0))] = true;
        assert!(!separates_species(&side));
        side[node_index((3, 0))] = true;
        assert!(separates_species(&side));
        side[node_index((3, 3))] = true;
        assert!(!separates_species(&side));
    }

    #[test]
    fn boundary_edges_cross_the_cut() {
        let mut side = [false; TILE_COUNT];
        side[node_index((0, 0))] = true;
        assert!(crosses(&side, Edge::new((0, 0), (0, 1)).unwrap()));
        assert!(!crosses(&side, Edge::new((1, 1), (1, 2)).unwrap()));
    }

    #[test]
    fn zero_attempts_reports_exhaustion() {
        let mut rng = SmallRng::seed_from_u64(1);
        let result = SpanningTreeGenerator::new(0).generate(&mut rng, 1);
        assert_eq!(result, Err(GameError::GenerationExhausted { attempts: 0 }));
    }

    #[test]
    fn door_count_must_be_positive() {
        let mut rng = SmallRng::seed_from_u64(1);
        let result = SpanningTreeGenerator::default().generate(&mut rng, 0);
        assert_eq!(
            result,
            Err(GameError::InvalidConfig("door count out of range"))
        );
    }
}
