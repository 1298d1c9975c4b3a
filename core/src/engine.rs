use rand::Rng;
use rand::rngs::SmallRng;

use crate::*;

/// A game from player selection to the final phase.
///
/// Owns the board, the ghost and the random source; every request is
/// processed to completion and returns the events the narrator should play.
#[derive(Clone, Debug)]
pub struct Game<R = SmallRng> {
    rules: RuleSet,
    board: Board,
    ghost: Ghost,
    state: GameState,
    roster: Roster,
    current_player: Option<Player>,
    previous_player: Option<Player>,
    hints: HintCache,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Resolves the rules and generates a board, failing if no valid layout was found.
    pub fn new(config: &GameConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let rules = config.resolve_rules(&mut rng);
        let generator = SpanningTreeGenerator::new(config.max_generation_attempts);
        let board = Board::generate(&generator, &mut rng, rules.door_count)?;
        Self::with_board(rules, board, rng)
    }

    /// Plays on a prebuilt board. The doors on the board are the doors that must be opened.
    pub fn with_board(rules: RuleSet, board: Board, rng: R) -> Result<Self> {
        if !board.is_complete() {
            return Err(GameError::InvalidConfig("board has untyped internal walls"));
        }
        let door_count = match u8::try_from(board.magic_doors().len()) {
            Ok(0) => return Err(GameError::InvalidConfig("board has no magic door")),
            Ok(count) => count,
            Err(_) => return Err(GameError::InvalidConfig("board has too many magic doors")),
        };
        if door_count != rules.door_count {
            log::debug!(
                "Board has {} magic doors, rules asked for {}",
                door_count,
                rules.door_count
            );
        }
        let rules = rules.with_door_count(door_count);
        Ok(Self {
            ghost: Ghost::new(&rules),
            rules,
            board,
            state: GameState::new(),
            roster: Roster::new(),
            current_player: None,
            previous_player: None,
            hints: HintCache::new(),
            rng,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ghost(&self) -> &Ghost {
        &self.ghost
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn is_over(&self) -> bool {
        self.state.phase().is_final()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn has_player(&self, player: Player) -> bool {
        self.roster.contains(player)
    }

    pub fn current_player(&self) -> Option<Player> {
        self.current_player
    }

    /// Whoever played the turn before the current one.
    pub fn previous_player(&self) -> Option<Player> {
        self.previous_player
    }

    pub fn add_player(&mut self, player: Player) -> Result<Events> {
        self.state.expect_phase(GamePhase::SelectingPlayers)?;
        self.roster.add(player)?;
        log::debug!("{} joined", player);
        Ok(Events::from_iter([GameEvent::PlayerJoined { player }]))
    }

    pub fn set_first_player(&mut self, player: Player) -> Result<Events> {
        self.state.expect_phase(GamePhase::SelectingFirstPlayer)?;
        if !self.roster.contains(player) {
            return Err(GameError::PlayerNotInGame(player));
        }
        self.previous_player = self.current_player;
        self.current_player = Some(player);
        Ok(Events::from_iter([GameEvent::FirstPlayerSelected { player }]))
    }

    /// Moves setup forward: closes registration, then starts play.
    pub fn advance_setup(&mut self) -> Result<Events> {
        match self.state.phase() {
            GamePhase::SelectingPlayers => {
                self.state.select_first_player(&self.roster)?;
                Ok(Events::from_iter([GameEvent::SelectingFirstPlayer]))
            }
            GamePhase::SelectingFirstPlayer => {
                self.state.start_game(self.current_player, &self.roster)?;
                let first_player = self.current()?;
                let mut events = Events::from_iter([GameEvent::GameStarted { first_player }]);
                events.push(self.turn_started(first_player)?);
                Ok(events)
            }
            phase if phase.is_final() => Err(GameError::AlreadyEnded),
            phase => Err(GameError::WrongPhase(phase)),
        }
    }

    /// Moves the current player by a raw delta, rejecting anything but one orthogonal step.
    pub fn move_by_delta(&mut self, d_row: i8, d_col: i8) -> Result<MoveReport> {
        self.state.check_playing()?;
        let direction = Direction::from_delta(d_row, d_col)?;
        self.move_current_player(direction)
    }

    /// Moves `player`, who must be the one whose turn it is.
    pub fn move_player(&mut self, player: Player, direction: Direction) -> Result<MoveReport> {
        self.state.check_playing()?;
        if self.current()? != player {
            return Err(GameError::NotPlayersTurn(player));
        }
        self.move_current_player(direction)
    }

    pub fn move_current_player(&mut self, direction: Direction) -> Result<MoveReport> {
        self.state.check_playing()?;
        let player = self.current()?;
        let from = self.position_of(player)?;
        let species = player.species();
        let mut events = Events::new();

        let wall_id = WallId::towards(from, direction);
        let already_known = self.board[wall_id].reveal();
        events.push(GameEvent::WallAnnounced {
            player,
            tile: self.board.tile(from),
            kind: self.board[wall_id].kind(),
            already_known,
        });

        let ghost_was_active = self.ghost.is_active();
        if self.board[wall_id].is_closed_door() {
            self.try_open_door(player, wall_id, &mut events);
        }

        let destination = direction
            .step(from)
            .filter(|_| self.board[wall_id].can_pass(species));
        let outcome = match destination {
            Some(to) => {
                self.roster.set_position(player, to);
                events.push(GameEvent::Passed {
                    player,
                    tile: self.board.tile(to),
                });
                if self.check_win_condition(&mut events) {
                    return Ok(MoveReport::finished(MoveOutcome::Won, events));
                }
                MoveOutcome::Passed
            }
            None => {
                events.push(GameEvent::Blocked { player });
                MoveOutcome::Blocked
            }
        };

        let found_alone = destination.is_some() && self.ghost.position() == destination;
        if found_alone {
            events.push(GameEvent::GhostFoundByOnePlayer { player });
        } else if ghost_was_active {
            self.ghost_reacts(&mut events);
        }

        if already_known && self.state.record_known_wall_move() {
            events.push(GameEvent::BonusMove { player });
            return Ok(MoveReport {
                outcome,
                turn_ended: false,
                events,
            });
        }

        let outcome = if self.end_turn(&mut events)? {
            MoveOutcome::GameOver
        } else {
            outcome
        };
        Ok(MoveReport::finished(outcome, events))
    }

    /// Hands the turn to the next player without moving, giving up a pending bonus move.
    ///
    /// Unlike a move or a hint this does not advance the turn clock.
    pub fn end_current_turn(&mut self) -> Result<Events> {
        self.state.check_playing()?;
        self.current()?;
        self.state.pass_turn();
        let mut events = Events::new();
        self.hand_over_turn(&mut events)?;
        Ok(events)
    }

    /// Gives the current player a clue, which uses up the turn.
    pub fn give_hint(&mut self) -> Result<Events> {
        self.state.check_playing()?;
        let player = self.current()?;
        let requester = self.board.tile(self.position_of(player)?);

        let (board, ghost, phase, detail) = (
            &self.board,
            &self.ghost,
            self.state.phase(),
            self.rules.hint_detail,
        );
        let hint = self
            .hints
            .get_or_try_insert_with(requester.coords(), || {
                build_hint(board, ghost, phase, detail)
            })?;

        let mut events = Events::from_iter([GameEvent::HintGiven { requester, hint }]);
        self.end_turn(&mut events)?;
        Ok(events)
    }

    /// A fresh hint for the current phase, bypassing the cache.
    pub fn generate_hint(&self) -> Result<Hint> {
        build_hint(
            &self.board,
            &self.ghost,
            self.state.phase(),
            self.rules.hint_detail,
        )
    }

    /// Tells where `player` stands, relative to the owl in the corner of its quadrant.
    pub fn player_position(&self, player: Player) -> Result<Events> {
        self.state.check_playing()?;
        let coords = self.position_of(player)?;
        let quadrant = Player::quadrant_owner(coords);
        let position = PositionHint {
            player,
            tile: self.board.tile(coords),
            landmark: self.board.tile(quadrant.start()),
            quadrant,
        };
        Ok(Events::from_iter([GameEvent::PlayerPosition { position }]))
    }

    fn current(&self) -> Result<Player> {
        self.current_player.ok_or(GameError::FirstPlayerNotSelected)
    }

    fn position_of(&self, player: Player) -> Result<Coord2> {
        self.roster
            .position(player)
            .ok_or(GameError::PlayerNotInGame(player))
    }

    fn turn_started(&self, player: Player) -> Result<GameEvent> {
        Ok(GameEvent::TurnStarted {
            player,
            tile: self.board.tile(self.position_of(player)?),
        })
    }

    /// Opens the door when both flanking tiles are occupied, waking the ghost after the last one.
    fn try_open_door(&mut self, player: Player, door: WallId, events: &mut Events) {
        let Some((a, b)) = door.flanking_tiles() else {
            return;
        };
        if !(self.roster.is_occupied(a) && self.roster.is_occupied(b)) {
            return;
        }

        self.board[door].open();
        self.hints.advance_epoch();
        let awakened = self.state.door_opened(self.rules.door_count);
        log::debug!(
            "{} opened door {:?}, {} of {} open",
            player,
            door,
            self.state.opened_doors(),
            self.rules.door_count
        );
        events.push(GameEvent::DoorOpened {
            player,
            door,
            opened: self.state.opened_doors(),
            required: self.rules.door_count,
        });

        if awakened {
            self.ghost.spawn(&mut self.rng, &self.roster);
            events.push(GameEvent::GhostAwakened);
        }
    }

    fn check_win_condition(&mut self, events: &mut Events) -> bool {
        let Some(at) = self.ghost.position() else {
            return false;
        };
        let won = self.state.check_win_condition(self.roster.count_at(at));
        if won {
            events.push(GameEvent::GameWon);
        }
        won
    }

    fn ghost_reacts(&mut self, events: &mut Events) {
        if let GhostMove::Moved(_) = self.ghost.maybe_move(&mut self.rng, &self.roster) {
            self.hints.advance_epoch();
            events.push(GameEvent::GhostMoved);
        }
    }

    /// Runs the clock and hands the turn over, returns true when midnight ended the game.
    fn end_turn(&mut self, events: &mut Events) -> Result<bool> {
        match self.state.end_turn(&self.rules) {
            ClockOutcome::Midnight => {
                events.push(GameEvent::GameOver);
                return Ok(true);
            }
            ClockOutcome::Checkpoint(checkpoint) => events.push(GameEvent::Clock { checkpoint }),
            ClockOutcome::Ticking => {}
        }
        self.hand_over_turn(events)?;
        Ok(false)
    }

    fn hand_over_turn(&mut self, events: &mut Events) -> Result<()> {
        let current = self.current()?;
        let next = self.roster.next_after(current).unwrap_or(current);
        self.previous_player = Some(current);
        self.current_player = Some(next);
        log::debug!("Turn {} goes to {}", self.state.total_turns(), next);
        events.push(self.turn_started(next)?);
        Ok(())
    }
}

fn build_hint(board: &Board, ghost: &Ghost, phase: GamePhase, detail: HintDetail) -> Result<Hint> {
    if phase.is_hubi_awake() {
        let at = ghost.position().ok_or(GameError::NoHintAvailable)?;
        return Ok(Hint::ghost(board.tile(at), detail));
    }
    let door = board
        .first_closed_door()
        .ok_or(GameError::NoHintAvailable)?;
    let sides = board
        .tiles_on_both_sides(door)
        .ok_or(GameError::NoHintAvailable)?;
    Ok(Hint::door(sides, detail))
}
