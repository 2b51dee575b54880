#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state management for Gene-Link.

mod reveal;

use gene_link_core::{
    Board, Command, Event, FoundGroup, GroupId, RoundPhase, SelectionAfterMiss, SelectionError,
    SubmissionError, TileId, GROUP_COUNT, MAX_MISTAKES, SELECTION_LIMIT,
};

pub use reveal::{reveal_order, GroupLabel, RevealView};

/// Represents the authoritative Gene-Link world state.
#[derive(Debug, Default)]
pub struct World {
    selection_after_miss: SelectionAfterMiss,
    round: Option<Round>,
}

impl World {
    /// Creates an idle world waiting for its first round.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn toggle_tile(&mut self, tile: TileId, out_events: &mut Vec<Event>) {
        let Some(round) = self.round.as_mut() else {
            out_events.push(Event::SelectionRejected {
                tile,
                reason: SelectionError::NoRound,
            });
            return;
        };

        if let Err(reason) = round.check_selectable(tile) {
            out_events.push(Event::SelectionRejected { tile, reason });
            return;
        }

        if let Some(position) = round.selected.iter().position(|selected| *selected == tile) {
            let _ = round.selected.remove(position);
            out_events.push(Event::TileDeselected { tile });
        } else if round.selected.len() < SELECTION_LIMIT {
            round.selected.push(tile);
            out_events.push(Event::TileSelected { tile });
        } else {
            out_events.push(Event::SelectionRejected {
                tile,
                reason: SelectionError::SelectionFull,
            });
        }
    }

    fn submit(&mut self, out_events: &mut Vec<Event>) {
        let selection_after_miss = self.selection_after_miss;
        let Some(round) = self.round.as_mut() else {
            out_events.push(Event::SubmissionRejected {
                reason: SubmissionError::NoRound,
            });
            return;
        };

        if round.phase().is_terminal() {
            out_events.push(Event::SubmissionRejected {
                reason: SubmissionError::RoundOver,
            });
            return;
        }

        let Ok(tiles) = <[TileId; SELECTION_LIMIT]>::try_from(round.selected.as_slice()) else {
            out_events.push(Event::SubmissionRejected {
                reason: SubmissionError::IncompleteSelection {
                    selected: round.selected.len(),
                },
            });
            return;
        };

        match judge_selection(&round.board, &tiles) {
            Verdict::Match(group) => {
                round.found.push(FoundGroup::new(group, tiles));
                round.selected.clear();
                let diagnosis = round.board.diagnosis(group).clone();
                log::debug!(
                    "group {} decoded as `{}` ({} of {GROUP_COUNT})",
                    group.get(),
                    diagnosis.name(),
                    round.found.len()
                );
                out_events.push(Event::GroupFound {
                    group,
                    tiles,
                    diagnosis,
                });
                if round.phase() == RoundPhase::Won {
                    log::debug!("round won with {} mistakes", round.mistakes);
                    out_events.push(Event::RoundWon);
                }
            }
            Verdict::Mismatch => {
                round.mistakes = round.mistakes.saturating_add(1);
                log::debug!("submission missed ({} of {MAX_MISTAKES})", round.mistakes);
                out_events.push(Event::SubmissionMissed {
                    mistakes: round.mistakes,
                });
                if selection_after_miss == SelectionAfterMiss::Clear {
                    round.selected.clear();
                    out_events.push(Event::SelectionCleared);
                }
                if round.phase() == RoundPhase::Lost {
                    log::debug!("round lost with {} groups decoded", round.found.len());
                    out_events.push(Event::RoundLost);
                }
            }
        }
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.phase().is_terminal() || round.selected.is_empty() {
            return;
        }
        round.selected.clear();
        out_events.push(Event::SelectionCleared);
    }
}

#[derive(Debug)]
struct Round {
    board: Board,
    selected: Vec<TileId>,
    found: Vec<FoundGroup>,
    mistakes: u32,
}

impl Round {
    fn new(board: Board) -> Self {
        Self {
            board,
            selected: Vec::with_capacity(SELECTION_LIMIT),
            found: Vec::with_capacity(GROUP_COUNT),
            mistakes: 0,
        }
    }

    fn phase(&self) -> RoundPhase {
        if self.found.len() >= GROUP_COUNT {
            RoundPhase::Won
        } else if self.mistakes >= MAX_MISTAKES {
            RoundPhase::Lost
        } else {
            RoundPhase::Playing
        }
    }

    fn is_found(&self, tile: TileId) -> bool {
        self.found.iter().any(|group| group.contains(tile))
    }

    fn check_selectable(&self, tile: TileId) -> Result<(), SelectionError> {
        if self.phase().is_terminal() {
            return Err(SelectionError::RoundOver);
        }
        if self.board.tile(tile).is_none() {
            return Err(SelectionError::UnknownTile);
        }
        if self.is_found(tile) {
            return Err(SelectionError::AlreadyFound);
        }
        Ok(())
    }
}

/// Outcome of checking a four-tile selection against the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Every tile belongs to the provided group.
    Match(GroupId),
    /// The tiles span more than one group.
    Mismatch,
}

/// Decides whether a selection forms a group without touching any state.
///
/// The target group is the group of the first selected tile; the selection
/// matches only if every other tile shares it. Identifiers that are not on the
/// board never match.
#[must_use]
pub fn judge_selection(board: &Board, selection: &[TileId; SELECTION_LIMIT]) -> Verdict {
    let Some(target) = board.group_of(selection[0]) else {
        return Verdict::Mismatch;
    };
    if selection
        .iter()
        .all(|tile| board.group_of(*tile) == Some(target))
    {
        Verdict::Match(target)
    } else {
        Verdict::Mismatch
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureRules {
            selection_after_miss,
        } => {
            world.selection_after_miss = selection_after_miss;
        }
        Command::RequestRound => {}
        Command::StartRound { board } => {
            log::debug!(
                "round started with {:?}",
                board
                    .hand()
                    .iter()
                    .map(|diagnosis| diagnosis.name())
                    .collect::<Vec<_>>()
            );
            world.round = Some(Round::new(board));
            out_events.push(Event::RoundStarted);
        }
        Command::SelectTile { tile } => world.toggle_tile(tile, out_events),
        Command::SubmitSelection => world.submit(out_events),
        Command::ClearSelection => world.clear_selection(out_events),
        Command::AbandonRound => {
            if world.round.take().is_some() {
                out_events.push(Event::RoundAbandoned);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gene_link_core::{
        Board, FoundGroup, RoundPhase, SelectionAfterMiss, TileId, SELECTION_LIMIT,
    };

    use super::{reveal_order, RevealView, World};

    /// Reports the lifecycle phase of the current round.
    #[must_use]
    pub fn phase(world: &World) -> RoundPhase {
        world
            .round
            .as_ref()
            .map_or(RoundPhase::Idle, |round| round.phase())
    }

    /// Provides read-only access to the board of the current round.
    #[must_use]
    pub fn board(world: &World) -> Option<&Board> {
        world.round.as_ref().map(|round| &round.board)
    }

    /// Tiles currently selected, in selection order.
    #[must_use]
    pub fn selection(world: &World) -> &[TileId] {
        world
            .round
            .as_ref()
            .map(|round| round.selected.as_slice())
            .unwrap_or_default()
    }

    /// Groups decoded so far, in the order they were found.
    #[must_use]
    pub fn found_groups(world: &World) -> &[FoundGroup] {
        world
            .round
            .as_ref()
            .map(|round| round.found.as_slice())
            .unwrap_or_default()
    }

    /// Wrong submissions recorded in the current round.
    #[must_use]
    pub fn mistakes(world: &World) -> u32 {
        world.round.as_ref().map_or(0, |round| round.mistakes)
    }

    /// Reports whether the tile belongs to a decoded group.
    #[must_use]
    pub fn is_found(world: &World, tile: TileId) -> bool {
        world
            .round
            .as_ref()
            .is_some_and(|round| round.is_found(tile))
    }

    /// Reports whether the tile is part of the current selection.
    #[must_use]
    pub fn is_selected(world: &World, tile: TileId) -> bool {
        selection(world).contains(&tile)
    }

    /// Reports whether a submission would be evaluated rather than rejected.
    #[must_use]
    pub fn can_submit(world: &World) -> bool {
        phase(world) == RoundPhase::Playing && selection(world).len() == SELECTION_LIMIT
    }

    /// Selection policy applied after a miss.
    #[must_use]
    pub fn selection_after_miss(world: &World) -> SelectionAfterMiss {
        world.selection_after_miss
    }

    /// Projects the current round into display order and revealed group names.
    #[must_use]
    pub fn reveal_view(world: &World) -> Option<RevealView<'_>> {
        world.round.as_ref().map(|round| {
            reveal_order(
                &round.board,
                &round.found,
                round.phase() == RoundPhase::Lost,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gene_link_core::{Category, Clue, Diagnosis};

    fn board() -> Board {
        Board::unshuffled(["alpha", "beta", "gamma", "delta"].map(|name| {
            Diagnosis::new(
                name,
                Category::ALL.map(|category| Clue::new(format!("{name} {category}"), category)),
            )
        }))
    }

    fn started_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::StartRound { board: board() }, &mut events);
        assert_eq!(events, vec![Event::RoundStarted]);
        world
    }

    fn select_all(world: &mut World, tiles: &[usize]) -> Vec<Event> {
        let mut events = Vec::new();
        for tile in tiles {
            apply(
                world,
                Command::SelectTile {
                    tile: TileId::new(*tile),
                },
                &mut events,
            );
        }
        events
    }

    #[test]
    fn new_world_is_idle() {
        let world = World::new();

        assert_eq!(query::phase(&world), RoundPhase::Idle);
        assert!(query::board(&world).is_none());
        assert!(query::reveal_view(&world).is_none());
    }

    #[test]
    fn judge_matches_uniform_selection() {
        let board = board();
        let tiles = [8, 9, 10, 11].map(TileId::new);

        assert_eq!(
            judge_selection(&board, &tiles),
            Verdict::Match(GroupId::ALL[2])
        );
    }

    #[test]
    fn judge_rejects_mixed_selection() {
        let board = board();
        let tiles = [0, 1, 2, 4].map(TileId::new);

        assert_eq!(judge_selection(&board, &tiles), Verdict::Mismatch);
    }

    #[test]
    fn judge_rejects_unknown_tiles() {
        let board = board();
        let tiles = [16, 17, 18, 19].map(TileId::new);

        assert_eq!(judge_selection(&board, &tiles), Verdict::Mismatch);
    }

    #[test]
    fn selecting_unknown_tile_is_rejected() {
        let mut world = started_world();

        let events = select_all(&mut world, &[16]);

        assert_eq!(
            events,
            vec![Event::SelectionRejected {
                tile: TileId::new(16),
                reason: SelectionError::UnknownTile,
            }]
        );
        assert!(query::selection(&world).is_empty());
    }

    #[test]
    fn selecting_without_round_is_rejected() {
        let mut world = World::new();

        let events = select_all(&mut world, &[0]);

        assert_eq!(
            events,
            vec![Event::SelectionRejected {
                tile: TileId::new(0),
                reason: SelectionError::NoRound,
            }]
        );
    }

    #[test]
    fn clear_selection_empties_selection_once() {
        let mut world = started_world();
        let _ = select_all(&mut world, &[0, 5]);

        let mut events = Vec::new();
        apply(&mut world, Command::ClearSelection, &mut events);
        apply(&mut world, Command::ClearSelection, &mut events);

        assert_eq!(events, vec![Event::SelectionCleared]);
        assert!(query::selection(&world).is_empty());
    }

    #[test]
    fn abandon_returns_world_to_idle() {
        let mut world = started_world();
        let mut events = Vec::new();

        apply(&mut world, Command::AbandonRound, &mut events);
        apply(&mut world, Command::AbandonRound, &mut events);

        assert_eq!(events, vec![Event::RoundAbandoned]);
        assert_eq!(query::phase(&world), RoundPhase::Idle);
    }

    #[test]
    fn request_round_leaves_world_untouched() {
        let mut world = started_world();
        let _ = select_all(&mut world, &[3]);
        let mut events = Vec::new();

        apply(&mut world, Command::RequestRound, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::selection(&world), &[TileId::new(3)]);
    }

    #[test]
    fn configure_rules_updates_policy() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ConfigureRules {
                selection_after_miss: SelectionAfterMiss::Clear,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(
            query::selection_after_miss(&world),
            SelectionAfterMiss::Clear
        );
    }
}
