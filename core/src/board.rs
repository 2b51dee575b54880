//! Board layout dealt for a single round.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Clue, Diagnosis, BOARD_SIZE, CLUES_PER_DIAGNOSIS, GROUP_COUNT};

/// Stable identifier of a tile: its position on the board for the duration of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(usize);

impl TileId {
    /// Creates a tile identifier from a board position.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the board position represented by the identifier.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Index of one of the four diagnoses dealt into a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u8);

impl GroupId {
    /// Every group identifier in ascending order.
    pub const ALL: [GroupId; GROUP_COUNT] = [GroupId(0), GroupId(1), GroupId(2), GroupId(3)];

    /// Creates a group identifier, returning `None` outside `0..4`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if (value as usize) < GROUP_COUNT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric group index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Clue placed on the board together with the group that owns it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardTile {
    clue: Clue,
    group: GroupId,
}

impl BoardTile {
    /// Clue carried by the tile.
    #[must_use]
    pub fn clue(&self) -> &Clue {
        &self.clue
    }

    /// Text shown on the tile.
    #[must_use]
    pub fn text(&self) -> &str {
        self.clue.text()
    }

    /// Category of the underlying clue.
    #[must_use]
    pub fn category(&self) -> crate::Category {
        self.clue.category()
    }

    /// Group the tile belongs to.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }
}

/// Sixteen shuffled tiles dealt from four distinct diagnoses.
///
/// The board is immutable once dealt, so a [`TileId`] resolves to the same
/// tile for the lifetime of the round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    hand: [Diagnosis; GROUP_COUNT],
    tiles: Vec<BoardTile>,
}

impl Board {
    /// Deals a board from four diagnoses and a tile arrangement.
    ///
    /// Diagnosis `i` of the hand becomes group `i`. Its clues are laid out in
    /// hand order (`4 * i + clue`) and `order[p]` names the laid-out clue placed
    /// at board position `p`, so `order` must be a permutation of `0..16`.
    pub fn deal(hand: [Diagnosis; GROUP_COUNT], order: &[usize]) -> Result<Self, BoardError> {
        let mut names = HashSet::with_capacity(GROUP_COUNT);
        for diagnosis in &hand {
            if !names.insert(diagnosis.name()) {
                return Err(BoardError::DuplicateDiagnosis(diagnosis.name().to_owned()));
            }
        }

        if order.len() != BOARD_SIZE {
            return Err(BoardError::ArrangementLength { found: order.len() });
        }

        let mut placed = [false; BOARD_SIZE];
        for &slot in order {
            match placed.get_mut(slot) {
                Some(seen) if !*seen => *seen = true,
                _ => return Err(BoardError::NotAPermutation { slot }),
            }
        }

        let laid_out = lay_out(&hand);
        let tiles = order.iter().map(|&slot| laid_out[slot].clone()).collect();

        Ok(Self { hand, tiles })
    }

    /// Deals a board with tiles left in hand order.
    #[must_use]
    pub fn unshuffled(hand: [Diagnosis; GROUP_COUNT]) -> Self {
        let tiles = lay_out(&hand);
        Self { hand, tiles }
    }

    /// Tiles in board order.
    #[must_use]
    pub fn tiles(&self) -> &[BoardTile] {
        &self.tiles
    }

    /// Number of tiles on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always `false` for a dealt board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Identifiers of every tile in board order.
    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> {
        (0..self.tiles.len()).map(TileId::new)
    }

    /// Looks up a tile by identifier.
    #[must_use]
    pub fn tile(&self, tile: TileId) -> Option<&BoardTile> {
        self.tiles.get(tile.get())
    }

    /// Group owning the tile, if the identifier is on the board.
    #[must_use]
    pub fn group_of(&self, tile: TileId) -> Option<GroupId> {
        self.tile(tile).map(BoardTile::group)
    }

    /// Diagnosis dealt into the provided group.
    #[must_use]
    pub fn diagnosis(&self, group: GroupId) -> &Diagnosis {
        &self.hand[group.index()]
    }

    /// Diagnosis owning the tile, if the identifier is on the board.
    #[must_use]
    pub fn owner(&self, tile: TileId) -> Option<&Diagnosis> {
        self.group_of(tile).map(|group| self.diagnosis(group))
    }

    /// The four diagnoses in group order.
    #[must_use]
    pub fn hand(&self) -> &[Diagnosis; GROUP_COUNT] {
        &self.hand
    }

    /// Identifiers of the tiles belonging to the provided group, in board order.
    #[must_use]
    pub fn tiles_of(&self, group: GroupId) -> Vec<TileId> {
        self.tile_ids()
            .filter(|tile| self.group_of(*tile) == Some(group))
            .collect()
    }
}

fn lay_out(hand: &[Diagnosis; GROUP_COUNT]) -> Vec<BoardTile> {
    GroupId::ALL
        .iter()
        .zip(hand.iter())
        .flat_map(|(group, diagnosis)| {
            diagnosis.clues().iter().map(move |clue| BoardTile {
                clue: clue.clone(),
                group: *group,
            })
        })
        .collect()
}

/// Group the player decoded together with the tiles submitted for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FoundGroup {
    group: GroupId,
    tiles: [TileId; CLUES_PER_DIAGNOSIS],
}

impl FoundGroup {
    /// Records a decoded group.
    #[must_use]
    pub const fn new(group: GroupId, tiles: [TileId; CLUES_PER_DIAGNOSIS]) -> Self {
        Self { group, tiles }
    }

    /// Group that was decoded.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Tiles in the order they were selected.
    #[must_use]
    pub const fn tiles(&self) -> &[TileId; CLUES_PER_DIAGNOSIS] {
        &self.tiles
    }

    /// Reports whether the tile belongs to the decoded set.
    #[must_use]
    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }
}

/// Reasons a board cannot be dealt.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The same diagnosis was dealt into two groups.
    #[error("diagnosis `{0}` was dealt more than once")]
    DuplicateDiagnosis(String),
    /// The arrangement does not cover exactly sixteen positions.
    #[error("tile arrangement has {found} entries; expected sixteen")]
    ArrangementLength {
        /// Number of entries in the arrangement.
        found: usize,
    },
    /// The arrangement repeats or overruns a slot.
    #[error("tile arrangement is not a permutation (slot {slot})")]
    NotAPermutation {
        /// First offending slot.
        slot: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn hand() -> [Diagnosis; GROUP_COUNT] {
        ["a", "b", "c", "d"].map(|name| {
            Diagnosis::new(
                name,
                Category::ALL.map(|category| Clue::new(format!("{name}-{category}"), category)),
            )
        })
    }

    #[test]
    fn unshuffled_board_lays_groups_out_in_hand_order() {
        let board = Board::unshuffled(hand());

        assert_eq!(board.len(), BOARD_SIZE);
        for (position, tile) in board.tiles().iter().enumerate() {
            assert_eq!(usize::from(tile.group().get()), position / CLUES_PER_DIAGNOSIS);
        }
        assert_eq!(board.owner(TileId::new(5)).map(Diagnosis::name), Some("b"));
    }

    #[test]
    fn deal_places_tiles_by_arrangement() {
        let order: Vec<usize> = (0..BOARD_SIZE).rev().collect();
        let board = Board::deal(hand(), &order).expect("reversed order is a permutation");

        assert_eq!(board.tile(TileId::new(0)).map(BoardTile::text), Some("d-symptom"));
        assert_eq!(board.group_of(TileId::new(15)), GroupId::new(0));
        assert_eq!(
            board.tiles_of(GroupId::ALL[3]),
            vec![TileId::new(0), TileId::new(1), TileId::new(2), TileId::new(3)]
        );
    }

    #[test]
    fn deal_rejects_repeated_slots() {
        let mut order: Vec<usize> = (0..BOARD_SIZE).collect();
        order[3] = 2;

        assert_eq!(
            Board::deal(hand(), &order),
            Err(BoardError::NotAPermutation { slot: 2 })
        );
    }

    #[test]
    fn deal_rejects_short_arrangement() {
        assert_eq!(
            Board::deal(hand(), &[0, 1, 2]),
            Err(BoardError::ArrangementLength { found: 3 })
        );
    }

    #[test]
    fn deal_rejects_repeated_diagnosis() {
        let mut hand = hand();
        hand[2] = hand[0].clone();

        assert_eq!(
            Board::deal(hand, &(0..BOARD_SIZE).collect::<Vec<_>>()),
            Err(BoardError::DuplicateDiagnosis("a".to_owned()))
        );
    }

    #[test]
    fn group_id_rejects_out_of_range_values() {
        assert!(GroupId::new(4).is_none());
        assert_eq!(GroupId::new(2).map(|group| group.get()), Some(2));
    }
}
