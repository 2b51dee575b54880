//! Read-only projection of a round into display order.

use gene_link_core::{Board, FoundGroup, GroupId, TileId};

/// Group whose owning diagnosis may be shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupLabel<'a> {
    /// Group being labelled.
    pub group: GroupId,
    /// Name of the diagnosis dealt into the group.
    pub name: &'a str,
}

/// Display order of the board together with the group names that are revealed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealView<'a> {
    order: Vec<TileId>,
    labels: Vec<GroupLabel<'a>>,
}

impl<'a> RevealView<'a> {
    /// Tiles in the order they should be displayed.
    #[must_use]
    pub fn order(&self) -> &[TileId] {
        &self.order
    }

    /// Revealed group names in ascending group order.
    #[must_use]
    pub fn labels(&self) -> &[GroupLabel<'a>] {
        &self.labels
    }

    /// Name revealed for the group, if any.
    #[must_use]
    pub fn label_for(&self, group: GroupId) -> Option<&'a str> {
        self.labels
            .iter()
            .find(|label| label.group == group)
            .map(|label| label.name)
    }
}

/// Computes the display order of a board.
///
/// A lost round is re-sorted by ascending group id with ties kept in board
/// order, and every group name is revealed. Otherwise the board keeps its
/// dealt order and only decoded groups are named.
#[must_use]
pub fn reveal_order<'a>(board: &'a Board, found: &[FoundGroup], lost: bool) -> RevealView<'a> {
    let mut order: Vec<TileId> = board.tile_ids().collect();
    if lost {
        order.sort_by_key(|tile| board.group_of(*tile));
    }

    let labels = GroupId::ALL
        .into_iter()
        .filter(|group| lost || found.iter().any(|entry| entry.group() == *group))
        .map(|group| GroupLabel {
            group,
            name: board.diagnosis(group).name(),
        })
        .collect();

    RevealView { order, labels }
}
