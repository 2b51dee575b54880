#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gene-Link engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative round world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches or follow-up events.

mod board;
mod content;

use serde::{Deserialize, Serialize};

pub use board::{Board, BoardError, BoardTile, FoundGroup, GroupId, TileId};
pub use content::{Category, Clue, ConfigurationError, ContentPool, Diagnosis};

/// Canonical title shown when the experience boots.
pub const WELCOME_BANNER: &str = "GENE-LINK";

/// Subtitle displayed beneath the banner.
pub const TAGLINE: &str = "Genomic Connection Protocol";

/// Number of diagnoses dealt into every round.
pub const GROUP_COUNT: usize = 4;

/// Number of clues every diagnosis contributes.
pub const CLUES_PER_DIAGNOSIS: usize = 4;

/// Number of tiles on a dealt board.
pub const BOARD_SIZE: usize = GROUP_COUNT * CLUES_PER_DIAGNOSIS;

/// Maximum number of tiles that may be selected at once.
pub const SELECTION_LIMIT: usize = CLUES_PER_DIAGNOSIS;

/// Wrong submissions that end a round.
pub const MAX_MISTAKES: u32 = 4;

/// Lifecycle of the round held by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round has been dealt, or the last one was abandoned.
    Idle,
    /// Tiles may be selected and submitted.
    Playing,
    /// All four groups were decoded.
    Won,
    /// The mistake budget was exhausted.
    Lost,
}

impl RoundPhase {
    /// Reports whether the round reached a final outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// What happens to the selection after a submission misses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionAfterMiss {
    /// The selection stays in place; the player deselects tiles manually.
    #[default]
    Retain,
    /// The selection is emptied after the mistake is recorded.
    Clear,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures how the world treats the selection after a miss.
    ConfigureRules {
        /// Selection policy applied to subsequent misses.
        selection_after_miss: SelectionAfterMiss,
    },
    /// Asks the dealer for a fresh board. The world itself does not react.
    RequestRound,
    /// Replaces any current round with a new one played on the provided board.
    StartRound {
        /// Board dealt for the new round.
        board: Board,
    },
    /// Toggles the selection state of a tile.
    SelectTile {
        /// Tile targeted by the player.
        tile: TileId,
    },
    /// Submits the current four-tile selection as a group.
    SubmitSelection,
    /// Empties the current selection.
    ClearSelection,
    /// Discards the current round and returns the world to idle.
    AbandonRound,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a freshly dealt round is ready for play.
    RoundStarted,
    /// Confirms that a tile joined the selection.
    TileSelected {
        /// Tile that was selected.
        tile: TileId,
    },
    /// Confirms that a tile left the selection.
    TileDeselected {
        /// Tile that was deselected.
        tile: TileId,
    },
    /// Reports that a selection toggle was ignored.
    SelectionRejected {
        /// Tile targeted by the request.
        tile: TileId,
        /// Specific reason the toggle was ignored.
        reason: SelectionError,
    },
    /// Confirms that the selection was emptied.
    SelectionCleared,
    /// Confirms that the submitted tiles formed a group.
    GroupFound {
        /// Group that was decoded.
        group: GroupId,
        /// Tiles submitted for the group.
        tiles: [TileId; CLUES_PER_DIAGNOSIS],
        /// Full record of the decoded diagnosis.
        diagnosis: Diagnosis,
    },
    /// Reports that the submitted tiles did not share a group.
    SubmissionMissed {
        /// Mistakes recorded so far in the round, including this one.
        mistakes: u32,
    },
    /// Reports that a submission was ignored.
    SubmissionRejected {
        /// Specific reason the submission was ignored.
        reason: SubmissionError,
    },
    /// Announces that every group was decoded.
    RoundWon,
    /// Announces that the mistake budget was exhausted.
    RoundLost,
    /// Confirms that the round was discarded.
    RoundAbandoned,
    /// Reports that a decoded diagnosis entered the unlocked collection for the first time.
    DiagnosisUnlocked {
        /// Name of the newly unlocked diagnosis.
        name: String,
    },
}

/// Reasons a selection toggle may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionError {
    /// No round is in progress.
    NoRound,
    /// The round already ended.
    RoundOver,
    /// The identifier does not name a tile on the board.
    UnknownTile,
    /// The tile belongs to a group that was already decoded.
    AlreadyFound,
    /// Four tiles are already selected.
    SelectionFull,
}

/// Reasons a submission may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionError {
    /// No round is in progress.
    NoRound,
    /// The round already ended.
    RoundOver,
    /// The selection does not hold exactly four tiles.
    IncompleteSelection {
        /// Number of tiles selected at the time of submission.
        selected: usize,
    },
}
