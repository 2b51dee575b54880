#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dealing system responsible for turning round requests into shuffled boards.

use gene_link_core::{
    Board, BoardError, Command, ConfigurationError, ContentPool, Diagnosis, BOARD_SIZE,
    GROUP_COUNT,
};
use rand::{seq::SliceRandom, Rng};

/// Reasons a round could not be dealt.
#[derive(Debug, thiserror::Error)]
pub enum DealError {
    /// The pool cannot supply a hand.
    #[error(transparent)]
    Pool(#[from] ConfigurationError),
    /// The hand and arrangement did not form a valid board.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Pure system that answers [`Command::RequestRound`] with a freshly dealt [`Command::StartRound`].
///
/// The random source is injected so callers decide between reproducible seeds
/// and entropy.
#[derive(Debug)]
pub struct Dealer<R> {
    rng: R,
}

impl<R: Rng> Dealer<R> {
    /// Creates a new dealer drawing from the provided random source.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes issued commands and emits one start command per round request.
    pub fn handle(&mut self, commands: &[Command], pool: &ContentPool, out: &mut Vec<Command>) {
        for command in commands {
            if !matches!(command, Command::RequestRound) {
                continue;
            }

            match self.deal(pool) {
                Ok(board) => out.push(Command::StartRound { board }),
                Err(error) => log::error!("failed to deal a round: {error}"),
            }
        }
    }

    /// Deals a board from four distinct diagnoses of the pool.
    pub fn deal(&mut self, pool: &ContentPool) -> Result<Board, DealError> {
        let picks = sample_hand(pool.len(), &mut self.rng)?;
        let hand: [Diagnosis; GROUP_COUNT] = picks.map(|index| pool.diagnoses()[index].clone());

        let mut order: Vec<usize> = (0..BOARD_SIZE).collect();
        order.shuffle(&mut self.rng);

        Ok(Board::deal(hand, &order)?)
    }
}

/// Draws four distinct indices below `pool_len` by reject-and-retry sampling.
///
/// Each draw is uniform over the whole pool and discarded if it repeats an
/// earlier pick, so every four-element ordered selection is equally likely.
/// Pools with fewer than four entries are rejected before any draw.
pub fn sample_hand<R: Rng + ?Sized>(
    pool_len: usize,
    rng: &mut R,
) -> Result<[usize; GROUP_COUNT], ConfigurationError> {
    if pool_len < GROUP_COUNT {
        return Err(ConfigurationError::PoolTooSmall { found: pool_len });
    }
    let mut picks = [0; GROUP_COUNT];
    let mut filled = 0;
    while filled < GROUP_COUNT {
        let candidate = rng.gen_range(0..pool_len);
        if !picks[..filled].contains(&candidate) {
            picks[filled] = candidate;
            filled += 1;
        }
    }
    Ok(picks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn sample_hand_uses_every_entry_of_minimal_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            let mut picks = sample_hand(4, &mut rng).expect("four entries suffice");
            picks.sort_unstable();
            assert_eq!(picks, [0, 1, 2, 3]);
        }
    }

    #[test]
    fn sample_hand_rejects_pools_below_four_entries() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for pool_len in 0..GROUP_COUNT {
            assert!(matches!(
                sample_hand(pool_len, &mut rng),
                Err(ConfigurationError::PoolTooSmall { found }) if found == pool_len
            ));
        }
    }

    #[test]
    fn sample_hand_never_repeats_an_index() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..256 {
            let picks = sample_hand(6, &mut rng).expect("six entries suffice");
            for (position, pick) in picks.iter().enumerate() {
                assert!(*pick < 6);
                assert!(!picks[..position].contains(pick), "repeated pick in {picks:?}");
            }
        }
    }
}
