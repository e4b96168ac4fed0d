//! Board generation
//!
//! A board is the ordered sequence of pair keys dealt onto the grid, row-major.
//! New boards are built as `0, 0, 1, 1, ..., n-1, n-1` and then permuted by a
//! [`Shuffler`]; restored boards take their keys verbatim from a snapshot.

use crate::error::{GameError, Result};
use crate::rng::Shuffler;
use crate::snapshot::CardRecord;
use crate::types::{GridSize, PairKey};

/// Reject grids that cannot hold whole pairs.
pub fn validate_grid(grid: GridSize) -> Result<()> {
    if grid.is_valid() {
        Ok(())
    } else {
        Err(GameError::InvalidGridSize {
            width: grid.width,
            height: grid.height,
        })
    }
}

/// Every pair key emitted twice, in ascending order.
pub fn unshuffled_keys(grid: GridSize) -> Result<Vec<PairKey>> {
    validate_grid(grid)?;
    let pairs = grid.total_pairs();
    let mut keys = Vec::with_capacity(grid.cell_count());
    for key in 0..pairs {
        keys.push(key);
        keys.push(key);
    }
    Ok(keys)
}

/// Deal a new board for `grid`.
pub fn generate(grid: GridSize, shuffler: &mut dyn Shuffler) -> Result<Vec<PairKey>> {
    let mut keys = unshuffled_keys(grid)?;
    shuffler.shuffle(&mut keys);
    Ok(keys)
}

/// Keys of a saved board, position for position. No shuffling.
pub fn reconstruct(cards: &[CardRecord]) -> Vec<PairKey> {
    cards.iter().map(|c| c.pair_key).collect()
}

/// True when every key present appears exactly twice.
pub fn is_paired(keys: &[PairKey]) -> bool {
    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    sorted.len() % 2 == 0
        && sorted.chunks(2).all(|pair| pair[0] == pair[1])
        && sorted.windows(3).all(|w| !(w[0] == w[1] && w[1] == w[2]))
}
