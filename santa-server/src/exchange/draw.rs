// Draw engine: eligible-subset computation and uniform random selection.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::db::Database;
use crate::exchange::{ExchangeError, Participant};

/// Outcome of a successful draw, returned to the caller as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    pub name: String,
    pub wishlist: Vec<String>,
}

/// Filter `participants` down to the draw-eligible subset: not flagged as
/// excluded or drawn, and not matching `exclude_name`.
pub fn eligible<'a>(
    participants: &'a [Participant],
    exclude_name: Option<&str>,
) -> Vec<&'a Participant> {
    participants
        .iter()
        .filter(|p| p.is_eligible(exclude_name))
        .collect()
}

/// Select one participant uniformly at random from `pool`, or `None` when
/// the pool is empty. Each entry has probability `1/pool.len()`.
pub fn select<'a, R: Rng + ?Sized>(
    pool: &[&'a Participant],
    rng: &mut R,
) -> Option<&'a Participant> {
    pool.choose(rng).copied()
}

/// Perform one draw: fetch the full participant set, pick uniformly from
/// the eligible subset, and persist both exclusion flags on the selection.
///
/// The persist step is conditional on the flags still being clear. If a
/// concurrent draw claimed the same participant first, the update affects
/// no row and the draw re-fetches and retries against the shrunken pool, so
/// two concurrent draws never return the same participant. The pool shrinks
/// by one per successful draw until [`ExchangeError::PoolExhausted`].
pub fn run_draw<R: Rng + ?Sized>(
    db: &Database,
    exclude_name: Option<&str>,
    rng: &mut R,
) -> Result<DrawResult, ExchangeError> {
    loop {
        let participants = db.list_participants()?;
        let pool = eligible(&participants, exclude_name);

        let Some(chosen) = select(&pool, rng) else {
            return Err(ExchangeError::PoolExhausted);
        };

        if db.mark_drawn(chosen.id)? {
            return Ok(DrawResult {
                name: chosen.name.clone(),
                wishlist: chosen.wishlist.clone(),
            });
        }
        // Lost the race to a concurrent draw; the re-fetch sees the
        // participant's flags set and drops them from the pool.
    }
}
