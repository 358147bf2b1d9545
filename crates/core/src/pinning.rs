//! Pinned-news planning.
//!
//! The homepage shows at most [`MAX_PINNED_NEWS`] pinned news items in a
//! fixed order. Every function here takes the currently pinned ids ordered by
//! `pin_order` (index 0 is order 1) and returns the complete new ordering,
//! which the repository then writes back in one transaction.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Upper bound on simultaneously pinned news items.
pub const MAX_PINNED_NEWS: usize = 3;

/// Direction for [`plan_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    /// Towards order 1.
    Up,
    Down,
}

/// Pin `id` at the end of the list. Pinning an already pinned item is a no-op.
pub fn plan_pin(pinned: &[DbId], id: DbId) -> Result<Vec<DbId>, CoreError> {
    if pinned.contains(&id) {
        return Ok(pinned.to_vec());
    }
    if pinned.len() >= MAX_PINNED_NEWS {
        return Err(CoreError::Conflict(format!(
            "At most {MAX_PINNED_NEWS} news items can be pinned. Unpin one first."
        )));
    }
    let mut next = pinned.to_vec();
    next.push(id);
    Ok(next)
}

/// Remove `id` and close the gap it leaves.
pub fn plan_unpin(pinned: &[DbId], id: DbId) -> Vec<DbId> {
    pinned.iter().copied().filter(|p| *p != id).collect()
}

/// Swap `id` with its neighbour in `direction`.
pub fn plan_move(
    pinned: &[DbId],
    id: DbId,
    direction: PinDirection,
) -> Result<Vec<DbId>, CoreError> {
    let idx = pinned
        .iter()
        .position(|p| *p == id)
        .ok_or_else(|| CoreError::Validation(format!("News item {id} is not pinned")))?;

    let target = match direction {
        PinDirection::Up if idx > 0 => idx - 1,
        PinDirection::Down if idx + 1 < pinned.len() => idx + 1,
        _ => {
            return Err(CoreError::Validation(format!(
                "News item {id} cannot move further {}",
                match direction {
                    PinDirection::Up => "up",
                    PinDirection::Down => "down",
                }
            )))
        }
    };

    let mut next = pinned.to_vec();
    next.swap(idx, target);
    Ok(next)
}

/// Replace the order wholesale. `requested` must be a permutation of `pinned`.
pub fn plan_reorder(pinned: &[DbId], requested: &[DbId]) -> Result<Vec<DbId>, CoreError> {
    let is_permutation = requested.len() == pinned.len()
        && requested.iter().all(|id| pinned.contains(id))
        && requested
            .iter()
            .enumerate()
            .all(|(i, id)| !requested[..i].contains(id));

    if !is_permutation {
        return Err(CoreError::Validation(format!(
            "Reorder must list exactly the pinned news items {pinned:?}"
        )));
    }
    Ok(requested.to_vec())
}

/// Pair each id with its 1-based `pin_order`.
pub fn pin_orders(plan: &[DbId]) -> Vec<(DbId, i16)> {
    plan.iter()
        .zip(1i16..)
        .map(|(id, order)| (*id, order))
        .collect()
}
