/// Fractional ordering keys.
///
/// Columns and notes carry an `f64` order instead of a dense index, so an item
/// can be placed between two siblings without renumbering anything else.
/// Keys are plain floats: inserting at the same spot over and over halves the
/// gap each time and eventually runs out of precision. Nothing here compacts.
use crate::types::Order;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    #[error("below {below} and above {above} cannot be the same")]
    InvalidRange { below: Order, above: Order },
}

/// Compute `count` ordering keys for items inserted between `below` and `above`.
///
/// - both bounds: evenly spaced strictly inside the range
/// - only `above` (list head): evenly spaced between 0 and `above`
/// - only `below` (list tail): `below + 1`, `below + 2`, ...
/// - neither (empty list): `1..=count`
pub fn rank(
    below: Option<Order>,
    above: Option<Order>,
    count: usize,
) -> Result<Vec<Order>, RankError> {
    let (start, step) = match (below, above) {
        (Some(below), Some(above)) if below == above => {
            return Err(RankError::InvalidRange { below, above });
        }
        (Some(below), Some(above)) => {
            let step = (above - below) / (count as f64 + 1.0);
            (below + step, step)
        }
        (None, Some(above)) => {
            let step = above / (count as f64 + 1.0);
            (step, step)
        }
        (Some(below), None) => (below + 1.0, 1.0),
        (None, None) => (1.0, 1.0),
    };
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// Single-key form of [`rank`].
pub fn rank_one(below: Option<Order>, above: Option<Order>) -> Result<Order, RankError> {
    rank(below, above, 1).map(|keys| keys[0])
}

/// Order assigned when appending to a list that already has `sibling_count` items.
pub fn append_order(sibling_count: usize) -> Order {
    sibling_count as f64 + 1.0
}
