//! Split points of a pattern body.
//!
//! A split point is an offset into a balanced body at which the relative
//! stack depth is back at 0. Cutting the body there and swapping the halves
//! yields another balanced body: a rotation of the same cycle.

use crate::parser::Event;
use std::cmp::Ordering;

/// Offsets `0` and every interior `i` where `body[..i]` is balanced
///
/// Offset `0` (the unrotated body) always comes first.
pub fn split_points(body: &[Event]) -> Vec<usize> {
    let mut points = vec![0];
    let mut depth = 0usize;

    for (i, event) in body.iter().enumerate() {
        depth = event.step_depth(depth).unwrap_or(0);
        if depth == 0 && i + 1 < body.len() {
            points.push(i + 1);
        }
    }

    points
}

/// Compare the rotations of `body` starting at offsets `a` and `b`
///
/// Position `k` of the rotation from `s` is `body[(s + k) % len]`.
pub fn compare_rotations(body: &[Event], a: usize, b: usize) -> Ordering {
    let len = body.len();
    (0..len)
        .map(|k| body[(a + k) % len].cmp(&body[(b + k) % len]))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Trace;

    #[test]
    fn test_split_points_flat_body() {
        let trace = Trace::from_entries(["enter:a", "exit:a", "enter:b", "exit:b"]).unwrap();
        assert_eq!(split_points(trace.body(0, 4)), vec![0, 2]);
    }

    #[test]
    fn test_split_points_nested_body() {
        let trace = Trace::from_entries(["enter:a", "enter:b", "exit:b", "exit:a"]).unwrap();
        assert_eq!(split_points(trace.body(0, 4)), vec![0]);
    }

    #[test]
    fn test_compare_rotations() {
        let trace = Trace::from_entries(["enter:b", "exit:b", "enter:a", "exit:a"]).unwrap();
        let body = trace.body(0, 4);
        assert_eq!(compare_rotations(body, 2, 0), Ordering::Less);
        assert_eq!(compare_rotations(body, 0, 0), Ordering::Equal);
    }
}
