//! Shortest edit script over token sequences.
//!
//! Greedy Myers diff with a saved trace for backtracking. Inputs here are
//! clause-sized token sequences, so the quadratic worst case only matters
//! for pathological pairs; those bail out to a whole-sequence replacement
//! rather than burning memory on an exact script.

/// One step of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Token at this index of the base sequence matches the compared one
    Equal(usize),
    /// Token at this index of the base sequence was removed
    Removed(usize),
    /// Token at this index of the compared sequence was added
    Added(usize),
}

/// Edit distance above which the exact script is abandoned.
const MAX_EDIT_DISTANCE: usize = 1024;

/// Compute an edit script turning `a` into `b`, in sequence order.
pub fn diff<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Step> {
    let n = a.len();
    let m = b.len();
    if n == 0 && m == 0 {
        return Vec::new();
    }
    if n == 0 {
        return (0..m).map(Step::Added).collect();
    }
    if m == 0 {
        return (0..n).map(Step::Removed).collect();
    }

    match shortest_edit(a, b) {
        Some((trace, d)) => backtrack(&trace, d, n, m),
        None => {
            log::debug!(
                "edit distance exceeded {}; falling back to whole-sequence replacement",
                MAX_EDIT_DISTANCE
            );
            (0..n)
                .map(Step::Removed)
                .chain((0..m).map(Step::Added))
                .collect()
        }
    }
}

/// Forward pass: returns the per-distance V snapshots and the distance at
/// which the end point was reached.
fn shortest_edit<T: PartialEq>(a: &[T], b: &[T]) -> Option<(Vec<Vec<usize>>, usize)> {
    let n = a.len();
    let m = b.len();
    let max = (n + m).min(MAX_EDIT_DISTANCE);
    let offset = n + m;
    let mut v = vec![0usize; 2 * (n + m) + 1];
    let mut trace: Vec<Vec<usize>> = Vec::new();

    for d in 0..=max {
        trace.push(v.clone());
        let d_i = d as isize;
        let mut k = -d_i;
        while k <= d_i {
            let index = (k + offset as isize) as usize;
            let mut x = if k == -d_i || (k != d_i && v[index - 1] < v[index + 1]) {
                v[index + 1]
            } else {
                v[index - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            while x < n && y < m && a[x] == b[y] {
                x += 1;
                y += 1;
            }
            v[index] = x;
            if x >= n && y >= m {
                return Some((trace, d));
            }
            k += 2;
        }
    }
    None
}

/// Walk the trace back from (n, m) to (0, 0), emitting steps in reverse.
///
/// Signed arithmetic throughout: on the d = 0 diagonal the predecessor y
/// is legitimately -1, which must not wrap.
fn backtrack(trace: &[Vec<usize>], d: usize, n: usize, m: usize) -> Vec<Step> {
    let offset = (n + m) as isize;
    let mut steps: Vec<Step> = Vec::new();
    let mut x = n as isize;
    let mut y = m as isize;

    for d in (0..=d).rev() {
        let v = &trace[d];
        let d_i = d as isize;
        let k = x - y;

        let prev_k = if k == -d_i
            || (k != d_i && v[(k - 1 + offset) as usize] < v[(k + 1 + offset) as usize])
        {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + offset) as usize] as isize;
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            steps.push(Step::Equal(x as usize - 1));
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                steps.push(Step::Added(y as usize - 1));
            } else {
                steps.push(Step::Removed(x as usize - 1));
            }
            x = prev_x;
            y = prev_y;
        }
    }

    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(steps: &[Step], a: &[&str], b: &[&str]) -> Vec<String> {
        steps
            .iter()
            .filter_map(|step| match step {
                Step::Equal(i) => Some(a[*i].to_string()),
                Step::Added(j) => Some(b[*j].to_string()),
                Step::Removed(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_identical_sequences() {
        let a = ["x", "y", "z"];
        let steps = diff(&a, &a);
        assert_eq!(steps, vec![Step::Equal(0), Step::Equal(1), Step::Equal(2)]);
    }

    #[test]
    fn test_empty_sides() {
        let empty: [&str; 0] = [];
        assert!(diff(&empty, &empty).is_empty());
        assert_eq!(diff(&empty, &["a"]), vec![Step::Added(0)]);
        assert_eq!(diff(&["a"], &empty), vec![Step::Removed(0)]);
    }

    #[test]
    fn test_single_substitution() {
        let a = ["five", "years"];
        let b = ["seven", "years"];
        let steps = diff(&a, &b);
        assert!(steps.contains(&Step::Removed(0)));
        assert!(steps.contains(&Step::Added(0)));
        assert!(steps.contains(&Step::Equal(1)));
    }

    #[test]
    fn test_script_reconstructs_target() {
        let a = ["the", "quick", "brown", "fox"];
        let b = ["the", "slow", "brown", "dog", "fox"];
        let steps = diff(&a, &b);
        assert_eq!(apply(&steps, &a, &b), b);
    }

    #[test]
    fn test_disjoint_sequences() {
        let a = ["a", "b"];
        let b = ["c", "d", "e"];
        let steps = diff(&a, &b);
        assert_eq!(apply(&steps, &a, &b), b);
        let removed = steps.iter().filter(|s| matches!(s, Step::Removed(_))).count();
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_steps_preserve_base_order() {
        let a = ["1", "2", "3", "4", "5"];
        let b = ["1", "3", "5"];
        let steps = diff(&a, &b);
        let equals: Vec<usize> = steps
            .iter()
            .filter_map(|s| match s {
                Step::Equal(i) => Some(*i),
                _ => None,
            })
            .collect();
        assert_eq!(equals, vec![0, 2, 4]);
    }
}
