//! Conflict detection and specificity ordering between status code ranges.
//!
//! Two ranges **conflict** when a status code can match both and there is no
//! principled way to pick a winner. Ranges that don't conflict but still
//! overlap are ordered by **specificity**, and the most specific one wins
//! during resolution.
//!
//! Specificity ranks, from most to least specific:
//!
//! 1. single code (`404`)
//! 2. fully bounded (`400-499`)
//! 3. one-sided open (`<=299`, `500+`)
//! 4. universal (`*`)
//!
//! Within a rank, a nested bounded range beats its superset, a left-open range
//! with the smaller upper bound beats a wider one, and a right-open range with
//! the larger lower bound beats a wider one. Anything else is equally specific.
use super::StatusCodeRange;
use std::cmp::Ordering;

/// Returns true when `a` and `b` can not be registered side by side.
///
/// The relation is symmetric.
pub fn conflicts(a: &StatusCodeRange, b: &StatusCodeRange) -> bool {
    if a == b {
        return true;
    }
    if a.is_universal() || b.is_universal() {
        return false;
    }

    match (a.lower(), a.upper(), b.lower(), b.upper()) {
        // Both closed: overlapping without nesting
        (Some(al), Some(au), Some(bl), Some(bu)) => {
            let overlap = al <= bu && bl <= au;
            overlap && !is_subset(a, b) && !is_subset(b, a)
        }
        // Left-open against right-open: the open ends meet
        (None, Some(u), Some(l), None) | (Some(l), None, None, Some(u)) => u >= l,
        // Same side open, or closed against open: ordered by specificity
        _ => false,
    }
}

/// Returns true when every code matched by `inner` is matched by `outer`.
pub fn is_subset(inner: &StatusCodeRange, outer: &StatusCodeRange) -> bool {
    let lower_ok = match (inner.lower(), outer.lower()) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(i), Some(o)) => i >= o,
    };
    let upper_ok = match (inner.upper(), outer.upper()) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(i), Some(o)) => i <= o,
    };

    lower_ok && upper_ok
}

/// Returns true when `a` is strictly more specific than `b`.
pub fn more_specific(a: &StatusCodeRange, b: &StatusCodeRange) -> bool {
    let (ra, rb) = (rank(a), rank(b));
    if ra != rb {
        return ra < rb;
    }

    match ra {
        Rank::Bounded => a != b && is_subset(a, b),
        Rank::Open => match (a.lower(), a.upper(), b.lower(), b.upper()) {
            (None, Some(au), None, Some(bu)) => au < bu,
            (Some(al), None, Some(bl), None) => al > bl,
            _ => false,
        },
        Rank::Single | Rank::Universal => false,
    }
}

/// Orders `a` before `b` when `a` is more specific.
///
/// Equal specificity gives `Ordering::Equal`, so this is only a total order
/// over ranges that may coexist in a registry. Prefer [`more_specific`] when
/// picking a single winner.
pub fn specificity_cmp(a: &StatusCodeRange, b: &StatusCodeRange) -> Ordering {
    if more_specific(a, b) {
        Ordering::Less
    } else if more_specific(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Single,
    Bounded,
    Open,
    Universal,
}

fn rank(r: &StatusCodeRange) -> Rank {
    if r.is_single() {
        Rank::Single
    } else if r.is_bounded() {
        Rank::Bounded
    } else if r.is_universal() {
        Rank::Universal
    } else {
        Rank::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> StatusCodeRange {
        s.parse().unwrap()
    }

    /// Every range shape over a small grid of interesting codes.
    fn grid() -> Vec<StatusCodeRange> {
        const CODES: [u16; 9] = [100, 200, 250, 299, 300, 404, 499, 500, 599];

        let mut out = vec![StatusCodeRange::universal()];
        for (i, &lo) in CODES.iter().enumerate() {
            out.push(StatusCodeRange::single(lo).unwrap());
            out.push(StatusCodeRange::at_most(lo).unwrap());
            out.push(StatusCodeRange::at_least(lo).unwrap());
            for &hi in &CODES[i + 1..] {
                out.push(StatusCodeRange::bounded(lo, hi).unwrap());
            }
        }
        out
    }

    #[test]
    fn identical_ranges_conflict() {
        for x in grid() {
            assert!(conflicts(&x, &x), "{x} should conflict with itself");
        }
    }

    #[test]
    fn disjoint_bounded_ranges_do_not_conflict() {
        assert!(!conflicts(&r("400-499"), &r("500-599")));
        assert!(!conflicts(&r("404"), &r("500-599")));
    }

    #[test]
    fn partially_overlapping_bounded_ranges_conflict() {
        assert!(conflicts(&r("400-499"), &r("450-550")));
        assert!(conflicts(&r("500-599"), &r("450-550")));
        assert!(conflicts(&r("200-300"), &r("300-400")));
    }

    #[test]
    fn nested_bounded_ranges_do_not_conflict() {
        assert!(!conflicts(&r("400-499"), &r("400-450")));
        assert!(!conflicts(&r("400-499"), &r("404")));
        assert!(!conflicts(&r("400-499"), &r("499")));
    }

    #[test]
    fn opposite_open_ranges_conflict_when_ends_meet() {
        assert!(conflicts(&r("<=300"), &r("300+")));
        assert!(conflicts(&r("<=400"), &r("300+")));
        assert!(!conflicts(&r("<=299"), &r("300+")));
        assert!(!conflicts(&r("300+"), &r("<=299")));
    }

    #[test]
    fn same_side_open_ranges_do_not_conflict() {
        assert!(!conflicts(&r("<=299"), &r("<=399")));
        assert!(!conflicts(&r("400+"), &r("500+")));
    }

    #[test]
    fn universal_conflicts_only_with_itself() {
        let any = StatusCodeRange::universal();
        for x in grid() {
            assert_eq!(conflicts(&any, &x), x.is_universal(), "{x}");
        }
    }

    #[test]
    fn closed_against_open_never_conflicts() {
        assert!(!conflicts(&r("200-350"), &r("<=299")));
        assert!(!conflicts(&r("299"), &r("<=299")));
        assert!(!conflicts(&r("200"), &r("<=299")));
        assert!(!conflicts(&r("450-550"), &r("500+")));
    }

    #[test]
    fn conflicts_is_symmetric() {
        let g = grid();
        for a in &g {
            for b in &g {
                assert_eq!(conflicts(a, b), conflicts(b, a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn specificity_ranks() {
        assert!(more_specific(&r("200"), &r("200-299")));
        assert!(more_specific(&r("200"), &r("<=299")));
        assert!(more_specific(&r("200-299"), &r("<=299")));
        assert!(more_specific(&r("200-299"), &r("100+")));
        assert!(more_specific(&r("<=299"), &r("*")));
        assert!(more_specific(&r("500+"), &r("*")));
    }

    #[test]
    fn specificity_within_rank() {
        assert!(more_specific(&r("400-450"), &r("400-499")));
        assert!(!more_specific(&r("400-499"), &r("400-450")));
        assert!(more_specific(&r("<=299"), &r("<=399")));
        assert!(more_specific(&r("500+"), &r("400+")));

        // equal specificity
        assert!(!more_specific(&r("404"), &r("500")));
        assert!(!more_specific(&r("<=299"), &r("500+")));
        assert!(!more_specific(&r("400-450"), &r("460-499")));
        assert!(!more_specific(&r("*"), &r("*")));
    }

    #[test]
    fn specificity_is_irreflexive_and_antisymmetric() {
        let g = grid();
        for a in &g {
            assert!(!more_specific(a, a), "{a}");
            for b in &g {
                assert!(
                    !(more_specific(a, b) && more_specific(b, a)),
                    "{a} and {b} are both more specific than each other"
                );
            }
        }
    }

    #[test]
    fn specificity_is_transitive_for_coexisting_ranges() {
        let g = grid();
        for a in &g {
            for b in &g {
                if conflicts(a, b) || !more_specific(a, b) {
                    continue;
                }
                for c in &g {
                    if conflicts(a, c) || conflicts(b, c) {
                        continue;
                    }
                    if more_specific(b, c) {
                        assert!(more_specific(a, c), "{a} > {b} > {c} but not {a} > {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn specificity_is_transitive_everywhere() {
        let g = grid();
        for a in &g {
            for b in &g {
                if !more_specific(a, b) {
                    continue;
                }
                for c in &g {
                    if more_specific(b, c) {
                        assert!(more_specific(a, c), "{a} > {b} > {c} but not {a} > {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn specificity_cmp_orders_most_specific_first() {
        let mut v = vec![r("*"), r("<=299"), r("200-299"), r("200")];
        v.sort_by(specificity_cmp);
        assert_eq!(v, vec![r("200"), r("200-299"), r("<=299"), r("*")]);
    }

    #[test]
    fn subset_relation() {
        assert!(is_subset(&r("404"), &r("4xx")));
        assert!(is_subset(&r("4xx"), &r("400+")));
        assert!(is_subset(&r("400+"), &r("*")));
        assert!(!is_subset(&r("*"), &r("400+")));
        assert!(!is_subset(&r("<=299"), &r("200-299")));
    }
}
