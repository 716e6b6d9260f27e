//! Selector-to-path matching.
//!
//! Matching walks a selector and a path segment by segment, accumulating a
//! [`Specificity`]. A literal or pattern segment must match the whole path
//! element at the front of the path. A wildcard tries to skip 0, 1, 2, ...
//! leading path elements before matching the rest of the selector.
//!
//! In prefix mode the path may run out before the selector does; the
//! unconsumed selector segments are then returned, describing what the
//! selector can still reach below that path.

use super::grammar::Segment;
use super::Specificity;

/// How a wildcard chooses between skip counts that all produce a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// The smallest skip count that lets the rest of the selector match wins.
    #[default]
    MinimalSpan,
    /// Every skip count is tried and the highest specificity wins. Ties go
    /// to the smallest skip count.
    BestSpecificity,
}

/// A successful match: the specificity and any selector segments left over
/// (always empty outside prefix mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'s> {
    pub remaining: &'s [Segment],
    pub specificity: Specificity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Exact,
    Pattern,
}

impl Segment {
    fn hit(&self, name: &str) -> Option<Hit> {
        let matched = match self {
            Segment::Literal(literal) => literal == name,
            Segment::Pattern(pattern) => pattern.is_match(name),
            Segment::Wildcard => return None,
        };
        if !matched {
            None
        } else if self.as_str() == name {
            Some(Hit::Exact)
        } else {
            Some(Hit::Pattern)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Matches a whole path, returning the specificity on success.
    pub fn matches<S: AsRef<str>>(
        &self,
        selector: &[Segment],
        path: &[S],
        base: Specificity,
    ) -> Option<Specificity> {
        self.step(selector, path, base, false)
            .map(|m| m.specificity)
    }

    /// Matches `path` as a prefix of the paths the selector can reach.
    pub fn match_prefix<'s, S: AsRef<str>>(
        &self,
        selector: &'s [Segment],
        path: &[S],
        base: Specificity,
    ) -> Option<Match<'s>> {
        self.step(selector, path, base, true)
    }

    fn step<'s, S: AsRef<str>>(
        &self,
        selector: &'s [Segment],
        path: &[S],
        specificity: Specificity,
        prefix: bool,
    ) -> Option<Match<'s>> {
        let Some((name, path_tail)) = path.split_first() else {
            return (prefix || selector.is_empty()).then_some(Match {
                remaining: selector,
                specificity,
            });
        };
        let (head, selector_tail) = selector.split_first()?;

        if head.is_wildcard() {
            return self.span(selector, selector_tail, path, specificity, prefix);
        }

        let specificity = match head.hit(name.as_ref())? {
            Hit::Exact => specificity.with_exact(),
            Hit::Pattern => specificity.with_pattern(),
        };
        self.step(selector_tail, path_tail, specificity, prefix)
    }

    /// Resolves a wildcard at the head of `selector` against `path`.
    fn span<'s, S: AsRef<str>>(
        &self,
        selector: &'s [Segment],
        tail: &'s [Segment],
        path: &[S],
        specificity: Specificity,
        prefix: bool,
    ) -> Option<Match<'s>> {
        // In prefix mode, skipping the whole path leaves the wildcard itself
        // unconsumed; that case is the fallback below.
        let max_skip = if prefix { path.len() } else { path.len() + 1 };
        let mut candidates =
            (0..max_skip).filter_map(|skip| self.step(tail, &path[skip..], specificity, prefix));

        let found = match self.policy {
            MatchPolicy::MinimalSpan => candidates.next(),
            MatchPolicy::BestSpecificity => candidates.fold(None, |best: Option<Match<'s>>, m| {
                match best {
                    Some(b) if b.specificity >= m.specificity => Some(b),
                    _ => Some(m),
                }
            }),
        };

        match found {
            Some(m) => Some(m),
            None if prefix => Some(Match {
                remaining: selector,
                specificity,
            }),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::grammar::{render, Selector};
    use rstest::rstest;

    fn matches(selector: &str, path: &str) -> Option<Specificity> {
        let selector = Selector::parse(&[selector]).unwrap();
        let path: Vec<&str> = path.split('/').collect();
        Matcher::default().matches(selector.segments(), &path, Specificity::ZERO)
    }

    fn prefix(selector: &str, path: &str) -> Option<(String, Specificity)> {
        let selector = Selector::parse(&[selector]).unwrap();
        let path: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        };
        Matcher::default()
            .match_prefix(selector.segments(), &path, Specificity::ZERO)
            .map(|m| (render(m.remaining), m.specificity))
    }

    #[rstest]
    #[case("lrate", "lrate", true)]
    #[case(".*/lrate", "aa/lrate", true)]
    #[case(".*/lrate", "aa/bb/lrate", false)]
    #[case("//lrate", "aa/lrate", true)]
    #[case("//lrate", "aa/bb/lrate", true)]
    #[case("//lrate", "lrate", true)]
    #[case("aa", "bb", false)]
    #[case("aa", "aa/bb", false)]
    #[case("aa/bb", "aa", false)]
    #[case("a.", "ab", true)]
    #[case("a.", "abc", false)]
    fn test_match(#[case] selector: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(matches(selector, path).is_some(), expected);
    }

    #[test]
    fn specificity_counts_exact_and_pattern_segments() {
        assert_eq!(matches("aa/lrate", "aa/lrate"), Some(Specificity::new(2, 0)));
        assert_eq!(matches(".*/lrate", "aa/lrate"), Some(Specificity::new(1, 1)));
        assert_eq!(matches("//lrate", "aa/bb/lrate"), Some(Specificity::new(1, 0)));
        assert_eq!(
            matches("//W.*/init_fun", "mlp/W0/init_fun"),
            Some(Specificity::new(1, 1))
        );
    }

    #[test]
    fn wildcard_matches_any_depth() {
        assert_eq!(matches("//x", "a/x"), Some(Specificity::new(1, 0)));
        assert_eq!(matches("//x", "a/b/x"), Some(Specificity::new(1, 0)));
        assert_eq!(matches("//x", "a/x/b/x"), Some(Specificity::new(1, 0)));
        assert_eq!(matches("a//x", "b/x"), None);
    }

    #[test]
    fn prefix_mode_consumes_location() {
        assert_eq!(prefix("block1/seed", "block1"), Some(("seed".into(), Specificity::new(1, 0))));
        assert_eq!(prefix("block1/seed", "block2"), None);
        assert_eq!(prefix("block1/seed", ""), Some(("block1/seed".into(), Specificity::ZERO)));
        assert_eq!(prefix("block1", "block1/sb1"), None);
    }

    #[test]
    fn prefix_mode_keeps_unresolved_wildcards() {
        assert_eq!(prefix("//seed", "block1"), Some(("//seed".into(), Specificity::ZERO)));
        assert_eq!(
            prefix("//seed", "block1/sb2"),
            Some(("//seed".into(), Specificity::ZERO))
        );
    }

    #[test]
    fn prefix_mode_takes_leftmost_wildcard_span() {
        // The wildcard spans only `a`, leaving `y` below `a/x`.
        assert_eq!(prefix("//x/y", "a/x"), Some(("y".into(), Specificity::new(1, 0))));
        // `a/x/b/x`: the leftmost `x` (skip count 1) is taken, which then
        // fails on `b`, so the next span (skip count 3) is used.
        assert_eq!(
            prefix("//x/y", "a/x/b/x"),
            Some(("y".into(), Specificity::new(1, 0)))
        );
        assert_eq!(prefix("//x/y", "x/q"), Some(("//x/y".into(), Specificity::ZERO)));
    }

    #[test]
    fn policies_agree_on_full_matches() {
        let best = Matcher::new(MatchPolicy::BestSpecificity);
        let minimal = Matcher::new(MatchPolicy::MinimalSpan);
        for (selector, path) in [
            ("//.*//b", "b/b/b"),
            ("//a//b", "a/a/b"),
            ("//W.*/init_fun", "mlp/W0/init_fun"),
        ] {
            let selector = Selector::parse(&[selector]).unwrap();
            let path: Vec<&str> = path.split('/').collect();
            assert_eq!(
                best.matches(selector.segments(), &path, Specificity::ZERO),
                minimal.matches(selector.segments(), &path, Specificity::ZERO)
            );
        }
    }

    #[test]
    fn policies_agree_on_prefix_matches() {
        let best = Matcher::new(MatchPolicy::BestSpecificity);
        let minimal = Matcher::new(MatchPolicy::MinimalSpan);
        let cases = [("//.*/a/b", "a/a"), ("//x/y", "a/x/b/x"), ("//a//b/c", "a/z/a/b")];
        for (selector, path) in cases {
            let selector = Selector::parse(&[selector]).unwrap();
            let path: Vec<&str> = path.split('/').collect();
            let b = best.match_prefix(selector.segments(), &path, Specificity::ZERO).unwrap();
            let m = minimal.match_prefix(selector.segments(), &path, Specificity::ZERO).unwrap();
            assert_eq!(b.specificity, m.specificity);
        }
    }

    #[test]
    fn matching_is_deterministic() {
        let selector = Selector::parse(&["//b.*//c"]).unwrap();
        let path = ["a", "bb", "x", "c"];
        let first = Matcher::default().matches(selector.segments(), &path, Specificity::ZERO);
        for _ in 0..10 {
            assert_eq!(
                Matcher::default().matches(selector.segments(), &path, Specificity::ZERO),
                first
            );
        }
        assert_eq!(first, Some(Specificity::new(1, 1)));
    }
}
