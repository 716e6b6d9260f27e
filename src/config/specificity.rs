use std::fmt;

/// How specifically a selector matched a path.
///
/// Compared lexicographically: more exact literal matches always outrank
/// more pattern matches. Wildcards contribute nothing. Field order matters
/// for the derived ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    pub exact: usize,
    pub pattern: usize,
}

impl Specificity {
    pub const ZERO: Specificity = Specificity {
        exact: 0,
        pattern: 0,
    };

    pub const fn new(exact: usize, pattern: usize) -> Self {
        Self { exact, pattern }
    }

    pub(crate) fn with_exact(self) -> Self {
        Self {
            exact: self.exact + 1,
            ..self
        }
    }

    pub(crate) fn with_pattern(self) -> Self {
        Self {
            pattern: self.pattern + 1,
            ..self
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.exact, self.pattern)
    }
}
