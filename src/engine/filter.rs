//! Fragment filtering.

use crate::config::ArityRule;
use crate::model::Fragment;

/// Rejects fragments too narrow to be data.
///
/// Stray decorative text and partial captions routinely come back from page
/// extraction as one- or two-column fragments; concatenating them with real
/// data would poison the table, so they are dropped before alignment.
#[derive(Debug, Clone, Copy)]
pub struct FragmentFilter {
    rule: ArityRule,
}

impl FragmentFilter {
    /// Create a filter with the given arity rule.
    pub fn new(rule: ArityRule) -> Self {
        Self { rule }
    }

    /// Whether the fragment is usable data. Pure predicate.
    pub fn accepts(&self, fragment: &Fragment) -> bool {
        !fragment.is_empty() && self.rule.accepts(fragment.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn fragment_of_width(width: usize) -> Fragment {
        Fragment::with_rows(1, vec![vec![Cell::text("x"); width]])
    }

    #[test]
    fn test_at_least_rule() {
        let filter = FragmentFilter::new(ArityRule::AtLeast(6));
        assert!(filter.accepts(&fragment_of_width(6)));
        assert!(filter.accepts(&fragment_of_width(16)));
        assert!(!filter.accepts(&fragment_of_width(5)));
    }

    #[test]
    fn test_exact_rule() {
        let filter = FragmentFilter::new(ArityRule::Exactly(16));
        assert!(filter.accepts(&fragment_of_width(16)));
        assert!(!filter.accepts(&fragment_of_width(15)));
        assert!(!filter.accepts(&fragment_of_width(17)));
    }

    #[test]
    fn test_empty_fragment_rejected() {
        let filter = FragmentFilter::new(ArityRule::AtLeast(1));
        assert!(!filter.accepts(&Fragment::new(3)));
    }
}
