//! Section context propagation.

/// Carries the current section value forward across data rows.
///
/// Some layouts interleave category banners (a species or product-group
/// name) directly in the data stream with no dedicated column. The
/// propagator holds the most recent banner and stamps it onto every data
/// row until the next one. Reset (fresh instance) at the start of each
/// document.
#[derive(Debug, Default)]
pub struct ContextPropagator {
    current: Option<String>,
}

impl ContextPropagator {
    /// A propagator with no section yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a section marker's value.
    pub fn set(&mut self, section: impl Into<String>) {
        self.current = Some(section.into());
    }

    /// The section to stamp on the next data row, if any marker has been
    /// seen.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown() {
        assert!(ContextPropagator::new().current().is_none());
    }

    #[test]
    fn test_marker_updates_until_next() {
        let mut propagator = ContextPropagator::new();
        propagator.set("FISH");
        assert_eq!(propagator.current(), Some("FISH"));
        assert_eq!(propagator.current(), Some("FISH"));

        propagator.set("SHRIMP");
        assert_eq!(propagator.current(), Some("SHRIMP"));
    }
}
