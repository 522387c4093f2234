//! Property paths between a tracked binding and the value of interest.
//!
//! A path is stored right-to-left: the last segment is the one nearest the
//! root reference and is consumed first. `slot.default` tracked from the
//! result of `useSlot()` is therefore stored as `[Any, "slot"]`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Matches any single property name.
    Any,
    Name(String),
}

impl PathSegment {
    pub fn name(name: impl Into<String>) -> Self {
        PathSegment::Name(name.into())
    }

    pub fn matches(&self, property: &str) -> bool {
        match self {
            PathSegment::Any => true,
            PathSegment::Name(name) => name == property,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, PathSegment::Any)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Any => f.write_str("[any]"),
            PathSegment::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a path from segments already in storage order (nearest last).
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Builds a path from segments in access order, the way they would be
    /// written in source: `from_access_order([slot, Any])` for `x.slot.*`.
    pub fn from_access_order<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = PathSegment>,
    {
        let mut segments: Vec<PathSegment> = segments.into_iter().collect();
        segments.reverse();
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segment that the next property access must match.
    pub fn next_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn consume(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Copy of the path with the next segment already consumed.
    pub fn without_next(&self) -> Self {
        let mut rest = self.clone();
        rest.consume();
        rest
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Remaining segments joined in access order, e.g. `useSlot` or `slot.default`.
    pub fn to_access_chain(&self) -> String {
        self.segments
            .iter()
            .rev()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_order_is_reversed_for_storage() {
        let path = PropertyPath::from_access_order([PathSegment::name("slot"), PathSegment::Any]);
        assert_eq!(path.segments(), &[PathSegment::Any, PathSegment::name("slot")]);
        assert_eq!(path.next_segment(), Some(&PathSegment::name("slot")));
    }

    #[test]
    fn test_without_next_leaves_original_untouched() {
        let path = PropertyPath::new(vec![PathSegment::name("d"), PathSegment::name("c")]);
        let rest = path.without_next();
        assert_eq!(rest.segments(), &[PathSegment::name("d")]);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_access_chain_reads_nearest_first() {
        let path = PropertyPath::new(vec![PathSegment::name("c"), PathSegment::name("b")]);
        assert_eq!(path.to_access_chain(), "b.c");
        assert_eq!(PropertyPath::empty().to_access_chain(), "");
    }

    #[test]
    fn test_wildcard_matches_everything() {
        assert!(PathSegment::Any.matches("anything"));
        assert!(PathSegment::name("slot").matches("slot"));
        assert!(!PathSegment::name("slot").matches("slots"));
    }
}
