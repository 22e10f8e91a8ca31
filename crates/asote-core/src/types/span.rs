use std::fmt;

use serde::{Deserialize, Serialize};

use super::label::EntityLabel;

/// A contiguous token range. Both offsets are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Builds the covering span of a list of token indices.
    ///
    /// Returns `None` for an empty list.
    pub fn from_indices(indices: &[usize]) -> Option<Self> {
        let start = *indices.iter().min()?;
        let end = *indices.iter().max()?;
        Some(Self { start, end })
    }

    /// Number of tokens covered.
    #[must_use]
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    /// Midpoint position, used as the span's location for distance measures.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) as f64 / 2.0
    }

    /// Returns `true` if the two spans share at least one token.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Joins the covered tokens with single spaces.
    pub fn text(&self, tokens: &[String]) -> String {
        let end = (self.end + 1).min(tokens.len());
        let start = self.start.min(end);
        tokens[start..end].join(" ")
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// A labeled gold span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    pub span: Span,
    pub label: EntityLabel,
}

impl Entity {
    #[must_use]
    pub fn new(span: Span, label: EntityLabel) -> Self {
        Self { span, label }
    }

    /// Renders `"span text (LABEL)"`.
    pub fn as_text(&self, tokens: &[String]) -> String {
        format!("{} ({})", self.span.text(tokens), self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn span_from_indices_covers_range() {
        assert_eq!(Span::from_indices(&[4, 2, 3]), Some(Span::new(2, 4)));
        assert_eq!(Span::from_indices(&[7]), Some(Span::new(7, 7)));
        assert_eq!(Span::from_indices(&[]), None);
    }

    #[test]
    fn span_width_and_midpoint() {
        let span = Span::new(2, 4);
        assert_eq!(span.width(), 3);
        assert_eq!(span.midpoint(), 3.0);
        assert_eq!(Span::new(5, 5).width(), 1);
    }

    #[test]
    fn span_overlap() {
        assert!(Span::new(0, 2).overlaps(&Span::new(2, 3)));
        assert!(Span::new(0, 5).overlaps(&Span::new(2, 3)));
        assert!(!Span::new(0, 1).overlaps(&Span::new(2, 3)));
    }

    #[test]
    fn entity_text() {
        let toks = tokens("the battery life is great");
        let entity = Entity::new(Span::new(1, 2), EntityLabel::Target);
        assert_eq!(entity.as_text(&toks), "battery life (TARGET)");
    }

    #[test]
    fn entities_sort_by_span_then_label() {
        let mut entities = vec![
            Entity::new(Span::new(3, 3), EntityLabel::Opinion),
            Entity::new(Span::new(1, 2), EntityLabel::Target),
            Entity::new(Span::new(1, 2), EntityLabel::Opinion),
        ];
        entities.sort();
        assert_eq!(entities[0].label, EntityLabel::Opinion);
        assert_eq!(entities[1].label, EntityLabel::Target);
        assert_eq!(entities[2].span, Span::new(3, 3));
    }
}
