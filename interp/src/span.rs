use crate::position::Position;

/// A region over a string.
#[derive(Debug, Clone, Copy)]
pub struct Span<'i> {
    s: &'i str,
    start: usize,
    end: usize,
}

impl<'i> Span<'i> {
    /// The region between two positions on the same input.
    pub fn between(start: Position<'i>, end: Position<'i>) -> Self {
        debug_assert!(std::ptr::eq(start.input(), end.input()));
        debug_assert!(start.offset() <= end.offset());
        Span {
            s: start.input(),
            start: start.offset(),
            end: end.offset(),
        }
    }

    pub fn as_str(&self) -> &'i str {
        &self.s[self.start..self.end]
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains the entirety of the other span. Both spans
    /// should be referencing the same input.
    pub fn contains(&self, other: &Self) -> bool {
        std::ptr::eq(self.s, other.s) && self.start <= other.start && self.end >= other.end
    }
}

impl<'i> PartialEq for Span<'i> {
    fn eq(&self, other: &Span<'i>) -> bool {
        self.as_str() == other.as_str()
    }
}
