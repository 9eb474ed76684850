/// Something that happened while matching, for debugging grammars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent<'g> {
    /// Started matching a production.
    Enter { production: &'g str, offset: usize },
    /// Finished matching a production. `end` is `None` on failure.
    Exit {
        production: &'g str,
        offset: usize,
        end: Option<usize>,
    },
    /// An alternative failed and the next one will be tried from `offset`.
    /// `production` is `None` inside a group.
    RuleFailed {
        production: Option<&'g str>,
        rule: usize,
        offset: usize,
    },
    /// A production result was served from the memo table.
    MemoHit { production: &'g str, offset: usize },
}

/// Receives parse events.
pub trait ParseObserver<'g> {
    fn event(&mut self, event: ParseEvent<'g>);
}

/// Ignores all events.
pub struct NullObserver;

impl<'g> ParseObserver<'g> for NullObserver {
    fn event(&mut self, _event: ParseEvent<'g>) {}
}

/// Records every event.
impl<'g> ParseObserver<'g> for Vec<ParseEvent<'g>> {
    fn event(&mut self, event: ParseEvent<'g>) {
        self.push(event);
    }
}
