/// Knobs for a parse.
///
/// ```
/// use interp::ParseConfig;
///
/// let config = ParseConfig {
///     max_depth: 64,  // Fail rather than recurse further
///     memoize: true,  // Cache production results per offset (packrat)
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum number of production and group matches active at once.
    /// Exceeding it fails the parse with `ParseError::TooDeep`.
    ///
    /// Each level costs several kilobytes of stack in debug builds. The
    /// default fits in the 2 MiB stack of a spawned thread; raise it only
    /// on a thread with a larger stack.
    pub max_depth: usize,

    /// Cache each production's result at each offset.
    ///
    /// Results are identical with or without it. Without it, backtracking can
    /// take exponential time on some grammars.
    pub memoize: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            memoize: false,
        }
    }
}
