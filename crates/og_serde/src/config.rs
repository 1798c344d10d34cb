// -----------------------------------------------------------------------------
// CodecConfig

/// Limits applied to a single encode or decode call.
///
/// # Examples
///
/// ```
/// use og_serde::CodecConfig;
///
/// let config = CodecConfig::new().with_max_depth(16);
/// assert_eq!(config.max_depth, 16);
/// assert_eq!(CodecConfig::default().max_depth, CodecConfig::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum nesting of values (containers and objects) below the root.
    ///
    /// Exceeding it fails with
    /// [`SerdeError::DepthExceeded`](crate::SerdeError::DepthExceeded)
    /// instead of exhausting the stack.
    pub max_depth: usize,
}

impl CodecConfig {
    /// Graphs this deep round-trip through every text strategy but YAML,
    /// which reads fewer nested collections.
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    #[inline]
    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for CodecConfig {
    /// See [`CodecConfig::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
