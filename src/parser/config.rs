//! Parser options

/// Options controlling which attributes the parsers record
///
/// Every flag is off by default. Format-preserving printing needs
/// `track_indexes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Record start/end line numbers on every node
    pub track_lines: bool,
    /// Record start/end token indexes on every node
    pub track_indexes: bool,
    /// Attach `//` comments found inside multi-line constructs to the next item
    pub preserve_comments: bool,
    /// Store string constants unquoted and unescaped, remembering the quote style
    pub quote_aware_strings: bool,
}

impl ParserConfig {
    /// Every option enabled
    pub fn all() -> Self {
        Self {
            track_lines: true,
            track_indexes: true,
            preserve_comments: true,
            quote_aware_strings: true,
        }
    }

    pub fn with_lines(mut self, enabled: bool) -> Self {
        self.track_lines = enabled;
        self
    }

    pub fn with_indexes(mut self, enabled: bool) -> Self {
        self.track_indexes = enabled;
        self
    }

    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.preserve_comments = enabled;
        self
    }

    pub fn with_quote_aware_strings(mut self, enabled: bool) -> Self {
        self.quote_aware_strings = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_off() {
        let config = ParserConfig::default();
        assert!(!config.track_lines);
        assert!(!config.track_indexes);
        assert!(!config.preserve_comments);
        assert!(!config.quote_aware_strings);
    }

    #[test]
    fn test_builder_toggles_independently() {
        let config = ParserConfig::default().with_indexes(true);
        assert!(config.track_indexes);
        assert!(!config.track_lines);
        assert!(!ParserConfig::all().with_comments(false).preserve_comments);
    }
}
