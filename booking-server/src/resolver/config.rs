//! Search configuration for the journey resolver.

/// Largest page size any configuration may allow.
pub const PAGE_SIZE_LIMIT: u32 = 100;

/// Pagination bounds for journey search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Page size used when the caller does not give one.
    pub default_page_size: u32,

    /// Upper bound on the page size.
    /// Larger requests are clamped to this.
    pub max_page_size: u32,
}

impl SearchConfig {
    /// Set the default page size.
    pub fn with_default_page_size(mut self, default_page_size: u32) -> Self {
        self.default_page_size = default_page_size;
        self
    }

    /// Set the maximum page size, capped at [`PAGE_SIZE_LIMIT`].
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.min(PAGE_SIZE_LIMIT);
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: PAGE_SIZE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::default()
            .with_default_page_size(25)
            .with_max_page_size(50);

        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 50);
    }

    #[test]
    fn max_page_size_never_exceeds_limit() {
        let config = SearchConfig::default().with_max_page_size(5_000);
        assert_eq!(config.max_page_size, PAGE_SIZE_LIMIT);
    }
}
