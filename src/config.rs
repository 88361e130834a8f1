/// Store limits and paging defaults, loaded from SHELFDB_* environment
/// variables
#[derive(Debug, Clone)]
pub struct Config {
    pub default_find_limit: usize,
    pub max_find_limit: usize,
    pub max_pipeline_stages: usize,
    pub max_documents_per_collection: usize,
    pub max_indexes_per_collection: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_find_limit: 100,
            max_find_limit: 1000,
            max_pipeline_stages: 32,
            max_documents_per_collection: 100_000,
            max_indexes_per_collection: 16,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_find_limit: env_usize("SHELFDB_DEFAULT_FIND_LIMIT")
                .unwrap_or(defaults.default_find_limit),
            max_find_limit: env_usize("SHELFDB_MAX_FIND_LIMIT")
                .unwrap_or(defaults.max_find_limit),
            max_pipeline_stages: env_usize("SHELFDB_MAX_PIPELINE_STAGES")
                .unwrap_or(defaults.max_pipeline_stages),
            max_documents_per_collection: env_usize("SHELFDB_MAX_DOCUMENTS_PER_COLLECTION")
                .unwrap_or(defaults.max_documents_per_collection),
            max_indexes_per_collection: env_usize("SHELFDB_MAX_INDEXES_PER_COLLECTION")
                .unwrap_or(defaults.max_indexes_per_collection),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_find_limit == 0 {
            return Err("SHELFDB_DEFAULT_FIND_LIMIT must be at least 1".to_string());
        }

        if self.max_find_limit < self.default_find_limit {
            return Err(format!(
                "SHELFDB_MAX_FIND_LIMIT ({}) must be >= SHELFDB_DEFAULT_FIND_LIMIT ({})",
                self.max_find_limit, self.default_find_limit
            ));
        }

        if self.max_pipeline_stages == 0 {
            return Err("SHELFDB_MAX_PIPELINE_STAGES must be at least 1".to_string());
        }

        if self.max_documents_per_collection == 0 {
            return Err("SHELFDB_MAX_DOCUMENTS_PER_COLLECTION must be at least 1".to_string());
        }

        if self.max_indexes_per_collection == 0 {
            return Err("SHELFDB_MAX_INDEXES_PER_COLLECTION must be at least 1".to_string());
        }

        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
