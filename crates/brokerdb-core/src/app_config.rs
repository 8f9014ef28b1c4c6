use std::path::PathBuf;

/// Process-level settings read from the environment.
///
/// Store credentials are not part of this struct; they arrive as CLI
/// arguments and go straight into the store client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub catalog_path: Option<PathBuf>,
}
