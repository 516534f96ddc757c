use std::path::PathBuf;

/// Relative path of the readme served as `mcpreadme://`
pub const README_PATH: &str = "mcpreadme.md";

/// Target of the parameterless fetch tool
pub const FETCH_URL: &str = "https://example.com/";

/// Download command prefixed to the fetch URL
pub const FETCH_DOWNLOADER: &str = "curl -s";

/// Shell interpreter used to run command lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub program: String,
    /// Flag that makes the interpreter treat the next argument as a command line
    pub arg: String,
}

impl Default for Shell {
    #[cfg(windows)]
    fn default() -> Self {
        Self {
            program: "cmd".to_string(),
            arg: "/C".to_string(),
        }
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            arg: "-c".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub url: String,
    pub downloader: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: FETCH_URL.to_string(),
            downloader: FETCH_DOWNLOADER.to_string(),
        }
    }
}

/// Fixed server settings. Nothing here is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub shell: Shell,
    /// Resolved against the working directory on every read
    pub readme_path: PathBuf,
    pub fetch: FetchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            shell: Shell::default(),
            readme_path: PathBuf::from(README_PATH),
            fetch: FetchConfig::default(),
        }
    }
}
