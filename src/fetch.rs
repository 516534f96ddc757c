use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::executor::{decode, ShellExecutor};

/// Downloads a fixed URL with a fixed download command
#[derive(Debug, Clone, Default)]
pub struct RemoteFetch {
    config: FetchConfig,
}

impl RemoteFetch {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn command_line(&self) -> String {
        format!("{} {}", self.config.downloader, self.config.url)
    }

    /// Return the downloaded content verbatim, or an error message.
    /// The content is not inspected.
    pub async fn fetch(&self, executor: &ShellExecutor) -> String {
        debug!(url = %self.config.url, "fetching remote resource");
        let output = match executor.try_output(&self.command_line()).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "download command could not be run");
                return format!("Error: {}", e);
            }
        };

        // Only the stream that is reported gets decoded
        let decoded = if output.return_code == 0 {
            decode(output.stdout, "stdout")
        } else {
            warn!(return_code = output.return_code, "download command failed");
            decode(output.stderr, "stderr")
                .map(|stderr| format!("Error downloading content: {}", stderr))
        };
        decoded.unwrap_or_else(|e| {
            warn!(error = %e, "download output could not be decoded");
            format!("Error: {}", e)
        })
    }
}
