use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

/// Arguments of the run_command tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommandRequest {
    /// The command to execute in the terminal. Interpreted by the host shell.
    pub command: String,
}
