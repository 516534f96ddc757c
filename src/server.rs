use rmcp::{
    handler::server::{
        router::tool::ToolRouter,
        wrapper::{Json, Parameters},
    },
    model::{
        AnnotateAble, Implementation, ListResourcesResult, PaginatedRequestParam, ProtocolVersion,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::json;

use crate::config::ServerConfig;
use crate::executor::{CommandResult, ShellExecutor};
use crate::fetch::RemoteFetch;
use crate::request::CommandRequest;
use crate::resource::{ReadmeResource, README_URI};

#[derive(Clone)]
pub struct TerminalServer {
    tool_router: ToolRouter<Self>,
    executor: ShellExecutor,
    fetcher: RemoteFetch,
    readme: ReadmeResource,
}

impl TerminalServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            executor: ShellExecutor::new(config.shell),
            fetcher: RemoteFetch::new(config.fetch),
            readme: ReadmeResource::new(config.readme_path),
        }
    }

    fn resources(&self) -> Vec<Resource> {
        let mut readme = RawResource::new(README_URI, "mcpreadme");
        readme.description = Some("Contents of the mcpreadme.md file".to_string());
        readme.mime_type = Some("text/markdown".to_string());
        vec![readme.no_annotation()]
    }

    /// Resolve a resource URI. Read failures are reported in the text, never as an error.
    async fn read_uri(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        match uri {
            README_URI => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(self.readme.read_text().await, uri)],
            }),
            _ => Err(McpError::resource_not_found(
                "resource_not_found",
                Some(json!({ "uri": uri })),
            )),
        }
    }
}

impl Default for TerminalServer {
    fn default() -> Self {
        Self::new()
    }
}

const SERVER_INSTRUCTIONS: &str = r#"A terminal server that runs shell commands on the host.

Tools:
- run_command: run a command line in the host shell; returns stdout, stderr and return_code. A return_code of -1 means the command could not be run at all and stderr holds the reason.
- fetch_remote_resource: download a fixed URL and return its raw contents.

Resources:
- mcpreadme://: contents of mcpreadme.md in the server's working directory."#;

#[rmcp::tool_router]
impl TerminalServer {
    #[tool(description = "Run a terminal command and return the output.

The command is passed to the host shell, so pipes, redirection and expansion work as usual. Returns stdout, stderr and return_code. A non-zero return_code is the command's own exit status; -1 means the command could not be started or its output could not be read.")]
    async fn run_command(
        &self,
        Parameters(req): Parameters<CommandRequest>,
    ) -> Json<CommandResult> {
        Json(self.executor.execute(&req.command).await)
    }

    #[tool(description = "Download a fixed URL and return its contents as text. Returns an error message if the download fails.")]
    async fn fetch_remote_resource(&self) -> String {
        self.fetcher.fetch(&self.executor).await
    }
}

#[rmcp::tool_handler]
impl ServerHandler for TerminalServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_uri(&request.uri).await
    }
}
