use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router,
    schemars::JsonSchema,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;

use crate::api::TaskListing;
use crate::blocking::with_db;
use crate::error::AppError;
use crate::models::NewProgress;
use tracker_core::{Database, ListParams};

#[derive(Clone)]
pub struct McpServer {
    db: Database,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTasksRequest {
    #[schemars(description = "Case-insensitive substring of the task name; empty matches all")]
    #[serde(default)]
    pub search: Option<String>,
    #[schemars(description = "Zero-based page number (10 tasks per page)")]
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecordProgressRequest {
    #[schemars(description = "The task ID to record progress for")]
    pub task_id: i64,
    #[schemars(description = "Progress value, usually a percentage from 0 to 100")]
    pub value: f64,
    #[schemars(description = "Optional note for today's progress")]
    #[serde(default)]
    pub note: Option<String>,
}

impl McpServer {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            tool_router: Self::tool_router(),
        }
    }

    fn to_mcp_error(err: AppError) -> McpError {
        match err {
            AppError::NotFound(_) | AppError::Validation(_) => {
                McpError::invalid_params(err.to_string(), None)
            }
            AppError::BackendUnavailable(_) | AppError::Cancelled => {
                McpError::internal_error(err.to_string(), None)
            }
        }
    }
}

#[tool_router]
impl McpServer {
    #[tool(description = "List tasks grouped by category and sub-category, with their latest progress")]
    async fn list_tasks(
        &self,
        params: Parameters<ListTasksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let list_params = ListParams::new(req.search.unwrap_or_default(), req.page.unwrap_or(0));

        let page = with_db(&self.db, move |db| db.list_tasks(&list_params))
            .await
            .map_err(Self::to_mcp_error)?;
        let listing = TaskListing::from(page);

        let json = serde_json::to_string_pretty(&listing)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Record today's progress for a task")]
    async fn record_progress(
        &self,
        params: Parameters<RecordProgressRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;

        let input = NewProgress {
            task_id: req.task_id,
            value: req.value,
            note: req.note,
        };
        let progress = with_db(&self.db, move |db| db.insert_progress(&input))
            .await
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Recorded {}% for task {} on {}",
            progress.value, progress.task_id, progress.date
        ))]))
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Tracker MCP server for listing tasks and recording daily progress".into()),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(db: Database) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(db);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
