//! Pokedex MCP Server
//!
//! A Model Context Protocol server using the official Rust SDK (rmcp) that
//! exposes the catalog resolution layer for LLM interaction.
//!
//! Set `POKEDEX_CONFIG` to a RON file to override the defaults, and `RUST_LOG`
//! to control log verbosity. Logs go to stderr; stdout carries the protocol.

use std::borrow::Cow;
use std::path::Path;
use std::sync::{Arc, Mutex};

use pokedex_catalog::mcp_interface::*;
use pokedex_catalog::{CatalogConfig, CatalogLoad, HttpSource, PageRequest, Pokedex};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MOVES_SHOWN: usize = 20;

#[derive(Debug, Clone)]
pub struct PokedexService {
    tool_router: ToolRouter<PokedexService>,
    pokedex: Pokedex<HttpSource>,
    catalog: Arc<Mutex<Option<Arc<CatalogLoad>>>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct QueryCatalogRequest {
    #[schemars(description = "Case-insensitive part of the Pokemon name")]
    pub name: Option<String>,
    #[schemars(description = "Attack filter: 'all', 'high' (>80) or 'low' (<=80)")]
    pub attack: Option<String>,
    #[schemars(description = "Weight filter: 'all', 'light' (<10kg), 'medium' (10-50kg) or 'heavy' (>=50kg)")]
    pub weight: Option<String>,
    #[schemars(description = "Page number, starting at 1 (20 Pokemon per page)")]
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupPokemonRequest {
    #[schemars(description = "Pokemon name or National Pokedex number")]
    pub species: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMovesRequest {
    #[schemars(description = "Pokemon name or National Pokedex number")]
    pub species: String,
    #[schemars(description = "Optional case-insensitive part of the move name")]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComparePokemonRequest {
    #[schemars(description = "First Pokemon, by name or National Pokedex number")]
    pub first: String,
    #[schemars(description = "Second Pokemon, by name or National Pokedex number")]
    pub second: String,
}

fn internal_error(message: String) -> McpError {
    McpError {
        code: ErrorCode(-32603),
        message: Cow::from(message),
        data: None,
    }
}

#[tool_router]
impl PokedexService {
    pub fn new(pokedex: Pokedex<HttpSource>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            pokedex,
            catalog: Arc::new(Mutex::new(None)),
        }
    }

    fn loaded_catalog(&self) -> Option<Arc<CatalogLoad>> {
        self.catalog.lock().ok().and_then(|guard| guard.clone())
    }

    #[tool(description = "Resolve the full Pokemon catalog (needed before query_catalog)")]
    async fn load_catalog(&self) -> Result<CallToolResult, McpError> {
        let load = self
            .pokedex
            .load_catalog()
            .await
            .map_err(|e| internal_error(format_error("Error loading catalog", &e)))?;
        let text = format_catalog_summary(&load);
        if let Ok(mut guard) = self.catalog.lock() {
            *guard = Some(Arc::new(load));
        }
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Search and filter the loaded catalog, one page at a time")]
    async fn query_catalog(
        &self,
        Parameters(request): Parameters<QueryCatalogRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.loaded_catalog() {
            Some(load) => match parse_filter(
                request.name.as_deref(),
                request.attack.as_deref(),
                request.weight.as_deref(),
            ) {
                Ok(filter) => {
                    let page = PageRequest {
                        page_number: request.page.unwrap_or(1),
                        ..PageRequest::default()
                    };
                    let page = Pokedex::<HttpSource>::query_catalog(&load.entities, &filter, page);
                    format_catalog_page(&page)
                }
                Err(message) => message,
            },
            None => "The catalog is not loaded yet. Use 'load_catalog' first.".to_string(),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Look up detailed information about a Pokemon")]
    async fn lookup_pokemon(
        &self,
        Parameters(request): Parameters<LookupPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.pokedex.lookup(&request.species).await {
            Ok(entity) => format_entity_detailed(&entity),
            Err(e) => format_error(&format!("Pokemon '{}'", request.species), &e),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List the moves a Pokemon can learn")]
    async fn list_moves(
        &self,
        Parameters(request): Parameters<ListMovesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.pokedex.lookup(&request.species).await {
            Ok(entity) => {
                let moves = self.pokedex.resolve_moves(&entity).await;
                format_moves(&moves, request.search.as_deref().unwrap_or(""), MOVES_SHOWN)
            }
            Err(e) => format_error(&format!("Pokemon '{}'", request.species), &e),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Show the evolution chain a Pokemon belongs to")]
    async fn evolution_chain(
        &self,
        Parameters(request): Parameters<LookupPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let context = format!("Evolution chain of '{}'", request.species);
        let text = match self.pokedex.lookup(&request.species).await {
            Ok(entity) => match self.pokedex.resolve_evolution_tree(entity.id).await {
                Ok(tree) => format_evolution_tree(&tree),
                Err(e) => format_error(&context, &e),
            },
            Err(e) => format_error(&context, &e),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Compare the base stats of two Pokemon side by side")]
    async fn compare_pokemon(
        &self,
        Parameters(request): Parameters<ComparePokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let (first, second) = tokio::join!(
            self.pokedex.lookup(&request.first),
            self.pokedex.lookup(&request.second)
        );
        let text = match (first, second) {
            (Ok(first), Ok(second)) => format_comparison(&first, &second),
            (Err(e), _) => format_error(&format!("Pokemon '{}'", request.first), &e),
            (_, Err(e)) => format_error(&format!("Pokemon '{}'", request.second), &e),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for PokedexService {}

fn load_config() -> Result<CatalogConfig, Box<dyn std::error::Error>> {
    match std::env::var("POKEDEX_CONFIG") {
        Ok(path) => Ok(CatalogConfig::load(Path::new(&path))?),
        Err(_) => Ok(CatalogConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = load_config()?;
    info!(base_url = %config.base_url, max_concurrency = config.max_concurrency, "Pokedex MCP Server starting");

    let service = PokedexService::new(Pokedex::connect(config)?);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    info!("Server running, waiting for shutdown");
    let quit_reason = server.waiting().await?;

    info!(?quit_reason, "Pokedex MCP Server exiting");
    Ok(())
}
