//! MCP server exposing a loaded catalog as search tools.

use crate::catalog::Catalog;
use crate::config::SearchConfig;
use crate::tools::categories::handle_list_categories;
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server answering symbol searches over one documentation site
#[derive(Clone)]
pub struct IndexServer {
    /// Loaded index, shared read-only across tool calls
    catalog: Arc<Catalog>,
    config: Arc<SearchConfig>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for IndexServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexServer")
            .field("categories", &self.catalog.categories().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

#[tool_router]
impl IndexServer {
    pub fn new(catalog: Arc<Catalog>, config: SearchConfig) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[tool(
        description = "Search documented symbols (classes, functions, files, namespaces, ...) by the start of their name, case-insensitively. Returns hits ranked shortest name first, with their scope, kind and documentation link.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        tracing::debug!("search: {:?}", request);
        handle_search(&self.catalog, &self.config, &request)
    }

    #[tool(
        description = "List the symbol categories available in the loaded documentation index, with entry counts per kind."
    )]
    async fn list_categories(&self) -> std::result::Result<String, String> {
        Ok(handle_list_categories(&self.catalog))
    }
}

#[tool_handler]
impl ServerHandler for IndexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "doxsearch: incremental symbol search over a generated documentation site. \
                 Use search with a partial name; use list_categories to see which categories \
                 (classes, functions, files, ...) can narrow a search."
                    .to_string(),
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline enum definitions instead of $ref patterns. This ensures MCP Inspector
/// displays enums as dropdown widgets rather than raw JSON input fields.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();

    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => Arc::new(object),
        Ok(_) => {
            tracing::error!("Schema serialization produced non-object value");
            Arc::new(JsonObject::new())
        }
        Err(e) => {
            tracing::error!("Failed to serialize schema: {}", e);
            Arc::new(JsonObject::new())
        }
    }
}
