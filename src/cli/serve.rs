use sheetql::error::{Result, SheetqlError};

use async_graphql::dynamic::Schema;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::{routing::get, Router};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Run the serve command to start the GraphQL server
pub async fn run(config_path: String, port: Option<u16>) -> Result<()> {
    tracing::info!("📖 Loading configuration from {}", config_path);

    let config = sheetql::config::load_config(&config_path)?;

    // Command-line port wins over the config file
    let server_port = port.unwrap_or(config.server.port);
    let bind: IpAddr = config.server.bind.parse().map_err(|e| {
        SheetqlError::Config(format!("Invalid bind address '{}': {}", config.server.bind, e))
    })?;

    let schema = super::build_schema_from_config(&config)?;

    tracing::info!("✅ Schema built successfully");
    tracing::info!("🚀 GraphQL server running on http://{}:{}", bind, server_port);
    tracing::info!("📊 Playground: http://{}:{}/graphql", bind, server_port);
    tracing::info!("💡 Press Ctrl+C to stop the server");

    start_http_server(schema, SocketAddr::new(bind, server_port)).await
}

async fn start_http_server(schema: Schema, addr: SocketAddr) -> Result<()> {
    // Wrap schema in Arc for sharing across handlers
    let schema = Arc::new(schema);

    let app = Router::new()
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .route("/health", get(health_check))
        .with_state(schema)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        SheetqlError::Config(format!(
            "Failed to bind to {}: {}. Port may be in use.",
            addr, e
        ))
    })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| SheetqlError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

async fn graphql_handler(
    State(schema): State<Arc<Schema>>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

async fn graphql_playground() -> axum::response::Html<String> {
    axum::response::Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}

async fn health_check() -> &'static str {
    "OK"
}
