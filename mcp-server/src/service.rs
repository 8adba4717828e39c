//! Transports: stdio for local agents, Streamable HTTP at `/mcp` for remote ones.

use axum::Router;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::{transport::stdio, ServiceExt};
use shortcut_core::AsyncClient;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::server::ShortcutServer;

pub const MCP_PATH: &str = "/mcp";

/// Streamable HTTP service creating one `ShortcutServer` per session.
pub fn create_mcp_service(
    client: AsyncClient,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<ShortcutServer, LocalSessionManager> {
    let service_factory =
        move || -> Result<ShortcutServer, std::io::Error> { Ok(ShortcutServer::new(client.clone())) };

    let mut config = StreamableHttpServerConfig::default();
    config.stateful_mode = true;
    config.cancellation_token = cancellation_token;

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}

pub fn router(client: AsyncClient, cancellation_token: CancellationToken) -> Router {
    Router::new().nest_service(MCP_PATH, create_mcp_service(client, cancellation_token))
}

/// Serve MCP over HTTP until Ctrl-C.
pub async fn serve_http(listener: TcpListener, client: AsyncClient) -> std::io::Result<()> {
    let ct = CancellationToken::new();
    let app = router(client, ct.clone());
    info!(addr = %listener.local_addr()?, path = MCP_PATH, "MCP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
            ct.cancel();
        })
        .await
}

/// Serve MCP over stdin/stdout until the peer disconnects.
pub async fn serve_stdio(client: AsyncClient) -> std::io::Result<()> {
    info!("MCP server ready on stdio");
    let service = ShortcutServer::new(client)
        .serve(stdio())
        .await
        .map_err(std::io::Error::other)?;
    service.waiting().await.map_err(std::io::Error::other)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use shortcut_core::Config;
    use tower::ServiceExt as _;

    fn client() -> AsyncClient {
        AsyncClient::new(Config::new("http://127.0.0.1:9/api/v3", "t").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn only_mcp_path_is_routed() {
        let app = router(client(), CancellationToken::new());
        let resp = app
            .oneshot(Request::builder().uri("/other").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn mcp_path_is_handled() {
        let app = router(client(), CancellationToken::new());
        let resp = app
            .oneshot(Request::builder().uri(MCP_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_ne!(resp.status(), StatusCode::NOT_FOUND);
    }
}
