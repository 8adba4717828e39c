//! Mock Shortcut API plus helpers for reading tool results.

#![allow(dead_code)]

use rmcp::model::{CallToolResult, RawContent};
use serde_json::Value;
use shortcut_core::{AsyncClient, Config};
use shortcut_mcp::ShortcutServer;

pub const TOKEN: &str = "test-token";

pub fn spawn_mock() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, TOKEN).await
        })
        .unwrap();
    });

    format!("http://{addr}{}", mock_server::API_PREFIX)
}

pub fn client_with_token(token: &str) -> AsyncClient {
    AsyncClient::new(Config::new(&spawn_mock(), token).unwrap()).unwrap()
}

pub fn client() -> AsyncClient {
    client_with_token(TOKEN)
}

pub fn server() -> ShortcutServer {
    ShortcutServer::new(client())
}

pub fn text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        _ => panic!("Expected text content"),
    }
}

pub fn json(result: &CallToolResult) -> Value {
    serde_json::from_str(text(result)).unwrap()
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}
