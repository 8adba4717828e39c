//! Shared harness: a live mock Shortcut API on a random local port.

#![allow(dead_code)]

use shortcut_core::Config;

pub const TOKEN: &str = "test-token";

/// Start the mock server on its own thread and return its API base URL.
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

pub fn mock_config() -> Config {
    Config::new(&spawn_mock(), TOKEN).unwrap()
}

/// A base URL on which nothing is listening.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v3")
}
