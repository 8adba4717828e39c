//! MCP server for the Shortcut project-tracking API.
//!
//! Each tool validates its arguments, runs one `shortcut_core` operation on a
//! shared `AsyncClient`, and renders the result as pretty JSON. Any failure is
//! rendered as `{"error": ..., "details": ...}` and flagged as a tool error.
//! Stories are also exposed as read-only resources, and the bug report and
//! feature request templates as prompts.

pub mod cli;
pub mod error;
pub mod handlers;
pub mod params;
pub mod resources;
pub mod server;
pub mod service;
pub mod templates;

pub use error::ToolError;
pub use server::ShortcutServer;
