//! # agent-core
//!
//! Tool framework for exposing capabilities to an external agent host.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  ToolCall   ┌──────────────┐  execute  ┌──────────────┐
//! │  Agent host  │ ──────────▶ │ ToolRegistry │ ────────▶ │  dyn Tool    │
//! │  (transport) │ ◀────────── │  (validate)  │ ◀──────── │              │
//! └──────────────┘  ToolResult └──────────────┘           └──────────────┘
//! ```
//!
//! A [`ToolResult`] is the only thing that crosses back to the host. Errors
//! raised inside a tool are folded into an error-flagged result by
//! [`ToolRegistry::call`].

pub mod error;
pub mod tool;

pub use error::{AgentError, Result};
pub use tool::{Content, ParameterSchema, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
