//! # agent-core
//!
//! Framework-agnostic tool system: the agent-facing half of every tool the
//! workspace exposes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ToolRegistry                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ ToolSchema  │  │ Tool (trait)│  │ FnTool (closure)    │  │
//! │  │ JSON schema │──│  execute()  │──│ register_fn()       │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A binding (HTTP server, LLM function-calling loop) only needs the registry:
//! it lists `schemas()` and forwards `ToolCall`s to `execute()`. Domain logic is
//! written once behind the `Tool` trait and exposed through as many bindings as
//! needed.

pub mod error;
pub mod tool;

pub use error::{AgentError, Result};
pub use tool::{AddTool, FnTool, SubtractTool, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
