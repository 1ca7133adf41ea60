//! Callable tool operations over the character service.
//!
//! This crate provides:
//! - The [`Tool`] trait: a named, typed, documented operation
//! - A [`ToolRegistry`] that owns the name -> tool mapping and dispatches
//! - The eight character operations as tool implementations
//!
//! The transport that carries requests to the registry (stdio loop, RPC
//! bridge, agent runtime) lives elsewhere; this crate ends at
//! [`ToolRegistry::dispatch`].

pub mod characters;
pub mod error;
pub mod tool;

// Primary public API
pub use characters::{
    character_tool_registry, AddExperienceTool, CreateCharacterTool, DeleteCharacterTool,
    GetAllCharactersTool, GetCharacterTool, GetCharactersByPlayerIdTool, GetProgressionInfoTool,
    UpdateCharacterTool,
};
pub use error::ToolError;
pub use tool::{Tool, ToolAnnotations, ToolDefinition, ToolOutput, ToolRegistry};
