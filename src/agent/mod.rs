//! Typed tool layer
//!
//! The LLM side of the system classifies a user message into one of a
//! fixed set of capabilities; that classification deserializes into
//! [`ToolCall`] and the [`Dispatcher`] executes it against storage. There
//! is no dynamic dispatch: an unknown tool name fails decoding, and the
//! capability set is closed at compile time. Outcomes serialize back to
//! JSON for the model to narrate to the user.

pub mod dispatch;
pub mod tool;

pub use dispatch::Dispatcher;
pub use tool::{
    CreateTaskInput, ItemFailure, TaskFilters, ToolCall, ToolOutcome, UpdateTaskInput,
};
