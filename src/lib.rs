//! Session/conversation controller for an AI product-support chat widget.
//!
//! The controller owns per-tenant session identity, a cached product
//! catalog, and the conversation log, and reconciles replies from an
//! external chat gateway. Storage and gateway are injected capabilities so
//! the same logic runs against durable files, an in-memory map, or a test
//! script.

pub mod gateway;
pub mod storage;
pub mod templates;
pub mod types;
pub mod widget;

pub use gateway::{ChatGateway, GatewayError, HttpGateway};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use types::{ChatMessage, ChatRole, GatewayReply, GatewayRequest};
pub use widget::{derive_display_name, SupportWidget};
