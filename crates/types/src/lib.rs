//! Core types and traits for the chatrelay workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! relay: the inbound chat data model, the normalized response contract, the
//! error taxonomy, provider credentials, and the traits each layer implements.

pub mod chat;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod traits;

pub use chat::{ChatMessage, ChatRequest, MessageContent, NormalizedResponse, Role, Usage};
pub use credentials::Credentials;
pub use error::RelayError;
pub use provider::Endpoint;
pub use traits::{ProviderClient, RequestTranslator, ResponseTranslator};
