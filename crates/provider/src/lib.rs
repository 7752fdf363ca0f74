//! Outbound provider client.
//!
//! [`OpenAiClient`] implements [`chatrelay_types::ProviderClient`] over
//! reqwest; handlers only see the trait, so tests swap in a mock.

pub mod http_util;
pub mod openai;

pub use http_util::build_http_client;
pub use openai::OpenAiClient;
