//! SUT client: the transport side of the conformance kit.
//!
//! - [`SutClient`]: sends requests built by [`crate::utils::message`] and
//!   hands back raw responses as [`Exchange`]s
//! - [`Transport`] / [`JsonRpcTransport`]: pluggable transport layer
//! - [`SseStream`]: raw events from streaming methods
//! - [`CardResolver`]: agent card discovery via well-known paths

mod card_resolver;
mod sse;
mod sut_client;
mod transport;

pub use card_resolver::CardResolver;
pub use sse::SseStream;
pub use sut_client::{Exchange, SutClient};
pub use transport::{JsonRpcTransport, Transport};
