//! # a2a-tck: conformance test kit for the Agent-to-Agent (A2A) protocol
//!
//! This crate exercises a live System Under Test (SUT) that implements the
//! [A2A protocol](https://a2a-protocol.org/latest/specification/) over
//! JSON-RPC 2.0 and reports whether its responses are well-formed and use
//! the protocol's error-code conventions. It is a client and validator only.
//!
//! ## Overview
//!
//! - **Message utilities** ([`utils::message`]) build requests with fresh
//!   correlation ids and classify responses as success, error or malformed
//! - **SUT client** ([`client::SutClient`]) sends requests over HTTP and
//!   keeps transport failures apart from protocol error responses
//! - **Suite** ([`suite`]) holds the checks, their categories and the runner
//! - **Configuration** ([`config::SutConfig`]) is an explicit value passed
//!   to the client, read from `SUT_URL` and friends or built in code
//!
//! ## Quick Start
//!
//! ```no_run
//! use a2a_tck::client::SutClient;
//! use a2a_tck::config::SutConfig;
//! use a2a_tck::suite::{default_checks, SuiteRunner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SutClient::new(SutConfig::new("http://localhost:9999")?)?;
//!     let report = SuiteRunner::new().run(&client, &default_checks()).await;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```
//!
//! ## Classifying a response by hand
//!
//! ```
//! use a2a_tck::utils::{classify, make_request_with_id, ClassifiedResponse};
//! use serde_json::json;
//!
//! let request = make_request_with_id(1, "message/send", json!({"message": {"parts": []}})).unwrap();
//! let response = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32001, "message": "Task not found"}});
//! assert!(matches!(classify(&response, &request.id), ClassifiedResponse::Error(_)));
//! ```

pub mod builders;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod suite;
pub mod types;
pub mod utils;

/// Prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::builders::{SendMessageParamsBuilder, SutClientBuilder};
    pub use crate::client::{Exchange, SutClient};
    pub use crate::config::SutConfig;
    pub use crate::error::{TckError, TckResult};
    pub use crate::suite::{
        default_checks, Category, ConformanceCheck, Outcome, SuiteReport, SuiteRunner,
    };
    pub use crate::types::{JsonRpcId, JsonRpcRequest, Message, Part, SendMessageParams};
    pub use crate::utils::message::{
        classify, is_error, is_success, make_request, ClassifiedResponse,
    };
}

pub use error::{TckError, TckResult};
