//! Client the conformance checks use to talk to a SUT.

use serde::Serialize;
use serde_json::Value;

use crate::config::SutConfig;
use crate::error::TckResult;
use crate::types::{JsonRpcId, JsonRpcRequest, SendMessageParams};
use crate::utils::constants::METHOD_MESSAGE_SEND;
use crate::utils::message::{classify, make_request, ClassifiedResponse};

use super::card_resolver::CardResolver;
use super::sse::SseStream;
use super::transport::{build_http_client, JsonRpcTransport, Transport};

/// One request/response round trip with a SUT.
///
/// The response is kept raw; call [`Exchange::classify`] to judge it
/// against the request id.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The request that was sent.
    pub request: JsonRpcRequest,
    /// The response object exactly as the SUT sent it.
    pub response: Value,
}

impl Exchange {
    /// The id responses must echo.
    pub fn id(&self) -> &JsonRpcId {
        &self.request.id
    }

    /// Classifies the response against the request id.
    pub fn classify(&self) -> ClassifiedResponse {
        classify(&self.response, &self.request.id)
    }
}

/// Client for a System Under Test.
///
/// # Example
///
/// ```no_run
/// use a2a_tck::client::SutClient;
/// use a2a_tck::config::SutConfig;
/// use a2a_tck::utils::text_message_params;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SutClient::new(SutConfig::new("http://localhost:9999")?)?;
/// let exchange = client.send_message(&text_message_params("Hello")).await?;
/// println!("SUT answered with a {} response", exchange.classify().label());
/// # Ok(())
/// # }
/// ```
pub struct SutClient {
    transport: Box<dyn Transport>,
    card_resolver: CardResolver,
    config: SutConfig,
}

impl std::fmt::Debug for SutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SutClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SutClient {
    /// Create a client that talks JSON-RPC over HTTP to `config.url`.
    pub fn new(config: SutConfig) -> TckResult<Self> {
        let transport = JsonRpcTransport::from_config(&config)?;
        let card_resolver = CardResolver::with_client(transport.http_client().clone());
        Ok(Self {
            transport: Box::new(transport),
            card_resolver,
            config,
        })
    }

    /// Create a client with a custom transport.
    ///
    /// Agent card discovery still goes over HTTP to `config`'s origin, with
    /// the config's timeout and headers.
    pub fn with_transport(config: SutConfig, transport: Box<dyn Transport>) -> TckResult<Self> {
        let card_resolver = CardResolver::with_client(build_http_client(&config)?);
        Ok(Self {
            transport,
            card_resolver,
            config,
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &SutConfig {
        &self.config
    }

    /// Send a prepared request and return the raw response object.
    pub async fn send_json_rpc(&self, request: &JsonRpcRequest) -> TckResult<Value> {
        self.transport.send(request).await
    }

    /// Build a request for `method` with a fresh id and send it.
    pub async fn call(&self, method: &str, params: impl Serialize) -> TckResult<Exchange> {
        let request = make_request(method, params)?;
        let response = self.send_json_rpc(&request).await?;
        Ok(Exchange { request, response })
    }

    /// Send `message/send`.
    pub async fn send_message(&self, params: &SendMessageParams) -> TckResult<Exchange> {
        self.call(METHOD_MESSAGE_SEND, params).await
    }

    /// Build a request for a streaming `method` and open its event stream.
    pub async fn stream(
        &self,
        method: &str,
        params: impl Serialize,
    ) -> TckResult<(JsonRpcRequest, SseStream)> {
        let request = make_request(method, params)?;
        let stream = self.transport.send_stream(&request).await?;
        Ok((request, stream))
    }

    /// Fetch the SUT's agent card from the well-known path under its origin.
    pub async fn fetch_agent_card(&self) -> TckResult<Value> {
        self.card_resolver.resolve(&self.config.origin()).await
    }

    /// Close the client and release any held resources.
    pub async fn close(self) -> TckResult<()> {
        self.transport.close().await
    }
}
