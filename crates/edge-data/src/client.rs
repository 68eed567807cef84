//! Platform fetch client.

use std::time::Instant;

use edge_core::RequestId;
use serde::de::DeserializeOwned;

use crate::transport::{FetchError, FetchRequest, FetchResponse, Timed, Transport};

/// Platform-controlled fetch client.
///
/// Propagates the request id to upstreams and decodes JSON bodies. It does
/// not retry and sets no timeout of its own; both belong to the transport.
pub struct FetchClient<T: Transport> {
    transport: T,
    request_id: RequestId,
}

impl<T: Transport> FetchClient<T> {
    /// Create a new fetch client.
    pub fn new(transport: T, request_id: RequestId) -> Self {
        Self {
            transport,
            request_id,
        }
    }

    /// Send a request and return the raw response, whatever its status.
    pub async fn send(&self, request: FetchRequest) -> Result<Timed<FetchResponse>, FetchError> {
        let request = request.header("x-request-id", self.request_id.to_string());
        let started = Instant::now();
        let response = self.transport.send(&request).await?;
        Ok(Timed {
            value: response,
            elapsed: started.elapsed(),
        })
    }

    /// Fetch and decode a JSON body.
    ///
    /// Non-2xx statuses become [`FetchError::Http`] carrying the body.
    pub async fn fetch_json<D: DeserializeOwned>(
        &self,
        request: FetchRequest,
    ) -> Result<Timed<D>, FetchError> {
        let url = request.url();
        let Timed { value: response, elapsed } = self.send(request).await?;

        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
                url,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        let value = serde_json::from_slice(&response.body)
            .map_err(|e| FetchError::Deserialization(e.to_string()))?;

        Ok(Timed { value, elapsed })
    }

    /// Get the request ID.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
