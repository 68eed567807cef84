//! Stripe product retrieval.

use async_trait::async_trait;
use serde::Deserialize;

use edge_sdk::edge_data::{encode_component, FetchClient, FetchError, FetchRequest, Transport};
use turbo_commerce::catalog::{ProductRetriever, ProviderProduct, RetrievalError, RetrieveOptions};
use turbo_commerce::ProductId;

/// Retrieves products from the Stripe REST API.
pub struct StripeRetriever<T: Transport> {
    client: FetchClient<T>,
    api_base: String,
    secret_key: String,
}

impl<T: Transport> StripeRetriever<T> {
    /// Create a retriever for the given API origin and secret key.
    pub fn new(client: FetchClient<T>, api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            secret_key: secret_key.into(),
        }
    }

    fn product_request(&self, id: &ProductId, options: &RetrieveOptions) -> FetchRequest {
        let url = format!(
            "{}/v1/products/{}",
            self.api_base.trim_end_matches('/'),
            encode_component(id.as_str())
        );
        options
            .expand
            .iter()
            .fold(FetchRequest::get(url), |req, field| req.query("expand[]", field.as_str()))
            .bearer(&self.secret_key)
    }

    /// Access the underlying fetch client.
    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }
}

#[async_trait(?Send)]
impl<T: Transport> ProductRetriever for StripeRetriever<T> {
    async fn retrieve_product(
        &self,
        id: &ProductId,
        options: &RetrieveOptions,
    ) -> Result<ProviderProduct, RetrievalError> {
        let request = self.product_request(id, options);
        self.client
            .fetch_json::<ProviderProduct>(request)
            .await
            .map(|timed| timed.value)
            .map_err(|e| map_fetch_error(id, e))
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn map_fetch_error(id: &ProductId, error: FetchError) -> RetrievalError {
    match error {
        FetchError::Http { status: 404, .. } => RetrievalError::NotFound(id.to_string()),
        FetchError::Http {
            status: 401 | 403, ..
        } => RetrievalError::Unauthorized,
        FetchError::Http { status, body, .. } => RetrievalError::Provider {
            status,
            message: provider_message(&body),
        },
        FetchError::Deserialization(e) => RetrievalError::Decode(e),
        FetchError::Connection(e) | FetchError::Request(e) => RetrievalError::Network(e),
    }
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use edge_sdk::edge_core::RequestId;
    use edge_sdk::edge_data::FetchResponse;

    use super::*;

    struct StubStripe {
        status: u16,
        body: String,
        seen: RefCell<Vec<FetchRequest>>,
    }

    impl StubStripe {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Transport for StubStripe {
        async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(FetchResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn retriever(status: u16, body: &str) -> StripeRetriever<StubStripe> {
        StripeRetriever::new(
            FetchClient::new(StubStripe::new(status, body), RequestId::from_string("req-1")),
            "https://api.stripe.com/",
            "sk_test_123",
        )
    }

    async fn retrieve(retriever: &StripeRetriever<StubStripe>, id: &str) -> Result<ProviderProduct, RetrievalError> {
        retriever
            .retrieve_product(&ProductId::new(id), &RetrieveOptions::with_default_price())
            .await
    }

    const PRODUCT: &str = r#"{
        "id": "prod_1",
        "object": "product",
        "name": "Camiseta",
        "description": "algodão",
        "images": ["https://files.stripe.com/img.png"],
        "default_price": {"id": "price_1", "object": "price", "unit_amount": 9990, "currency": "brl"}
    }"#;

    #[tokio::test]
    async fn test_request_shape() {
        let stripe = retriever(200, PRODUCT);
        let product = retrieve(&stripe, "prod_1").await.unwrap();
        assert_eq!(product.name, "Camiseta");

        let seen = stripe.client().transport().seen.borrow();
        assert_eq!(
            seen[0].url(),
            "https://api.stripe.com/v1/products/prod_1?expand%5B%5D=default_price"
        );
        assert_eq!(seen[0].header_value("authorization"), Some("Bearer sk_test_123"));
    }

    #[tokio::test]
    async fn test_id_is_encoded_into_path() {
        let stripe = retriever(200, PRODUCT);
        retrieve(&stripe, "../customers").await.unwrap();
        let seen = stripe.client().transport().seen.borrow();
        assert!(seen[0].url().starts_with("https://api.stripe.com/v1/products/..%2Fcustomers?"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let stripe = retriever(404, r#"{"error":{"message":"No such product: 'nope'"}}"#);
        assert_eq!(
            retrieve(&stripe, "nope").await.unwrap_err(),
            RetrievalError::NotFound("nope".to_string())
        );
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let stripe = retriever(401, r#"{"error":{"message":"Invalid API Key"}}"#);
        assert_eq!(retrieve(&stripe, "prod_1").await.unwrap_err(), RetrievalError::Unauthorized);
    }

    #[tokio::test]
    async fn test_provider_error_carries_message() {
        let stripe = retriever(429, r#"{"error":{"message":"Too many requests"}}"#);
        assert_eq!(
            retrieve(&stripe, "prod_1").await.unwrap_err(),
            RetrievalError::Provider {
                status: 429,
                message: "Too many requests".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let stripe = retriever(200, "<html>maintenance</html>");
        assert!(matches!(
            retrieve(&stripe, "prod_1").await.unwrap_err(),
            RetrievalError::Decode(_)
        ));
    }

    #[test]
    fn test_connection_error_maps_to_network() {
        let err = map_fetch_error(&ProductId::new("p"), FetchError::Connection("dns".to_string()));
        assert_eq!(err, RetrievalError::Network("dns".to_string()));
    }
}
