//! Stateless request renderer and response parser for the payment API.
//!
//! # Design
//! `StripeClient` holds only configuration and carries no mutable state
//! between calls. Resource modules produce `RequestDescriptor`s; the client
//! renders them into `HttpRequest`s (`build`), decodes `HttpResponse`s into
//! the descriptor's declared type (`parse`), and can drive one round-trip
//! through a host-provided [`Transport`] (`execute`).

use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::request::RequestDescriptor;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct StripeClient {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl StripeClient {
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&ClientConfig::with_base_url(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut headers = vec![("user-agent".to_string(), config.user_agent.clone())];
        if let Some(version) = &config.api_version {
            headers.push(("stripe-version".to_string(), version.clone()));
        }
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Render a descriptor as a concrete HTTP request.
    ///
    /// POST pairs become a form body; GET and DELETE pairs become the query
    /// string.
    pub fn build<T>(&self, descriptor: &RequestDescriptor<T>) -> Result<HttpRequest, ApiError> {
        let encoded = encode_pairs(descriptor)?;
        let mut url = format!("{}/{}", self.base_url, descriptor.url_path());
        let mut headers = self.headers.clone();

        let body = match descriptor.method() {
            HttpMethod::Post => {
                headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
                Some(encoded)
            }
            HttpMethod::Get | HttpMethod::Delete => {
                if !encoded.is_empty() {
                    url.push('?');
                    url.push_str(&encoded);
                }
                None
            }
        };

        debug!(
            method = %descriptor.method(),
            path = descriptor.path(),
            pairs = descriptor.pairs().len(),
            "built request"
        );

        Ok(HttpRequest {
            method: descriptor.method(),
            url,
            headers,
            body,
        })
    }

    /// Decode a response into the descriptor's declared type.
    pub fn parse<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor<T>,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        if !(200..300).contains(&response.status) {
            warn!(
                status = response.status,
                path = descriptor.path(),
                "request failed"
            );
            return Err(ApiError::from_status(response.status, &response.body));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Build, send through `transport` once, and parse.
    pub fn execute<T, X>(&self, transport: &X, descriptor: RequestDescriptor<T>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        X: Transport + ?Sized,
    {
        let request = self.build(&descriptor)?;
        let response = transport.send(&request)?;
        trace!(status = response.status, url = %request.url, "transport round-trip");
        self.parse(&descriptor, response)
    }
}

fn encode_pairs<T>(descriptor: &RequestDescriptor<T>) -> Result<String, ApiError> {
    let pairs: Vec<(&str, &str)> = descriptor
        .pairs()
        .iter()
        .map(|pair| (pair.key.as_str(), pair.value.as_str()))
        .collect();
    serde_urlencoded::to_string(pairs).map_err(|e| ApiError::Serialization(e.to_string()))
}
