use std::pin::Pin;

use serde_json::Value as JsonValue;
use thiserror::Error;
use url::Url;

use crate::ports;
use crate::types::api::ApiResponse;

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Talks to the push endpoints over HTTP, relative to the site's base URL.
#[derive(Debug, Clone)]
pub struct HttpServerApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpServerApi {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Ok(Self::with_client(reqwest::Client::new(), Url::parse(base_url)?))
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, HttpError> {
        Ok(self.base_url.join(path)?)
    }
}

impl ports::ServerApi for HttpServerApi {
    type Error = HttpError;
    type Fut<'a>
        = Pin<Box<dyn Future<Output = Result<ApiResponse, Self::Error>> + 'a>>
    where
        Self: 'a;

    fn get<'a>(&'a self, path: &'a str) -> Self::Fut<'a> {
        Box::pin(async move {
            let response = self.client.get(self.endpoint(path)?).send().await?;
            read_response(response).await
        })
    }

    fn post_json<'a>(&'a self, path: &'a str, body: &'a JsonValue) -> Self::Fut<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint(path)?)
                .json(body)
                .send()
                .await?;
            read_response(response).await
        })
    }
}

/// Bodies that are not JSON are reported as absent.
async fn read_response(response: reqwest::Response) -> Result<ApiResponse, HttpError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    Ok(ApiResponse::new(status, serde_json::from_slice(&bytes).ok()))
}
