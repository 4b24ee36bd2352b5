use crate::app_config::Endpoint;
use reqwest::header::HeaderValue;
use reqwest::{Client, header};
use thiserror::Error;

pub const API_KEY_HEADER: &str = "x-api-key";

pub fn new_client(endpoint: &Endpoint) -> Result<Client, HttpClientError> {
    let mut headers = header::HeaderMap::new();
    if let Some(api_key) = endpoint.api_key() {
        let mut api_key_value = HeaderValue::from_str(api_key)?;
        api_key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key_value);
    }

    let client = Client::builder().default_headers(headers).timeout(endpoint.timeout()).build()?;
    Ok(client)
}

#[derive(Error, Debug)]
pub enum HttpClientError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("client set an invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}
