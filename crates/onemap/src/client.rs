use std::env;
use std::time::Duration;

use async_trait::async_trait;

use crate::model::{SearchResponse, SearchResult, TokenRequest, TokenResponse};
use crate::{ApiError, Geocoder};

pub const ONEMAP_API_URL: &str = "https://www.onemap.gov.sg/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct OneMapCredentials {
    pub email: String,
    pub password: String,
}

impl OneMapCredentials {
    /// Read credentials from `ONE_MAP_EMAIL` / `ONE_MAP_PASS`.
    pub fn from_env() -> Result<Self, ApiError> {
        let email = env::var("ONE_MAP_EMAIL")
            .map_err(|_| ApiError::MissingCredentials("ONE_MAP_EMAIL"))?;
        let password = env::var("ONE_MAP_PASS")
            .map_err(|_| ApiError::MissingCredentials("ONE_MAP_PASS"))?;

        Ok(Self { email, password })
    }
}

/// Authenticated OneMap client. The bearer token is obtained once at
/// construction and held for the lifetime of the client; a run is short
/// enough that no refresh logic is needed.
pub struct OneMapClient {
    http: reqwest::Client,
    token: String,
}

impl OneMapClient {
    pub async fn authenticate(
        credentials: &OneMapCredentials,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let url = format!("{ONEMAP_API_URL}/auth/post/getToken");
        log::debug!("requesting token from '{url}'");

        let response = http
            .post(&url)
            .json(&TokenRequest {
                email: credentials.email.clone(),
                password: credentials.password.clone(),
            })
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let token: TokenResponse = response.json().await?;
                Ok(Self {
                    http,
                    token: token.access_token,
                })
            }
            other => Err(ApiError::AuthRejected { status_code: other }),
        }
    }

    /// Geocode a single postal code. One network round trip per call,
    /// no retries; retry policy belongs to the caller.
    pub async fn search(&self, postal: &str) -> Result<(f64, f64), ApiError> {
        let url = format!("{ONEMAP_API_URL}/common/elastic/search");
        log::debug!("searching postal '{postal}'");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("searchVal", postal),
                ("returnGeom", "Y"),
                ("getAddrDetails", "Y"),
                ("pageNum", "1"),
            ])
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let body: SearchResponse = response.json().await?;
                let first = body
                    .results
                    .into_iter()
                    .next()
                    .ok_or_else(|| ApiError::NoResult(postal.to_owned()))?;
                extract_coordinate(&first, &url)
            }
            other => match response.text().await {
                Ok(text) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(text),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

fn extract_coordinate(result: &SearchResult, url: &str) -> Result<(f64, f64), ApiError> {
    match (result.latitude.value(), result.longitude.value()) {
        (Some(latitude), Some(longitude)) => Ok((latitude, longitude)),
        _ => Err(ApiError::InvalidResponse {
            status_code: reqwest::StatusCode::OK,
            url: url.to_owned(),
            response: Some("result carries unparsable coordinates".to_owned()),
        }),
    }
}

#[async_trait]
impl Geocoder for OneMapClient {
    async fn resolve(&self, postal: &str) -> Result<(f64, f64), ApiError> {
        self.search(postal).await
    }
}
