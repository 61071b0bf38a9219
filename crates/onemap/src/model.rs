use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "LATITUDE")]
    pub latitude: CoordinateField,
    #[serde(rename = "LONGITUDE")]
    pub longitude: CoordinateField,
}

/// OneMap serializes coordinates as strings, but some endpoints have
/// shipped plain numbers. Accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoordinateField {
    Text(String),
    Number(f64),
}

impl CoordinateField {
    pub fn value(&self) -> Option<f64> {
        match self {
            CoordinateField::Text(text) => text.trim().parse().ok(),
            CoordinateField::Number(number) => Some(*number),
        }
    }
}
