//! HTTP client for the translation and dictionary backend.
//!
//! The backend is an external service; this client only knows its routes:
//! - `GET  /scan/translate`
//! - `POST /scan/translate`        `{ imageData }`
//! - `POST /api/search/general`    `{ query }`
//! - `GET  /api/search/kanji/:ch`

mod types;

pub use types::{
    ExampleSentence, ExampleWord, KanjiInfo, SearchResult, Sense, SenseExample, SimilarKanji,
    TranslationResponse, WordEntry,
};

use crate::config::AppConfig;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use types::{SearchRequest, SearchResponse, TranslateRequest};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid backend URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {path} failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned {status} for {path}: {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend reported an error: {0}")]
    Backend(String),

    #[error("Backend returned no translated text")]
    EmptyTranslation,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Self::with_client(http, &config.backend_url)
    }

    /// Client with default settings against `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), base_url)
    }

    fn with_client(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL with extra path segments appended (each segment is
    /// percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /scan/translate`: translation of the backend's current image.
    pub async fn fetch_translation(&self) -> Result<String, ApiError> {
        let path = "/scan/translate";
        let start = std::time::Instant::now();
        let response = self
            .http
            .get(self.endpoint(&["scan", "translate"]))
            .send()
            .await
            .map_err(|source| network(path, source))?;

        let body: TranslationResponse = decode(path, response).await?;
        log::info!("[API] GET {} in {}ms", path, start.elapsed().as_millis());
        translated_text(body)
    }

    /// `POST /scan/translate`: OCR and translate a PNG data URL.
    pub async fn translate_image(&self, data_url: &str) -> Result<String, ApiError> {
        let path = "/scan/translate";
        let start = std::time::Instant::now();
        let response = self
            .http
            .post(self.endpoint(&["scan", "translate"]))
            .json(&TranslateRequest { image_data: data_url })
            .send()
            .await
            .map_err(|source| network(path, source))?;

        let body: TranslationResponse = decode(path, response).await?;
        log::info!(
            "[API] POST {} ({} bytes) in {}ms",
            path,
            data_url.len(),
            start.elapsed().as_millis()
        );
        translated_text(body)
    }

    /// `POST /api/search/general`.
    ///
    /// An empty or whitespace-only query returns no results without a request.
    pub async fn search_general(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let path = "/api/search/general";
        let start = std::time::Instant::now();
        let response = self
            .http
            .post(self.endpoint(&["api", "search", "general"]))
            .json(&SearchRequest { query })
            .send()
            .await
            .map_err(|source| network(path, source))?;

        let body: SearchResponse = decode(path, response).await?;
        log::info!(
            "[API] Search '{}' returned {} results in {}ms",
            query,
            body.results.len(),
            start.elapsed().as_millis()
        );
        Ok(body.results)
    }

    /// `GET /api/search/kanji/:character`. A 404 is `Ok(None)`.
    pub async fn kanji_detail(&self, character: char) -> Result<Option<KanjiInfo>, ApiError> {
        let path = "/api/search/kanji";
        let segment = character.to_string();
        let response = self
            .http
            .get(self.endpoint(&["api", "search", "kanji", &segment]))
            .send()
            .await
            .map_err(|source| network(path, source))?;

        if response.status() == StatusCode::NOT_FOUND {
            log::info!("[API] Kanji '{}' not found", character);
            return Ok(None);
        }

        decode(path, response).await
    }
}

fn network(path: &str, source: reqwest::Error) -> ApiError {
    ApiError::Network {
        path: path.to_string(),
        source,
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            path: path.to_string(),
            status,
            body,
        });
    }
    response.json::<T>().await.map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

fn translated_text(body: TranslationResponse) -> Result<String, ApiError> {
    if let Some(error) = body.error {
        let detail = match body.message {
            Some(message) => format!("{} ({})", message, error),
            None => error,
        };
        return Err(ApiError::Backend(detail));
    }
    body.translated_text
        .filter(|t| !t.trim().is_empty())
        .ok_or(ApiError::EmptyTranslation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_to_base_path() {
        let client = BackendClient::with_base_url("http://localhost:8000/backend/").unwrap();
        assert_eq!(
            client.endpoint(&["api", "search", "general"]).as_str(),
            "http://localhost:8000/backend/api/search/general"
        );
    }

    #[test]
    fn kanji_segment_is_percent_encoded() {
        let client = BackendClient::with_base_url("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint(&["api", "search", "kanji", "日"]).as_str(),
            "http://localhost:8000/api/search/kanji/%E6%97%A5"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            BackendClient::with_base_url("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            BackendClient::with_base_url("mailto:someone@example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn in_band_backend_error_is_surfaced() {
        let body = TranslationResponse {
            message: Some("Failed to process image.".into()),
            translated_text: None,
            error: Some("Image not found".into()),
        };
        let err = translated_text(body).unwrap_err();
        assert!(err.to_string().contains("Image not found"));
    }

    #[test]
    fn blank_translation_is_empty() {
        let body = TranslationResponse {
            translated_text: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(translated_text(body), Err(ApiError::EmptyTranslation)));
    }
}
