//! TMDB catalog provider.
//!
//! Thin HTTP client over the TMDB v3 API. Outbound calls carry a bounded
//! timeout and a single retry on transport failures, 5xx responses, and rate
//! limiting; anything else surfaces immediately.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::debug;

use reelist_model::MovieId;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Provider connection settings. Defaults target the public TMDB API.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSettings {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Region used for certification lookups.
    #[serde(default = "default_region")]
    pub region: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl TmdbSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            region: default_region(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W342,
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

/// Build a full poster URL from an image base and a TMDB poster path.
pub fn poster_url(image_base: &str, size: PosterSize, path: &str) -> String {
    format!("{}/{}{}", image_base, size.as_str(), path)
}

/// Full movie record as returned by the details endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub adult: bool,
    pub original_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// Lightweight search result.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSearchHit {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub release_date: Option<NaiveDate>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub adult: bool,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    results: Vec<MovieSearchHit>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDatesEnvelope {
    results: Vec<RegionReleases>,
}

#[derive(Debug, Deserialize)]
struct RegionReleases {
    iso_3166_1: String,
    #[serde(default)]
    release_dates: Vec<RegionReleaseDate>,
}

#[derive(Debug, Deserialize)]
struct RegionReleaseDate {
    #[serde(default)]
    certification: String,
}

/// TMDB serializes a missing date as either `null` or `""`.
fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Read access to the external movie catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the current record for an identifier. `NotFound` means the
    /// provider no longer knows the id at all.
    async fn fetch_movie(&self, id: MovieId) -> Result<MovieDetails, ProviderError>;

    /// Fetch the certification for the configured region, if any.
    async fn fetch_certification(&self, id: MovieId)
    -> Result<Option<String>, ProviderError>;

    /// Free-text title search.
    async fn search_movies(&self, query: &str)
    -> Result<Vec<MovieSearchHit>, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    settings: TmdbSettings,
}

impl TmdbProvider {
    pub fn new(settings: TmdbSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &TmdbSettings {
        &self.settings
    }

    /// Build a full poster URL for a poster path from this provider.
    pub fn poster_url(&self, path: &str, size: PosterSize) -> String {
        poster_url(&self.settings.image_base_url, size, path)
    }

    /// GET a JSON resource, retrying once on transport errors, 5xx and 429.
    async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.settings.base_url, path);
        let mut last_err: Option<ProviderError> = None;

        for attempt in 0..2 {
            if attempt > 0 {
                debug!(url = %url, "retrying catalog request");
            }

            let result = self
                .client
                .get(&url)
                .query(&[("api_key", self.settings.api_key.as_str())])
                .query(query)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<T>()
                            .await
                            .map_err(|e| ProviderError::ParseError(e.to_string()));
                    }
                    match status {
                        StatusCode::NOT_FOUND => return Err(ProviderError::NotFound),
                        StatusCode::UNAUTHORIZED => {
                            return Err(ProviderError::InvalidApiKey);
                        }
                        StatusCode::TOO_MANY_REQUESTS => {
                            last_err = Some(ProviderError::RateLimited);
                        }
                        status if status.is_server_error() => {
                            last_err = Some(ProviderError::ApiError(format!(
                                "upstream returned {status}"
                            )));
                        }
                        status => {
                            return Err(ProviderError::ApiError(format!(
                                "upstream returned {status}"
                            )));
                        }
                    }
                }
                Err(err) => last_err = Some(ProviderError::NetworkError(err)),
            }
        }

        Err(last_err
            .unwrap_or_else(|| ProviderError::ApiError("request failed".to_string())))
    }
}

#[async_trait]
impl CatalogProvider for TmdbProvider {
    async fn fetch_movie(&self, id: MovieId) -> Result<MovieDetails, ProviderError> {
        self.get_json(&format!("/movie/{id}"), &[]).await
    }

    async fn fetch_certification(
        &self,
        id: MovieId,
    ) -> Result<Option<String>, ProviderError> {
        let envelope: ReleaseDatesEnvelope = self
            .get_json(&format!("/movie/{id}/release_dates"), &[])
            .await?;
        Ok(extract_certification(&envelope, &self.settings.region))
    }

    async fn search_movies(
        &self,
        query: &str,
    ) -> Result<Vec<MovieSearchHit>, ProviderError> {
        let envelope: SearchEnvelope = self
            .get_json("/search/movie", &[("query", query), ("include_adult", "false")])
            .await?;
        Ok(envelope.results)
    }
}

/// The first certification listed for the target region, empty string
/// normalized to `None`.
fn extract_certification(
    envelope: &ReleaseDatesEnvelope,
    region: &str,
) -> Option<String> {
    envelope
        .results
        .iter()
        .find(|r| r.iso_3166_1 == region)
        .and_then(|r| r.release_dates.first())
        .map(|entry| entry.certification.clone())
        .filter(|certification| !certification.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_details_tolerate_sparse_payloads() {
        let raw = serde_json::json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "poster_path": "/matrix.jpg",
            "overview": "A hacker learns the truth.",
            "adult": false,
            "original_language": "en"
        });
        let details: MovieDetails = serde_json::from_value(raw).unwrap();
        assert_eq!(details.id, 603);
        assert_eq!(
            details.release_date,
            NaiveDate::from_ymd_opt(1999, 3, 30)
        );
        assert_eq!(details.genres.len(), 2);

        // Unreleased entries often ship with nulls and an empty date.
        let sparse = serde_json::json!({
            "id": 1,
            "title": "Untitled Project",
            "release_date": "",
            "runtime": null,
            "poster_path": null,
            "overview": null,
            "original_language": null
        });
        let details: MovieDetails = serde_json::from_value(sparse).unwrap();
        assert_eq!(details.release_date, None);
        assert_eq!(details.runtime, None);
        assert!(details.genres.is_empty());
        assert!(!details.adult);
    }

    #[test]
    fn certification_picks_first_entry_for_region() {
        let envelope: ReleaseDatesEnvelope = serde_json::from_value(serde_json::json!({
            "results": [
                {"iso_3166_1": "DE", "release_dates": [{"certification": "16"}]},
                {"iso_3166_1": "US", "release_dates": [
                    {"certification": "R"},
                    {"certification": "PG-13"}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(extract_certification(&envelope, "US"), Some("R".to_string()));
        assert_eq!(extract_certification(&envelope, "DE"), Some("16".to_string()));
        assert_eq!(extract_certification(&envelope, "FR"), None);
    }

    #[test]
    fn empty_certification_degrades_to_none() {
        let envelope: ReleaseDatesEnvelope = serde_json::from_value(serde_json::json!({
            "results": [
                {"iso_3166_1": "US", "release_dates": [{"certification": ""}]}
            ]
        }))
        .unwrap();
        assert_eq!(extract_certification(&envelope, "US"), None);

        let no_dates: ReleaseDatesEnvelope = serde_json::from_value(serde_json::json!({
            "results": [{"iso_3166_1": "US", "release_dates": []}]
        }))
        .unwrap();
        assert_eq!(extract_certification(&no_dates, "US"), None);
    }

    #[test]
    fn poster_url_formats_like_tmdb() {
        assert_eq!(
            poster_url("https://image.tmdb.org/t/p", PosterSize::W500, "/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }
}
