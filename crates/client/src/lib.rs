//! HTTP client for the book analysis backend (`/api/v1`).
//!
//! One network attempt per call: no retries, timeouts or backoff.

use folio_core::{BookId, Health, Recommendations, SearchResults, Summary};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

const LIST_BOOKS_FAILED: &str = "failed to load the book list";
const SUMMARY_FAILED: &str = "failed to fetch top words";
const RECOMMEND_FAILED: &str = "failed to fetch recommendations";
const READ_FAILED: &str = "failed to load the book";
const HEALTH_FAILED: &str = "backend health check failed";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx answer. `message` is the backend's `detail` when it sent one.
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("could not reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid API url `{0}`")]
    InvalidUrl(String),
}

impl ApiError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// How a non-2xx body is turned into a message.
#[derive(Debug, Clone, Copy)]
enum ErrorBody {
    /// Prefer the JSON `detail` string, else the fallback.
    Detail(&'static str),
    /// Always the fallback.
    Generic(&'static str),
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    book_name: &'a str,
    top_words: usize,
}

#[derive(Debug, Serialize)]
struct RecommendRequest<'a> {
    book_name: &'a str,
    k: usize,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Base URL with `segments` appended, each percent-encoded as one path
    /// segment.
    pub fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn list_books(&self) -> Result<Vec<BookId>, ApiError> {
        let url = self.endpoint(["books"]);
        let body = self
            .send(self.http.get(url.clone()), &url, ErrorBody::Generic(LIST_BOOKS_FAILED))
            .await?;
        decode(&url, &body)
    }

    pub async fn summarize(&self, book: &BookId, top_words: usize) -> Result<Summary, ApiError> {
        let url = self.endpoint(["books", "summary"]);
        let request = self.http.post(url.clone()).json(&SummaryRequest {
            book_name: book.as_str(),
            top_words,
        });
        let body = self
            .send(request, &url, ErrorBody::Detail(SUMMARY_FAILED))
            .await?;
        decode(&url, &body)
    }

    pub async fn recommend(&self, book: &BookId, k: usize) -> Result<Recommendations, ApiError> {
        let url = self.endpoint(["books", "recommend"]);
        let request = self.http.post(url.clone()).json(&RecommendRequest {
            book_name: book.as_str(),
            k,
        });
        let body = self
            .send(request, &url, ErrorBody::Detail(RECOMMEND_FAILED))
            .await?;
        decode(&url, &body)
    }

    /// Raw text of a book.
    pub async fn read_book(&self, book: &BookId) -> Result<String, ApiError> {
        let url = self.endpoint(["books", "read", book.as_str()]);
        self.send(self.http.get(url.clone()), &url, ErrorBody::Generic(READ_FAILED))
            .await
    }

    pub async fn health(&self) -> Result<Health, ApiError> {
        let url = self.endpoint(["books", "health"]);
        let body = self
            .send(self.http.get(url.clone()), &url, ErrorBody::Generic(HEALTH_FAILED))
            .await?;
        decode(&url, &body)
    }

    /// Summary and recommendations fetched concurrently. Both must succeed;
    /// the first failure to arrive is returned.
    pub async fn search(
        &self,
        book: &BookId,
        top_words: usize,
        k: usize,
    ) -> Result<SearchResults, ApiError> {
        let (summary, recommendations) =
            tokio::try_join!(self.summarize(book, top_words), self.recommend(book, k))?;
        Ok(SearchResults {
            summary,
            recommendations,
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
        on_error: ErrorBody,
    ) -> Result<String, ApiError> {
        tracing::debug!(%url, "backend request");
        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(|err| {
            tracing::warn!(%url, ?err, "backend unreachable");
            transport(err)
        })?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let message = match on_error {
                ErrorBody::Detail(fallback) => {
                    parse_detail(&body).unwrap_or_else(|| fallback.to_string())
                }
                ErrorBody::Generic(fallback) => fallback.to_string(),
            };
            tracing::warn!(%url, status = status.as_u16(), %message, "backend request failed");
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(url: &Url, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

/// `detail` string of a FastAPI-style error body. Structured details (e.g.
/// validation error lists) are not surfaced.
fn parse_detail(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let detail = value.get("detail")?.as_str()?.trim();
    if detail.is_empty() {
        None
    } else {
        Some(detail.to_owned())
    }
}
