//! Core domain types for folio.

use serde::{Deserialize, Serialize};

mod pagination;

pub use pagination::{PageNav, Pagination, parse_page_number};

/// Lines-per-page values offered by the reader's selector.
pub const LINES_PER_PAGE_CHOICES: [usize; 4] = [20, 30, 50, 100];

pub const SUMMARY_WORDS_RANGE: std::ops::RangeInclusive<usize> = 5..=50;
pub const RECOMMENDATION_COUNT_RANGE: std::ops::RangeInclusive<usize> = 1..=20;

/// Raw book identifier as served by the backend, e.g. `Moby_Dick.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl BookId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-friendly title: underscores become spaces and one trailing file
    /// extension is dropped.
    pub fn display_title(&self) -> String {
        let stem = match self.0.rsplit_once('.') {
            Some((stem, ext))
                if !stem.is_empty()
                    && !ext.is_empty()
                    && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                stem
            }
            _ => self.0.as_str(),
        };
        stem.replace('_', " ")
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Case-insensitive substring filter over raw identifiers. Order is preserved.
pub fn filter_books<'a>(books: &'a [BookId], query: &str) -> Vec<&'a BookId> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return books.iter().collect();
    }
    books
        .iter()
        .filter(|book| book.0.to_lowercase().contains(&query))
        .collect()
}

/// First identifier starting with `prefix` (case-insensitive), in list order.
pub fn complete_book_name<'a>(books: &'a [BookId], prefix: &str) -> Option<&'a BookId> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return None;
    }
    books
        .iter()
        .find(|book| book.0.to_lowercase().starts_with(&prefix))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Symbol for the theme a toggle would switch to.
    pub fn indicator(&self) -> &'static str {
        match self {
            Theme::Light => "☾",
            Theme::Dark => "☀",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err("unknown theme"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub lines_per_page: usize,
    pub summary_words: usize,
    pub recommendation_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            lines_per_page: 30,
            summary_words: 20,
            recommendation_count: 10,
        }
    }
}

impl Settings {
    pub fn normalize(&mut self) {
        self.lines_per_page = self.lines_per_page.max(1);
        self.summary_words = self
            .summary_words
            .clamp(*SUMMARY_WORDS_RANGE.start(), *SUMMARY_WORDS_RANGE.end());
        self.recommendation_count = self.recommendation_count.clamp(
            *RECOMMENDATION_COUNT_RANGE.start(),
            *RECOMMENDATION_COUNT_RANGE.end(),
        );
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }
}

/// Next entry of [`LINES_PER_PAGE_CHOICES`], wrapping around. Values that are
/// not one of the choices restart at the first one.
pub fn next_lines_per_page(current: usize) -> usize {
    match LINES_PER_PAGE_CHOICES.iter().position(|v| *v == current) {
        Some(idx) => LINES_PER_PAGE_CHOICES[(idx + 1) % LINES_PER_PAGE_CHOICES.len()],
        None => LINES_PER_PAGE_CHOICES[0],
    }
}

/// A `[word, score]` pair from the summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct TopWord {
    pub word: String,
    pub score: f64,
}

impl From<(String, f64)> for TopWord {
    fn from((word, score): (String, f64)) -> Self {
        Self { word, score }
    }
}

impl From<TopWord> for (String, f64) {
    fn from(value: TopWord) -> Self {
        (value.word, value.score)
    }
}

impl TopWord {
    pub fn score_label(&self) -> String {
        format!("{:.2}", self.score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub book_name: Option<String>,
    pub summary: Option<String>,
    pub top_words: Vec<TopWord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub book_name: BookId,
    pub similarity: f64,
}

impl Recommendation {
    pub fn similarity_percent(&self) -> f64 {
        self.similarity * 100.0
    }

    pub fn similarity_label(&self) -> String {
        format!("{:.2}%", self.similarity_percent())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    pub book_name: Option<String>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Health {
    pub status: String,
    pub spark_initialized: bool,
    pub books_analyzed: usize,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub summary: Summary,
    pub recommendations: Recommendations,
}
