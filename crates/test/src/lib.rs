//! Test helpers and fixtures.

use folio_application::AppState;
use folio_core::{BookId, Settings, Theme};

mod stub;

pub use stub::{ApiStub, RecordedRequest, StubResponse, sample_backend};

pub const SAMPLE_BOOKS: [&str; 3] = [
    "Moby_Dick.txt",
    "War_and_Peace.txt",
    "Pride_and_Prejudice.txt",
];

pub fn make_settings(lines_per_page: usize) -> Settings {
    Settings {
        theme: Theme::Light,
        lines_per_page,
        summary_words: 20,
        recommendation_count: 10,
    }
}

pub fn sample_books() -> Vec<BookId> {
    SAMPLE_BOOKS.iter().map(|name| BookId::from(*name)).collect()
}

/// `n` lines reading `line 1` .. `line n`, newline separated.
pub fn numbered_text(n: usize) -> String {
    (1..=n)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// State with the sample library already loaded.
pub fn loaded_state(lines_per_page: usize) -> AppState {
    AppState::new(make_settings(lines_per_page)).with_books(sample_books())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_settings() {
        let settings = make_settings(12);
        assert_eq!(settings.lines_per_page, 12);
    }

    #[test]
    fn numbered_text_has_requested_lines() {
        assert_eq!(numbered_text(65).split('\n').count(), 65);
    }
}
