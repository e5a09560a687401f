//! Non-interactive subcommands.

use std::io::Write as _;

use anyhow::Context as _;
use folio_application::EMPTY_SEARCH_MESSAGE;
use folio_client::{ApiClient, ApiError};
use folio_core::{BookId, Pagination, Settings, Theme, filter_books};
use folio_storage::Storage;

use crate::cli::ThemeAction;

fn api_failure(err: ApiError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

fn book_arg(raw: &str) -> anyhow::Result<BookId> {
    let name = raw.trim();
    if name.is_empty() {
        anyhow::bail!(EMPTY_SEARCH_MESSAGE);
    }
    Ok(BookId::new(name))
}

pub async fn books(client: &ApiClient, filter: Option<&str>) -> anyhow::Result<()> {
    let books = client.list_books().await.map_err(api_failure)?;
    let mut out = std::io::stdout().lock();
    for book in filter_books(&books, filter.unwrap_or_default()) {
        writeln!(out, "{book}")?;
    }
    Ok(())
}

pub async fn summary(client: &ApiClient, settings: &Settings, book: &str) -> anyhow::Result<()> {
    let book = book_arg(book)?;
    let summary = client
        .summarize(&book, settings.summary_words)
        .await
        .map_err(api_failure)?;
    let mut out = std::io::stdout().lock();
    for word in &summary.top_words {
        writeln!(out, "{}\t{}", word.word, word.score_label())?;
    }
    Ok(())
}

pub async fn recommend(client: &ApiClient, settings: &Settings, book: &str) -> anyhow::Result<()> {
    let book = book_arg(book)?;
    let recommendations = client
        .recommend(&book, settings.recommendation_count)
        .await
        .map_err(api_failure)?;
    let mut out = std::io::stdout().lock();
    for (index, rec) in recommendations.recommendations.iter().enumerate() {
        writeln!(
            out,
            "#{}\t{}\t{}",
            index + 1,
            rec.book_name.display_title(),
            rec.similarity_label()
        )?;
    }
    Ok(())
}

pub async fn read(
    client: &ApiClient,
    settings: &Settings,
    book: &str,
    page: i64,
) -> anyhow::Result<()> {
    let book = book_arg(book)?;
    let text = client.read_book(&book).await.map_err(api_failure)?;
    let mut pagination = Pagination::from_text(&text, settings.lines_per_page);
    pagination.go_to(page);

    let mut out = std::io::stdout().lock();
    for line in pagination.page_lines() {
        writeln!(out, "{line}")?;
    }
    eprintln!(
        "Page {} of {}",
        pagination.page(),
        pagination.total_pages().max(1)
    );
    Ok(())
}

pub fn theme(storage: &Storage, action: Option<ThemeAction>) -> anyhow::Result<()> {
    let current = storage.load_theme()?;
    let next = match action {
        None => current,
        Some(ThemeAction::Light) => Theme::Light,
        Some(ThemeAction::Dark) => Theme::Dark,
        Some(ThemeAction::Toggle) => current.toggle(),
    };
    if next != current {
        storage.save_theme(next).context("save theme")?;
        tracing::info!(from = %current, to = %next, "theme changed");
    }
    println!("{next}");
    Ok(())
}
