//! Rendering. Everything here reads [`AppState`] and [`ViewState`] and
//! draws; nothing mutates application state.

use folio_application::{AppState, LibraryStatus, ReaderPhase, SearchView};
use folio_core::{BookId, Recommendations, Summary, Theme};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph, Wrap,
};
use unicode_width::{UnicodeWidthChar as _, UnicodeWidthStr};

const SIMILARITY_BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Library,
    Recommendations,
}

/// Cursor and input state that only matters to the terminal view.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub focus: Focus,
    pub library_cursor: usize,
    pub recommendation_cursor: usize,
    /// Direct page entry buffer while the "go to page" prompt is open.
    pub page_input: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus: Focus::Search,
            library_cursor: 0,
            recommendation_cursor: 0,
            page_input: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            muted: Color::DarkGray,
            accent: Color::Blue,
            error: Color::Red,
        },
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::Gray,
            muted: Color::DarkGray,
            accent: Color::Yellow,
            error: Color::LightRed,
        },
    }
}

pub fn render(frame: &mut Frame, state: &AppState, view: &ViewState) {
    let area = frame.area();
    let colors = palette(state.theme());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg).fg(colors.fg)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, layout[0], state, colors);
    draw_search_bar(frame, layout[1], state, view, colors);

    if state.library_open {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(layout[2]);
        draw_library(frame, body[0], state, view, colors);
        draw_results(frame, body[1], state, view, colors);
    } else {
        draw_results(frame, layout[2], state, view, colors);
    }

    draw_footer(frame, layout[3], state, view, colors);

    if state.reader.is_open() {
        draw_reader(frame, area, state, colors);
        if view.page_input.is_some() {
            draw_page_prompt(frame, area, state, view, colors);
        }
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState, colors: Palette) {
    let health = match &state.health {
        None => Span::styled("backend: checking…", Style::default().fg(colors.muted)),
        Some(Ok(health)) if health.is_healthy() => Span::styled(
            format!("backend: healthy · {} books analyzed", health.books_analyzed),
            Style::default().fg(colors.muted),
        ),
        Some(Ok(health)) => Span::styled(
            format!("backend: {}", health.status),
            Style::default().fg(colors.error),
        ),
        Some(Err(message)) => Span::styled(
            format!("backend: {message}"),
            Style::default().fg(colors.error),
        ),
    };

    let line = Line::from(vec![
        Span::styled(
            "folio",
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" · book analysis  "),
        health,
        Span::raw("  "),
        Span::styled(
            format!("[{} Ctrl+t]", state.theme().indicator()),
            Style::default().fg(colors.accent),
        ),
    ]);
    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_search_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &ViewState,
    colors: Palette,
) {
    let focused = view.focus == Focus::Search;
    let block = focus_block("Book", focused, colors);
    let width = block.inner(area).width.saturating_sub(1) as usize;

    let mut spans = Vec::new();
    if state.search_input.is_empty() && !focused {
        spans.push(Span::styled(
            "type a book name, e.g. Moby_Dick.txt",
            Style::default().fg(colors.muted),
        ));
    } else {
        spans.push(Span::raw(tail_fit(&state.search_input, width).to_string()));
    }
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(colors.accent)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_library(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &ViewState,
    colors: Palette,
) {
    let focused = view.focus == Focus::Library;
    let filtered = state.filtered_books();
    let title = if state.library_query.is_empty() {
        "Library".to_string()
    } else {
        format!("Library · {}/{} matches", filtered.len(), state.books.len())
    };
    let block = focus_block(&title, focused, colors);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let filter = Paragraph::new(Line::from(vec![
        Span::styled("Filter: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(state.library_query.clone()),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(filter, sections[0]);

    let placeholder = match &state.library_status {
        LibraryStatus::Loading if state.books.is_empty() => {
            Some(vec![Line::raw("Loading library…")])
        }
        LibraryStatus::Failed(message) if state.books.is_empty() => Some(vec![
            Line::from(Span::styled(message.clone(), Style::default().fg(colors.error))),
            Line::raw(""),
            Line::raw("Ctrl+r retries."),
        ]),
        _ if filtered.is_empty() => Some(vec![Line::styled(
            "No books found",
            Style::default().fg(colors.muted),
        )]),
        _ => None,
    };
    if let Some(lines) = placeholder {
        let paragraph = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, sections[1]);
        return;
    }

    let max_title_width = sections[1].width.saturating_sub(3) as usize;
    let items: Vec<ListItem> = filtered
        .iter()
        .map(|book| {
            let wrapped = wrap_text(&book.display_title(), max_title_width.max(8));
            ListItem::new(Text::from(
                wrapped.into_iter().map(Line::raw).collect::<Vec<_>>(),
            ))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(highlight_style(focused, colors))
        .highlight_symbol("> ")
        .highlight_spacing(HighlightSpacing::Always);
    let mut list_state = ListState::default();
    list_state.select(Some(view.library_cursor.min(filtered.len() - 1)));
    frame.render_stateful_widget(list, sections[1], &mut list_state);
}

fn draw_results(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &ViewState,
    colors: Palette,
) {
    let message = match &state.search {
        SearchView::Idle => Some(Paragraph::new(Text::from(vec![
            Line::raw("Type a book name and press Enter,"),
            Line::raw("or open the library with Ctrl+l."),
        ]))),
        SearchView::Loading { book } => Some(Paragraph::new(Line::styled(
            format!("Analyzing {}…", book.display_title()),
            Style::default().fg(colors.accent),
        ))),
        SearchView::Failed(message) => Some(Paragraph::new(Line::styled(
            message.clone(),
            Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
        ))),
        SearchView::Ready { .. } => None,
    };
    if let Some(paragraph) = message {
        let paragraph = paragraph
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Results"));
        frame.render_widget(paragraph, area);
        return;
    }

    let SearchView::Ready { book, results } = &state.search else {
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    draw_top_words(frame, sections[0], book, &results.summary, colors);
    draw_recommendations(
        frame,
        sections[1],
        &results.recommendations,
        view,
        colors,
    );
}

fn draw_top_words(frame: &mut Frame, area: Rect, book: &BookId, summary: &Summary, colors: Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Top words · {}", book.display_title()));

    let mut lines = Vec::new();
    if let Some(text) = summary.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(Line::styled(
            text.to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
        lines.push(Line::raw(""));
    }

    let mut tags = Vec::new();
    for (idx, top) in summary.top_words.iter().enumerate() {
        if idx > 0 {
            tags.push(Span::raw("  "));
        }
        tags.push(Span::styled(
            top.word.clone(),
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        ));
        tags.push(Span::raw(" "));
        tags.push(Span::styled(top.score_label(), Style::default().fg(colors.muted)));
    }
    if tags.is_empty() {
        lines.push(Line::styled("No words returned.", Style::default().fg(colors.muted)));
    } else {
        lines.push(Line::from(tags));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_recommendations(
    frame: &mut Frame,
    area: Rect,
    recommendations: &Recommendations,
    view: &ViewState,
    colors: Palette,
) {
    let focused = view.focus == Focus::Recommendations;
    let block = focus_block("Recommendations · Enter reads", focused, colors);

    if recommendations.recommendations.is_empty() {
        let paragraph = Paragraph::new(Line::styled(
            "No recommendations returned.",
            Style::default().fg(colors.muted),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = recommendations
        .recommendations
        .iter()
        .enumerate()
        .map(|(idx, rec)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("#{:<3}", idx + 1),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(rec.book_name.display_title()),
                Span::raw("  "),
                Span::styled(
                    similarity_bar(rec.similarity, SIMILARITY_BAR_WIDTH),
                    Style::default().fg(colors.accent),
                ),
                Span::raw(" "),
                Span::raw(rec.similarity_label()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(focused, colors))
        .highlight_symbol("> ")
        .highlight_spacing(HighlightSpacing::Always);
    let mut list_state = ListState::default();
    list_state.select(Some(
        view.recommendation_cursor
            .min(recommendations.recommendations.len() - 1),
    ));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &AppState, view: &ViewState, colors: Palette) {
    let key = |label: &'static str| Span::styled(label, Style::default().add_modifier(Modifier::BOLD));
    let mut spans = match view.focus {
        Focus::Search => vec![key("Enter"), Span::raw(" analyze  "), key("→"), Span::raw(" complete  ")],
        Focus::Library => vec![
            key("type"),
            Span::raw(" filter  "),
            key("↑/↓"),
            Span::raw(" select  "),
            key("Enter"),
            Span::raw(" analyze  "),
        ],
        Focus::Recommendations => vec![key("↑/↓"), Span::raw(" select  "), key("Enter"), Span::raw(" read  ")],
    };
    spans.extend([
        key("Tab"),
        Span::raw(" focus  "),
        key("Ctrl+l"),
        Span::raw(" library  "),
        key("Ctrl+r"),
        Span::raw(" reload  "),
        key("Esc"),
        Span::raw(" quit"),
    ]);

    let mut lines = vec![Line::from(spans)];
    if let Some(notice) = &state.notice {
        lines.insert(0, Line::styled(notice.clone(), Style::default().fg(colors.muted)));
    }
    let footer = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

fn draw_reader(frame: &mut Frame, area: Rect, state: &AppState, colors: Palette) {
    let popup_area = centered_rect(92, 90, area);
    frame.render_widget(Clear, popup_area);

    let title = state
        .reader
        .book
        .as_ref()
        .map(BookId::display_title)
        .unwrap_or_else(|| "Reader".to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(colors.bg).fg(colors.fg))
        .border_style(Style::default().fg(colors.accent))
        .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);

    match &state.reader.phase {
        ReaderPhase::Closed => {}
        ReaderPhase::Loading => {
            let paragraph = Paragraph::new("Loading book…").alignment(Alignment::Center);
            frame.render_widget(paragraph, sections[0]);
        }
        ReaderPhase::Failed(message) => {
            let paragraph = Paragraph::new(Line::styled(
                format!("Error: {message}"),
                Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, sections[0]);
        }
        ReaderPhase::Open => {
            if let Some(pagination) = state.reader.visible_pagination() {
                let text = Text::from(
                    pagination
                        .page_lines()
                        .iter()
                        .map(|line| Line::raw(line.clone()))
                        .collect::<Vec<_>>(),
                );
                frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), sections[0]);
            }
        }
    }

    let (can_prev, can_next, status) = match state.reader.visible_pagination() {
        Some(pagination) => (
            pagination.can_go_prev(),
            pagination.can_go_next(),
            format!(
                "Page {} of {} · {} lines/page · {:.0}%",
                pagination.page(),
                pagination.total_pages(),
                pagination.lines_per_page(),
                pagination.percent()
            ),
        ),
        None => (
            false,
            false,
            format!("{} lines/page", state.settings.lines_per_page),
        ),
    };

    let nav = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.muted).add_modifier(Modifier::DIM)
        };
        Span::styled(label, style)
    };
    let lines = vec![
        Line::from(Span::styled(status, Style::default().fg(colors.accent))),
        Line::from(vec![
            nav("Home", can_prev),
            Span::raw(" first  "),
            nav("←/PgUp", can_prev),
            Span::raw(" prev  "),
            nav("→/PgDn", can_next),
            Span::raw(" next  "),
            nav("End", can_next),
            Span::raw(" last  "),
            nav("g", true),
            Span::raw(" go to  "),
            nav("l", true),
            Span::raw(" lines/page  "),
            nav("Esc", true),
            Span::raw(" close"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        sections[1],
    );
}

fn draw_page_prompt(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &ViewState,
    colors: Palette,
) {
    let popup_area = centered_rect(48, 28, area);
    frame.render_widget(Clear, popup_area);

    let title = match state.reader.visible_pagination() {
        Some(pagination) => format!("Go to page (1..={})", pagination.total_pages().max(1)),
        None => "Go to page".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(colors.bg).fg(colors.fg))
        .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::from(vec![
            Span::styled("Page: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(view.page_input.clone().unwrap_or_default()),
        ]),
        Line::raw(""),
        Line::raw("Enter jumps, Esc cancels, Ctrl+u clears."),
    ];
    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn focus_block(title: &str, focused: bool, colors: Palette) -> Block<'static> {
    let border = if focused {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.muted)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title.to_string())
}

fn highlight_style(focused: bool, colors: Palette) -> Style {
    if focused {
        Style::default()
            .fg(colors.bg)
            .bg(colors.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// `similarity` in [0, 1] drawn as a fixed-width bar.
pub fn similarity_bar(similarity: f64, width: usize) -> String {
    let filled = (similarity.clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// Longest suffix of `text` that fits in `max_width` columns.
fn tail_fit(text: &str, max_width: usize) -> &str {
    if UnicodeWidthStr::width(text) <= max_width {
        return text;
    }
    let mut width = 0usize;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = idx;
    }
    &text[start..]
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        let sep_width = if current.is_empty() { 0 } else { 1 };

        if current_width + sep_width + word_width <= max_width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        let mut chunk = String::new();
        let mut chunk_width = 0usize;
        for ch in word.chars() {
            let w = ch.width().unwrap_or(0);
            if chunk_width + w > max_width && !chunk.is_empty() {
                lines.push(std::mem::take(&mut chunk));
                chunk_width = 0;
            }
            chunk.push(ch);
            chunk_width += w;
        }
        if !chunk.is_empty() {
            lines.push(std::mem::take(&mut chunk));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_application::{Msg, update};
    use folio_core::{Recommendation, SearchResults, TopWord};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &AppState, view: &ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, state, view)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ready_state() -> AppState {
        let mut state = folio_test::loaded_state(30);
        update(&mut state, Msg::SearchInputChanged("Moby_Dick.txt".to_string()));
        update(&mut state, Msg::SubmitSearch);
        let generation = state.search_generation;
        update(
            &mut state,
            Msg::SearchFinished {
                generation,
                result: Ok(SearchResults {
                    summary: Summary {
                        book_name: None,
                        summary: None,
                        top_words: vec![TopWord {
                            word: "whale".to_string(),
                            score: 8.43,
                        }],
                    },
                    recommendations: Recommendations {
                        book_name: None,
                        recommendations: vec![Recommendation {
                            book_name: BookId::from("War_and_Peace.txt"),
                            similarity: 0.8123,
                        }],
                    },
                }),
            },
        );
        state
    }

    #[test]
    fn top_word_tag_shows_word_and_score() {
        let screen = draw(&ready_state(), &ViewState::default());
        assert!(screen.contains("whale 8.43"), "{screen}");
        assert!(screen.contains("#1"), "{screen}");
        assert!(screen.contains("War and Peace"), "{screen}");
        assert!(screen.contains("81.23%"), "{screen}");
    }

    #[test]
    fn panel_titles_use_dot_separators() {
        let screen = draw(&ready_state(), &ViewState::default());
        assert!(screen.contains("Top words · Moby Dick"), "{screen}");
        assert!(screen.contains("Recommendations · Enter reads"), "{screen}");
        assert!(!screen.contains('—'), "{screen}");
    }

    #[test]
    fn failed_search_shows_only_the_message() {
        let mut state = folio_test::loaded_state(30);
        update(&mut state, Msg::SubmitSearch);
        let screen = draw(&state, &ViewState::default());
        assert!(screen.contains("Please enter a book name"), "{screen}");
        assert!(!screen.contains("Top words"), "{screen}");
    }

    #[test]
    fn library_shows_filtered_display_titles() {
        let mut state = folio_test::loaded_state(30);
        update(&mut state, Msg::ToggleLibrary);
        update(&mut state, Msg::LibraryQueryChanged("peace".to_string()));
        let screen = draw(&state, &ViewState::default());
        assert!(screen.contains("War and Peace"), "{screen}");
        assert!(!screen.contains("Moby Dick"), "{screen}");
        assert!(screen.contains("Library · 1/3 matches"), "{screen}");
    }

    #[test]
    fn empty_library_filter_shows_placeholder() {
        let mut state = folio_test::loaded_state(30);
        update(&mut state, Msg::ToggleLibrary);
        update(&mut state, Msg::LibraryQueryChanged("zzz".to_string()));
        let screen = draw(&state, &ViewState::default());
        assert!(screen.contains("No books found"), "{screen}");
    }

    #[test]
    fn reader_shows_page_status() {
        let mut state = folio_test::loaded_state(30);
        update(&mut state, Msg::OpenReader(BookId::from("Moby_Dick.txt")));
        let generation = state.reader_generation;
        update(
            &mut state,
            Msg::ReaderLoaded {
                generation,
                result: Ok(folio_test::numbered_text(65)),
            },
        );
        update(&mut state, Msg::ReaderPageInput("5".to_string()));
        let screen = draw(&state, &ViewState::default());
        assert!(screen.contains("Page 3 of 3"), "{screen}");
        assert!(screen.contains("line 65"), "{screen}");
        assert!(!screen.contains("line 60 "), "{screen}");
    }

    #[test]
    fn reader_error_is_inline() {
        let mut state = folio_test::loaded_state(30);
        update(&mut state, Msg::OpenReader(BookId::from("Missing.txt")));
        let generation = state.reader_generation;
        update(
            &mut state,
            Msg::ReaderLoaded {
                generation,
                result: Err("failed to load the book".to_string()),
            },
        );
        let screen = draw(&state, &ViewState::default());
        assert!(screen.contains("Error: failed to load the book"), "{screen}");
        assert!(screen.contains("Missing"), "{screen}");
    }

    #[test]
    fn similarity_bar_scales() {
        assert_eq!(similarity_bar(0.0, 4), "░░░░");
        assert_eq!(similarity_bar(0.5, 4), "██░░");
        assert_eq!(similarity_bar(1.7, 4), "████");
    }

    #[test]
    fn tail_fit_keeps_the_end() {
        assert_eq!(tail_fit("abcdef", 10), "abcdef");
        assert_eq!(tail_fit("abcdef", 3), "def");
    }

    #[test]
    fn wrap_text_splits_on_width() {
        assert_eq!(wrap_text("War and Peace", 7), vec!["War and", "Peace"]);
    }
}
