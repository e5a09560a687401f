//! Application state and the single update function for folio.
//!
//! Input and backend results arrive as [`Msg`]; [`update`] mutates
//! [`AppState`] and returns the [`Command`]s the runtime must execute.
//! Rendering reads the state and never mutates it.

use folio_core::{
    BookId, Health, PageNav, Pagination, SearchResults, Settings, Theme, complete_book_name,
    filter_books, next_lines_per_page,
};

pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a book name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryStatus {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    Idle,
    Loading { book: BookId },
    Failed(String),
    Ready { book: BookId, results: SearchResults },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderPhase {
    Closed,
    Loading,
    Open,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ReaderView {
    pub phase: ReaderPhase,
    pub book: Option<BookId>,
    /// Text of the last successful load. Kept across close; replaced on the
    /// next successful open.
    pub pagination: Option<Pagination>,
}

impl Default for ReaderView {
    fn default() -> Self {
        Self {
            phase: ReaderPhase::Closed,
            book: None,
            pagination: None,
        }
    }
}

impl ReaderView {
    pub fn is_open(&self) -> bool {
        self.phase != ReaderPhase::Closed
    }

    /// Pagination while the text is on screen.
    pub fn visible_pagination(&self) -> Option<&Pagination> {
        match self.phase {
            ReaderPhase::Open => self.pagination.as_ref(),
            _ => None,
        }
    }

    fn visible_pagination_mut(&mut self) -> Option<&mut Pagination> {
        match self.phase {
            ReaderPhase::Open => self.pagination.as_mut(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub books: Vec<BookId>,
    pub library_query: String,
    pub library_open: bool,
    pub library_status: LibraryStatus,
    pub search_input: String,
    pub search: SearchView,
    pub reader: ReaderView,
    pub health: Option<Result<Health, String>>,
    pub notice: Option<String>,
    pub search_generation: u64,
    pub reader_generation: u64,
    scroll_to_top: bool,
}

impl AppState {
    pub fn new(mut settings: Settings) -> Self {
        settings.normalize();
        Self {
            settings,
            books: Vec::new(),
            library_query: String::new(),
            library_open: false,
            library_status: LibraryStatus::Loading,
            search_input: String::new(),
            search: SearchView::Idle,
            reader: ReaderView::default(),
            health: None,
            notice: None,
            search_generation: 0,
            reader_generation: 0,
            scroll_to_top: false,
        }
    }

    pub fn with_books(mut self, books: Vec<BookId>) -> Self {
        self.books = books;
        self.library_status = LibraryStatus::Loaded;
        self
    }

    /// Work to schedule before the first frame.
    pub fn startup_commands(&self) -> Vec<Command> {
        vec![Command::FetchLibrary, Command::CheckHealth]
    }

    pub fn filtered_books(&self) -> Vec<&BookId> {
        filter_books(&self.books, &self.library_query)
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    /// True once after a library selection; the view resets its scroll.
    pub fn take_scroll_to_top(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    LibraryLoaded(Result<Vec<BookId>, String>),
    RefreshLibrary,
    LibraryQueryChanged(String),
    ToggleLibrary,
    SelectBook(BookId),
    SearchInputChanged(String),
    CompleteSearchInput,
    SubmitSearch,
    SearchFinished {
        generation: u64,
        result: Result<SearchResults, String>,
    },
    OpenReader(BookId),
    ReaderLoaded {
        generation: u64,
        result: Result<String, String>,
    },
    ReaderNavigate(PageNav),
    ReaderPageInput(String),
    SetLinesPerPage(usize),
    CycleLinesPerPage,
    CloseReader,
    ToggleTheme,
    HealthChecked(Result<Health, String>),
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchLibrary,
    CheckHealth,
    Search {
        generation: u64,
        book: BookId,
        top_words: usize,
        k: usize,
    },
    ReadBook {
        generation: u64,
        book: BookId,
    },
    PersistTheme(Theme),
}

/// Executes commands produced by [`update`].
pub trait CommandSink {
    fn dispatch(&mut self, command: Command);
}

pub fn update(state: &mut AppState, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::LibraryLoaded(Ok(books)) => {
            tracing::debug!(count = books.len(), "library loaded");
            state.books = books;
            state.library_status = LibraryStatus::Loaded;
            Vec::new()
        }
        Msg::LibraryLoaded(Err(message)) => {
            tracing::warn!(%message, "library load failed");
            state.library_status = LibraryStatus::Failed(message);
            Vec::new()
        }
        Msg::RefreshLibrary => {
            state.library_status = LibraryStatus::Loading;
            vec![Command::FetchLibrary]
        }
        Msg::LibraryQueryChanged(query) => {
            state.library_query = query;
            Vec::new()
        }
        Msg::ToggleLibrary => {
            state.library_open = !state.library_open;
            Vec::new()
        }
        Msg::SelectBook(book) => {
            state.search_input = book.0;
            state.library_open = false;
            state.scroll_to_top = true;
            submit_search(state)
        }
        Msg::SearchInputChanged(input) => {
            state.search_input = input;
            Vec::new()
        }
        Msg::CompleteSearchInput => {
            if let Some(book) = complete_book_name(&state.books, &state.search_input) {
                state.search_input = book.0.clone();
            }
            Vec::new()
        }
        Msg::SubmitSearch => submit_search(state),
        Msg::SearchFinished { generation, result } => {
            if generation != state.search_generation {
                tracing::debug!(
                    generation,
                    current = state.search_generation,
                    "dropping stale search result"
                );
                return Vec::new();
            }
            let book = match &state.search {
                SearchView::Loading { book } => book.clone(),
                _ => return Vec::new(),
            };
            state.search = match result {
                Ok(results) => SearchView::Ready { book, results },
                Err(message) => SearchView::Failed(message),
            };
            Vec::new()
        }
        Msg::OpenReader(book) => {
            state.reader_generation += 1;
            state.reader.phase = ReaderPhase::Loading;
            state.reader.book = Some(book.clone());
            vec![Command::ReadBook {
                generation: state.reader_generation,
                book,
            }]
        }
        Msg::ReaderLoaded { generation, result } => {
            if generation != state.reader_generation {
                tracing::debug!(
                    generation,
                    current = state.reader_generation,
                    "dropping stale book text"
                );
                return Vec::new();
            }
            match result {
                Ok(text) => {
                    let pagination = Pagination::from_text(&text, state.settings.lines_per_page);
                    tracing::debug!(
                        lines = pagination.line_count(),
                        pages = pagination.total_pages(),
                        "book text loaded"
                    );
                    state.reader.pagination = Some(pagination);
                    state.reader.phase = ReaderPhase::Open;
                }
                Err(message) => {
                    state.reader.phase = ReaderPhase::Failed(message);
                }
            }
            Vec::new()
        }
        Msg::ReaderNavigate(nav) => {
            if let Some(pagination) = state.reader.visible_pagination_mut() {
                pagination.navigate(nav);
            }
            Vec::new()
        }
        Msg::ReaderPageInput(input) => {
            if let Some(pagination) = state.reader.visible_pagination_mut() {
                pagination.apply_input(&input);
            }
            Vec::new()
        }
        Msg::SetLinesPerPage(lines_per_page) => {
            set_lines_per_page(state, lines_per_page);
            Vec::new()
        }
        Msg::CycleLinesPerPage => {
            let next = next_lines_per_page(state.settings.lines_per_page);
            set_lines_per_page(state, next);
            Vec::new()
        }
        Msg::CloseReader => {
            state.reader.phase = ReaderPhase::Closed;
            state.reader_generation += 1;
            Vec::new()
        }
        Msg::ToggleTheme => {
            state.settings.toggle_theme();
            vec![Command::PersistTheme(state.settings.theme)]
        }
        Msg::HealthChecked(result) => {
            state.health = Some(result);
            Vec::new()
        }
        Msg::Notice(message) => {
            state.notice = Some(message);
            Vec::new()
        }
    }
}

fn submit_search(state: &mut AppState) -> Vec<Command> {
    let name = state.search_input.trim();
    if name.is_empty() {
        state.search = SearchView::Failed(EMPTY_SEARCH_MESSAGE.to_string());
        return Vec::new();
    }

    let book = BookId::new(name);
    state.search_generation += 1;
    state.search = SearchView::Loading { book: book.clone() };
    vec![Command::Search {
        generation: state.search_generation,
        book,
        top_words: state.settings.summary_words,
        k: state.settings.recommendation_count,
    }]
}

fn set_lines_per_page(state: &mut AppState, lines_per_page: usize) {
    state.settings.lines_per_page = lines_per_page.max(1);
    if let Some(pagination) = state.reader.pagination.as_mut() {
        pagination.set_lines_per_page(state.settings.lines_per_page);
    }
}
