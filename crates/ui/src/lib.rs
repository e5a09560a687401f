//! ratatui-based UI.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, terminal};
use folio_application::{AppState, CommandSink, Msg, SearchView, update};
use folio_core::PageNav;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;

mod view;

pub use view::{Focus, Palette, ViewState, palette, render, similarity_bar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Terminal front end. Key presses and backend results are turned into
/// [`Msg`]s and fed through [`update`]; resulting commands go to the sink.
pub struct Ui<S: CommandSink> {
    state: AppState,
    view: ViewState,
    sink: S,
    inbox: UnboundedReceiver<Msg>,
}

impl<S: CommandSink> Ui<S> {
    pub fn new(state: AppState, sink: S, inbox: UnboundedReceiver<Msg>) -> Self {
        Self {
            state,
            view: ViewState::default(),
            sink,
            inbox,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Dispatches the startup commands and runs until the user quits.
    pub fn run(mut self) -> anyhow::Result<AppState> {
        for command in self.state.startup_commands() {
            self.sink.dispatch(command);
        }

        let mut terminal = setup_terminal()?;
        terminal.clear().ok();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.event_loop(&mut terminal)
        }));
        let restore_result = restore_terminal(&mut terminal);

        match (result, restore_result) {
            (Ok(Ok(())), Ok(())) => Ok(self.state),
            (Ok(Ok(())), Err(err)) => Err(err),
            (Ok(Err(err)), _) => Err(err),
            (Err(panic), Ok(())) => Err(anyhow::anyhow!(panic_to_string(panic))),
            (Err(panic), Err(err)) => Err(anyhow::anyhow!(
                "{}\n(additionally failed to restore terminal: {err})",
                panic_to_string(panic)
            )),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(100);
        let mut needs_redraw = true;

        loop {
            if self.drain_inbox() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal.draw(|frame| render(frame, &self.state, &self.view))?;
                needs_redraw = false;
            }

            if !event::poll(tick_rate)? {
                continue;
            }

            match event::read()? {
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    needs_redraw = true;
                    if self.handle_key(key) == KeyOutcome::Quit {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Applies every backend result that has arrived. Returns whether
    /// anything changed.
    pub fn drain_inbox(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.inbox.try_recv() {
                Ok(msg) => {
                    self.apply(msg);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    pub fn apply(&mut self, msg: Msg) {
        let was_searching = matches!(self.state.search, SearchView::Loading { .. });
        for command in update(&mut self.state, msg) {
            tracing::debug!(?command, "dispatch");
            self.sink.dispatch(command);
        }
        if was_searching && matches!(self.state.search, SearchView::Ready { .. }) {
            self.view.recommendation_cursor = 0;
        }
        if self.state.take_scroll_to_top() {
            self.view.library_cursor = 0;
            self.view.recommendation_cursor = 0;
        }
        if !self.state.library_open && self.view.focus == Focus::Library {
            self.view.focus = Focus::Search;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }
        if ctrl && key.code == KeyCode::Char('t') {
            self.apply(Msg::ToggleTheme);
            return KeyOutcome::Continue;
        }

        if self.state.reader.is_open() {
            if self.view.page_input.is_some() {
                self.handle_page_input_key(key);
            } else {
                self.handle_reader_key(key);
            }
            return KeyOutcome::Continue;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('l') => {
                    self.apply(Msg::ToggleLibrary);
                    if self.state.library_open {
                        self.view.focus = Focus::Library;
                    }
                    return KeyOutcome::Continue;
                }
                KeyCode::Char('r') => {
                    self.apply(Msg::RefreshLibrary);
                    return KeyOutcome::Continue;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Tab => {
                self.cycle_focus(true);
                return KeyOutcome::Continue;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return KeyOutcome::Continue;
            }
            _ => {}
        }

        match self.view.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Library => self.handle_library_key(key),
            Focus::Recommendations => self.handle_recommendations_key(key),
        }
        KeyOutcome::Continue
    }

    fn available_focus(&self) -> Vec<Focus> {
        let mut out = vec![Focus::Search];
        if self.state.library_open {
            out.push(Focus::Library);
        }
        if matches!(self.state.search, SearchView::Ready { .. }) {
            out.push(Focus::Recommendations);
        }
        out
    }

    fn cycle_focus(&mut self, forward: bool) {
        let available = self.available_focus();
        let pos = available
            .iter()
            .position(|f| *f == self.view.focus)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % available.len()
        } else {
            (pos + available.len() - 1) % available.len()
        };
        self.view.focus = available[next];
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => self.apply(Msg::SubmitSearch),
            KeyCode::Right => self.apply(Msg::CompleteSearchInput),
            KeyCode::Char(' ') if ctrl => self.apply(Msg::CompleteSearchInput),
            KeyCode::Char('u') if ctrl => self.apply(Msg::SearchInputChanged(String::new())),
            KeyCode::Backspace => {
                let mut input = self.state.search_input.clone();
                input.pop();
                self.apply(Msg::SearchInputChanged(input));
            }
            KeyCode::Char(ch) if !ctrl => {
                let mut input = self.state.search_input.clone();
                input.push(ch);
                self.apply(Msg::SearchInputChanged(input));
            }
            _ => {}
        }
    }

    fn handle_library_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up => {
                self.view.library_cursor = self.view.library_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                let len = self.state.filtered_books().len();
                self.view.library_cursor = (self.view.library_cursor + 1).min(len.saturating_sub(1));
            }
            KeyCode::Enter => {
                let filtered = self.state.filtered_books();
                let picked = filtered
                    .get(self.view.library_cursor.min(filtered.len().saturating_sub(1)))
                    .map(|book| (*book).clone());
                if let Some(book) = picked {
                    self.apply(Msg::SelectBook(book));
                }
            }
            KeyCode::Char('u') if ctrl => {
                self.view.library_cursor = 0;
                self.apply(Msg::LibraryQueryChanged(String::new()));
            }
            KeyCode::Backspace => {
                let mut query = self.state.library_query.clone();
                query.pop();
                self.view.library_cursor = 0;
                self.apply(Msg::LibraryQueryChanged(query));
            }
            KeyCode::Char(ch) if !ctrl => {
                let mut query = self.state.library_query.clone();
                query.push(ch);
                self.view.library_cursor = 0;
                self.apply(Msg::LibraryQueryChanged(query));
            }
            _ => {}
        }
    }

    fn handle_recommendations_key(&mut self, key: KeyEvent) {
        let SearchView::Ready { results, .. } = &self.state.search else {
            return;
        };
        let recommendations = &results.recommendations.recommendations;
        match key.code {
            KeyCode::Up => {
                self.view.recommendation_cursor = self.view.recommendation_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                self.view.recommendation_cursor = (self.view.recommendation_cursor + 1)
                    .min(recommendations.len().saturating_sub(1));
            }
            KeyCode::Enter => {
                let picked = recommendations
                    .get(
                        self.view
                            .recommendation_cursor
                            .min(recommendations.len().saturating_sub(1)),
                    )
                    .map(|rec| rec.book_name.clone());
                if let Some(book) = picked {
                    self.apply(Msg::OpenReader(book));
                }
            }
            _ => {}
        }
    }

    fn handle_reader_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.apply(Msg::CloseReader),
            KeyCode::Left | KeyCode::PageUp => self.apply(Msg::ReaderNavigate(PageNav::Prev)),
            KeyCode::Right | KeyCode::PageDown => self.apply(Msg::ReaderNavigate(PageNav::Next)),
            KeyCode::Home => self.apply(Msg::ReaderNavigate(PageNav::First)),
            KeyCode::End => self.apply(Msg::ReaderNavigate(PageNav::Last)),
            KeyCode::Char('l') => self.apply(Msg::CycleLinesPerPage),
            KeyCode::Char('g') => {
                if self.state.reader.visible_pagination().is_some() {
                    self.view.page_input = Some(String::new());
                }
            }
            _ => {}
        }
    }

    fn handle_page_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.view.page_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.view.page_input = None;
            }
            KeyCode::Enter => {
                if let Some(input) = self.view.page_input.take() {
                    self.apply(Msg::ReaderPageInput(input));
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.clear();
            }
            KeyCode::Char(ch) => {
                input.push(ch);
            }
            _ => {}
        }
    }
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alt screen")?;
    Ok(())
}

fn panic_to_string(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: (unknown payload)".to_string()
    }
}
