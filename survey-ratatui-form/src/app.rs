//! Terminal setup and the event loop.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend, style::Color};
use std::io::{self, Stdout};
use survey::{Catalog, SubmitOutcome, SurveyPage};
use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::draw::draw_page;
use crate::state::{Action, FormState};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Error type for the terminal front-end.
#[derive(Debug, Error)]
pub enum TuiError {
    /// User left the form before submitting it.
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
        }
    }
}

/// Shows the hosted survey in the terminal, from loading to review.
#[derive(Debug, Clone)]
pub struct SurveyTui {
    /// Title shown until the survey is loaded.
    title: String,
    theme: Theme,
}

impl Default for SurveyTui {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyTui {
    pub fn new() -> Self {
        Self {
            title: "Survey".to_string(),
            theme: Theme::default(),
        }
    }

    /// Set the title shown while loading and on load errors.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Take over the terminal until the user quits.
    ///
    /// Catalog calls are driven on `runtime`. Returns the page as it was left,
    /// or [`TuiError::Cancelled`] if the user quit the form.
    pub fn run<C>(&self, catalog: &C, runtime: &Runtime) -> Result<SurveyPage, TuiError>
    where
        C: Catalog + ?Sized,
    {
        let mut terminal = self.setup_terminal()?;
        let result = self.drive(&mut terminal, catalog, runtime);
        self.restore_terminal(&mut terminal)?;
        result
    }

    fn drive<C>(
        &self,
        terminal: &mut Term,
        catalog: &C,
        runtime: &Runtime,
    ) -> Result<SurveyPage, TuiError>
    where
        C: Catalog + ?Sized,
    {
        let mut page = SurveyPage::new();
        let mut view = FormState::default();

        self.draw(terminal, &page, &mut view)?;
        runtime.block_on(page.load_from(catalog));
        if let Some(form) = page.form() {
            view = FormState::new(form);
        }

        loop {
            self.draw(terminal, &page, &mut view)?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let action = match page.form_mut() {
                Some(form) => view.handle_key(form, key),
                None => match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Action::Quit,
                    _ => Action::Continue,
                },
            };

            match action {
                Action::Continue => {}
                Action::Submit => self.submit(terminal, &mut page, &mut view, catalog, runtime)?,
                Action::Quit if page.form().is_some() => return Err(TuiError::Cancelled),
                Action::Quit => return Ok(page),
            }
        }
    }

    /// Submit the form, showing it in flight while the catalog is busy.
    fn submit<C>(
        &self,
        terminal: &mut Term,
        page: &mut SurveyPage,
        view: &mut FormState,
        catalog: &C,
        runtime: &Runtime,
    ) -> Result<(), TuiError>
    where
        C: Catalog + ?Sized,
    {
        let Some(form) = page.form_mut() else {
            return Ok(());
        };
        let pending = match form.begin_submit() {
            Ok(pending) => pending,
            Err(outcome) => {
                debug!(?outcome, "submission not sent");
                view.focus_first_error(form);
                return Ok(());
            }
        };

        self.draw(terminal, page, view)?;
        let result = runtime.block_on(pending.send(catalog));

        let Some(form) = page.form_mut() else {
            return Ok(());
        };
        if let SubmitOutcome::Submitted(id) = form.finish_submit(result) {
            info!(response_id = %id, "loading review");
            runtime.block_on(page.on_submitted(&id, catalog));
        }
        Ok(())
    }

    fn draw(&self, terminal: &mut Term, page: &SurveyPage, view: &mut FormState) -> io::Result<()> {
        terminal.draw(|frame| draw_page(frame, page, view, &self.theme, &self.title))?;
        Ok(())
    }

    fn setup_terminal(&self) -> Result<Term, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(&self, terminal: &mut Term) -> Result<(), TuiError> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
