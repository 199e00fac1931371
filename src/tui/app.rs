//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Submitting patient records to the screening service

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use zeroize::Zeroize;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::ScreeningService;
use crate::domain::{FeatureEncoding, PatientData};
use crate::ports::ArtifactSource;
use crate::CardioError;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PatientForm,
    Result,
}

/// Main application state
pub struct App<A>
where
    A: ArtifactSource,
{
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Screening service with its loaded context
    service: Arc<ScreeningService<A>>,

    /// Encoding the form hints and sample data follow
    encoding: FeatureEncoding,

    dashboard_state: DashboardState,
    patient_form_state: PatientFormState,
    result_state: ResultState,
}

impl<A> App<A>
where
    A: ArtifactSource,
{
    /// Create the application around an initialized service (Composition Root pattern).
    ///
    /// # Errors
    /// Returns error if the service has not loaded its artifacts.
    pub fn new(service: Arc<ScreeningService<A>>) -> Result<Self> {
        let context = service
            .context()
            .context("Screening service must be initialized before starting the UI")?;
        let encoding = *context.encoding();

        Ok(Self {
            screen: Screen::Dashboard,
            should_quit: false,
            dashboard_state: DashboardState {
                model: service.model_summary(),
                ..DashboardState::default()
            },
            patient_form_state: PatientFormState::new(encoding),
            result_state: ResultState::default(),
            service,
            encoding,
        })
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, content_area, &self.dashboard_state),
                    Screen::PatientForm => {
                        render_patient_form(f, content_area, &self.patient_form_state)
                    }
                    Screen::Result => render_result(f, content_area, &self.result_state),
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.patient_form_state.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.patient_form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.patient_form_state.next_field();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.patient_form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.patient_form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.patient_form_state.delete_char();
            }
            KeyCode::Delete => {
                self.patient_form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_patient_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        let failed = matches!(self.result_state, ResultState::Error { .. });
        match key {
            KeyCode::Enter if failed => {
                self.screen = Screen::PatientForm;
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(),
            _ => {}
        }
    }

    fn open_form(&mut self) {
        self.patient_form_state.clear_sensitive();
        self.patient_form_state = PatientFormState::new(self.encoding);
        self.screen = Screen::PatientForm;
    }

    fn submit_patient_form(&mut self) {
        let features = match self.patient_form_state.to_patient_features() {
            Ok(features) => features,
            Err(e) => {
                self.patient_form_state.error_message = Some(e);
                return;
            }
        };

        // The form keeps the entered text; the parsed record is wiped here.
        let mut patient = PatientData::new(features);
        let outcome = self.service.assess(&patient);
        patient.zeroize();

        match outcome {
            Ok(assessment) => {
                self.dashboard_state.session.record(assessment.risk_level());
                self.result_state = ResultState::Complete { assessment };
                self.screen = Screen::Result;

                // Clear plaintext buffers from the UI immediately.
                self.patient_form_state.clear_sensitive();
            }
            Err(CardioError::Input(e)) => {
                // Keep the entered values so they can be corrected.
                self.dashboard_state.session.record_rejection();
                self.patient_form_state.error_message = Some(e.messages().join("; "));
            }
            Err(e) => {
                tracing::error!("Assessment failed: {}", e);
                self.result_state = ResultState::Error {
                    messages: vec![e.to_string()],
                };
                self.screen = Screen::Result;
            }
        }
    }
}
