//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::ModelSummary;
use crate::domain::RiskLevel;
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

/// Counts for the current session only; nothing is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: usize,
    pub low: usize,
    pub high: usize,
    pub rejected: usize,
}

impl SessionSummary {
    pub fn record(&mut self, level: RiskLevel) {
        self.total += 1;
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::High => self.high += 1,
        }
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }
}

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub model: Option<ModelSummary>,
    pub session: SessionSummary,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_status_panels(f, columns[0], state);
    render_session_summary(f, columns[1], state.session);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(LOGO_SMALL, MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled("Heart Disease Risk Screening", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Model status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let mut status_items = vec![format_status_item("Model Loaded", state.model.is_some())];
    if let Some(model) = &state.model {
        let widths: Vec<String> = model.architecture.iter().map(ToString::to_string).collect();
        status_items.push(labelled("Network", widths.join("-")));
        status_items.push(labelled("Encoding", model.encoding.to_string()));
        status_items.push(labelled("Threshold", format!("{:.2}", model.threshold)));
        status_items.push(labelled("Source", model.source.clone()));
    }

    let status_block = Block::default()
        .title(Span::styled(" System Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let status_list = Paragraph::new(status_items)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_list, chunks[0]);

    let mut actions = Vec::new();
    if state.model.is_some() {
        actions.push(Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Assessment", MedicalTheme::key_desc()),
        ]));
    }
    actions.push(Line::from(vec![
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]));

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn labelled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label}: "), MedicalTheme::text_secondary()),
        Span::styled(value, MedicalTheme::text()),
    ])
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", MedicalTheme::success())
    } else {
        ("FAIL", MedicalTheme::danger())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), MedicalTheme::text()),
    ])
}

fn render_session_summary(f: &mut Frame, area: Rect, session: SessionSummary) {
    let block = Block::default()
        .title(Span::styled(" This Session ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if session.total == 0 && session.rejected == 0 {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No assessments yet. Press [N] to start.",
            MedicalTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let lines = vec![
        Line::from(vec![
            Span::styled("Assessments: ", MedicalTheme::text_secondary()),
            Span::styled(session.total.to_string(), MedicalTheme::text()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Low: ", MedicalTheme::text_secondary()),
            Span::styled(session.low.to_string(), MedicalTheme::risk_level(RiskLevel::Low)),
            Span::styled("  High: ", MedicalTheme::text_secondary()),
            Span::styled(session.high.to_string(), MedicalTheme::risk_level(RiskLevel::High)),
        ]),
        Line::from(vec![
            Span::styled("Rejected inputs: ", MedicalTheme::text_secondary()),
            Span::styled(session.rejected.to_string(), MedicalTheme::warning()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Results are kept in memory only and discarded on exit.",
            MedicalTheme::text_muted(),
        )]),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
