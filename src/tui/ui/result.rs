//! Assessment result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Assessment, RiskLevel};
use crate::tui::styles::MedicalTheme;

/// Result screen state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing assessed yet
    #[default]
    Idle,
    /// Completed with result
    Complete { assessment: Assessment },
    /// Input rejected or model unavailable
    Error { messages: Vec<String> },
}

/// Render the result view
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Idle => render_idle(f, chunks[1]),
        ResultState::Complete { assessment } => render_assessment(f, chunks[1], assessment),
        ResultState::Error { messages } => render_error(f, chunks[1], messages),
    }
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Risk Assessment", MedicalTheme::title()),
        Span::styled(" │ Dense Network Screening", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Enter patient data to begin",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let block = Block::default()
        .title(Span::styled(" Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Risk level
            Constraint::Length(3), // Probability
            Constraint::Min(0),    // Guidance
        ])
        .margin(1)
        .split(inner);

    let level = assessment.risk_level();
    let risk_style = MedicalTheme::risk_level(level);
    let risk_icon = match level {
        RiskLevel::Low => "OK",
        RiskLevel::High => "!",
    };

    let risk_display = Paragraph::new(vec![
        Line::from(Span::styled(format!("{risk_icon} {level} RISK"), risk_style)),
        Line::from(Span::styled(level.description(), MedicalTheme::text_secondary())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(risk_display, chunks[0]);

    let probability = assessment.probability();
    let prob_gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" Probability (threshold {:.2}) ", assessment.threshold),
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::probability_gauge(probability, assessment.threshold))
        .ratio(probability.clamp(0.0, 1.0))
        .label(format!("{:.1}%", probability * 100.0));
    f.render_widget(prob_gauge, chunks[1]);

    let mut guidance = vec![Line::from(Span::styled(
        level.guidance_title(),
        MedicalTheme::subtitle(),
    ))];
    guidance.extend(level.recommendations().iter().map(|item| {
        Line::from(vec![
            Span::styled("  • ", risk_style),
            Span::styled(*item, MedicalTheme::text()),
        ])
    }));

    f.render_widget(
        Paragraph::new(guidance).wrap(Wrap { trim: true }),
        chunks[2],
    );
}

fn render_error(f: &mut Frame, area: Rect, messages: &[String]) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("! Assessment rejected", MedicalTheme::danger())),
        Line::from(""),
    ];
    lines.extend(
        messages
            .iter()
            .map(|m| Line::from(Span::styled(m.as_str(), MedicalTheme::text()))),
    );

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::danger()),
        );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Edit Data ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard ", MedicalTheme::key_desc()),
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Assessment", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
