//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{FeatureEncoding, PatientFeatures, FEATURE_COUNT};
use crate::tui::styles::MedicalTheme;
use zeroize::Zeroize;

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: String,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, hint: impl Into<String>) -> Self {
        Self {
            label,
            hint: hint.into(),
            value: String::new(),
        }
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
    encoding: FeatureEncoding,
}

impl PatientFormState {
    /// Empty form with categorical hints for `encoding`, in fitted feature order.
    #[must_use]
    pub fn new(encoding: FeatureEncoding) -> Self {
        let fields = vec![
            FormField::new("Age", "years (18-120)"),
            FormField::new("Sex", "0=female, 1=male"),
            FormField::new("Chest Pain Type", encoding.chest_pain_hint()),
            FormField::new("Resting BP", "mmHg (50-250)"),
            FormField::new("Cholesterol", "mg/dL (80-700)"),
            FormField::new("Fasting BS > 120", "0=no, 1=yes"),
            FormField::new("Resting ECG", "0=normal 1=ST-T 2=LVH"),
            FormField::new("Max Heart Rate", "bpm (40-250)"),
            FormField::new("Exercise Angina", "0=no, 1=yes"),
            FormField::new("ST Depression", "mm (0-10)"),
            FormField::new("ST Slope", "0-3"),
            FormField::new("Major Vessels", "fluoroscopy (0-3)"),
            FormField::new("Thallium", encoding.thallium_hint()),
        ];
        debug_assert_eq!(fields.len(), FEATURE_COUNT);

        Self {
            fields,
            selected_field: 0,
            error_message: None,
            encoding,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.fields[self.selected_field].value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Wipe all field buffers from memory and clear values.
    ///
    /// Called as soon as a submission has been turned into features so plaintext
    /// inputs do not persist in the UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Parse every field into [`PatientFeatures`].
    ///
    /// Range checks happen in the inference context, which knows the
    /// model's encoding; this only rejects empty or non-numeric input.
    pub fn to_patient_features(&self) -> Result<PatientFeatures, String> {
        let mut values = Vec::with_capacity(self.fields.len());

        for field in self.fields.iter() {
            let value: f64 = field
                .value
                .trim()
                .parse()
                .map_err(|_| format!("{}: Invalid number", field.label))?;
            values.push(value);
        }

        PatientFeatures::from_vec(&values).map_err(|e| e.to_string())
    }

    /// Load sample data for testing (symptomatic patient, Cleveland-style record)
    pub fn load_sample_data(&mut self) {
        let asymptomatic = self.encoding.chest_pain_codes()[3];
        let reversible_defect = self.encoding.thallium_codes()[2];

        let sample = [
            "57".to_string(),                // age
            "1".to_string(),                 // sex (male)
            asymptomatic.to_string(),        // chest pain
            "140".to_string(),               // resting bp
            "241".to_string(),               // cholesterol
            "0".to_string(),                 // fasting blood sugar
            "1".to_string(),                 // resting ecg
            "123".to_string(),               // max heart rate
            "1".to_string(),                 // exercise angina
            "0.2".to_string(),               // st depression
            "1".to_string(),                 // st slope
            "0".to_string(),                 // major vessels
            reversible_defect.to_string(),   // thallium
        ];
        for (field, val) in self.fields.iter_mut().zip(sample) {
            field.value.zeroize();
            field.value = val;
        }
        self.error_message = None;
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], &state.encoding);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, encoding: &FeatureEncoding) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Patient Data Entry", MedicalTheme::title()),
        Span::styled(" │ Heart Disease Features ", MedicalTheme::text_secondary()),
        Span::styled(format!("(encoding {encoding})"), MedicalTheme::text_muted()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.hint.as_str(), MedicalTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), MedicalTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Submit ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
