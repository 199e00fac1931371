//! Log sanitization for patient data.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before reaching
//! the sink. It redacts:
//! - assessment and patient identifiers (UUIDs, MRN-like ids)
//! - contact details (emails, phone numbers)
//! - raw clinical values logged as `name=value` / `name: value`
//! - whole feature vectors (runs of five or more numbers in brackets)
//!
//! The primary protection is not logging patient values at all; this is the
//! fallback for values that slip into a format string.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::FEATURE_NAMES;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Longest input sanitized per call; the rest is dropped.
const MAX_SANITIZE_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn clinical_field_pattern() -> String {
    format!(
        r"(?i)\b({})\s*[:=]\s*-?\d+(?:\.\d+)?",
        FEATURE_NAMES.join("|")
    )
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let clinical = clinical_field_pattern();
        let rules: Vec<(String, &'static str)> = vec![
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}".into(),
                "[REDACTED-ID]",
            ),
            (r"\bMRN[:\s]?\d{6,10}\b".into(), "[REDACTED-MRN]"),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b".into(),
                "[REDACTED-EMAIL]",
            ),
            (
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b".into(),
                "[REDACTED-PHONE]",
            ),
            (clinical, "$1=[REDACTED]"),
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?){4,}\s*\]".into(),
                "[REDACTED-FEATURES]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| p.as_str()))
            .unwrap_or_else(|_| RegexSet::empty());
        let rules = rules
            .into_iter()
            .filter_map(|(pattern, replacement)| {
                Regex::new(&pattern).ok().map(|regex| Rule { regex, replacement })
            })
            .collect();

        Patterns { set, rules }
    })
}

/// Replace patient data in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, MAX_SANITIZE_BYTES)
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        if let Some(rule) = patterns.rules.get(idx) {
            result = rule.regex.replace_all(&result, rule.replacement).into_owned();
        }
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it is written to the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A formatter that never emits a newline must not grow the buffer forever.
        if self.buffer.len() > MAX_SANITIZE_BYTES * 2 {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_assessment_id() {
        let input = "Assessment 550e8400-e29b-41d4-a716-446655440000 complete";
        let sanitized = sanitize(input);
        assert!(sanitized.contains("[REDACTED-ID]"));
        assert!(!sanitized.contains("550e8400"));
    }

    #[test]
    fn test_sanitize_clinical_fields() {
        let sanitized = sanitize("rejected: cholesterol=612.5, age: 44");
        assert!(sanitized.contains("cholesterol=[REDACTED]"));
        assert!(sanitized.contains("age=[REDACTED]"));
        assert!(!sanitized.contains("612.5"));
        assert!(!sanitized.contains("44"));
    }

    #[test]
    fn test_sanitize_feature_vector() {
        let input = "features=[55.0, 1, 0, 120, 240, 0, 0, 150, 0, 1.0, 1, 0, 2]";
        let sanitized = sanitize(input);
        assert!(sanitized.contains("[REDACTED-FEATURES]"));
        assert!(!sanitized.contains("240"));
    }

    #[test]
    fn test_short_lists_untouched() {
        let input = "architecture [13, 64, 32, 1]";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_sanitize_mrn_and_email() {
        let sanitized = sanitize("MRN:12345678 contact patient@hospital.com");
        assert!(sanitized.contains("[REDACTED-MRN]"));
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("prefix résumé suffix", 9);
        assert!(sanitized.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let make = SanitizingMakeWriter::new(|| Vec::<u8>::new());
        let mut writer = make.make_writer();
        writer.write_all(b"age=61 ok\npartial").expect("write");
        let written = String::from_utf8(writer.inner.clone()).expect("utf8");
        assert_eq!(written, "age=[REDACTED] ok\n");
        assert_eq!(writer.buffer, b"partial");
    }
}
