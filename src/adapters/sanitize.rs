//! Log sanitization: keeps patient identifiers out of log files.
//!
//! Every formatted log line passes through [`SanitizingMakeWriter`], which
//! replaces:
//! - Patient identifiers logged as `id=...` / `patient_id=...`
//! - Medical record numbers (MRNs)
//! - SSN-like numbers
//! - E-mail addresses and phone numbers
//! - Dates of birth logged as `dob=...` / `date_of_birth=...`
//!
//! Measurement values are not identifying on their own and are left intact.
//!
//! Input longer than `PANCREAS_SANITIZE_MAX_BYTES` (default 16 KiB) is
//! truncated before scanning.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

const RULES: [(&str, &str); 6] = [
    (
        r"(?i)\b(?:patient[_ ]?id|id)\s*[:=]\s*[A-Za-z0-9_-]+",
        "id=[REDACTED-ID]",
    ),
    (r"\bMRN[:\s]?\d{6,10}\b", "[REDACTED-MRN]"),
    (r"\b\d{3}-\d{2}-\d{4}\b", "[REDACTED-SSN]"),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (
        r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s][0-9]{3}[-.\s][0-9]{4}\b",
        "[REDACTED-PHONE]",
    ),
    (
        r"(?i)\b(?:dob|date[_ ]of[_ ]birth|birth[_ ]?date)\s*[:=]\s*[0-9./-]{6,10}",
        "dob=[REDACTED-DOB]",
    ),
];

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        // Patterns are compile-time constants covered by the tests below.
        let set = RegexSet::new(RULES.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = RULES
            .iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();
        Patterns { set, rules }
    })
}

fn max_sanitize_bytes() -> usize {
    std::env::var("PANCREAS_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
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

/// Replace identifying patterns in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check whether `input` contains anything [`sanitize`] would redact.
#[must_use]
pub fn contains_identifier(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer that sanitizes each formatted line before it
/// reaches the underlying sink.
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

pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_complete_lines(&mut self) -> std::io::Result<()> {
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
        self.write_complete_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.write_complete_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
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
    fn test_sanitize_patient_id() {
        let sanitized = sanitize("Nearest neighbour id=1042 at distance 0.31");
        assert!(sanitized.contains("[REDACTED-ID]"));
        assert!(!sanitized.contains("1042"));
        assert!(sanitized.contains("0.31"));

        let sanitized = sanitize("patient_id: AB-77 exported");
        assert!(!sanitized.contains("AB-77"));
    }

    #[test]
    fn test_sanitize_mrn_and_ssn() {
        assert!(sanitize("MRN:12345678 found").contains("[REDACTED-MRN]"));
        assert!(sanitize("SSN 123-45-6789").contains("[REDACTED-SSN]"));
    }

    #[test]
    fn test_sanitize_contact_details() {
        assert!(sanitize("contact dr.who@hospital.org").contains("[REDACTED-EMAIL]"));
        assert!(sanitize("call 555-123-4567").contains("[REDACTED-PHONE]"));
    }

    #[test]
    fn test_sanitize_dob_but_not_timestamps() {
        assert!(sanitize("dob=1961-04-02").contains("[REDACTED-DOB]"));

        let line = "2026-10-18T09:30:00.123Z  INFO Loaded 42 patients";
        assert_eq!(sanitize(line), line);
        assert!(!contains_identifier(line));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("prefix id=123456 suffix", 8);
        assert!(sanitized.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter {
                inner: &mut out,
                buffer: Vec::new(),
            };
            writer.write_all(b"search done, top id=77").expect("Should write");
            writer.write_all(b"\nsecond line").expect("Should write");
            writer.flush().expect("Should flush");
        }
        let text = String::from_utf8(out).expect("UTF-8");
        assert!(!text.contains("77"));
        assert!(text.contains("second line"));
    }
}
