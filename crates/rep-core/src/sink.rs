//! Output sinks for detected reps.
//!
//! The host owns the actual display; the pipeline only needs somewhere
//! to put the counter text and a human-readable log line.

/// Destination for rep counter output.
pub trait OutputSink {
    /// Replace the displayed counter text.
    fn set_text(&mut self, text: &str);

    /// Append one informational log line.
    fn log_line(&mut self, line: &str);
}

/// Logs through `tracing` and remembers the latest text.
#[derive(Debug, Default)]
pub struct TracingSink {
    text: Option<String>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl OutputSink for TracingSink {
    fn set_text(&mut self, text: &str) {
        tracing::debug!(text, "counter text updated");
        self.text = Some(text.to_string());
    }

    fn log_line(&mut self, line: &str) {
        tracing::info!("{line}");
    }
}

/// Records everything it receives.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    text: Option<String>,
    texts: Vec<String>,
    lines: Vec<String>,
}

impl MemorySink {
    /// Latest text written.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Every text written, in order.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Every log line written, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl OutputSink for MemorySink {
    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
        self.texts.push(text.to_string());
    }

    fn log_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn set_text(&mut self, text: &str) {
        (**self).set_text(text);
    }

    fn log_line(&mut self, line: &str) {
        (**self).log_line(line);
    }
}
