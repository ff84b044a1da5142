//! Summary accumulation and bullet rendering

/// Delimiter between rendered sentences
pub const SENTENCE_DELIMITER: &str = ". ";

/// Accumulated summary text for one request
///
/// Cleared when a request starts, appended to per chunk, left untouched
/// once the request ends or fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryText {
    text: String,
    chunks: usize,
}

impl SummaryText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.chunks = 0;
    }

    /// Append one decoded chunk
    pub fn push_chunk(&mut self, chunk: &str) {
        self.text.push_str(chunk);
        self.chunks += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Number of chunks appended since the last clear
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Bullet lines for the current text
    pub fn render(&self) -> Vec<String> {
        render(&self.text)
    }
}

/// Split accumulated text into bullet lines
///
/// Fragments are separated by `". "`. Each fragment is trimmed and empty
/// fragments are dropped. The final fragment loses its closing period so
/// `"A. B. C."` renders as `["A", "B", "C"]`.
pub fn render(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(last) = lines.last_mut() {
        if let Some(stripped) = last.strip_suffix('.') {
            *last = stripped.trim_end().to_string();
        }
    }
    lines.retain(|line| !line.is_empty());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_three_sentences() {
        assert_eq!(render("A. B. C."), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_render_empty() {
        assert!(render("").is_empty());
        assert!(render("   ").is_empty());
    }

    #[test]
    fn test_render_trailing_delimiter() {
        assert_eq!(render("First point. Second point. "), vec!["First point", "Second point"]);
    }

    #[test]
    fn test_render_partial_sentence() {
        // Mid-stream text keeps its incomplete tail as the last bullet
        assert_eq!(render("Google Fi was breached. Customers were"), vec![
            "Google Fi was breached",
            "Customers were"
        ]);
    }

    #[test]
    fn test_render_keeps_inner_periods() {
        assert_eq!(render("Version 2.0 shipped. It is fast."), vec![
            "Version 2.0 shipped",
            "It is fast"
        ]);
    }

    #[test]
    fn test_render_lone_period() {
        assert!(render(".").is_empty());
    }

    #[test]
    fn test_render_idempotent() {
        let text = "One. Two. Three";
        assert_eq!(render(text), render(text));
    }

    #[test]
    fn test_summary_text_accumulates_in_order() {
        let mut summary = SummaryText::new();
        for chunk in ["Ap", "ple. Ban", "ana."] {
            summary.push_chunk(chunk);
        }
        assert_eq!(summary.as_str(), "Apple. Banana.");
        assert_eq!(summary.chunk_count(), 3);
        assert_eq!(summary.render(), vec!["Apple", "Banana"]);

        summary.clear();
        assert!(summary.is_empty());
        assert_eq!(summary.chunk_count(), 0);
    }
}
