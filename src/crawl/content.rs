// src/crawl/content.rs
// =============================================================================
// The text we collected for one request: README first, then source files in
// the order the crawler found them. Each excerpt is already truncated.
// =============================================================================

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AggregatedContent {
    excerpts: Vec<Excerpt>,
}

impl AggregatedContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.excerpts.push(Excerpt {
            label: label.into(),
            text: text.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.excerpts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.excerpts.len()
    }

    pub fn excerpts(&self) -> &[Excerpt] {
        &self.excerpts
    }

    #[cfg(test)]
    pub fn labels(&self) -> Vec<&str> {
        self.excerpts.iter().map(|e| e.label.as_str()).collect()
    }

    /// Renders every excerpt as a `--- label ---` block, ready for a prompt
    pub fn render(&self) -> String {
        let mut out = String::new();
        for excerpt in &self.excerpts {
            out.push_str(&format!("--- {} ---\n{}\n\n", excerpt.label, excerpt.text));
        }
        out
    }
}

/// Cuts `text` to at most `max_bytes` bytes without splitting a character
pub fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        // 'é' is two bytes; cutting at 2 would land inside it
        assert_eq!(truncate("aé", 2), "a");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_render_keeps_order() {
        let mut content = AggregatedContent::new();
        content.push("README.md", "# Widgets");
        content.push("src/a.py", "print(1)");

        assert_eq!(content.labels(), vec!["README.md", "src/a.py"]);
        assert_eq!(
            content.render(),
            "--- README.md ---\n# Widgets\n\n--- src/a.py ---\nprint(1)\n\n"
        );
    }
}
