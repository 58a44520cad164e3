// src/crawl/budget.rs
// =============================================================================
// The limits that keep a crawl small: how many files, how deep, how much of
// each file, and which file types are worth reading at all.
// =============================================================================

use std::collections::HashSet;
use std::path::Path;

// Source file extensions worth showing to the model (lowercase, no dot)
const DEFAULT_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "go", "rs", "java", "cpp", "c", "h", "cs", "php", "rb",
];

#[derive(Debug, Clone)]
pub struct ContentBudget {
    /// Source files to collect (the README does not count)
    pub max_files: usize,
    /// Deepest directory level to list; the root listing is depth 0
    pub max_depth: usize,
    pub max_bytes_per_file: usize,
    pub allowed_extensions: HashSet<String>,
}

impl Default for ContentBudget {
    fn default() -> Self {
        ContentBudget {
            max_files: 4,
            max_depth: 2,
            max_bytes_per_file: 1500,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ContentBudget {
    /// Whether a file name has one of the allowed extensions (case-insensitive)
    pub fn allows(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.allowed_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_known_extensions() {
        let budget = ContentBudget::default();
        assert!(budget.allows("main.rs"));
        assert!(budget.allows("App.TSX"));
        assert!(budget.allows("lib.test.js"));
    }

    #[test]
    fn test_rejects_other_files() {
        let budget = ContentBudget::default();
        assert!(!budget.allows("README.md"));
        assert!(!budget.allows("Makefile"));
        assert!(!budget.allows(".rs"));
        assert!(!budget.allows("archive.rs.bak"));
    }
}
