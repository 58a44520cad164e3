// src/github/parse.rs
// =============================================================================
// Turns whatever the user pasted into an owner/name pair.
//
// Supported formats (the pair can appear anywhere in the string):
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - github.com/owner/repo/tree/main/src
//   - git@github.com:owner/repo.git is NOT supported (no `github.com/`)
// =============================================================================

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RoastError;

// Owner and name stop at the next '/', whitespace, query or fragment
static GITHUB_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/\s?#]+)/([^/\s?#]+)").expect("static regex is valid")
});

/// A repository on GitHub, identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// Parses a GitHub URL to extract owner and repository name
//
// Example:
//   "https://github.com/rust-lang/rust" -> RepositoryRef { owner: "rust-lang", name: "rust" }
pub fn parse_github_url(url: &str) -> Result<RepositoryRef, RoastError> {
    let captures = GITHUB_PATH
        .captures(url)
        .ok_or_else(|| RoastError::InvalidReference(url.to_string()))?;

    let owner = captures[1].to_string();
    let raw_name = &captures[2];
    let name = raw_name.strip_suffix(".git").unwrap_or(raw_name);

    // "github.com/owner/.git" leaves nothing behind
    if name.is_empty() {
        return Err(RoastError::InvalidReference(url.to_string()));
    }

    Ok(RepositoryRef {
        owner,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_url() {
        let repo = parse_github_url("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.name, "rust");
    }

    #[test]
    fn test_parse_github_url_with_git() {
        let repo = parse_github_url("https://github.com/user/repo.git").unwrap();
        assert_eq!(repo.owner, "user");
        assert_eq!(repo.name, "repo");
    }

    #[test]
    fn test_parse_deep_link_and_bare_host() {
        let repo = parse_github_url("github.com/acme/widgets/tree/main/src").unwrap();
        assert_eq!(repo.to_string(), "acme/widgets");

        let repo = parse_github_url("see https://www.github.com/acme/widgets?tab=readme").unwrap();
        assert_eq!(repo.to_string(), "acme/widgets");
    }

    #[test]
    fn test_only_trailing_git_is_stripped() {
        let repo = parse_github_url("https://github.com/acme/gitops.github.io").unwrap();
        assert_eq!(repo.name, "gitops.github.io");
    }

    #[test]
    fn test_parse_invalid_url() {
        assert!(matches!(
            parse_github_url("https://gitlab.com/user/repo"),
            Err(RoastError::InvalidReference(_))
        ));
        assert!(parse_github_url("https://github.com/only-owner").is_err());
        assert!(parse_github_url("https://github.com/owner/.git").is_err());
    }
}
