// src/crawl/queue.rs
// =============================================================================
// Breadth-first crawl over the GitHub "contents" API.
//
// How it works:
// 1. Start with the repository's root listing URL in a queue (depth 0)
// 2. List the directory
// 3. Read every allowed source file in it until the file budget is used up
// 4. Queue its sub-directories one level deeper
// 5. Repeat until the queue is empty or the file budget is reached
//
// Root-level files are always read before anything in a sub-directory, and
// no listing URL is requested twice, so even a listing that (wrongly) points
// back at one of its parents cannot make us loop.
//
// The crawl is sequential on purpose: one request at a time keeps the
// number of GitHub calls per roast small and predictable.
// =============================================================================

use std::collections::{HashSet, VecDeque};

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::budget::ContentBudget;
use super::content::{truncate, AggregatedContent};
use crate::error::RoastError;
use crate::github::{GitHubClient, RepositoryRef};

// Files at or below this many bytes (after trimming) are not worth sending
const MIN_USEFUL_BYTES: usize = 20;

/// One item of a GitHub contents listing
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
    /// Raw content URL, only set for files
    #[serde(default)]
    pub download_url: Option<String>,
    /// API URL of this entry; for directories, its listing
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// symlink, submodule, ...
    #[serde(other)]
    Other,
}

// A listing waiting in the queue
#[derive(Debug, Clone)]
struct DiscoveryNode {
    url: String,
    depth: usize,
}

// Crawls a repository starting from its root listing
//
// Parameters:
//   client: GitHub client (handles the anonymous fallback)
//   root_url: contents API URL of the repository root
//   repo: owner/name, used for errors and logs
//   budget: file count, depth, byte and extension limits
//   content: excerpts are appended here in discovery order
//
// Returns: Result<usize, RoastError>
//   Ok(n): n files were appended (0 is fine, the caller decides)
//   Err(RepositoryNotFoundOrPrivate): root listing answered 404
//   Err(RateLimited): root listing answered 403
pub async fn crawl_repository(
    client: &GitHubClient,
    root_url: &str,
    repo: &RepositoryRef,
    budget: &ContentBudget,
    content: &mut AggregatedContent,
) -> Result<usize, RoastError> {
    // Seed the queue with the root listing
    let mut queue = VecDeque::new();
    queue.push_back(DiscoveryNode {
        url: root_url.to_string(),
        depth: 0,
    });

    // Listing URLs already requested, scoped to this one crawl
    let mut visited = HashSet::new();
    // Files captured so far (the README is not counted)
    let mut found = 0;

    while found < budget.max_files {
        let Some(node) = queue.pop_front() else {
            break;
        };

        if node.depth > budget.max_depth {
            debug!(url = %node.url, depth = node.depth, "skipping listing beyond max depth");
            continue;
        }
        // insert() returns false if the URL was already there
        if !visited.insert(node.url.clone()) {
            debug!(url = %node.url, "skipping already visited listing");
            continue;
        }

        info!(url = %node.url, depth = node.depth, "listing directory");

        // Network failure: treat this listing as empty and keep going
        let Some(response) = client.get(&node.url).await else {
            continue;
        };

        let status = response.status();
        if status != StatusCode::OK {
            if node.url == root_url {
                match status {
                    StatusCode::NOT_FOUND => {
                        return Err(RoastError::RepositoryNotFoundOrPrivate {
                            owner: repo.owner.clone(),
                            name: repo.name.clone(),
                        })
                    }
                    StatusCode::FORBIDDEN => return Err(RoastError::RateLimited),
                    _ => {}
                }
            }
            warn!(url = %node.url, status = status.as_u16(), "listing failed, skipping");
            continue;
        }

        // A path that points at a single file returns an object, not a list
        let entries: Vec<FileEntry> = match response.json().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(url = %node.url, error = %e, "listing is not a list, skipping");
                continue;
            }
        };

        for entry in entries {
            // Budget reached: stop scanning, and don't queue more directories
            if found >= budget.max_files {
                break;
            }

            match entry.kind {
                EntryKind::File if budget.allows(&entry.name) => {
                    if capture_file(client, &entry, budget, content).await {
                        found += 1;
                    }
                }
                EntryKind::Dir if !entry.name.starts_with('.') => {
                    // Explored later, after every file at this level
                    let url = entry
                        .url
                        .clone()
                        .unwrap_or_else(|| format!("{}/{}", root_url, entry.path));
                    queue.push_back(DiscoveryNode {
                        url,
                        depth: node.depth + 1,
                    });
                }
                _ => {}
            }
        }
    }

    info!(repo = %repo, files = found, listings = visited.len(), "crawl finished");
    Ok(found)
}

// Downloads one file and appends it when it has enough text to be useful
//
// Returns: true if an excerpt was appended
async fn capture_file(
    client: &GitHubClient,
    entry: &FileEntry,
    budget: &ContentBudget,
    content: &mut AggregatedContent,
) -> bool {
    let Some(download_url) = entry.download_url.as_deref() else {
        return false;
    };
    let Some(text) = client.get_text(download_url).await else {
        return false;
    };

    if text.trim().len() <= MIN_USEFUL_BYTES {
        debug!(path = %entry.path, "file too small, skipping");
        return false;
    }

    content.push(entry.path.clone(), truncate(&text, budget.max_bytes_per_file));
    debug!(path = %entry.path, "captured file");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo() -> RepositoryRef {
        RepositoryRef {
            owner: "acme".to_string(),
            name: "widgets".to_string(),
        }
    }

    fn client() -> GitHubClient {
        GitHubClient::new(None, Duration::from_secs(5)).unwrap()
    }

    fn root(server: &MockServer) -> String {
        format!("{}/repos/acme/widgets/contents", server.uri())
    }

    fn file(server: &MockServer, path: &str) -> serde_json::Value {
        let name = path.rsplit('/').next().unwrap();
        json!({
            "type": "file",
            "name": name,
            "path": path,
            "download_url": format!("{}/raw/{}", server.uri(), path),
        })
    }

    fn dir(url: &str, path: &str) -> serde_json::Value {
        let name = path.rsplit('/').next().unwrap();
        json!({ "type": "dir", "name": name, "path": path, "url": url })
    }

    async fn mount_listing(server: &MockServer, at: &str, entries: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries))
            .mount(server)
            .await;
    }

    async fn mount_raw(server: &MockServer, file_path: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(format!("/raw/{}", file_path)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_file_budget_is_never_exceeded() {
        let server = MockServer::start().await;
        let names = ["a.py", "b.py", "c.py", "d.py", "e.py", "f.py"];
        let entries: Vec<_> = names.iter().map(|n| file(&server, n)).collect();
        mount_listing(&server, "/repos/acme/widgets/contents", json!(entries)).await;
        for name in names {
            mount_raw(&server, name, "x = 1\n".repeat(20)).await;
        }

        let budget = ContentBudget {
            max_files: 3,
            ..ContentBudget::default()
        };
        let mut content = AggregatedContent::new();
        let found = crawl_repository(&client(), &root(&server), &repo(), &budget, &mut content)
            .await
            .unwrap();

        assert_eq!(found, 3);
        assert_eq!(content.labels(), vec!["a.py", "b.py", "c.py"]);
    }

    #[tokio::test]
    async fn test_excerpts_are_truncated_and_small_files_skipped() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/repos/acme/widgets/contents",
            json!([file(&server, "big.rs"), file(&server, "tiny.rs"), file(&server, "notes.txt")]),
        )
        .await;
        mount_raw(&server, "big.rs", "fn main() {}\n".repeat(500)).await;
        mount_raw(&server, "tiny.rs", "fn a() {}".to_string()).await;

        let budget = ContentBudget {
            max_bytes_per_file: 100,
            ..ContentBudget::default()
        };
        let mut content = AggregatedContent::new();
        let found = crawl_repository(&client(), &root(&server), &repo(), &budget, &mut content)
            .await
            .unwrap();

        assert_eq!(found, 1);
        assert_eq!(content.labels(), vec!["big.rs"]);
        assert_eq!(content.excerpts()[0].text.len(), 100);
    }

    #[tokio::test]
    async fn test_cycle_is_listed_once() {
        let server = MockServer::start().await;
        let root_url = root(&server);

        // "loop" points back at the root listing
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([dir(&root_url, "loop"), file(&server, "a.py")])),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_raw(&server, "a.py", "print('hello world, this is python')".to_string()).await;

        let mut content = AggregatedContent::new();
        let found = crawl_repository(
            &client(),
            &root_url,
            &repo(),
            &ContentBudget::default(),
            &mut content,
        )
        .await
        .unwrap();

        assert_eq!(found, 1);
    }

    #[tokio::test]
    async fn test_depth_limit_stops_descent() {
        let server = MockServer::start().await;
        let base = root(&server);
        let level1 = format!("{}/src", base);
        let level2 = format!("{}/src/deep", base);

        mount_listing(&server, "/repos/acme/widgets/contents", json!([dir(&level1, "src")])).await;
        mount_listing(
            &server,
            "/repos/acme/widgets/contents/src",
            json!([dir(&level2, "src/deep"), file(&server, "src/lib.rs")]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents/src/deep"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        mount_raw(&server, "src/lib.rs", "pub fn answer() -> u32 { 42 }".to_string()).await;

        let budget = ContentBudget {
            max_depth: 1,
            ..ContentBudget::default()
        };
        let mut content = AggregatedContent::new();
        crawl_repository(&client(), &base, &repo(), &budget, &mut content)
            .await
            .unwrap();

        assert_eq!(content.labels(), vec!["src/lib.rs"]);
    }

    #[tokio::test]
    async fn test_hidden_directories_are_not_entered() {
        let server = MockServer::start().await;
        let base = root(&server);
        let github_dir = format!("{}/.github", base);

        mount_listing(&server, "/repos/acme/widgets/contents", json!([dir(&github_dir, ".github")])).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents/.github"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let mut content = AggregatedContent::new();
        let found = crawl_repository(&client(), &base, &repo(), &ContentBudget::default(), &mut content)
            .await
            .unwrap();
        assert_eq!(found, 0);
    }

    #[tokio::test]
    async fn test_root_status_mapping() {
        for (status, expected) in [(404, "REPO_NOT_FOUND_OR_PRIVATE"), (403, "GITHUB_RATE_LIMIT_EXCEEDED")] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let mut content = AggregatedContent::new();
            let err = crawl_repository(
                &client(),
                &root(&server),
                &repo(),
                &ContentBudget::default(),
                &mut content,
            )
            .await
            .unwrap_err();
            assert_eq!(err.code(), expected);
        }
    }

    #[tokio::test]
    async fn test_failing_subdirectory_is_skipped() {
        let server = MockServer::start().await;
        let base = root(&server);
        let broken = format!("{}/broken", base);

        mount_listing(
            &server,
            "/repos/acme/widgets/contents",
            json!([dir(&broken, "broken"), file(&server, "main.go")]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents/broken"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_raw(&server, "main.go", "package main\n\nfunc main() {}\n".to_string()).await;

        let mut content = AggregatedContent::new();
        let found = crawl_repository(&client(), &base, &repo(), &ContentBudget::default(), &mut content)
            .await
            .unwrap();
        assert_eq!(found, 1);
    }
}
