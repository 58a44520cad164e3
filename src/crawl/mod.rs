// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a repository's file tree.
//
// Features:
// - Breadth-first crawling starting from the root listing
// - Budgeted: max files, max depth, max bytes per file, allowed extensions
// - Visited set so no listing is requested twice
//
// Submodules:
// - budget: the ContentBudget limits
// - content: the ordered, labeled excerpts we collect
// - queue: the crawl loop itself
// =============================================================================

mod budget;
mod content;
mod queue;

pub use budget::ContentBudget;
pub use content::{truncate, AggregatedContent, Excerpt};
pub use queue::crawl_repository;
