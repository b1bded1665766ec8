//! Tiered source file search.
//!
//! Tiers run in order and the first one that matches anything wins:
//!
//! 1. [`SearchTier::ExactFilename`]: the file name equals the query, or
//!    starts with the query stem followed by a dot.
//! 2. [`SearchTier::PathOrContent`]: the path or name contains the query or
//!    its stem, or the decoded text does. Binary and undecodable files are
//!    matched on name and path only.
//!
//! If both come back empty, file names sharing a short prefix with the stem
//! are offered as suggestions through [`ToolError::NoResults`].

use super::{SourceConfig, SourceFile, SourceTree, text};
use crate::error::{ToolError, ToolResult};

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The query as given
    pub raw: String,
    /// Lower-cased query
    pub lower: String,
    /// Lower-cased query with a trailing source extension removed
    pub stem: String,
}

impl SearchQuery {
    /// Normalize `query` against the extension allow-list of `config`.
    pub fn parse(query: &str, config: &SourceConfig) -> Self {
        let lower = query.to_lowercase();
        let stem = match config.source_extension(&lower) {
            Some(ext) => lower[..lower.len() - ext.len() - 1].to_string(),
            None => lower.clone(),
        };
        Self {
            raw: query.to_string(),
            lower,
            stem,
        }
    }
}

/// One level of the search fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTier {
    /// Exact file name match
    ExactFilename,
    /// Substring match on path, name, or text content
    PathOrContent,
}

impl SearchTier {
    /// Tiers in the order they are tried.
    pub const ALL: [SearchTier; 2] = [SearchTier::ExactFilename, SearchTier::PathOrContent];

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SearchTier::ExactFilename => "exact_filename",
            SearchTier::PathOrContent => "path_or_content",
        }
    }

    fn matches(&self, file: &SourceFile, query: &SearchQuery, sniff_bytes: usize) -> bool {
        match self {
            SearchTier::ExactFilename => {
                let name = file.lower_name();
                name == query.lower || name.starts_with(&format!("{}.", query.stem))
            }
            SearchTier::PathOrContent => {
                let path = file.lower_path();
                if path.contains(&query.lower) || path.contains(&query.stem) {
                    return true;
                }
                let name = file.lower_name();
                let bare = name.rsplit_once('.').map_or(name.as_str(), |(b, _)| b);
                if name.contains(&query.stem) || bare.contains(&query.stem) {
                    return true;
                }
                match text::read_text(&file.path, sniff_bytes) {
                    Ok(content) => {
                        let content = content.to_lowercase();
                        content.contains(&query.lower) || content.contains(&query.stem)
                    }
                    Err(err) => {
                        tracing::trace!(path = %file.display(), error = %err, "name-only match");
                        false
                    }
                }
            }
        }
    }
}

impl SourceTree {
    /// Search the source root for `query`, returning up to `max_results` paths.
    ///
    /// Fails with `NoResults` (carrying suggestions and the searched root)
    /// when no tier matches.
    pub fn search(&self, query: &str, max_results: usize) -> ToolResult<Vec<String>> {
        if max_results == 0 {
            return Err(ToolError::ZeroCount("maxResults"));
        }
        tracing::info!(query, root = %self.root_display(), "searching source files");

        let parsed = SearchQuery::parse(query, &self.config);
        for tier in SearchTier::ALL {
            let found = self.run_tier(tier, &parsed, max_results)?;
            if !found.is_empty() {
                tracing::info!(tier = tier.name(), count = found.len(), "found source files");
                return Ok(found);
            }
        }

        let suggestions = self.suggest(&parsed)?;
        tracing::info!(query, suggestions = suggestions.len(), "no source files matched");
        Err(ToolError::NoResults {
            query: query.to_string(),
            root: self.root_display(),
            suggestions,
        })
    }

    /// Run a single tier, returning up to `max_results` paths.
    pub fn run_tier(
        &self,
        tier: SearchTier,
        query: &SearchQuery,
        max_results: usize,
    ) -> ToolResult<Vec<String>> {
        let sniff = self.limits.binary_sniff_bytes;
        Ok(self
            .source_files()?
            .filter(|file| tier.matches(file, query, sniff))
            .take(max_results)
            .map(|file| file.display())
            .collect())
    }

    /// File names containing the first few characters of the query stem.
    pub fn suggest(&self, query: &SearchQuery) -> ToolResult<Vec<String>> {
        let prefix: String = query
            .stem
            .chars()
            .take(self.limits.suggestion_prefix_chars)
            .collect();

        let mut names: Vec<String> = Vec::new();
        for file in self.source_files()? {
            if names.len() >= self.limits.max_suggestions {
                break;
            }
            if file.lower_name().contains(&prefix) && !names.contains(&file.name) {
                names.push(file.name);
            }
        }
        Ok(names)
    }
}
