//! Literal find/replace over the virtual file store.

use regex_lite::{NoExpand, Regex};

use crate::error::{ToolError, ToolResult};
use crate::state::StatePatch;
use crate::vfs::{VirtualFs, write_file};

/// A single edit request.
#[derive(Debug, Clone, Copy)]
pub struct EditRequest<'a> {
    /// Virtual path to edit
    pub path: &'a str,
    /// Literal text to find
    pub old_string: &'a str,
    /// Replacement text, inserted verbatim
    pub new_string: &'a str,
    /// Replace every occurrence instead of requiring a unique one
    pub replace_all: bool,
}

/// Apply `req` to the file it names.
///
/// `old_string` is matched literally: it is escaped before being handed to
/// the regex engine, and `new_string` is inserted without `$` expansion.
/// Without `replace_all` the target must occur exactly once. On success
/// returns the result message and a patch holding the new content.
pub fn edit_file(fs: &VirtualFs<'_>, req: EditRequest<'_>) -> ToolResult<(String, StatePatch)> {
    let content = fs.get(req.path)?;

    if !content.contains(req.old_string) {
        return Err(ToolError::StringNotFound(req.old_string.to_string()));
    }

    let pattern = Regex::new(&regex_lite::escape(req.old_string)).map_err(|e| {
        ToolError::InvalidArguments {
            tool: "edit_file".to_string(),
            reason: e.to_string(),
        }
    })?;

    let new_content = if req.replace_all {
        pattern.replace_all(content, NoExpand(req.new_string))
    } else {
        match pattern.find_iter(content).count() {
            0 => return Err(ToolError::StringNotFound(req.old_string.to_string())),
            1 => pattern.replace(content, NoExpand(req.new_string)),
            count => {
                return Err(ToolError::AmbiguousMatch {
                    needle: req.old_string.to_string(),
                    count,
                });
            }
        }
    };

    tracing::debug!(
        tool = "edit_file",
        path = req.path,
        replace_all = req.replace_all,
        "edited virtual file"
    );
    Ok(write_file(req.path, &new_content))
}
