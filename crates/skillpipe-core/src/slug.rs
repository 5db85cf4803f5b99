//! Output path resolution
//!
//! Derives a deterministic artifact path from the skill input. Two inputs
//! that slugify identically map to the same file and overwrite each other.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::error::{Result, SkillError};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("non-alphanumeric pattern is valid"));

const SEPARATOR: &str = "-";

/// Turns an input into a filesystem-friendly slug
///
/// URL inputs collapse every run of non-alphanumeric characters, anything
/// else only collapses whitespace runs. Leading and trailing separators are
/// trimmed.
///
/// # Example
/// ```
/// use skillpipe_core::slug::slugify;
/// assert_eq!(slugify("hello world"), "hello-world");
/// assert_eq!(slugify("https://a.com/x?y=1"), "https-a-com-x-y-1");
/// ```
pub fn slugify(input: &str) -> String {
    let trimmed = input.trim();
    let pattern = if is_url(trimmed) {
        &*NON_ALNUM_RUN
    } else {
        &*WHITESPACE_RUN
    };

    pattern
        .replace_all(trimmed, SEPARATOR)
        .trim_matches('-')
        .to_string()
}

/// Default artifact path `base_dir/<slug><suffix>`, without touching the disk
///
/// The result always stays under `base_dir`: leading separators are
/// stripped from the slug and parent-directory components are rejected.
///
/// # Errors
/// `InvalidInput` when the input has no slug-worthy characters or would
/// leave `base_dir`
pub fn default_output_path(input: &str, base_dir: &Path, suffix: &str) -> Result<PathBuf> {
    let slug = slugify(input);
    let slug = slug.trim_start_matches(['/', '\\']);
    if slug.is_empty() {
        return Err(SkillError::InvalidInput(format!(
            "cannot derive a file name from {:?}",
            input
        )));
    }

    let file_name = format!("{}{}", slug, suffix);
    let relative = Path::new(&file_name);
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(SkillError::InvalidInput(format!(
            "{:?} does not map to a file under {}",
            input,
            base_dir.display()
        )));
    }
    Ok(base_dir.join(relative))
}

/// Resolve where a skill writes its artifact
///
/// An explicit path is returned unchanged and nothing is created; the
/// caller owns its directories. Otherwise `base_dir` is created
/// (recursively, idempotently) and the default path is returned.
pub async fn resolve(
    input: &str,
    base_dir: &Path,
    explicit: Option<&Path>,
    suffix: &str,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let path = default_output_path(input, base_dir, suffix)?;
    tokio::fs::create_dir_all(base_dir)
        .await
        .map_err(|e| SkillError::io(base_dir, e))?;
    Ok(path)
}

fn is_url(input: &str) -> bool {
    Url::parse(input).map(|url| url.has_host()).unwrap_or(false)
}
