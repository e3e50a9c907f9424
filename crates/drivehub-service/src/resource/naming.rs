//! Sibling name de-duplication: `doc`, `doc (1)`, `doc (2)`, ...

use tracing::debug;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::{ResourceId, UserId};
use drivehub_database::ResourceStore;

/// Longest accepted resource name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Trim `name` and check it can be used as a resource name.
pub fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation(format!("'{name}' is not a valid name")));
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(AppError::validation(
            "Name must not contain slashes or control characters",
        ));
    }
    Ok(name.to_string())
}

/// Pick a name for `desired` that none of `existing` uses.
///
/// `desired` is returned unchanged unless some sibling is named exactly
/// `desired`. Otherwise the result is `"{desired} ({n + 1})"`, where `n`
/// is the largest suffix among siblings named `"{desired} ({n})"`. Gaps
/// are not filled.
pub fn next_unique_name(desired: &str, existing: &[String]) -> String {
    if !existing.iter().any(|name| name == desired) {
        return desired.to_string();
    }

    let highest = existing
        .iter()
        .filter_map(|name| numbered_suffix(desired, name))
        .max()
        .unwrap_or(0);

    format!("{desired} ({})", highest.saturating_add(1))
}

/// The `n` of `"{base} ({n})"`, if `name` has exactly that shape.
fn numbered_suffix(base: &str, name: &str) -> Option<u64> {
    let digits = name
        .strip_prefix(base)?
        .strip_prefix(" (")?
        .strip_suffix(')')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Resolve a free sibling name for `desired` under `(owner, parent)`.
///
/// The result is free at the time of the read only; the unique index on
/// active sibling names settles races at insert time.
pub async fn get_unique_name(
    store: &dyn ResourceStore,
    owner: UserId,
    parent: Option<ResourceId>,
    desired: &str,
) -> AppResult<String> {
    let existing = store.sibling_names_with_prefix(owner, parent, desired).await?;
    let name = next_unique_name(desired, &existing);
    if name != desired {
        debug!(owner = %owner, desired, resolved = %name, "Resolved sibling name clash");
    }
    Ok(name)
}
