//! Site display-name rules.

use crate::error::CoreError;

/// Maximum length of a site name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Suffix appended to the name of a duplicated site.
pub const COPY_SUFFIX: &str = " (copy)";

/// Validate and trim an operator-supplied site name.
pub fn normalize_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Site name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Site name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Name for a duplicate of `source`, kept within [`MAX_NAME_LENGTH`].
pub fn copy_name(source: &str) -> String {
    let room = MAX_NAME_LENGTH - COPY_SUFFIX.chars().count();
    let base: String = source.trim().chars().take(room).collect();
    format!("{}{COPY_SUFFIX}", base.trim_end())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(normalize_name("  Loja  ").unwrap(), "Loja");
    }

    #[test]
    fn blank_name_rejected() {
        assert_matches!(normalize_name("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn long_name_rejected() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert_matches!(normalize_name(&name), Err(CoreError::Validation(_)));
        assert!(normalize_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn copy_name_appends_suffix() {
        assert_eq!(copy_name("Loja"), "Loja (copy)");
    }

    #[test]
    fn copy_name_stays_within_limit() {
        let name = copy_name(&"é".repeat(MAX_NAME_LENGTH));
        assert_eq!(name.chars().count(), MAX_NAME_LENGTH);
        assert!(name.ends_with(COPY_SUFFIX));
        assert!(normalize_name(&name).is_ok());
    }
}
