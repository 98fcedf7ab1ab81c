//! Slug normalization, validation, and collision disambiguation.
//!
//! Slugs are the public path segment of a site. They are derived from the
//! site name and disambiguated with a numeric suffix (`loja`, `loja-2`,
//! `loja-3`, ...) when the base is already taken.

use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a slug derived from a name, before any suffix.
pub const MAX_BASE_LENGTH: usize = 60;

/// Maximum length accepted for a slug supplied by an operator.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Base used when a name contains nothing that survives normalization.
pub const FALLBACK_BASE: &str = "site";

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Latin letters that have no canonical decomposition into ASCII + marks.
fn transliterate(c: char) -> Option<&'static str> {
    match c {
        'ß' => Some("ss"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ø' => Some("o"),
        'đ' => Some("d"),
        'ł' => Some("l"),
        'þ' => Some("th"),
        _ => None,
    }
}

/// Normalize arbitrary text into a slug candidate.
///
/// Strips diacritics (NFD, combining marks dropped), lowercases, and collapses
/// every run of characters outside `[a-z0-9]` into a single hyphen. Leading
/// and trailing hyphens are trimmed and the result is capped at
/// [`MAX_BASE_LENGTH`]. May return an empty string.
///
/// ```
/// use vitrine_core::slug::slugify;
///
/// assert_eq!(slugify("Café & Cia!!"), "cafe-cia");
/// assert_eq!(slugify("  Loja   Nova "), "loja-nova");
/// ```
pub fn slugify(text: &str) -> String {
    fn push_alnum(slug: &mut String, c: char, pending: &mut bool) {
        if *pending && !slug.is_empty() {
            slug.push('-');
        }
        *pending = false;
        slug.push(c);
    }

    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        for lower in c.to_lowercase() {
            if lower.is_ascii_alphanumeric() {
                push_alnum(&mut slug, lower, &mut pending_hyphen);
            } else if let Some(replacement) = transliterate(lower) {
                for r in replacement.chars() {
                    push_alnum(&mut slug, r, &mut pending_hyphen);
                }
            } else {
                pending_hyphen = true;
            }
        }
    }

    if slug.len() > MAX_BASE_LENGTH {
        // Only ASCII is ever pushed, so byte truncation is char-safe.
        slug.truncate(MAX_BASE_LENGTH);
        let trimmed_len = slug.trim_end_matches('-').len();
        slug.truncate(trimmed_len);
    }

    slug
}

/// Like [`slugify`], but never empty: falls back to [`FALLBACK_BASE`].
pub fn slug_base(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        slug
    }
}

// ---------------------------------------------------------------------------
// Disambiguation
// ---------------------------------------------------------------------------

/// Build the `n`-th candidate for a base: `base` for 1, `base-n` otherwise.
pub fn candidate(base: &str, n: u32) -> String {
    if n <= 1 {
        base.to_string()
    } else {
        format!("{base}-{n}")
    }
}

/// Return the suffix number `taken` uses for `base`, if it is a candidate of it.
fn suffix_of(base: &str, taken: &str) -> Option<u32> {
    if taken == base {
        return Some(1);
    }
    let rest = taken.strip_prefix(base)?.strip_prefix('-')?;
    if rest.is_empty() || rest.starts_with('0') || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    rest.parse::<u32>().ok().filter(|n| *n >= 2)
}

/// Find the smallest candidate number for `base`, not below `min`, that no
/// slug in `taken` uses. A `min` of 2 skips the bare base.
///
/// Slugs in `taken` that are not candidates of `base` are ignored.
pub fn first_free_suffix<'a>(
    base: &str,
    taken: impl IntoIterator<Item = &'a str>,
    min: u32,
) -> u32 {
    let used: BTreeSet<u32> = taken
        .into_iter()
        .filter_map(|slug| suffix_of(base, slug))
        .collect();

    let mut n = min.max(1);
    while used.contains(&n) {
        n += 1;
    }
    n
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an operator-supplied slug.
///
/// Must be non-empty, at most [`MAX_SLUG_LENGTH`] characters, contain only
/// lowercase alphanumerics and hyphens, and not start, end, or double up on
/// hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::Validation(
            "Slug must not start or end with a hyphen or contain consecutive hyphens".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
