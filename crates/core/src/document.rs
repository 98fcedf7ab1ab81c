//! Declarative site document model and its structural validation.
//!
//! A [`Document`] is the full content of a revision: metadata, theme, and an
//! ordered list of pages, each an ordered list of sections. Section payloads
//! are a tagged union over the closed set `hero | features | cta | footer`,
//! serialized as `{ "type": "...", "content": { ... } }`.
//!
//! Documents from outside the process (operators, the refinement engine) go
//! through [`Document::from_value`], which rejects unknown section types and
//! missing fields, then runs [`Document::validate`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;
pub const MAX_TEXT_LENGTH: usize = 2_000;
pub const MAX_PAGES: usize = 20;
pub const MAX_SECTIONS_PER_PAGE: usize = 40;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pub theme: Theme,
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// `#rgb` or `#rrggbb`.
    pub primary_color: String,
    pub font_family: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Section {
    Hero(HeroContent),
    Features(FeaturesContent),
    Cta(CtaContent),
    Footer(FooterContent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaContent {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub button_label: String,
    pub button_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Section {
    /// The wire name of this section's type.
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Hero(_) => "hero",
            Section::Features(_) => "features",
            Section::Cta(_) => "cta",
            Section::Footer(_) => "footer",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Accumulates every problem found so callers see them all at once.
#[derive(Default)]
struct Issues(Vec<String>);

impl Issues {
    fn required(&mut self, path: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.0.push(format!("{path}: must not be empty"));
        } else {
            self.max_len(path, value, max);
        }
    }

    fn optional(&mut self, path: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            self.max_len(path, v, max);
        }
    }

    fn max_len(&mut self, path: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.0.push(format!("{path}: must be at most {max} characters"));
        }
    }

    fn push(&mut self, msg: String) {
        self.0.push(msg);
    }

    fn into_result(self) -> Result<(), CoreError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.0.join("; ")))
        }
    }
}

/// Whether `color` is a CSS hex color in `#rgb` or `#rrggbb` form.
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

impl Theme {
    /// Validate the theme on its own (revisions carry a theme column too).
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut issues = Issues::default();
        self.collect_issues(&mut issues);
        issues.into_result()
    }

    fn collect_issues(&self, issues: &mut Issues) {
        if !is_hex_color(&self.primary_color) {
            issues.push(format!(
                "theme.primary_color: '{}' is not a #rgb or #rrggbb color",
                self.primary_color
            ));
        }
        issues.required("theme.font_family", &self.font_family, MAX_TITLE_LENGTH);
    }
}

impl Section {
    fn collect_issues(&self, path: &str, issues: &mut Issues) {
        let field = |name: &str| format!("{path}.content.{name}");
        match self {
            Section::Hero(hero) => {
                issues.required(&field("headline"), &hero.headline, MAX_TITLE_LENGTH);
                issues.optional(&field("subheadline"), hero.subheadline.as_deref(), MAX_TEXT_LENGTH);
                issues.optional(&field("cta_label"), hero.cta_label.as_deref(), MAX_TITLE_LENGTH);
                issues.optional(&field("cta_href"), hero.cta_href.as_deref(), MAX_TEXT_LENGTH);
                issues.optional(&field("image_url"), hero.image_url.as_deref(), MAX_TEXT_LENGTH);
                if hero.cta_label.is_some() != hero.cta_href.is_some() {
                    issues.push(format!(
                        "{path}.content: cta_label and cta_href must be given together"
                    ));
                }
            }
            Section::Features(features) => {
                issues.optional(&field("heading"), features.heading.as_deref(), MAX_TITLE_LENGTH);
                if features.items.is_empty() {
                    issues.push(format!("{}: must contain at least one item", field("items")));
                }
                for (i, item) in features.items.iter().enumerate() {
                    let item_path = format!("{}[{i}]", field("items"));
                    issues.required(&format!("{item_path}.title"), &item.title, MAX_TITLE_LENGTH);
                    issues.required(
                        &format!("{item_path}.description"),
                        &item.description,
                        MAX_TEXT_LENGTH,
                    );
                }
            }
            Section::Cta(cta) => {
                issues.required(&field("headline"), &cta.headline, MAX_TITLE_LENGTH);
                issues.optional(&field("body"), cta.body.as_deref(), MAX_TEXT_LENGTH);
                issues.required(&field("button_label"), &cta.button_label, MAX_TITLE_LENGTH);
                issues.required(&field("button_href"), &cta.button_href, MAX_TEXT_LENGTH);
            }
            Section::Footer(footer) => {
                issues.optional(&field("text"), footer.text.as_deref(), MAX_TEXT_LENGTH);
                for (i, link) in footer.links.iter().enumerate() {
                    let link_path = format!("{}[{i}]", field("links"));
                    issues.required(&format!("{link_path}.label"), &link.label, MAX_TITLE_LENGTH);
                    issues.required(&format!("{link_path}.href"), &link.href, MAX_TEXT_LENGTH);
                }
            }
        }
    }
}

impl Document {
    /// Deserialize and validate a document received from outside the process.
    ///
    /// Unknown section types and missing required fields are rejected as
    /// [`CoreError::Validation`], as are documents failing [`Document::validate`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        let document: Document = serde_json::from_value(value)
            .map_err(|e| CoreError::Validation(format!("Malformed document: {e}")))?;
        document.validate()?;
        Ok(document)
    }

    /// Check structural rules. Documents without pages are valid drafts.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut issues = Issues::default();

        issues.required("metadata.title", &self.metadata.title, MAX_TITLE_LENGTH);
        issues.max_len(
            "metadata.description",
            &self.metadata.description,
            MAX_DESCRIPTION_LENGTH,
        );
        self.theme.collect_issues(&mut issues);

        if self.pages.len() > MAX_PAGES {
            issues.push(format!("pages: at most {MAX_PAGES} pages are allowed"));
        }
        for (p, page) in self.pages.iter().enumerate() {
            let page_path = format!("pages[{p}]");
            issues.required(&format!("{page_path}.name"), &page.name, MAX_TITLE_LENGTH);
            if page.sections.len() > MAX_SECTIONS_PER_PAGE {
                issues.push(format!(
                    "{page_path}.sections: at most {MAX_SECTIONS_PER_PAGE} sections are allowed"
                ));
            }
            for (s, section) in page.sections.iter().enumerate() {
                section.collect_issues(&format!("{page_path}.sections[{s}]"), &mut issues);
            }
        }

        issues.into_result()
    }

    /// Check the additional rules a document must meet before going live.
    pub fn validate_publishable(&self) -> Result<(), CoreError> {
        self.validate()?;
        if self.pages.is_empty() {
            return Err(CoreError::Validation(
                "Document must contain at least one page to be published".into(),
            ));
        }
        Ok(())
    }

    /// Total number of sections across all pages.
    pub fn section_count(&self) -> usize {
        self.pages.iter().map(|p| p.sections.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
