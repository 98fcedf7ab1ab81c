//! Contract with the external refinement engine that proposes new documents.
//!
//! The engine itself lives outside this system. This module defines the seam
//! ([`RefinementEngine`]), the boundary checks applied to its output, and the
//! per-site exclusion that keeps at most one refinement in flight per site.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of an operator instruction.
pub const MAX_INSTRUCTION_LENGTH: usize = 4_000;

/// Default time budget for one engine call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Failure reported by a refinement engine.
#[derive(Debug, thiserror::Error)]
pub enum RefinementError {
    /// The engine could not be reached or returned a transport-level error.
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The engine answered but refused or failed to produce a document.
    #[error("engine rejected the request: {0}")]
    Rejected(String),
}

/// An external collaborator that rewrites a document from an instruction.
///
/// Implementations return raw JSON; nothing they produce is trusted until
/// [`refine_document`] has validated it against the document shape.
#[async_trait]
pub trait RefinementEngine: Send + Sync {
    async fn generate(
        &self,
        current: &Document,
        instruction: &str,
    ) -> Result<serde_json::Value, RefinementError>;
}

/// Validate an operator instruction before it is sent to the engine.
pub fn validate_instruction(instruction: &str) -> Result<(), CoreError> {
    if instruction.trim().is_empty() {
        return Err(CoreError::Validation("Instruction must not be empty".into()));
    }
    if instruction.chars().count() > MAX_INSTRUCTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Instruction must be at most {MAX_INSTRUCTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Ask the engine for a refined document and validate what comes back.
///
/// Engine errors and timeouts become [`CoreError::GenerationFailure`]. So does
/// output that does not match the document shape, because the caller's
/// remedy is the same: retry the refinement.
pub async fn refine_document(
    engine: &dyn RefinementEngine,
    current: &Document,
    instruction: &str,
    timeout: Duration,
) -> Result<Document, CoreError> {
    validate_instruction(instruction)?;

    let raw = tokio::time::timeout(timeout, engine.generate(current, instruction))
        .await
        .map_err(|_| {
            CoreError::GenerationFailure(format!("engine did not answer within {timeout:?}"))
        })?
        .map_err(|e| CoreError::GenerationFailure(e.to_string()))?;

    Document::from_value(raw).map_err(|e| match e {
        CoreError::Validation(msg) => {
            CoreError::GenerationFailure(format!("engine returned an invalid document: {msg}"))
        }
        other => other,
    })
}

// ---------------------------------------------------------------------------
// In-flight exclusion
// ---------------------------------------------------------------------------

/// Tracks which sites currently have a refinement in flight.
///
/// This is a soft, in-process exclusion: it keeps one operator from racing
/// their own refinements. Version numbering correctness never depends on it.
#[derive(Debug, Clone, Default)]
pub struct InFlightRefinements {
    sites: Arc<Mutex<HashSet<DbId>>>,
}

/// Held while a refinement runs; releases the site on drop.
#[derive(Debug)]
pub struct RefinementGuard {
    sites: Arc<Mutex<HashSet<DbId>>>,
    site_id: DbId,
}

impl InFlightRefinements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the site, or fail with [`CoreError::Conflict`] if already claimed.
    pub fn try_acquire(&self, site_id: DbId) -> Result<RefinementGuard, CoreError> {
        let mut sites = self
            .sites
            .lock()
            .map_err(|_| CoreError::Internal("refinement registry lock poisoned".into()))?;
        if !sites.insert(site_id) {
            return Err(CoreError::Conflict(format!(
                "A refinement is already in progress for site {site_id}"
            )));
        }
        Ok(RefinementGuard {
            sites: Arc::clone(&self.sites),
            site_id,
        })
    }
}

impl Drop for RefinementGuard {
    fn drop(&mut self) {
        if let Ok(mut sites) = self.sites.lock() {
            sites.remove(&self.site_id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
