//! # Document Checklist Gate
//!
//! Gates step progression on the citizen's attestation that required
//! documents are in hand. Attestation is trusted as stated — the kiosk
//! does not verify authenticity.
//!
//! Attestations are stored by document index (position in the service
//! definition's document list); a mandatory document with no `true`
//! entry blocks progression, optional documents never do.

use std::collections::BTreeMap;

use janseva_core::DocumentSpec;

/// Whether every mandatory document has been attested.
pub fn all_required_attested(
    documents: &[DocumentSpec],
    attestation: &BTreeMap<usize, bool>,
) -> bool {
    documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| doc.mandatory)
        .all(|(index, _)| attestation.get(&index).copied().unwrap_or(false))
}

/// English labels of the mandatory documents still missing attestation,
/// in checklist order. Used for the blocking banner text.
pub fn missing_documents<'a>(
    documents: &'a [DocumentSpec],
    attestation: &BTreeMap<usize, bool>,
) -> Vec<&'a str> {
    documents
        .iter()
        .enumerate()
        .filter(|(index, doc)| {
            doc.mandatory && !attestation.get(index).copied().unwrap_or(false)
        })
        .map(|(_, doc)| doc.label_en.as_str())
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────
