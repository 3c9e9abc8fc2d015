//! Supporting documents
//!
//! Only the metadata of an uploaded file is modelled here; the bytes live in
//! whatever file store the web layer uses. Documents belong to exactly one
//! claim and are deleted with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DocumentId};

/// Most documents one claim may carry
pub const MAX_DOCUMENTS_PER_CLAIM: usize = 5;

pub const MAX_FILE_NAME_LEN: usize = 255;
pub const MAX_STORED_NAME_LEN: usize = 500;
pub const MAX_CONTENT_TYPE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Metadata for a file attached to a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportingDocument {
    pub id: DocumentId,
    pub claim_id: ClaimId,
    /// Name the file was uploaded with
    pub file_name: String,
    /// Name under which the file store keeps it
    pub stored_file_name: String,
    pub content_type: String,
    /// Size in bytes
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub description: Option<String>,
}

/// Document metadata supplied with a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub file_name: String,
    pub stored_file_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub description: Option<String>,
}

impl NewDocument {
    /// Returns one message per violated length or size rule
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.file_name.trim().is_empty() {
            problems.push("Document file name is required".to_string());
        }
        if self.file_name.chars().count() > MAX_FILE_NAME_LEN {
            problems.push(format!(
                "Document file name cannot exceed {MAX_FILE_NAME_LEN} characters"
            ));
        }
        if self.stored_file_name.trim().is_empty() {
            problems.push("Document stored name is required".to_string());
        }
        if self.stored_file_name.chars().count() > MAX_STORED_NAME_LEN {
            problems.push(format!(
                "Document stored name cannot exceed {MAX_STORED_NAME_LEN} characters"
            ));
        }
        if self.content_type.chars().count() > MAX_CONTENT_TYPE_LEN {
            problems.push(format!(
                "Document content type cannot exceed {MAX_CONTENT_TYPE_LEN} characters"
            ));
        }
        if self
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            problems.push(format!(
                "Document description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            ));
        }
        if self.file_size < 0 {
            problems.push("Document size cannot be negative".to_string());
        }
        problems
    }

    /// Attaches the metadata to a claim
    pub fn attach_to(self, claim_id: ClaimId, uploaded_at: DateTime<Utc>) -> SupportingDocument {
        SupportingDocument {
            id: DocumentId::new_v7(),
            claim_id,
            file_name: self.file_name,
            stored_file_name: self.stored_file_name,
            content_type: self.content_type,
            file_size: self.file_size,
            uploaded_at,
            description: self.description,
        }
    }
}
