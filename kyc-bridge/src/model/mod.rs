//! Canonical data model shared by every provider adapter.
//!
//! A [`CustomerRecord`] goes in, a [`VerificationOutcome`] comes out,
//! regardless of which vendor performed the check.

pub mod customer;
pub mod outcome;

pub use customer::{
    Address, BusinessInfo, ContactInfo, CustomerRecord, DocumentFile, DocumentImage, DocumentKind,
    DocumentProof, Gender, SupportingDocument,
};
pub use outcome::{Finality, StatusCheck, VerificationOutcome, VerificationStatus};
