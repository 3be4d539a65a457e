//! Document selection.
//!
//! Decides which of a customer's documents are attached to a vendor
//! request, in what priority, and how they are encoded. Selection is pure:
//! a missing or unusable file is expressed as "nothing selected", never as
//! an error.

pub mod mime;
pub mod selector;
pub mod tagger;

use serde::Serialize;

pub use selector::{
    IdentitySelection, SelectedFile, encode_file, encode_image, select_identity_document,
    select_supporting_documents,
};
pub use tagger::{DocumentTagger, FileKindTagger, TableTagger};

use crate::model::DocumentKind;

/// Semantic category of a submitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Identity document.
    Id,
    /// Proof of address.
    Address,
    /// Company board documents.
    Board,
    /// Company registration.
    Register,
    /// Source of funds.
    Funds,
    /// Proof of income.
    Income,
    /// Business activity.
    Activity,
}

impl FileKind {
    /// File category of a document kind; `None` for kinds that are never
    /// submitted as files (selfies, unclassified documents).
    #[must_use]
    pub const fn of(kind: DocumentKind) -> Option<Self> {
        match kind {
            DocumentKind::Passport
            | DocumentKind::DriverLicense
            | DocumentKind::DriverLicenseTranslation
            | DocumentKind::NationalIdCard
            | DocumentKind::NationalInsurance => Some(Self::Id),
            DocumentKind::UtilityBill => Some(Self::Address),
            DocumentKind::CompanyBoard => Some(Self::Board),
            DocumentKind::CompanyRegistration => Some(Self::Register),
            DocumentKind::ProofOfFunds => Some(Self::Funds),
            DocumentKind::ProofOfIncome => Some(Self::Income),
            DocumentKind::ProofOfActivity => Some(Self::Activity),
            DocumentKind::Selfie | DocumentKind::Other => None,
        }
    }

    /// Lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Address => "address",
            Self::Board => "board",
            Self::Register => "register",
            Self::Funds => "funds",
            Self::Income => "income",
            Self::Activity => "activity",
        }
    }
}
