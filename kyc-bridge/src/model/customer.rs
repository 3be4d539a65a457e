//! Canonical customer record and identity document types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical customer submitted for verification.
///
/// Only the fields a vendor understands are forwarded; every adapter reads
/// the same record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Given name.
    pub first_name: String,
    /// Middle name(s).
    pub middle_name: Option<String>,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Gender as declared by the customer.
    pub gender: Option<Gender>,
    /// Nationality, ISO 3166-1 alpha-2.
    pub nationality: Option<String>,
    /// Business details when the customer is a legal entity.
    pub business: Option<BusinessInfo>,
    /// Residential or registered address.
    pub address: Option<Address>,
    /// Contact details.
    #[serde(default)]
    pub contact: ContactInfo,
    /// IP address the customer connected from.
    pub ip_address: Option<String>,

    /// Passport.
    pub passport: Option<DocumentProof>,
    /// Driver license.
    pub driver_license: Option<DocumentProof>,
    /// Certified translation of a foreign driver license.
    pub driver_license_translation: Option<DocumentProof>,
    /// National identity card.
    pub national_id_card: Option<DocumentProof>,
    /// National insurance / social security document.
    pub national_insurance: Option<DocumentProof>,
    /// Utility bill used as proof of address.
    pub utility_bill: Option<DocumentProof>,
    /// Selfie used for face matching.
    pub selfie: Option<DocumentProof>,
    /// Further supporting documents, in submission order.
    #[serde(default)]
    pub documents: Vec<SupportingDocument>,
}

impl CustomerRecord {
    /// Returns true when the record carries no identifying name at all.
    ///
    /// Such records are rejected before any network activity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let business_named =
            self.business.as_ref().is_some_and(|business| !business.name.trim().is_empty());
        self.first_name.trim().is_empty() && self.last_name.trim().is_empty() && !business_named
    }

    /// Jurisdiction used for provider routing: address country, then nationality.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.address
            .as_ref()
            .map(|address| address.country_alpha2.as_str())
            .filter(|country| !country.is_empty())
            .or(self.nationality.as_deref())
    }

    /// Proof supplied for `kind`: the dedicated field when there is one,
    /// otherwise the first matching entry of the generic document list.
    #[must_use]
    pub fn proof(&self, kind: DocumentKind) -> Option<&DocumentProof> {
        let dedicated = match kind {
            DocumentKind::Passport => self.passport.as_ref(),
            DocumentKind::DriverLicense => self.driver_license.as_ref(),
            DocumentKind::DriverLicenseTranslation => self.driver_license_translation.as_ref(),
            DocumentKind::NationalIdCard => self.national_id_card.as_ref(),
            DocumentKind::NationalInsurance => self.national_insurance.as_ref(),
            DocumentKind::UtilityBill => self.utility_bill.as_ref(),
            DocumentKind::Selfie => self.selfie.as_ref(),
            _ => None,
        };
        dedicated.or_else(|| {
            self.documents
                .iter()
                .find(|document| document.kind == kind)
                .map(|document| &document.proof)
        })
    }

    /// Full name as "first middle last", skipping missing parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [Some(self.first_name.as_str()), self.middle_name.as_deref(), Some(self.last_name.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Declared gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

/// Legal-entity details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessInfo {
    /// Registered company name.
    pub name: String,
    /// Company registration number.
    pub registration_number: Option<String>,
    /// Country of incorporation, ISO 3166-1 alpha-2.
    pub country_alpha2: Option<String>,
}

/// Postal address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    /// Country, ISO 3166-1 alpha-2.
    pub country_alpha2: String,
    /// State, province or region code.
    pub state: Option<String>,
    /// City or town.
    pub city: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Street name.
    pub street: Option<String>,
    /// Building or house number.
    pub building_number: Option<String>,
    /// Flat or unit number.
    pub flat_number: Option<String>,
}

impl Address {
    /// Single-line rendering used by vendors that take a free-form address.
    #[must_use]
    pub fn single_line(&self) -> String {
        let street = match (self.building_number.as_deref(), self.street.as_deref()) {
            (Some(number), Some(street)) => Some(format!("{number} {street}")),
            (None, Some(street)) => Some(street.to_owned()),
            (Some(number), None) => Some(number.to_owned()),
            (None, None) => None,
        };

        [
            street,
            self.city.clone(),
            self.state.clone(),
            self.postal_code.clone(),
            Some(self.country_alpha2.clone()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Contact details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    /// E-mail address.
    pub email: Option<String>,
    /// Phone number in international format.
    pub phone: Option<String>,
}

/// Semantic kind of an identity or supporting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Passport.
    Passport,
    /// Driver license.
    DriverLicense,
    /// Certified driver license translation.
    DriverLicenseTranslation,
    /// National identity card.
    NationalIdCard,
    /// National insurance document.
    NationalInsurance,
    /// Utility bill (proof of address).
    UtilityBill,
    /// Selfie photo.
    Selfie,
    /// Company board resolution or board member list.
    CompanyBoard,
    /// Company registration extract.
    CompanyRegistration,
    /// Proof of source of funds.
    ProofOfFunds,
    /// Proof of income.
    ProofOfIncome,
    /// Proof of business activity.
    ProofOfActivity,
    /// Anything else.
    Other,
}

/// A document the customer supplied, with or without scans.
///
/// A proof without an image never contributes a file to a request, but its
/// number may still be forwarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentProof {
    /// Document number.
    #[serde(default)]
    pub number: String,
    /// Issuing country, ISO 3166-1 alpha-2.
    pub country_alpha2: Option<String>,
    /// Issue date.
    pub issued_date: Option<NaiveDate>,
    /// Expiry date.
    pub valid_until: Option<NaiveDate>,
    /// Attached scans.
    pub image: Option<DocumentImage>,
}

/// One or two scans of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentImage {
    /// Front side (or the single page).
    pub front: DocumentFile,
    /// Back side, if scanned.
    pub back: Option<DocumentFile>,
}

/// Raw file attached to a document proof.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    /// Declared MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl DocumentFile {
    /// Creates a file from its declared content type and bytes.
    #[must_use]
    pub fn new(content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self { content_type: content_type.into(), data: data.into() }
    }
}

// Scans are large and personal; keep them out of logs.
impl std::fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile")
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Entry of the generic supporting-document list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportingDocument {
    /// What the document proves.
    pub kind: DocumentKind,
    /// The document itself.
    #[serde(flatten)]
    pub proof: DocumentProof,
}
