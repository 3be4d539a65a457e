//! Priority selection and encoding of document files.
//!
//! # Identity documents
//!
//! Candidates are evaluated in a fixed order:
//!
//! ```text
//! Passport → DriverLicense → DriverLicenseTranslation → NationalIdCard → NationalInsurance
//! ```
//!
//! The first candidate that is present, carries an image, has a content type
//! mapping to an accepted extension, and has a vendor tag wins. Later
//! candidates are not looked at, even if they would also qualify.
//!
//! # Supporting documents
//!
//! The utility bill and every entry of [`CustomerRecord::documents`] are
//! evaluated independently; each qualifying one yields a file, in
//! declaration order.

use base64::Engine;
use serde::Serialize;

use crate::{
    documents::{DocumentTagger, FileKind, mime},
    model::{CustomerRecord, DocumentFile, DocumentKind, DocumentProof},
};

/// A file ready to be attached to a vendor request.
///
/// Built fresh for every verification call and dropped once the request
/// has been sent.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    /// Semantic category.
    pub kind: FileKind,
    /// Document kind the file was taken from.
    pub source: DocumentKind,
    /// Vendor file-type tag.
    pub tag: String,
    /// Normalized, accepted extension.
    pub extension: String,
    /// Declared content type of the original file.
    pub content_type: String,
    /// Standard base64 of the raw bytes.
    pub payload_base64: String,
}

impl SelectedFile {
    /// Renders the payload as a `data:` URI.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.payload_base64)
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("tag", &self.tag)
            .field("extension", &self.extension)
            .field("payload_len", &self.payload_base64.len())
            .finish()
    }
}

/// Winning identity document.
///
/// When no candidate qualifies, `document_number` is empty and every other
/// field is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySelection {
    /// Number of the winning document.
    pub document_number: String,
    /// Kind of the winning document.
    pub kind: Option<DocumentKind>,
    /// Encoded front side.
    pub file: Option<SelectedFile>,
    /// Encoded back side, when scanned and acceptable.
    pub back: Option<SelectedFile>,
}

impl IdentitySelection {
    /// Returns true when no document was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file.is_none()
    }
}

/// Identity candidates in priority order.
fn identity_candidates(
    customer: &CustomerRecord,
) -> impl Iterator<Item = (DocumentKind, &DocumentProof)> {
    [
        (DocumentKind::Passport, customer.passport.as_ref()),
        (DocumentKind::DriverLicense, customer.driver_license.as_ref()),
        (DocumentKind::DriverLicenseTranslation, customer.driver_license_translation.as_ref()),
        (DocumentKind::NationalIdCard, customer.national_id_card.as_ref()),
        (DocumentKind::NationalInsurance, customer.national_insurance.as_ref()),
    ]
    .into_iter()
    .filter_map(|(kind, proof)| proof.map(|proof| (kind, proof)))
}

/// Selects the identity document to submit.
///
/// # Examples
///
/// ```
/// use kyc_bridge::{
///     documents::{FileKindTagger, select_identity_document},
///     model::{CustomerRecord, DocumentFile, DocumentImage, DocumentProof},
/// };
///
/// let customer = CustomerRecord {
///     passport: Some(DocumentProof {
///         number: "P1234567".to_owned(),
///         image: Some(DocumentImage {
///             front: DocumentFile::new("image/jpeg", vec![0xff, 0xd8]),
///             back: None,
///         }),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
///
/// let selection = select_identity_document(&customer, &FileKindTagger::new());
/// assert_eq!(selection.document_number, "P1234567");
/// assert_eq!(selection.file.unwrap().extension, "jpg");
/// ```
#[must_use]
pub fn select_identity_document(
    customer: &CustomerRecord,
    tagger: &dyn DocumentTagger,
) -> IdentitySelection {
    identity_candidates(customer)
        .find_map(|(kind, proof)| {
            let image = proof.image.as_ref()?;
            let file = encode_file(kind, &image.front, tagger)?;
            let back = image.back.as_ref().and_then(|back| encode_file(kind, back, tagger));
            Some(IdentitySelection {
                document_number: proof.number.clone(),
                kind: Some(kind),
                file: Some(file),
                back,
            })
        })
        .unwrap_or_default()
}

/// Selects every qualifying supporting document.
///
/// Identity kinds found in the generic document list are skipped; they are
/// only ever submitted through [`select_identity_document`].
#[must_use]
pub fn select_supporting_documents(
    customer: &CustomerRecord,
    tagger: &dyn DocumentTagger,
) -> Vec<SelectedFile> {
    let utility_bill =
        customer.utility_bill.as_ref().map(|proof| (DocumentKind::UtilityBill, proof));
    let generic = customer.documents.iter().map(|document| (document.kind, &document.proof));

    utility_bill
        .into_iter()
        .chain(generic)
        .filter(|(kind, _)| !matches!(FileKind::of(*kind), Some(FileKind::Id) | None))
        .filter_map(|(kind, proof)| {
            let image = proof.image.as_ref()?;
            encode_file(kind, &image.front, tagger)
        })
        .collect()
}

/// Validates and encodes a single file.
///
/// Returns `None` when the kind has no file category, the content type does
/// not map to an accepted extension, or the vendor has no tag for the kind.
#[must_use]
pub fn encode_file(
    kind: DocumentKind,
    file: &DocumentFile,
    tagger: &dyn DocumentTagger,
) -> Option<SelectedFile> {
    let file_kind = FileKind::of(kind)?;
    let (extension, payload_base64) = encode_image(file)?;
    let tag = tagger.tag(kind)?;

    Some(SelectedFile {
        kind: file_kind,
        source: kind,
        tag: tag.into_owned(),
        extension,
        content_type: file.content_type.clone(),
        payload_base64,
    })
}

/// Validates a raw image and returns its normalized extension and base64 payload.
///
/// Used directly for images that are not documents, such as selfies.
#[must_use]
pub fn encode_image(file: &DocumentFile) -> Option<(String, String)> {
    let extension = mime::accepted_extension(&file.content_type)?;
    Some((extension, base64::engine::general_purpose::STANDARD.encode(&file.data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        documents::{FileKindTagger, TableTagger},
        model::{DocumentImage, SupportingDocument},
    };

    fn proof(number: &str, content_type: &str, data: &[u8]) -> DocumentProof {
        DocumentProof {
            number: number.to_owned(),
            image: Some(DocumentImage { front: DocumentFile::new(content_type, data), back: None }),
            ..Default::default()
        }
    }

    fn imageless(number: &str) -> DocumentProof {
        DocumentProof { number: number.to_owned(), ..Default::default() }
    }

    #[test]
    fn test_empty_customer_selects_nothing() {
        let selection = select_identity_document(&CustomerRecord::default(), &FileKindTagger);
        assert_eq!(selection, IdentitySelection::default());
        assert!(selection.document_number.is_empty());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_passport_beats_driver_license() {
        let customer = CustomerRecord {
            driver_license: Some(proof("DL-1", "image/png", b"license")),
            passport: Some(proof("P-1", "image/jpeg", b"passport")),
            ..Default::default()
        };

        let selection = select_identity_document(&customer, &FileKindTagger);
        assert_eq!(selection.document_number, "P-1");
        assert_eq!(selection.kind, Some(DocumentKind::Passport));
        let file = selection.file.unwrap();
        assert_eq!(file.payload_base64, "cGFzc3BvcnQ=");
        assert_eq!(file.kind, FileKind::Id);
        assert_eq!(file.tag, "id");
    }

    #[test]
    fn test_imageless_candidate_is_skipped() {
        let customer = CustomerRecord {
            passport: Some(imageless("P-1")),
            national_id_card: Some(proof("ID-9", "application/pdf", b"%PDF")),
            ..Default::default()
        };

        let selection = select_identity_document(&customer, &FileKindTagger);
        assert_eq!(selection.document_number, "ID-9");
        assert_eq!(selection.file.unwrap().extension, "pdf");
    }

    #[test]
    fn test_unmapped_content_type_never_wins() {
        let customer = CustomerRecord {
            passport: Some(proof("P-1", "application/octet-stream", b"blob")),
            ..Default::default()
        };

        let selection = select_identity_document(&customer, &FileKindTagger);
        assert!(selection.is_empty());
        assert!(selection.document_number.is_empty());
    }

    #[test]
    fn test_unmapped_content_type_falls_through_to_next_candidate() {
        let customer = CustomerRecord {
            passport: Some(proof("P-1", "application/octet-stream", b"blob")),
            driver_license_translation: Some(proof("DLT-3", "image/gif", b"gif")),
            ..Default::default()
        };

        let selection = select_identity_document(&customer, &FileKindTagger);
        assert_eq!(selection.document_number, "DLT-3");
    }

    #[test]
    fn test_untagged_kind_is_skipped() {
        const TABLE: &[(DocumentKind, &str)] = &[(DocumentKind::NationalIdCard, "id_card")];
        let customer = CustomerRecord {
            passport: Some(proof("P-1", "image/jpeg", b"p")),
            national_id_card: Some(proof("ID-2", "image/jpeg", b"i")),
            ..Default::default()
        };

        let selection = select_identity_document(&customer, &TableTagger::new(TABLE));
        assert_eq!(selection.document_number, "ID-2");
        assert_eq!(selection.file.unwrap().tag, "id_card");
    }

    #[test]
    fn test_back_side_is_encoded() {
        let mut passport = proof("P-1", "image/jpeg", b"front");
        if let Some(image) = passport.image.as_mut() {
            image.back = Some(DocumentFile::new("image/png", b"back".to_vec()));
        }
        let customer = CustomerRecord { passport: Some(passport), ..Default::default() };

        let selection = select_identity_document(&customer, &FileKindTagger);
        let back = selection.back.unwrap();
        assert_eq!(back.extension, "png");
        assert_eq!(back.payload_base64, "YmFjaw==");
    }

    #[test]
    fn test_supporting_documents_in_declaration_order() {
        let customer = CustomerRecord {
            utility_bill: Some(proof("", "application/pdf", b"bill")),
            documents: vec![
                SupportingDocument {
                    kind: DocumentKind::CompanyRegistration,
                    proof: proof("", "image/png", b"reg"),
                },
                SupportingDocument {
                    kind: DocumentKind::Other,
                    proof: proof("", "image/png", b"other"),
                },
                SupportingDocument {
                    kind: DocumentKind::CompanyBoard,
                    proof: proof("", "image/tiff", b"board"),
                },
                SupportingDocument {
                    kind: DocumentKind::Passport,
                    proof: proof("P-2", "image/jpeg", b"second passport"),
                },
            ],
            ..Default::default()
        };

        let files = select_supporting_documents(&customer, &FileKindTagger);
        let kinds: Vec<_> = files.iter().map(|file| file.kind).collect();
        assert_eq!(kinds, vec![FileKind::Address, FileKind::Register, FileKind::Board]);
        assert_eq!(files[2].extension, "tiff");
    }

    #[test]
    fn test_supporting_documents_skip_invalid_files() {
        let customer = CustomerRecord {
            utility_bill: Some(proof("", "text/html", b"<html>")),
            documents: vec![SupportingDocument {
                kind: DocumentKind::ProofOfFunds,
                proof: imageless("bank statement"),
            }],
            ..Default::default()
        };

        assert!(select_supporting_documents(&customer, &FileKindTagger).is_empty());
    }

    #[test]
    fn test_encode_image() {
        let encoded = encode_image(&DocumentFile::new("image/JPEG", b"selfie".to_vec()));
        assert_eq!(encoded, Some(("jpg".to_owned(), "c2VsZmll".to_owned())));
        assert_eq!(encode_image(&DocumentFile::new("video/mp4", b"clip".to_vec())), None);
    }

    #[test]
    fn test_data_uri() {
        let file = encode_file(
            DocumentKind::Selfie,
            &DocumentFile::new("image/jpeg", b"x".to_vec()),
            &TableTagger::new(&[(DocumentKind::Selfie, "face")]),
        );
        assert!(file.is_none(), "selfies have no file category");

        let file = encode_file(
            DocumentKind::UtilityBill,
            &DocumentFile::new("image/jpeg", b"x".to_vec()),
            &FileKindTagger,
        )
        .unwrap();
        assert_eq!(file.data_uri(), "data:image/jpeg;base64,eA==");
    }
}
