//! Vendor file-type tags.
//!
//! Vendors name document types differently (`passport`, `DrivingLicence`,
//! `id`, ...). A [`DocumentTagger`] translates the canonical
//! [`DocumentKind`] into the vendor's tag; a kind without a tag is not
//! submitted to that vendor.

use std::borrow::Cow;

use crate::{documents::FileKind, model::DocumentKind};

/// Maps canonical document kinds to vendor file-type tags.
pub trait DocumentTagger: Send + Sync {
    /// Returns the vendor tag for `kind`, or `None` if the vendor does not
    /// accept that kind.
    fn tag(&self, kind: DocumentKind) -> Option<Cow<'static, str>>;
}

/// Tags each document with the lower-case name of its [`FileKind`].
///
/// Suits vendors whose upload API is keyed by file category rather than
/// by document type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileKindTagger;

impl FileKindTagger {
    /// Creates a new file-kind tagger.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentTagger for FileKindTagger {
    fn tag(&self, kind: DocumentKind) -> Option<Cow<'static, str>> {
        FileKind::of(kind).map(|file_kind| Cow::Borrowed(file_kind.as_str()))
    }
}

/// Tagger backed by a fixed table.
#[derive(Debug, Clone, Copy)]
pub struct TableTagger {
    table: &'static [(DocumentKind, &'static str)],
}

impl TableTagger {
    /// Creates a tagger from a static `(kind, tag)` table.
    #[must_use]
    pub const fn new(table: &'static [(DocumentKind, &'static str)]) -> Self {
        Self { table }
    }
}

impl DocumentTagger for TableTagger {
    fn tag(&self, kind: DocumentKind) -> Option<Cow<'static, str>> {
        self.table
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, tag)| *tag)
            .filter(|tag| !tag.is_empty())
            .map(Cow::Borrowed)
    }
}
