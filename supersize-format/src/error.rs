use thiserror::Error;

/// The kind of a [`SizeFileError`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SizeFileErrorKind {
    /// The version line does not match the supported format version.
    #[error("unsupported size file version")]
    UnsupportedVersion,
    /// The stream ended before the format said it would.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Bytes remain after the last symbol line.
    #[error("trailing data after final symbol")]
    TrailingData,
    /// A part of the file is not valid UTF-8.
    #[error("bad utf-8 sequence")]
    BadEncoding,
    /// The preamble, JSON header blob, or blank separator is malformed.
    #[error("invalid size file header")]
    BadHeader,
    /// An integer token could not be parsed.
    #[error("invalid number")]
    BadNumber,
    /// A path-table line is missing its tab separator.
    #[error("invalid path table entry")]
    BadTableEntry,
    /// A per-section line holds the wrong number of tokens, or a block holds
    /// the wrong number of lines.
    #[error("row or column count mismatch")]
    BadRowCount,
    /// A path or component index points outside its lookup table.
    #[error("lookup index {0} out of range")]
    BadIndex(i64),
    /// An alias-count token conflicts with the symbols around it.
    #[error("invalid alias count")]
    BadAliasCount,
    /// Two non-aliased symbols share an address while the earlier one has
    /// nonzero content size.
    #[error("overlapping symbols at address {0}")]
    SymbolOverlap(i64),
    /// Folding a derived padding gap into a symbol made its size negative.
    #[error("derived negative size at address {0}")]
    NegativeSize(i64),
    /// Symbols are not partitioned by section in sorted order.
    #[error("symbols are not sorted by section")]
    UnsortedSymbols,
    /// The gzip wrapping could not be read or written.
    #[error("invalid compressed stream")]
    BadCompression,
    /// Writing to the output stream failed.
    #[error("failed to write size file")]
    Io,
}

/// An error encountered while reading or writing a `.size` file.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct SizeFileError {
    pub(crate) kind: SizeFileErrorKind,
    #[source]
    pub(crate) source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SizeFileError {
    /// Creates a new SizeFileError from a known kind of error as well as an
    /// arbitrary error payload.
    pub(crate) fn new<E>(kind: SizeFileErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let source = Some(source.into());
        Self { kind, source }
    }

    /// Returns the corresponding [`SizeFileErrorKind`] for this error.
    pub fn kind(&self) -> SizeFileErrorKind {
        self.kind
    }
}

impl From<SizeFileErrorKind> for SizeFileError {
    fn from(kind: SizeFileErrorKind) -> Self {
        Self { kind, source: None }
    }
}

impl From<std::io::Error> for SizeFileError {
    fn from(e: std::io::Error) -> Self {
        Self::new(SizeFileErrorKind::Io, e)
    }
}

impl From<serde_json::Error> for SizeFileError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(SizeFileErrorKind::BadHeader, e)
    }
}
