//! Reader and writer for SuperSize `.size` files.
//!
//! A size file is a compact, line-oriented text serialization of a
//! [`SizeInfo`](supersize_models::SizeInfo): every symbol extracted from a
//! binary, with addresses, sizes, paths, components, flags, and alias
//! groups. The layout trades generality for two hard guarantees: loading a
//! saved file reproduces the input exactly, and saving the same input twice
//! produces byte-identical output.
//!
//! # Structure of a size file
//!
//! The uncompressed logical layout, in write order:
//!
//! 1. A comment line and the exact format version string.
//! 2. A JSON blob (prefixed by its byte length) holding section size totals,
//!    free-form metadata, and the `has_components` / `has_padding` feature
//!    flags, followed by one blank separator line.
//! 3. The path table: sorted unique `object_path TAB source_path` pairs,
//!    count first. Symbols refer to entries by position.
//! 4. The component table (only with `has_components`): sorted unique
//!    component strings, count first.
//! 5. One line of tab-separated section names and one line of matching
//!    symbol counts. These counts shape every block that follows.
//! 6. Numeric columns, one line of space-separated integers per section:
//!    addresses (delta-encoded), content sizes, padding (only with
//!    `has_padding`), path-table indices (delta-encoded), component-table
//!    indices (delta-encoded, only with `has_components`). Delta sequences
//!    restart at every section boundary.
//! 7. One line per symbol: the full name, then optionally an alias-count
//!    token (hex, prefixed with a literal `0`) on the first member of each
//!    alias group of two or more, then optionally the flags in plain hex
//!    when nonzero. The leading `0` is what distinguishes the two optional
//!    fields when only one is present.
//!
//! The on-disk `.size` artifact is this layout behind a gzip wrapper
//! ([`save_size_file`] / [`load_size_file`]); [`save_size_info`] /
//! [`load_size_info`] operate on the raw layout.
//!
//! # Padding
//!
//! A symbol's `size` includes the alignment gap that precedes its successor.
//! Full saves do not persist the padding column: for a contiguous sorted
//! symbol list the gap between one symbol's content end and the next
//! symbol's address is recomputed on load ([`derive_section_padding`]).
//! Sparse saves persist the column, since their neighbors are missing.
//!
//! # Diffs
//!
//! [`save_delta_size_info`] composes two sparse saves (only the changed
//! symbols, expanded to full alias groups) behind a small envelope recording
//! the byte length of the "before" half. The two sides are independent and
//! are serialized on separate threads; [`load_delta_size_info`] splits the
//! envelope and loads each half as an ordinary size file.
//!
//! # Errors
//!
//! Every load is all-or-nothing. A version mismatch, malformed token, count
//! inconsistency, out-of-range table index, or violated ordering invariant
//! aborts with a [`SizeFileError`] and no partial result; nothing is ever
//! clamped or guessed.

#![warn(missing_docs)]

mod delta;
mod diff;
mod error;
mod header;
mod padding;
mod reader;
mod writer;

pub use delta::{decode_deltas, encode_deltas};
pub use diff::{load_delta_size_info, save_delta_size_info};
pub use error::{SizeFileError, SizeFileErrorKind};
pub use header::SIZE_FILE_VERSION;
pub use padding::{calculate_padding, derive_section_padding};
pub use reader::{load_size_file, load_size_info};
pub use writer::{save_size_file, save_size_info, SaveOptions};
