//! In-memory model for binary-size analysis results.
//!
//! A [`SizeInfo`] bundles a section-size summary, an ordered list of
//! [`Symbol`]s, and free-form build metadata. Symbols that share one address
//! form an *alias group*, identified by an [`AliasGroupId`] carried on every
//! member. The serialization crate reads these types but never mutates them;
//! construction and normalization belong to the surrounding analysis
//! pipeline.
//!
//! The only operation the model itself defines is [`sort_symbols`], the
//! stable ordering every consumer of a symbol list relies on: pak symbols
//! last, `.bss` after regular native sections, then section name, then
//! address. Address-delta compression and padding derivation both assume
//! this ordering.

#![warn(missing_docs)]

mod size_info;
mod symbol;

pub use size_info::{sort_symbols, SizeInfo};
pub use symbol::{AliasGroupId, Symbol};
pub use symbol::{
    FLAG_ANONYMOUS, FLAG_CLONE, FLAG_COVERAGE, FLAG_GENERATED_SOURCE, FLAG_HOT, FLAG_REL,
    FLAG_REL_LOCAL, FLAG_STARTUP, FLAG_UNLIKELY,
};
