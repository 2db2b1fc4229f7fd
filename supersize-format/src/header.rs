//! The fixed 4-line preamble shared by the writer and the reader.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// First line of every size file. Ignored on load.
pub(crate) const CREATED_BY_LINE: &str = "# Created by //tools/binary_size";

/// The format version string. Any mismatch on load is fatal; there is no
/// upgrade path.
pub const SIZE_FILE_VERSION: &str = "Size File Format v1.1";

/// The JSON blob on line 3 of the preamble, prefixed by its own byte length.
///
/// Field order is the serialized key order; keep it alphabetical so that
/// saves are byte-identical across runs.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HeaderFields {
    pub has_components: bool,
    pub has_padding: bool,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub section_sizes: BTreeMap<String, i64>,
}
