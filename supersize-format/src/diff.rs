//! The `.sizediff` envelope: two sparse size files behind a small header.
//!
//! A diff artifact carries only the symbols that changed between two full
//! symbol sets. Each side is an ordinary, self-contained gzip-wrapped size
//! file saved with its padding column persisted (padding cannot be
//! re-derived from a sparse, non-contiguous subset). The envelope records
//! where the "before" bytes end; the "after" bytes run to end-of-stream.

use std::io::Write;

use serde::{Deserialize, Serialize};
use supersize_models::SizeInfo;

use crate::header::CREATED_BY_LINE;
use crate::reader::{load_size_file, parse_count, Cursor};
use crate::writer::{save_size_file, SaveOptions};
use crate::{SizeFileError, SizeFileErrorKind};

/// Second line of every diff file.
const DIFF_MAGIC: &str = "DIFF";

/// Version of the envelope itself, independent of the embedded size files.
const DIFF_VERSION: u32 = 1;

/// Keep fields alphabetical; serialized key order follows declaration order.
#[derive(Debug, Serialize, Deserialize)]
struct DiffHeader {
    before_length: usize,
    version: u32,
}

/// Writes a diff artifact from two sparse symbol selections.
///
/// `before_sparse` / `after_sparse` index into the respective `raw_symbols`
/// and should already exclude unchanged symbols. The two sides have no data
/// dependency, so they are serialized on separate threads; the envelope
/// header needs the finished "before" byte count and is written after both
/// complete.
pub fn save_delta_size_info<W: Write>(
    before: &SizeInfo,
    after: &SizeInfo,
    before_sparse: &[usize],
    after_sparse: &[usize],
    mut writer: W,
) -> Result<(), SizeFileError> {
    let (before_result, after_result) = std::thread::scope(|scope| {
        let after_handle = scope.spawn(|| save_half(after, after_sparse));
        let before_result = save_half(before, before_sparse);
        let after_result = match after_handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (before_result, after_result)
    });
    let before_bytes = before_result?;
    let after_bytes = after_result?;

    writeln!(writer, "{CREATED_BY_LINE}")?;
    writeln!(writer, "{DIFF_MAGIC}")?;
    let header = DiffHeader {
        before_length: before_bytes.len(),
        version: DIFF_VERSION,
    };
    let json = serde_json::to_string(&header)?;
    writeln!(writer, "{}", json.len())?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.write_all(&before_bytes)?;
    writer.write_all(&after_bytes)?;

    tracing::debug!(
        before_bytes = before_bytes.len(),
        after_bytes = after_bytes.len(),
        "saved size info diff"
    );
    Ok(())
}

/// Reads a diff artifact back into its `(before, after)` sparse halves.
pub fn load_delta_size_info(data: &[u8]) -> Result<(SizeInfo, SizeInfo), SizeFileError> {
    let mut cursor = Cursor { data };
    cursor.read_line()?;
    if cursor.read_line()? != DIFF_MAGIC {
        return Err(SizeFileErrorKind::BadHeader.into());
    }
    let json_len = parse_count(cursor.read_line()?)?;
    let json = cursor.read_exact(json_len)?;
    let header: DiffHeader = serde_json::from_slice(json)?;
    if header.version != DIFF_VERSION {
        return Err(SizeFileErrorKind::UnsupportedVersion.into());
    }
    if !cursor.read_line()?.is_empty() {
        return Err(SizeFileErrorKind::BadHeader.into());
    }

    let before_bytes = cursor.read_exact(header.before_length)?;
    let after_bytes = cursor.data;
    let before = load_size_file(before_bytes)?;
    let after = load_size_file(after_bytes)?;
    Ok((before, after))
}

fn save_half(size_info: &SizeInfo, sparse: &[usize]) -> Result<Vec<u8>, SizeFileError> {
    let mut buffer = Vec::new();
    let options = SaveOptions::sparse(sparse.to_vec());
    save_size_file(size_info, &options, &mut buffer)?;
    Ok(buffer)
}
