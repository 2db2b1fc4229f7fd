//! Deserialization of the size file layout back into a [`SizeInfo`].
//!
//! The load is a single top-to-bottom pass and is all-or-nothing: any
//! version mismatch, malformed token, or count inconsistency aborts with an
//! error and no partial result.

use std::io::Read;

use flate2::read::GzDecoder;
use supersize_models::{AliasGroupId, SizeInfo, Symbol};

use crate::delta::decode_deltas;
use crate::header::{HeaderFields, SIZE_FILE_VERSION};
use crate::padding::calculate_padding;
use crate::{SizeFileError, SizeFileErrorKind};

/// Reads a `SizeInfo` from the uncompressed logical layout.
pub fn load_size_info(data: &[u8]) -> Result<SizeInfo, SizeFileError> {
    let mut cursor = Cursor { data };

    // Preamble. The comment line carries no information; the version line
    // must match exactly before anything else is interpreted.
    cursor.read_line()?;
    let version = cursor.read_line()?;
    if version != SIZE_FILE_VERSION {
        return Err(SizeFileErrorKind::UnsupportedVersion.into());
    }
    let json_len = parse_count(cursor.read_line()?)?;
    let json = cursor.read_exact(json_len)?;
    let fields: HeaderFields = serde_json::from_slice(json)?;
    if !cursor.read_line()?.is_empty() {
        return Err(SizeFileErrorKind::BadHeader.into());
    }

    // Path table, indexed by position.
    let path_count = parse_count(cursor.read_line()?)?;
    let mut path_table = Vec::with_capacity(path_count);
    for _ in 0..path_count {
        let line = cursor.read_line()?;
        let pair = line
            .split_once('\t')
            .ok_or(SizeFileErrorKind::BadTableEntry)?;
        path_table.push(pair);
    }

    // Component table. An empty line is a valid empty-string entry.
    let mut component_table = Vec::new();
    if fields.has_components {
        let component_count = parse_count(cursor.read_line()?)?;
        for _ in 0..component_count {
            component_table.push(cursor.read_line()?);
        }
    }

    // Section names and counts govern the shape of every following block.
    let names_line = cursor.read_line()?;
    let section_names: Vec<&str> = if names_line.is_empty() {
        Vec::new()
    } else {
        names_line.split('\t').collect()
    };
    let counts_line = cursor.read_line()?;
    let counts: Vec<usize> = if counts_line.is_empty() {
        Vec::new()
    } else {
        counts_line
            .split('\t')
            .map(parse_count)
            .collect::<Result<_, _>>()?
    };
    if counts.len() != section_names.len() {
        return Err(SizeFileErrorKind::BadRowCount.into());
    }

    let addresses = read_number_block(&mut cursor, &counts, true)?;
    let sizes = read_number_block(&mut cursor, &counts, false)?;
    let paddings = if fields.has_padding {
        Some(read_number_block(&mut cursor, &counts, false)?)
    } else {
        None
    };
    let path_indices = read_number_block(&mut cursor, &counts, true)?;
    let component_indices = if fields.has_components {
        Some(read_number_block(&mut cursor, &counts, true)?)
    } else {
        None
    };

    // Name/alias/flags lines. Alias groups are reassembled by counting down
    // from each alias-count token; groups never span sections.
    let total: usize = counts.iter().sum();
    let mut raw_symbols = Vec::with_capacity(total);
    let mut next_group_id = 0u32;
    for (section_index, &section_name) in section_names.iter().enumerate() {
        let count = counts[section_index];
        let mut alias_countdown = 0usize;
        let mut current_group = None;
        for row in 0..count {
            let line = cursor.read_line()?;
            let (full_name, alias_count, flags) = parse_detail_line(line)?;

            if let Some(num_aliases) = alias_count {
                let num_aliases = num_aliases as usize;
                if alias_countdown > 0 || num_aliases < 2 || num_aliases > count - row {
                    return Err(SizeFileErrorKind::BadAliasCount.into());
                }
                current_group = Some(AliasGroupId(next_group_id));
                next_group_id += 1;
                alias_countdown = num_aliases;
            }
            let alias_group = if alias_countdown > 0 {
                alias_countdown -= 1;
                current_group
            } else {
                None
            };

            let address = addresses[section_index][row];
            let stored_size = sizes[section_index][row];
            let padding = match &paddings {
                Some(rows) => rows[section_index][row],
                None => 0,
            };
            let (object_path, source_path) =
                *lookup(&path_table, path_indices[section_index][row])?;
            let component = match &component_indices {
                Some(rows) => *lookup(&component_table, rows[section_index][row])?,
                None => "",
            };

            let mut symbol = Symbol {
                section_name: section_name.to_string(),
                full_name: full_name.to_string(),
                address,
                size: stored_size,
                padding,
                object_path: object_path.to_string(),
                source_path: source_path.to_string(),
                component: component.to_string(),
                flags,
                alias_group,
            };
            // Overhead symbols are stored with their full size; everything
            // else is stored content-only and gets its padding folded back.
            if !symbol.is_overhead() {
                symbol.size = symbol
                    .size
                    .checked_add(padding)
                    .ok_or(SizeFileErrorKind::BadNumber)?;
            }
            raw_symbols.push(symbol);
        }
        if alias_countdown > 0 {
            return Err(SizeFileErrorKind::BadAliasCount.into());
        }
    }

    if !cursor.data.is_empty() {
        return Err(SizeFileErrorKind::TrailingData.into());
    }

    if !fields.has_padding {
        calculate_padding(&mut raw_symbols)?;
    }

    tracing::debug!(
        symbols = raw_symbols.len(),
        sections = section_names.len(),
        paths = path_table.len(),
        "loaded size info"
    );
    Ok(SizeInfo {
        section_sizes: fields.section_sizes,
        raw_symbols,
        metadata: fields.metadata,
    })
}

/// Reads a gzip-wrapped `.size` file.
pub fn load_size_file(data: &[u8]) -> Result<SizeInfo, SizeFileError> {
    let mut decoder = GzDecoder::new(data);
    let mut buffer = Vec::new();
    decoder
        .read_to_end(&mut buffer)
        .map_err(|e| SizeFileError::new(SizeFileErrorKind::BadCompression, e))?;
    load_size_info(&buffer)
}

pub(crate) struct Cursor<'d> {
    pub(crate) data: &'d [u8],
}

impl<'d> Cursor<'d> {
    /// Consumes up to and including the next `\n`, returning the line
    /// without its terminator.
    pub(crate) fn read_line(&mut self) -> Result<&'d str, SizeFileError> {
        if self.data.is_empty() {
            return Err(SizeFileErrorKind::UnexpectedEof.into());
        }
        let (line, rest) = match self.data.iter().position(|&b| b == b'\n') {
            Some(pos) => (&self.data[..pos], &self.data[pos + 1..]),
            None => (self.data, &[][..]),
        };
        self.data = rest;
        std::str::from_utf8(line).map_err(|e| SizeFileError::new(SizeFileErrorKind::BadEncoding, e))
    }

    pub(crate) fn read_exact(&mut self, len: usize) -> Result<&'d [u8], SizeFileError> {
        if self.data.len() < len {
            return Err(SizeFileErrorKind::UnexpectedEof.into());
        }
        let (bytes, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(bytes)
    }
}

pub(crate) fn parse_count(token: &str) -> Result<usize, SizeFileError> {
    token
        .parse()
        .map_err(|e| SizeFileError::new(SizeFileErrorKind::BadNumber, e))
}

fn parse_int(token: &str) -> Result<i64, SizeFileError> {
    token
        .parse()
        .map_err(|e| SizeFileError::new(SizeFileErrorKind::BadNumber, e))
}

fn parse_hex(token: &str) -> Result<u32, SizeFileError> {
    u32::from_str_radix(token, 16).map_err(|e| SizeFileError::new(SizeFileErrorKind::BadNumber, e))
}

/// Splits one symbol line into name, optional alias count, and flags.
///
/// With two tokens the second is ambiguous; a leading '0' marks it as an
/// alias count. Flags are only written when nonzero, and nonzero hex never
/// starts with '0', so the convention cannot collide.
fn parse_detail_line(line: &str) -> Result<(&str, Option<u32>, u32), SizeFileError> {
    let mut parts = line.split('\t');
    let full_name = parts.next().unwrap_or("");
    let second = parts.next();
    let third = parts.next();
    if parts.next().is_some() {
        return Err(SizeFileErrorKind::BadRowCount.into());
    }

    match (second, third) {
        (None, _) => Ok((full_name, None, 0)),
        (Some(token), None) => {
            if token.starts_with('0') {
                Ok((full_name, Some(parse_hex(token)?), 0))
            } else {
                Ok((full_name, None, parse_hex(token)?))
            }
        }
        (Some(alias_token), Some(flags_token)) => {
            if !alias_token.starts_with('0') {
                return Err(SizeFileErrorKind::BadAliasCount.into());
            }
            Ok((
                full_name,
                Some(parse_hex(alias_token)?),
                parse_hex(flags_token)?,
            ))
        }
    }
}

/// Reads one line of space-separated integers per section, undoing the
/// delta encoding where it was applied.
fn read_number_block(
    cursor: &mut Cursor<'_>,
    counts: &[usize],
    delta: bool,
) -> Result<Vec<Vec<i64>>, SizeFileError> {
    let mut rows = Vec::with_capacity(counts.len());
    for &count in counts {
        let line = cursor.read_line()?;
        let values: Vec<i64> = if line.is_empty() {
            Vec::new()
        } else {
            line.split(' ').map(parse_int).collect::<Result<_, _>>()?
        };
        if values.len() != count {
            return Err(SizeFileErrorKind::BadRowCount.into());
        }
        rows.push(if delta { decode_deltas(&values)? } else { values });
    }
    Ok(rows)
}

fn lookup<'a, T>(table: &'a [T], index: i64) -> Result<&'a T, SizeFileError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .ok_or_else(|| SizeFileErrorKind::BadIndex(index).into())
}
