//! Serialization of a [`SizeInfo`] into the size file layout.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use indexmap::{IndexMap, IndexSet};
use supersize_models::{AliasGroupId, SizeInfo, Symbol};

use crate::delta::encode_deltas;
use crate::header::{HeaderFields, CREATED_BY_LINE, SIZE_FILE_VERSION};
use crate::{SizeFileError, SizeFileErrorKind};

/// Options for [`save_size_info`] and [`save_size_file`].
#[derive(Clone, Debug, Default)]
pub struct SaveOptions {
    /// Persist the padding column instead of leaving it to be re-derived on
    /// load. Required for sparse saves, whose non-contiguous symbols make
    /// re-derivation unreliable.
    pub include_padding: bool,
    /// Serialize only these indices into `raw_symbols` (expanded to full
    /// alias groups) instead of the entire list.
    pub sparse_symbols: Option<Vec<usize>>,
}

impl SaveOptions {
    /// Options for a sparse save: the given symbols plus their alias
    /// closures, with the padding column persisted.
    pub fn sparse(symbol_indices: Vec<usize>) -> Self {
        Self {
            include_padding: true,
            sparse_symbols: Some(symbol_indices),
        }
    }
}

/// Writes `size_info` in the uncompressed logical layout.
///
/// The output is deterministic: saving the same `SizeInfo` twice produces
/// byte-identical streams.
pub fn save_size_info<W: Write>(
    size_info: &SizeInfo,
    options: &SaveOptions,
    mut writer: W,
) -> Result<(), SizeFileError> {
    let symbols = select_symbols(size_info, options.sparse_symbols.as_deref())?;
    let has_components = symbols.iter().any(|s| !s.component.is_empty());
    let has_padding = options.include_padding;

    // Preamble: comment, version, length-prefixed JSON, blank separator.
    writeln!(writer, "{CREATED_BY_LINE}")?;
    writeln!(writer, "{SIZE_FILE_VERSION}")?;
    let fields = HeaderFields {
        has_components,
        has_padding,
        metadata: size_info.metadata.clone(),
        section_sizes: size_info.section_sizes.clone(),
    };
    let json = serde_json::to_string(&fields)?;
    writeln!(writer, "{}", json.len())?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;

    // Path table: sorted unique (object_path, source_path) pairs.
    let mut path_table: IndexSet<(&str, &str)> = symbols
        .iter()
        .map(|s| (s.object_path.as_str(), s.source_path.as_str()))
        .collect();
    path_table.sort_unstable();
    let path_index: HashMap<(&str, &str), i64> = path_table
        .iter()
        .enumerate()
        .map(|(i, &pair)| (pair, i as i64))
        .collect();
    writeln!(writer, "{}", path_table.len())?;
    for (object_path, source_path) in &path_table {
        writeln!(writer, "{object_path}\t{source_path}")?;
    }

    // Component table, only when any symbol carries one.
    let mut component_index = HashMap::new();
    if has_components {
        let mut component_table: IndexSet<&str> =
            symbols.iter().map(|s| s.component.as_str()).collect();
        component_table.sort_unstable();
        component_index = component_table
            .iter()
            .enumerate()
            .map(|(i, &component)| (component, i as i64))
            .collect();
        writeln!(writer, "{}", component_table.len())?;
        for component in &component_table {
            writeln!(writer, "{component}")?;
        }
    }

    // Section names and per-section symbol counts. These two lines govern
    // the shape of every block that follows.
    let mut sections: IndexMap<&str, Vec<&Symbol>> = IndexMap::new();
    for &symbol in &symbols {
        sections
            .entry(symbol.section_name.as_str())
            .or_default()
            .push(symbol);
    }
    let names: Vec<&str> = sections.keys().copied().collect();
    writeln!(writer, "{}", names.join("\t"))?;
    let counts: Vec<String> = sections.values().map(|g| g.len().to_string()).collect();
    writeln!(writer, "{}", counts.join("\t"))?;

    // Numeric columns, one line per section each. Address and table-index
    // columns are delta-encoded; sizes and padding are verbatim.
    write_number_block(&mut writer, &sections, true, |s| s.address)?;
    write_number_block(&mut writer, &sections, false, |s| {
        if s.is_overhead() {
            s.size
        } else {
            s.size_without_padding()
        }
    })?;
    if has_padding {
        write_number_block(&mut writer, &sections, false, |s| s.padding)?;
    }
    write_number_block(&mut writer, &sections, true, |s| {
        path_index[&(s.object_path.as_str(), s.source_path.as_str())]
    })?;
    if has_components {
        write_number_block(&mut writer, &sections, true, |s| {
            component_index[s.component.as_str()]
        })?;
    }

    // Name/alias/flags lines, one per symbol. The alias-count token is
    // emitted on the first member of each group of two or more, and is
    // distinguished from a flags token by its leading '0'.
    let mut group_counts: HashMap<AliasGroupId, u32> = HashMap::new();
    for symbol in &symbols {
        if let Some(id) = symbol.alias_group {
            *group_counts.entry(id).or_insert(0) += 1;
        }
    }
    for group in sections.values() {
        let mut prev_group = None;
        for symbol in group {
            writer.write_all(symbol.full_name.as_bytes())?;
            if let Some(id) = symbol.alias_group {
                if prev_group != Some(id) {
                    let num_aliases = group_counts[&id];
                    if num_aliases > 1 {
                        write!(writer, "\t0{num_aliases:x}")?;
                    }
                }
            }
            if symbol.flags != 0 {
                write!(writer, "\t{:x}", symbol.flags)?;
            }
            writer.write_all(b"\n")?;
            prev_group = symbol.alias_group;
        }
    }

    tracing::debug!(
        symbols = symbols.len(),
        sections = sections.len(),
        paths = path_table.len(),
        has_components,
        has_padding,
        "saved size info"
    );
    Ok(())
}

/// Writes `size_info` as a gzip-wrapped size file, the on-disk `.size`
/// artifact.
pub fn save_size_file<W: Write>(
    size_info: &SizeInfo,
    options: &SaveOptions,
    writer: W,
) -> Result<(), SizeFileError> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    save_size_info(size_info, options, &mut encoder)?;
    encoder
        .try_finish()
        .map_err(|e| SizeFileError::new(SizeFileErrorKind::BadCompression, e))?;
    Ok(())
}

/// Resolves the symbol set to serialize and puts it in stable sorted order.
///
/// A sparse selection is first expanded to its alias closure: naming any
/// member of a group pulls in the entire group, so that alias counts in the
/// output stay consistent.
fn select_symbols<'a>(
    size_info: &'a SizeInfo,
    sparse: Option<&[usize]>,
) -> Result<Vec<&'a Symbol>, SizeFileError> {
    let mut selected: Vec<&Symbol> = match sparse {
        None => size_info.raw_symbols.iter().collect(),
        Some(indices) => {
            let mut groups: HashMap<AliasGroupId, Vec<&Symbol>> = HashMap::new();
            for symbol in &size_info.raw_symbols {
                if let Some(id) = symbol.alias_group {
                    groups.entry(id).or_default().push(symbol);
                }
            }
            let mut seen_groups = HashSet::new();
            let mut selected = Vec::with_capacity(indices.len());
            for &index in indices {
                let symbol = size_info
                    .raw_symbols
                    .get(index)
                    .ok_or(SizeFileErrorKind::BadIndex(index as i64))?;
                match symbol.alias_group {
                    Some(id) => {
                        if seen_groups.insert(id) {
                            selected.extend(groups[&id].iter().copied());
                        }
                    }
                    None => selected.push(symbol),
                }
            }
            selected
        }
    };
    selected.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    Ok(selected)
}

fn write_number_block<W: Write>(
    writer: &mut W,
    sections: &IndexMap<&str, Vec<&Symbol>>,
    delta: bool,
    value: impl Fn(&Symbol) -> i64,
) -> Result<(), SizeFileError> {
    for group in sections.values() {
        let values: Vec<i64> = group.iter().map(|&s| value(s)).collect();
        let values = if delta { encode_deltas(&values) } else { values };
        let tokens: Vec<String> = values.iter().map(i64::to_string).collect();
        writeln!(writer, "{}", tokens.join(" "))?;
    }
    Ok(())
}
