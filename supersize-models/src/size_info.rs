//! The serializable unit: sections, symbols, and build metadata.

use std::collections::{BTreeMap, HashMap};

use crate::{AliasGroupId, Symbol};

/// A complete binary-size analysis result.
///
/// `raw_symbols` is expected to be ordered by [`sort_symbols`] before being
/// handed to the serializer; padding derivation and address-delta
/// compression both depend on per-section address monotonicity.
///
/// Equality treats [`AliasGroupId`]s as labels: two `SizeInfo`s compare
/// equal when their alias groups partition the symbols identically, even if
/// the id values differ. Ids are not persisted, so a reloaded `SizeInfo`
/// carries freshly numbered groups.
#[derive(Clone, Debug, Default)]
pub struct SizeInfo {
    /// Total byte size per section, as reported by the linker.
    pub section_sizes: BTreeMap<String, i64>,
    /// All symbols, ordered by [`sort_symbols`].
    pub raw_symbols: Vec<Symbol>,
    /// Free-form build metadata (tool versions, git revision, ...). Passed
    /// through serialization unchanged.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl PartialEq for SizeInfo {
    fn eq(&self, other: &Self) -> bool {
        if self.section_sizes != other.section_sizes
            || self.metadata != other.metadata
            || self.raw_symbols.len() != other.raw_symbols.len()
        {
            return false;
        }

        // Alias-group ids must map one-to-one between the two sides, but
        // their values carry no meaning.
        let mut forward: HashMap<AliasGroupId, AliasGroupId> = HashMap::new();
        let mut reverse: HashMap<AliasGroupId, AliasGroupId> = HashMap::new();
        self.raw_symbols
            .iter()
            .zip(&other.raw_symbols)
            .all(|(a, b)| {
                let groups_match = match (a.alias_group, b.alias_group) {
                    (None, None) => true,
                    (Some(x), Some(y)) => {
                        *forward.entry(x).or_insert(y) == y && *reverse.entry(y).or_insert(x) == x
                    }
                    _ => false,
                };
                groups_match
                    && a.section_name == b.section_name
                    && a.full_name == b.full_name
                    && a.address == b.address
                    && a.size == b.size
                    && a.padding == b.padding
                    && a.object_path == b.object_path
                    && a.source_path == b.source_path
                    && a.component == b.component
                    && a.flags == b.flags
            })
    }
}

/// Stable sort for symbol lists: `(is_pak, is_bss, section_name, address)`.
///
/// Pak entries sort after native sections and `.bss` after the rest of the
/// native ones, so that the sections whose symbols carry real addresses come
/// first. The sort is stable, which keeps alias-group members in their
/// original relative order (they compare equal on every key).
///
/// Alias-group ids are canonicalized as part of the sort: groups are
/// renumbered 0, 1, 2, ... in order of first appearance, and a "group" with
/// a single member loses its id entirely (one symbol is not an alias of
/// anything).
pub fn sort_symbols(symbols: &mut [Symbol]) {
    symbols.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let mut member_counts: HashMap<AliasGroupId, u32> = HashMap::new();
    for symbol in symbols.iter() {
        if let Some(id) = symbol.alias_group {
            *member_counts.entry(id).or_insert(0) += 1;
        }
    }

    let mut renumbered: HashMap<AliasGroupId, AliasGroupId> = HashMap::new();
    let mut next_id = 0u32;
    for symbol in symbols.iter_mut() {
        let Some(id) = symbol.alias_group else {
            continue;
        };
        if member_counts[&id] < 2 {
            symbol.alias_group = None;
            continue;
        }
        let canonical = *renumbered.entry(id).or_insert_with(|| {
            let assigned = AliasGroupId(next_id);
            next_id += 1;
            assigned
        });
        symbol.alias_group = Some(canonical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(section: &str, address: i64) -> Symbol {
        Symbol {
            section_name: section.to_string(),
            full_name: format!("{section}@{address}"),
            address,
            size: 0,
            padding: 0,
            object_path: String::new(),
            source_path: String::new(),
            component: String::new(),
            flags: 0,
            alias_group: None,
        }
    }

    #[test]
    fn pak_and_bss_sort_last() {
        let mut symbols = vec![
            sym(".pak.translated", 1),
            sym(".bss", 20),
            sym(".text", 200),
            sym(".rodata", 10),
            sym(".text", 100),
        ];
        sort_symbols(&mut symbols);

        let order: Vec<_> = symbols
            .iter()
            .map(|s| (s.section_name.as_str(), s.address))
            .collect();
        assert_eq!(
            order,
            vec![
                (".rodata", 10),
                (".text", 100),
                (".text", 200),
                (".bss", 20),
                (".pak.translated", 1),
            ]
        );
    }

    #[test]
    fn sort_canonicalizes_alias_ids() {
        let mut symbols = vec![
            sym(".text", 100),
            sym(".text", 100),
            sym(".text", 200),
            sym(".text", 200),
            sym(".text", 300),
        ];
        symbols[0].alias_group = Some(AliasGroupId(7));
        symbols[1].alias_group = Some(AliasGroupId(7));
        symbols[2].alias_group = Some(AliasGroupId(3));
        symbols[3].alias_group = Some(AliasGroupId(3));
        symbols[4].alias_group = Some(AliasGroupId(9));

        sort_symbols(&mut symbols);

        let ids: Vec<_> = symbols.iter().map(|s| s.alias_group).collect();
        assert_eq!(
            ids,
            vec![
                Some(AliasGroupId(0)),
                Some(AliasGroupId(0)),
                Some(AliasGroupId(1)),
                Some(AliasGroupId(1)),
                None,
            ]
        );
    }

    #[test]
    fn equality_ignores_alias_id_labels() {
        let mut left = vec![sym(".text", 100), sym(".text", 100)];
        left[0].alias_group = Some(AliasGroupId(7));
        left[1].alias_group = Some(AliasGroupId(7));
        let mut right = left.clone();
        right[0].alias_group = Some(AliasGroupId(0));
        right[1].alias_group = Some(AliasGroupId(0));

        let a = SizeInfo {
            raw_symbols: left,
            ..Default::default()
        };
        let b = SizeInfo {
            raw_symbols: right,
            ..Default::default()
        };
        assert_eq!(a, b);

        // Splitting one group into two is a structural difference.
        let mut split = b.clone();
        split.raw_symbols[1].alias_group = Some(AliasGroupId(1));
        assert_ne!(a, split);
    }
}
