//! Re-derivation of alignment padding from neighboring addresses.
//!
//! Full-format files normally omit the padding column: for a contiguous
//! symbol list the gap between one symbol's content end and the next
//! symbol's start *is* the padding, so it can be recomputed on load. Sparse
//! saves cannot rely on this (their neighbors are missing) and persist the
//! column instead.

use supersize_models::Symbol;

use crate::{SizeFileError, SizeFileErrorKind};

/// Derives `(size, padding)` for every symbol of one section.
///
/// `symbols` must belong to a single section and be sorted by address, with
/// alias-group members contiguous. The input is not mutated; the returned
/// pairs are the values the symbols would carry after folding each
/// inter-symbol gap into the later symbol.
///
/// Pairs where either symbol has a non-positive address or is not a native
/// symbol are left untouched. An exact address collision inside one alias
/// group copies the representative's values; a collision between unrelated
/// symbols is only well-formed when the earlier symbol has zero content
/// size, and fails with [`SizeFileErrorKind::SymbolOverlap`] otherwise.
pub fn derive_section_padding(symbols: &[Symbol]) -> Result<Vec<(i64, i64)>, SizeFileError> {
    let mut out: Vec<(i64, i64)> = symbols.iter().map(|s| (s.size, s.padding)).collect();

    for i in 1..symbols.len() {
        let prev = &symbols[i - 1];
        let cur = &symbols[i];
        if cur.address <= 0 || prev.address <= 0 || !cur.is_native() || !prev.is_native() {
            continue;
        }

        let (prev_size, prev_padding) = out[i - 1];
        let prev_content = prev_size
            .checked_sub(prev_padding)
            .ok_or(SizeFileErrorKind::BadNumber)?;
        if cur.address == prev.address {
            if cur.alias_group.is_some() && cur.alias_group == prev.alias_group {
                out[i] = (prev_size, prev_padding);
                continue;
            }
            // Padding-only symbols (e.g. symbol-gap entries) legitimately
            // collide with their successor.
            if prev_content != 0 {
                return Err(SizeFileErrorKind::SymbolOverlap(cur.address).into());
            }
        }

        // Sizes and addresses come from untrusted files; the gap arithmetic
        // is checked rather than allowed to wrap.
        let gap = prev
            .address
            .checked_add(prev_content)
            .and_then(|prev_end| cur.address.checked_sub(prev_end))
            .ok_or(SizeFileErrorKind::BadNumber)?;
        let (size, padding) = &mut out[i];
        *padding = gap;
        *size = size
            .checked_add(gap)
            .ok_or(SizeFileErrorKind::BadNumber)?;
        if *size < 0 {
            return Err(SizeFileErrorKind::NegativeSize(cur.address).into());
        }
    }

    Ok(out)
}

/// Applies [`derive_section_padding`] across a full sorted symbol list.
///
/// Symbols must be partitioned by section; a section name reappearing after
/// an intervening one fails with [`SizeFileErrorKind::UnsortedSymbols`].
pub fn calculate_padding(symbols: &mut [Symbol]) -> Result<(), SizeFileError> {
    let mut seen_sections: Vec<String> = Vec::new();
    let mut start = 0;
    while start < symbols.len() {
        let section = symbols[start].section_name.clone();
        if seen_sections.contains(&section) {
            return Err(SizeFileErrorKind::UnsortedSymbols.into());
        }
        let end = start
            + symbols[start..]
                .iter()
                .take_while(|s| s.section_name == section)
                .count();

        let derived = derive_section_padding(&symbols[start..end])?;
        for (symbol, (size, padding)) in symbols[start..end].iter_mut().zip(derived) {
            symbol.size = size;
            symbol.padding = padding;
        }

        seen_sections.push(section);
        start = end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use supersize_models::AliasGroupId;

    use super::*;

    fn sym(address: i64, size: i64) -> Symbol {
        Symbol {
            section_name: ".text".to_string(),
            full_name: format!("sym_{address}"),
            address,
            size,
            padding: 0,
            object_path: String::new(),
            source_path: String::new(),
            component: String::new(),
            flags: 0,
            alias_group: None,
        }
    }

    #[test]
    fn contiguous_symbols_have_zero_padding() {
        let symbols = vec![sym(100, 50), sym(150, 0)];
        let derived = derive_section_padding(&symbols).unwrap();
        assert_eq!(derived, vec![(50, 0), (0, 0)]);
    }

    #[test]
    fn gap_folds_into_later_symbol() {
        let symbols = vec![sym(100, 40), sym(160, 8)];
        let derived = derive_section_padding(&symbols).unwrap();
        assert_eq!(derived, vec![(40, 0), (28, 20)]);
    }

    #[test]
    fn aliases_copy_representative_values() {
        let mut first = sym(200, 10);
        let mut second = sym(200, 10);
        second.full_name = "alias".to_string();
        first.alias_group = Some(AliasGroupId(0));
        second.alias_group = Some(AliasGroupId(0));

        let derived = derive_section_padding(&[first, second]).unwrap();
        assert_eq!(derived, vec![(10, 0), (10, 0)]);
    }

    #[test]
    fn unrelated_collision_with_content_is_an_error() {
        let symbols = vec![sym(200, 10), sym(200, 4)];
        let err = derive_section_padding(&symbols).unwrap_err();
        assert_eq!(err.kind(), SizeFileErrorKind::SymbolOverlap(200));
    }

    #[test]
    fn zero_sized_predecessor_collision_is_tolerated() {
        let symbols = vec![sym(200, 0), sym(200, 4)];
        let derived = derive_section_padding(&symbols).unwrap();
        assert_eq!(derived, vec![(0, 0), (4, 0)]);
    }

    #[test]
    fn overlapping_addresses_fail_on_negative_size() {
        let symbols = vec![sym(100, 50), sym(120, 4)];
        let err = derive_section_padding(&symbols).unwrap_err();
        assert_eq!(err.kind(), SizeFileErrorKind::NegativeSize(120));
    }

    #[test]
    fn address_overflow_is_rejected() {
        let symbols = vec![sym(1, i64::MAX), sym(5, 4)];
        let err = derive_section_padding(&symbols).unwrap_err();
        assert_eq!(err.kind(), SizeFileErrorKind::BadNumber);
    }

    #[test]
    fn repeated_section_is_rejected() {
        let mut symbols = vec![sym(100, 4), sym(104, 4), sym(200, 4)];
        symbols[1].section_name = ".rodata".to_string();
        let err = calculate_padding(&mut symbols).unwrap_err();
        assert_eq!(err.kind(), SizeFileErrorKind::UnsortedSymbols);
    }
}
