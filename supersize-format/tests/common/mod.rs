//! Fixture builders shared by the integration tests.

use std::collections::BTreeMap;

use supersize_models::{sort_symbols, AliasGroupId, SizeInfo, Symbol, FLAG_STARTUP};

pub fn symbol(section: &str, name: &str, address: i64, size: i64) -> Symbol {
    Symbol {
        section_name: section.to_string(),
        full_name: name.to_string(),
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

/// Wraps sorted symbols in a `SizeInfo` with summary sections and metadata.
pub fn size_info(mut symbols: Vec<Symbol>) -> SizeInfo {
    sort_symbols(&mut symbols);
    let mut section_sizes = BTreeMap::new();
    for s in &symbols {
        *section_sizes.entry(s.section_name.clone()).or_insert(0) += s.size;
    }
    let mut metadata = serde_json::Map::new();
    metadata.insert("git_revision".to_string(), "1b8a32dd".into());
    metadata.insert("tool_version".to_string(), 3.into());
    SizeInfo {
        section_sizes,
        raw_symbols: symbols,
        metadata,
    }
}

/// A representative fixture: several sections, an alias trio, flags,
/// components, and a pak entry.
///
/// Padding values are consistent with what re-derivation computes from the
/// addresses, so the fixture round-trips whether or not the padding column
/// is persisted.
pub fn full_fixture() -> SizeInfo {
    let mut symbols = Vec::new();

    let mut s = symbol(".text", "main", 100, 50);
    s.object_path = "obj/main.o".to_string();
    s.source_path = "src/main.cc".to_string();
    s.component = "Internals>Core".to_string();
    symbols.push(s);

    // Starts 10 bytes past the previous symbol's content end.
    let mut s = symbol(".text", "HandleInput", 160, 40);
    s.padding = 10;
    s.object_path = "obj/input.o".to_string();
    s.source_path = "src/input.cc".to_string();
    s.component = "UI".to_string();
    s.flags = FLAG_STARTUP;
    symbols.push(s);

    for name in ["StrA", "StrB", "StrC"] {
        let mut s = symbol(".text", name, 200, 26);
        s.padding = 10;
        s.alias_group = Some(AliasGroupId(0));
        s.object_path = "obj/strings.o".to_string();
        s.source_path = "src/strings.cc".to_string();
        s.component = "Internals>Core".to_string();
        symbols.push(s);
    }

    let mut s = symbol(".rodata", "kTable", 300, 20);
    s.object_path = "obj/main.o".to_string();
    s.source_path = "src/main.cc".to_string();
    s.component = "Internals>Core".to_string();
    symbols.push(s);

    symbols.push(symbol(".bss", "g_buffer", 4000, 128));
    symbols.push(symbol(".pak.translated", "IDS_HELLO", 10, 25));

    size_info(symbols)
}
