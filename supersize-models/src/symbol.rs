//! The per-symbol record and its classification helpers.

/// Symbol is in an anonymous namespace.
pub const FLAG_ANONYMOUS: u32 = 1;
/// Symbol is used during startup.
pub const FLAG_STARTUP: u32 = 2;
/// Symbol lives in an `.unlikely` (cold) partition.
pub const FLAG_UNLIKELY: u32 = 4;
/// Symbol requires a dynamic relocation.
pub const FLAG_REL: u32 = 8;
/// Symbol requires a local dynamic relocation.
pub const FLAG_REL_LOCAL: u32 = 16;
/// Symbol originates from a generated source file.
pub const FLAG_GENERATED_SOURCE: u32 = 32;
/// Symbol is a compiler-generated clone (e.g. `.constprop` variants).
pub const FLAG_CLONE: u32 = 64;
/// Symbol is placed in a hot partition by profile feedback.
pub const FLAG_HOT: u32 = 128;
/// Symbol carries coverage instrumentation.
pub const FLAG_COVERAGE: u32 = 256;

/// Name prefix of synthetic symbols that account for per-section overhead.
///
/// Overhead symbols are serialized with their full size rather than a
/// padding-adjusted one, and padding derivation skips over them.
const OVERHEAD_PREFIX: &str = "Overhead: ";

/// Identifies one alias group: a set of symbols sharing a single address.
///
/// Group membership is decided once when the symbol list is built; two
/// symbols belong to the same group iff they carry the same id. Singletons
/// carry no id at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AliasGroupId(pub u32);

/// One symbol extracted from a binary (or a synthetic accounting entry).
///
/// `size` is the total attributed byte count *including* `padding`; the
/// content-only portion is available via [`size_without_padding`].
///
/// [`size_without_padding`]: Symbol::size_without_padding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Section the symbol lives in, e.g. `.text` or `.pak.translated`.
    pub section_name: String,
    /// Full (unmangled) symbol name. Repeats across members of an alias
    /// group.
    pub full_name: String,
    /// Address within the binary. Synthetic symbols use 0.
    pub address: i64,
    /// Total attributed bytes, inclusive of `padding`.
    pub size: i64,
    /// Bytes of `size` attributable to alignment gaps. 0 when not tracked.
    pub padding: i64,
    /// Path of the object file the symbol came from. Empty when unknown.
    pub object_path: String,
    /// Path of the source file the symbol came from. Empty when unknown.
    pub source_path: String,
    /// Ownership component tag. Empty when unknown.
    pub component: String,
    /// Bitmask of `FLAG_*` values. 0 means no flags.
    pub flags: u32,
    /// Alias group this symbol belongs to, if any.
    pub alias_group: Option<AliasGroupId>,
}

impl Symbol {
    /// The symbol's size excluding alignment padding.
    pub fn size_without_padding(&self) -> i64 {
        self.size - self.padding
    }

    /// One past the last content byte of the symbol.
    pub fn end_address(&self) -> i64 {
        self.address + self.size_without_padding()
    }

    /// Whether this symbol lives in a pak (resource) section.
    pub fn is_pak(&self) -> bool {
        self.section_name.starts_with(".pak")
    }

    /// Whether this symbol lives in `.bss`.
    pub fn is_bss(&self) -> bool {
        self.section_name == ".bss"
    }

    /// Whether this symbol is a real, addressed native-code symbol.
    ///
    /// Pak, dex, and arsc entries are bookkeeping records whose "addresses"
    /// are ids; neighbor-gap padding derivation must not look at them.
    pub fn is_native(&self) -> bool {
        !self.is_pak() && !self.section_name.starts_with(".dex") && self.section_name != ".arsc"
    }

    /// Whether this is a synthetic overhead symbol.
    pub fn is_overhead(&self) -> bool {
        self.full_name.starts_with(OVERHEAD_PREFIX)
    }

    /// Key of the canonical symbol ordering used by [`sort_symbols`].
    ///
    /// Alias-group members compare equal under this key; a stable sort
    /// keeps them contiguous and in their original relative order.
    ///
    /// [`sort_symbols`]: crate::sort_symbols
    pub fn sort_key(&self) -> (bool, bool, &str, i64) {
        (
            self.is_pak(),
            self.is_bss(),
            self.section_name.as_str(),
            self.address,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(section: &str, name: &str) -> Symbol {
        Symbol {
            section_name: section.to_string(),
            full_name: name.to_string(),
            address: 0,
            size: 24,
            padding: 8,
            object_path: String::new(),
            source_path: String::new(),
            component: String::new(),
            flags: 0,
            alias_group: None,
        }
    }

    #[test]
    fn section_classification() {
        assert!(sym(".pak.translated", "IDS_X").is_pak());
        assert!(!sym(".pak.translated", "IDS_X").is_native());
        assert!(sym(".bss", "buf").is_bss());
        assert!(sym(".bss", "buf").is_native());
        assert!(sym(".text", "main").is_native());
        assert!(!sym(".dex.method", "Foo#bar").is_native());
        assert!(!sym(".arsc", "res").is_native());
    }

    #[test]
    fn overhead_is_detected_by_name() {
        assert!(sym(".other", "Overhead: ELF file").is_overhead());
        assert!(!sym(".text", "NotOverhead").is_overhead());
    }

    #[test]
    fn padding_is_excluded_from_content_size() {
        let mut s = sym(".text", "main");
        s.address = 100;
        assert_eq!(s.size_without_padding(), 16);
        assert_eq!(s.end_address(), 116);
    }
}
