//! Write case folding tables as source code.
//!
//! The emitters preserve the order of the tables exactly: groups by ascending
//! leading byte, replacements within a group in ascending codepoint order, and
//! codepoint entries in ascending codepoint order. Nothing is deduplicated.

use alloc::string::String;
use alloc::vec::Vec;
use std::io::{self, Write};

use crate::build::CasefoldTables;
use crate::common::{Error, Result};

impl From<io::Error> for Error {
    fn from(_: io::Error) -> Self {
        Error::Io
    }
}

/// An output format for `emit`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Rust `static` slices.
    #[default]
    Rust,
    /// A C++ header defining `std::map`s in namespace `Utf8CppUtils`.
    Cpp,
}

impl Format {
    /// Look up a format by its name, `rust` or `cpp`.
    pub fn from_name(name: &str) -> Option<Format> {
        match name {
            "rust" | "rs" => Some(Format::Rust),
            "cpp" | "c++" | "hh" => Some(Format::Cpp),
            _ => None,
        }
    }
}

/// Write `tables` to `w` in the given format.
pub fn emit<W: Write>(w: &mut W, tables: &CasefoldTables, format: Format) -> Result<()> {
    match format {
        Format::Rust => emit_rust(w, tables),
        Format::Cpp => emit_cpp(w, tables),
    }
}

fn source_comment(tables: &CasefoldTables) -> String {
    match tables.unicode_version() {
        Some(version) => format!(
            "Generated from Unicode {} case folding for {}",
            version,
            tables.range()
        ),
        None => format!(
            "Generated from unversioned case folding data for {}",
            tables.range()
        ),
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    use core::fmt::Write as _;

    let mut s = String::with_capacity(bytes.len() * 4);
    for byte in bytes {
        // Writing to a `String` cannot fail.
        let _ = write!(s, "\\x{:02x}", byte);
    }
    s
}

fn codepoint_list(cps: &[u32]) -> String {
    cps.iter()
        .map(|cp| format!("{:#x}", cp))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write the tables as two Rust statics:
///
/// ```text
/// pub static CASE_FOLD_BYTES: &[(u8, &[(&[u8], &[u8])])]
/// pub static CASE_FOLD_CODEPOINTS: &[(u32, &[u32])]
/// ```
///
/// Both are sorted by key, so they can be searched with `binary_search_by`.
pub fn emit_rust<W: Write>(w: &mut W, tables: &CasefoldTables) -> Result<()> {
    writeln!(w, "// {}", source_comment(tables))?;
    writeln!(w)?;

    writeln!(
        w,
        "pub static CASE_FOLD_BYTES: &[(u8, &[(&[u8], &[u8])])] = &["
    )?;
    for (lead, group) in tables.bytes().groups() {
        writeln!(w, "    (0x{:02x}, &[", lead)?;
        for replacement in group {
            writeln!(
                w,
                "        (b\"{}\", b\"{}\"),",
                escape_bytes(replacement.original()),
                escape_bytes(replacement.folded())
            )?;
        }
        writeln!(w, "    ]),")?;
    }
    writeln!(w, "];")?;
    writeln!(w)?;

    writeln!(w, "pub static CASE_FOLD_CODEPOINTS: &[(u32, &[u32])] = &[")?;
    for (cp, folded) in tables.codepoints() {
        writeln!(w, "    ({:#x}, &[{}]),", cp, codepoint_list(folded))?;
    }
    writeln!(w, "];")?;
    Ok(())
}

/// Write the tables as a C++ header.
///
/// The layout is a `std::map` from leading byte to a vector of
/// `(original, folded)` string pairs named `_casefold_table`, and a `std::map`
/// from codepoint to folded codepoints named `_casefold_codepoint_table`.
pub fn emit_cpp<W: Write>(w: &mut W, tables: &CasefoldTables) -> Result<()> {
    writeln!(w, "// {}", source_comment(tables))?;
    write!(w, "#ifndef _UTF8_CPP_TABLE_HH\n#define _UTF8_CPP_TABLE_HH\n\n")?;
    write!(
        w,
        "#include <map>\n#include <vector>\n#include <string>\n#include <cstdint>\n\n"
    )?;
    write!(
        w,
        "typedef std::pair<std::string, std::string> replacement_t;\n\n"
    )?;
    write!(w, "namespace Utf8CppUtils {{\n\n")?;

    write!(
        w,
        "inline const std::map<uint8_t, std::vector<replacement_t>> _casefold_table = {{\n{{\n"
    )?;
    for (lead, group) in tables.bytes().groups() {
        writeln!(w, "    {{ 0x{:02x}, {{", lead)?;
        for replacement in group {
            writeln!(
                w,
                "        {{ \"{}\", \"{}\" }},",
                escape_bytes(replacement.original()),
                escape_bytes(replacement.folded())
            )?;
        }
        writeln!(w, "    }}}},")?;
    }
    write!(w, "}}}}; // END _casefold_table\n\n")?;

    writeln!(
        w,
        "inline const std::map<int32_t, std::vector<int32_t>> _casefold_codepoint_table = {{"
    )?;
    for (cp, folded) in tables.codepoints() {
        writeln!(w, "    {{ {:#x}, {{ {} }} }},", cp, codepoint_list(folded))?;
    }
    write!(w, "}}; // END _casefold_codepoint_table\n\n")?;

    write!(w, "}} // namespace Utf8CppUtils\n\n")?;
    writeln!(w, "#endif // _UTF8_CPP_TABLE_HH")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::CasefoldTableBuilder;
    use crate::common::{CodepointRange, UnicodeVersion};
    use crate::fold::CaseFold;

    struct SharpS;

    impl CaseFold for SharpS {
        fn fold(&self, cp: u32, folded: &mut Vec<u32>) {
            match cp {
                0xc0 => folded.push(0xe0),
                0xdf => folded.extend_from_slice(&[0x73, 0x73]),
                0x130 => folded.extend_from_slice(&[0x69, 0x307]),
                _ => folded.push(cp),
            }
        }

        fn unicode_version(&self) -> Option<UnicodeVersion> {
            Some(UnicodeVersion::new(15, 1, 0))
        }
    }

    fn tables() -> CasefoldTables {
        CasefoldTableBuilder::new(CodepointRange::new(0x80, 0x1ff).unwrap())
            .build(&SharpS)
            .unwrap()
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(&[]), "");
        assert_eq!(escape_bytes(&[0x00, 0x73, 0xc3, 0x9f]), "\\x00\\x73\\xc3\\x9f");
        assert_eq!(escape_bytes(&[0xf4, 0x8f, 0xbf, 0xbf]).len(), 16);
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(Format::from_name("rust"), Some(Format::Rust));
        assert_eq!(Format::from_name("cpp"), Some(Format::Cpp));
        assert_eq!(Format::from_name("json"), None);
        assert_eq!(Format::default(), Format::Rust);
    }

    #[test]
    fn test_emit_rust() {
        let mut out = Vec::new();
        emit(&mut out, &tables(), Format::Rust).unwrap();
        let expected = "\
// Generated from Unicode 15.1.0 case folding for U+0080..=U+01FF

pub static CASE_FOLD_BYTES: &[(u8, &[(&[u8], &[u8])])] = &[
    (0xc3, &[
        (b\"\\xc3\\x80\", b\"\\xc3\\xa0\"),
        (b\"\\xc3\\x9f\", b\"\\x73\\x73\"),
    ]),
    (0xc4, &[
        (b\"\\xc4\\xb0\", b\"\\x69\\xcc\\x87\"),
    ]),
];

pub static CASE_FOLD_CODEPOINTS: &[(u32, &[u32])] = &[
    (0xc0, &[0xe0]),
    (0xdf, &[0x73, 0x73]),
    (0x130, &[0x69, 0x307]),
];
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_emit_cpp() {
        let mut out = Vec::new();
        emit(&mut out, &tables(), Format::Cpp).unwrap();
        let expected = "\
// Generated from Unicode 15.1.0 case folding for U+0080..=U+01FF
#ifndef _UTF8_CPP_TABLE_HH
#define _UTF8_CPP_TABLE_HH

#include <map>
#include <vector>
#include <string>
#include <cstdint>

typedef std::pair<std::string, std::string> replacement_t;

namespace Utf8CppUtils {

inline const std::map<uint8_t, std::vector<replacement_t>> _casefold_table = {
{
    { 0xc3, {
        { \"\\xc3\\x80\", \"\\xc3\\xa0\" },
        { \"\\xc3\\x9f\", \"\\x73\\x73\" },
    }},
    { 0xc4, {
        { \"\\xc4\\xb0\", \"\\x69\\xcc\\x87\" },
    }},
}}; // END _casefold_table

inline const std::map<int32_t, std::vector<int32_t>> _casefold_codepoint_table = {
    { 0xc0, { 0xe0 } },
    { 0xdf, { 0x73, 0x73 } },
    { 0x130, { 0x69, 0x307 } },
}; // END _casefold_codepoint_table

} // namespace Utf8CppUtils

#endif // _UTF8_CPP_TABLE_HH
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_emit_unversioned() {
        let fold = |cp: u32| if cp == 0xdf { vec![0x73, 0x73] } else { vec![cp] };
        let tables = CasefoldTableBuilder::new(CodepointRange::new(0x80, 0xff).unwrap())
            .build(&fold)
            .unwrap();
        let mut out = Vec::new();
        emit_rust(&mut out, &tables).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(
            "// Generated from unversioned case folding data for U+0080..=U+00FF\n"
        ));
    }

    #[test]
    fn test_emit_io_error() {
        struct Failing;

        impl Write for Failing {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        assert_eq!(emit(&mut Failing, &tables(), Format::Cpp), Err(Error::Io));
    }
}
