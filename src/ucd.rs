//! Parse the Unicode Character Database file `CaseFolding.txt`.
//!
//! Each data line of the file has the form
//!
//! ```text
//! <code>; <status>; <mapping>; # <name>
//! ```
//!
//! where the status is one of `C` (common), `S` (simple), `F` (full) or `T`
//! (Turkic). Full case folding is the union of the `C` and `F` mappings. The
//! first line of the file names its version, for example
//! `# CaseFolding-15.1.0.txt`.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use log::debug;

use crate::common::{Error, Result, UnicodeVersion};
use crate::fold::CaseFold;

/// Which language-specific mappings to apply on top of full case folding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// Apply only the `C` and `F` mappings.
    #[default]
    NonTurkic,
    /// Let the `T` mappings override the `C` and `F` mappings for dotted and
    /// dotless I.
    Turkic,
}

// No full folding in the database expands to more than three codepoints.
const MAX_FOLDING_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Folding {
    len: u8,
    codepoints: [u32; MAX_FOLDING_LEN],
}

impl Folding {
    fn parse(mapping: &str) -> Option<Self> {
        let mut folding = Folding {
            len: 0,
            codepoints: [0; MAX_FOLDING_LEN],
        };
        for code in mapping.split_whitespace() {
            let slot = folding.codepoints.get_mut(usize::from(folding.len))?;
            *slot = u32::from_str_radix(code, 16).ok()?;
            folding.len += 1;
        }
        if folding.len == 0 {
            return None;
        }
        Some(folding)
    }

    #[inline]
    fn as_slice(&self) -> &[u32] {
        &self.codepoints[..usize::from(self.len)]
    }
}

/// Full case folding data parsed from `CaseFolding.txt`.
///
/// The mappings are stored sorted by codepoint and looked up by binary search.
#[derive(Debug, Clone)]
pub struct CaseFolding {
    version: UnicodeVersion,
    locale: Locale,
    mappings: Vec<(u32, Folding)>,
}

impl CaseFolding {
    /// Parse the contents of `CaseFolding.txt` for non-Turkic full case
    /// folding.
    pub fn parse(text: &str) -> Result<Self> {
        CaseFolding::parse_with_locale(text, Locale::NonTurkic)
    }

    /// Parse the contents of `CaseFolding.txt` for the given locale.
    pub fn parse_with_locale(text: &str, locale: Locale) -> Result<Self> {
        let mut version = None;
        let mut mappings = BTreeMap::new();
        let mut turkic = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            let (data, comment) = match line.find('#') {
                Some(pos) => (&line[..pos], &line[pos + 1..]),
                None => (line, ""),
            };
            let data = data.trim();
            if data.is_empty() {
                if version.is_none() {
                    version = parse_version_comment(comment);
                }
                continue;
            }

            let mut fields = data.split(';').map(str::trim);
            let (code, status, mapping) = match (fields.next(), fields.next(), fields.next()) {
                (Some(code), Some(status), Some(mapping)) => (code, status, mapping),
                _ => return Err(Error::BadCaseFoldingLine(line_number)),
            };
            if fields.next() != Some("") || fields.next().is_some() {
                return Err(Error::BadCaseFoldingLine(line_number));
            }

            let code =
                u32::from_str_radix(code, 16).map_err(|_| Error::BadCaseFoldingLine(line_number))?;
            let folding = Folding::parse(mapping).ok_or(Error::BadCaseFoldingLine(line_number))?;
            match status {
                "C" | "F" => {
                    if mappings.insert(code, folding).is_some() {
                        return Err(Error::BadCaseFoldingLine(line_number));
                    }
                }
                "T" => turkic.push((code, folding)),
                "S" => {}
                _ => return Err(Error::BadCaseFoldingLine(line_number)),
            }
        }

        let version = version.ok_or(Error::MissingCaseFoldingVersion)?;
        if locale == Locale::Turkic {
            mappings.extend(turkic);
        }
        debug!(
            "parsed {} case foldings for Unicode {} ({:?})",
            mappings.len(),
            version,
            locale
        );

        Ok(CaseFolding {
            version,
            locale,
            mappings: mappings.into_iter().collect(),
        })
    }

    /// The Unicode version declared by the data.
    #[inline]
    pub fn version(&self) -> UnicodeVersion {
        self.version
    }

    /// The locale the data was parsed for.
    #[inline]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Return `Error::UnexpectedUnicodeVersion` unless the data is for the
    /// `expected` version.
    pub fn check_version(&self, expected: UnicodeVersion) -> Result<()> {
        if self.version != expected {
            return Err(Error::UnexpectedUnicodeVersion {
                expected,
                found: self.version,
            });
        }
        Ok(())
    }

    /// The number of codepoints with a folding.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Return true if the data contains no foldings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// The folding of `cp`, or `None` if it folds to itself.
    pub fn get(&self, cp: u32) -> Option<&[u32]> {
        match self.mappings.binary_search_by(|&(key, _)| key.cmp(&cp)) {
            Ok(i) => Some(self.mappings[i].1.as_slice()),
            Err(_) => None,
        }
    }
}

impl CaseFold for CaseFolding {
    fn fold(&self, cp: u32, folded: &mut Vec<u32>) {
        match self.get(cp) {
            Some(mapping) => folded.extend_from_slice(mapping),
            None => folded.push(cp),
        }
    }

    fn unicode_version(&self) -> Option<UnicodeVersion> {
        Some(self.version)
    }
}

fn parse_version_comment(comment: &str) -> Option<UnicodeVersion> {
    let name = comment.trim().strip_prefix("CaseFolding-")?;
    UnicodeVersion::parse(name.strip_suffix(".txt")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
# CaseFolding-15.1.0.txt
# Date: 2023-05-12, 21:53:10 GMT

# The data supports both implementations that require simple case foldings
# (where string lengths don't change), and implementations that allow full case folding.
0041; C; 0061; # LATIN CAPITAL LETTER A
0049; C; 0069; # LATIN CAPITAL LETTER I
0049; T; 0131; # LATIN CAPITAL LETTER I
00DF; F; 0073 0073; # LATIN SMALL LETTER SHARP S
0130; F; 0069 0307; # LATIN CAPITAL LETTER I WITH DOT ABOVE
0130; T; 0069; # LATIN CAPITAL LETTER I WITH DOT ABOVE
0390; F; 03B9 0308 0301; # GREEK SMALL LETTER IOTA WITH DIALYTIKA AND TONOS
1E9E; F; 0073 0073; # LATIN CAPITAL LETTER SHARP S
1E9E; S; 00DF; # LATIN CAPITAL LETTER SHARP S
";

    fn fold_of(folding: &CaseFolding, cp: u32) -> Vec<u32> {
        let mut folded = Vec::new();
        folding.fold(cp, &mut folded);
        folded
    }

    #[test]
    fn test_parse_full() {
        let folding = CaseFolding::parse(DATA).unwrap();
        assert_eq!(folding.version(), UnicodeVersion::new(15, 1, 0));
        assert_eq!(folding.locale(), Locale::NonTurkic);
        assert_eq!(folding.len(), 6);
        assert_eq!(folding.get(0x41), Some(&[0x61][..]));
        assert_eq!(folding.get(0x49), Some(&[0x69][..]));
        assert_eq!(folding.get(0xdf), Some(&[0x73, 0x73][..]));
        assert_eq!(folding.get(0x130), Some(&[0x69, 0x307][..]));
        assert_eq!(folding.get(0x390), Some(&[0x3b9, 0x308, 0x301][..]));
        // The simple mapping is not used for full folding.
        assert_eq!(folding.get(0x1e9e), Some(&[0x73, 0x73][..]));
        assert_eq!(folding.get(0x61), None);
        assert_eq!(folding.unicode_version(), Some(UnicodeVersion::new(15, 1, 0)));
    }

    #[test]
    fn test_fold_identity() {
        let folding = CaseFolding::parse(DATA).unwrap();
        assert_eq!(fold_of(&folding, 0x61), [0x61]);
        assert_eq!(fold_of(&folding, 0xe0), [0xe0]);
        assert_eq!(fold_of(&folding, 0xdf), [0x73, 0x73]);
    }

    #[test]
    fn test_parse_turkic() {
        let folding = CaseFolding::parse_with_locale(DATA, Locale::Turkic).unwrap();
        assert_eq!(folding.locale(), Locale::Turkic);
        assert_eq!(folding.get(0x49), Some(&[0x131][..]));
        assert_eq!(folding.get(0x130), Some(&[0x69][..]));
        assert_eq!(folding.get(0xdf), Some(&[0x73, 0x73][..]));
    }

    #[test]
    fn test_check_version() {
        let folding = CaseFolding::parse(DATA).unwrap();
        assert!(folding.check_version(UnicodeVersion::new(15, 1, 0)).is_ok());
        assert_eq!(
            folding.check_version(UnicodeVersion::new(16, 0, 0)),
            Err(Error::UnexpectedUnicodeVersion {
                expected: UnicodeVersion::new(16, 0, 0),
                found: UnicodeVersion::new(15, 1, 0),
            })
        );
    }

    #[test]
    fn test_missing_version() {
        let data = "0041; C; 0061; # LATIN CAPITAL LETTER A\n";
        assert_eq!(
            CaseFolding::parse(data).unwrap_err(),
            Error::MissingCaseFoldingVersion
        );
    }

    #[test]
    fn test_bad_lines() {
        for (line, expected) in [
            ("0041; C; 0061", 2),              // Missing trailing field
            ("0041; C; 0061; extra;", 2),      // Extra field
            ("0041; X; 0061;", 2),             // Unknown status
            ("ZZZZ; C; 0061;", 2),             // Bad code
            ("0041; C; ;", 2),                 // Empty mapping
            ("0041; F; 0061 0062 0063 0064;", 2), // Mapping too long
            ("0041;", 2),                      // Missing fields
        ] {
            let data = format!("# CaseFolding-15.1.0.txt\n{}\n", line);
            assert_eq!(
                CaseFolding::parse(&data).unwrap_err(),
                Error::BadCaseFoldingLine(expected),
                "{}",
                line
            );
        }
    }

    #[test]
    fn test_duplicate_mapping() {
        let data = "# CaseFolding-15.1.0.txt\n0041; C; 0061;\n0041; F; 0061 0061;\n";
        assert_eq!(
            CaseFolding::parse(data).unwrap_err(),
            Error::BadCaseFoldingLine(3)
        );
    }
}
