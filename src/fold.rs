use alloc::vec::Vec;

use crate::common::{Error, Result, UnicodeVersion};

/// A source of Unicode full case foldings.
///
/// Implementations must be total and deterministic: every codepoint has a
/// folding, and codepoints without a case folding fold to themselves.
///
/// Any `Fn(u32) -> impl IntoIterator<Item = u32>` is a `CaseFold`, which is
/// convenient for tests and one-off tables.
pub trait CaseFold {
    /// Append the full case folding of `cp` to `folded`.
    ///
    /// Implementations append `cp` itself if it has no folding.
    fn fold(&self, cp: u32, folded: &mut Vec<u32>);

    /// The Unicode version of the folding data, if known.
    fn unicode_version(&self) -> Option<UnicodeVersion> {
        None
    }

    /// Return an error unless the folding data is for the `expected` Unicode
    /// version.
    ///
    /// Data of unknown version never matches and gives
    /// `Error::MissingCaseFoldingVersion`.
    fn check_unicode_version(&self, expected: UnicodeVersion) -> Result<()> {
        match self.unicode_version() {
            Some(found) if found == expected => Ok(()),
            Some(found) => Err(Error::UnexpectedUnicodeVersion { expected, found }),
            None => Err(Error::MissingCaseFoldingVersion),
        }
    }
}

impl<F, I> CaseFold for F
where
    F: Fn(u32) -> I,
    I: IntoIterator<Item = u32>,
{
    #[inline]
    fn fold(&self, cp: u32, folded: &mut Vec<u32>) {
        folded.extend(self(cp));
    }
}

/// Full, non-Turkic case folding using the data built into the
/// `unicode-casefold` crate.
///
/// The Unicode version is the one embedded in the pinned release of that
/// crate, as reported by `unicode_casefold::UNICODE_VERSION`. Use
/// [`CaseFolding`](./struct.CaseFolding.html) for tables tied to another
/// version.
#[cfg(feature = "builtin")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCaseFold;

#[cfg(feature = "builtin")]
impl CaseFold for BuiltinCaseFold {
    fn fold(&self, cp: u32, folded: &mut Vec<u32>) {
        use unicode_casefold::UnicodeCaseFold;

        match char::from_u32(cp) {
            Some(c) => folded.extend(core::iter::once(c).case_fold().map(u32::from)),
            // Surrogates have no folding.
            None => folded.push(cp),
        }
    }

    fn unicode_version(&self) -> Option<UnicodeVersion> {
        let (major, minor, update) = unicode_casefold::UNICODE_VERSION;
        Some(UnicodeVersion::new(major as u8, minor as u8, update as u8))
    }
}
