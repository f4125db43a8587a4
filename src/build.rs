use alloc::vec::Vec;
use core::mem;
use core::ops::RangeInclusive;

use log::{debug, trace};

use crate::common::{CodepointRange, Error, Result, UnicodeVersion};
use crate::fold::CaseFold;
use crate::table::{ByteGroupTable, CodepointTable, Replacement};
use crate::utf8::{decode_utf8_single, encode_utf8, encode_utf8_all};

/// A codepoint whose case folding differs from itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodepointEntry {
    /// The original codepoint.
    pub codepoint: u32,
    /// The UTF-8 encoding of `codepoint`.
    pub original: Vec<u8>,
    /// The folded codepoints.
    pub folded: Vec<u32>,
    /// The UTF-8 encoding of `folded`.
    pub folded_bytes: Vec<u8>,
}

/// An iterator over the `CodepointEntry`s of a range, in ascending codepoint
/// order.
///
/// Codepoints that fold to themselves are skipped.
#[derive(Debug)]
pub struct CodepointEntries<'a, F: ?Sized> {
    codepoints: RangeInclusive<u32>,
    fold: &'a F,
    folded: Vec<u32>,
}

impl<'a, F: CaseFold + ?Sized> CodepointEntries<'a, F> {
    fn entry(&mut self, cp: u32) -> Result<Option<CodepointEntry>> {
        self.folded.clear();
        self.fold.fold(cp, &mut self.folded);
        match self.folded[..] {
            [] => return Err(Error::EmptyFolding(cp)),
            [folded] if folded == cp => return Ok(None),
            _ => {}
        }

        let mut original = Vec::with_capacity(4);
        encode_utf8(cp, &mut original)?;
        let mut folded_bytes = Vec::with_capacity(self.folded.len() * 4);
        encode_utf8_all(&self.folded, &mut folded_bytes)?;

        Ok(Some(CodepointEntry {
            codepoint: cp,
            original,
            folded: mem::take(&mut self.folded),
            folded_bytes,
        }))
    }
}

impl<'a, F: CaseFold + ?Sized> Iterator for CodepointEntries<'a, F> {
    type Item = Result<CodepointEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cp) = self.codepoints.next() {
            match self.entry(cp) {
                Ok(None) => continue,
                Ok(Some(entry)) => return Some(Ok(entry)),
                Err(e) => {
                    // Stop after the first error.
                    self.codepoints = 1..=0;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Builds case folding tables for a range of codepoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CasefoldTableBuilder {
    range: CodepointRange,
}

impl CasefoldTableBuilder {
    /// Construct a builder for the given range.
    pub fn new(range: CodepointRange) -> Self {
        CasefoldTableBuilder { range }
    }

    /// The range of codepoints the tables are built for.
    #[inline]
    pub fn range(&self) -> CodepointRange {
        self.range
    }

    /// Iterate over the codepoints of the range that have a folding.
    pub fn entries<'a, F>(&self, fold: &'a F) -> CodepointEntries<'a, F>
    where
        F: CaseFold + ?Sized,
    {
        CodepointEntries {
            codepoints: self.range.iter(),
            fold,
            folded: Vec::new(),
        }
    }

    /// Build the tables.
    ///
    /// Every codepoint of the range is folded in ascending order. Codepoints
    /// that fold to themselves are omitted from both tables.
    ///
    /// Returns `Error::EmptyFolding` if `fold` produces no codepoints, and
    /// `Error::EncodingFailure` if a recorded codepoint or a folded codepoint
    /// is not a Unicode scalar value. No tables are returned on error.
    pub fn build<F>(&self, fold: &F) -> Result<CasefoldTables>
    where
        F: CaseFold + ?Sized,
    {
        let mut bytes = ByteGroupTable::new();
        let mut codepoints = CodepointTable::new();
        for entry in self.entries(fold) {
            let entry = entry?;
            trace!(
                "U+{:04X} folds to {:x?} ({:02x?} -> {:02x?})",
                entry.codepoint,
                entry.folded,
                entry.original,
                entry.folded_bytes
            );
            bytes.push(Replacement::new(entry.original, entry.folded_bytes));
            codepoints.insert(entry.codepoint, entry.folded);
        }
        debug!(
            "built {} case foldings in {} byte groups for {}",
            codepoints.len(),
            bytes.group_count(),
            self.range
        );

        Ok(CasefoldTables {
            range: self.range,
            unicode_version: fold.unicode_version(),
            bytes,
            codepoints,
        })
    }

    /// Build the tables on the `rayon` thread pool.
    ///
    /// The range is split into at most `partitions` contiguous ranges which
    /// are built independently and then merged in ascending order. The result
    /// is identical to `build`.
    #[cfg(feature = "parallel")]
    pub fn build_parallel<F>(&self, fold: &F, partitions: usize) -> Result<CasefoldTables>
    where
        F: CaseFold + Sync + ?Sized,
    {
        use rayon::prelude::*;

        let ranges: Vec<CodepointRange> = self.range.split(partitions).collect();
        debug!("building {} in {} partitions", self.range, ranges.len());
        let tables = ranges
            .into_par_iter()
            .map(|range| CasefoldTableBuilder::new(range).build(fold))
            .collect::<Result<Vec<_>>>()?;

        let mut tables = tables.into_iter();
        // `split` always returns at least one range.
        let first = tables.next().ok_or(Error::InvalidRange {
            low: self.range.low(),
            high: self.range.high(),
        })?;
        tables.try_fold(first, CasefoldTables::merge)
    }
}

/// Build the byte and codepoint tables for `range` using `fold`.
///
/// This is a shorthand for `CasefoldTableBuilder::new(range).build(fold)`
/// that discards the range and version information.
pub fn build<F>(range: CodepointRange, fold: &F) -> Result<(ByteGroupTable, CodepointTable)>
where
    F: CaseFold + ?Sized,
{
    let tables = CasefoldTableBuilder::new(range).build(fold)?;
    Ok(tables.into_parts())
}

/// The byte and codepoint case folding tables for a range of codepoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasefoldTables {
    range: CodepointRange,
    unicode_version: Option<UnicodeVersion>,
    bytes: ByteGroupTable,
    codepoints: CodepointTable,
}

impl CasefoldTables {
    /// The range of codepoints the tables were built for.
    #[inline]
    pub fn range(&self) -> CodepointRange {
        self.range
    }

    /// The Unicode version declared by the folding oracle, if any.
    #[inline]
    pub fn unicode_version(&self) -> Option<UnicodeVersion> {
        self.unicode_version
    }

    /// The byte sequence replacements, grouped by leading byte.
    #[inline]
    pub fn bytes(&self) -> &ByteGroupTable {
        &self.bytes
    }

    /// The folded codepoint sequences.
    #[inline]
    pub fn codepoints(&self) -> &CodepointTable {
        &self.codepoints
    }

    /// The number of codepoints with a folding.
    #[inline]
    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    /// Return true if no codepoint in the range has a folding.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    /// Take ownership of the byte and codepoint tables.
    pub fn into_parts(self) -> (ByteGroupTable, CodepointTable) {
        (self.bytes, self.codepoints)
    }

    /// Merge tables built for the range immediately following this one.
    ///
    /// Groups of `other` are appended to the groups of `self`, so the
    /// ascending codepoint order within each group is preserved.
    pub fn merge(mut self, other: CasefoldTables) -> Result<CasefoldTables> {
        if self.range.high().checked_add(1) != Some(other.range.low()) {
            return Err(Error::NonContiguousPartitions {
                high: self.range.high(),
                low: other.range.low(),
            });
        }
        if self.unicode_version != other.unicode_version {
            if let (Some(expected), Some(found)) = (self.unicode_version, other.unicode_version) {
                return Err(Error::UnexpectedUnicodeVersion { expected, found });
            }
            self.unicode_version = None;
        }

        self.range = CodepointRange::new(self.range.low(), other.range.high())?;
        self.bytes.append(other.bytes);
        self.codepoints.append(other.codepoints);
        Ok(self)
    }

    /// Check that the byte and codepoint tables describe the same entries.
    ///
    /// Every replacement must decode to a single codepoint of the range whose
    /// codepoint table entry encodes to the replacement's folded bytes, groups
    /// must be keyed by the leading byte and sorted by codepoint, and every
    /// codepoint table entry must have a replacement.
    pub fn verify(&self) -> Result<()> {
        let mut encoded = Vec::new();
        for (lead, group) in self.bytes.groups() {
            let mut previous = None;
            for replacement in group {
                let cp = decode_utf8_single(replacement.original())
                    .ok_or(Error::InvalidReplacement(lead))?;
                let folded = self
                    .codepoints
                    .get(cp)
                    .ok_or(Error::InconsistentTables(cp))?;
                encoded.clear();
                encode_utf8_all(folded, &mut encoded)?;
                if replacement.leading_byte() != lead
                    || !self.range.contains(cp)
                    || previous.map_or(false, |previous| previous >= cp)
                    || encoded != replacement.folded()
                {
                    return Err(Error::InconsistentTables(cp));
                }
                previous = Some(cp);
            }
        }

        for (cp, folded) in &self.codepoints {
            encoded.clear();
            encode_utf8(cp, &mut encoded)?;
            let found = self
                .bytes
                .lookup(&encoded)
                .map_or(false, |replacement| replacement.original() == &encoded[..]);
            if !found || folded == [cp] {
                return Err(Error::InconsistentTables(cp));
            }
        }

        if self.bytes.len() != self.codepoints.len() {
            return Err(Error::MismatchedTableSizes {
                bytes: self.bytes.len(),
                codepoints: self.codepoints.len(),
            });
        }
        Ok(())
    }
}
