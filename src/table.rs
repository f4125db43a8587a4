use alloc::collections::btree_map;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// A replacement of the UTF-8 encoding of one codepoint by the UTF-8 encoding
/// of its case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Replacement {
    original: Vec<u8>,
    folded: Vec<u8>,
}

impl Replacement {
    pub(crate) fn new(original: Vec<u8>, folded: Vec<u8>) -> Self {
        debug_assert!(!original.is_empty());
        Replacement { original, folded }
    }

    /// The UTF-8 encoding of the original codepoint.
    #[inline]
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// The UTF-8 encoding of the folded codepoints.
    #[inline]
    pub fn folded(&self) -> &[u8] {
        &self.folded
    }

    /// The first byte of the original encoding.
    #[inline]
    pub fn leading_byte(&self) -> u8 {
        self.original[0]
    }
}

/// Byte sequence replacements grouped by the leading byte of the original
/// encoding.
///
/// Within a group, replacements are in ascending order of the original
/// codepoint. Groups are iterated in ascending order of their leading byte.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ByteGroupTable {
    groups: BTreeMap<u8, Vec<Replacement>>,
    len: usize,
}

impl ByteGroupTable {
    /// Construct an empty table.
    pub fn new() -> Self {
        ByteGroupTable::default()
    }

    /// Append a replacement to the group for its leading byte.
    ///
    /// Callers push in ascending codepoint order.
    pub(crate) fn push(&mut self, replacement: Replacement) {
        self.groups
            .entry(replacement.leading_byte())
            .or_default()
            .push(replacement);
        self.len += 1;
    }

    /// Move all replacements of `other` to the end of the corresponding groups
    /// of this table.
    pub(crate) fn append(&mut self, other: ByteGroupTable) {
        for (lead, mut replacements) in other.groups {
            self.groups.entry(lead).or_default().append(&mut replacements);
        }
        self.len += other.len;
    }

    /// The replacements whose original encoding starts with `lead`.
    pub fn get(&self, lead: u8) -> Option<&[Replacement]> {
        self.groups.get(&lead).map(Vec::as_slice)
    }

    /// Find the replacement for the codepoint at the start of `input`.
    ///
    /// The group for `input[0]` is scanned in order and the first replacement
    /// whose original encoding is a prefix of `input` is returned.
    pub fn lookup(&self, input: &[u8]) -> Option<&Replacement> {
        self.get(*input.first()?)?
            .iter()
            .find(|replacement| input.starts_with(replacement.original()))
    }

    /// Iterate over the groups in ascending order of leading byte.
    pub fn groups(&self) -> ByteGroupIter<'_> {
        ByteGroupIter {
            iter: self.groups.iter(),
        }
    }

    /// Iterate over all replacements, group by group.
    pub fn replacements(&self) -> impl Iterator<Item = &Replacement> + '_ {
        self.groups.values().flatten()
    }

    /// The number of groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The total number of replacements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the table contains no replacements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An iterator over the groups of a `ByteGroupTable`.
#[derive(Debug, Clone)]
pub struct ByteGroupIter<'a> {
    iter: btree_map::Iter<'a, u8, Vec<Replacement>>,
}

impl<'a> Iterator for ByteGroupIter<'a> {
    type Item = (u8, &'a [Replacement]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .next()
            .map(|(lead, replacements)| (*lead, replacements.as_slice()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a> ExactSizeIterator for ByteGroupIter<'a> {}

impl<'a> IntoIterator for &'a ByteGroupTable {
    type Item = (u8, &'a [Replacement]);
    type IntoIter = ByteGroupIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups()
    }
}

/// The full case folding of each codepoint that does not fold to itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodepointTable {
    entries: BTreeMap<u32, Vec<u32>>,
}

impl CodepointTable {
    /// Construct an empty table.
    pub fn new() -> Self {
        CodepointTable::default()
    }

    pub(crate) fn insert(&mut self, cp: u32, folded: Vec<u32>) {
        debug_assert!(!folded.is_empty());
        let previous = self.entries.insert(cp, folded);
        debug_assert!(previous.is_none());
    }

    pub(crate) fn append(&mut self, mut other: CodepointTable) {
        self.entries.append(&mut other.entries);
    }

    /// The folded codepoints of `cp`, or `None` if `cp` is not in the table.
    #[inline]
    pub fn get(&self, cp: u32) -> Option<&[u32]> {
        self.entries.get(&cp).map(Vec::as_slice)
    }

    /// Return true if `cp` is in the table.
    #[inline]
    pub fn contains(&self, cp: u32) -> bool {
        self.entries.contains_key(&cp)
    }

    /// Iterate over the entries in ascending codepoint order.
    pub fn iter(&self) -> CodepointIter<'_> {
        CodepointIter {
            iter: self.entries.iter(),
        }
    }

    /// The number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An iterator over the entries of a `CodepointTable`.
#[derive(Debug, Clone)]
pub struct CodepointIter<'a> {
    iter: btree_map::Iter<'a, u32, Vec<u32>>,
}

impl<'a> Iterator for CodepointIter<'a> {
    type Item = (u32, &'a [u32]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(cp, folded)| (*cp, folded.as_slice()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a> ExactSizeIterator for CodepointIter<'a> {}

impl<'a> IntoIterator for &'a CodepointTable {
    type Item = (u32, &'a [u32]);
    type IntoIter = CodepointIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
