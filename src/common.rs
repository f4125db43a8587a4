use core::fmt;
use core::ops::RangeInclusive;
use core::result;

/// The largest valid Unicode codepoint.
pub const MAX_CODEPOINT: u32 = 0x10_ffff;

/// The lower bound of the default table range.
///
/// Codepoints below this are ASCII and are expected to be folded by a simpler
/// mechanism than a table lookup.
pub const DEFAULT_LOW_CODEPOINT: u32 = 0x80;

/// An error that occurred when building or emitting case folding tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while emitting tables.
    Io,
    /// The lower bound is above the upper bound, or a bound is not a valid
    /// codepoint.
    InvalidRange {
        /// The requested lower bound.
        low: u32,
        /// The requested upper bound.
        high: u32,
    },
    /// The codepoint, either from the range or from a folding, cannot be
    /// encoded as UTF-8.
    EncodingFailure(u32),
    /// The folding oracle returned no codepoints for this codepoint.
    EmptyFolding(u32),
    /// A line of `CaseFolding.txt` could not be parsed. The value is the
    /// 1-based line number.
    BadCaseFoldingLine(usize),
    /// `CaseFolding.txt` did not declare its Unicode version.
    MissingCaseFoldingVersion,
    /// The case folding data is for a different Unicode version than the one
    /// requested.
    UnexpectedUnicodeVersion {
        /// The requested version.
        expected: UnicodeVersion,
        /// The version of the data.
        found: UnicodeVersion,
    },
    /// Tables were merged that were not built from adjacent codepoint ranges.
    NonContiguousPartitions {
        /// The upper bound of the lower partition.
        high: u32,
        /// The lower bound of the upper partition.
        low: u32,
    },
    /// The byte table and codepoint table disagree about this codepoint.
    InconsistentTables(u32),
    /// A replacement in the byte table group with this leading byte does not
    /// encode a single codepoint.
    InvalidReplacement(u8),
    /// The byte table and codepoint table have different numbers of entries.
    MismatchedTableSizes {
        /// The number of replacements in the byte table.
        bytes: usize,
        /// The number of entries in the codepoint table.
        codepoints: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match *self {
            Error::Io => write!(f, "An I/O error occurred while writing tables."),
            Error::InvalidRange { low, high } => {
                write!(f, "Invalid codepoint range: U+{:04X}..=U+{:04X}", low, high)
            }
            Error::EncodingFailure(cp) => {
                write!(f, "Cannot encode codepoint 0x{:x} as UTF-8", cp)
            }
            Error::EmptyFolding(cp) => {
                write!(f, "The case folding of U+{:04X} is empty", cp)
            }
            Error::BadCaseFoldingLine(line) => {
                write!(f, "Malformed case folding data at line {}", line)
            }
            Error::MissingCaseFoldingVersion => {
                write!(f, "The case folding data does not declare a Unicode version")
            }
            Error::UnexpectedUnicodeVersion { expected, found } => write!(
                f,
                "Expected case folding data for Unicode {}, found Unicode {}",
                expected, found
            ),
            Error::NonContiguousPartitions { high, low } => write!(
                f,
                "Cannot merge tables ending at U+{:04X} with tables starting at U+{:04X}",
                high, low
            ),
            Error::InconsistentTables(cp) => {
                write!(f, "The tables disagree about U+{:04X}", cp)
            }
            Error::InvalidReplacement(lead) => write!(
                f,
                "A replacement in byte group 0x{:02x} is not a single UTF-8 codepoint",
                lead
            ),
            Error::MismatchedTableSizes { bytes, codepoints } => write!(
                f,
                "The byte table has {} replacements but the codepoint table has {} entries",
                bytes, codepoints
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The result of building or emitting tables.
pub type Result<T> = result::Result<T, Error>;

/// A Unicode version, such as `15.1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnicodeVersion {
    /// The major version.
    pub major: u8,
    /// The minor version.
    pub minor: u8,
    /// The update version.
    pub update: u8,
}

impl UnicodeVersion {
    /// Construct a version from its components.
    pub const fn new(major: u8, minor: u8, update: u8) -> Self {
        UnicodeVersion {
            major,
            minor,
            update,
        }
    }

    /// Parse a version of the form `major.minor.update`.
    ///
    /// The update component may be omitted, in which case it is zero.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let update = match parts.next() {
            Some(update) => update.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(UnicodeVersion::new(major, minor, update))
    }
}

impl fmt::Display for UnicodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}.{}.{}", self.major, self.minor, self.update)
    }
}

/// An inclusive range of codepoints to build tables for.
///
/// Both bounds are valid codepoints and `low <= high`, so a range is never
/// empty. Surrogate codepoints may lie inside the range; they are only
/// rejected if the folding oracle reports a folding for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodepointRange {
    low: u32,
    high: u32,
}

impl CodepointRange {
    /// Construct the range `low..=high`.
    ///
    /// Returns `Error::InvalidRange` if `low > high` or `high` is above
    /// `MAX_CODEPOINT`.
    pub fn new(low: u32, high: u32) -> Result<Self> {
        if low > high || high > MAX_CODEPOINT {
            return Err(Error::InvalidRange { low, high });
        }
        Ok(CodepointRange { low, high })
    }

    /// The first codepoint in the range.
    #[inline]
    pub fn low(&self) -> u32 {
        self.low
    }

    /// The last codepoint in the range.
    #[inline]
    pub fn high(&self) -> u32 {
        self.high
    }

    /// The number of codepoints in the range.
    #[inline]
    pub fn len(&self) -> u32 {
        self.high - self.low + 1
    }

    /// Ranges are never empty. This exists for symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Return true if the codepoint is in this range.
    #[inline]
    pub fn contains(&self, cp: u32) -> bool {
        self.low <= cp && cp <= self.high
    }

    /// Iterate over the codepoints in ascending order.
    #[inline]
    pub fn iter(&self) -> RangeInclusive<u32> {
        self.low..=self.high
    }

    /// Split the range into at most `parts` contiguous, ascending ranges of
    /// nearly equal length.
    ///
    /// At least one range is always returned.
    pub fn split(&self, parts: usize) -> impl Iterator<Item = CodepointRange> {
        let len = self.len();
        let parts = u32::try_from(parts).unwrap_or(u32::MAX).clamp(1, len);
        let chunk = (len + parts - 1) / parts;
        let CodepointRange { low, high } = *self;
        (0..parts).filter_map(move |i| {
            let start = low + i * chunk;
            if start > high {
                return None;
            }
            Some(CodepointRange {
                low: start,
                high: (start + chunk - 1).min(high),
            })
        })
    }
}

impl Default for CodepointRange {
    /// The range from `DEFAULT_LOW_CODEPOINT` to `MAX_CODEPOINT`.
    fn default() -> Self {
        CodepointRange {
            low: DEFAULT_LOW_CODEPOINT,
            high: MAX_CODEPOINT,
        }
    }
}

impl fmt::Display for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "U+{:04X}..=U+{:04X}", self.low, self.high)
    }
}
