//! Build Unicode case folding lookup tables for caseless text matching.
//!
//! A text engine that compares strings without regard to case needs to know,
//! for every character, its *case folding*: the canonical form used for
//! caseless comparison. Full case folding can expand a single character into
//! several (`ß` folds to `ss`), so a plain lowercase table is not enough.
//!
//! This crate enumerates a range of codepoints, asks a folding oracle for each
//! codepoint's folding, and records only the codepoints whose folding differs
//! from themselves. Two views over the same entries are produced:
//!
//! * [`ByteGroupTable`](./struct.ByteGroupTable.html): replacements of UTF-8
//!   byte sequences, grouped by the leading byte of the original encoding.
//!   This is what a scanner over raw UTF-8 text dispatches on.
//!
//! * [`CodepointTable`](./struct.CodepointTable.html): the folded codepoint
//!   sequence for each codepoint, for algorithms over decoded characters.
//!
//! ## Example Usage
//!
//! ```rust
//! use casefold_tables::{CasefoldTableBuilder, CodepointRange};
//!
//! # fn example() -> casefold_tables::Result<()> {
//! // A toy oracle: fold sharp s to "ss" and leave everything else alone.
//! let fold = |cp: u32| if cp == 0xdf { vec![0x73, 0x73] } else { vec![cp] };
//!
//! let tables = CasefoldTableBuilder::new(CodepointRange::new(0x80, 0xff)?).build(&fold)?;
//! assert_eq!(tables.codepoints().get(0xdf), Some(&[0x73, 0x73][..]));
//!
//! let replacement = tables.bytes().lookup("ßen".as_bytes()).unwrap();
//! assert_eq!(replacement.folded(), b"ss");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Folding oracles
//!
//! The builder does not know Unicode itself. It consumes any
//! [`CaseFold`](./trait.CaseFold.html) implementation:
//!
//! * [`CaseFolding`](./struct.CaseFolding.html) parses the Unicode Character
//!   Database file `CaseFolding.txt`. The Unicode version is read from the
//!   file, so the resulting tables are pinned to it.
//!
//! * `BuiltinCaseFold` (with the `builtin` feature) uses the data embedded in
//!   the `unicode-casefold` crate, and reports that crate's Unicode version.
//!
//! * Any `Fn(u32) -> impl IntoIterator<Item = u32>` closure.
//!
//! Table contents are only meaningful together with the Unicode version they
//! were built from; [`CasefoldTables`](./struct.CasefoldTables.html) carries
//! the version declared by the oracle.
//!
//! ## Cargo features
//!
//! * `std` (default): emission of tables through `std::io::Write` and
//!   `std::error::Error` support. Without it the crate is `no_std` + `alloc`.
//!
//! * `builtin` (default): the `unicode-casefold` backed oracle. It implies
//!   `std`, which `unicode-casefold` links.
//!
//! * `parallel`: partitioned builds on the `rayon` thread pool.

#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
// Allow clippy lints when building without clippy.
#![allow(unknown_lints)]
#![no_std]

#[allow(unused_imports)]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod common;
pub use crate::common::*;

mod utf8;
pub use crate::utf8::*;

mod fold;
pub use crate::fold::*;

pub mod ucd;
pub use crate::ucd::CaseFolding;

mod table;
pub use crate::table::*;

mod build;
pub use crate::build::*;

#[cfg(feature = "std")]
pub mod emit;
