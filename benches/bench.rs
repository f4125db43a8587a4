#![feature(test)]

extern crate test;

use casefold_tables::{CaseFolding, CasefoldTableBuilder, CodepointRange};

use std::env;
use std::fs;
use std::path::PathBuf;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or(".".into()));
    path.push("./fixtures/");
    path.push(name);

    assert!(path.is_file());
    fs::read_to_string(path).unwrap()
}

#[bench]
fn bench_parse_case_folding(b: &mut test::Bencher) {
    let text = read_fixture("CaseFolding-excerpt.txt");
    b.iter(|| {
        test::black_box(CaseFolding::parse(&text).unwrap());
    });
}

#[bench]
fn bench_build_bmp_from_ucd(b: &mut test::Bencher) {
    let folding = CaseFolding::parse(&read_fixture("CaseFolding-excerpt.txt")).unwrap();
    let builder = CasefoldTableBuilder::new(CodepointRange::new(0x80, 0xffff).unwrap());
    b.iter(|| {
        test::black_box(builder.build(&folding).unwrap());
    });
}

#[cfg(feature = "builtin")]
#[bench]
fn bench_build_default_builtin(b: &mut test::Bencher) {
    let builder = CasefoldTableBuilder::default();
    b.iter(|| {
        test::black_box(builder.build(&casefold_tables::BuiltinCaseFold).unwrap());
    });
}

#[cfg(feature = "parallel")]
#[bench]
fn bench_build_default_parallel(b: &mut test::Bencher) {
    let folding = CaseFolding::parse(&read_fixture("CaseFolding-excerpt.txt")).unwrap();
    let builder = CasefoldTableBuilder::default();
    b.iter(|| {
        test::black_box(builder.build_parallel(&folding, 8).unwrap());
    });
}

#[bench]
fn bench_lookup(b: &mut test::Bencher) {
    let folding = CaseFolding::parse(&read_fixture("CaseFolding-excerpt.txt")).unwrap();
    let tables = CasefoldTableBuilder::default().build(&folding).unwrap();
    let text = "Straße İstanbul ΣΊΣΥΦΟΣ Kelvin \u{212a} \u{10400}".repeat(64);
    b.iter(|| {
        let bytes = text.as_bytes();
        let mut folded = 0;
        let mut i = 0;
        while i < bytes.len() {
            match tables.bytes().lookup(&bytes[i..]) {
                Some(replacement) => {
                    folded += replacement.folded().len();
                    i += replacement.original().len();
                }
                None => {
                    folded += 1;
                    i += 1;
                }
            }
        }
        test::black_box(folded)
    });
}
