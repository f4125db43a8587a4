//! Generate case folding tables for caseless UTF-8 matching.
//!
//! The folding data comes either from a copy of the Unicode Character Database
//! file `CaseFolding.txt` (`--ucd`) or from the data built into
//! `casefold-tables`. Either way the Unicode version of the data is recorded in
//! the output, and `--unicode-version` refuses data for any other version.
//!
//! ```text
//! case-fold-gen --ucd CaseFolding.txt --unicode-version 15.1.0 case_fold_data.rs
//! case-fold-gen --format cpp --low 0x80 utf8_cpp_table.hh
//! ```

mod logger;

use casefold_tables::emit::{emit, Format};
use casefold_tables::ucd::Locale;
use casefold_tables::{
    CaseFold, CaseFolding, CasefoldTableBuilder, CasefoldTables, CodepointRange, UnicodeVersion,
    DEFAULT_LOW_CODEPOINT, MAX_CODEPOINT,
};
use log::{debug, info};
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::result;
use std::{env, str};

#[derive(Debug)]
enum Error {
    Tables(casefold_tables::Error),
    Io(PathBuf, io::Error),
    Usage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> result::Result<(), fmt::Error> {
        match self {
            Error::Tables(err) => write!(f, "{}", err),
            Error::Io(path, err) => write!(f, "{}: {}", path.display(), err),
            Error::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<casefold_tables::Error> for Error {
    fn from(err: casefold_tables::Error) -> Self {
        Error::Tables(err)
    }
}

type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
struct Options {
    range: CodepointRange,
    ucd: Option<PathBuf>,
    unicode_version: Option<UnicodeVersion>,
    locale: Locale,
    format: Format,
    jobs: usize,
    verbosity: usize,
    output: String,
}

fn print_usage(opts: &getopts::Options) -> ! {
    let brief = format!(
        "Usage: {} <options> <output>",
        env::args().next().unwrap_or_else(|| "case-fold-gen".into())
    );
    write!(&mut io::stderr(), "{}", opts.usage(&brief)).ok();
    process::exit(1);
}

fn options() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optopt(
        "",
        "low",
        "first codepoint of the tables (default 0x80)",
        "CODEPOINT",
    );
    opts.optopt(
        "",
        "high",
        "last codepoint of the tables (default 0x10FFFF)",
        "CODEPOINT",
    );
    opts.optopt(
        "",
        "ucd",
        "read case foldings from this CaseFolding.txt",
        "PATH",
    );
    opts.optopt(
        "",
        "unicode-version",
        "fail unless the folding data is for this Unicode version",
        "X.Y.Z",
    );
    opts.optflag("", "turkic", "apply the Turkic (T) mappings of --ucd data");
    opts.optopt("f", "format", "output format: rust (default) or cpp", "FORMAT");
    opts.optopt(
        "j",
        "jobs",
        "build on this many threads, 0 for one per CPU (default 1)",
        "N",
    );
    opts.optflagmulti("v", "verbose", "log more, may be repeated");
    opts.optflag("h", "help", "print this help");
    opts
}

/// Parse a codepoint written as decimal, `0x` hexadecimal or `U+` hexadecimal.
fn parse_codepoint(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Some(hex) = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix("U+"))
        .or_else(|| s.strip_prefix("u+"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn codepoint_opt(matches: &getopts::Matches, name: &str, default: u32) -> Result<u32> {
    match matches.opt_str(name) {
        Some(value) => parse_codepoint(&value)
            .ok_or_else(|| Error::Usage(format!("Invalid codepoint for --{}: {}", name, value))),
        None => Ok(default),
    }
}

fn parse_options<I>(opts: &getopts::Options, args: I) -> Result<Options>
where
    I: IntoIterator,
    I::Item: AsRef<std::ffi::OsStr>,
{
    let matches = opts
        .parse(args)
        .map_err(|e| Error::Usage(e.to_string()))?;
    if matches.opt_present("h") {
        print_usage(opts);
    }
    if matches.free.len() != 1 {
        return Err(Error::Usage("Expected exactly one output path".into()));
    }

    let low = codepoint_opt(&matches, "low", DEFAULT_LOW_CODEPOINT)?;
    let high = codepoint_opt(&matches, "high", MAX_CODEPOINT)?;
    let range = CodepointRange::new(low, high)?;

    let ucd = matches.opt_str("ucd").map(PathBuf::from);
    let unicode_version = match matches.opt_str("unicode-version") {
        Some(version) => Some(UnicodeVersion::parse(&version).ok_or_else(|| {
            Error::Usage(format!("Invalid Unicode version: {}", version))
        })?),
        None => None,
    };
    let locale = if matches.opt_present("turkic") {
        if ucd.is_none() {
            return Err(Error::Usage("--turkic requires --ucd".into()));
        }
        Locale::Turkic
    } else {
        Locale::NonTurkic
    };

    let format = match matches.opt_str("f") {
        Some(name) => Format::from_name(&name)
            .ok_or_else(|| Error::Usage(format!("Unknown output format: {}", name)))?,
        None => Format::default(),
    };
    let jobs = match matches.opt_str("j") {
        Some(jobs) => match jobs.parse::<usize>() {
            Ok(0) => num_cpus::get(),
            Ok(jobs) => jobs,
            Err(_) => return Err(Error::Usage(format!("Invalid job count: {}", jobs))),
        },
        None => 1,
    };

    Ok(Options {
        range,
        ucd,
        unicode_version,
        locale,
        format,
        jobs,
        verbosity: matches.opt_count("v"),
        output: matches.free[0].clone(),
    })
}

fn load_case_folding(path: &Path, locale: Locale) -> Result<CaseFolding> {
    let file = fs::File::open(path).map_err(|e| Error::Io(path.into(), e))?;
    // SAFETY: This is not safe. The file could be modified while it is mapped.
    // `fs::read_to_string` could be used instead if you don't mind loading the
    // entire file into memory.
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| Error::Io(path.into(), e))?;
    let text = str::from_utf8(&mmap)
        .map_err(|_| Error::Usage(format!("{} is not valid UTF-8", path.display())))?;

    let folding = CaseFolding::parse_with_locale(text, locale)?;
    info!(
        "loaded {} case foldings for Unicode {} from {}",
        folding.len(),
        folding.version(),
        path.display()
    );
    Ok(folding)
}

fn check_version<F: CaseFold>(fold: &F, options: &Options) -> Result<()> {
    if let Some(expected) = options.unicode_version {
        fold.check_unicode_version(expected)?;
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn build_tables<F: CaseFold + Sync>(fold: &F, options: &Options) -> Result<CasefoldTables> {
    check_version(fold, options)?;
    let builder = CasefoldTableBuilder::new(options.range);
    let tables = if options.jobs > 1 {
        debug!("building with {} jobs", options.jobs);
        builder.build_parallel(fold, options.jobs)?
    } else {
        builder.build(fold)?
    };
    Ok(tables)
}

#[cfg(not(feature = "parallel"))]
fn build_tables<F: CaseFold + Sync>(fold: &F, options: &Options) -> Result<CasefoldTables> {
    check_version(fold, options)?;
    if options.jobs > 1 {
        log::warn!("built without the parallel feature, ignoring --jobs");
    }
    Ok(CasefoldTableBuilder::new(options.range).build(fold)?)
}

#[cfg(feature = "builtin")]
fn build_builtin_tables(options: &Options) -> Result<CasefoldTables> {
    let fold = casefold_tables::BuiltinCaseFold;
    if let Some(version) = fold.unicode_version() {
        info!("using the built-in case folding data for Unicode {}", version);
    }
    build_tables(&fold, options)
}

#[cfg(not(feature = "builtin"))]
fn build_builtin_tables(_: &Options) -> Result<CasefoldTables> {
    Err(Error::Usage(
        "built without the builtin feature, --ucd is required".into(),
    ))
}

fn write_tables(tables: &CasefoldTables, options: &Options) -> Result<()> {
    if options.output == "-" {
        let stdout = io::stdout();
        let mut w = BufWriter::new(stdout.lock());
        emit(&mut w, tables, options.format)?;
        return w
            .flush()
            .map_err(|e| Error::Io(PathBuf::from("<stdout>"), e));
    }

    let path = Path::new(&options.output);
    let file = fs::File::create(path).map_err(|e| Error::Io(path.into(), e))?;
    let mut w = BufWriter::new(file);
    emit(&mut w, tables, options.format)?;
    w.flush().map_err(|e| Error::Io(path.into(), e))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn run(options: &Options) -> Result<()> {
    let tables = match options.ucd {
        Some(ref path) => {
            let folding = load_case_folding(path, options.locale)?;
            build_tables(&folding, options)?
        }
        None => build_builtin_tables(options)?,
    };
    tables.verify()?;
    info!(
        "{} case foldings in {} byte groups for {}",
        tables.len(),
        tables.bytes().group_count(),
        tables.range()
    );
    write_tables(&tables, options)
}

fn main() {
    let opts = options();
    let options = match parse_options(&opts, env::args().skip(1)) {
        Ok(options) => options,
        Err(Error::Usage(msg)) => {
            writeln!(&mut io::stderr(), "{}\n", msg).ok();
            print_usage(&opts);
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    logger::init(options.verbosity);
    debug!("{:?}", options);

    if let Err(err) = run(&options) {
        eprintln!("case-fold-gen: {}", err);
        process::exit(1);
    }
}
