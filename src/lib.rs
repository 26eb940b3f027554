//! `exarg` is a set of command line parser extensions for Rust.
//!
//! Although other crates provide command line parser functionality, we have found they stop short of a few conveniences we keep reaching for.
//! It is very possible those crates can be configured to produce *our desired* behaviour.
//! We built `exarg` to provide that behaviour "out of the box".
//! Specifically, `exarg` attempts to prioritize the following design concerns:
//! * *Composed detailed help*:
//! A source (sub-command) based Cli should be able to print one consolidated help screen: the top-level help, followed by each selected source's help, annotated with the source's aliases.
//! A single switch (`-d`, `--detailed-help`) triggers the composition and exits successfully, exactly like the standard help switch.
//! * *Domain sensitive argument parsing*:
//! The user should not validate/reject any domain invalid inputs.
//! Instead, parameters are typed by validators: bounded integers, bounded integer tuples, comma-delimited lists, mixed integer range lists, unescaped strings.
//! Each validator carries a precise, example-bearing rejection message which is surfaced to the Cli user verbatim.
//! * *Auto-vivifying tally containers*:
//! Accumulating over parsed inputs usually wants a nested mapping where absent keys materialize defaults instead of signalling "missing key".
//! `exarg` ships explicit fixed-depth and unbounded-depth wrapper types for this, with no self-referential factory tricks.
//!
//! # Usage
//! ```
//! use exarg::{BoundedInt, Checked, CommandParser, Param, Value};
//!
//! let mut threads: i64 = 1;
//! let mut region: String = String::default();
//! let parser = CommandParser::new("rprofile")
//!     .about("Read profiling over genomic sources.")
//!     .add(Param::option(
//!         Checked::new(&mut threads, BoundedInt::new(1, 16).unwrap()),
//!         "threads",
//!         Some('t'),
//!     ))
//!     .dispatch("source")
//!     .source("quant", &["quantify"], |sub| {
//!         sub.about("Quantify the reads.")
//!             .add(Param::argument(Value::new(&mut region), "region"))
//!     })
//!     .detailed_help(&["quant"])
//!     .build();
//!
//! parser.parse_tokens(vec!["-t", "8", "quant", "chr1"].as_slice()).unwrap();
//!
//! assert_eq!(threads, 8);
//! assert_eq!(&region, "chr1");
//! ```
//!
//! Running the same program with `--detailed-help` produces the composed screen and exits with status `0`:
//! ```console
//! $ rprofile --detailed-help
//! usage: rprofile [-h] [-d] [-t THREADS] {quant,quantify} ...
//!
//! Read profiling over genomic sources.
//!
//! sources:
//!  quant (quantify)          Quantify the reads.
//!
//! options:
//!  -h, --help                Show this help message and exit.
//!  -d, --detailed-help       Show this help message, followed by the help
//!                            for each source, and exit.
//!  -t THREADS, --threads THREADS
//!
//! Input source 'quant (quantify)':
//!
//! usage: rprofile quant [-h] REGION
//!
//! Quantify the reads.
//!
//! positional arguments:
//!  REGION
//!
//! options:
//!  -h, --help   Show this help message and exit.
//! ```
//!
//! # Validators
//! Validators may also be used standalone, away from any parser:
//! ```
//! use exarg::{IntRangeList, Validate};
//!
//! assert_eq!(IntRangeList.validate("2,3:6,8").unwrap(), Some(vec![2, 3, 4, 5, 6, 8]));
//! ```
//!
//! # Tally containers
//! ```
//! use exarg::{AutoMap, DepthMap};
//!
//! let mut tallies: DepthMap<&str, i64> = DepthMap::new(2).unwrap();
//! *tallies.tally(&["chr1", "fwd"]) += 1;
//!
//! let mut groups: AutoMap<&str> = AutoMap::default();
//! groups.dive(["a", "b", "c", "d"]);
//! ```
#![deny(missing_docs)]
mod api;
mod collection;
mod constant;
mod model;
mod parser;
pub mod prelude;

pub use api::*;
pub use collection::{count_map, group_map, AutoMap, DepthMap, Gatherable, Nested};
pub use model::*;
pub use parser::{ConfigError, ParseError, ReadyParser};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
