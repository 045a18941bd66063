#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod epoch;
pub mod field;
pub mod parser;
pub mod reader;
pub mod record;

mod error;

use std::{io::BufRead, path::Path};

use parser::{Parser, ParserOptions};
use reader::BufferedReader;
use record::ObservationRecord;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        epoch::Epoch,
        error::ParsingError,
        parser::{HeaderPolicy, Parser, ParserOptions},
        reader::BufferedReader,
        parse_file, parse_reader, parse_str,
        record::ObservationRecord,
    };
    // pub re-export
    pub use gnss_rs::prelude::Constellation;
}

pub use error::ParsingError;

/// Parses all [ObservationRecord]s from readable content
pub fn parse_reader<R: BufRead>(
    reader: R,
    opts: ParserOptions,
) -> Result<Vec<ObservationRecord>, ParsingError> {
    Parser::from_reader(reader, opts).collect()
}

/// Parses all [ObservationRecord]s from given Observation RINEX file.
/// Gzip compressed files are supported with the "flate2" feature.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    opts: ParserOptions,
) -> Result<Vec<ObservationRecord>, ParsingError> {
    let reader = BufferedReader::new(path)?;
    parse_reader(reader, opts)
}

/// Parses all [ObservationRecord]s from a string
pub fn parse_str(
    content: &str,
    opts: ParserOptions,
) -> Result<Vec<ObservationRecord>, ParsingError> {
    let lines = content.lines().map(|line| Ok(line.to_string()));
    Parser::new(lines, opts).collect()
}
