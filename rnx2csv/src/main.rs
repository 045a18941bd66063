//! Command line tool to extract observations from RINEX files, into CSV
mod cli;
mod convbin;
mod table;

use cli::Cli;
use convbin::Convbin;

use rinex_obs::prelude::{parse_file, ParserOptions, ParsingError};

use env_logger::{Builder, Target};
use std::path::PathBuf;
use thiserror::Error;

#[macro_use]
extern crate log;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    StdioError(#[from] std::io::Error),
    #[error("rinex parsing error: {0}")]
    ParsingError(#[from] ParsingError),
    #[error("csv error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("convbin failed with exit code {0:?}")]
    ConvbinFailure(Option<i32>),
    #[error("convbin did not complete within {0}s")]
    ConvbinTimeout(u64),
    #[error("no observation file generated in \"{0}\"")]
    MissingObservationFile(PathBuf),
}

pub fn main() -> Result<(), Error> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();

    let input_path = match (cli.ubx_path(), cli.input_path()) {
        (Some(ubx), _) => Convbin::new(cli.convbin())
            .with_timeout(cli.timeout())
            .convert(ubx, &cli.workspace())?,
        (None, Some(path)) => path.clone(),
        (None, None) => unreachable!("required by command line"),
    };

    let opts = ParserOptions::default()
        .with_constellation(cli.constellation())
        .with_header_policy(cli.header_policy());

    info!(
        "extracting {} observations from \"{}\"",
        opts.constellation,
        input_path.display()
    );

    let records = parse_file(&input_path, opts).map_err(|e| {
        error!("\"{}\" could not be parsed: {}", input_path.display(), e);
        e
    })?;

    info!("{} observations extracted", records.len());

    let output_path = cli.output_path(&input_path);
    table::write_obs_records(&output_path, &records, cli.tab_delimited())?;

    info!("\"{}\" generated", output_path.display());
    Ok(())
}
