use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use rinex_obs::prelude::{Constellation, HeaderPolicy};

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

pub struct Cli {
    /// arguments passed by user
    pub matches: ArgMatches,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }
    fn command() -> Command {
        Command::new("rnx2csv")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Observation RINEX to CSV")
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .next_help_heading("Input")
            .arg(
                Arg::new("filepath")
                    .short('f')
                    .long("fp")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .required_unless_present("ubx")
                    .conflicts_with("ubx")
                    .help("Input Observation RINEX file (V3+). Gzip compressed files are supported."),
            )
            .arg(
                Arg::new("ubx")
                    .long("ubx")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Raw u-blox log, converted to RINEX 3.02 with convbin first. See --help.")
                    .long_help("Raw u-blox log, converted to Observation RINEX 3.02 with RTKLIB's convbin
(2.4.3 or later) prior extraction. Conversion products are generated in the workspace (-w),
the resulting .obs file is then parsed as if it had been passed with --fp."),
            )
            .next_help_heading("Conversion (convbin)")
            .arg(
                Arg::new("convbin")
                    .long("convbin")
                    .value_name("BINARY")
                    .value_parser(value_parser!(PathBuf))
                    .default_value("convbin")
                    .help("convbin binary to invoke."),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .value_name("SECONDS")
                    .value_parser(value_parser!(u64))
                    .default_value("120")
                    .help("Maximal conversion duration, the conversion is aborted past this delay."),
            )
            .arg(
                Arg::new("workspace")
                    .short('w')
                    .long("workspace")
                    .value_name("FOLDER")
                    .value_parser(value_parser!(PathBuf))
                    .help("Conversion products folder. Defaults to ./WORKSPACE."),
            )
            .next_help_heading("Parsing")
            .arg(
                Arg::new("constellation")
                    .short('c')
                    .long("constellation")
                    .value_parser(Constellation::from_str)
                    .default_value("GPS")
                    .help("Constellation to extract (GPS, GLO, GAL, BDS, QZSS, IRNSS, SBAS)."),
            )
            .arg(
                Arg::new("strict")
                    .long("strict")
                    .action(ArgAction::SetTrue)
                    .help("Reject files that miss the END OF HEADER terminator.
Otherwise, such files are scanned from their very first line."),
            )
            .next_help_heading("Output")
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Custom output file. Defaults to input file name, with .csv (or .txt) extension."),
            )
            .arg(
                Arg::new("tab")
                    .long("tab")
                    .action(ArgAction::SetTrue)
                    .help("Tab delimited output, instead of comma separated values."),
            )
    }
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("filepath")
    }
    pub fn ubx_path(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("ubx")
    }
    pub fn convbin(&self) -> &Path {
        self.matches
            .get_one::<PathBuf>("convbin")
            .map(|path| path.as_path())
            .unwrap_or_else(|| Path::new("convbin"))
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(*self.matches.get_one::<u64>("timeout").unwrap_or(&120))
    }
    pub fn workspace(&self) -> PathBuf {
        match self.matches.get_one::<PathBuf>("workspace") {
            Some(path) => path.clone(),
            None => Path::new("WORKSPACE").to_path_buf(),
        }
    }
    pub fn constellation(&self) -> Constellation {
        self.matches
            .get_one::<Constellation>("constellation")
            .copied()
            .unwrap_or_default()
    }
    pub fn header_policy(&self) -> HeaderPolicy {
        if self.matches.get_flag("strict") {
            HeaderPolicy::Strict
        } else {
            HeaderPolicy::Lenient
        }
    }
    pub fn tab_delimited(&self) -> bool {
        self.matches.get_flag("tab")
    }
    /// Output file path, deduced from the input path when not customized
    pub fn output_path(&self, input: &Path) -> PathBuf {
        if let Some(path) = self.matches.get_one::<PathBuf>("output") {
            return path.clone();
        }
        output_filename(input, self.tab_delimited())
    }
}

// deduce output name, from input name
fn output_filename(input: &Path, tab: bool) -> PathBuf {
    let extension = if tab { "txt" } else { "csv" };
    let mut path = input.to_path_buf();
    // "x.obs.gz" => "x.csv"
    if path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
    {
        path.set_extension("");
    }
    path.set_extension(extension);
    path
}
