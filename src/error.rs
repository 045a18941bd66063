use thiserror::Error;

/// Errors that may rise while extracting observations.
/// All of them are fatal: parsing stops on the first one.
#[derive(Error, Debug)]
pub enum ParsingError {
    /// Non empty fixed width field that is not a number
    #[error("non numeric field [{start}..{end}]: \"{content}\"")]
    FieldDecodeError {
        start: usize,
        end: usize,
        content: String,
    },
    /// Malformed epoch marker line
    #[error("invalid epoch \"{line}\": {reason}")]
    EpochParseError { line: String, reason: &'static str },
    /// Non numeric satellite identifier
    #[error("invalid satellite identifier in \"{0}\"")]
    SatelliteParseError(String),
    /// Satellite line encountered prior any epoch marker
    #[error("satellite line \"{0}\" preceding any epoch")]
    OrphanSatelliteLineError(String),
    /// Header terminator never found (strict header policy)
    #[error("header terminator \"END OF HEADER\" not found")]
    MissingHeaderTerminator,
    /// Line source failure
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
}
