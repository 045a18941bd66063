//! Observation RINEX epoch scanner
use crate::{
    epoch::{Epoch, EPOCH_MARKER},
    error::ParsingError,
    field::{decode_fields, slice, OBSERVATION_FIELDS},
    record::ObservationRecord,
};

use gnss_rs::prelude::Constellation;

use std::{
    fmt::Write,
    io::{BufRead, Lines},
    iter::Fuse,
    str::FromStr,
    vec::IntoIter,
};

#[cfg(feature = "log")]
use log::{debug, warn};

/// Header section terminator
pub const HEADER_END_MARKER: &str = "END OF HEADER";

/// Behavior when the header terminator is never found
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// The whole content is scanned from its first line,
    /// header lines are then interpreted as body lines.
    #[default]
    Lenient,
    /// Missing header terminator is a [ParsingError::MissingHeaderTerminator]
    Strict,
}

/// [Parser] settings
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ParserOptions {
    /// Retained [Constellation], GPS by default
    pub constellation: Constellation,
    /// [HeaderPolicy], lenient by default
    pub header_policy: HeaderPolicy,
}

impl ParserOptions {
    /// Copies and returns [ParserOptions] retaining this [Constellation] only.
    /// Constellations that do not have a single letter RINEX code
    /// will not match any satellite line.
    pub fn with_constellation(&self, constellation: Constellation) -> Self {
        let mut s = *self;
        s.constellation = constellation;
        s
    }
    /// Copies and returns [ParserOptions] with updated [HeaderPolicy]
    pub fn with_header_policy(&self, policy: HeaderPolicy) -> Self {
        let mut s = *self;
        s.header_policy = policy;
        s
    }
    /// Single letter RINEX code of the retained [Constellation]
    pub(crate) fn constellation_code(&self) -> Option<char> {
        let mut code = String::with_capacity(1);
        write!(code, "{:x}", self.constellation).ok()?;
        code.chars().next()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    SeekingHeader,
    ScanningBody,
}

/// [Parser] streams [ObservationRecord]s out of Observation RINEX lines.
/// It reads its line source once, top to bottom, and only keeps the
/// current [Epoch] in memory (and header lines, until the header terminator
/// is found). The first error stops the parser.
/// ```
/// use rinex_obs::prelude::{Parser, ParserOptions};
///
/// let content = "     3.02           OBSERVATION DATA    M                   RINEX VERSION / TYPE
///                                                             END OF HEADER
/// > 2024 02 14 04 19 08.0000000  0  2
/// G05   23638547.123  124200311.456        45.600         38.200
/// R07   21000000.000";
///
/// let lines = content.lines().map(|line| Ok(line.to_string()));
/// let records = Parser::new(lines, ParserOptions::default())
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].time_seconds, 15548.0);
/// assert_eq!(records[0].satellite_id, 5);
/// ```
pub struct Parser<I: Iterator<Item = std::io::Result<String>>> {
    lines: Fuse<I>,
    opts: ParserOptions,
    code: Option<char>,
    state: State,
    /// Currently active [Epoch]
    epoch: Option<Epoch>,
    /// Lines to scan again, in lenient mode
    replay: IntoIter<String>,
    done: bool,
}

impl<R: BufRead> Parser<Lines<R>> {
    /// Builds a [Parser] from readable content
    pub fn from_reader(reader: R, opts: ParserOptions) -> Self {
        Self::new(reader.lines(), opts)
    }
}

impl<I: Iterator<Item = std::io::Result<String>>> Parser<I> {
    /// Builds a new [Parser] from a line source
    pub fn new(lines: I, opts: ParserOptions) -> Self {
        Self {
            opts,
            lines: lines.fuse(),
            code: opts.constellation_code(),
            state: State::SeekingHeader,
            epoch: None,
            replay: Vec::new().into_iter(),
            done: false,
        }
    }

    /// Currently active [Epoch], if any
    pub fn epoch(&self) -> Option<Epoch> {
        self.epoch
    }

    /*
     * Consumes the header section.
     * In lenient mode, header lines are buffered so they
     * can be scanned again when the terminator is missing.
     */
    fn seek_header(&mut self) -> Result<(), ParsingError> {
        let mut header = Vec::<String>::new();
        for line in self.lines.by_ref() {
            let line = line?;
            if line.contains(HEADER_END_MARKER) {
                self.state = State::ScanningBody;
                return Ok(());
            }
            if self.opts.header_policy == HeaderPolicy::Lenient {
                header.push(line);
            }
        }
        match self.opts.header_policy {
            HeaderPolicy::Strict => Err(ParsingError::MissingHeaderTerminator),
            HeaderPolicy::Lenient => {
                #[cfg(feature = "log")]
                warn!(
                    "\"{}\" not found: scanning {} lines from line zero",
                    HEADER_END_MARKER,
                    header.len()
                );
                self.replay = header.into_iter();
                self.state = State::ScanningBody;
                Ok(())
            },
        }
    }

    fn next_line(&mut self) -> Option<std::io::Result<String>> {
        match self.replay.next() {
            Some(line) => Some(Ok(line)),
            None => self.lines.next(),
        }
    }

    /*
     * Scans one body line, possibly producing one record
     */
    fn scan(&mut self, line: &str) -> Result<Option<ObservationRecord>, ParsingError> {
        let line = line.trim();

        if line.starts_with(EPOCH_MARKER) {
            let epoch = Epoch::from_str(line)?;
            #[cfg(feature = "log")]
            debug!("new epoch: {}", epoch);
            self.epoch = Some(epoch);
            return Ok(None);
        }

        match self.code {
            Some(code) if line.starts_with(code) => {
                parse_satellite_line(line, self.epoch.as_ref()).map(Some)
            },
            _ => Ok(None),
        }
    }
}

impl<I: Iterator<Item = std::io::Result<String>>> Iterator for Parser<I> {
    type Item = Result<ObservationRecord, ParsingError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.state == State::SeekingHeader {
            if let Err(e) = self.seek_header() {
                self.done = true;
                return Some(Err(e));
            }
        }

        loop {
            let line = match self.next_line() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                },
                None => {
                    self.done = true;
                    self.epoch = None;
                    return None;
                },
            };
            match self.scan(&line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {},
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                },
            }
        }
    }
}

impl<I: Iterator<Item = std::io::Result<String>>> std::iter::FusedIterator for Parser<I> {}

/// Parses a satellite line, which starts with a constellation code,
/// followed by the satellite number and the [OBSERVATION_FIELDS].
pub fn parse_satellite_line(
    line: &str,
    epoch: Option<&Epoch>,
) -> Result<ObservationRecord, ParsingError> {
    let satellite_id = slice(line, 1, 3)
        .and_then(|prn| prn.parse::<u8>().ok())
        .ok_or_else(|| ParsingError::SatelliteParseError(line.to_string()))?;

    let values = decode_fields(line, &OBSERVATION_FIELDS)?;

    let epoch = epoch.ok_or_else(|| ParsingError::OrphanSatelliteLineError(line.to_string()))?;

    Ok(ObservationRecord {
        time_seconds: epoch.seconds_of_day(),
        satellite_id,
        pseudorange: values[0],
        carrier_phase: values[1],
        doppler: values[2],
        signal_strength: values[3],
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(content: &str, opts: ParserOptions) -> Vec<Result<ObservationRecord, ParsingError>> {
        let lines = content.lines().map(|line| Ok(line.to_string()));
        Parser::new(lines, opts).collect()
    }

    const HEADER: &str =
        "     3.02           OBSERVATION DATA    M                   RINEX VERSION / TYPE
G    4 C1C L1C D1C S1C                                      SYS / # / OBS TYPES
                                                            END OF HEADER";

    #[test]
    fn single_record() {
        let content = format!(
            "{}
> 2024 02 14 04 19 08.0000000  0  8
G05   23638547.123  124200311.456        45.600         38.200",
            HEADER
        );
        let records = parse(&content, ParserOptions::default());
        assert_eq!(records.len(), 1);
        let record = records[0].as_ref().unwrap();
        assert_eq!(
            *record,
            ObservationRecord {
                time_seconds: 15548.0,
                satellite_id: 5,
                pseudorange: Some(23638547.123),
                carrier_phase: Some(124200311.456),
                doppler: Some(45.6),
                signal_strength: Some(38.2),
            }
        );
    }

    #[test]
    fn constellation_filter() {
        let content = format!(
            "{}
> 2024 02 14 04 19 08.0000000  0  3
G05   23638547.123  124200311.456        45.600         38.200
R07   21000000.000  112000000.000        12.000         40.000
E11   25000000.000",
            HEADER
        );
        let gps = parse(&content, ParserOptions::default());
        assert_eq!(gps.len(), 1);
        assert_eq!(gps[0].as_ref().unwrap().satellite_id, 5);

        let glo = parse(
            &content,
            ParserOptions::default().with_constellation(Constellation::Glonass),
        );
        assert_eq!(glo.len(), 1);
        let record = glo[0].as_ref().unwrap();
        assert_eq!(record.satellite_id, 7);
        assert_eq!(record.doppler, Some(12.0));

        let gal = parse(
            &content,
            ParserOptions::default().with_constellation(Constellation::Galileo),
        );
        assert_eq!(gal.len(), 1);
        let record = gal[0].as_ref().unwrap();
        assert_eq!(record.satellite_id, 11);
        assert_eq!(record.carrier_phase, None);
    }

    #[test]
    fn empty_epochs() {
        let content = format!(
            "{}
> 2024 02 14 04 19 08.0000000  0  0
> 2024 02 14 04 19 09.0000000  0  1
G10   22000000.000",
            HEADER
        );
        let records = parse(&content, ParserOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().time_seconds, 15549.0);
    }

    #[test]
    fn orphan_satellite_line() {
        let content = format!(
            "{}
G05   23638547.123  124200311.456        45.600         38.200
> 2024 02 14 04 19 08.0000000  0  1
G05   23638547.123",
            HEADER
        );
        let records = parse(&content, ParserOptions::default());
        assert_eq!(records.len(), 1);
        assert!(matches!(
            records[0],
            Err(ParsingError::OrphanSatelliteLineError(_))
        ));
    }

    #[test]
    fn first_error_stops_parsing() {
        let content = format!(
            "{}
> 2024 02 14 04 19 08.0000000  0  2
G05   23638547.123
Gxx   23638547.123
G06   23638547.123",
            HEADER
        );
        let records = parse(&content, ParserOptions::default());
        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(matches!(
            records[1],
            Err(ParsingError::SatelliteParseError(_))
        ));
    }

    #[test]
    fn corrupt_epoch() {
        let content = format!(
            "{}
> 2024 02 14 04 19 08.0000000  0  1
G05   23638547.123
> 2024 02 14
G06   23638547.123",
            HEADER
        );
        let records = parse(&content, ParserOptions::default());
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[1],
            Err(ParsingError::EpochParseError { .. })
        ));
    }

    #[test]
    fn corrupt_field() {
        let content = format!(
            "{}
> 2024 02 14 04 19 08.0000000  0  1
G05   23638547.123  12420031?.456",
            HEADER
        );
        let records = parse(&content, ParserOptions::default());
        assert!(matches!(
            records[..],
            [Err(ParsingError::FieldDecodeError { start: 19, end: 35, .. })]
        ));
    }

    #[test]
    fn missing_header_terminator() {
        let content = "> 2024 02 14 04 19 08.0000000  0  1
G05   23638547.123";

        let records = parse(content, ParserOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().pseudorange, Some(23638547.123));

        let records = parse(
            content,
            ParserOptions::default().with_header_policy(HeaderPolicy::Strict),
        );
        assert!(matches!(
            records[..],
            [Err(ParsingError::MissingHeaderTerminator)]
        ));
    }

    #[test]
    fn header_lines_are_not_data() {
        // "G    4 C1C .." would be a satellite line, if scanned
        let records = parse(HEADER, ParserOptions::default());
        assert!(records.is_empty());
    }

    #[test]
    fn satellite_line() {
        let epoch = Epoch::new(2024, 2, 14, 0, 1, 2).unwrap();
        let record = parse_satellite_line("G2", Some(&epoch)).unwrap();
        assert_eq!(record.satellite_id, 2);
        assert_eq!(record.time_seconds, 62.0);
        assert_eq!(record.channels(), [None; 4]);

        assert!(matches!(
            parse_satellite_line("G", Some(&epoch)),
            Err(ParsingError::SatelliteParseError(_))
        ));
        assert!(matches!(
            parse_satellite_line("G1", None),
            Err(ParsingError::OrphanSatelliteLineError(_))
        ));
    }

    #[test]
    fn io_error() {
        let lines = vec![
            Ok(HEADER.lines().last().unwrap().to_string()),
            Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid utf-8")),
            Ok("> 2024 02 14 04 19 08.0000000  0  1".to_string()),
        ];
        let mut parser = Parser::new(lines.into_iter(), ParserOptions::default());
        assert!(matches!(parser.next(), Some(Err(ParsingError::IoError(_)))));
        assert!(parser.next().is_none());
    }
}
