//! RTKLIB convbin invocation, to produce Observation RINEX out of raw u-blox logs
use crate::Error;

use std::{
    fs::{create_dir_all, File},
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
    thread,
    time::{Duration, Instant},
};

/// RINEX revision we request and expect
pub const RINEX_VERSION: &str = "3.02";

/// Conversion process polling period
const POLLING_PERIOD: Duration = Duration::from_millis(100);

/// External u-blox to RINEX converter
#[derive(Debug, Clone)]
pub struct Convbin {
    /// convbin binary
    binary: PathBuf,
    /// Maximal conversion duration
    timeout: Duration,
}

impl Convbin {
    pub fn new<P: AsRef<Path>>(binary: P) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
            timeout: Duration::from_secs(120),
        }
    }
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut s = self.clone();
        s.timeout = timeout;
        s
    }
    /// Conversion [Command]: u-blox input, RINEX 3.02 output
    /// including doppler and signal strength observations.
    pub fn command(&self, ubx: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(ubx)
            .args(["-r", "ubx"])
            .args(["-v", RINEX_VERSION])
            .args(["-od", "-os"])
            .arg("-d")
            .arg(output_dir);
        cmd
    }
    /// Converts given u-blox log, returns the path to the generated
    /// Observation RINEX file.
    pub fn convert(&self, ubx: &Path, output_dir: &Path) -> Result<PathBuf, Error> {
        create_dir_all(output_dir)?;

        let mut cmd = self.command(ubx, output_dir);
        info!("running {:?}", cmd);

        let mut child = cmd.spawn()?;
        let status = self.wait(&mut child)?;
        if !status.success() {
            return Err(Error::ConvbinFailure(status.code()));
        }

        let obs = observation_file(ubx, output_dir)?;
        info!("\"{}\" generated", obs.display());

        if !rinex_version_matches(&obs, RINEX_VERSION)? {
            warn!(
                "\"{}\" does not look like RINEX {}",
                obs.display(),
                RINEX_VERSION
            );
        }
        Ok(obs)
    }
    /*
     * Waits for conversion completion, kills the process on timeout
     */
    fn wait(&self, child: &mut std::process::Child) -> Result<ExitStatus, Error> {
        let t0 = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                debug!("convbin completed in {:?}", t0.elapsed());
                return Ok(status);
            }
            if t0.elapsed() > self.timeout {
                child.kill()?;
                let _ = child.wait();
                return Err(Error::ConvbinTimeout(self.timeout.as_secs()));
            }
            thread::sleep(POLLING_PERIOD);
        }
    }
}

/// Locates the Observation RINEX file generated out of given log:
/// same file stem, with .obs extension, or any other .obs file otherwise.
pub fn observation_file(ubx: &Path, output_dir: &Path) -> Result<PathBuf, Error> {
    if let Some(stem) = ubx.file_stem() {
        let expected = output_dir.join(stem).with_extension("obs");
        if expected.exists() {
            return Ok(expected);
        }
    }
    for entry in output_dir.read_dir()? {
        let path = entry?.path();
        let is_obs = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("obs"))
            .unwrap_or(false);
        if is_obs {
            return Ok(path);
        }
    }
    Err(Error::MissingObservationFile(output_dir.to_path_buf()))
}

/// Returns true if the first line (RINEX VERSION / TYPE)
/// of given file announces this revision.
pub fn rinex_version_matches(path: &Path, version: &str) -> std::io::Result<bool> {
    let fd = File::open(path)?;
    let mut first = String::new();
    BufReader::new(fd).read_line(&mut first)?;
    Ok(first.contains(version))
}
