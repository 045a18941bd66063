//! Delimited table production
use crate::Error;
use csv::{Writer, WriterBuilder};
use rinex_obs::prelude::ObservationRecord;
use std::{io::Write, path::Path};

/*
 * Absent observations are left blank.
 * Whole values keep one decimal, like any other value of the column.
 */
fn format_channel(value: Option<f64>) -> String {
    match value {
        Some(value) if value.fract() == 0.0 => format!("{:.1}", value),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

fn builder(tab: bool) -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.delimiter(if tab { b'\t' } else { b',' });
    builder
}

/// Writes all records, header first, in [ObservationRecord::COLUMNS] order
pub fn write_records<W: Write>(
    w: &mut Writer<W>,
    records: &[ObservationRecord],
) -> Result<(), Error> {
    w.write_record(ObservationRecord::COLUMNS)?;
    for record in records {
        let mut row = Vec::with_capacity(ObservationRecord::COLUMNS.len());
        row.push(record.time_seconds.to_string());
        row.push(record.satellite_id.to_string());
        for channel in record.channels() {
            row.push(format_channel(channel));
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Writes all records into a new file
pub fn write_obs_records<P: AsRef<Path>>(
    path: P,
    records: &[ObservationRecord],
    tab: bool,
) -> Result<(), Error> {
    let mut w = builder(tab).from_path(path)?;
    write_records(&mut w, records)
}
