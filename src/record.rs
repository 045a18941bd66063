//! Extracted observations
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [ObservationRecord] is one satellite observation, at one epoch.
/// Blank RINEX fields are absent measurements.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationRecord {
    /// Elapsed seconds since midnight, of the epoch this observation belongs to
    pub time_seconds: f64,
    /// Satellite number, within the selected constellation
    pub satellite_id: u8,
    /// Pseudo range (C1C)
    pub pseudorange: Option<f64>,
    /// Carrier phase (L1C)
    pub carrier_phase: Option<f64>,
    /// Doppler shift (D1C)
    pub doppler: Option<f64>,
    /// Signal strength (S1C)
    pub signal_strength: Option<f64>,
}

impl ObservationRecord {
    /// Table columns, in the order downstream consumers expect them
    pub const COLUMNS: [&'static str; 6] = [
        "Time_seconds",
        "SatelliteID",
        "C1C",
        "L1C",
        "D1C",
        "S1C",
    ];

    /// Observation channels, in column order
    pub fn channels(&self) -> [Option<f64>; 4] {
        [
            self.pseudorange,
            self.carrier_phase,
            self.doppler,
            self.signal_strength,
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn channel_order() {
        let record = ObservationRecord {
            time_seconds: 15548.0,
            satellite_id: 5,
            pseudorange: Some(23638547.123),
            carrier_phase: Some(124200311.456),
            doppler: None,
            signal_strength: Some(38.2),
        };
        assert_eq!(
            record.channels(),
            [Some(23638547.123), Some(124200311.456), None, Some(38.2)]
        );
        assert_eq!(&ObservationRecord::COLUMNS[2..], &["C1C", "L1C", "D1C", "S1C"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde() {
        let record = ObservationRecord {
            time_seconds: 60.0,
            satellite_id: 12,
            pseudorange: None,
            carrier_phase: Some(1.5),
            doppler: None,
            signal_strength: None,
        };
        let content = serde_json::to_string(&record).unwrap();
        assert_eq!(
            content,
            "{\"time_seconds\":60.0,\"satellite_id\":12,\"pseudorange\":null,\"carrier_phase\":1.5,\"doppler\":null,\"signal_strength\":null}"
        );
    }
}
