use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SliceDirection {
    Outbound,
    Inbound,
}

/// One physical flight leg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightSegment {
    pub carrier_code: String,
    pub flight_number: String,
    pub from_iata: String,
    pub to_iata: String,
    pub depart_at: DateTime<Utc>,
    pub arrive_at: DateTime<Utc>,
    pub duration_minutes: u32,
}

/// Ordered segments flown in one direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightSlice {
    pub direction: SliceDirection,
    pub segments: Vec<FlightSegment>,
    pub total_duration_minutes: u32,
    pub stops: u32,
}

impl FlightSlice {
    pub fn new(direction: SliceDirection, segments: Vec<FlightSegment>) -> Self {
        let total_duration_minutes = total_duration(&segments);
        let stops = segments.len().saturating_sub(1) as u32;
        Self {
            direction,
            segments,
            total_duration_minutes,
            stops,
        }
    }

    pub fn first_carrier(&self) -> Option<&str> {
        self.segments.first().map(|s| s.carrier_code.as_str())
    }

    /// Indices `i` where segment `i` does not depart from where segment `i - 1` landed.
    pub fn broken_connections(&self) -> Vec<usize> {
        self.segments
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0].to_iata != pair[1].from_iata)
            .map(|(i, _)| i + 1)
            .collect()
    }
}

/// Flying time plus layovers. Overlapping timestamps count as zero layover.
fn total_duration(segments: &[FlightSegment]) -> u32 {
    let flying: u32 = segments.iter().map(|s| s.duration_minutes).sum();
    let layovers: i64 = segments
        .windows(2)
        .map(|pair| (pair[1].depart_at - pair[0].arrive_at).num_minutes().max(0))
        .sum();
    flying + layovers as u32
}
