//! The HSW data model
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod grid;

pub use grid::DepthGrid;

/// A position fix of the vessel
#[derive(Debug, Clone, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Position {
    /// The time at which the fix was acquired
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    /// The latitude in degrees
    pub latitude: f64,
    /// The longitude in degrees
    pub longitude: f64,
}

impl Position {
    /// Create a new Position from the given data
    pub fn new(timestamp: OffsetDateTime, latitude: f64, longitude: f64) -> Position {
        Position {
            timestamp,
            latitude,
            longitude,
        }
    }
}

/// A single sounding within a ping
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Beam {
    /// Horizontal distance from the transducer, positive to starboard, in meters
    pub across_track: f64,
    /// Depth below the transducer in meters
    pub depth: f64,
}

impl Beam {
    /// Create a new Beam
    pub fn new(across_track: f64, depth: f64) -> Beam {
        Beam {
            across_track,
            depth,
        }
    }
}

/// A multibeam depth ping
///
/// Depths are relative to the transducer. Adding
/// `transducer_depth` brings them to the vessel's datum.
#[derive(Debug, Clone, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct DepthPing {
    /// The time at which the ping was acquired
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    /// Depth of the transducer below the datum in meters
    pub transducer_depth: f64,
    /// The soundings, ordered port to starboard
    pub beams: Vec<Beam>,
}

impl DepthPing {
    /// Create a new DepthPing from the given data
    pub fn new(timestamp: OffsetDateTime, transducer_depth: f64, beams: Vec<Beam>) -> DepthPing {
        DepthPing {
            timestamp,
            transducer_depth,
            beams,
        }
    }

    /// The number of beams in the ping
    pub fn beam_count(&self) -> usize {
        self.beams.len()
    }

    /// Whether the ping carries enough beams to say anything about spacing
    pub fn is_multibeam(&self) -> bool {
        self.beam_count() > 1
    }
}

/// A PingRecord encapsulates the records consumed by the waterfall
#[derive(Debug, Clone, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum PingRecord {
    /// A wrapper for a Position
    Position(Position),
    /// A wrapper for a DepthPing
    Depth(DepthPing),
    /// Any other datagram
    Unknown,
}

impl PingRecord {
    /// The acquisition time of the record, if it has one
    pub fn timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            PingRecord::Position(p) => Some(p.timestamp),
            PingRecord::Depth(d) => Some(d.timestamp),
            PingRecord::Unknown => None,
        }
    }
}

/// A position fix tied to the depth ping sequence
///
/// `ping_index` is the number of multibeam depth pings read before the fix.
#[derive(Debug, Clone, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct NavigationFix {
    /// Index into the ping sequence
    pub ping_index: usize,
    /// The time of the fix
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// The latitude in degrees
    pub latitude: f64,
    /// The longitude in degrees
    pub longitude: f64,
}

/// Sample spacing and extents of a file, as estimated by the first pass
#[derive(Debug, Clone, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Resolution {
    /// Mean across-track spacing between beams in meters
    pub x_resolution: f64,
    /// Mean along-track distance between pings in meters
    pub y_resolution: f64,
    /// The largest beam count of any ping
    pub beam_count: usize,
    /// The most negative (port) across-track offset
    pub left_extent: f64,
    /// The most positive (starboard) across-track offset
    pub right_extent: f64,
    /// The number of multibeam depth pings
    pub ping_count: usize,
    /// Position fixes in stream order
    pub navigation: Vec<NavigationFix>,
}

impl Resolution {
    /// The result for a file without usable pings
    pub fn empty() -> Resolution {
        Resolution {
            x_resolution: 0.0,
            y_resolution: 0.0,
            beam_count: 0,
            left_extent: 0.0,
            right_extent: 0.0,
            ping_count: 0,
            navigation: Vec::new(),
        }
    }

    /// Whether the file should be skipped
    pub fn is_empty(&self) -> bool {
        self.beam_count == 0
    }

    /// The number of along-track rows each ping should occupy
    ///
    /// This makes along-track pixels cover the same distance as
    /// across-track ones. Without navigation the along-track spacing
    /// is unknown, so pings are assumed to be as far apart as beams.
    pub fn iso_stretch_factor(&self, zoom: usize) -> f64 {
        let ratio = self.y_resolution / self.x_resolution;
        if ratio.is_finite() && ratio > 0.0 {
            ratio * zoom as f64
        } else {
            zoom as f64
        }
    }
}
