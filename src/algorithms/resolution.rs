//! Estimating sample spacing from a ping stream
//!
//! The across-track resolution is the average spacing between beams.
//! The along-track resolution is the distance travelled between position
//! fixes divided by the number of pings.
use crate::error::Result;
use crate::geodesy::great_circle_distance;
use crate::model::{Beam, NavigationFix, PingRecord, Resolution};
use crate::source::PingSource;

/// Scan the whole stream once and estimate its resolution
///
/// Only depth pings with more than one beam take part. A stream with
/// none of them yields [`Resolution::empty`].
pub fn estimate_resolution<S: PingSource + ?Sized>(source: &mut S) -> Result<Resolution> {
    let mut across_sum = 0.0;
    let mut ping_count = 0;
    let mut beam_count = 0;
    let mut left_extent = f64::INFINITY;
    let mut right_extent = f64::NEG_INFINITY;
    let mut distance_travelled = 0.0;
    let mut previous: Option<(f64, f64)> = None;
    let mut navigation = Vec::new();

    while let Some(rec) = source.next_record() {
        match rec? {
            PingRecord::Position(p) => {
                if let Some((lat, lon)) = previous {
                    distance_travelled += great_circle_distance(lat, lon, p.latitude, p.longitude);
                }
                previous = Some((p.latitude, p.longitude));
                navigation.push(NavigationFix {
                    ping_index: ping_count,
                    timestamp: p.timestamp,
                    latitude: p.latitude,
                    longitude: p.longitude,
                });
            }
            PingRecord::Depth(ping) if ping.is_multibeam() => {
                across_sum += mean_spacing(&ping.beams);
                let first = ping.beams[0].across_track;
                let last = ping.beams[ping.beam_count() - 1].across_track;
                left_extent = left_extent.min(first);
                right_extent = right_extent.max(last);
                beam_count = beam_count.max(ping.beam_count());
                ping_count += 1;
            }
            _ => {}
        }
    }

    if ping_count == 0 {
        return Ok(Resolution::empty());
    }

    let resolution = Resolution {
        x_resolution: across_sum / ping_count as f64,
        y_resolution: distance_travelled / ping_count as f64,
        beam_count,
        left_extent,
        right_extent,
        ping_count,
        navigation,
    };
    log::debug!(
        "{} pings, {} position fixes, {:.1} m travelled",
        ping_count,
        resolution.navigation.len(),
        distance_travelled
    );
    Ok(resolution)
}

// Mean of successive differences, which telescopes to (last - first) / (n - 1)
fn mean_spacing(beams: &[Beam]) -> f64 {
    let n = beams.len();
    (beams[n - 1].across_track - beams[0].across_track) / (n - 1) as f64
}
