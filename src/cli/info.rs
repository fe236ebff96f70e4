//! Print info about a sonar file

use crate::algorithms::resolution::estimate_resolution;
use crate::parser::all;
use crate::source::PingSource;
use std::io::{stdout, Write};

/// Print the estimated resolution of an .all file
pub fn info<P: AsRef<std::path::Path>>(path: P, json: bool) -> crate::Result<()> {
    let mut file = all::File::open(path.as_ref())?;
    let records = file.estimated_record_count();
    let res = estimate_resolution(&mut file)?;

    let mut writer = stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut writer, &res).map_err(std::io::Error::from)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "File: {}", path.as_ref().display())?;
    writeln!(writer, "Format: ALL")?;
    writeln!(writer, "Datagrams: {}", records)?;
    writeln!(writer, "Multibeam pings: {}", res.ping_count)?;
    writeln!(writer, "Position fixes: {}", res.navigation.len())?;
    writeln!(writer, "Beam count: {}", res.beam_count)?;
    writeln!(writer, "Across-track resolution: {:.2} m", res.x_resolution)?;
    writeln!(writer, "Along-track resolution: {:.2} m", res.y_resolution)?;
    writeln!(
        writer,
        "Swath: {:.2} m to {:.2} m",
        res.left_extent, res.right_extent
    )?;
    if let (Some(first), Some(last)) = (res.navigation.first(), res.navigation.last()) {
        writeln!(writer, "Start date: {}", first.timestamp)?;
        writeln!(writer, "End date: {}", last.timestamp)?;
    }
    Ok(())
}
