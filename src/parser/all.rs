//! Parsing Kongsberg .all files
//!
//! Only the datagrams needed to build a waterfall are decoded: position
//! (`P`), XYZ 88 (`X`) and the older depth datagram (`D`). Everything else
//! is skipped using its length prefix.
use crate::error::{Error, Result};
use crate::model::{Beam, DepthPing, PingRecord, Position};
use crate::source::PingSource;
use binrw::io::{self, SeekFrom};
use binrw::{binread, BinRead, BinResult};
use std::io::BufReader;
use std::path::Path;
use time::{Date, Duration, Month, OffsetDateTime};

const STX: u8 = 0x02;
const ETX: u8 = 0x03;

/// A datagram in an .all file
///
/// The length prefix counts every byte from the start
/// marker up to and including the checksum.
#[binread]
#[br(little)]
#[derive(Debug, PartialEq)]
pub struct Datagram {
    #[br(temp, assert(length >= 19, "datagram length {} is too short", length))]
    length: u32,
    #[br(temp, assert(start == STX, "missing start marker, found {:#04x}", start))]
    start: u8,
    datagram_type: u8,
    em_model: u16,
    date: u32,
    time: u32,
    counter: u16,
    serial_number: u16,
    #[br(args {datagram_type, em_model}, pad_size_to = length - 19)]
    body: DatagramBody,
    #[br(temp, assert(end == ETX, "missing end marker, found {:#04x}", end))]
    end: u8,
    checksum: u16,
}

impl Datagram {
    /// The datagram type identifier, e.g. `b'P'`
    pub fn datagram_type(&self) -> u8 {
        self.datagram_type
    }

    /// The EM series model number of the echosounder
    pub fn em_model(&self) -> u16 {
        self.em_model
    }

    /// The serial number of the echosounder
    pub fn serial_number(&self) -> u16 {
        self.serial_number
    }

    /// The decoded body of the datagram
    pub fn body(&self) -> &DatagramBody {
        &self.body
    }

    /// The time stamped in the datagram header
    ///
    /// The header stores the date as `YYYYMMDD` and the time as
    /// milliseconds since midnight.
    pub fn timestamp(&self) -> Result<OffsetDateTime> {
        let year = (self.date / 10_000) as i32;
        let month = Month::try_from(((self.date / 100) % 100) as u8)?;
        let day = (self.date % 100) as u8;
        let date = Date::from_calendar_date(year, month, day)?;
        Ok(date.midnight().assume_utc() + Duration::milliseconds(i64::from(self.time)))
    }
}

/// The datagram types understood by the reader
#[binread]
#[br(little, import {datagram_type: u8, em_model: u16})]
#[derive(Debug, PartialEq)]
pub enum DatagramBody {
    /// A position fix
    #[br(pre_assert(datagram_type == b'P'))]
    Position(PositionDatagram),
    /// Soundings from EM 2000 and later systems
    #[br(pre_assert(datagram_type == b'X'))]
    Xyz88(XyzDatagram),
    /// Soundings from older systems
    #[br(pre_assert(datagram_type == b'D'))]
    Depth(#[br(args {em_model})] DepthDatagram),
    /// Any other datagram.
    ///
    /// A known type whose body does not decode is an error, not `Unknown`.
    #[br(pre_assert(datagram_type != b'P' && datagram_type != b'X' && datagram_type != b'D'))]
    Unknown,
}

/// Position datagram (`P`)
#[binread]
#[br(little)]
#[derive(Debug, PartialEq)]
pub struct PositionDatagram {
    latitude: i32,
    longitude: i32,
    fix_quality: u16,
    speed_over_ground: u16,
    course: u16,
    heading: u16,
    position_system: u8,
    #[br(temp)]
    input_length: u8,
    #[br(count = input_length)]
    input_datagram: Vec<u8>,
}

impl PositionDatagram {
    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        f64::from(self.latitude) / 20_000_000.0
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        f64::from(self.longitude) / 10_000_000.0
    }

    /// Speed over ground in m/s
    pub fn speed_over_ground(&self) -> f64 {
        f64::from(self.speed_over_ground) * 0.01
    }

    /// Whether this fix came from the active positioning system
    pub fn is_active(&self) -> bool {
        self.position_system & 0x80 != 0
    }

    /// The raw sentence received from the positioning system
    pub fn input_datagram(&self) -> &[u8] {
        &self.input_datagram
    }
}

/// XYZ 88 datagram (`X`)
#[binread]
#[br(little)]
#[derive(Debug, PartialEq)]
pub struct XyzDatagram {
    heading: u16,
    sound_speed: u16,
    transducer_depth: f32,
    #[br(temp)]
    beam_count: u16,
    valid_detections: u16,
    sampling_frequency: f32,
    #[br(pad_after = 3)]
    scanning_info: u8,
    #[br(count = beam_count)]
    beams: Vec<XyzBeam>,
}

/// A single sounding of an XYZ 88 datagram
#[binread]
#[br(little)]
#[derive(Debug, PartialEq)]
pub struct XyzBeam {
    depth: f32,
    across_track: f32,
    along_track: f32,
    detection_window_length: u16,
    quality_factor: u8,
    incidence_angle_adjustment: i8,
    detection_info: u8,
    realtime_cleaning: i8,
    reflectivity: i16,
}

impl XyzBeam {
    /// Bit 7 of the detection info flags an invalid detection
    pub fn is_valid(&self) -> bool {
        self.detection_info & 0x80 == 0
    }
}

impl XyzDatagram {
    /// Depth of the transmit transducer in meters
    pub fn transducer_depth(&self) -> f64 {
        f64::from(self.transducer_depth)
    }

    /// The valid soundings, port to starboard
    pub fn beams(&self) -> Vec<Beam> {
        self.beams
            .iter()
            .filter(|b| b.is_valid())
            .map(|b| Beam::new(f64::from(b.across_track), f64::from(b.depth)))
            .collect()
    }
}

/// Depth datagram (`D`)
#[binread]
#[br(little, import {em_model: u16})]
#[derive(Debug, PartialEq)]
pub struct DepthDatagram {
    heading: u16,
    sound_speed: u16,
    transducer_depth: u16,
    max_beams: u8,
    #[br(temp)]
    valid_beams: u8,
    z_resolution: u8,
    xy_resolution: u8,
    sampling_rate: u16,
    #[br(count = valid_beams)]
    beams: Vec<DepthBeam>,
    transducer_depth_offset_multiplier: i8,
    #[br(calc = em_model == 120 || em_model == 300)]
    unsigned_depths: bool,
}

/// A single sounding of a depth datagram
#[binread]
#[br(little)]
#[derive(Debug, PartialEq)]
pub struct DepthBeam {
    depth: i16,
    across_track: i16,
    along_track: i16,
    depression_angle: i16,
    azimuth_angle: u16,
    range: u16,
    quality_factor: u8,
    detection_window_length: u8,
    reflectivity: i8,
    beam_number: u8,
}

impl DepthDatagram {
    /// Depth of the transducer in meters
    pub fn transducer_depth(&self) -> f64 {
        f64::from(self.transducer_depth) * 0.01
            + f64::from(self.transducer_depth_offset_multiplier) * 655.36
    }

    /// The soundings, port to starboard
    ///
    /// EM 120 and EM 300 store depths unsigned.
    pub fn beams(&self) -> Vec<Beam> {
        let z = f64::from(self.z_resolution) * 0.01;
        let xy = f64::from(self.xy_resolution) * 0.01;
        self.beams
            .iter()
            .map(|b| {
                let depth = if self.unsigned_depths {
                    f64::from(b.depth as u16)
                } else {
                    f64::from(b.depth)
                };
                Beam::new(f64::from(b.across_track) * xy, depth * z)
            })
            .collect()
    }
}

impl TryFrom<Datagram> for PingRecord {
    type Error = Error;

    fn try_from(dgm: Datagram) -> Result<Self> {
        let rec = match &dgm.body {
            DatagramBody::Position(p) => {
                PingRecord::Position(Position::new(dgm.timestamp()?, p.latitude(), p.longitude()))
            }
            DatagramBody::Xyz88(x) => PingRecord::Depth(DepthPing::new(
                dgm.timestamp()?,
                x.transducer_depth(),
                x.beams(),
            )),
            DatagramBody::Depth(d) => PingRecord::Depth(DepthPing::new(
                dgm.timestamp()?,
                d.transducer_depth(),
                d.beams(),
            )),
            DatagramBody::Unknown => PingRecord::Unknown,
        };
        Ok(rec)
    }
}

/// A representation of an .all file
pub struct File<T>
where
    T: io::Read + io::Seek,
{
    reader: T,
    len: u64,
    record_count: usize,
    current_timestamp: Option<OffsetDateTime>,
}

impl File<BufReader<std::fs::File>> {
    /// Open an .all file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(path.as_ref())?;
        File::new(BufReader::new(f))
    }
}

impl<T> File<T>
where
    T: io::Read + io::Seek,
{
    /// Create an .all file from a reader
    ///
    /// The datagram lengths are walked once up front to count records.
    pub fn new(mut reader: T) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        let record_count = count_datagrams(&mut reader, len)?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(File {
            reader,
            len,
            record_count,
            current_timestamp: None,
        })
    }
}

fn count_datagrams<T: io::Read + io::Seek>(reader: &mut T, len: u64) -> io::Result<usize> {
    let mut pos = reader.seek(SeekFrom::Start(0))?;
    let mut count = 0;
    let mut prefix = [0u8; 4];
    while pos + 4 <= len {
        reader.read_exact(&mut prefix)?;
        let length = u64::from(u32::from_le_bytes(prefix));
        if length == 0 {
            break;
        }
        count += 1;
        pos = reader.seek(SeekFrom::Start(pos + 4 + length))?;
    }
    Ok(count)
}

impl<T: io::Read + io::Seek> Iterator for File<T> {
    type Item = BinResult<Datagram>;

    // A clean end of file is only allowed on a datagram boundary;
    // anything cut short is reported as an error.
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.stream_position() {
            Ok(pos) if pos >= self.len => None,
            Ok(_) => Some(Datagram::read(&mut self.reader)),
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<T: io::Read + io::Seek> PingSource for File<T> {
    fn next_record(&mut self) -> Option<Result<PingRecord>> {
        let dgm = match self.next()? {
            Ok(dgm) => dgm,
            Err(e) => return Some(Err(e.into())),
        };
        if let Ok(ts) = dgm.timestamp() {
            self.current_timestamp = Some(ts);
        }
        Some(PingRecord::try_from(dgm))
    }

    fn estimated_record_count(&self) -> usize {
        self.record_count
    }

    fn current_timestamp(&self) -> Option<OffsetDateTime> {
        self.current_timestamp
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.current_timestamp = None;
        Ok(())
    }
}
