/// Build a Kongsberg .all datagram with a fixed header.
///
/// `millis` is the time of day in milliseconds.
pub fn datagram(kind: u8, millis: u32, body: &[u8]) -> Vec<u8> {
    let length = (16 + body.len() + 3) as u32;
    let mut v = Vec::new();
    v.extend(length.to_le_bytes());
    v.push(0x02);
    v.push(kind);
    v.extend(2040u16.to_le_bytes());
    v.extend(20220101u32.to_le_bytes());
    v.extend(millis.to_le_bytes());
    v.extend(0u16.to_le_bytes());
    v.extend(100u16.to_le_bytes());
    v.extend(body);
    v.push(0x03);
    v.extend(0u16.to_le_bytes());
    v
}

/// A position datagram without an input sentence.
pub fn position(millis: u32, lat: f64, lon: f64) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(((lat * 20_000_000.0).round() as i32).to_le_bytes());
    body.extend(((lon * 10_000_000.0).round() as i32).to_le_bytes());
    body.extend([0u8; 8]);
    body.push(0x81);
    body.push(0);
    datagram(b'P', millis, &body)
}

/// An XYZ 88 datagram with the given (across-track, depth) soundings.
pub fn xyz(millis: u32, transducer_depth: f32, beams: &[(f32, f32)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(0u16.to_le_bytes());
    body.extend(15_000u16.to_le_bytes());
    body.extend(transducer_depth.to_le_bytes());
    body.extend((beams.len() as u16).to_le_bytes());
    body.extend((beams.len() as u16).to_le_bytes());
    body.extend(1000.0f32.to_le_bytes());
    body.extend([0u8; 4]);
    for &(across, depth) in beams {
        body.extend(depth.to_le_bytes());
        body.extend(across.to_le_bytes());
        body.extend(0.0f32.to_le_bytes());
        body.extend([0u8; 8]);
    }
    body.push(0);
    datagram(b'X', millis, &body)
}

/// A survey line heading north at about 2 m per ping over a sloping seafloor.
///
/// Every ping has five beams at -40, -20, 0, 20 and 40 m.
pub fn survey_line(pings: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for i in 0..pings {
        let millis = 36_000_000 + 1000 * i as u32;
        bytes.extend(position(millis, 0.000018 * i as f64, 0.0));
        let beams: Vec<(f32, f32)> = [-40.0f32, -20.0, 0.0, 20.0, 40.0]
            .iter()
            .map(|&x| (x, 100.0 + 0.1 * x + (i % 7) as f32))
            .collect();
        bytes.extend(xyz(millis + 500, 3.0, &beams));
    }
    bytes
}

/// A survey line over a perfectly flat seafloor.
pub fn flat_line(pings: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for i in 0..pings {
        let millis = 36_000_000 + 1000 * i as u32;
        bytes.extend(position(millis, 0.000018 * i as f64, 0.0));
        let beams: Vec<(f32, f32)> = [-40.0f32, -20.0, 0.0, 20.0, 40.0]
            .iter()
            .map(|&x| (x, 100.0))
            .collect();
        bytes.extend(xyz(millis + 500, 0.0, &beams));
    }
    bytes
}
