use crate::metadata::{Orientation, Position, Record};

/// A drive along a gently curving street, one record every few metres.
pub fn survey_track(len: usize) -> Vec<Record> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            Record {
                index: i as u64,
                position: Position {
                    longitude: 7.56 + t * 4.0e-5 + (t * 0.3).sin() * 1.0e-5,
                    latitude: 51.44 + t * 2.5e-5,
                    height: 60.0 + (t * 0.7).cos() * 2.0,
                },
                orientation: Orientation {
                    heading: (t * 3.0) % 360.0,
                    pitch: 0.0,
                    roll: 0.0,
                },
                file_name: format!("img_{i:06}.jpg"),
                original: None,
            }
        })
        .collect()
}
