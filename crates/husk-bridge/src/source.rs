//! Byte sources behind stream handles.

use crate::error::BridgeError;
use std::io::{self, Read};

/// The outcome of a single read attempt.
#[derive(Debug)]
pub struct ByteRead {
    /// Underlying units consumed by this attempt, on success or failure.
    pub units: usize,
    pub result: Result<u8, BridgeError>,
}

impl ByteRead {
    pub fn byte(byte: u8, units: usize) -> Self {
        Self {
            units,
            result: Ok(byte),
        }
    }

    pub fn failed(units: usize, error: BridgeError) -> Self {
        Self {
            units,
            result: Err(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Something that produces logical bytes one at a time.
///
/// End of input is reported as [`BridgeError::EndOfStream`] through the
/// same failure path as every other error.
pub trait ByteSource {
    fn read_byte(&mut self) -> ByteRead;
}

/// Read one raw unit, retrying on `Interrupted`. `Ok(None)` is end of input.
fn read_unit<R: Read>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Passes bytes through unchanged, one unit per byte.
pub struct ReaderSource<R> {
    inner: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_byte(&mut self) -> ByteRead {
        match read_unit(&mut self.inner) {
            Ok(Some(byte)) => ByteRead::byte(byte, 1),
            Ok(None) => ByteRead::failed(0, BridgeError::EndOfStream),
            Err(e) => ByteRead::failed(0, e.into()),
        }
    }
}

/// Narrows UTF-8 input to Latin-1.
///
/// Code points up to U+00FF come out as one byte each; a two-unit sequence
/// reports `units == 2`. Anything wider, or malformed, is a decode error that
/// still reports the units it consumed.
pub struct Latin1Source<R> {
    inner: R,
}

impl<R: Read> Latin1Source<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> ByteSource for Latin1Source<R> {
    fn read_byte(&mut self) -> ByteRead {
        let lead = match read_unit(&mut self.inner) {
            Ok(Some(lead)) => lead,
            Ok(None) => return ByteRead::failed(0, BridgeError::EndOfStream),
            Err(e) => return ByteRead::failed(0, e.into()),
        };

        match lead {
            0x00..=0x7f => ByteRead::byte(lead, 1),
            0xc2 | 0xc3 => match read_unit(&mut self.inner) {
                Ok(Some(cont)) if cont & 0xc0 == 0x80 => {
                    ByteRead::byte(((lead & 0x1f) << 6) | (cont & 0x3f), 2)
                }
                Ok(Some(cont)) => ByteRead::failed(
                    2,
                    BridgeError::Decode {
                        bytes: vec![lead, cont],
                        reason: "invalid continuation byte",
                    },
                ),
                Ok(None) => ByteRead::failed(
                    1,
                    BridgeError::Decode {
                        bytes: vec![lead],
                        reason: "truncated sequence",
                    },
                ),
                Err(e) => ByteRead::failed(1, e.into()),
            },
            0xc4..=0xf4 => ByteRead::failed(
                1,
                BridgeError::Decode {
                    bytes: vec![lead],
                    reason: "code point above U+00FF",
                },
            ),
            _ => ByteRead::failed(
                1,
                BridgeError::Decode {
                    bytes: vec![lead],
                    reason: "invalid lead byte",
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain(source: &mut dyn ByteSource) -> (Vec<u8>, usize, ByteRead) {
        let mut bytes = Vec::new();
        let mut units = 0;
        loop {
            let read = source.read_byte();
            units += read.units;
            match read.result {
                Ok(byte) => bytes.push(byte),
                Err(_) => return (bytes, units, read),
            }
        }
    }

    #[test]
    fn test_reader_source_passthrough() {
        let mut source = ReaderSource::new(Cursor::new(vec![0x61, 0x62, 0x63]));
        for expected in [0x61, 0x62, 0x63] {
            let read = source.read_byte();
            assert_eq!(read.units, 1);
            assert_eq!(read.result.unwrap(), expected);
        }
        let last = source.read_byte();
        assert_eq!(last.units, 0);
        assert!(last.result.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn test_reader_source_empty() {
        let mut source = ReaderSource::new(Cursor::new(Vec::new()));
        let read = source.read_byte();
        assert!(!read.is_ok());
        assert!(read.result.unwrap_err().is_end_of_stream());
    }

    struct Flaky {
        interrupts: usize,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupts > 0 {
                self.interrupts -= 1;
                return Err(io::ErrorKind::Interrupted.into());
            }
            buf[0] = b'x';
            Ok(1)
        }
    }

    #[test]
    fn test_interrupted_is_retried() {
        let mut source = ReaderSource::new(Flaky { interrupts: 3 });
        let read = source.read_byte();
        assert_eq!(read.result.unwrap(), b'x');
        assert_eq!(read.units, 1);
    }

    #[test]
    fn test_latin1_decoding_counts_units() {
        // "aé" in UTF-8
        let mut source = Latin1Source::new(Cursor::new("a\u{e9}".as_bytes().to_vec()));
        let (bytes, units, last) = drain(&mut source);
        assert_eq!(bytes, vec![b'a', 0xe9]);
        assert_eq!(units, 3);
        assert!(last.result.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn test_latin1_rejects_wide_code_points() {
        let mut source = Latin1Source::new(Cursor::new("x\u{20ac}".as_bytes().to_vec()));
        let (bytes, units, last) = drain(&mut source);
        assert_eq!(bytes, vec![b'x']);
        assert_eq!(last.units, 1);
        assert_eq!(units, 2);
        assert!(matches!(last.result, Err(BridgeError::Decode { .. })));
    }

    #[test]
    fn test_latin1_truncated_sequence_reports_partial_consumption() {
        let mut source = Latin1Source::new(Cursor::new(vec![0xc3]));
        let read = source.read_byte();
        assert_eq!(read.units, 1);
        match read.result {
            Err(BridgeError::Decode { bytes, reason }) => {
                assert_eq!(bytes, vec![0xc3]);
                assert_eq!(reason, "truncated sequence");
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_latin1_bad_continuation() {
        let mut source = Latin1Source::new(Cursor::new(vec![0xc2, 0x41]));
        let read = source.read_byte();
        assert_eq!(read.units, 2);
        assert!(matches!(read.result, Err(BridgeError::Decode { .. })));
    }
}
