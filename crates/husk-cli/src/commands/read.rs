//! Read command - pull a file through the stream bridge.

use husk_bridge::{
    husk_read_byte, register_reader, register_source, release_stream, resolve_error,
    Latin1Source, StreamEnd, StreamHandle,
};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// What happened while draining a stream.
#[derive(Debug)]
struct ReadSummary {
    bytes: Vec<u8>,
    units: u64,
    end: StreamEnd,
}

fn drain(stream: StreamHandle) -> ReadSummary {
    let mut bytes = Vec::new();
    let mut units = 0u64;

    loop {
        let read = husk_read_byte(stream.raw());
        units += u64::from(read.bytes_read);
        if !read.is_ok {
            return ReadSummary {
                bytes,
                units,
                end: resolve_error(read.err_obj),
            };
        }
        bytes.push(read.byte);
    }
}

pub fn run(file: &Path, latin1: bool, echo: bool) -> miette::Result<()> {
    let handle = File::open(file).map_err(|e| miette::miette!("Failed to open file: {}", e))?;
    let reader = BufReader::new(handle);

    let stream = if latin1 {
        register_source(Latin1Source::new(reader))
    } else {
        register_reader(reader)
    }
    .map_err(|e| miette::miette!("Failed to register stream: {}", e))?;

    tracing::debug!(%stream, file = %file.display(), latin1, "draining stream");
    let summary = drain(stream);
    release_stream(stream).map_err(|e| miette::miette!("Failed to release stream: {}", e))?;

    if echo {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(&summary.bytes)
            .and_then(|_| stdout.flush())
            .map_err(|e| miette::miette!("Failed to write output: {}", e))?;
        println!();
    }

    println!("Read: {}", file.display());
    println!("  bytes produced: {}", summary.bytes.len());
    println!("  units consumed: {}", summary.units);
    println!("  ended with:     {} ({})", summary.end.kind, summary.end.message);

    if summary.end.end_of_stream {
        Ok(())
    } else {
        Err(miette::miette!(
            "stream failed after {} bytes: {}",
            summary.bytes.len(),
            summary.end.message
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use husk_abi::ErrorKind;
    use std::io::Cursor;

    #[test]
    fn test_drain_plain() {
        let stream = register_reader(Cursor::new(b"abc".to_vec())).unwrap();
        let summary = drain(stream);
        assert_eq!(summary.bytes, b"abc");
        assert_eq!(summary.units, 3);
        assert!(summary.end.end_of_stream);
        assert_eq!(summary.end.kind, ErrorKind::Io);
        release_stream(stream).unwrap();
    }

    #[test]
    fn test_drain_latin1() {
        let stream =
            register_source(Latin1Source::new(Cursor::new("caf\u{e9}".as_bytes().to_vec())))
                .unwrap();
        let summary = drain(stream);
        assert_eq!(summary.bytes, vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(summary.units, 5);
        release_stream(stream).unwrap();
    }

    #[test]
    fn test_run_on_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"echo hi\n").unwrap();
        assert!(run(file.path(), false, false).is_ok());
    }

    #[test]
    fn test_run_reports_decode_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("\u{2603}".as_bytes()).unwrap();
        assert!(run(file.path(), true, false).is_err());
    }
}
