use crate::domain::{CowrieEvent, DecodeError, decode_event_line};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
}

/// A line that could not be decoded. Ingestion skips it and keeps going.
#[derive(Debug)]
pub struct DecodeWarning {
    pub line_no: usize,
    pub error: DecodeError,
}

#[derive(Debug)]
pub struct IngestOutput {
    pub events: Vec<CowrieEvent>,
    pub warnings: Vec<DecodeWarning>,
}

pub fn load_log_file(path: &Path) -> Result<IngestOutput, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    ingest_reader(BufReader::new(file)).map_err(|source| IngestError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Decodes every line of `reader` in order. Invalid UTF-8 is replaced rather
/// than rejected so one bad byte only affects its own line.
pub fn ingest_reader(mut reader: impl BufRead) -> io::Result<IngestOutput> {
    let mut events: Vec<CowrieEvent> = Vec::new();
    let mut warnings: Vec<DecodeWarning> = Vec::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let bytes = reader.read_until(b'\n', &mut buf)?;
        if bytes == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        match decode_event_line(line, line_no) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(error) => warnings.push(DecodeWarning { line_no, error }),
        }
    }

    Ok(IngestOutput { events, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate_events;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn malformed_line_is_skipped_and_reported() {
        let input = concat!(
            r#"{"src_ip":"1.1.1.1","timestamp":"2024-01-01T00:00:01Z"}"#,
            "\n",
            r#"{"src_ip":"2.2.2.2","#,
            "\n",
            r#"{"src_ip":"2.2.2.2","timestamp":"2024-01-01T00:00:02Z"}"#,
            "\n",
            "\n",
            r#"{"src_ip":"1.1.1.1","timestamp":"2024-01-01T00:00:03Z"}"#,
        );
        let output = ingest_reader(Cursor::new(input)).expect("ingest");

        assert_eq!(output.events.len(), 3);
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].line_no, 2);

        let model = aggregate_events(output.events);
        assert_eq!(model.len(), 2);
        assert_eq!(model[0].address, "1.1.1.1");
        assert_eq!(model[0].events.len(), 2);
        assert_eq!(model[1].events.len(), 1);
    }

    #[test]
    fn handles_crlf_and_invalid_utf8() {
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"src_ip\":\"3.3.3.3\"}\r\n");
        input.extend_from_slice(b"{\"src_ip\":\"4.4.4.4\",\"input\":\"ls \xff\"}\n");
        let output = ingest_reader(Cursor::new(input)).expect("ingest");

        assert!(output.warnings.is_empty());
        assert_eq!(output.events.len(), 2);
        assert_eq!(output.events[0].src_ip.as_deref(), Some("3.3.3.3"));
        assert_eq!(output.events[1].input.as_deref(), Some("ls \u{fffd}"));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("cowrie.json");
        fs::write(
            &path,
            r#"{"eventid":"cowrie.session.connect","src_ip":"198.51.100.4","timestamp":"2024-12-17T14:38:19.000001Z"}"#,
        )
        .expect("write");

        let output = load_log_file(&path).expect("load");
        assert_eq!(output.events.len(), 1);
        assert_eq!(output.events[0].line_no, 1);
    }

    #[test]
    fn empty_file_yields_no_events() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("empty.json");
        fs::write(&path, "").expect("write");

        let output = load_log_file(&path).expect("load");
        assert!(output.events.is_empty());
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempdir().expect("tempdir");
        let error = load_log_file(&dir.path().join("nope.json")).expect_err("missing");
        assert!(matches!(error, IngestError::Open { .. }));
    }
}
