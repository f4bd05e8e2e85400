//! Streaming parser: routing to sinks, line numbers, joined errors, read failures.

mod common;

use std::io::{self, Read};

use common::ip;
use hostsfile::{parse, HandleSet, Input, LineError, ParseError, Parser, Record, RecordError, Set};

fn collect(data: &str) -> (Vec<Record>, Result<(), ParseError>) {
    let mut records = Vec::new();
    let res = parse(Input::new(data.as_bytes()), &mut |rec: Record| records.push(rec));
    (records, res)
}

#[test]
fn two_lines_into_sink() {
    let (records, res) = collect("1.2.3.4 host1 host2\n4.3.2.1 host3");
    res.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].addr, ip("1.2.3.4"));
    assert_eq!(records[0].names, ["host1", "host2"]);
    assert_eq!(records[1].addr, ip("4.3.2.1"));
    assert_eq!(records[1].names, ["host3"]);
}

#[test]
fn blank_line_is_reported_with_line_number() {
    let (records, res) = collect("1.2.3.4 a.example\n\n4.3.2.1 b.example\n");
    assert_eq!(records.len(), 2);

    let err = res.unwrap_err();
    assert!(!err.is_read_error());
    assert_eq!(
        err.line_errors(),
        [LineError {
            line: 2,
            source: RecordError::EmptyLine,
        }]
    );
    assert_eq!(err.to_string(), "parsing: line 2: line is empty");
}

#[test]
fn one_bad_line_among_many() {
    let mut data = String::new();
    for i in 0..10 {
        data.push_str(&format!("10.0.0.{i} host{i}.lan\n"));
    }
    data.push_str("10.0.1.1 bad_host\n");
    for i in 10..20 {
        data.push_str(&format!("10.0.0.{i} host{i}.lan\n"));
    }

    let (records, res) = collect(&data);
    assert_eq!(records.len(), 20);
    let err = res.unwrap_err();
    assert_eq!(err.line_errors().len(), 1);
    assert_eq!(err.line_errors()[0].line, 11);
}

#[test]
fn errors_are_joined_in_order() {
    let (records, res) = collect("# header\n1.2.3.4\n1.2.3.4 ok.example\nnot-an-ip host\n");
    assert_eq!(records.len(), 1);

    let err = res.unwrap_err();
    let lines: Vec<usize> = err.line_errors().iter().map(|e| e.line).collect();
    assert_eq!(lines, [1, 2, 4]);

    let msg = err.to_string();
    let mut parts = msg.split('\n');
    assert_eq!(parts.next(), Some("parsing: line 1: line is empty"));
    assert_eq!(parts.next(), Some("line 2: no hostnames"));
    assert!(parts.next().unwrap().starts_with("line 4: "));
    assert_eq!(parts.next(), None);
}

#[test]
fn crlf_line_endings() {
    let (records, res) = collect("1.2.3.4 a.example\r\n4.3.2.1 b.example\r\n");
    res.unwrap();
    assert_eq!(records[0].names, ["a.example"]);
    assert_eq!(records[1].names, ["b.example"]);
}

#[test]
fn named_input_sets_record_source() {
    let mut records = Vec::new();
    parse(
        Input::named("/etc/hosts", "127.0.0.1 localhost\n".as_bytes()),
        &mut |rec: Record| records.push(rec),
    )
    .unwrap();
    assert_eq!(records[0].source.as_deref(), Some("/etc/hosts"));

    let (records, _) = collect("127.0.0.1 localhost\n");
    assert_eq!(records[0].source, None);
}

#[test]
fn open_names_input_after_path() {
    let dir = common::temp_dir();
    let path = common::write_file(dir.path(), "hosts", "127.0.0.1 localhost\n");

    let input = Input::open(&path).unwrap();
    assert_eq!(input.name.as_deref(), Some(path.display().to_string().as_str()));

    let mut records = Vec::new();
    parse(input, &mut |rec: Record| records.push(rec)).unwrap();
    assert_eq!(records[0].source, Some(path.display().to_string()));
}

#[derive(Default)]
struct Diagnostics {
    valid: Vec<Record>,
    invalid: Vec<(Option<String>, Vec<u8>, LineError)>,
}

impl Set for Diagnostics {
    fn add(&mut self, rec: Record) {
        self.valid.push(rec);
    }
}

impl HandleSet for Diagnostics {
    fn handle_invalid(&mut self, source: Option<&str>, line: &[u8], err: LineError) {
        self.invalid
            .push((source.map(str::to_string), line.to_vec(), err));
    }
}

#[test]
fn handled_sink_sees_raw_invalid_lines() {
    let data = "1.2.3.4 a.example\n1.2.3.4 good.host bad._host  \r\n\n4.3.2.1 b.example";
    let mut diag = Diagnostics::default();
    Parser::new()
        .parse_handled(Input::named("hosts", data.as_bytes()), &mut diag)
        .unwrap();

    assert_eq!(diag.valid.len(), 2);
    assert_eq!(diag.invalid.len(), 2);

    let (source, line, err) = &diag.invalid[0];
    assert_eq!(source.as_deref(), Some("hosts"));
    assert_eq!(line.as_slice(), b"1.2.3.4 good.host bad._host  ");
    assert_eq!(err.line, 2);
    assert!(matches!(err.source, RecordError::Name { index: 1, .. }));

    let (_, line, err) = &diag.invalid[1];
    assert!(line.is_empty());
    assert_eq!(err.line, 3);
    assert_eq!(err.source, RecordError::EmptyLine);
}

#[test]
fn line_too_long() {
    let parser = Parser::new().max_line_len(16);
    let mut records = Vec::new();
    let data = "1.2.3.4 a.lan\n1.2.3.4 very-long-name.example\n";
    let err = parser
        .parse(Input::new(data.as_bytes()), &mut |rec: Record| records.push(rec))
        .unwrap_err();

    assert!(err.is_read_error());
    assert!(matches!(err, ParseError::TooLong { line: 2, max: 16 }));
}

#[test]
fn line_at_limit_is_accepted() {
    let parser = Parser::new().max_line_len(17);
    let mut records = Vec::new();
    parser
        .parse(Input::new("1.2.3.4 a.example".as_bytes()), &mut |rec: Record| records.push(rec))
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn unlimited_line_len() {
    let parser = Parser::new().max_line_len(usize::MAX);
    let mut records = Vec::new();
    parser
        .parse(Input::new("1.2.3.4 a.example\n4.3.2.1 b.example".as_bytes()), &mut |rec: Record| records.push(rec))
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].names, ["b.example"]);
}

/// Yields `data` once, then fails every read.
struct FailingReader {
    data: Option<&'static [u8]>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            None => Err(io::Error::other("disk on fire")),
        }
    }
}

#[test]
fn read_error_supersedes_line_errors() {
    let reader = FailingReader {
        data: Some(&b"bad line\n1.2.3.4 a.example\n"[..]),
    };
    let mut records = Vec::new();
    let err = parse(Input::new(reader), &mut |rec: Record| records.push(rec)).unwrap_err();

    assert!(err.is_read_error());
    assert!(err.line_errors().is_empty());
    match &err {
        ParseError::Read { line, source } => {
            assert_eq!(*line, 3);
            assert_eq!(source.to_string(), "disk on fire");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(records.len(), 1);
}
