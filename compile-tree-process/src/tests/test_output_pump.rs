use crate::runner::pump;
use pretty_assertions::assert_eq;
use std::io::{self, Cursor, Write};

/// Writer that accepts `limit` bytes and then fails
struct BrokenPipe {
    written: Vec<u8>,
    limit: usize,
}

impl Write for BrokenPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_pump_forwards_and_captures_the_same_bytes() {
    let text = b"Main.java:3: error: ';' expected\n1 error\n";
    let mut forwarded = Vec::new();

    let captured = pump(Cursor::new(&text[..]), Some(&mut forwarded)).unwrap();

    assert_eq!(captured, text.to_vec());
    assert_eq!(forwarded, text.to_vec());
}

#[test]
fn test_pump_forwards_output_larger_than_one_read() {
    let text: Vec<u8> = (0..50_000u32).map(|i| b'a' + (i % 26) as u8).collect();
    let mut forwarded = Vec::new();

    let captured = pump(Cursor::new(text.clone()), Some(&mut forwarded)).unwrap();

    assert_eq!(captured.len(), text.len());
    assert!(captured == text);
    assert!(forwarded == text);
}

#[test]
fn test_pump_without_sink_only_captures() {
    let captured = pump(Cursor::new(b"quiet".to_vec()), None::<Vec<u8>>).unwrap();
    assert_eq!(captured, b"quiet".to_vec());
}

#[test]
fn test_pump_keeps_capturing_after_sink_fails() {
    let text: Vec<u8> = vec![b'x'; 20_000];
    let mut sink = BrokenPipe {
        written: Vec::new(),
        limit: 100,
    };

    let captured = pump(Cursor::new(text.clone()), Some(&mut sink)).unwrap();

    assert!(captured == text);
    assert!(sink.written.len() <= 100);
}
