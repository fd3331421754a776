//! Scripted in-memory sockets for unit tests.

use std::{
    collections::VecDeque,
    io::{self, ErrorKind, Read, Write},
    sync::{Arc, Mutex},
};

use linechat_shared::{Connection, SocketId};
use mockall::mock;

mock! {
    pub Stream {}

    impl Read for Stream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    }

    impl Write for Stream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

pub type Sink = Arc<Mutex<Vec<u8>>>;

/// A stream that records every write and never has anything to read.
pub fn recording_stream() -> (MockStream, Sink) {
    scripted_stream(Vec::new())
}

/// A stream whose reads replay `reads` (an empty chunk means EOF) before
/// reporting "would block", and whose writes are recorded.
pub fn scripted_stream(reads: Vec<Vec<u8>>) -> (MockStream, Sink) {
    let mut reads: VecDeque<_> = reads.into();
    let mut stream = MockStream::new();
    stream.expect_read().returning(move |buf| match reads.pop_front() {
        Some(bytes) => {
            buf[..bytes.len()].copy_from_slice(&bytes);
            Ok(bytes.len())
        }
        None => Err(io::Error::from(ErrorKind::WouldBlock)),
    });

    let sink = Sink::default();
    let writer = sink.clone();
    stream.expect_write().returning(move |buf| {
        writer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    });
    (stream, sink)
}

/// A stream whose every write fails as if the peer had gone away.
pub fn failing_stream() -> MockStream {
    let mut stream = MockStream::new();
    stream
        .expect_read()
        .returning(|_| Err(io::Error::from(ErrorKind::WouldBlock)));
    stream
        .expect_write()
        .returning(|_| Err(io::Error::from(ErrorKind::BrokenPipe)));
    stream
}

pub fn open_connection(id: usize, stream: MockStream) -> Connection<MockStream> {
    Connection::accepted(SocketId::new(id), stream, 4096)
}

/// Lines written to `sink` so far, without delimiters.
pub fn sent_lines(sink: &Sink) -> Vec<String> {
    String::from_utf8_lossy(&sink.lock().unwrap())
        .lines()
        .map(str::to_string)
        .collect()
}
