#![allow(dead_code)]

use std::io::{self, Cursor, Read};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use icinga_events::{Category, EventStream, FeedError, Record};

/// Byte source fed from the test; stays open until the sender is dropped.
pub struct PipeSource {
    rx: Receiver<io::Result<Vec<u8>>>,
    chunk: Vec<u8>,
    pos: usize,
}

pub fn pipe() -> (Sender<io::Result<Vec<u8>>>, PipeSource) {
    let (tx, rx) = unbounded();
    (
        tx,
        PipeSource {
            rx,
            chunk: Vec::new(),
            pos: 0,
        },
    )
}

impl Read for PipeSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.chunk.len() {
            match self.rx.recv() {
                Ok(Ok(chunk)) => {
                    self.chunk = chunk;
                    self.pos = 0;
                }
                Ok(Err(err)) => return Err(err),
                Err(_) => return Ok(0),
            }
        }
        let n = (self.chunk.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

pub fn line(category: &str, n: usize) -> String {
    format!("{{\"type\":\"{category}\",\"timestamp\":{n}.5,\"host\":\"host-{n}\",\"service\":\"svc\"}}\n")
}

pub fn feed(lines: &[String]) -> Cursor<Vec<u8>> {
    Cursor::new(lines.concat().into_bytes())
}

/// Records received by one reader, then how its stream ended.
pub struct Drained {
    pub category: Category,
    pub records: Vec<Record>,
    pub end: Result<(), FeedError>,
}

impl Drained {
    pub fn lines(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| String::from_utf8(r.as_bytes().to_vec()).unwrap())
            .collect()
    }
}

pub fn drain(mut stream: EventStream) -> JoinHandle<Drained> {
    thread::spawn(move || {
        let category = stream.category();
        let mut records = Vec::new();
        let end = loop {
            match stream.recv() {
                Ok(Some(record)) => records.push(record),
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            }
        };
        Drained {
            category,
            records,
            end,
        }
    })
}
