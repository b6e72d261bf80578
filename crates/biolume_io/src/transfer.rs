//! Gene transfer endpoints.
//!
//! A node pulls from a [`GeneSource`] once per tick without blocking and pushes
//! its own packet into a [`GeneSink`] when it reproduces. Real sockets are a
//! collaborator concern; anything implementing `Read`/`Write` plugs in through
//! [`StreamSource`] and [`StreamSink`].

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use biolume_data::GenePacket;

use crate::error::{IoError, Result};
use crate::wire::{self, PACKET_BYTES};

pub trait GeneSource: Send {
    /// Next waiting packet. `Ok(None)` means nothing arrived this tick.
    fn try_receive(&mut self) -> Result<Option<GenePacket>>;
}

pub trait GeneSink: Send {
    fn send(&mut self, packet: &GenePacket) -> Result<()>;
}

/// In-memory FIFO usable as either end.
#[derive(Debug, Clone, Default)]
pub struct GeneInbox {
    queue: VecDeque<GenePacket>,
}

impl GeneInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, packet: GenePacket) {
        self.queue.push_back(packet);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl GeneSource for GeneInbox {
    fn try_receive(&mut self) -> Result<Option<GenePacket>> {
        Ok(self.queue.pop_front())
    }
}

impl GeneSink for GeneInbox {
    fn send(&mut self, packet: &GenePacket) -> Result<()> {
        self.push(*packet);
        Ok(())
    }
}

/// Sending half of an in-process link between nodes.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<GenePacket>,
}

/// Receiving half of an in-process link between nodes.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<GenePacket>,
}

#[must_use]
pub fn gene_channel() -> (ChannelSink, ChannelSource) {
    let (tx, rx) = mpsc::channel();
    (ChannelSink { tx }, ChannelSource { rx })
}

impl GeneSink for ChannelSink {
    fn send(&mut self, packet: &GenePacket) -> Result<()> {
        self.tx.send(*packet).map_err(|_| IoError::Disconnected)
    }
}

impl GeneSource for ChannelSource {
    fn try_receive(&mut self) -> Result<Option<GenePacket>> {
        match self.rx.try_recv() {
            Ok(packet) => Ok(Some(packet)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(IoError::Disconnected),
        }
    }
}

/// Writes encoded packets to any byte stream.
#[derive(Debug)]
pub struct StreamSink<W> {
    writer: W,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> GeneSink for StreamSink<W> {
    fn send(&mut self, packet: &GenePacket) -> Result<()> {
        wire::write_packet(&mut self.writer, packet)
    }
}

/// Reads packets from a byte stream.
///
/// Pair with a non-blocking reader to keep `try_receive` from stalling a tick.
#[derive(Debug)]
pub struct StreamSource<R> {
    reader: R,
}

impl<R: Read + Send> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read + Send> GeneSource for StreamSource<R> {
    fn try_receive(&mut self) -> Result<Option<GenePacket>> {
        wire::read_packet(&mut self.reader)
    }
}

/// Reassembles packets from arbitrarily split byte chunks.
#[derive(Debug, Clone, Default)]
pub struct ByteInbox {
    buffer: Vec<u8>,
}

impl ByteInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes held that do not yet form a whole packet.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl GeneSource for ByteInbox {
    fn try_receive(&mut self) -> Result<Option<GenePacket>> {
        if self.buffer.len() < PACKET_BYTES {
            return Ok(None);
        }
        let frame: Vec<u8> = self.buffer.drain(..PACKET_BYTES).collect();
        wire::decode(&frame).map(Some)
    }
}
