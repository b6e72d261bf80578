//! Gene packet byte codec.
//!
//! A packet is `PACKET_WORDS` little-endian `i32` words with no header. A
//! receiver reads exactly [`PACKET_BYTES`]; anything shorter is a transport
//! error.

use std::io::{ErrorKind, Read, Write};

use biolume_data::{GenePacket, PACKET_WORDS};

use crate::error::{IoError, Result};

const WORD_BYTES: usize = std::mem::size_of::<i32>();
pub const PACKET_BYTES: usize = PACKET_WORDS * WORD_BYTES;

#[must_use]
pub fn encode(packet: &GenePacket) -> [u8; PACKET_BYTES] {
    let mut out = [0u8; PACKET_BYTES];
    for (chunk, word) in out.chunks_exact_mut(WORD_BYTES).zip(packet.words()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

pub fn decode(bytes: &[u8]) -> Result<GenePacket> {
    if bytes.len() < PACKET_BYTES {
        return Err(IoError::ShortRead {
            expected: PACKET_BYTES,
            got: bytes.len(),
        });
    }
    if bytes.len() > PACKET_BYTES {
        return Err(IoError::validation(format!(
            "gene packet is {} bytes, expected {PACKET_BYTES}",
            bytes.len()
        )));
    }
    let mut words = [0i32; PACKET_WORDS];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(WORD_BYTES)) {
        let mut raw = [0u8; WORD_BYTES];
        raw.copy_from_slice(chunk);
        *word = i32::from_le_bytes(raw);
    }
    Ok(GenePacket::from_words(words))
}

pub fn write_packet<W: Write + ?Sized>(writer: &mut W, packet: &GenePacket) -> Result<()> {
    writer.write_all(&encode(packet)).map_err(IoError::Write)?;
    writer.flush().map_err(IoError::Write)
}

/// Reads one packet.
///
/// A clean end of stream, or a non-blocking reader with nothing available,
/// before the first byte yields `Ok(None)`. Ending mid-packet is
/// [`IoError::ShortRead`].
pub fn read_packet<R: Read + ?Sized>(reader: &mut R) -> Result<Option<GenePacket>> {
    let mut buf = [0u8; PACKET_BYTES];
    let mut filled = 0;
    while filled < PACKET_BYTES {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::WouldBlock && filled == 0 => return Ok(None),
            Err(e) => return Err(IoError::Read(e)),
        }
    }
    match filled {
        0 => Ok(None),
        PACKET_BYTES => decode(&buf).map(Some),
        got => Err(IoError::ShortRead {
            expected: PACKET_BYTES,
            got,
        }),
    }
}
