//! Bounded-memory stream copying.

use std::io::{self, ErrorKind, Read, Write};

use tracing::trace;

/// Chunk size for streamed transfers (1 MiB).
pub const CHUNK_SIZE: usize = 1 << 20;

/// Copy `reader` into `writer` one chunk at a time.
///
/// At most [`CHUNK_SIZE`] bytes are held in memory regardless of the
/// stream length. The writer is flushed before returning the byte count.
pub fn copy_chunked<R, W>(reader: &mut R, writer: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    copy_with_buffer(reader, writer, &mut vec![0u8; CHUNK_SIZE])
}

fn copy_with_buffer<R, W>(reader: &mut R, writer: &mut W, buf: &mut [u8]) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total = 0u64;
    loop {
        let n = match reader.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
        trace!(chunk = n, total, "copied chunk");
    }
    writer.flush()?;
    Ok(total)
}
