use std::{
    fs::File,
    io::{BufReader, Cursor, Read, Seek, SeekFrom},
};

use binrw::{BinRead, BinReaderExt};

use crate::{AtomHeader, FourCC, Mp4Error};

/// Bounds-checked, seekable byte cursor over
/// an MP4 file or an in-memory buffer.
///
/// All atom and table parsing goes through this.
#[derive(Debug)]
pub(crate) struct Mp4Reader<R: Read + Seek> {
    /// Stream size.
    pub(crate) len: u64,
    /// Reader over the full MP4.
    pub(crate) inner: R,
}

impl Mp4Reader<BufReader<File>> {
    /// Creates a `BufReader` for the full MP4 file,
    /// with optional custom capacity (default 8KiB).
    pub(crate) fn with_capacity(
        file: File,
        capacity: Option<usize>
    ) -> Result<Self, Mp4Error> {
        let reader = match capacity {
            Some(cap) => BufReader::with_capacity(cap, file),
            None => BufReader::new(file),
        };
        Self::new(reader)
    }
}

impl<R: Read + Seek> Mp4Reader<R> {
    pub(crate) fn new(mut inner: R) -> Result<Self, Mp4Error> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { len, inner })
    }

    /// Returns size in bytes for the stream.
    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    /// Returns current position.
    pub(crate) fn pos(&mut self) -> Result<u64, Mp4Error> {
        Ok(self.inner.stream_position()?)
    }

    /// Seeks to absolute position `pos`.
    /// Seeking to exactly the end of the stream is allowed.
    pub(crate) fn seek_to(&mut self, pos: u64) -> Result<u64, Mp4Error> {
        if pos > self.len {
            return Err(Mp4Error::BoundsError { pos, len: self.len });
        }
        Ok(self.inner.seek(SeekFrom::Start(pos))?)
    }

    /// Returns remaining number of bytes in the stream.
    pub(crate) fn rem(&mut self) -> Result<u64, Mp4Error> {
        Ok(self.len.saturating_sub(self.pos()?))
    }

    /// Read big endian type `T`.
    pub(crate) fn read_be<T>(&mut self) -> Result<T, Mp4Error>
    where
        T: BinRead,
        <T as BinRead>::Args<'static>: Sized + Clone + Default,
    {
        let pos = self.pos()?;
        let size = std::mem::size_of::<T>() as u64;
        if self.rem()? < size {
            return Err(Mp4Error::TruncatedRead {
                got: self.rem()?,
                expected: size,
                offset: pos,
            });
        }
        Ok(self.inner.read_be::<T>()?)
    }

    /// Reads FourCC at current position.
    pub(crate) fn fourcc(&mut self) -> Result<FourCC, Mp4Error> {
        Ok(FourCC::from_slice(&self.read_be::<[u8; 4]>()?))
    }

    /// Read `len` bytes at current position.
    ///
    /// Raises `TruncatedRead` if fewer bytes remain,
    /// without reading anything.
    pub(crate) fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>, Mp4Error> {
        let offset = self.pos()?;
        let rem = self.rem()?;
        if rem < len {
            return Err(Mp4Error::TruncatedRead {
                got: rem,
                expected: len,
                offset,
            });
        }
        let mut buf = vec![0_u8; len as usize];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads `len` bytes at `pos`
    /// into `Cursor<Vec<u8>>`.
    ///
    /// Note that the `mdat` atom may be many GB in size.
    pub(crate) fn cursor(&mut self, pos: u64, len: u64) -> Result<Cursor<Vec<u8>>, Mp4Error> {
        self.seek_to(pos)?;
        Ok(Cursor::new(self.read_bytes(len)?))
    }

    /// Reads the data load for atom with `header`
    /// into `Cursor<Vec<u8>>`, provided it does not
    /// exceed `max` bytes.
    pub(crate) fn atom_cursor(
        &mut self,
        header: &AtomHeader,
        max: u64
    ) -> Result<Cursor<Vec<u8>>, Mp4Error> {
        let size = header.data_size();
        if size > max {
            return Err(Mp4Error::PayloadTooLarge {
                name: header.name,
                size,
                max,
                offset: header.offset,
            });
        }
        self.cursor(header.data_offset(), size)
    }
}
