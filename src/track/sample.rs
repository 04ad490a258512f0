//! Track sample. Wrapper over in-memory buffer `Cursor<Vec<u8>>`,
//! complete with presentation timestamp, duration and key frame flag.

use std::io::{BufRead, Cursor, Read, Seek, SeekFrom};

use time::Duration;

use crate::{Mp4Error, Mp4Reader};

use super::IndexEntry;

#[derive(Debug, Default, Clone)]
pub struct Sample {
    entry: IndexEntry,
    reader: Cursor<Vec<u8>>
}

impl From<Sample> for Cursor<Vec<u8>> {
    fn from(sample: Sample) -> Self {
        sample.reader
    }
}

impl Seek for Sample {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl Read for Sample {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for Sample {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Sample {
    pub(crate) fn new<R: Read + Seek>(
        reader: &mut Mp4Reader<R>,
        entry: &IndexEntry,
    ) -> Result<Sample, Mp4Error> {
        Ok(Self {
            entry: *entry,
            reader: reader.cursor(entry.file_pos, entry.size as u64)?,
        })
    }

    /// Index entry the sample was read from.
    pub fn entry(&self) -> &IndexEntry {
        &self.entry
    }

    /// Returns sample duration.
    pub fn duration(&self) -> Duration {
        Duration::nanoseconds(self.entry.duration)
    }

    /// Returns presentation timestamp.
    pub fn timestamp(&self) -> Duration {
        Duration::nanoseconds(self.entry.timestamp)
    }

    /// Returns presentation timestamp and
    /// sample duration as the tuple
    /// `(TIMESTAMP, SAMPLE_DURATION)`.
    pub fn time(&self) -> (Duration, Duration) {
        (self.timestamp(), self.duration())
    }

    pub fn is_keyframe(&self) -> bool {
        self.entry.is_keyframe
    }

    /// Returns the raw bytes as a slice.
    pub fn raw(&self) -> &[u8] {
        self.reader.get_ref()
    }

    /// Sample size in bytes.
    pub fn len(&self) -> usize {
        self.reader.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
