//! Video sample description.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/video_sample_description>

use binrw::BinRead;

use crate::support::counted_string;

/// Fixed fields of a video sample description.
/// Codec configuration atoms (e.g. `avcC`, `hvcC`)
/// follow directly after, see `SampleDescription::video_extensions()`.
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Video {
    _version: u16,
    _revision_level: u16,
    _vendor: u32,
    _temporal_quality: u32,
    _spatial_quality: u32,
    width: u16,
    height: u16,
    /// 16.16 pixels per inch
    _horizontal_resolution: u32,
    _vertical_resolution: u32,
    _data_size: u32,
    /// Frames per sample, usually 1.
    frame_count: u16,
    /// Pascal string, padded to 32 bytes.
    #[br(map = |data: [u8; 32]| counted_string(&data, true))]
    compressor_name: String,
    depth: i16,
    _color_table_id: i16,
}

impl Video {
    pub const SIZE: usize = 70;

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }

    pub fn compressor_name(&self) -> &str {
        &self.compressor_name
    }

    /// Bit depth, e.g. 24.
    pub fn depth(&self) -> i16 {
        self.depth
    }
}
