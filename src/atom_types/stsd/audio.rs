//! Sound sample description, versions 0, 1 and 2.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sound_sample_description_version_0>

use binrw::BinRead;

#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Audio {
    /// Sound sample description version (0, 1, or 2).
    version: u16,
    _revision_level: u16,
    vendor: u32,
    /// Number of channels. Fixed to 3 for version 2.
    channels: u16,
    /// Bits per sample. Fixed to 16 for version 2.
    sample_size: u16,
    compression_id: i16,
    packet_size: u16,
    /// Fixed point number (16.16).
    sample_rate: u32,

    /// Version 1 fields.
    #[br(if(version == 1))]
    v1: Option<AudioV1>,
    /// Version 2 fields.
    #[br(if(version == 2))]
    v2: Option<AudioV2>,
}

/// Sound sample description version 1 extension.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct AudioV1 {
    pub samples_per_packet: u32,
    pub bytes_per_packet: u32,
    pub bytes_per_frame: u32,
    pub bytes_per_sample: u32,
}

/// Sound sample description version 2 extension.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct AudioV2 {
    pub size_of_struct_only: u32,
    pub audio_sample_rate: f64,
    pub num_audio_channels: u32,
    _always_7f000000: u32,
    pub const_bits_per_channel: u32,
    pub format_specific_flags: u32,
    pub const_bytes_per_audio_packet: u32,
    pub const_lpcm_frames_per_audio_packet: u32,
}

impl Audio {
    /// Size of the fixed fields in bytes,
    /// depending on version.
    /// Child atoms (e.g. `esds`) follow directly after.
    pub fn size(&self) -> usize {
        match self.version {
            1 => 36,
            2 => 56,
            _ => 20,
        }
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn vendor(&self) -> u32 {
        self.vendor
    }

    /// Number of channels.
    pub fn channels(&self) -> u32 {
        match &self.v2 {
            Some(v2) => v2.num_audio_channels,
            None => self.channels as u32,
        }
    }

    /// Bits per sample.
    pub fn bits_per_sample(&self) -> u32 {
        match &self.v2 {
            Some(v2) => v2.const_bits_per_channel,
            None => self.sample_size as u32,
        }
    }

    pub fn compression_id(&self) -> i16 {
        self.compression_id
    }

    pub fn packet_size(&self) -> u16 {
        self.packet_size
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        match &self.v2 {
            Some(v2) => v2.audio_sample_rate,
            None => self.sample_rate as f64 / 2_u32.pow(16) as f64,
        }
    }

    pub fn v1(&self) -> Option<&AudioV1> {
        self.v1.as_ref()
    }

    pub fn v2(&self) -> Option<&AudioV2> {
        self.v2.as_ref()
    }

    /// Returns `(bytes_per_frame, samples_per_packet)`
    /// if both are declared and non-zero.
    pub fn frame_ratio(&self) -> Option<(u32, u32)> {
        if let Some(v1) = &self.v1 {
            if v1.bytes_per_frame != 0 && v1.samples_per_packet != 0 {
                return Some((v1.bytes_per_frame, v1.samples_per_packet));
            }
        }
        if let Some(v2) = &self.v2 {
            if v2.const_bytes_per_audio_packet != 0 && v2.const_lpcm_frames_per_audio_packet != 0 {
                return Some((v2.const_bytes_per_audio_packet, v2.const_lpcm_frames_per_audio_packet));
            }
        }
        None
    }
}
