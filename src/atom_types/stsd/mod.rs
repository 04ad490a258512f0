mod stsd;
mod format;
mod video;
mod audio;
mod sample;

pub use stsd::Stsd;
pub use sample::{CodecPrivate, SampleDescription};
pub(crate) use sample::find_codec_private;
pub use format::AudioFormat;
pub use video::Video;
pub use audio::Audio;
