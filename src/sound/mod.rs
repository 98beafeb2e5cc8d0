//! Wave bank parsing and segmented playback
//!
//! # Architecture
//!
//! - `streamfile` provides positioned, endian-aware reads over files or memory
//! - `kwb` parses Koei Tecmo wave bank headers into `StreamDescriptor`s and
//!   resolves codec setup for a subsong
//! - `DecodableStream` trait is what layouts render from
//! - `SilenceStream` and `Pcm16Stream` are the in-crate stream implementations
//! - `SegmentedLayout` plays several streams back to back with an optional
//!   loop segment, driving a parent `PlaybackState`

pub mod atrac9;
pub mod decoder;
pub mod kwb;
pub mod null;
pub mod pcm;
pub mod playback;
pub mod segmented;
pub mod streamfile;

pub use atrac9::Atrac9Config;
pub use decoder::{DecodableStream, DecodeError, DecodeResult};
pub use kwb::{
    open_split, open_wavebank, parse_wavebank, Codec, CodecConfig, ContainerHandle, FormatError,
    StreamDescriptor, StreamSetup, WaveBankFiles,
};
pub use null::SilenceStream;
pub use pcm::Pcm16Stream;
pub use playback::PlaybackState;
pub use segmented::{LayoutError, SegmentedLayout};
pub use streamfile::{Endian, FileStreamFile, MemoryStreamFile, StreamFile, StreamFileExt};
