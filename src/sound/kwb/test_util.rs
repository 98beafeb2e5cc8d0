//! Synthetic wave bank builders for unit tests

use crate::sound::streamfile::Endian;

fn align16(n: usize) -> usize {
    (n + 0x0F) & !0x0F
}

fn put_u16le(buf: &mut [u8], at: usize, v: u16) {
    buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_u32le(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_u32be(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_be_bytes());
}

pub(crate) fn put_u32(buf: &mut [u8], at: usize, v: u32, endian: Endian) {
    match endian {
        Endian::Little => put_u32le(buf, at, v),
        Endian::Big => put_u32be(buf, at, v),
    }
}

pub(crate) fn put_i16(buf: &mut [u8], at: usize, v: i16, endian: Endian) {
    let bytes = match endian {
        Endian::Little => v.to_le_bytes(),
        Endian::Big => v.to_be_bytes(),
    };
    buf[at..at + 2].copy_from_slice(&bytes);
}

/// DSP header block: sample count, 16 coefficients, 2 history samples
pub(crate) fn dsp_block(num_samples: u32, coefs: &[i16; 16], hist: [i16; 2], endian: Endian) -> Vec<u8> {
    let mut block = vec![0u8; 0x60];
    put_u32(&mut block, 0x00, num_samples, endian);
    for (i, c) in coefs.iter().enumerate() {
        put_i16(&mut block, 0x1C + i * 2, *c, endian);
    }
    put_i16(&mut block, 0x40, hist[0], endian);
    put_i16(&mut block, 0x42, hist[1], endian);
    block
}

#[derive(Debug, Clone)]
pub(crate) struct SubsoundSpec {
    pub sample_rate: u16,
    pub codec: u8,
    pub channels: u8,
    pub block_size: u16,
    pub num_samples: u32,
    pub stream_offset: u32,
    pub stream_size: u32,
    pub dsp_block: Option<Vec<u8>>,
}

impl SubsoundSpec {
    pub fn pcm(channels: u8, sample_rate: u16, num_samples: u32, stream_offset: u32) -> Self {
        Self {
            sample_rate,
            codec: 0x00,
            channels,
            block_size: 0,
            num_samples,
            stream_offset,
            stream_size: num_samples * 2 * u32::from(channels),
            dsp_block: None,
        }
    }

    pub fn msadpcm(
        channels: u8,
        sample_rate: u16,
        num_samples: u32,
        stream_offset: u32,
        block_size: u16,
    ) -> Self {
        Self {
            codec: 0x10,
            block_size,
            stream_size: u32::from(block_size) * 4,
            ..Self::pcm(channels, sample_rate, num_samples, stream_offset)
        }
    }

    pub fn dsp(channels: u8, sample_rate: u16, num_samples: u32, stream_offset: u32) -> Self {
        Self {
            codec: 0x90,
            stream_size: num_samples / 14 * 8,
            ..Self::pcm(channels, sample_rate, num_samples, stream_offset)
        }
    }

    pub fn with_dsp_block(mut self, block: Vec<u8>) -> Self {
        self.dsp_block = Some(block);
        self
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Empty,
    Sound { version: u16, subs: Vec<SubsoundSpec> },
}

/// KWB2 table builder
#[derive(Debug, Clone, Default)]
pub(crate) struct Kwb2Builder {
    slots: Vec<Slot>,
}

impl Kwb2Builder {
    const VARIABLE_START: usize = 0x30;
    const VARIABLE_STRIDE: usize = 0x50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(mut self, version: u16, subs: Vec<SubsoundSpec>) -> Self {
        self.slots.push(Slot::Sound { version, subs });
        self
    }

    pub fn empty_slot(mut self) -> Self {
        self.slots.push(Slot::Empty);
        self
    }

    /// Offset of the first sub-sound when the bank has a single fixed-layout sound
    pub fn first_subsound_offset() -> u64 {
        (align16(0x18 + 4) + 0x2C) as u64
    }

    pub fn build(&self) -> Vec<u8> {
        let table_end = 0x18 + 4 * self.slots.len();
        let mut out = vec![0u8; align16(table_end)];
        out[0..4].copy_from_slice(b"KWB2");
        put_u16le(&mut out, 0x04, 0x3200);
        put_u16le(&mut out, 0x06, self.slots.len() as u16);

        for (i, slot) in self.slots.iter().enumerate() {
            let Slot::Sound { version, subs } = slot else {
                continue;
            };
            let (start, stride) = if *version < 0xC000 {
                (0x2C, 0x48)
            } else {
                (Self::VARIABLE_START, Self::VARIABLE_STRIDE)
            };

            let sound_offset = out.len();
            let size = align16(start + subs.len() * stride + 0x4C + 0x60);
            let mut sound = vec![0u8; size];
            put_u16le(&mut sound, 0x00, *version);
            sound[0x02] = 0x2B;
            sound[0x03] = subs.len() as u8;
            if *version >= 0xC000 {
                put_u16le(&mut sound, 0x2C, start as u16);
                put_u16le(&mut sound, 0x2E, stride as u16);
            }

            for (j, sub) in subs.iter().enumerate() {
                let e = start + j * stride;
                put_u16le(&mut sound, e, sub.sample_rate);
                sound[e + 0x02] = sub.codec;
                sound[e + 0x03] = sub.channels;
                put_u16le(&mut sound, e + 0x04, sub.block_size);
                put_u32le(&mut sound, e + 0x0C, sub.num_samples);
                put_u32le(&mut sound, e + 0x10, sub.stream_offset);
                put_u32le(&mut sound, e + 0x14, sub.stream_size);
                if let Some(block) = &sub.dsp_block {
                    sound[e + 0x4C..e + 0x4C + block.len()].copy_from_slice(block);
                }
            }

            put_u32le(&mut out, 0x18 + i * 4, sound_offset as u32);
            out.extend_from_slice(&sound);
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct K4hdRecord {
    pub stream_offset: u32,
    pub sample_rate: u32,
    pub stream_size: u32,
    pub codec: u32,
}

impl K4hdRecord {
    pub fn atrac9(stream_offset: u32, sample_rate: u32, stream_size: u32) -> Self {
        Self {
            stream_offset,
            sample_rate,
            stream_size,
            codec: 2,
        }
    }
}

/// K4HD/PPVA table builder
#[derive(Debug, Clone)]
pub(crate) struct K4hdBuilder {
    pub entry_size: u32,
    pub records: Vec<K4hdRecord>,
}

impl K4hdBuilder {
    pub const PPVA_OFFSET: usize = 0x20;

    pub fn new(records: Vec<K4hdRecord>) -> Self {
        Self {
            entry_size: 0x1C,
            records,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let stride = self.entry_size as usize;
        let ppva = Self::PPVA_OFFSET;
        let mut out = vec![0u8; align16(ppva + 0x20 + self.records.len() * stride.max(0x1C))];
        let chunk_size = out.len() as u32;
        out[0..4].copy_from_slice(b"K4HD");
        put_u32le(&mut out, 0x04, chunk_size);
        put_u16le(&mut out, 0x18, ppva as u16);

        out[ppva..ppva + 4].copy_from_slice(b"PPVA");
        put_u32le(&mut out, ppva + 0x08, self.entry_size);
        put_u32le(&mut out, ppva + 0x0C, u32::MAX);
        put_u32le(&mut out, ppva + 0x14, (self.records.len() as u32).wrapping_sub(1));

        for (i, rec) in self.records.iter().enumerate() {
            let r = ppva + 0x20 + i * stride;
            put_u32le(&mut out, r, rec.stream_offset);
            put_u32le(&mut out, r + 0x04, rec.sample_rate);
            put_u32le(&mut out, r + 0x08, rec.stream_size);
            put_u32le(&mut out, r + 0x0C, u32::MAX);
            put_u32le(&mut out, r + 0x10, rec.codec);
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SdwiRecord {
    pub stream_offset: u32,
    pub sample_rate: u32,
    pub stream_size: u32,
}

/// SDWi/Smpl table builder
#[derive(Debug, Clone)]
pub(crate) struct SdwiBuilder {
    pub records: Vec<SdwiRecord>,
    pub smpl_tag: [u8; 4],
}

impl SdwiBuilder {
    pub const SMPL_OFFSET: usize = 0x40;

    pub fn new(records: Vec<SdwiRecord>) -> Self {
        Self {
            records,
            smpl_tag: *b"Smpl",
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let smpl = Self::SMPL_OFFSET;
        let mut out = vec![0u8; smpl + 0x10 + self.records.len() * 0x40];
        out[0..8].copy_from_slice(b"SDWiVers");
        out[0x10..0x18].copy_from_slice(b"SDsdHead");
        put_u32be(&mut out, 0x28, smpl as u32);

        out[smpl..smpl + 4].copy_from_slice(b"SDsd");
        out[smpl + 4..smpl + 8].copy_from_slice(&self.smpl_tag);
        put_u32le(&mut out, smpl + 0x0C, self.records.len() as u32);

        for (i, rec) in self.records.iter().enumerate() {
            let r = smpl + 0x10 + i * 0x40;
            out[r..r + 2].copy_from_slice(b"SS");
            put_u32be(&mut out, r + 0x04, rec.stream_offset);
            put_u32be(&mut out, r + 0x10, rec.sample_rate);
            put_u32be(&mut out, r + 0x24, rec.stream_size);
        }
        out
    }
}

/// Wrap a variant table and body payload into WBH_/WBD_ regions
pub(crate) fn region(magic: &[u8; 4], payload: &[u8], endian: Endian) -> Vec<u8> {
    let mut out = vec![0u8; 0x0C];
    put_u32(&mut out, 0x00, u32::from_be_bytes(*magic), endian);
    put_u32(&mut out, 0x04, 0x30303030, endian);
    put_u32(&mut out, 0x08, (0x0C + payload.len()) as u32, endian);
    out.extend_from_slice(payload);
    out
}

/// Separate header and body files
pub(crate) fn split_bank(variant: &[u8], body: &[u8], endian: Endian) -> (Vec<u8>, Vec<u8>) {
    (region(b"WBH_", variant, endian), region(b"WBD_", body, endian))
}

/// Single WHD1 file; returns the bytes and the body region offset
pub(crate) fn fused_bank(variant: &[u8], body: &[u8], endian: Endian) -> (Vec<u8>, u64) {
    let head = region(b"WBH_", variant, endian);
    let body = region(b"WBD_", body, endian);

    let head_offset = 0x40;
    let body_offset = align16(head_offset + head.len());
    let mut out = vec![0u8; body_offset];

    out[0..4].copy_from_slice(b"WHD1");
    out[0x08] = if endian.is_big() { 0xFF } else { 0x00 };
    put_u32(&mut out, 0x0C, 0x20, endian);
    put_u32(&mut out, 0x20, head_offset as u32, endian);
    put_u32(&mut out, 0x24, body_offset as u32, endian);
    out[head_offset..head_offset + head.len()].copy_from_slice(&head);
    out.extend_from_slice(&body);
    let file_size = out.len() as u32;
    put_u32(&mut out, 0x10, file_size, endian);

    (out, body_offset as u64)
}
