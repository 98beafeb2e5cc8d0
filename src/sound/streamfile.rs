//! Random-access byte readers used by the container parsers
//!
//! A `StreamFile` is a read-only view of one region of bytes (a header file,
//! a body file, or a single fused file). All reads are positioned; nothing is
//! cached. A short read is reported as `UnexpectedEof` so parsers never act on
//! bytes that were not actually present.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use parking_lot::Mutex;

/// Positioned, read-only byte source
pub trait StreamFile {
    /// Read up to `buf.len()` bytes starting at `offset`, returning the count read
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Total size in bytes
    fn size(&self) -> u64;

    /// Name for logging purposes
    fn name(&self) -> &str;
}

/// Fixed-width readers over any `StreamFile`
pub trait StreamFileExt: StreamFile {
    /// Fill `buf` completely from `offset` or fail with `UnexpectedEof`
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let mut done = 0;
        while done < buf.len() {
            let n = self.read_at(offset + done as u64, &mut buf[done..])?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "{}: short read of {} bytes at 0x{:x}",
                        self.name(),
                        buf.len(),
                        offset
                    ),
                ));
            }
            done += n;
        }
        Ok(())
    }

    fn read_u8(&self, offset: u64) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact_at(offset, &mut buf)?;
        Ok(buf[0])
    }

    fn read_u16le(&self, offset: u64) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_at(offset, &mut buf)?;
        Ok(LittleEndian::read_u16(&buf))
    }

    fn read_u16be(&self, offset: u64) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_at(offset, &mut buf)?;
        Ok(BigEndian::read_u16(&buf))
    }

    fn read_u32le(&self, offset: u64) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_at(offset, &mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    fn read_u32be(&self, offset: u64) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_at(offset, &mut buf)?;
        Ok(BigEndian::read_u32(&buf))
    }
}

impl<T: StreamFile + ?Sized> StreamFileExt for T {}

/// Byte order of multi-byte fields whose endianness depends on the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    pub fn is_big(self) -> bool {
        self == Endian::Big
    }

    pub fn read_u32(self, sf: &dyn StreamFile, offset: u64) -> io::Result<u32> {
        match self {
            Endian::Little => sf.read_u32le(offset),
            Endian::Big => sf.read_u32be(offset),
        }
    }

    pub fn read_s32(self, sf: &dyn StreamFile, offset: u64) -> io::Result<i32> {
        self.read_u32(sf, offset).map(|v| v as i32)
    }

    pub fn read_s16(self, sf: &dyn StreamFile, offset: u64) -> io::Result<i16> {
        let v = match self {
            Endian::Little => sf.read_u16le(offset)?,
            Endian::Big => sf.read_u16be(offset)?,
        };
        Ok(v as i16)
    }
}

/// In-memory byte source
#[derive(Debug, Clone)]
pub struct MemoryStreamFile {
    data: Vec<u8>,
    name: String,
}

impl MemoryStreamFile {
    pub fn new(data: Vec<u8>, name: impl Into<String>) -> Self {
        Self {
            data,
            name: name.into(),
        }
    }
}

impl StreamFile for MemoryStreamFile {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.data.len() as u64;
        if offset >= len {
            return Ok(0);
        }
        let start = offset as usize;
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// File-backed byte source
///
/// The handle is shared behind a mutex so reads can take `&self`; each read
/// seeks explicitly, so interleaved callers never observe each other's cursor.
#[derive(Debug)]
pub struct FileStreamFile {
    file: Mutex<File>,
    size: u64,
    name: String,
}

impl FileStreamFile {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            file: Mutex::new(file),
            size,
            name: path.display().to_string(),
        })
    }
}

impl StreamFile for FileStreamFile {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if offset >= self.size {
            return Ok(0);
        }
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read(buf)
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> MemoryStreamFile {
        MemoryStreamFile::new(vec![0x12, 0x34, 0x56, 0x78, 0x9A], "sample")
    }

    #[test]
    fn test_fixed_width_reads() {
        let sf = sample();
        assert_eq!(sf.read_u8(4).unwrap(), 0x9A);
        assert_eq!(sf.read_u16le(0).unwrap(), 0x3412);
        assert_eq!(sf.read_u16be(0).unwrap(), 0x1234);
        assert_eq!(sf.read_u32le(0).unwrap(), 0x78563412);
        assert_eq!(sf.read_u32be(1).unwrap(), 0x3456789A);
    }

    #[test]
    fn test_short_read_is_eof() {
        let sf = sample();
        let err = sf.read_u32le(2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(sf.read_u8(5).is_err());
    }

    #[test]
    fn test_endian_dispatch() {
        let sf = sample();
        assert_eq!(Endian::Little.read_u32(&sf, 0).unwrap(), 0x78563412);
        assert_eq!(Endian::Big.read_u32(&sf, 0).unwrap(), 0x12345678);
        assert_eq!(Endian::Big.read_s16(&sf, 3).unwrap(), 0x789Au16 as i16);
        assert!(Endian::Big.is_big());
        assert!(!Endian::default().is_big());
    }

    #[test]
    fn test_file_stream_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[1, 0, 0, 0, 2, 0, 0, 0]).unwrap();
        tmp.flush().unwrap();

        let sf = FileStreamFile::open(tmp.path()).unwrap();
        assert_eq!(sf.size(), 8);
        assert_eq!(sf.read_u32le(4).unwrap(), 2);
        assert_eq!(sf.read_u32le(0).unwrap(), 1);
        assert!(sf.read_u32le(6).is_err());
    }
}
