//! A minimal random-access file read abstraction, used by the table reader.
//!
//! The on-disk format only ever needs positioned reads (no writes, no sequential cursor state is
//! shared across calls), so this crate does not pull in a virtual-filesystem abstraction layer;
//! a single trait over `pread`-style reads is enough, and is implemented for `std::fs::File`.

use std::fs::File;
use std::io::Result as IoResult;
#[cfg(unix)]
use std::os::unix::fs::FileExt as _;

/// A file that supports reading an exact number of bytes at an absolute offset, without
/// disturbing any other reader of the same handle.
pub trait RandomAccessFile {
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<()>;

    fn len(&self) -> IoResult<u64>;
}

impl RandomAccessFile for File {
    #[cfg(unix)]
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<()> {
        FileExt::read_exact_at(self, buf, offset)
    }

    #[cfg(not(unix))]
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<()> {
        use std::io::{Read, Seek, SeekFrom};
        // Non-unix platforms pay for a `dup`-free seek+read; correctness, not performance,
        // matters for those targets here.
        let mut file = self.try_clone()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }

    fn len(&self) -> IoResult<u64> {
        Ok(self.metadata()?.len())
    }
}
