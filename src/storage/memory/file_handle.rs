/*!
 * Stream Adapters
 * std::io::Read / std::io::Write over a shared MemFile
 */

use std::io::{self, Read, Write};

use super::super::traits::File;
use super::file::MemFile;

impl Read for &MemFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        File::read(*self, buf).map_err(io::Error::from)
    }
}

impl Write for &MemFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        File::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
