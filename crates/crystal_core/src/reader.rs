use std::io::{self, Read, Write};

/// Sequential big-endian reads over a fixed record, matching the Game Boy's
/// high-byte-first storage of multi-byte creature fields.
pub struct BigEndianReader<R> {
    inner: R,
}

impl<R: Read> BigEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Three-byte value, as used for experience points.
    pub fn read_u24(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 3];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
    }

    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u16_array<const N: usize>(&mut self) -> io::Result<[u16; N]> {
        let mut result = [0u16; N];
        for item in &mut result {
            *item = self.read_u16()?;
        }
        Ok(result)
    }
}

pub struct BigEndianWriter<W> {
    inner: W,
}

impl<W: Write> BigEndianWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.inner.write_all(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.inner.write_all(&value.to_be_bytes())
    }

    pub fn write_u24(&mut self, value: u32) -> io::Result<()> {
        if value > 0x00FF_FFFF {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("value {value} does not fit in 24 bits"),
            ));
        }
        self.inner.write_all(&value.to_be_bytes()[1..])
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    pub fn write_u16_slice(&mut self, values: &[u16]) -> io::Result<()> {
        for &value in values {
            self.write_u16(value)?;
        }
        Ok(())
    }
}
