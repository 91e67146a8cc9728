//! Byte-level encoding helpers for the bookkeeper wire format.
//!
//! Variable-length integers and length-prefixed byte strings, written to any
//! `io::Write` and read back from a slice cursor.

use std::io::Write;

use crate::program::error::{SdkError, SdkResult};

// ============================================================================
// Writing
// ============================================================================

fn write_all<W: Write>(w: &mut W, bytes: &[u8]) -> SdkResult<()> {
    w.write_all(bytes)
        .map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Write a single byte.
pub fn write_u8<W: Write>(w: &mut W, value: u8) -> SdkResult<()> {
    write_all(w, &[value])
}

/// Write a variable-length unsigned integer.
///
/// - `< 0xFD`: one byte
/// - `<= 0xFFFF`: `0xFD` + u16 LE
/// - `<= 0xFFFF_FFFF`: `0xFE` + u32 LE
/// - otherwise: `0xFF` + u64 LE
pub fn write_varint<W: Write>(w: &mut W, value: u64) -> SdkResult<()> {
    if value < 0xFD {
        write_u8(w, value as u8)
    } else if value <= 0xFFFF {
        write_u8(w, 0xFD)?;
        write_all(w, &(value as u16).to_le_bytes())
    } else if value <= 0xFFFF_FFFF {
        write_u8(w, 0xFE)?;
        write_all(w, &(value as u32).to_le_bytes())
    } else {
        write_u8(w, 0xFF)?;
        write_all(w, &value.to_le_bytes())
    }
}

/// Write a varint length prefix followed by the bytes.
pub fn write_var_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> SdkResult<()> {
    write_varint(w, bytes.len() as u64)?;
    write_all(w, bytes)
}

// ============================================================================
// Reading
// ============================================================================

/// Forward-only cursor over an encoded record.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> SdkResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(SdkError::InvalidDataLength {
                expected: self.pos.saturating_add(len),
                actual: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> SdkResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_varint(&mut self) -> SdkResult<u64> {
        match self.read_u8()? {
            0xFD => {
                let mut buf = [0u8; 2];
                buf.copy_from_slice(self.read_bytes(2)?);
                Ok(u16::from_le_bytes(buf) as u64)
            }
            0xFE => {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(self.read_bytes(4)?);
                Ok(u32::from_le_bytes(buf) as u64)
            }
            0xFF => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(self.read_bytes(8)?);
                Ok(u64::from_le_bytes(buf))
            }
            small => Ok(small as u64),
        }
    }

    pub fn read_var_bytes(&mut self) -> SdkResult<&'a [u8]> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| SdkError::InvalidDataLength {
            expected: usize::MAX,
            actual: self.data.len(),
        })?;
        self.read_bytes(len)
    }

    /// Fail if any bytes remain after decoding.
    pub fn finish(self) -> SdkResult<()> {
        if self.remaining() != 0 {
            return Err(SdkError::InvalidDataLength {
                expected: self.pos,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_varint(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint(&mut buf, value).unwrap();
        buf
    }

    #[test]
    fn test_varint_boundaries() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(0xFC), vec![0xFC]);
        assert_eq!(encode_varint(0xFD), vec![0xFD, 0xFD, 0x00]);
        assert_eq!(encode_varint(0xFFFF), vec![0xFD, 0xFF, 0xFF]);
        assert_eq!(encode_varint(0x1_0000), vec![0xFE, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(encode_varint(0x1_0000_0000).len(), 9);
    }

    #[test]
    fn test_reader_varint_and_bytes() {
        let mut buf = Vec::new();
        write_var_bytes(&mut buf, &[7u8; 300]).unwrap();
        write_u8(&mut buf, 9).unwrap();

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.read_var_bytes().unwrap(), &[7u8; 300][..]);
        assert_eq!(reader.read_u8().unwrap(), 9);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_reader_short_input() {
        let mut reader = Reader::new(&[0x05, 0x01, 0x02]);
        assert!(matches!(
            reader.read_var_bytes(),
            Err(SdkError::InvalidDataLength { expected: 6, actual: 3 })
        ));
    }

    #[test]
    fn test_reader_trailing_bytes() {
        let mut reader = Reader::new(&[0x01, 0x02]);
        reader.read_u8().unwrap();
        assert!(reader.finish().is_err());
    }

    #[test]
    fn test_write_failure_maps_to_serialization() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = write_var_bytes(&mut Broken, b"abc").unwrap_err();
        assert!(matches!(err, SdkError::Serialization(msg) if msg.contains("sink closed")));
    }
}
