use crate::error::SerdeErr;

/// Sequential reader over a borrowed payload
#[derive(Clone)]
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let Some(byte) = self.buffer.get(self.position) else {
            return Err(SerdeErr);
        };
        self.position += 1;
        Ok(*byte)
    }

    /// Borrow the next `length` bytes and advance past them
    pub fn read_bytes(&mut self, length: usize) -> Result<&'b [u8], SerdeErr> {
        let end = self.position.checked_add(length).ok_or(SerdeErr)?;
        if end > self.buffer.len() {
            return Err(SerdeErr);
        }
        let bytes = &self.buffer[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Everything that has not been read yet. Does not advance the reader.
    pub fn remaining(&self) -> &'b [u8] {
        &self.buffer[self.position..]
    }

    pub fn remaining_len(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_len() == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Copy the unread remainder into a reader that owns its bytes
    pub fn to_owned(&self) -> OwnedByteReader {
        OwnedByteReader::new(self.remaining())
    }
}

/// A reader that owns its bytes, used when a payload has to outlive the
/// inbound packet it arrived in
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedByteReader {
    buffer: Box<[u8]>,
}

impl OwnedByteReader {
    pub fn new(buffer: &[u8]) -> Self {
        Self {
            buffer: buffer.into(),
        }
    }

    pub fn borrow(&self) -> ByteReader {
        ByteReader::new(&self.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }
}
