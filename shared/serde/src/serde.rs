use crate::{byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr};

/// A value that can be written to and read back from a byte stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Append the value to the given writer
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Parse a value from the reader, advancing it past the consumed bytes
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;
}
