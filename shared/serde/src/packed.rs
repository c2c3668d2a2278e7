use crate::{byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr};

/// Longest encoding of a packed u64: 7 payload bits per byte
pub const MAX_PACKED_BYTES: usize = 10;

/// Write `value` 7 bits at a time, low bits first. The high bit of each
/// byte says whether another byte follows.
pub fn write_packed_u64(writer: &mut dyn ByteWrite, mut value: u64) {
    loop {
        let proceed = value >= 0x80;
        let mut byte = (value & 0x7F) as u8;
        if proceed {
            byte |= 0x80;
        }
        writer.write_byte(byte);
        value >>= 7;
        if !proceed {
            return;
        }
    }
}

pub fn read_packed_u64(reader: &mut ByteReader) -> Result<u64, SerdeErr> {
    let mut output: u64 = 0;

    for index in 0..MAX_PACKED_BYTES {
        let byte = reader.read_byte()?;
        let bits = u64::from(byte & 0x7F);

        // the tenth byte may only carry the single remaining bit
        if index == MAX_PACKED_BYTES - 1 && bits > 1 {
            return Err(SerdeErr);
        }

        output |= bits << (7 * index);

        if byte & 0x80 == 0 {
            return Ok(output);
        }
    }

    Err(SerdeErr)
}

/// Zig-zag maps small negative numbers onto small unsigned ones so they pack
/// as tightly as small positive ones
pub fn write_packed_i64(writer: &mut dyn ByteWrite, value: i64) {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    write_packed_u64(writer, zigzag);
}

pub fn read_packed_i64(reader: &mut ByteReader) -> Result<i64, SerdeErr> {
    let zigzag = read_packed_u64(reader)?;
    Ok(((zigzag >> 1) as i64) ^ -((zigzag & 1) as i64))
}

/// Packed length followed by the raw bytes
pub fn write_byte_array(writer: &mut dyn ByteWrite, bytes: &[u8]) {
    write_packed_u64(writer, bytes.len() as u64);
    writer.write_bytes(bytes);
}

pub fn read_byte_array<'b>(reader: &mut ByteReader<'b>) -> Result<&'b [u8], SerdeErr> {
    let length = read_packed_u64(reader)?;
    let length = usize::try_from(length).map_err(|_| SerdeErr)?;
    reader.read_bytes(length)
}
