use crate::{
    byte_reader::ByteReader,
    byte_writer::ByteWrite,
    error::SerdeErr,
    packed::{read_packed_i64, read_packed_u64, write_packed_i64, write_packed_u64},
    serde::Serde,
};

// Booleans

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SerdeErr),
        }
    }
}

// Unsigned integers, packed

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }
}

macro_rules! impl_packed_unsigned {
    ($($t:ty),*) => {$(
        impl Serde for $t {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                write_packed_u64(writer, u64::from(*self));
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                <$t>::try_from(read_packed_u64(reader)?).map_err(|_| SerdeErr)
            }
        }
    )*};
}

impl_packed_unsigned!(u16, u32, u64);

// Signed integers, zig-zag packed

macro_rules! impl_packed_signed {
    ($($t:ty),*) => {$(
        impl Serde for $t {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                write_packed_i64(writer, i64::from(*self));
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                <$t>::try_from(read_packed_i64(reader)?).map_err(|_| SerdeErr)
            }
        }
    )*};
}

impl_packed_signed!(i16, i32, i64);

// Floats

impl Serde for f32 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let bytes = reader.read_bytes(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(f32::from_le_bytes(raw))
    }
}

// Strings

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_packed_u64(writer, self.len() as u64);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = usize::try_from(read_packed_u64(reader)?).map_err(|_| SerdeErr)?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr)
    }
}

// Options

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        if let Some(value) = self {
            true.ser(writer);
            value.ser(writer);
        } else {
            false.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}
