//! # Tessera Serde
//! Byte-level serialization primitives for the tessera replication protocol.
//! Integers are written as variable-width packed values, floats as raw
//! little-endian bytes.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod byte_writer;
mod error;
mod impls;
mod packed;
mod serde;

pub use byte_reader::{ByteReader, OwnedByteReader};
pub use byte_writer::{ByteWrite, ByteWriter};
pub use error::SerdeErr;
pub use packed::{
    read_byte_array, read_packed_i64, read_packed_u64, write_byte_array, write_packed_i64,
    write_packed_u64, MAX_PACKED_BYTES,
};
pub use serde::Serde;
