//! Fixed-layout binary codec with a runtime byte-order parameter.
//!
//! serde describes the value, bincode's fixint encoding gives it a fixed
//! layout, and [`ByteOrder`] picks endianness per call. The latch wraps
//! these routines for error capture only; the wire format is entirely this
//! module's concern.

use std::io::{Read, Write};

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Byte order for [`decode_from`] and [`encode_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

fn options() -> impl Options {
    bincode::options().with_fixint_encoding()
}

/// Decodes one fixed-layout value from `reader`.
///
/// Reads exactly the encoded size of `T`; trailing stream content is left
/// for the next call.
pub fn decode_from<T, R>(reader: &mut R, order: ByteOrder) -> bincode::Result<T>
where
    T: DeserializeOwned,
    R: Read + ?Sized,
{
    match order {
        ByteOrder::Big => options().with_big_endian().deserialize_from(reader),
        ByteOrder::Little => options().with_little_endian().deserialize_from(reader),
    }
}

/// Encodes one fixed-layout value into `writer`.
pub fn encode_into<T, W>(writer: &mut W, order: ByteOrder, value: &T) -> bincode::Result<()>
where
    T: Serialize + ?Sized,
    W: Write + ?Sized,
{
    match order {
        ByteOrder::Big => options().with_big_endian().serialize_into(writer, value),
        ByteOrder::Little => options().with_little_endian().serialize_into(writer, value),
    }
}
