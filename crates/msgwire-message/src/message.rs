use bytes::{Bytes, BytesMut};

use crate::error::{Result, WireError};
use crate::serializable::Serializable;

/// Default message capacity: 1225 bytes of payload.
pub const DEFAULT_CAPACITY_BITS: usize = 1225 * 8;

/// Width of the length prefix written ahead of every array.
pub const ARRAY_LENGTH_BITS: usize = 16;

/// Longest array representable by the length prefix.
pub const MAX_ARRAY_LENGTH: usize = u16::MAX as usize;

/// Fixed-width value that can be packed into a message bit-for-bit.
pub trait Primitive: Copy + 'static {
    /// Number of bits the value occupies on the wire.
    const BITS: usize;

    fn to_wire(self) -> u64;

    fn from_wire(bits: u64) -> Self;
}

macro_rules! unsigned_primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                const BITS: usize = <$ty>::BITS as usize;

                fn to_wire(self) -> u64 {
                    self as u64
                }

                fn from_wire(bits: u64) -> Self {
                    bits as $ty
                }
            }
        )*
    };
}

macro_rules! signed_primitive {
    ($($ty:ty => $unsigned:ty),*) => {
        $(
            impl Primitive for $ty {
                const BITS: usize = <$ty>::BITS as usize;

                fn to_wire(self) -> u64 {
                    self as $unsigned as u64
                }

                fn from_wire(bits: u64) -> Self {
                    bits as $unsigned as $ty
                }
            }
        )*
    };
}

unsigned_primitive!(u8, u16, u32, u64);
signed_primitive!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);

impl Primitive for bool {
    const BITS: usize = 1;

    fn to_wire(self) -> u64 {
        self as u64
    }

    fn from_wire(bits: u64) -> Self {
        bits & 1 == 1
    }
}

impl Primitive for f32 {
    const BITS: usize = 32;

    fn to_wire(self) -> u64 {
        self.to_bits() as u64
    }

    fn from_wire(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl Primitive for f64 {
    const BITS: usize = 64;

    fn to_wire(self) -> u64 {
        self.to_bits()
    }

    fn from_wire(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

/// Bit-packed message buffer with a fixed capacity.
///
/// Writes advance a write cursor and reads advance an independent read
/// cursor. Every write checks the remaining capacity first, so a failed
/// write leaves the message exactly as it was.
#[derive(Debug, Clone)]
pub struct Message {
    buf: BytesMut,
    capacity_bits: usize,
    write_bit: usize,
    read_bit: usize,
}

impl Message {
    /// Create an empty message with [`DEFAULT_CAPACITY_BITS`].
    pub fn new() -> Self {
        Self::with_capacity_bits(DEFAULT_CAPACITY_BITS)
    }

    /// Create an empty message able to hold `capacity_bits` bits.
    pub fn with_capacity_bits(capacity_bits: usize) -> Self {
        Self {
            buf: BytesMut::zeroed(capacity_bits.div_ceil(8)),
            capacity_bits,
            write_bit: 0,
            read_bit: 0,
        }
    }

    /// Wrap received bytes for reading. The message is full.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bits = bytes.len() * 8;
        Self {
            buf: BytesMut::from(bytes),
            capacity_bits: bits,
            write_bit: bits,
            read_bit: 0,
        }
    }

    pub fn capacity_bits(&self) -> usize {
        self.capacity_bits
    }

    pub fn written_bits(&self) -> usize {
        self.write_bit
    }

    /// Remaining capacity in bits.
    pub fn unwritten_bits(&self) -> usize {
        self.capacity_bits - self.write_bit
    }

    pub fn unread_bits(&self) -> usize {
        self.write_bit - self.read_bit
    }

    /// Skip `bits` bits of capacity and return the offset where they start.
    ///
    /// Reserved bits read back as zero.
    pub fn reserve_bits(&mut self, bits: usize) -> Result<usize> {
        let available_bits = self.unwritten_bits();
        if bits > available_bits {
            return Err(WireError::ReserveCapacityExceeded {
                required_bits: bits,
                available_bits,
            });
        }

        let start = self.write_bit;
        self.zero_bits(start, start + bits);
        self.write_bit += bits;
        Ok(start)
    }

    /// Append a single value.
    pub fn add<T: Primitive>(&mut self, value: T) -> Result<&mut Self> {
        let available_bits = self.unwritten_bits();
        if T::BITS > available_bits {
            return Err(WireError::ValueCapacityExceeded {
                type_name: std::any::type_name::<T>(),
                required_bits: T::BITS,
                available_bits,
            });
        }

        self.write_raw(value.to_wire(), self.write_bit, T::BITS);
        self.write_bit += T::BITS;
        Ok(self)
    }

    /// Append a length-prefixed array.
    pub fn add_array<T: Primitive>(&mut self, values: &[T]) -> Result<&mut Self> {
        if values.len() > MAX_ARRAY_LENGTH {
            return Err(WireError::ArrayTooLong {
                type_name: std::any::type_name::<T>(),
                array_length: values.len(),
                max_length: MAX_ARRAY_LENGTH,
            });
        }

        let available_bits = self.unwritten_bits();
        let required_bits_total = values.len() * T::BITS + ARRAY_LENGTH_BITS;
        if required_bits_total > available_bits {
            return Err(WireError::ArrayCapacityExceeded {
                type_name: std::any::type_name::<T>(),
                array_length: values.len(),
                required_bits_total,
                available_bits,
            });
        }

        self.write_raw(values.len() as u64, self.write_bit, ARRAY_LENGTH_BITS);
        self.write_bit += ARRAY_LENGTH_BITS;
        for value in values {
            self.write_raw(value.to_wire(), self.write_bit, T::BITS);
            self.write_bit += T::BITS;
        }
        Ok(self)
    }

    /// Append a serializable value. On failure the write cursor is restored.
    pub fn add_serializable<T: Serializable>(&mut self, value: &T) -> Result<&mut Self> {
        self.write_atomic(|message| value.serialize(message))
    }

    /// Append a 16-bit ID followed by a serializable value, or nothing.
    pub fn add_tagged<T: Serializable>(&mut self, id: u16, value: &T) -> Result<&mut Self> {
        self.write_atomic(|message| {
            message.add(id)?;
            value.serialize(message)
        })
    }

    /// Run a sequence of writes, restoring the write cursor if any fails.
    ///
    /// Bits written before the failure are zeroed again, so the padding of
    /// the last byte stays clean.
    pub fn write_atomic<F>(&mut self, write: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let start = self.write_bit;
        if let Err(err) = write(&mut *self) {
            let end = self.write_bit.max(start);
            self.zero_bits(start, end);
            self.write_bit = start;
            return Err(err);
        }
        Ok(self)
    }

    /// Run a sequence of reads, restoring the read cursor if any fails.
    pub fn read_atomic<R, F>(&mut self, read: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        let start = self.read_bit;
        read(&mut *self).inspect_err(|_| self.read_bit = start)
    }

    /// Read the next value.
    pub fn get<T: Primitive>(&mut self) -> Result<T> {
        let unread_bits = self.unread_bits();
        if T::BITS > unread_bits {
            return Err(WireError::InsufficientData {
                type_name: std::any::type_name::<T>(),
                required_bits: T::BITS,
                unread_bits,
            });
        }

        let value = T::from_wire(self.read_raw(self.read_bit, T::BITS));
        self.read_bit += T::BITS;
        Ok(value)
    }

    /// Read the next length-prefixed array.
    pub fn get_array<T: Primitive>(&mut self) -> Result<Vec<T>> {
        let start = self.read_bit;
        let len = self.get::<u16>()? as usize;

        let unread_bits = self.unread_bits();
        let required_bits = len * T::BITS;
        if required_bits > unread_bits {
            self.read_bit = start;
            return Err(WireError::InsufficientData {
                type_name: std::any::type_name::<T>(),
                required_bits,
                unread_bits,
            });
        }

        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(T::from_wire(self.read_raw(self.read_bit, T::BITS)));
            self.read_bit += T::BITS;
        }
        Ok(values)
    }

    /// Read a serializable value. On failure the read cursor is restored.
    pub fn get_serializable<T: Serializable>(&mut self) -> Result<T> {
        self.read_atomic(T::deserialize)
    }

    /// Discard all content and reset both cursors.
    pub fn clear(&mut self) {
        self.buf.iter_mut().for_each(|byte| *byte = 0);
        self.write_bit = 0;
        self.read_bit = 0;
    }

    /// Written content, padded with zero bits to a whole byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.write_bit.div_ceil(8)]
    }

    /// Consume the message and return its written content.
    pub fn into_bytes(self) -> Bytes {
        let len = self.write_bit.div_ceil(8);
        let mut buf = self.buf;
        buf.truncate(len);
        buf.freeze()
    }

    fn zero_bits(&mut self, start: usize, end: usize) {
        for pos in start..end {
            self.buf[pos / 8] &= !(1u8 << (pos % 8));
        }
    }

    fn write_raw(&mut self, value: u64, offset: usize, bits: usize) {
        for i in 0..bits {
            let pos = offset + i;
            let mask = 1u8 << (pos % 8);
            if (value >> i) & 1 == 1 {
                self.buf[pos / 8] |= mask;
            } else {
                self.buf[pos / 8] &= !mask;
            }
        }
    }

    fn read_raw(&self, offset: usize, bits: usize) -> u64 {
        let mut value = 0u64;
        for i in 0..bits {
            let pos = offset + i;
            if (self.buf[pos / 8] >> (pos % 8)) & 1 == 1 {
                value |= 1 << i;
            }
        }
        value
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}
