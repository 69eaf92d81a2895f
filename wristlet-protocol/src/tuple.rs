//! Key-tagged values carried inside a dictionary
//!
//! A [`Tuplet`] is the writer-side description of a value ("put this integer
//! under key 1"). A [`Tuple`] is the reader-side view of an encoded value,
//! borrowing straight from the received payload.

/// Size of the per-tuple header: key (4) + type (1) + length (2)
pub const TUPLE_HEADER_SIZE: usize = 7;

/// Value type tag as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TupleType {
    /// Raw bytes
    ByteArray = 0,
    /// NUL-terminated string; the length includes the terminator
    CString = 1,
    /// Unsigned little-endian integer of 1, 2 or 4 bytes
    UInt = 2,
    /// Signed little-endian integer of 1, 2 or 4 bytes
    Int = 3,
}

impl TupleType {
    /// Parse a type tag from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TupleType::ByteArray),
            1 => Some(TupleType::CString),
            2 => Some(TupleType::UInt),
            3 => Some(TupleType::Int),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// A value to be written into a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TupleValue<'a> {
    Bytes(&'a [u8]),
    CString(&'a str),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    Int8(i8),
    Int16(i16),
    Int32(i32),
}

impl TupleValue<'_> {
    /// Wire type tag for this value
    pub fn tuple_type(&self) -> TupleType {
        match self {
            TupleValue::Bytes(_) => TupleType::ByteArray,
            TupleValue::CString(_) => TupleType::CString,
            TupleValue::UInt8(_) | TupleValue::UInt16(_) | TupleValue::UInt32(_) => {
                TupleType::UInt
            }
            TupleValue::Int8(_) | TupleValue::Int16(_) | TupleValue::Int32(_) => TupleType::Int,
        }
    }

    /// Number of value bytes on the wire
    pub fn encoded_len(&self) -> usize {
        match self {
            TupleValue::Bytes(bytes) => bytes.len(),
            TupleValue::CString(s) => s.len() + 1,
            TupleValue::UInt8(_) | TupleValue::Int8(_) => 1,
            TupleValue::UInt16(_) | TupleValue::Int16(_) => 2,
            TupleValue::UInt32(_) | TupleValue::Int32(_) => 4,
        }
    }

    /// Write the value bytes into `out`, which must be exactly `encoded_len()` long
    pub(crate) fn write_into(&self, out: &mut [u8]) {
        match self {
            TupleValue::Bytes(bytes) => out.copy_from_slice(bytes),
            TupleValue::CString(s) => {
                let len = s.len();
                out[..len].copy_from_slice(s.as_bytes());
                out[len] = 0;
            }
            TupleValue::UInt8(v) => out[0] = *v,
            TupleValue::UInt16(v) => out.copy_from_slice(&v.to_le_bytes()),
            TupleValue::UInt32(v) => out.copy_from_slice(&v.to_le_bytes()),
            TupleValue::Int8(v) => out[0] = *v as u8,
            TupleValue::Int16(v) => out.copy_from_slice(&v.to_le_bytes()),
            TupleValue::Int32(v) => out.copy_from_slice(&v.to_le_bytes()),
        }
    }
}

/// Writer-side key/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuplet<'a> {
    pub key: u32,
    pub value: TupleValue<'a>,
}

impl<'a> Tuplet<'a> {
    pub const fn new(key: u32, value: TupleValue<'a>) -> Self {
        Self { key, value }
    }

    /// Single-byte unsigned integer
    pub const fn uint8(key: u32, value: u8) -> Self {
        Self::new(key, TupleValue::UInt8(value))
    }

    pub const fn int8(key: u32, value: i8) -> Self {
        Self::new(key, TupleValue::Int8(value))
    }

    pub const fn uint32(key: u32, value: u32) -> Self {
        Self::new(key, TupleValue::UInt32(value))
    }

    /// NUL-terminated string
    pub const fn cstring(key: u32, value: &'a str) -> Self {
        Self::new(key, TupleValue::CString(value))
    }

    pub const fn bytes(key: u32, value: &'a [u8]) -> Self {
        Self::new(key, TupleValue::Bytes(value))
    }

    /// Total encoded size including the tuple header
    pub fn encoded_size(&self) -> usize {
        TUPLE_HEADER_SIZE + self.value.encoded_len()
    }
}

/// Reader-side view of an encoded tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuple<'a> {
    pub key: u32,
    pub tuple_type: TupleType,
    data: &'a [u8],
}

impl<'a> Tuple<'a> {
    pub(crate) fn new(key: u32, tuple_type: TupleType, data: &'a [u8]) -> Self {
        Self {
            key,
            tuple_type,
            data,
        }
    }

    /// Raw value bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Length of the value in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First value byte of an integer tuple
    ///
    /// Wider integers yield their least significant byte, matching a read
    /// through the narrowest member of the value union.
    pub fn as_u8(&self) -> Option<u8> {
        match self.tuple_type {
            TupleType::UInt | TupleType::Int => self.data.first().copied(),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        self.as_u8().map(|b| b as i8)
    }

    /// Integer value zero-extended to 32 bits
    pub fn as_u32(&self) -> Option<u32> {
        if self.tuple_type != TupleType::UInt && self.tuple_type != TupleType::Int {
            return None;
        }
        match *self.data {
            [b0] => Some(b0 as u32),
            [b0, b1] => Some(u16::from_le_bytes([b0, b1]) as u32),
            [b0, b1, b2, b3] => Some(u32::from_le_bytes([b0, b1, b2, b3])),
            _ => None,
        }
    }

    /// Integer value sign-extended to 32 bits
    pub fn as_i32(&self) -> Option<i32> {
        if self.tuple_type != TupleType::UInt && self.tuple_type != TupleType::Int {
            return None;
        }
        let signed = self.tuple_type == TupleType::Int;
        match *self.data {
            [b0] if signed => Some(b0 as i8 as i32),
            [b0, b1] if signed => Some(i16::from_le_bytes([b0, b1]) as i32),
            [b0] => Some(b0 as i32),
            [b0, b1] => Some(u16::from_le_bytes([b0, b1]) as i32),
            [b0, b1, b2, b3] => Some(i32::from_le_bytes([b0, b1, b2, b3])),
            _ => None,
        }
    }

    /// String value up to (not including) the first NUL
    ///
    /// Returns `None` for non-string tuples or invalid UTF-8. A string with no
    /// terminator is read to the end of the value.
    pub fn as_cstr(&self) -> Option<&'a str> {
        if self.tuple_type != TupleType::CString {
            return None;
        }
        let end = self
            .data
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.data.len());
        core::str::from_utf8(&self.data[..end]).ok()
    }

    /// Writer-side copy of this tuple, borrowing the same bytes
    ///
    /// Strings are cut at their first NUL. Returns `None` for integers of
    /// odd width and strings that are not UTF-8.
    pub fn to_tuplet(&self) -> Option<Tuplet<'a>> {
        let value = match (self.tuple_type, self.data.len()) {
            (TupleType::ByteArray, _) => TupleValue::Bytes(self.data),
            (TupleType::CString, _) => TupleValue::CString(self.as_cstr()?),
            (TupleType::UInt, 1) => TupleValue::UInt8(self.data[0]),
            (TupleType::UInt, 2) => TupleValue::UInt16(self.as_u32()? as u16),
            (TupleType::UInt, 4) => TupleValue::UInt32(self.as_u32()?),
            (TupleType::Int, 1) => TupleValue::Int8(self.data[0] as i8),
            (TupleType::Int, 2) => TupleValue::Int16(self.as_i32()? as i16),
            (TupleType::Int, 4) => TupleValue::Int32(self.as_i32()?),
            _ => return None,
        };
        Some(Tuplet::new(self.key, value))
    }

    /// Same key, type and value bytes
    pub fn same_value(&self, other: &Tuple<'_>) -> bool {
        self.key == other.key && self.tuple_type == other.tuple_type && self.data == other.data
    }
}
