//! Dictionary encoding and decoding
//!
//! Layout:
//! - COUNT (1 byte): number of tuples
//! - per tuple: KEY (u32 LE), TYPE (1 byte), LENGTH (u16 LE), VALUE

use crate::tuple::{Tuple, TupleType, Tuplet, TUPLE_HEADER_SIZE};

/// Size of the dictionary header (tuple count)
pub const DICT_HEADER_SIZE: usize = 1;

/// Maximum number of tuples a dictionary can carry
pub const MAX_TUPLES: usize = u8::MAX as usize;

/// Errors from dictionary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictError {
    /// The buffer cannot hold the tuple being written
    NotEnoughStorage,
    /// Value too long for the length field, or too many tuples
    InvalidArgs,
    /// Encoded payload is truncated or carries an unknown type tag
    InternalInconsistency,
}

/// Writes tuples into a caller-provided buffer
///
/// The tuple count is patched into the first byte on every write, so the
/// buffer always holds a well-formed dictionary.
#[derive(Debug)]
pub struct DictionaryWriter<'b> {
    buffer: &'b mut [u8],
    cursor: usize,
    count: u8,
}

impl<'b> DictionaryWriter<'b> {
    /// Start a new dictionary at the beginning of `buffer`
    pub fn new(buffer: &'b mut [u8]) -> Result<Self, DictError> {
        if buffer.len() < DICT_HEADER_SIZE {
            return Err(DictError::NotEnoughStorage);
        }
        buffer[0] = 0;
        Ok(Self {
            buffer,
            cursor: DICT_HEADER_SIZE,
            count: 0,
        })
    }

    /// Append a tuple
    pub fn write_tuplet(&mut self, tuplet: &Tuplet<'_>) -> Result<(), DictError> {
        let value_len = tuplet.value.encoded_len();
        if value_len > u16::MAX as usize || self.count as usize == MAX_TUPLES {
            return Err(DictError::InvalidArgs);
        }
        let total = TUPLE_HEADER_SIZE + value_len;
        if self.buffer.len() - self.cursor < total {
            return Err(DictError::NotEnoughStorage);
        }

        let out = &mut self.buffer[self.cursor..self.cursor + total];
        out[0..4].copy_from_slice(&tuplet.key.to_le_bytes());
        out[4] = tuplet.value.tuple_type().to_byte();
        out[5..7].copy_from_slice(&(value_len as u16).to_le_bytes());
        tuplet.value.write_into(&mut out[TUPLE_HEADER_SIZE..]);

        self.cursor += total;
        self.count += 1;
        self.buffer[0] = self.count;
        Ok(())
    }

    /// Append several tuples in order
    pub fn write_all(&mut self, tuplets: &[Tuplet<'_>]) -> Result<(), DictError> {
        for tuplet in tuplets {
            self.write_tuplet(tuplet)?;
        }
        Ok(())
    }

    /// Finish the dictionary
    ///
    /// Returns the number of bytes used.
    pub fn end(self) -> usize {
        self.cursor
    }
}

/// A validated, borrowed dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dictionary<'a> {
    bytes: &'a [u8],
    count: u8,
}

impl<'a> Dictionary<'a> {
    /// Validate an encoded dictionary
    ///
    /// Trailing bytes after the last tuple are ignored.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, DictError> {
        let (&count, _) = bytes
            .split_first()
            .ok_or(DictError::InternalInconsistency)?;

        let mut cursor = DICT_HEADER_SIZE;
        for _ in 0..count {
            let (_, next) = read_tuple(bytes, cursor)?;
            cursor = next;
        }

        Ok(Self {
            bytes: &bytes[..cursor],
            count,
        })
    }

    /// Encoded size of a set of tuples
    pub fn size_for(tuplets: &[Tuplet<'_>]) -> usize {
        DICT_HEADER_SIZE + tuplets.iter().map(|t| t.encoded_size()).sum::<usize>()
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The encoded bytes of this dictionary
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Find the first tuple with the given key
    pub fn find(&self, key: u32) -> Option<Tuple<'a>> {
        self.iter().find(|t| t.key == key)
    }

    /// Iterate tuples in wire order
    pub fn iter(&self) -> Tuples<'a> {
        Tuples {
            bytes: self.bytes,
            cursor: DICT_HEADER_SIZE,
            remaining: self.count,
        }
    }
}

impl<'a> IntoIterator for &Dictionary<'a> {
    type Item = Tuple<'a>;
    type IntoIter = Tuples<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the tuples of a [`Dictionary`]
#[derive(Debug, Clone)]
pub struct Tuples<'a> {
    bytes: &'a [u8],
    cursor: usize,
    remaining: u8,
}

impl<'a> Iterator for Tuples<'a> {
    type Item = Tuple<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Already validated by Dictionary::parse
        let (tuple, next) = read_tuple(self.bytes, self.cursor).ok()?;
        self.cursor = next;
        self.remaining -= 1;
        Some(tuple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

/// Read one tuple starting at `cursor`, returning it and the next cursor
fn read_tuple(bytes: &[u8], cursor: usize) -> Result<(Tuple<'_>, usize), DictError> {
    let header = bytes
        .get(cursor..cursor + TUPLE_HEADER_SIZE)
        .ok_or(DictError::InternalInconsistency)?;

    let key = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let tuple_type = TupleType::from_byte(header[4]).ok_or(DictError::InternalInconsistency)?;
    let len = u16::from_le_bytes([header[5], header[6]]) as usize;

    let start = cursor + TUPLE_HEADER_SIZE;
    let data = bytes
        .get(start..start + len)
        .ok_or(DictError::InternalInconsistency)?;

    Ok((Tuple::new(key, tuple_type, data), start + len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_uint8_layout() {
        let mut buffer = [0u8; 16];
        let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
        writer.write_tuplet(&Tuplet::uint8(1, 2)).unwrap();
        let len = writer.end();

        assert_eq!(len, 9);
        assert_eq!(buffer[0], 1); // count
        assert_eq!(&buffer[1..5], &[1, 0, 0, 0]); // key
        assert_eq!(buffer[5], TupleType::UInt.to_byte());
        assert_eq!(&buffer[6..8], &[1, 0]); // length
        assert_eq!(buffer[8], 2); // value
    }

    #[test]
    fn test_mixed_tuples_find() {
        let mut buffer = [0u8; 32];
        let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
        writer
            .write_all(&[Tuplet::uint8(0, 1), Tuplet::cstring(1, "21C")])
            .unwrap();
        let len = writer.end();

        let dict = Dictionary::parse(&buffer[..len]).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.find(0).and_then(|t| t.as_u8()), Some(1));
        assert_eq!(dict.find(1).and_then(|t| t.as_cstr()), Some("21C"));
        assert!(dict.find(2).is_none());
    }

    #[test]
    fn test_size_for_matches_writer() {
        let tuplets = [Tuplet::uint8(0, 1), Tuplet::cstring(1, "1234\u{00B0}C")];
        let mut buffer = [0u8; 64];
        let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
        writer.write_all(&tuplets).unwrap();
        assert_eq!(writer.end(), Dictionary::size_for(&tuplets));
    }

    #[test]
    fn test_not_enough_storage() {
        let mut buffer = [0u8; 8];
        let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
        assert_eq!(
            writer.write_tuplet(&Tuplet::uint8(1, 2)),
            Err(DictError::NotEnoughStorage)
        );
        // Nothing was written past the header
        assert_eq!(writer.end(), DICT_HEADER_SIZE);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let mut buffer = [0u8; 0];
        assert_eq!(
            DictionaryWriter::new(&mut buffer).err(),
            Some(DictError::NotEnoughStorage)
        );
    }

    #[test]
    fn test_parse_empty_payload() {
        assert_eq!(Dictionary::parse(&[]), Err(DictError::InternalInconsistency));
        let dict = Dictionary::parse(&[0]).unwrap();
        assert!(dict.is_empty());
        assert!(dict.find(0).is_none());
    }

    #[test]
    fn test_parse_truncated_value() {
        // count=1, key=0, UInt, len=4, but only 2 value bytes
        let bytes = [1, 0, 0, 0, 0, 2, 4, 0, 0xAA, 0xBB];
        assert_eq!(
            Dictionary::parse(&bytes),
            Err(DictError::InternalInconsistency)
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        let bytes = [1, 0, 0, 0, 0, 9, 1, 0, 0xAA];
        assert_eq!(
            Dictionary::parse(&bytes),
            Err(DictError::InternalInconsistency)
        );
    }

    #[test]
    fn test_parse_ignores_trailing_bytes() {
        let bytes = [1, 5, 0, 0, 0, 2, 1, 0, 7, 0xDE, 0xAD];
        let dict = Dictionary::parse(&bytes).unwrap();
        assert_eq!(dict.as_bytes().len(), 9);
        assert_eq!(dict.find(5).and_then(|t| t.as_u8()), Some(7));
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut buffer = [0u8; 32];
        let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
        writer
            .write_all(&[Tuplet::uint8(3, 1), Tuplet::uint8(3, 2)])
            .unwrap();
        let len = writer.end();
        let dict = Dictionary::parse(&buffer[..len]).unwrap();
        assert_eq!(dict.find(3).and_then(|t| t.as_u8()), Some(1));
        assert_eq!(dict.iter().count(), 2);
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = Dictionary::parse(&bytes);
        }

        #[test]
        fn prop_written_value_found_under_key(key in any::<u32>(), value in any::<u8>()) {
            let mut buffer = [0u8; 16];
            let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
            writer.write_tuplet(&Tuplet::uint8(key, value)).unwrap();
            let len = writer.end();

            let dict = Dictionary::parse(&buffer[..len]).unwrap();
            prop_assert_eq!(dict.len(), 1);
            let tuple = dict.find(key).unwrap();
            prop_assert_eq!(tuple.key, key);
            prop_assert_eq!(tuple.as_u8(), Some(value));
        }

        #[test]
        fn prop_missing_key_not_found(key in 1u32..1000, value in any::<u8>()) {
            let mut buffer = [0u8; 16];
            let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
            writer.write_tuplet(&Tuplet::uint8(0, value)).unwrap();
            let len = writer.end();

            let dict = Dictionary::parse(&buffer[..len]).unwrap();
            prop_assert!(dict.find(key).is_none());
        }
    }
}
