//! Bundled app resources

use std::collections::BTreeMap;

use wristlet_core::bitmap::{BitmapInfo, BITMAP_HEADER_SIZE};
use wristlet_core::traits::ResourceError;

/// Resource id to raw bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTable {
    entries: BTreeMap<u32, Vec<u8>>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource, returning the previous bytes
    pub fn insert(&mut self, id: u32, bytes: Vec<u8>) -> Option<Vec<u8>> {
        self.entries.insert(id, bytes)
    }

    /// Add a blank 1-bit bitmap of the given size
    pub fn insert_bitmap(&mut self, id: u32, width: i16, height: i16) -> Option<Vec<u8>> {
        self.insert(id, bitmap_bytes(width, height, 0x00))
    }

    pub fn remove(&mut self, id: u32) -> Option<Vec<u8>> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: u32) -> Option<&[u8]> {
        self.entries.get(&id).map(Vec::as_slice)
    }

    /// Copy a resource into `buffer`
    pub fn load(&self, id: u32, buffer: &mut [u8]) -> Result<usize, ResourceError> {
        let bytes = self.entries.get(&id).ok_or(ResourceError::NotFound)?;
        let dest = buffer
            .get_mut(..bytes.len())
            .ok_or(ResourceError::BufferTooSmall)?;
        dest.copy_from_slice(bytes);
        Ok(bytes.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Encoded 1-bit bitmap with every pixel byte set to `fill`
pub fn bitmap_bytes(width: i16, height: i16, fill: u8) -> Vec<u8> {
    let (header, pixel_bytes) = BitmapInfo::header_for(width, height);
    let mut bytes = Vec::with_capacity(BITMAP_HEADER_SIZE + pixel_bytes);
    bytes.extend_from_slice(&header);
    bytes.resize(BITMAP_HEADER_SIZE + pixel_bytes, fill);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use wristlet_core::geometry::GRect;

    #[test]
    fn test_generated_bitmap_parses() {
        let bytes = bitmap_bytes(80, 80, 0xFF);
        let info = BitmapInfo::parse(&bytes).unwrap();
        assert_eq!(info.bounds, GRect::new(0, 0, 80, 80));
        assert_eq!(bytes.len(), info.total_bytes());
        assert!(info.pixels(&bytes).unwrap().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_load_copies_bytes() {
        let mut table = ResourceTable::new();
        table.insert(1, vec![1, 2, 3]);

        let mut buffer = [0u8; 8];
        assert_eq!(table.load(1, &mut buffer), Ok(3));
        assert_eq!(&buffer[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_load_missing() {
        let table = ResourceTable::new();
        assert_eq!(table.load(9, &mut [0u8; 8]), Err(ResourceError::NotFound));
    }

    #[test]
    fn test_load_into_small_buffer() {
        let mut table = ResourceTable::new();
        table.insert_bitmap(1, 80, 80);
        let mut buffer = [0u8; 64];
        assert_eq!(table.load(1, &mut buffer), Err(ResourceError::BufferTooSmall));
    }
}
