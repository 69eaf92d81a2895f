//! App metadata header
//!
//! Every app binary starts with a fixed 0x7C-byte header that the firmware
//! reads to list and launch the app. Fields filled in at link time (size,
//! entry point, CRC, jump table, relocation table) are carried through
//! unchanged by `decode` and written as zero by a fresh `AppMetadata`.
//!
//! ```text
//! 0x00  magic "PBLAPP\0\0"     0x38  company [32]
//! 0x08  struct version u16     0x58  icon resource id u32
//! 0x0A  sdk version u16        0x5C  jump table u32
//! 0x0C  app version u8 × 2     0x60  flags u32
//! 0x0E  size u16               0x64  reloc list start u32
//! 0x10  entry offset u32       0x68  reloc entry count u32
//! 0x14  crc u32                0x6C  uuid [16]
//! 0x18  name [32]
//! ```

use heapless::String;

/// Total header size in bytes
pub const METADATA_SIZE: usize = 0x7C;

/// Header magic
pub const METADATA_MAGIC: [u8; 8] = *b"PBLAPP\0\0";

/// Header layout version written by this crate
pub const STRUCT_VERSION: u16 = 0x0008;

/// SDK version written by this crate
pub const SDK_VERSION: u16 = 0x0001;

/// Fixed length of the name and company fields, including the NUL terminator
pub const NAME_FIELD_LEN: usize = 32;

/// Longest name or company that fits its field
pub const NAME_MAX_LEN: usize = NAME_FIELD_LEN - 1;

/// Flag bit: app is a watch face
pub const FLAG_WATCH_FACE: u32 = 1 << 0;

const STRUCT_VERSION_ADDR: usize = 0x08;
const SDK_VERSION_ADDR: usize = 0x0A;
const APP_VERSION_ADDR: usize = 0x0C;
const SIZE_ADDR: usize = 0x0E;
const OFFSET_ADDR: usize = 0x10;
const CRC_ADDR: usize = 0x14;
const NAME_ADDR: usize = 0x18;
const COMPANY_ADDR: usize = 0x38;
const ICON_RES_ID_ADDR: usize = 0x58;
const JUMP_TABLE_ADDR: usize = 0x5C;
const FLAGS_ADDR: usize = 0x60;
const RELOC_LIST_START_ADDR: usize = 0x64;
const NUM_RELOC_ENTRIES_ADDR: usize = 0x68;
const UUID_ADDR: usize = 0x6C;

/// Errors from metadata encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MetadataError {
    /// Buffer shorter than [`METADATA_SIZE`]
    BufferTooSmall,
    /// Magic bytes do not match
    BadMagic,
    /// Name or company does not fit its 32-byte field
    NameTooLong,
    /// Name or company is not valid UTF-8
    InvalidName,
}

/// Decoded app metadata header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMetadata {
    pub struct_version: u16,
    pub sdk_version: u16,
    /// (major, minor)
    pub app_version: (u8, u8),
    pub name: String<NAME_MAX_LEN>,
    pub company: String<NAME_MAX_LEN>,
    pub icon_resource_id: u32,
    pub flags: u32,
    pub uuid: [u8; 16],
    // Link-time fields
    pub size: u16,
    pub entry_offset: u32,
    pub crc: u32,
    pub jump_table: u32,
    pub reloc_list_start: u32,
    pub reloc_entries: u32,
}

impl AppMetadata {
    /// Create a header with link-time fields zeroed
    pub fn new(
        name: &str,
        company: &str,
        app_version: (u8, u8),
        icon_resource_id: u32,
        flags: u32,
        uuid: [u8; 16],
    ) -> Result<Self, MetadataError> {
        Ok(Self {
            struct_version: STRUCT_VERSION,
            sdk_version: SDK_VERSION,
            app_version,
            name: bounded(name)?,
            company: bounded(company)?,
            icon_resource_id,
            flags,
            uuid,
            size: 0,
            entry_offset: 0,
            crc: 0,
            jump_table: 0,
            reloc_list_start: 0,
            reloc_entries: 0,
        })
    }

    /// Returns true if the watch-face flag is set
    pub fn is_watch_face(&self) -> bool {
        self.flags & FLAG_WATCH_FACE != 0
    }

    /// Encode into the first [`METADATA_SIZE`] bytes of `buffer`
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, MetadataError> {
        if buffer.len() < METADATA_SIZE {
            return Err(MetadataError::BufferTooSmall);
        }
        let out = &mut buffer[..METADATA_SIZE];
        out.fill(0);

        out[..8].copy_from_slice(&METADATA_MAGIC);
        put_u16(out, STRUCT_VERSION_ADDR, self.struct_version);
        put_u16(out, SDK_VERSION_ADDR, self.sdk_version);
        out[APP_VERSION_ADDR] = self.app_version.0;
        out[APP_VERSION_ADDR + 1] = self.app_version.1;
        put_u16(out, SIZE_ADDR, self.size);
        put_u32(out, OFFSET_ADDR, self.entry_offset);
        put_u32(out, CRC_ADDR, self.crc);
        out[NAME_ADDR..NAME_ADDR + self.name.len()].copy_from_slice(self.name.as_bytes());
        out[COMPANY_ADDR..COMPANY_ADDR + self.company.len()]
            .copy_from_slice(self.company.as_bytes());
        put_u32(out, ICON_RES_ID_ADDR, self.icon_resource_id);
        put_u32(out, JUMP_TABLE_ADDR, self.jump_table);
        put_u32(out, FLAGS_ADDR, self.flags);
        put_u32(out, RELOC_LIST_START_ADDR, self.reloc_list_start);
        put_u32(out, NUM_RELOC_ENTRIES_ADDR, self.reloc_entries);
        out[UUID_ADDR..UUID_ADDR + 16].copy_from_slice(&self.uuid);

        Ok(METADATA_SIZE)
    }

    /// Decode a header from the start of an app binary
    pub fn decode(bytes: &[u8]) -> Result<Self, MetadataError> {
        let data = bytes
            .get(..METADATA_SIZE)
            .ok_or(MetadataError::BufferTooSmall)?;
        if data[..8] != METADATA_MAGIC {
            return Err(MetadataError::BadMagic);
        }

        let mut uuid = [0u8; 16];
        uuid.copy_from_slice(&data[UUID_ADDR..UUID_ADDR + 16]);

        Ok(Self {
            struct_version: get_u16(data, STRUCT_VERSION_ADDR),
            sdk_version: get_u16(data, SDK_VERSION_ADDR),
            app_version: (data[APP_VERSION_ADDR], data[APP_VERSION_ADDR + 1]),
            name: name_field(&data[NAME_ADDR..NAME_ADDR + NAME_FIELD_LEN])?,
            company: name_field(&data[COMPANY_ADDR..COMPANY_ADDR + NAME_FIELD_LEN])?,
            icon_resource_id: get_u32(data, ICON_RES_ID_ADDR),
            flags: get_u32(data, FLAGS_ADDR),
            uuid,
            size: get_u16(data, SIZE_ADDR),
            entry_offset: get_u32(data, OFFSET_ADDR),
            crc: get_u32(data, CRC_ADDR),
            jump_table: get_u32(data, JUMP_TABLE_ADDR),
            reloc_list_start: get_u32(data, RELOC_LIST_START_ADDR),
            reloc_entries: get_u32(data, NUM_RELOC_ENTRIES_ADDR),
        })
    }
}

fn bounded(s: &str) -> Result<String<NAME_MAX_LEN>, MetadataError> {
    let mut out = String::new();
    out.push_str(s).map_err(|_| MetadataError::NameTooLong)?;
    Ok(out)
}

fn name_field(field: &[u8]) -> Result<String<NAME_MAX_LEN>, MetadataError> {
    // The last byte is always the terminator
    let field = &field[..NAME_MAX_LEN];
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    let s = core::str::from_utf8(&field[..end]).map_err(|_| MetadataError::InvalidName)?;
    bounded(s)
}

fn put_u16(out: &mut [u8], addr: usize, value: u16) {
    out[addr..addr + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut [u8], addr: usize, value: u32) {
    out[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
}

fn get_u16(data: &[u8], addr: usize) -> u16 {
    u16::from_le_bytes([data[addr], data[addr + 1]])
}

fn get_u32(data: &[u8], addr: usize) -> u32 {
    u32::from_le_bytes([data[addr], data[addr + 1], data[addr + 2], data[addr + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: [u8; 16] = [
        0x69, 0x5C, 0xE6, 0xFE, 0x5D, 0xC1, 0x43, 0x81, 0x85, 0x29, 0x9A, 0x82, 0xDB, 0x09, 0xA0,
        0x69,
    ];

    #[test]
    fn test_encode_field_offsets() {
        let meta =
            AppMetadata::new("Digital Watch", "Initek", (1, 0), 0, FLAG_WATCH_FACE, UUID).unwrap();
        let mut buffer = [0xFFu8; METADATA_SIZE];
        assert_eq!(meta.encode(&mut buffer), Ok(METADATA_SIZE));

        assert_eq!(&buffer[..8], b"PBLAPP\0\0");
        assert_eq!(buffer[APP_VERSION_ADDR], 1);
        assert_eq!(buffer[APP_VERSION_ADDR + 1], 0);
        assert_eq!(&buffer[NAME_ADDR..NAME_ADDR + 13], b"Digital Watch");
        assert_eq!(buffer[NAME_ADDR + 13], 0);
        assert_eq!(&buffer[COMPANY_ADDR..COMPANY_ADDR + 6], b"Initek");
        assert_eq!(&buffer[FLAGS_ADDR..FLAGS_ADDR + 4], &[1, 0, 0, 0]);
        assert_eq!(&buffer[UUID_ADDR..], &UUID);
        // Link-time fields start zeroed
        assert_eq!(&buffer[CRC_ADDR..CRC_ADDR + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_preserves_link_fields() {
        let meta = AppMetadata::new("Weather", "Pebble Technology", (1, 0), 0, 0, UUID).unwrap();
        let mut buffer = [0u8; METADATA_SIZE + 4];
        meta.encode(&mut buffer).unwrap();
        buffer[CRC_ADDR..CRC_ADDR + 4].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

        let decoded = AppMetadata::decode(&buffer).unwrap();
        assert_eq!(decoded.crc, 0xDEAD_BEEF);
        assert_eq!(decoded.name.as_str(), "Weather");
        assert_eq!(decoded.company.as_str(), "Pebble Technology");
        assert!(!decoded.is_watch_face());
    }

    #[test]
    fn test_name_too_long() {
        let long = "This app name is far too long to fit";
        assert_eq!(
            AppMetadata::new(long, "x", (1, 0), 0, 0, UUID),
            Err(MetadataError::NameTooLong)
        );
    }

    #[test]
    fn test_bad_magic() {
        let buffer = [0u8; METADATA_SIZE];
        assert_eq!(AppMetadata::decode(&buffer), Err(MetadataError::BadMagic));
    }

    #[test]
    fn test_short_buffer() {
        let meta = AppMetadata::new("a", "b", (1, 0), 0, 0, UUID).unwrap();
        let mut buffer = [0u8; 16];
        assert_eq!(meta.encode(&mut buffer), Err(MetadataError::BufferTooSmall));
        assert_eq!(AppMetadata::decode(&buffer), Err(MetadataError::BufferTooSmall));
    }
}
