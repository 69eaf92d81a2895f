//! Minimal key/value sync engine
//!
//! Holds the synchronised values as one encoded dictionary, never larger
//! than the buffer size the app asked for. Inbound updates only touch keys
//! that are already in the set. Each value that actually changed is reported
//! once as a [`SyncChange`]; initial values are reported as changes with no
//! previous value.

use wristlet_protocol::{DictError, Dictionary, DictionaryWriter, Tuple, Tuplet};

/// One changed value
///
/// Values are kept as encoded one-tuple dictionaries so a change can outlive
/// the message that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncChange {
    pub key: u32,
    new: Vec<u8>,
    old: Option<Vec<u8>>,
}

impl SyncChange {
    fn new(key: u32, new: &Tuplet<'_>, old: Option<&Tuplet<'_>>) -> Result<Self, DictError> {
        Ok(Self {
            key,
            new: encode(&[*new], Dictionary::size_for(&[*new]))?,
            old: old
                .map(|old| encode(&[*old], Dictionary::size_for(&[*old])))
                .transpose()?,
        })
    }

    pub fn new_value(&self) -> Option<Tuple<'_>> {
        first_tuple(&self.new)
    }

    pub fn old_value(&self) -> Option<Tuple<'_>> {
        self.old.as_deref().and_then(first_tuple)
    }
}

fn first_tuple(bytes: &[u8]) -> Option<Tuple<'_>> {
    Dictionary::parse(bytes).ok()?.iter().next()
}

fn encode(tuplets: &[Tuplet<'_>], capacity: usize) -> Result<Vec<u8>, DictError> {
    let mut buffer = vec![0u8; capacity];
    let mut writer = DictionaryWriter::new(&mut buffer)?;
    writer.write_all(tuplets)?;
    let len = writer.end();
    buffer.truncate(len);
    Ok(buffer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEngine {
    capacity: usize,
    current: Vec<u8>,
}

impl SyncEngine {
    /// Start syncing `initial` within `capacity` bytes
    ///
    /// Returns the engine and one change per initial value.
    pub fn init(capacity: usize, initial: &[Tuplet<'_>]) -> Result<(Self, Vec<SyncChange>), DictError> {
        let current = encode(initial, capacity)?;
        let changes = initial
            .iter()
            .map(|tuplet| SyncChange::new(tuplet.key, tuplet, None))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((Self { capacity, current }, changes))
    }

    /// Merge an inbound update
    ///
    /// Keys outside the set are ignored. When the merged set does not fit,
    /// nothing changes and `NotEnoughStorage` is returned.
    pub fn update(&mut self, incoming: &Dictionary<'_>) -> Result<Vec<SyncChange>, DictError> {
        let current = Dictionary::parse(&self.current)?;
        let mut merged = Vec::with_capacity(current.len());
        let mut changes = Vec::new();

        for old in &current {
            let old_tuplet = old.to_tuplet().ok_or(DictError::InternalInconsistency)?;
            let Some(new) = incoming.find(old.key) else {
                merged.push(old_tuplet);
                continue;
            };
            let new_tuplet = new.to_tuplet().ok_or(DictError::InvalidArgs)?;
            if !new.same_value(&old) {
                changes.push(SyncChange::new(old.key, &new_tuplet, Some(&old_tuplet))?);
            }
            merged.push(new_tuplet);
        }

        let encoded = encode(&merged, self.capacity)?;
        self.current = encoded;
        Ok(changes)
    }

    /// Current value for `key`
    pub fn get(&self, key: u32) -> Option<Tuple<'_>> {
        Dictionary::parse(&self.current).ok()?.find(key)
    }

    /// Bytes used by the current set
    pub fn used(&self) -> usize {
        self.current.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: u32 = 0;
    const TEMP: u32 = 1;

    fn message(tuplets: &[Tuplet<'_>]) -> Vec<u8> {
        encode(tuplets, 128).unwrap()
    }

    fn engine() -> SyncEngine {
        let (engine, _) = SyncEngine::init(
            32,
            &[Tuplet::uint8(ICON, 1), Tuplet::cstring(TEMP, "1234C")],
        )
        .unwrap();
        engine
    }

    #[test]
    fn test_initial_values_reported() {
        let (_, changes) = SyncEngine::init(
            32,
            &[Tuplet::uint8(ICON, 1), Tuplet::cstring(TEMP, "1234C")],
        )
        .unwrap();

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].key, ICON);
        assert_eq!(changes[0].new_value().and_then(|t| t.as_u8()), Some(1));
        assert!(changes[0].old_value().is_none());
        assert_eq!(
            changes[1].new_value().and_then(|t| t.as_cstr()),
            Some("1234C")
        );
    }

    #[test]
    fn test_initial_values_too_large() {
        let err = SyncEngine::init(16, &[Tuplet::cstring(TEMP, "far too long for this")]);
        assert_eq!(err.unwrap_err(), DictError::NotEnoughStorage);
    }

    #[test]
    fn test_only_changed_values_reported() {
        let mut engine = engine();
        let bytes = message(&[Tuplet::uint8(ICON, 1), Tuplet::cstring(TEMP, "21C")]);
        let changes = engine.update(&Dictionary::parse(&bytes).unwrap()).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key, TEMP);
        assert_eq!(changes[0].new_value().and_then(|t| t.as_cstr()), Some("21C"));
        assert_eq!(
            changes[0].old_value().and_then(|t| t.as_cstr()),
            Some("1234C")
        );
        assert_eq!(engine.get(TEMP).and_then(|t| t.as_cstr()), Some("21C"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut engine = engine();
        let bytes = message(&[Tuplet::uint8(9, 3)]);
        let changes = engine.update(&Dictionary::parse(&bytes).unwrap()).unwrap();

        assert!(changes.is_empty());
        assert!(engine.get(9).is_none());
    }

    #[test]
    fn test_overflow_keeps_old_values() {
        let mut engine = engine();
        let bytes = message(&[Tuplet::cstring(TEMP, "a temperature far too long")]);
        let err = engine.update(&Dictionary::parse(&bytes).unwrap());

        assert_eq!(err.unwrap_err(), DictError::NotEnoughStorage);
        assert_eq!(engine.get(TEMP).and_then(|t| t.as_cstr()), Some("1234C"));
        assert!(engine.used() <= engine.capacity());
    }
}
