//! Shared scenario helpers

#![allow(dead_code)]

use wristlet_core::time::WallTime;
use wristlet_protocol::{Dictionary, DictionaryWriter, Tuplet};

/// Encode an inbound payload
pub fn payload(tuplets: &[Tuplet<'_>]) -> Vec<u8> {
    let mut buffer = vec![0u8; 1024];
    let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
    writer.write_all(tuplets).unwrap();
    let len = writer.end();
    buffer.truncate(len);
    buffer
}

pub fn at(hour: u8, minute: u8, second: u8) -> WallTime {
    WallTime::new(2013, 4, 12, hour, minute, second).unwrap()
}

/// The single (key, value byte) pair carried by an outbound command
pub fn command_tuple(bytes: &[u8]) -> (u32, u8) {
    let dict = Dictionary::parse(bytes).unwrap();
    assert_eq!(dict.len(), 1);
    let tuple = dict.iter().next().unwrap();
    (tuple.key, tuple.as_u8().unwrap())
}
