//! Identity blocks and static configuration of all four apps

use wristlet_apps::{DigitalWatch, RemoteControl, VibratePaired, Weather};
use wristlet_core::config::{AppConfig, AppInfo};
use wristlet_core::App;
use wristlet_protocol::{AppMetadata, METADATA_SIZE};

fn all() -> [(AppInfo, AppConfig); 4] {
    [
        (VibratePaired::INFO, VibratePaired::CONFIG),
        (RemoteControl::INFO, RemoteControl::CONFIG),
        (Weather::INFO, Weather::CONFIG),
        (DigitalWatch::INFO, DigitalWatch::CONFIG),
    ]
}

#[test]
fn test_headers_decode_to_identity() {
    for (info, _) in all() {
        let mut buffer = [0u8; METADATA_SIZE];
        let meta = info.metadata().unwrap();
        assert_eq!(meta.encode(&mut buffer), Ok(METADATA_SIZE));

        let decoded = AppMetadata::decode(&buffer).unwrap();
        assert_eq!(decoded.name.as_str(), info.name);
        assert_eq!(decoded.company.as_str(), info.company);
        assert_eq!(decoded.app_version, info.version);
        assert_eq!(decoded.uuid, info.uuid);
    }
}

#[test]
fn test_uuids_unique() {
    let apps = all();
    for (i, (a, _)) in apps.iter().enumerate() {
        for (b, _) in &apps[i + 1..] {
            assert_ne!(a.uuid, b.uuid, "{} and {}", a.name, b.name);
        }
    }
}

#[test]
fn test_only_digital_watch_is_a_face() {
    let faces: Vec<_> = all()
        .iter()
        .filter(|(info, _)| info.metadata().unwrap().is_watch_face())
        .map(|(info, _)| info.name)
        .collect();
    assert_eq!(faces, vec!["Digital Watch"]);
}

#[test]
fn test_message_buffers_valid() {
    for (info, config) in all() {
        if let Some(messaging) = config.messaging {
            assert!(messaging.is_valid(), "{}", info.name);
        }
    }
}
