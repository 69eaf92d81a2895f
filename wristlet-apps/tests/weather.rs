//! Scenarios for the weather demo

mod common;

use common::{at, payload};
use proptest::prelude::*;

use wristlet_apps::resources::{IMAGE_CLOUD, IMAGE_SNOW, WEATHER_ICONS};
use wristlet_apps::weather::{
    RejectReason, SyncOutcome, Weather, SYNC_BUFFER_SIZE, TEMPERATURE_LEN, WEATHER_ICON_KEY,
    WEATHER_TEMPERATURE_KEY,
};
use wristlet_core::traits::{ResourceError, SyncError};
use wristlet_core::ui::Layer;
use wristlet_core::App;
use wristlet_protocol::{DictError, Dictionary, Tuplet};
use wristlet_sim::{Delivery, HostEvent, Runtime, SimHost};

const ICON_SIZE: i16 = 80;

fn host() -> SimHost {
    let mut host = SimHost::new(&Weather::CONFIG);
    for id in WEATHER_ICONS {
        host.resources_mut().insert_bitmap(id, ICON_SIZE, ICON_SIZE);
    }
    host
}

fn weather() -> Runtime<Weather> {
    let mut runtime = Runtime::new(Weather::new(), host());
    runtime.start();
    runtime
}

/// Apply one value straight to the app, bypassing the sync engine
fn apply(runtime: &mut Runtime<Weather>, tuplet: Tuplet<'_>) -> SyncOutcome {
    let bytes = payload(&[tuplet]);
    let dict = Dictionary::parse(&bytes).unwrap();
    let value = dict.find(tuplet.key).unwrap();
    let (app, host) = runtime.parts_mut();
    app.apply_change(host, tuplet.key, &value)
}

#[test]
fn test_init_shows_initial_values() {
    let runtime = weather();
    let host = runtime.host();

    assert_eq!(
        host.events(),
        &[
            HostEvent::SyncStarted {
                buffer_size: SYNC_BUFFER_SIZE
            },
            HostEvent::WindowPushed {
                name: "Weather".into(),
                animated: true
            },
            HostEvent::ResourceLoaded {
                id: IMAGE_CLOUD,
                len: 12 + 12 * 80
            },
        ]
    );

    let app = runtime.app();
    assert_eq!(app.icon(), Some(1));
    assert_eq!(app.icon_resource(), Some(IMAGE_CLOUD));
    assert_eq!(app.temperature(), "1234\u{00B0}C");
    assert!(app.window().is_fullscreen());
}

#[test]
fn test_icon_indices_select_icons() {
    let mut runtime = weather();
    for (index, resource) in WEATHER_ICONS.iter().enumerate() {
        let message = payload(&[Tuplet::uint8(WEATHER_ICON_KEY, index as u8)]);
        assert_eq!(runtime.deliver(&message), Delivery::Synced);
        assert_eq!(runtime.app().icon(), Some(index));
        assert_eq!(runtime.app().icon_resource(), Some(*resource));
    }
}

#[test]
fn test_icon_out_of_range_keeps_previous() {
    let mut runtime = weather();
    let message = payload(&[Tuplet::uint8(WEATHER_ICON_KEY, 4)]);
    assert_eq!(runtime.deliver(&message), Delivery::Synced);
    assert_eq!(runtime.app().icon(), Some(1));

    assert_eq!(
        apply(&mut runtime, Tuplet::uint32(WEATHER_ICON_KEY, 200)),
        SyncOutcome::Rejected(RejectReason::IconOutOfRange(200))
    );
    assert_eq!(runtime.app().icon_resource(), Some(IMAGE_CLOUD));
}

#[test]
fn test_icon_not_an_integer() {
    let mut runtime = weather();
    assert_eq!(
        apply(&mut runtime, Tuplet::cstring(WEATHER_ICON_KEY, "sun")),
        SyncOutcome::Rejected(RejectReason::NotAnInteger)
    );
}

#[test]
fn test_missing_icon_resource_keeps_previous() {
    let mut runtime = weather();
    runtime.host_mut().hide_resource(IMAGE_SNOW);

    assert_eq!(
        apply(&mut runtime, Tuplet::uint8(WEATHER_ICON_KEY, 3)),
        SyncOutcome::Rejected(RejectReason::Resource(ResourceError::NotFound))
    );
    assert_eq!(runtime.app().icon(), Some(1));
}

#[test]
fn test_temperature_update() {
    let mut runtime = weather();
    let message = payload(&[Tuplet::cstring(WEATHER_TEMPERATURE_KEY, "21\u{00B0}C")]);
    assert_eq!(runtime.deliver(&message), Delivery::Synced);
    assert_eq!(runtime.app().temperature(), "21\u{00B0}C");
}

#[test]
fn test_temperature_truncated() {
    let mut runtime = weather();
    assert_eq!(
        apply(
            &mut runtime,
            Tuplet::cstring(WEATHER_TEMPERATURE_KEY, "-12.5\u{00B0}C feels like -20")
        ),
        SyncOutcome::TemperatureShown
    );
    assert_eq!(runtime.app().temperature(), "-12.5\u{00B0}C feels ");

    // Cut before a character that would straddle the limit
    apply(
        &mut runtime,
        Tuplet::cstring(WEATHER_TEMPERATURE_KEY, "abcdefghijklmn\u{00B0}"),
    );
    assert_eq!(runtime.app().temperature(), "abcdefghijklmn");
}

#[test]
fn test_oversized_update_reports_sync_error() {
    let mut runtime = weather();
    let message = payload(&[Tuplet::cstring(
        WEATHER_TEMPERATURE_KEY,
        "a forecast too long to sync",
    )]);
    let expected = SyncError::Dictionary(DictError::NotEnoughStorage);

    assert_eq!(runtime.deliver(&message), Delivery::SyncFailed(expected));
    assert_eq!(runtime.app().last_sync_error(), Some(expected));
    assert_eq!(runtime.app().temperature(), "1234\u{00B0}C");
}

#[test]
fn test_unchanged_values_not_redrawn() {
    let mut runtime = weather();
    runtime.render();
    runtime.host_mut().take_events();

    let message = payload(&[
        Tuplet::uint8(WEATHER_ICON_KEY, 1),
        Tuplet::cstring(WEATHER_TEMPERATURE_KEY, "1234\u{00B0}C"),
    ]);
    assert_eq!(runtime.deliver(&message), Delivery::Synced);
    assert!(runtime.host().events().is_empty());
    assert!(runtime.render().is_empty());
}

#[test]
fn test_icon_change_redraws_icon_only() {
    let mut runtime = weather();
    assert_eq!(runtime.render().len(), 2);

    runtime.deliver(&payload(&[Tuplet::uint8(WEATHER_ICON_KEY, 2)]));
    let dirty = runtime.render();
    assert_eq!(dirty.len(), 1);
    let Layer::Bitmap(icon) = &dirty[0] else {
        panic!("expected the icon layer");
    };
    assert_eq!(icon.bitmap().map(|b| b.size().w), Some(ICON_SIZE));
}

#[test]
fn test_no_ticks() {
    let mut runtime = weather();
    assert!(!runtime.tick(at(12, 0, 0)));
}

#[test]
fn test_deinit_stops_sync() {
    let mut runtime = weather();
    runtime.stop();
    assert_eq!(runtime.host().events().last(), Some(&HostEvent::SyncStopped));
    assert!(runtime.host().sync_engine().is_none());

    // After sync stops, nothing reaches the app
    let message = payload(&[Tuplet::uint8(WEATHER_ICON_KEY, 0)]);
    assert_eq!(runtime.deliver(&message), Delivery::Ignored);
    assert_eq!(runtime.app().icon(), Some(1));
}

proptest! {
    #[test]
    fn prop_temperature_bounded_prefix(text in "\\PC{0,40}") {
        let mut runtime = weather();
        apply(&mut runtime, Tuplet::cstring(WEATHER_TEMPERATURE_KEY, &text));

        let shown = runtime.app().temperature();
        prop_assert!(shown.len() <= TEMPERATURE_LEN);
        let input = text.split('\0').next().unwrap_or("");
        prop_assert!(input.starts_with(shown));
    }
}
