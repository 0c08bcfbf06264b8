use embedded_hal_mock::eh1::delay::NoopDelay;

use rts433::error::TransportError;
use rts433::menu::{ControlAction, MenuEvent, Screen, main_menu_entries};
use rts433::registry::device_name;
use rts433::store::JsonFileStore;
use rts433::transport::{RadioTransport, TxMetadata, raw_record_count, write_raw_dump};
use rts433::{Command, DeviceStore, Remote, RtsConfig};

#[derive(Debug, Default)]
struct CaptureRadio {
    dumps: Vec<String>,
}

impl RadioTransport for CaptureRadio {
    fn start(&mut self, metadata: &TxMetadata, pulses: &[i32]) -> Result<(), TransportError> {
        let mut dump = String::new();
        write_raw_dump(&mut dump, metadata, pulses).map_err(|_| TransportError::Rejected)?;
        self.dumps.push(dump);
        Ok(())
    }

    fn poll_complete(&mut self) -> nb::Result<(), TransportError> {
        Ok(())
    }

    fn abort(&mut self) {}
}

fn scratch_file(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("rts433-session-{}-{}", tag, std::process::id()))
        .join("devices.json")
}

#[test]
fn session_persists_across_restarts() {
    let path = scratch_file("restart");
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    let mut remote = Remote::new(
        JsonFileStore::new(&path),
        CaptureRadio::default(),
        NoopDelay::new(),
        RtsConfig::default(),
    )
    .unwrap();
    let _ = remote.add_device("Living Room").unwrap();
    let _ = remote.add_device("Bedroom").unwrap();
    for _ in 0..3 {
        let _ = remote.send(1, Command::Down).unwrap();
    }
    let (store, radio) = remote.release();
    assert_eq!(radio.dumps.len(), 3);

    let mut remote =
        Remote::new(store, CaptureRadio::default(), NoopDelay::new(), RtsConfig::default())
            .unwrap();
    let names: Vec<&str> = main_menu_entries(remote.registry().devices(), true).collect();
    assert_eq!(names, ["Living Room", "Bedroom", "+ Add Device"]);
    assert_eq!(remote.registry().devices()[0].rolling_code, 1);
    assert_eq!(remote.registry().devices()[1].rolling_code, 4);

    let report = remote.send(1, Command::Up).unwrap();
    assert_eq!(report.rolling_code, 4);

    let (mut store, _) = remote.release();
    let document = store.load().unwrap().unwrap();
    assert_eq!(document.devices[1].rolling_code, 5);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn menu_drives_a_pairing_send() {
    let path = scratch_file("menu");
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    let mut remote = Remote::new(
        JsonFileStore::new(&path),
        CaptureRadio::default(),
        NoopDelay::new(),
        RtsConfig::default(),
    )
    .unwrap();
    assert_eq!(remote.dispatch(MenuEvent::AddDevice), Ok(Screen::AddDevice));
    let name = device_name("Awning").unwrap();
    assert_eq!(remote.dispatch(MenuEvent::NameEntered(name)), Ok(Screen::MainMenu));
    assert_eq!(
        remote.dispatch(MenuEvent::SelectDevice(0)),
        Ok(Screen::ControlMenu(0))
    );
    assert_eq!(
        remote.dispatch(MenuEvent::Action(ControlAction::Pair)),
        Ok(Screen::ControlMenu(0))
    );

    let dump = &remote.transport().dumps[0];
    assert!(dump.starts_with("Filetype: Flipper SubGhz RAW File\n"));
    assert!(dump.contains("Frequency: 433420000\n"));
    assert_eq!(
        dump.lines().filter(|l| l.starts_with("RAW_Data:")).count(),
        raw_record_count(507)
    );
    assert!(dump.contains("RAW_Data: 9415 -89565 2416 -2416 2416 -2416 4550 -604"));
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
