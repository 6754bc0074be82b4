mod common;

use std::time::Duration;

use flock_frame::message_type::{
    ERROR, HEARTBEAT, IR_CONFIG, NRF24_CONFIG, STATUS_REQUEST, STATUS_RESPONSE, WIFI_SCAN_RESULT,
    WIPS_ALERT,
};
use flock_frame::Message;
use flock_link::{Client, Connection, ConnectionConfig, LinkError};
use flock_records::{
    DeviceStatus, ErrorCode, IrConfig, IrStrobe, LfProbe, Nrf24Config, SubGhzScanRequest,
    WireRecord,
};

use common::{bridge, frame, sample_network, sample_status, silent, wait_until, FakeDevice};

const WAIT: Duration = Duration::from_secs(2);
const SHORT: Duration = Duration::from_millis(200);

fn client(device: &FakeDevice) -> Client {
    Client::open(ConnectionConfig::default().with_endpoint(device.path()))
        .expect("fake device should accept")
}

#[test]
fn ping_round_trip() {
    let device = FakeDevice::spawn("ping", bridge);
    let client = client(&device);

    assert!(client.ping(WAIT));
    assert_eq!(device.requests(), vec![HEARTBEAT]);
}

#[test]
fn ping_is_false_when_device_is_silent() {
    let device = FakeDevice::spawn("pingq", silent);
    let client = client(&device);

    assert!(!client.ping(SHORT));
}

#[test]
fn ping_is_false_without_a_link() {
    let client = Client::new(Connection::new(ConnectionConfig::default()));
    assert!(!client.ping(SHORT));
}

#[test]
fn status_is_decoded() {
    let device = FakeDevice::spawn("status", bridge);
    let client = client(&device);

    let status = client.status(WAIT).unwrap();

    assert_eq!(status, sample_status());
}

#[test]
fn call_skips_interleaved_messages() {
    let device = FakeDevice::spawn("skip", |request: &Message| {
        if request.msg_type() == STATUS_REQUEST {
            vec![
                frame(HEARTBEAT, &[]),
                frame(WIPS_ALERT, &[0; 128]),
                frame(WIFI_SCAN_RESULT, &[0, 0, 0, 0, 0]),
                frame(STATUS_RESPONSE, &sample_status().pack()),
            ]
        } else {
            Vec::new()
        }
    });
    let client = client(&device);

    let status = client.status(WAIT).unwrap();

    assert_eq!(status.battery_percent, 87);
}

#[test]
fn call_discards_messages_queued_before_it() {
    let device = FakeDevice::spawn("stale", |request: &Message| {
        if request.msg_type() == STATUS_REQUEST {
            vec![frame(STATUS_RESPONSE, &sample_status().pack())]
        } else {
            Vec::new()
        }
    });
    let client = client(&device);
    let stale = DeviceStatus {
        battery_percent: 3,
        ..DeviceStatus::default()
    };
    device.push(frame(STATUS_RESPONSE, &stale.pack()));
    assert!(wait_until(WAIT, || client.connection().pending() == 1));

    let status = client.status(WAIT).unwrap();

    assert_eq!(status.battery_percent, 87);
}

#[test]
fn call_times_out_when_expected_type_never_arrives() {
    let device = FakeDevice::spawn("timeout", bridge);
    let client = client(&device);

    let err = client.nfc_scan(SHORT).unwrap_err();

    assert!(matches!(err, LinkError::ResponseTimeout(t) if t == SHORT));
}

#[test]
fn device_error_fails_the_call() {
    let device = FakeDevice::spawn("busy", bridge);
    let client = client(&device);

    let err = client.ir_strobe(&IrStrobe::default(), WAIT).unwrap_err();

    match err {
        LinkError::Device { code, message } => {
            assert_eq!(code, ErrorCode::Busy);
            assert_eq!(message, "ir busy");
        }
        other => panic!("expected device error, got {other:?}"),
    }
}

#[test]
fn bare_error_message_is_still_a_device_error() {
    let device = FakeDevice::spawn("bare-err", |request: &Message| {
        if request.msg_type() == STATUS_REQUEST {
            vec![frame(ERROR, &[])]
        } else {
            Vec::new()
        }
    });
    let client = client(&device);

    let err = client.status(WAIT).unwrap_err();

    match err {
        LinkError::Device { code, message } => {
            assert_eq!(code, ErrorCode::InvalidMessage);
            assert!(message.is_empty());
        }
        other => panic!("expected device error, got {other:?}"),
    }
}

#[test]
fn wifi_scan_waits_past_the_acknowledgement() {
    let device = FakeDevice::spawn("wifi", bridge);
    let client = client(&device);

    let report = client.wifi_scan(WAIT).unwrap();

    assert_eq!(report.timestamp, 1_700_000_000);
    assert_eq!(report.entries, vec![sample_network()]);
}

#[test]
fn subghz_scan_sends_the_band() {
    let device = FakeDevice::spawn("subghz", bridge);
    let client = client(&device);
    let band = SubGhzScanRequest {
        frequency_start: 433_000_000,
        frequency_end: 435_000_000,
    };

    let report = client.subghz_scan(&band, WAIT).unwrap();

    assert_eq!(report.frequency_start, 433_000_000);
    assert_eq!(report.frequency_end, 435_000_000);
    assert!(report.detections.is_empty());
}

#[test]
fn probe_succeeds_on_acknowledgement() {
    let device = FakeDevice::spawn("lf", bridge);
    let client = client(&device);

    client
        .lf_probe(&LfProbe { duration_ms: 1500 }, WAIT)
        .unwrap();
    assert_eq!(device.requests(), vec![flock_frame::message_type::LF_PROBE_TX]);
}

#[test]
fn configuration_is_sent_without_waiting() {
    let device = FakeDevice::spawn("config", silent);
    let client = client(&device);

    client
        .configure_ir(&IrConfig {
            detect_opticom: true,
        })
        .unwrap();
    client
        .configure_nrf24(&Nrf24Config { promiscuous: false })
        .unwrap();

    assert!(wait_until(WAIT, || device.requests() == [IR_CONFIG, NRF24_CONFIG]));
}

#[test]
fn collect_gathers_a_window_of_traffic() {
    let device = FakeDevice::spawn("collect", silent);
    let client = client(&device);

    device.push(frame(HEARTBEAT, &[]));
    device.push(frame(WIPS_ALERT, &[0; 128]));

    let messages = client.collect(Duration::from_millis(300));

    let types: Vec<u8> = messages.iter().map(Message::msg_type).collect();
    assert_eq!(types, vec![HEARTBEAT, WIPS_ALERT]);
}
