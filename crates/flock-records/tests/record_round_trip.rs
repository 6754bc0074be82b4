use proptest::prelude::*;

use flock_records::{
    truncate_utf8, AlertKind, BleDevice, DeviceStatus, IrDetection, Modulation, NfcDetection,
    ScanReport, SecurityType, Severity, SubGhzDetection, SubGhzScanReport, WifiNetwork,
    WipsAlert, WireRecord,
};

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _éß€-]{0,80}"
}

fn security() -> impl Strategy<Value = SecurityType> {
    prop_oneof![(0u8..=6).prop_map(SecurityType::from), Just(SecurityType::Unknown)]
}

fn modulation() -> impl Strategy<Value = Modulation> {
    prop_oneof![(0u8..=6).prop_map(Modulation::from), Just(Modulation::Unknown)]
}

prop_compose! {
    fn status()(
        flags in any::<[bool; 5]>(),
        protocol_version in any::<u8>(),
        battery_percent in any::<u8>(),
        uptime_seconds in any::<u32>(),
        counters in any::<[u16; 6]>(),
    ) -> DeviceStatus {
        DeviceStatus {
            protocol_version,
            wifi_board_connected: flags[0],
            subghz_ready: flags[1],
            ble_ready: flags[2],
            ir_ready: flags[3],
            nfc_ready: flags[4],
            battery_percent,
            uptime_seconds,
            wifi_scan_count: counters[0],
            subghz_detection_count: counters[1],
            ble_scan_count: counters[2],
            ir_detection_count: counters[3],
            nfc_detection_count: counters[4],
            wips_alert_count: counters[5],
        }
    }
}

prop_compose! {
    fn wifi_network()(
        ssid in text(),
        bssid in any::<[u8; 6]>(),
        rssi in any::<i8>(),
        channel in any::<u8>(),
        security in security(),
        hidden in any::<bool>(),
    ) -> WifiNetwork {
        WifiNetwork { ssid, bssid, rssi, channel, security, hidden }
    }
}

prop_compose! {
    fn subghz_detection()(
        frequency in any::<u32>(),
        rssi in any::<i8>(),
        modulation in modulation(),
        duration_ms in any::<u16>(),
        bandwidth in any::<u32>(),
        protocol_id in any::<u8>(),
        protocol_name in text(),
    ) -> SubGhzDetection {
        SubGhzDetection { frequency, rssi, modulation, duration_ms, bandwidth, protocol_id, protocol_name }
    }
}

prop_compose! {
    fn ble_device()(
        mac_address in any::<[u8; 6]>(),
        name in text(),
        rssi in any::<i8>(),
        address_type in any::<u8>(),
        connectable in any::<bool>(),
        service_uuids in proptest::collection::vec(any::<[u8; 16]>(), 0..=4),
        manufacturer_id in any::<[u8; 2]>(),
        manufacturer_data in proptest::collection::vec(any::<u8>(), 0..=32),
    ) -> BleDevice {
        BleDevice {
            mac_address, name, rssi, address_type, connectable,
            service_uuids, manufacturer_id, manufacturer_data,
        }
    }
}

prop_compose! {
    fn ir_detection()(
        timestamp in any::<u32>(),
        protocol_id in any::<u8>(),
        protocol_name in text(),
        address in any::<u32>(),
        command in any::<u32>(),
        repeat in any::<bool>(),
        signal_strength in any::<i8>(),
    ) -> IrDetection {
        IrDetection { timestamp, protocol_id, protocol_name, address, command, repeat, signal_strength }
    }
}

prop_compose! {
    fn nfc_detection()(
        uid in any::<[u8; 10]>(),
        uid_len in any::<u8>(),
        nfc_type in any::<u8>(),
        sak in any::<u8>(),
        atqa in any::<[u8; 2]>(),
        type_name in text(),
    ) -> NfcDetection {
        NfcDetection { uid, uid_len, nfc_type, sak, atqa, type_name }
    }
}

prop_compose! {
    fn wips_alert()(
        timestamp in any::<u32>(),
        kind in any::<u8>().prop_map(AlertKind::from),
        severity in any::<u8>().prop_map(Severity::from),
        ssid in text(),
        bssids in proptest::collection::vec(any::<[u8; 6]>(), 0..=4),
        description in text(),
    ) -> WipsAlert {
        WipsAlert { timestamp, kind, severity, ssid, bssids, description }
    }
}

proptest! {
    #[test]
    fn status_round_trips(record in status()) {
        let wire = record.pack();
        prop_assert_eq!(wire.len(), DeviceStatus::SIZE);
        prop_assert_eq!(DeviceStatus::unpack(&wire).unwrap(), record);
    }

    #[test]
    fn wifi_network_round_trips(record in wifi_network()) {
        let wire = record.pack();
        prop_assert_eq!(wire.len(), WifiNetwork::SIZE);
        let decoded = WifiNetwork::unpack(&wire).unwrap();
        prop_assert_eq!(&decoded.ssid, truncate_utf8(&record.ssid, 32));
        prop_assert_eq!(decoded, WifiNetwork { ssid: truncate_utf8(&record.ssid, 32).to_owned(), ..record });
    }

    #[test]
    fn subghz_detection_round_trips(record in subghz_detection()) {
        let wire = record.pack();
        prop_assert_eq!(wire.len(), SubGhzDetection::SIZE);
        let expected = SubGhzDetection {
            protocol_name: truncate_utf8(&record.protocol_name, 15).to_owned(),
            ..record
        };
        prop_assert_eq!(SubGhzDetection::unpack(&wire).unwrap(), expected);
    }

    #[test]
    fn ble_device_round_trips(record in ble_device()) {
        let wire = record.pack();
        prop_assert_eq!(wire.len(), BleDevice::SIZE);
        let expected = BleDevice {
            name: truncate_utf8(&record.name, 31).to_owned(),
            ..record
        };
        prop_assert_eq!(BleDevice::unpack(&wire).unwrap(), expected);
    }

    #[test]
    fn ir_detection_round_trips(record in ir_detection()) {
        let wire = record.pack();
        prop_assert_eq!(wire.len(), IrDetection::SIZE);
        let expected = IrDetection {
            protocol_name: truncate_utf8(&record.protocol_name, 15).to_owned(),
            ..record
        };
        prop_assert_eq!(IrDetection::unpack(&wire).unwrap(), expected);
    }

    #[test]
    fn nfc_detection_round_trips(record in nfc_detection()) {
        let wire = record.pack();
        prop_assert_eq!(wire.len(), NfcDetection::SIZE);
        let expected = NfcDetection {
            type_name: truncate_utf8(&record.type_name, 15).to_owned(),
            ..record
        };
        prop_assert_eq!(NfcDetection::unpack(&wire).unwrap(), expected);
    }

    #[test]
    fn wips_alert_round_trips(record in wips_alert()) {
        let wire = record.pack();
        prop_assert_eq!(wire.len(), WipsAlert::SIZE);
        let expected = WipsAlert {
            ssid: truncate_utf8(&record.ssid, 32).to_owned(),
            description: truncate_utf8(&record.description, 63).to_owned(),
            ..record
        };
        prop_assert_eq!(WipsAlert::unpack(&wire).unwrap(), expected);
    }

    #[test]
    fn wifi_report_decodes_any_prefix_without_error(
        entries in proptest::collection::vec(wifi_network(), 0..8),
        timestamp in any::<u32>(),
        cut in 5usize..400,
    ) {
        let wire = ScanReport::new(timestamp, entries.clone()).encode();
        let cut = cut.min(wire.len());
        let decoded = ScanReport::<WifiNetwork>::decode(&wire[..cut]).unwrap();
        prop_assert_eq!(decoded.timestamp, timestamp);
        prop_assert_eq!(decoded.entries.len(), (cut - 5) / WifiNetwork::SIZE);
    }

    #[test]
    fn subghz_report_round_trips(
        detections in proptest::collection::vec(subghz_detection(), 0..=16),
        timestamp in any::<u32>(),
        band in any::<(u32, u32)>(),
    ) {
        let report = SubGhzScanReport {
            timestamp,
            frequency_start: band.0,
            frequency_end: band.1,
            detections: detections
                .into_iter()
                .map(|d| SubGhzDetection {
                    protocol_name: truncate_utf8(&d.protocol_name, 15).to_owned(),
                    ..d
                })
                .collect(),
        };
        prop_assert_eq!(SubGhzScanReport::decode(&report.encode()).unwrap(), report);
    }
}

#[test]
fn nineteen_byte_status_decodes_to_idle_device() {
    let mut raw = [0u8; 19];
    raw[0] = 1;

    let status = DeviceStatus::unpack(&raw).expect("19-byte status should decode");

    assert_eq!(
        status,
        DeviceStatus {
            protocol_version: 1,
            ..DeviceStatus::default()
        }
    );
}

#[test]
fn status_decodes_every_length_from_minimum_to_full() {
    let wire = DeviceStatus {
        protocol_version: 1,
        battery_percent: 64,
        wips_alert_count: 3,
        ..DeviceStatus::default()
    }
    .pack();

    for len in DeviceStatus::MIN_SIZE..=DeviceStatus::SIZE {
        let decoded = DeviceStatus::unpack(&wire[..len]).expect("status prefix should decode");
        assert_eq!(decoded.battery_percent, 64);
    }
    assert!(DeviceStatus::unpack(&wire[..DeviceStatus::MIN_SIZE - 1]).is_err());
}
