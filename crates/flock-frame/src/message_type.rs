//! Message type identifiers.
//!
//! Requests flow host → device, results and alerts flow device → host.
//! The header does not restrict the type byte; unknown values are carried
//! through untouched.

/// Keep-alive request and generic acknowledgement.
pub const HEARTBEAT: u8 = 0x00;
pub const WIFI_SCAN_REQUEST: u8 = 0x01;
pub const WIFI_SCAN_RESULT: u8 = 0x02;
pub const SUBGHZ_SCAN_REQUEST: u8 = 0x03;
pub const SUBGHZ_SCAN_RESULT: u8 = 0x04;
pub const STATUS_REQUEST: u8 = 0x05;
pub const STATUS_RESPONSE: u8 = 0x06;
/// Unsolicited wireless intrusion alert.
pub const WIPS_ALERT: u8 = 0x07;
pub const BLE_SCAN_REQUEST: u8 = 0x08;
pub const BLE_SCAN_RESULT: u8 = 0x09;
pub const IR_SCAN_REQUEST: u8 = 0x0A;
pub const IR_SCAN_RESULT: u8 = 0x0B;
pub const NFC_SCAN_REQUEST: u8 = 0x0C;
pub const NFC_SCAN_RESULT: u8 = 0x0D;

// Active probe commands.
pub const LF_PROBE_TX: u8 = 0x0E;
pub const IR_STROBE_TX: u8 = 0x0F;
pub const WIFI_PROBE_TX: u8 = 0x10;
pub const BLE_ACTIVE_SCAN: u8 = 0x11;
pub const ZIGBEE_BEACON_TX: u8 = 0x12;
pub const GPIO_PULSE_TX: u8 = 0x13;
pub const SUBGHZ_REPLAY_TX: u8 = 0x14;
pub const WIEGAND_REPLAY_TX: u8 = 0x15;
pub const MAGSPOOF_TX: u8 = 0x16;
pub const IBUTTON_EMULATE: u8 = 0x17;
pub const NRF24_INJECT_TX: u8 = 0x18;

// Passive scan configuration.
pub const SUBGHZ_CONFIG: u8 = 0x20;
pub const IR_CONFIG: u8 = 0x21;
pub const NRF24_CONFIG: u8 = 0x22;

/// Device-reported protocol error.
pub const ERROR: u8 = 0xFF;

/// Returns a human-readable name for a message type.
pub fn message_type_name(msg_type: u8) -> &'static str {
    match msg_type {
        HEARTBEAT => "HEARTBEAT",
        WIFI_SCAN_REQUEST => "WIFI_SCAN_REQUEST",
        WIFI_SCAN_RESULT => "WIFI_SCAN_RESULT",
        SUBGHZ_SCAN_REQUEST => "SUBGHZ_SCAN_REQUEST",
        SUBGHZ_SCAN_RESULT => "SUBGHZ_SCAN_RESULT",
        STATUS_REQUEST => "STATUS_REQUEST",
        STATUS_RESPONSE => "STATUS_RESPONSE",
        WIPS_ALERT => "WIPS_ALERT",
        BLE_SCAN_REQUEST => "BLE_SCAN_REQUEST",
        BLE_SCAN_RESULT => "BLE_SCAN_RESULT",
        IR_SCAN_REQUEST => "IR_SCAN_REQUEST",
        IR_SCAN_RESULT => "IR_SCAN_RESULT",
        NFC_SCAN_REQUEST => "NFC_SCAN_REQUEST",
        NFC_SCAN_RESULT => "NFC_SCAN_RESULT",
        LF_PROBE_TX => "LF_PROBE_TX",
        IR_STROBE_TX => "IR_STROBE_TX",
        WIFI_PROBE_TX => "WIFI_PROBE_TX",
        BLE_ACTIVE_SCAN => "BLE_ACTIVE_SCAN",
        ZIGBEE_BEACON_TX => "ZIGBEE_BEACON_TX",
        GPIO_PULSE_TX => "GPIO_PULSE_TX",
        SUBGHZ_REPLAY_TX => "SUBGHZ_REPLAY_TX",
        WIEGAND_REPLAY_TX => "WIEGAND_REPLAY_TX",
        MAGSPOOF_TX => "MAGSPOOF_TX",
        IBUTTON_EMULATE => "IBUTTON_EMULATE",
        NRF24_INJECT_TX => "NRF24_INJECT_TX",
        SUBGHZ_CONFIG => "SUBGHZ_CONFIG",
        IR_CONFIG => "IR_CONFIG",
        NRF24_CONFIG => "NRF24_CONFIG",
        ERROR => "ERROR",
        _ => "UNKNOWN",
    }
}

/// Returns true for types the device sends without being asked.
pub fn is_unsolicited(msg_type: u8) -> bool {
    matches!(msg_type, WIPS_ALERT)
}
