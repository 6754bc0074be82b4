//! Enumerated byte fields carried inside records.
//!
//! Values outside the known set never fail decoding. Security and modulation
//! collapse to their `Unknown` sentinel; alert kind and severity keep the raw
//! byte in `Other`.

use std::fmt;

use serde::Serialize;

/// WiFi network security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityType {
    Open,
    Wep,
    Wpa,
    Wpa2,
    Wpa3,
    Wpa2Enterprise,
    Wpa3Enterprise,
    Unknown,
}

impl From<u8> for SecurityType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Open,
            1 => Self::Wep,
            2 => Self::Wpa,
            3 => Self::Wpa2,
            4 => Self::Wpa3,
            5 => Self::Wpa2Enterprise,
            6 => Self::Wpa3Enterprise,
            _ => Self::Unknown,
        }
    }
}

impl From<SecurityType> for u8 {
    fn from(value: SecurityType) -> Self {
        match value {
            SecurityType::Open => 0,
            SecurityType::Wep => 1,
            SecurityType::Wpa => 2,
            SecurityType::Wpa2 => 3,
            SecurityType::Wpa3 => 4,
            SecurityType::Wpa2Enterprise => 5,
            SecurityType::Wpa3Enterprise => 6,
            SecurityType::Unknown => 255,
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::Wep => "WEP",
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Wpa3 => "WPA3",
            Self::Wpa2Enterprise => "WPA2-Enterprise",
            Self::Wpa3Enterprise => "WPA3-Enterprise",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Sub-GHz modulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modulation {
    Am,
    Fm,
    Ask,
    Fsk,
    Psk,
    Ook,
    Gfsk,
    Unknown,
}

impl From<u8> for Modulation {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Am,
            1 => Self::Fm,
            2 => Self::Ask,
            3 => Self::Fsk,
            4 => Self::Psk,
            5 => Self::Ook,
            6 => Self::Gfsk,
            _ => Self::Unknown,
        }
    }
}

impl From<Modulation> for u8 {
    fn from(value: Modulation) -> Self {
        match value {
            Modulation::Am => 0,
            Modulation::Fm => 1,
            Modulation::Ask => 2,
            Modulation::Fsk => 3,
            Modulation::Psk => 4,
            Modulation::Ook => 5,
            Modulation::Gfsk => 6,
            Modulation::Unknown => 255,
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Am => "AM",
            Self::Fm => "FM",
            Self::Ask => "ASK",
            Self::Fsk => "FSK",
            Self::Psk => "PSK",
            Self::Ook => "OOK",
            Self::Gfsk => "GFSK",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Kind of wireless intrusion alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    EvilTwin,
    Deauth,
    Karma,
    HiddenNetworkStrong,
    SuspiciousOpen,
    WeakEncryption,
    ChannelInterference,
    MacSpoofing,
    RogueAp,
    SignalAnomaly,
    BeaconFlood,
    Other(u8),
}

impl From<u8> for AlertKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::EvilTwin,
            1 => Self::Deauth,
            2 => Self::Karma,
            3 => Self::HiddenNetworkStrong,
            4 => Self::SuspiciousOpen,
            5 => Self::WeakEncryption,
            6 => Self::ChannelInterference,
            7 => Self::MacSpoofing,
            8 => Self::RogueAp,
            9 => Self::SignalAnomaly,
            10 => Self::BeaconFlood,
            other => Self::Other(other),
        }
    }
}

impl From<AlertKind> for u8 {
    fn from(value: AlertKind) -> Self {
        match value {
            AlertKind::EvilTwin => 0,
            AlertKind::Deauth => 1,
            AlertKind::Karma => 2,
            AlertKind::HiddenNetworkStrong => 3,
            AlertKind::SuspiciousOpen => 4,
            AlertKind::WeakEncryption => 5,
            AlertKind::ChannelInterference => 6,
            AlertKind::MacSpoofing => 7,
            AlertKind::RogueAp => 8,
            AlertKind::SignalAnomaly => 9,
            AlertKind::BeaconFlood => 10,
            AlertKind::Other(raw) => raw,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvilTwin => f.write_str("evil twin"),
            Self::Deauth => f.write_str("deauth attack"),
            Self::Karma => f.write_str("karma attack"),
            Self::HiddenNetworkStrong => f.write_str("strong hidden network"),
            Self::SuspiciousOpen => f.write_str("suspicious open network"),
            Self::WeakEncryption => f.write_str("weak encryption"),
            Self::ChannelInterference => f.write_str("channel interference"),
            Self::MacSpoofing => f.write_str("MAC spoofing"),
            Self::RogueAp => f.write_str("rogue AP"),
            Self::SignalAnomaly => f.write_str("signal anomaly"),
            Self::BeaconFlood => f.write_str("beacon flood"),
            Self::Other(raw) => write!(f, "alert {raw:#04x}"),
        }
    }
}

/// Alert severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
    Other(u8),
}

impl From<u8> for Severity {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Critical,
            1 => Self::High,
            2 => Self::Medium,
            3 => Self::Low,
            4 => Self::Info,
            other => Self::Other(other),
        }
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
            Severity::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => f.write_str("critical"),
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
            Self::Info => f.write_str("info"),
            Self::Other(raw) => write!(f, "severity {raw}"),
        }
    }
}
