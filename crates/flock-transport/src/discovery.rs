//! Endpoint discovery.
//!
//! Serial endpoints are enumerated from the OS and matched against known
//! USB vendor/product pairs first, then against a case-insensitive substring
//! of the endpoint's human-readable description. Callers that pass an explicit
//! endpoint never reach this module.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};

/// STMicroelectronics VID used by stock Flipper Zero firmware.
pub const FLIPPER_VID: u16 = 0x0483;
/// Flipper Zero CDC PID.
pub const FLIPPER_PID: u16 = 0x5740;
/// pid.codes VID used by alternative firmware builds.
pub const FLIPPER_VID_ALT: u16 = 0x1209;
/// Alternative firmware CDC PID.
pub const FLIPPER_PID_ALT: u16 = 0x7776;

/// A candidate byte-stream endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    /// Device node to open.
    pub path: PathBuf,
    /// USB vendor id, when the endpoint sits on a USB device.
    pub vendor_id: Option<u16>,
    /// USB product id, when the endpoint sits on a USB device.
    pub product_id: Option<u16>,
    /// Human-readable product description.
    pub description: Option<String>,
}

impl EndpointInfo {
    /// `VID:PID` label, or `N/A` for non-USB endpoints.
    pub fn usb_label(&self) -> String {
        match (self.vendor_id, self.product_id) {
            (Some(vid), Some(pid)) => format!("VID:{vid:04X} PID:{pid:04X}"),
            _ => "N/A".to_string(),
        }
    }
}

/// Rules for recognising the device among enumerated endpoints.
#[derive(Debug, Clone)]
pub struct DeviceMatcher {
    /// Accepted `(vendor_id, product_id)` pairs.
    pub ids: Vec<(u16, u16)>,
    /// Case-insensitive substring looked for in the endpoint description.
    pub description_hint: Option<String>,
}

impl Default for DeviceMatcher {
    fn default() -> Self {
        Self {
            ids: vec![(FLIPPER_VID, FLIPPER_PID), (FLIPPER_VID_ALT, FLIPPER_PID_ALT)],
            description_hint: Some("flipper".to_string()),
        }
    }
}

impl DeviceMatcher {
    /// True when `endpoint` carries a known id pair or a matching description.
    pub fn matches(&self, endpoint: &EndpointInfo) -> bool {
        self.matches_ids(endpoint) || self.matches_description(endpoint)
    }

    fn matches_ids(&self, endpoint: &EndpointInfo) -> bool {
        match (endpoint.vendor_id, endpoint.product_id) {
            (Some(vid), Some(pid)) => self.ids.contains(&(vid, pid)),
            _ => false,
        }
    }

    fn matches_description(&self, endpoint: &EndpointInfo) -> bool {
        match (&self.description_hint, &endpoint.description) {
            (Some(hint), Some(description)) if !hint.is_empty() => description
                .to_lowercase()
                .contains(&hint.to_lowercase()),
            _ => false,
        }
    }
}

/// Pick the first endpoint the matcher accepts, in enumeration order.
pub fn select_endpoint<'a>(
    endpoints: &'a [EndpointInfo],
    matcher: &DeviceMatcher,
) -> Option<&'a EndpointInfo> {
    for endpoint in endpoints {
        if matcher.matches_ids(endpoint) {
            info!(path = ?endpoint.path, usb = %endpoint.usb_label(), "found device by USB id");
            return Some(endpoint);
        }
        if matcher.matches_description(endpoint) {
            info!(path = ?endpoint.path, "found device by description");
            return Some(endpoint);
        }
    }
    None
}

/// Enumerate endpoints and return the first one matching `matcher`.
///
/// Enumeration failures are logged and treated as "nothing found".
pub fn find_endpoint(matcher: &DeviceMatcher) -> Option<PathBuf> {
    let endpoints = match list_endpoints() {
        Ok(endpoints) => endpoints,
        Err(err) => {
            warn!(%err, "endpoint enumeration failed");
            return None;
        }
    };

    let found = select_endpoint(&endpoints, matcher).map(|endpoint| endpoint.path.clone());
    if found.is_none() {
        debug!(count = endpoints.len(), "no matching endpoint; available:");
        for endpoint in &endpoints {
            debug!(
                path = ?endpoint.path,
                description = endpoint.description.as_deref().unwrap_or(""),
                usb = %endpoint.usb_label(),
                "  candidate"
            );
        }
    }
    found
}

/// List serial endpoints known to the OS, sorted by path.
#[cfg(target_os = "linux")]
pub fn list_endpoints() -> Result<Vec<EndpointInfo>> {
    scan_sysfs(Path::new("/sys/class/tty"), Path::new("/dev")).map_err(TransportError::Enumerate)
}

/// List serial endpoints known to the OS, sorted by path.
///
/// Without sysfs only USB modem nodes are listed and no ids are available.
#[cfg(not(target_os = "linux"))]
pub fn list_endpoints() -> Result<Vec<EndpointInfo>> {
    let entries = std::fs::read_dir("/dev").map_err(TransportError::Enumerate)?;
    let mut endpoints: Vec<EndpointInfo> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.starts_with("cu.usbmodem").then(|| EndpointInfo {
                path: entry.path(),
                vendor_id: None,
                product_id: None,
                description: Some(name),
            })
        })
        .collect();
    endpoints.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(endpoints)
}

/// Walk a sysfs tty class directory. Entries without a backing `device`
/// (virtual consoles, ptys) are skipped.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn scan_sysfs(class_dir: &Path, dev_dir: &Path) -> std::io::Result<Vec<EndpointInfo>> {
    let mut endpoints = Vec::new();

    for entry in std::fs::read_dir(class_dir)? {
        let entry = entry?;
        let device_link = entry.path().join("device");
        let Ok(device_dir) = std::fs::canonicalize(&device_link) else {
            continue;
        };

        let name = entry.file_name();
        let usb_dir = find_usb_device_dir(&device_dir);
        let (vendor_id, product_id, description) = match &usb_dir {
            Some(dir) => (
                read_hex_id(&dir.join("idVendor")),
                read_hex_id(&dir.join("idProduct")),
                read_trimmed(&dir.join("product"))
                    .or_else(|| read_trimmed(&dir.join("manufacturer"))),
            ),
            None => (None, None, None),
        };

        endpoints.push(EndpointInfo {
            path: dev_dir.join(&name),
            vendor_id,
            product_id,
            description: description.or_else(|| Some(name.to_string_lossy().into_owned())),
        });
    }

    endpoints.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(endpoints)
}

/// The USB device directory is the nearest ancestor carrying `idVendor`.
fn find_usb_device_dir(device_dir: &Path) -> Option<PathBuf> {
    device_dir
        .ancestors()
        .take(4)
        .find(|dir| dir.join("idVendor").is_file())
        .map(Path::to_path_buf)
}

fn read_trimmed(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn read_hex_id(path: &Path) -> Option<u16> {
    read_trimmed(path).and_then(|text| u16::from_str_radix(&text, 16).ok())
}
