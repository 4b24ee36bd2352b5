use serde::Deserialize;

/// A wireless access point observed during a scan.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AccessPoint {
    pub ssid: String,
    pub mac_address: String,
    pub signal_strength: i32, // In dBm
    #[serde(default)]
    pub channel: Option<u32>,
}
