//! Column names of the network-event table and the columns derived from it

pub const TIMESTAMP: &str = "Timestamp";
pub const SOURCE_IP: &str = "Source IP Address";
pub const DESTINATION_IP: &str = "Destination IP Address";
pub const SOURCE_PORT: &str = "Source Port";
pub const DESTINATION_PORT: &str = "Destination Port";
pub const PROTOCOL: &str = "Protocol";
pub const PACKET_LENGTH: &str = "Packet Length";
pub const PACKET_TYPE: &str = "Packet Type";
pub const TRAFFIC_TYPE: &str = "Traffic Type";
pub const PAYLOAD_DATA: &str = "Payload Data";
pub const MALWARE_INDICATORS: &str = "Malware Indicators";
pub const ANOMALY_SCORES: &str = "Anomaly Scores";
pub const ATTACK_TYPE: &str = "Attack Type";
pub const ATTACK_SIGNATURE: &str = "Attack Signature";
pub const ACTION_TAKEN: &str = "Action Taken";
pub const SEVERITY_LEVEL: &str = "Severity Level";
pub const DEVICE_INFORMATION: &str = "Device Information";
pub const GEO_LOCATION: &str = "Geo-location Data";
pub const ALERTS_WARNINGS: &str = "Alerts/Warnings";
pub const PROXY_INFORMATION: &str = "Proxy Information";
pub const FIREWALL_LOGS: &str = "Firewall Logs";
pub const IDS_IPS_ALERTS: &str = "IDS/IPS Alerts";
pub const LOG_SOURCE: &str = "Log Source";

// Derived columns
pub const PAYLOAD_LENGTH: &str = "Payload Length";
pub const PACKET_EFFICIENCY: &str = "Packet Efficiency";
pub const SOURCE_IP_CLASS: &str = "Source IP Class";
pub const DESTINATION_IP_CLASS: &str = "Destination IP Class";

/// Fill label for the proxy column when no proxy was recorded
pub const NO_PROXY_SENTINEL: &str = "No Proxy Information";

/// Suffix for binned label columns
pub const BINNED_SUFFIX: &str = "Binned";
/// Suffix for binarized flag columns
pub const BIN_SUFFIX: &str = "Bin";
/// Suffix for appended standardized columns
pub const SCALED_SUFFIX: &str = "Scaled";

/// Name of a column derived from `source` with a suffix, e.g. "Source Port Binned"
pub fn derived_name(source: &str, suffix: &str) -> String {
    format!("{} {}", source, suffix)
}

/// Name of the projected score column for component `index` (zero-based)
pub fn component_name(index: usize) -> String {
    format!("PC{}", index + 1)
}
