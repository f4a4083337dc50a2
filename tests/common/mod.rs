//! Shared test utilities and fixture generators

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

use netfeat::pipeline::schema::*;

pub const NULL_RATE: f64 = 0.05;

const PROTOCOLS: [&str; 3] = ["ICMP", "TCP", "UDP"];
const PACKET_TYPES: [&str; 2] = ["Control", "Data"];
const TRAFFIC_TYPES: [&str; 3] = ["DNS", "FTP", "HTTP"];
const ATTACK_TYPES: [&str; 3] = ["DDoS", "Intrusion", "Malware"];
const SIGNATURES: [&str; 2] = ["Known Pattern A", "Known Pattern B"];
const ACTIONS: [&str; 3] = ["Blocked", "Ignored", "Logged"];
const SEVERITIES: [&str; 3] = ["High", "Low", "Medium"];
const LOG_SOURCES: [&str; 2] = ["Firewall", "Server"];
const DEVICES: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0)",
    "Mozilla/5.0 (Macintosh)",
    "Opera/9.80 (X11; Linux)",
];
const CITIES: [&str; 4] = ["Jamshedpur, Sikkim", "Bilaspur, Nagaland", "Bokaro, Rajasthan", "Hyderabad, Telangana"];

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values[rng.gen_range(0..values.len())]
}

fn random_ip(rng: &mut StdRng) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(1..=254),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(1..=254)
    )
}

fn nullable(rng: &mut StdRng, value: &str) -> Option<String> {
    if rng.gen_bool(NULL_RATE) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Synthetic network-security log with every source column of the schema
///
/// - 5% nulls in each of the five nullable categorical columns
/// - `Payload Data` is empty at every index in `empty_payload_rows`
/// - deterministic for a given `seed`
pub fn create_network_logs(rows: usize, seed: u64, empty_payload_rows: &[usize]) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut timestamp = Vec::with_capacity(rows);
    let mut source_ip = Vec::with_capacity(rows);
    let mut destination_ip = Vec::with_capacity(rows);
    let mut source_port = Vec::with_capacity(rows);
    let mut destination_port = Vec::with_capacity(rows);
    let mut protocol = Vec::with_capacity(rows);
    let mut packet_length = Vec::with_capacity(rows);
    let mut packet_type = Vec::with_capacity(rows);
    let mut traffic_type = Vec::with_capacity(rows);
    let mut payload = Vec::with_capacity(rows);
    let mut malware = Vec::with_capacity(rows);
    let mut anomaly = Vec::with_capacity(rows);
    let mut alerts = Vec::with_capacity(rows);
    let mut attack_type = Vec::with_capacity(rows);
    let mut signature = Vec::with_capacity(rows);
    let mut action = Vec::with_capacity(rows);
    let mut severity = Vec::with_capacity(rows);
    let mut device = Vec::with_capacity(rows);
    let mut network_segment = Vec::with_capacity(rows);
    let mut geo = Vec::with_capacity(rows);
    let mut proxy = Vec::with_capacity(rows);
    let mut firewall = Vec::with_capacity(rows);
    let mut ids = Vec::with_capacity(rows);
    let mut log_source = Vec::with_capacity(rows);

    for i in 0..rows {
        timestamp.push(format!(
            "2023-{:02}-{:02} {:02}:{:02}:{:02}",
            rng.gen_range(1..=12),
            rng.gen_range(1..=28),
            rng.gen_range(0..24),
            rng.gen_range(0..60),
            rng.gen_range(0..60)
        ));
        source_ip.push(random_ip(&mut rng));
        destination_ip.push(random_ip(&mut rng));
        source_port.push(rng.gen_range(0..=65535i64));
        destination_port.push(rng.gen_range(0..=65535i64));
        protocol.push(pick(&mut rng, &PROTOCOLS).to_string());
        packet_length.push(rng.gen_range(64..=1500i64));
        packet_type.push(pick(&mut rng, &PACKET_TYPES).to_string());
        traffic_type.push(pick(&mut rng, &TRAFFIC_TYPES).to_string());

        let payload_len = if empty_payload_rows.contains(&i) {
            0
        } else {
            rng.gen_range(20..=1000)
        };
        payload.push(
            (0..payload_len)
                .map(|_| rng.gen_range(b'a'..=b'z') as char)
                .collect::<String>(),
        );

        malware.push(nullable(&mut rng, "IoC Detected"));
        anomaly.push(rng.gen_range(0.0..100.0f64));
        alerts.push(nullable(&mut rng, "Alert Triggered"));
        attack_type.push(pick(&mut rng, &ATTACK_TYPES).to_string());
        signature.push(pick(&mut rng, &SIGNATURES).to_string());
        action.push(pick(&mut rng, &ACTIONS).to_string());
        severity.push(pick(&mut rng, &SEVERITIES).to_string());
        device.push(pick(&mut rng, &DEVICES).to_string());
        network_segment.push(format!("Segment {}", ["A", "B", "C"][rng.gen_range(0..3)]));
        geo.push(pick(&mut rng, &CITIES).to_string());
        let proxy_ip = random_ip(&mut rng);
        proxy.push(nullable(&mut rng, &proxy_ip));
        firewall.push(nullable(&mut rng, "Log Data"));
        ids.push(nullable(&mut rng, "Alert Data"));
        log_source.push(pick(&mut rng, &LOG_SOURCES).to_string());
    }

    df! {
        TIMESTAMP => timestamp,
        SOURCE_IP => source_ip,
        DESTINATION_IP => destination_ip,
        SOURCE_PORT => source_port,
        DESTINATION_PORT => destination_port,
        PROTOCOL => protocol,
        PACKET_LENGTH => packet_length,
        PACKET_TYPE => packet_type,
        TRAFFIC_TYPE => traffic_type,
        PAYLOAD_DATA => payload,
        MALWARE_INDICATORS => malware,
        ANOMALY_SCORES => anomaly,
        ALERTS_WARNINGS => alerts,
        ATTACK_TYPE => attack_type,
        ATTACK_SIGNATURE => signature,
        ACTION_TAKEN => action,
        SEVERITY_LEVEL => severity,
        "User Information" => vec!["Anonymous"; rows],
        DEVICE_INFORMATION => device,
        "Network Segment" => network_segment,
        GEO_LOCATION => geo,
        PROXY_INFORMATION => proxy,
        FIREWALL_LOGS => firewall,
        IDS_IPS_ALERTS => ids,
        LOG_SOURCE => log_source,
    }
    .unwrap()
}

/// The nullable categorical columns the cleaner fills
pub fn designated_nullable_columns() -> [&'static str; 5] {
    [
        MALWARE_INDICATORS,
        ALERTS_WARNINGS,
        PROXY_INFORMATION,
        FIREWALL_LOGS,
        IDS_IPS_ALERTS,
    ]
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("network_logs.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("network_logs.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column present: '{}'",
            col
        );
    }
}

/// Column values as strings; nulls become `None`
pub fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect()
}
