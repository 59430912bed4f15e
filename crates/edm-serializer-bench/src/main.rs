//! Telemetry marshalling benchmark.
//!
//! Builds a batch of synthetic device readings, marshals each one repeatedly
//! and reports payload sizes (raw and gzip) and throughput.
//!
//! Usage: `bench-telemetry [devices] [iterations]`

use std::io::Write;
use std::time::{Duration, Instant};

use edm_serializer::{
    DataMarshaller, Date, DateTimeOffset, MarshalValue, TypedValue, ValueError,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_DEVICES: usize = 1_000;
const DEFAULT_ITERATIONS: usize = 20;

/// One synthetic device reading.
struct Reading {
    names: Vec<String>,
    values: Vec<TypedValue>,
}

impl Reading {
    fn entries(&self) -> Vec<MarshalValue<'_>> {
        self.names
            .iter()
            .zip(&self.values)
            .map(|(name, value)| MarshalValue::new(name, value))
            .collect()
    }
}

#[derive(Serialize)]
struct Report {
    devices: usize,
    iterations: usize,
    raw_bytes: usize,
    gzip_bytes: usize,
    mean_payload_bytes: f64,
    with_path_ms: f64,
    without_path_ms: f64,
    payloads_per_sec: f64,
}

fn build_reading(index: usize) -> Result<Reading, ValueError> {
    let day = (index % 28) as u8 + 1;
    let taken_at = DateTimeOffset::new(Date::new(2024, 3, day)?, (index % 24) as u8, 30, 0)?
        .with_fractional_second((index as u64 * 7_919) % 1_000_000_000_000)?
        .with_time_zone(-5, 0)?;
    let location = TypedValue::complex(vec![
        ("lat".into(), TypedValue::Double(47.0 + index as f64 / 1_000.0)),
        ("lon".into(), TypedValue::Double(-122.0 - index as f64 / 1_000.0)),
    ])?;

    let fields = [
        ("DeviceId", TypedValue::Guid(*Uuid::new_v4().as_bytes())),
        ("Name", TypedValue::string(format!("sensor-{index:05}"))),
        ("Online", TypedValue::Boolean(index % 7 != 0)),
        ("Temperature", TypedValue::Single(18.0 + (index % 100) as f32 / 8.0)),
        ("Humidity", TypedValue::Byte((index % 101) as u8)),
        ("Counter", TypedValue::Int64(index as i64 * 1_000_003)),
        ("Reading", TypedValue::decimal(&format!("{}.{:02}", index / 100, index % 100))?),
        ("TakenAt", TypedValue::from(taken_at)),
        ("Firmware", TypedValue::Binary(vec![(index % 256) as u8, 0x0F, 0xA0])),
        ("Location", location),
    ];
    let (names, values) = fields.into_iter().map(|(n, v)| (n.to_string(), v)).unzip();
    Ok(Reading { names, values })
}

fn arg_or(position: usize, default: usize) -> usize {
    std::env::args()
        .nth(position)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(default)
}

fn gzip_len(data: &[u8]) -> std::io::Result<usize> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?.len())
}

fn time_marshal(readings: &[Reading], marshaller: DataMarshaller, iterations: usize) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        for reading in readings {
            if let Err(err) = marshaller.send_data(&reading.entries()) {
                warn!(error = %err, "marshal failed");
            }
        }
    }
    start.elapsed()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let devices = arg_or(1, DEFAULT_DEVICES);
    let iterations = arg_or(2, DEFAULT_ITERATIONS).max(1);

    let readings = (0..devices).map(build_reading).collect::<Result<Vec<_>, _>>()?;
    info!(devices, iterations, "built synthetic readings");

    // Every payload must be well-formed JSON before it is timed.
    let marshaller = DataMarshaller::new(true);
    let mut batch = Vec::new();
    for reading in &readings {
        let payload = marshaller.send_data(&reading.entries())?;
        serde_json::from_slice::<serde_json::Value>(&payload)?;
        batch.extend_from_slice(&payload);
        batch.push(b'\n');
    }
    let gzip_bytes = gzip_len(&batch)?;

    let with_path = time_marshal(&readings, DataMarshaller::new(true), iterations);
    let without_path = time_marshal(&readings, DataMarshaller::new(false), iterations);

    let total_payloads = (devices * iterations * 2) as f64;
    let total_secs = (with_path + without_path).as_secs_f64();
    let report = Report {
        devices,
        iterations,
        raw_bytes: batch.len(),
        gzip_bytes,
        mean_payload_bytes: batch.len() as f64 / devices.max(1) as f64,
        with_path_ms: with_path.as_secs_f64() * 1_000.0,
        without_path_ms: without_path.as_secs_f64() * 1_000.0,
        payloads_per_sec: if total_secs > 0.0 { total_payloads / total_secs } else { 0.0 },
    };

    info!(raw = report.raw_bytes, gzip = report.gzip_bytes, "payload sizes");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
