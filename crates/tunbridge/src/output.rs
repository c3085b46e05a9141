use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tunbridge_session::{Role, SessionStats};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    role: String,
    interface: &'a str,
    end: &'static str,
    #[serde(flatten)]
    stats: &'a SessionStats,
    timestamp: String,
}

/// Print the end-of-session report to stdout.
pub fn print_summary(role: Role, interface: &str, stats: &SessionStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", summary_json(role, interface, stats)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DIRECTION", "PACKETS", "BYTES"])
                .add_row(vec![
                    "device -> wire".to_string(),
                    stats.device_to_wire.to_string(),
                    stats.bytes_to_wire.to_string(),
                ])
                .add_row(vec![
                    "wire -> device".to_string(),
                    stats.wire_to_device.to_string(),
                    stats.bytes_to_device.to_string(),
                ]);
            println!("{role} on {interface}: peer disconnected");
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "role={} interface={} end=peer_closed device_to_wire={} ({} bytes) wire_to_device={} ({} bytes)",
                role,
                interface,
                stats.device_to_wire,
                stats.bytes_to_wire,
                stats.wire_to_device,
                stats.bytes_to_device
            );
        }
    }
}

fn summary_json(role: Role, interface: &str, stats: &SessionStats) -> String {
    let out = SummaryOutput {
        role: role.to_string(),
        interface,
        end: "peer_closed",
        stats,
        timestamp: now_unix_seconds(),
    };
    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
