use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tevlink_frame::{Frame, Packet};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
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

/// One received frame, as reported by `listen`.
#[derive(Debug, Serialize)]
pub struct FrameSummary {
    pub kind: &'static str,
    pub size: usize,
    pub image: Option<String>,
    pub detail: String,
    pub peer: String,
    pub timestamp: String,
}

impl FrameSummary {
    pub fn from_frame(frame: &Frame, peer: &str) -> Self {
        let (image, detail) = match Packet::decode(frame) {
            Ok(packet) => (Some(packet.image_name().to_string()), describe(&packet)),
            Err(err) => (None, format!("undecodable: {err}")),
        };
        Self {
            kind: frame.kind().name(),
            size: frame.len(),
            image,
            detail,
            peer: peer.to_string(),
            timestamp: now_unix_seconds(),
        }
    }
}

fn describe(packet: &Packet) -> String {
    let focus = |grab: bool| if grab { " +focus" } else { "" };
    match packet {
        Packet::OpenImage {
            channel_selector,
            grab_focus,
            ..
        } if channel_selector.is_empty() => format!("all channels{}", focus(*grab_focus)),
        Packet::OpenImage {
            channel_selector,
            grab_focus,
            ..
        } => format!("channels {channel_selector}{}", focus(*grab_focus)),
        Packet::ReloadImage { grab_focus, .. } => format!("reload{}", focus(*grab_focus)),
        Packet::CloseImage { .. } => "close".to_string(),
        Packet::CreateImage {
            width,
            height,
            channel_names,
            grab_focus,
            ..
        } => format!(
            "{width}x{height} [{}]{}",
            channel_names.join(","),
            focus(*grab_focus)
        ),
        Packet::UpdateImage {
            region,
            channels,
            data,
            grab_focus,
            ..
        } => format!(
            "region {},{} {}x{} [{}] {} floats{}",
            region.x,
            region.y,
            region.width,
            region.height,
            channels
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
            data.len(),
            focus(*grab_focus)
        ),
        Packet::VectorGraphics {
            append,
            commands,
            grab_focus,
            ..
        } => format!(
            "{} commands, {}{}",
            commands.len(),
            if *append { "append" } else { "replace" },
            focus(*grab_focus)
        ),
    }
}

pub fn print_summary(summary: &FrameSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "SIZE", "IMAGE", "DETAIL", "PEER"])
                .add_row(vec![
                    summary.kind.to_string(),
                    summary.size.to_string(),
                    summary.image.clone().unwrap_or_default(),
                    summary.detail.clone(),
                    summary.peer.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} image={} size={} peer={} {}",
                summary.kind,
                summary.image.as_deref().unwrap_or("-"),
                summary.size,
                summary.peer,
                summary.detail
            );
        }
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
