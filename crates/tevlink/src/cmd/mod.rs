use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use tevlink_client::{Client, ClientConfig};
use tevlink_frame::Color;

use crate::exit::{client_error, CliResult};
use crate::output::OutputFormat;

pub mod close;
pub mod create;
pub mod demo;
pub mod draw;
pub mod listen;
pub mod open;
pub mod reload;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open an image file in the viewer.
    Open(OpenArgs),
    /// Reload an open image from disk.
    Reload(ReloadArgs),
    /// Close an open image.
    Close(CloseArgs),
    /// Create an image, optionally filled with a test pattern.
    Create(CreateArgs),
    /// Draw shapes on an image's vector-graphics overlay.
    Draw(DrawArgs),
    /// Act as a viewer and print every frame received.
    Listen(ListenArgs),
    /// Walk through every command against a running viewer.
    Demo(DemoArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Globals {
    pub config: ClientConfig,
    pub format: OutputFormat,
}

impl Globals {
    /// Connect to the configured viewer.
    pub fn connect(&self) -> CliResult<Client> {
        Client::connect_to(&self.config).map_err(|err| {
            client_error(
                &format!("connect to {}:{} failed", self.config.host, self.config.port),
                err,
            )
        })
    }
}

pub fn run(command: Command, globals: &Globals) -> CliResult<i32> {
    match command {
        Command::Open(args) => open::run(args, globals),
        Command::Reload(args) => reload::run(args, globals),
        Command::Close(args) => close::run(args, globals),
        Command::Create(args) => create::run(args, globals),
        Command::Draw(args) => draw::run(args, globals),
        Command::Listen(args) => listen::run(args, globals),
        Command::Demo(args) => demo::run(args, globals),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Image path, as seen by the viewer.
    pub path: String,
    /// Only load channels matching this selector.
    #[arg(long, default_value = "")]
    pub channel_selector: String,
    /// Do not bring the image to the front.
    #[arg(long)]
    pub no_focus: bool,
}

#[derive(Args, Debug)]
pub struct ReloadArgs {
    /// Image name.
    pub name: String,
    /// Do not bring the image to the front.
    #[arg(long)]
    pub no_focus: bool,
}

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Image name.
    pub name: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    /// Leave the image empty.
    #[default]
    None,
    /// 16-pixel checkerboard in every channel.
    Checkerboard,
    /// u in the first channel, v in the second.
    Gradient,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Image name.
    pub name: String,
    #[arg(long)]
    pub width: u32,
    #[arg(long)]
    pub height: u32,
    /// Channel count; up to four get default names R, G, B, A.
    #[arg(long, default_value_t = 4, conflicts_with = "channel_names")]
    pub channels: usize,
    /// Explicit channel names (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub channel_names: Option<Vec<String>>,
    /// Fill the new image with a test pattern.
    #[arg(long, value_enum, default_value_t = Pattern::None)]
    pub pattern: Pattern,
    /// Do not bring the image to the front.
    #[arg(long)]
    pub no_focus: bool,
}

#[derive(Args, Debug)]
pub struct DrawArgs {
    /// Image name.
    pub name: String,
    /// Replace the existing overlay instead of appending to it.
    #[arg(long)]
    pub replace: bool,
    /// Stroke color as r,g,b[,a].
    #[arg(long, value_parser = parse_color)]
    pub stroke_color: Option<Color>,
    /// Fill color as r,g,b[,a]. Rectangles and circles are filled when set.
    #[arg(long, value_parser = parse_color)]
    pub fill_color: Option<Color>,
    /// Line as x0,y0,x1,y1 (repeatable).
    #[arg(long, value_parser = parse_floats::<4>)]
    pub line: Vec<[f32; 4]>,
    /// Rectangle as x,y,width,height (repeatable).
    #[arg(long, value_parser = parse_floats::<4>)]
    pub rect: Vec<[f32; 4]>,
    /// Circle as x,y,radius (repeatable).
    #[arg(long, value_parser = parse_floats::<3>)]
    pub circle: Vec<[f32; 3]>,
    /// Do not bring the image to the front.
    #[arg(long)]
    pub no_focus: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Address to accept viewer connections on.
    #[arg(long, default_value = "127.0.0.1:14158")]
    pub bind: String,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Drop a peer whose frame declares more than this many bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_LISTEN_MAX_FRAME_SIZE)]
    pub max_frame_size: usize,
}

/// Large enough for a 4096x4096 RGBA float update.
pub const DEFAULT_LISTEN_MAX_FRAME_SIZE: usize = 512 * 1024 * 1024;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Directory for the generated PFM files (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
    /// Pause between steps, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub pause_ms: u64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_floats<const N: usize>(input: &str) -> Result<[f32; N], String> {
    let values = input
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|err| format!("{part:?}: {err}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[f32; N]>::try_from(values)
        .map_err(|values| format!("expected {N} comma-separated numbers, got {}", values.len()))
}

fn parse_color(input: &str) -> Result<Color, String> {
    if input.split(',').count() == 3 {
        let [r, g, b] = parse_floats::<3>(input)?;
        return Ok(Color::rgb(r, g, b));
    }
    let [r, g, b, a] = parse_floats::<4>(input)?;
    Ok(Color::rgba(r, g, b, a))
}
