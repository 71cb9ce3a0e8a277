mod cmd;
mod exit;
mod image;
mod logging;
mod output;

use clap::Parser;
use tevlink_client::ClientConfig;
use tevlink_transport::{DEFAULT_HOST, DEFAULT_PORT};

use crate::cmd::{Command, Globals};
use crate::exit::{client_error, CliResult};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tevlink", version, about = "Remote control for the tev image viewer")]
struct Cli {
    /// Viewer host.
    #[arg(long, env = "TEV_HOST", default_value = DEFAULT_HOST, global = true)]
    host: String,

    /// Viewer port.
    #[arg(long, env = "TEV_PORT", default_value_t = DEFAULT_PORT, global = true)]
    port: u16,

    /// Viewer address as host, host:port or [v6]:port. Overrides --host and --port.
    #[arg(long, value_name = "ADDR", global = true)]
    viewer: Option<String>,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn globals(&self) -> CliResult<Globals> {
        let config = match &self.viewer {
            Some(addr) => ClientConfig::from_address(addr)
                .map_err(|err| client_error("invalid --viewer", err))?,
            None => ClientConfig::new(self.host.clone(), self.port),
        };
        Ok(Globals {
            config,
            format: self.format.unwrap_or_else(OutputFormat::default_for_stdout),
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = cli
        .globals()
        .and_then(|globals| cmd::run(cli.command, &globals));

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_with_selector() {
        let cli = Cli::try_parse_from([
            "tevlink",
            "--port",
            "9000",
            "open",
            "a.png",
            "--channel-selector",
            "R",
        ])
        .expect("open args should parse");

        assert_eq!(cli.port, 9000);
        match cli.command {
            Command::Open(args) => {
                assert_eq!(args.path, "a.png");
                assert_eq!(args.channel_selector, "R");
                assert!(!args.no_focus);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["tevlink", "close", "img", "--host", "viewer.local"])
            .expect("global flags should parse after the subcommand");
        let globals = cli.globals().unwrap();
        assert_eq!(globals.config.host, "viewer.local");
        assert!(!globals.config.auto_connect);
    }

    #[test]
    fn viewer_address_overrides_host_and_port() {
        let cli = Cli::try_parse_from([
            "tevlink",
            "--host",
            "ignored",
            "--viewer",
            "[::1]:9000",
            "close",
            "img",
        ])
        .expect("viewer flag should parse");
        let globals = cli.globals().unwrap();
        assert_eq!(globals.config.host, "::1");
        assert_eq!(globals.config.port, 9000);

        let cli = Cli::try_parse_from(["tevlink", "close", "img", "--viewer", "host:port"])
            .expect("viewer flag should parse");
        let err = cli.globals().unwrap_err();
        assert_eq!(err.code, crate::exit::USAGE);
    }

    #[test]
    fn rejects_conflicting_channel_args() {
        let err = Cli::try_parse_from([
            "tevlink",
            "create",
            "img",
            "--width",
            "4",
            "--height",
            "4",
            "--channels",
            "2",
            "--channel-names",
            "Y,Z",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_repeated_shapes() {
        let cli = Cli::try_parse_from([
            "tevlink",
            "draw",
            "img",
            "--line",
            "0,0,10,10",
            "--line",
            "10,0,0,10",
            "--circle",
            "5,5,2",
            "--stroke-color",
            "1,0,0",
        ])
        .expect("draw args should parse");

        let Command::Draw(args) = cli.command else {
            panic!("expected draw");
        };
        assert_eq!(args.line.len(), 2);
        assert_eq!(args.circle, vec![[5.0, 5.0, 2.0]]);
        assert!(args.stroke_color.is_some());
    }

    #[test]
    fn rejects_malformed_shape() {
        let err = Cli::try_parse_from(["tevlink", "draw", "img", "--rect", "1,2,3"])
            .expect_err("three numbers are not a rect");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
