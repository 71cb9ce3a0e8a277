use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tevlink_frame::{FrameError, FrameReader};
use tracing::{debug, info, warn};

use crate::cmd::{Globals, ListenArgs};
use crate::exit::{io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_summary, FrameSummary, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const READ_TIMEOUT: Duration = Duration::from_millis(200);

pub fn run(args: ListenArgs, globals: &Globals) -> CliResult<i32> {
    let listener = TcpListener::bind(&args.bind)
        .map_err(|err| io_error(&format!("bind {} failed", args.bind), err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| io_error("listener setup failed", err))?;
    let local = listener
        .local_addr()
        .map_err(|err| io_error("listener setup failed", err))?;
    info!(addr = %local, "listening for viewer commands");
    eprintln!("listening on {local}");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let (stream, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                thread::sleep(POLL_INTERVAL);
                continue;
            }
            Err(err) => return Err(io_error("accept failed", err)),
        };
        let peer = peer.to_string();
        debug!(peer = %peer, "client connected");

        let reader = FrameReader::with_max_frame_size(prepare(stream)?, args.max_frame_size);
        let remaining = args.count.map(|count| count - printed);
        printed += serve(reader, &peer, remaining, &running, globals.format)?;

        if args.count.is_some_and(|count| printed >= count) {
            return Ok(SUCCESS);
        }
    }

    Ok(SUCCESS)
}

/// Print frames from one peer until it disconnects, sends something unreadable,
/// or `limit` frames have been printed. Returns the number printed.
fn serve(
    mut reader: FrameReader<TcpStream>,
    peer: &str,
    limit: Option<usize>,
    running: &AtomicBool,
    format: OutputFormat,
) -> CliResult<usize> {
    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) && limit.is_none_or(|limit| printed < limit) {
        let frame = match reader.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(FrameError::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue;
            }
            Err(FrameError::Io(err)) if err.kind() == ErrorKind::ConnectionReset => break,
            Err(FrameError::Io(err)) => return Err(io_error("receive failed", err)),
            Err(err) => {
                warn!(peer = %peer, error = %err, "dropping peer after unreadable frame");
                break;
            }
        };

        print_summary(&FrameSummary::from_frame(&frame, peer), format);
        printed += 1;
    }
    debug!(peer = %peer, printed, "client disconnected");
    Ok(printed)
}

/// Blocking reads with a short timeout, so the loop notices Ctrl-C.
fn prepare(stream: TcpStream) -> CliResult<TcpStream> {
    stream
        .set_nonblocking(false)
        .and_then(|()| stream.set_read_timeout(Some(READ_TIMEOUT)))
        .map_err(|err| io_error("connection setup failed", err))?;
    Ok(stream)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
