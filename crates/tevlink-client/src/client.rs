use std::sync::Arc;

use tevlink_frame::{
    encode_close_image, encode_create_image, encode_open_image, encode_reload_image,
    encode_update_image, encode_vector_graphics, interleaved_channels, resolve_channel_names,
    resolve_channels,
    ChannelDescriptor, Frame, ImageRegion, Packet, VgCommand,
};
use tevlink_transport::{BootstrapLease, NetworkBootstrap, TcpTransport, Transport};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorKind, Result};

/// One remote-control session with a viewer.
///
/// A session is either unconnected or connected. Every command builds one complete
/// frame before anything is written, so a rejected argument never reaches the wire.
/// The outcome of every operation is also kept as the session's last error state.
///
/// Sessions are not meant to be shared between threads without external locking.
/// Creating and dropping sessions from many threads at once is fine: the
/// process-wide [`NetworkBootstrap`] is reference counted behind a mutex.
pub struct Client<T: Transport = TcpTransport> {
    transport: T,
    auto_connect: bool,
    bootstrap: Arc<NetworkBootstrap>,
    lease: Option<BootstrapLease>,
    last_error: ErrorKind,
    last_message: String,
}

impl Client<TcpTransport> {
    /// Create an unconnected TCP session from `config`.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_parts(
            config.transport(),
            NetworkBootstrap::global(),
            config.auto_connect,
        )
    }

    /// Create a TCP session and connect it straight away.
    pub fn connect_to(config: &ClientConfig) -> Result<Self> {
        let mut client = Self::new(config);
        client.connect()?;
        Ok(client)
    }
}

impl<T: Transport> Client<T> {
    /// Wrap an arbitrary transport, sharing the process-wide bootstrap.
    pub fn with_transport(transport: T) -> Self {
        Self::with_parts(transport, NetworkBootstrap::global(), false)
    }

    /// Wrap a transport with an explicit bootstrap context.
    ///
    /// A failed bootstrap initialization does not abort construction; it becomes the
    /// session's last error and the next [`connect`](Self::connect) tries again.
    pub fn with_parts(transport: T, bootstrap: Arc<NetworkBootstrap>, auto_connect: bool) -> Self {
        let mut client = Self {
            transport,
            auto_connect,
            bootstrap,
            lease: None,
            last_error: ErrorKind::Ok,
            last_message: String::new(),
        };
        let outcome = client.ensure_lease();
        let _ = client.record(outcome);
        client
    }

    fn ensure_lease(&mut self) -> Result<()> {
        if self.lease.is_none() {
            self.lease = Some(self.bootstrap.lease()?);
        }
        Ok(())
    }

    /// Record `outcome` as the last error state and hand it back.
    fn record<R>(&mut self, outcome: Result<R>) -> Result<R> {
        match &outcome {
            Ok(_) => {
                self.last_error = ErrorKind::Ok;
                self.last_message.clear();
            }
            Err(err) => {
                self.last_error = err.kind();
                self.last_message = err.to_string();
            }
        }
        outcome
    }

    /// Open the connection. Connecting an already connected session is a no-op.
    pub fn connect(&mut self) -> Result<()> {
        let outcome = self.try_connect();
        self.record(outcome)
    }

    fn try_connect(&mut self) -> Result<()> {
        self.ensure_lease()?;
        if self.transport.is_connected() {
            return Ok(());
        }
        self.transport.connect()?;
        debug!("session connected");
        Ok(())
    }

    /// Close the connection. Disconnecting an unconnected session is a no-op.
    pub fn disconnect(&mut self) -> Result<()> {
        let outcome = if self.transport.is_connected() {
            self.transport.disconnect().map_err(ClientError::from)
        } else {
            Ok(())
        };
        self.record(outcome)
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Kind of the most recent operation's outcome.
    pub fn last_error(&self) -> ErrorKind {
        self.last_error
    }

    /// Message of the most recent failure, empty after a success.
    pub fn last_error_message(&self) -> &str {
        &self.last_message
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn ensure_connected(&mut self) -> Result<()> {
        if self.transport.is_connected() {
            Ok(())
        } else if self.auto_connect {
            self.try_connect()
        } else {
            Err(ClientError::NotConnected)
        }
    }

    fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        self.transport.send_bytes(frame.as_bytes())?;
        debug!(kind = ?frame.kind(), size = frame.len(), "frame sent");
        Ok(())
    }

    /// Connection check, then build, then send; the outcome is recorded.
    fn send_with<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce() -> tevlink_frame::Result<Frame>,
    {
        let outcome = self.try_send_with(build);
        self.record(outcome)
    }

    fn try_send_with<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce() -> tevlink_frame::Result<Frame>,
    {
        self.ensure_connected()?;
        let frame = build()?;
        self.send_frame(&frame)
    }

    /// Open an image file on the viewer's machine. An empty `channel_selector`
    /// selects every channel.
    pub fn open_image(&mut self, path: &str, channel_selector: &str, grab_focus: bool) -> Result<()> {
        self.send_with(|| encode_open_image(path, channel_selector, grab_focus))
    }

    pub fn reload_image(&mut self, name: &str, grab_focus: bool) -> Result<()> {
        self.send_with(|| encode_reload_image(name, grab_focus))
    }

    pub fn close_image(&mut self, name: &str) -> Result<()> {
        self.send_with(|| encode_close_image(name))
    }

    /// Create an empty image. Without explicit names, up to four channels are
    /// named R, G, B, A.
    pub fn create_image<S: AsRef<str>>(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        channel_count: usize,
        channel_names: Option<&[S]>,
        grab_focus: bool,
    ) -> Result<()> {
        self.send_with(|| {
            let names = resolve_channel_names(channel_count, channel_names)?;
            encode_create_image(name, width, height, &names, grab_focus)
        })
    }

    /// Update `region` of an image.
    ///
    /// Names, offsets and strides are each optional. Missing names default to
    /// R, G, B, A, missing offsets to the channel index and missing strides to the
    /// channel count, which together describe tightly interleaved data. Images
    /// with more than four channels need all three.
    #[allow(clippy::too_many_arguments)]
    pub fn update_image<S: AsRef<str>>(
        &mut self,
        name: &str,
        region: ImageRegion,
        channel_count: usize,
        channel_names: Option<&[S]>,
        channel_offsets: Option<&[i64]>,
        channel_strides: Option<&[i64]>,
        data: &[f32],
        grab_focus: bool,
    ) -> Result<()> {
        self.send_with(|| {
            let channels = resolve_channels(
                channel_count,
                channel_names,
                channel_offsets,
                channel_strides,
            )?;
            encode_update_image(name, region, &channels, data, grab_focus)
        })
    }

    /// Update `region` from pixel data with an explicit per-channel layout.
    pub fn update_image_strided(
        &mut self,
        name: &str,
        region: ImageRegion,
        channels: &[ChannelDescriptor],
        data: &[f32],
        grab_focus: bool,
    ) -> Result<()> {
        self.send_with(|| encode_update_image(name, region, channels, data, grab_focus))
    }

    /// Create an image and fill all of it from interleaved `data`.
    ///
    /// Channel names follow the same defaults as [`create_image`](Self::create_image).
    /// Both frames are validated before either is sent. If the create frame fails
    /// to send, the update is not attempted.
    #[allow(clippy::too_many_arguments)]
    pub fn create_image_with_data<S: AsRef<str>>(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        channel_count: usize,
        channel_names: Option<&[S]>,
        data: &[f32],
        grab_focus: bool,
    ) -> Result<()> {
        let outcome = self.ensure_connected().and_then(|()| {
            let names = resolve_channel_names(channel_count, channel_names)?;
            let create = encode_create_image(name, width, height, &names, grab_focus)?;
            let update = encode_update_image(
                name,
                ImageRegion::full(width, height),
                &interleaved_channels(&names),
                data,
                grab_focus,
            )?;
            self.send_frame(&create)?;
            self.send_frame(&update)
        });
        self.record(outcome)
    }

    /// Draw on the image's vector-graphics overlay, appending to or replacing
    /// whatever is there.
    pub fn vector_graphics(
        &mut self,
        name: &str,
        commands: &[VgCommand],
        append: bool,
        grab_focus: bool,
    ) -> Result<()> {
        self.send_with(|| encode_vector_graphics(name, commands, append, grab_focus))
    }

    /// Send a pre-built packet through the same path as the named commands.
    pub fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        self.send_with(|| packet.encode())
    }
}

impl<T: Transport> Drop for Client<T> {
    fn drop(&mut self) {
        if self.transport.is_connected() {
            if let Err(err) = self.transport.disconnect() {
                warn!(error = %err, "disconnect on drop failed");
            }
        }
        // Release only after the connection is gone.
        self.lease.take();
    }
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("connected", &self.transport.is_connected())
            .field("auto_connect", &self.auto_connect)
            .field("last_error", &self.last_error)
            .finish()
    }
}
