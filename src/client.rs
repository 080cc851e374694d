//! Client builder and connection lifecycle.
//!
//! [`VControlClient`] owns one TCP connection to the daemon and drives the
//! request/response cycle: connect handshake on the initial prompt, one
//! command in flight at a time, response accumulation until the prompt
//! reappears, timeout-triggered teardown. Exclusivity of the pending
//! operation is structural: every operation takes `&mut self`, so a second
//! command cannot be issued while one is awaiting its response.
//!
//! # Example
//!
//! ```ignore
//! use vcontrold_client::VControlClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = VControlClient::builder("192.168.1.10", 3002).build();
//!
//!     client.connect().await?;
//!     let temp = client.get("getTempA").await?;
//!     client.set("setTempRaumNorSollM1", ["20"]).await?;
//!     client.close().await?;
//!
//!     println!("outside temperature: {temp}");
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{Result, VControlError};
use crate::protocol::{
    classify_get, classify_set, encode_command, ResponseBuffer, PROMPT, QUIT_COMMAND,
};

/// Default response timeout for commands.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Configuration for a [`VControlClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Hostname where vcontrold runs.
    pub host: String,
    /// Port to connect to vcontrold.
    pub port: u16,
    /// How long to wait for a command's terminating prompt.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// Enables diagnostic logging of connection and command lifecycle
    /// events. Has no effect on protocol behavior.
    #[serde(default)]
    pub debug: bool,
}

impl ClientConfig {
    /// Create a configuration with the default timeout and logging off.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
        }
    }
}

/// Builder for configuring and creating a [`VControlClient`].
///
/// Use the fluent API to adjust the timeout and logging, then call `build()`
/// to obtain an unconnected client.
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Create a new builder for the given daemon address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            config: ClientConfig::new(host, port),
        }
    }

    /// Set the response timeout for commands.
    ///
    /// Default: 3000 ms.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable diagnostic logging of lifecycle events.
    ///
    /// Default: off.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build the client. The connection is established by
    /// [`VControlClient::connect`].
    pub fn build(self) -> VControlClient {
        VControlClient::new(self.config)
    }
}

/// Connection lifecycle state.
///
/// `Connecting`, `AwaitingResponse` and `Closing` are only observable while
/// the corresponding operation is suspended; between operations the client
/// rests in `Idle`, `Ready`, `Closed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Constructed, transport not yet opened.
    Idle,
    /// `connect` in progress, awaiting the initial prompt.
    Connecting,
    /// Connected, no command in flight.
    Ready,
    /// Command sent, buffering the reply.
    AwaitingResponse,
    /// `quit` sent, awaiting the transport's close notification.
    Closing,
    /// Gracefully closed.
    Closed,
    /// Torn down after a transport error, handshake violation or timeout.
    /// The client is unusable; build a fresh one to reconnect.
    Failed,
}

/// Client for the vcontrold daemon.
///
/// Owns one TCP connection and a small amount of per-operation state: the
/// response accumulator and the lifecycle [`Mode`]. All operations suspend
/// the caller until settlement or failure.
pub struct VControlClient {
    config: ClientConfig,
    /// The TCP session. `None` until connected and after teardown.
    stream: Option<TcpStream>,
    buffer: ResponseBuffer,
    mode: Mode,
}

impl VControlClient {
    /// Create a new builder.
    pub fn builder(host: impl Into<String>, port: u16) -> ClientBuilder {
        ClientBuilder::new(host, port)
    }

    /// Create an unconnected client from a configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            stream: None,
            buffer: ResponseBuffer::new(),
            mode: Mode::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the client holds a usable connection.
    pub fn is_connected(&self) -> bool {
        self.mode == Mode::Ready
    }

    /// Connect to the daemon and wait for the initial prompt.
    ///
    /// The first data received must be exactly the prompt token; anything
    /// else is a protocol violation that fails the connect with the raw
    /// content as diagnostic and leaves the client unusable.
    pub async fn connect(&mut self) -> Result<()> {
        if self.mode != Mode::Idle {
            return Err(VControlError::AlreadyConnected);
        }
        self.mode = Mode::Connecting;

        if self.config.debug {
            tracing::debug!(
                host = %self.config.host,
                port = self.config.port,
                "connecting to vcontrold"
            );
        }

        let mut stream =
            match TcpStream::connect((self.config.host.as_str(), self.config.port)).await {
                Ok(stream) => stream,
                Err(e) => {
                    self.mode = Mode::Failed;
                    return Err(e.into());
                }
            };

        self.buffer.clear();
        match read_handshake(&mut stream, &mut self.buffer).await {
            Ok(()) => {
                if self.config.debug {
                    tracing::debug!("connection to vcontrold established");
                }
                self.stream = Some(stream);
                self.mode = Mode::Ready;
                Ok(())
            }
            Err(e) => {
                self.mode = Mode::Failed;
                Err(e)
            }
        }
    }

    /// Read data from the heating system by calling a `get` command.
    ///
    /// Resolves with the response text trimmed of trailing whitespace.
    /// Fails with [`VControlError::GetFailed`] when the daemon answers with
    /// an `ERR:` response.
    pub async fn get(&mut self, command: &str) -> Result<String> {
        let line = encode_command::<_, &str>(command, []);
        let response = self.dispatch(&line, command).await?;
        classify_get(command, &response)
    }

    /// Write data to the heating system by calling a `set` command.
    ///
    /// `args` is any sequence of string-likes; a single value is passed as
    /// `["value"]`. Empty entries are dropped and the rest joined with
    /// single spaces. Fails with [`VControlError::SetFailed`] unless the
    /// daemon answers with an `OK` response.
    pub async fn set<I, S>(&mut self, command: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = encode_command(command, args);
        let response = self.dispatch(&line, command).await?;
        classify_set(&line, &response)
    }

    /// Close the connection by sending the `quit` command.
    ///
    /// Resolves only once the daemon has closed the transport, not merely
    /// after the write succeeds.
    pub async fn close(&mut self) -> Result<()> {
        if self.mode != Mode::Ready {
            return Err(VControlError::NotConnected);
        }
        let mut stream = match self.stream.take() {
            Some(stream) => stream,
            None => return Err(VControlError::NotConnected),
        };
        self.mode = Mode::Closing;

        let line = encode_command::<_, &str>(QUIT_COMMAND, []);
        if let Err(e) = stream.write_all(line.as_bytes()).await {
            self.mode = Mode::Failed;
            return Err(e.into());
        }

        // The daemon sends no prompt after quit; wait for its close.
        let mut chunk = [0u8; 256];
        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) => {
                    self.mode = Mode::Failed;
                    return Err(e.into());
                }
            }
        }

        if self.config.debug {
            tracing::debug!("connection to vcontrold closed");
        }
        self.mode = Mode::Closed;
        Ok(())
    }

    /// Send one command line and await the prompt-terminated response.
    ///
    /// On timeout the transport is forcibly destroyed and the client left
    /// `Failed`; the timer is scoped to this dispatch alone, so it cannot
    /// affect any later operation.
    async fn dispatch(&mut self, line: &str, command: &str) -> Result<String> {
        if self.mode != Mode::Ready {
            return Err(VControlError::NotConnected);
        }
        let mut stream = match self.stream.take() {
            Some(stream) => stream,
            None => return Err(VControlError::NotConnected),
        };
        self.mode = Mode::AwaitingResponse;

        // Late bytes from a settled operation must not leak into this one.
        self.buffer.clear();
        if let Err(e) = drain_stale(&stream) {
            self.mode = Mode::Failed;
            return Err(e);
        }

        if self.config.debug {
            tracing::debug!(command, "sending command");
        }
        if let Err(e) = stream.write_all(line.as_bytes()).await {
            self.mode = Mode::Failed;
            return Err(e.into());
        }

        match timeout(
            self.config.timeout,
            read_response(&mut stream, &mut self.buffer),
        )
        .await
        {
            Ok(Ok(response)) => {
                if self.config.debug {
                    tracing::debug!(command, "command finished");
                }
                self.stream = Some(stream);
                self.mode = Mode::Ready;
                Ok(response)
            }
            Ok(Err(e)) => {
                if self.config.debug {
                    tracing::warn!(command, error = %e, "command failed");
                }
                self.mode = Mode::Failed;
                Err(e)
            }
            Err(_elapsed) => {
                // Dropping the stream destroys the connection.
                drop(stream);
                if self.config.debug {
                    tracing::warn!(command, "no response within timeout, destroying connection");
                }
                self.mode = Mode::Failed;
                Err(VControlError::Timeout {
                    command: command.to_string(),
                    timeout_ms: self.config.timeout.as_millis() as u64,
                })
            }
        }
    }
}

/// Await the initial prompt after the TCP connect.
///
/// Accumulated data that is a strict prefix of the prompt keeps waiting, so
/// a fragmented prompt still handshakes; any other content fails with the
/// raw content received.
async fn read_handshake(stream: &mut TcpStream, buffer: &mut ResponseBuffer) -> Result<()> {
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(VControlError::ConnectionClosed);
        }
        match buffer.push(&chunk[..n]) {
            // Bare prompt with no preceding text: connected.
            Some(body) if body.is_empty() => return Ok(()),
            Some(body) => {
                return Err(VControlError::Handshake(format!("{body}{PROMPT}")));
            }
            None => {
                if !buffer.is_prompt_prefix() {
                    let raw = buffer.as_text();
                    buffer.clear();
                    return Err(VControlError::Handshake(raw));
                }
            }
        }
    }
}

/// Accumulate socket data until the trailing prompt settles the response.
async fn read_response(stream: &mut TcpStream, buffer: &mut ResponseBuffer) -> Result<String> {
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(VControlError::ConnectionClosed);
        }
        if let Some(response) = buffer.push(&chunk[..n]) {
            return Ok(response);
        }
    }
}

/// Discard bytes the daemon sent between operations without blocking.
fn drain_stale(stream: &TcpStream) -> Result<()> {
    let mut scratch = [0u8; 256];
    loop {
        match stream.try_read(&mut scratch) {
            Ok(0) => return Err(VControlError::ConnectionClosed),
            Ok(n) => {
                tracing::trace!(bytes = n, "discarding stale data");
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }
}
