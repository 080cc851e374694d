//! Error types for vcontrold-client.

use thiserror::Error;

/// Main error type for all client operations.
#[derive(Debug, Error)]
pub enum VControlError {
    /// I/O error on the underlying TCP connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The daemon sent something other than the bare prompt during the
    /// connect handshake. Carries the raw content received.
    #[error("unexpected handshake response: {0}")]
    Handshake(String),

    /// A `get` command was answered with an `ERR:` response.
    #[error("unable to perform command '{command}': {response}")]
    GetFailed {
        /// The command that was sent.
        command: String,
        /// The raw response text from the daemon.
        response: String,
    },

    /// A `set` command was answered with anything other than `OK`.
    #[error("set command failed: {command} ({response})")]
    SetFailed {
        /// The full command line that was sent (command plus joined args).
        command: String,
        /// The raw response text from the daemon.
        response: String,
    },

    /// No terminating prompt arrived within the configured window.
    /// The connection has been torn down as a side effect.
    #[error("no response for command '{command}' within {timeout_ms}ms")]
    Timeout {
        /// The command that was pending when the timer fired.
        command: String,
        /// The configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The daemon closed the connection while an operation was pending.
    #[error("connection closed")]
    ConnectionClosed,

    /// Operation attempted while the client is not connected, including
    /// after a timeout or transport error invalidated the connection.
    #[error("client is not connected")]
    NotConnected,

    /// `connect` called on a client whose connection was already used.
    /// A failed or closed connection requires a fresh client.
    #[error("connect requires a fresh client")]
    AlreadyConnected,
}

/// Result type alias using VControlError.
pub type Result<T> = std::result::Result<T, VControlError>;
