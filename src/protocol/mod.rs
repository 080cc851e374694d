//! Protocol module - wire format for the vcontrold CLI.
//!
//! The daemon speaks a line-oriented text protocol:
//! - Commands (client → daemon): `<command>[ <args>]\n`
//! - Responses (daemon → client): free-form text immediately followed by the
//!   literal prompt token `vctrld>` with no trailing newline
//!
//! On connect the daemon sends the bare prompt with no preceding text. The
//! prompt token is the unambiguous response terminator; the protocol forbids
//! it as literal content inside a response and the client does not escape it.

mod command;
mod response;

pub use command::encode_command;
pub use response::{classify_get, classify_set, ResponseBuffer};

/// The literal prompt token marking "ready for next command".
pub const PROMPT: &str = "vctrld>";

/// Command that terminates the session. The daemon answers by closing the
/// connection instead of sending another prompt.
pub const QUIT_COMMAND: &str = "quit";
