//! Command-line encoding.
//!
//! Commands are plain text terminated with a single `\n`. Set-style commands
//! carry arguments joined with single spaces; empty arguments are dropped
//! before joining.

/// Encode a command and its arguments as one wire line.
///
/// Empty argument entries are filtered out and the rest joined with single
/// spaces, so `encode_command("foo", ["1", "", "2"])` yields `"foo 1 2\n"`.
/// With no surviving arguments the line is just `"<command>\n"`.
pub fn encode_command<I, S>(command: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::from(command);
    for arg in args {
        let arg = arg.as_ref();
        if arg.is_empty() {
            continue;
        }
        line.push(' ');
        line.push_str(arg);
    }
    line.push('\n');
    line
}
