// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input resolution: echo piped stdin or print the configured literal.

use crate::{FixtureConfig, FixtureError};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

const FRAME_OPEN: &[u8] = b"stdin [";
const FRAME_CLOSE: &[u8] = b"]";

/// A source of standard input for a fixture run.
pub trait InputSource {
    /// Reader used when the input is piped.
    type Reader: AsyncBufRead + Unpin + Send;

    /// Whether input is piped rather than coming from a terminal or the null device.
    fn is_piped(&self) -> io::Result<bool>;

    /// Consume the source into its reader.
    fn into_reader(self) -> Self::Reader;
}

/// The real standard input of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessStdin;

impl InputSource for ProcessStdin {
    type Reader = BufReader<tokio::io::Stdin>;

    fn is_piped(&self) -> io::Result<bool> {
        stdin_is_piped()
    }

    fn into_reader(self) -> Self::Reader {
        BufReader::new(tokio::io::stdin())
    }
}

/// Anything that is not a character device counts as piped: FIFOs, regular
/// files and sockets. Terminals and `/dev/null` do not.
#[cfg(unix)]
fn stdin_is_piped() -> io::Result<bool> {
    use std::os::fd::AsFd;
    use std::os::unix::fs::FileTypeExt;

    let fd = io::stdin().as_fd().try_clone_to_owned()?;
    let meta = std::fs::File::from(fd).metadata()?;
    Ok(!meta.file_type().is_char_device())
}

#[cfg(not(unix))]
fn stdin_is_piped() -> io::Result<bool> {
    use std::io::IsTerminal;

    Ok(!io::stdin().is_terminal())
}

/// In-memory standard input.
#[derive(Debug, Clone, Copy)]
pub struct StaticInput<'a> {
    piped: bool,
    bytes: &'a [u8],
}

impl<'a> StaticInput<'a> {
    /// Input piped in with the given content.
    pub fn piped(bytes: &'a [u8]) -> Self {
        Self { piped: true, bytes }
    }

    /// An interactive (non-piped) stdin that is never read.
    pub fn terminal() -> Self {
        Self {
            piped: false,
            bytes: &[],
        }
    }
}

impl<'a> InputSource for StaticInput<'a> {
    type Reader = &'a [u8];

    fn is_piped(&self) -> io::Result<bool> {
        Ok(self.piped)
    }

    fn into_reader(self) -> Self::Reader {
        self.bytes
    }
}

/// Decide what goes to stdout outside of spawn mode.
///
/// Piped input is framed as `stdin [` + concatenated lines + `]`; otherwise
/// the configured `stdout` text is returned as-is. A non-empty `stdout`
/// together with piped input fails before anything is read.
pub async fn resolve_stdout<S: InputSource>(
    config: &FixtureConfig,
    source: S,
) -> Result<Vec<u8>, FixtureError> {
    let piped = source.is_piped().map_err(FixtureError::StdinInspect)?;
    if !piped {
        return Ok(config.stdout.clone().into_bytes());
    }
    if !config.stdout.is_empty() {
        return Err(FixtureError::StdoutConflict);
    }
    debug!(target: "testecho.input", "echoing piped stdin");
    frame_lines(source.into_reader()).await
}

/// Read every line from `reader` and wrap their concatenation in the echo frame.
///
/// Line terminators (`\n`, and a `\r` directly before it or at EOF) are dropped.
pub async fn frame_lines<R>(mut reader: R) -> Result<Vec<u8>, FixtureError>
where
    R: AsyncBufRead + Unpin,
{
    let mut framed = FRAME_OPEN.to_vec();
    let mut line = Vec::new();
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(FixtureError::StdinRead)?;
        if n == 0 {
            break;
        }
        framed.extend_from_slice(trim_line_ending(&line));
    }
    framed.extend_from_slice(FRAME_CLOSE);
    Ok(framed)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
