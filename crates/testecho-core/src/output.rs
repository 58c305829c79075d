// SPDX-License-Identifier: MIT OR Apache-2.0
//! Whole, flushed writes to the two output streams.

use crate::FixtureError;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Write `bytes` to stdout as one write followed by a flush.
pub async fn write_stdout<W>(out: &mut W, bytes: &[u8]) -> Result<(), FixtureError>
where
    W: AsyncWrite + Unpin,
{
    write_whole(out, bytes).await.map_err(FixtureError::Stdout)
}

/// Write `bytes` to stderr as one write followed by a flush.
pub async fn write_stderr<W>(err: &mut W, bytes: &[u8]) -> Result<(), FixtureError>
where
    W: AsyncWrite + Unpin,
{
    write_whole(err, bytes).await.map_err(FixtureError::Stderr)
}

async fn write_whole<W>(w: &mut W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if bytes.is_empty() {
        return Ok(());
    }
    w.write_all(bytes).await?;
    w.flush().await
}
