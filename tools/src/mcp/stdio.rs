//! Newline-delimited JSON-RPC over a byte stream

use super::server::McpServer;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

/// Serve requests read from `reader` until EOF
pub async fn serve<R, W>(server: &McpServer, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read MCP message")?
    {
        if line.trim().is_empty() {
            continue;
        }
        for message in server.handle_line(&line).await {
            let mut encoded =
                serde_json::to_string(&message).context("Failed to encode MCP message")?;
            encoded.push('\n');
            writer
                .write_all(encoded.as_bytes())
                .await
                .context("Failed to write MCP message")?;
        }
        writer.flush().await?;
    }
    Ok(())
}

/// Serve on the process's stdin/stdout
pub async fn serve_stdio(server: McpServer) -> Result<()> {
    info!("MCP server listening on stdio");
    serve(&server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    info!("MCP client closed stdin, shutting down");
    Ok(())
}
