//! Submission of magnet links and `.torrent` files.

use std::path::Path;

use anyhow::anyhow;

use crate::cli::AddArgs;
use crate::client::{AppContext, CliError, CliResult};

pub(crate) async fn handle_add(ctx: &AppContext, args: AddArgs) -> CliResult<()> {
    let AddArgs { source } = args;
    let source = source.trim();
    if source.is_empty() {
        return Err(CliError::validation("source must not be empty"));
    }

    let ack = if source.starts_with("magnet:") {
        ctx.api.add_magnet(source).await.map_err(CliError::failure)?
    } else {
        let path = Path::new(source);
        if path.extension().is_none_or(|ext| ext != "torrent") {
            return Err(CliError::validation(
                "source must be a magnet link or a .torrent file",
            ));
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CliError::validation("torrent path has no usable file name"))?;
        let bytes = std::fs::read(path).map_err(|err| {
            CliError::failure(anyhow!(
                "failed to read torrent file '{}': {err}",
                path.display()
            ))
        })?;
        ctx.api
            .upload_torrent(file_name, bytes)
            .await
            .map_err(CliError::failure)?
    };

    match ack.download_id {
        Some(id) => println!("{} (id: {id})", ack.message),
        None => println!("{}", ack.message),
    }
    Ok(())
}
