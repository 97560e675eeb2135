//! Per-connection search loop.
//!
//! Each accepted connection runs in its own task with no shared mutable
//! state; index files are opened on demand per request, so concurrent
//! connections need no locking. Within a connection replies are strictly
//! FIFO. A malformed index file is logged and skipped; a malformed request
//! frame is answered with an error reply and closes that connection only.

use std::path::{Path, PathBuf};

use eyre::Result;
use sindex::codec;
use sindex::index;
use sindex::prf::{HmacSha256, Tag};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::protocol::{self, Reply};

/// Accept loop: one spawned task per connection.
pub async fn serve(listener: TcpListener, index_root: PathBuf) -> Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("connection established with {peer}");
        let root = index_root.clone();
        tokio::spawn(async move {
            match handle_connection(socket, &root).await {
                Ok(()) => info!("connection with {peer} closed"),
                Err(err) => warn!("connection with {peer} dropped: {err}"),
            }
        });
    }
}

async fn handle_connection(socket: TcpStream, root: &Path) -> std::io::Result<()> {
    let (read_half, mut write_half) = socket.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            // Peer disconnected without the sentinel.
            return Ok(());
        }
        let trapdoor = match protocol::decode_request(line.trim_end()) {
            Ok(Some(trapdoor)) => trapdoor,
            Ok(None) => return Ok(()),
            Err(err) => {
                let reply = Reply::Error {
                    message: err.to_string(),
                };
                write_half
                    .write_all(format!("{}\n", reply.encode()).as_bytes())
                    .await?;
                return Ok(());
            }
        };
        let reply = run_search(root, &trapdoor);
        write_half
            .write_all(format!("{}\n", reply.encode()).as_bytes())
            .await?;
    }
}

/// Tests every index under `root` against the received trapdoor.
fn run_search(root: &Path, trapdoor: &[Tag]) -> Reply {
    let mut checked = Vec::new();
    let mut matched = Vec::new();
    for path in index_files(root) {
        checked.push(path.display().to_string());
        let filter = match codec::read_index_file(&path) {
            Ok(filter) => filter,
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                continue;
            }
        };
        let Some(doc_id) = doc_id_from_index_path(&path) else {
            warn!("skipping {}: unusable file name", path.display());
            continue;
        };
        if index::matches(&HmacSha256, &filter, trapdoor, &doc_id) {
            matched.push(doc_id);
        }
    }
    Reply::Ok {
        checked,
        matches: matched,
    }
}

/// Collects `*.sindex` files under `root`, depth-first.
fn index_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("cannot read {}: {err}", dir.display());
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(codec::INDEX_SUFFIX))
            {
                found.push(path);
            }
        }
    }
    found
}

/// `id(d)` is the index file name minus the `.sindex` suffix.
fn doc_id_from_index_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(codec::INDEX_SUFFIX).map(str::to_owned)
}
