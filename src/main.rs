//! Secure-index build tool: walks a directory of documents, extracts
//! keywords, and writes one `.sindex` file per document. A fresh hash-key
//! schedule is generated (and persisted owner-readable) unless an existing
//! key file is supplied; documents can optionally be AES-GCM encrypted
//! after indexing.

mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{eyre, Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::OsRng;
use sindex::codec;
use sindex::filecrypt;
use sindex::index::{build_index, DEFAULT_FP_RATE, DEFAULT_SCALING};
use sindex::keys::KeySchedule;
use sindex::prf::HmacSha256;
use sindex::Error;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of documents to index
    #[arg(long, env = "SINDEX_BUILD_DIR", default_value = "documents")]
    dir: PathBuf,

    /// Existing private key file; omit to generate a fresh schedule
    #[arg(long, env = "SINDEX_BUILD_KEYS")]
    keys: Option<PathBuf>,

    /// Directory a freshly generated key file is written to
    #[arg(long, env = "SINDEX_BUILD_KEY_OUT", default_value = ".")]
    key_out: PathBuf,

    /// Target Bloom filter false-positive rate (determines the key count)
    #[arg(long, env = "SINDEX_BUILD_FP_RATE", default_value_t = DEFAULT_FP_RATE)]
    false_positive_rate: f64,

    /// Filter capacity reserved for future document updates
    #[arg(long, env = "SINDEX_BUILD_SCALING", default_value_t = DEFAULT_SCALING)]
    scaling_factor: f64,

    /// Indexable file suffixes
    #[arg(
        long,
        env = "SINDEX_BUILD_EXTENSIONS",
        default_value = ".txt,.csv,.rtf,.pdf",
        value_delimiter = ','
    )]
    extensions: Vec<String>,

    /// Encrypt each document with AES-256-GCM after indexing
    #[arg(long, env = "SINDEX_BUILD_ENCRYPT", default_value_t = false)]
    encrypt: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let schedule = match &args.keys {
        Some(path) => {
            info!("loading key schedule from {}", path.display());
            codec::read_key_file(path)?
        }
        None => {
            let schedule = KeySchedule::generate(args.false_positive_rate)?;
            let name = args
                .dir
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("index");
            let path = args.key_out.join(format!("{name}{}", codec::KEY_SUFFIX));
            codec::write_key_file(&path, &schedule)?;
            info!(
                "wrote fresh key schedule ({} keys) to {}",
                schedule.hash_count(),
                path.display()
            );
            schedule
        }
    };

    let files = indexable_files(&args.dir, &args.extensions)?;
    info!(
        "building indexes for {} documents under {}",
        files.len(),
        args.dir.display()
    );

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} {msg}")
            .unwrap(),
    );

    let mut built = 0usize;
    for file in &files {
        bar.set_message(file.display().to_string());
        match build_one(&schedule, file, &args) {
            Ok(()) => built += 1,
            Err(report) if is_rng_failure(&report) => {
                bar.abandon();
                return Err(report.wrap_err("secure random source failed, aborting the batch"));
            }
            Err(report) => warn!("skipping {}: {report:#}", file.display()),
        }
        bar.inc(1);
    }
    bar.finish_with_message(format!("indexed {built}/{} documents", files.len()));
    info!("secure index build complete");
    Ok(())
}

fn build_one(schedule: &KeySchedule, file: &Path, args: &Args) -> Result<()> {
    let text = extract::extract_text(file)?;
    let keywords = extract::extract_keywords(&text);
    let doc_id = file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| eyre!("{} has no usable file name", file.display()))?;

    let filter = build_index(
        &HmacSha256,
        &mut OsRng,
        schedule,
        doc_id,
        &keywords,
        text.len(),
        args.scaling_factor,
    )?;
    let index_path = PathBuf::from(format!("{}{}", file.display(), codec::INDEX_SUFFIX));
    codec::write_index_file(&index_path, &filter)?;

    if args.encrypt {
        filecrypt::encrypt_file(file, &args.key_out)?;
    }
    Ok(())
}

/// Recursive walk collecting files that carry one of the indexable
/// suffixes, skipping artifacts of earlier runs. Sorted for a stable build
/// order.
fn indexable_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries =
            fs::read_dir(&dir).wrap_err_with(|| format!("unable to read {}", dir.display()))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.ends_with(codec::INDEX_SUFFIX) || name.ends_with(filecrypt::DATA_SUFFIX) {
                continue;
            }
            if extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

fn is_rng_failure(report: &eyre::Report) -> bool {
    matches!(
        report.downcast_ref::<Error>(),
        Some(Error::RngUnavailable(_))
    )
}
