//! On-disk format for filters and key material.
//!
//! Both artifacts are single-row CSV records. An index row holds the literal
//! fields `"1"`/`"0"` in bit order, so the row length defines `m`. A key row
//! holds lowercase-hex 16-byte keys in canonical schedule order. Index files
//! are written atomically (temp file + rename) so concurrent readers never
//! observe torn state; key files are created with owner-only permissions.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::bloom::BloomFilter;
use crate::error::{Error, Result};
use crate::keys::{HashKey, KeySchedule, KEY_LEN};

pub const INDEX_SUFFIX: &str = ".sindex";
pub const KEY_SUFFIX: &str = ".sindex.private";

pub fn encode_filter(filter: &BloomFilter) -> String {
    let fields: Vec<&str> = filter
        .bits()
        .iter()
        .map(|bit| if *bit { "1" } else { "0" })
        .collect();
    fields.join(",")
}

pub fn decode_filter(record: &str) -> Result<BloomFilter> {
    let record = record.trim_end_matches(['\r', '\n']);
    if record.is_empty() {
        return Ok(BloomFilter::from_bits(Vec::new()));
    }
    let mut bits = Vec::new();
    for field in record.split(',') {
        match field {
            "0" => bits.push(false),
            "1" => bits.push(true),
            other => {
                return Err(Error::Codec(format!(
                    "index field must be \"0\" or \"1\", got {other:?}"
                )))
            }
        }
    }
    Ok(BloomFilter::from_bits(bits))
}

pub fn encode_keys(schedule: &KeySchedule) -> String {
    schedule
        .keys()
        .iter()
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode_keys(record: &str) -> Result<KeySchedule> {
    let record = record.trim_end_matches(['\r', '\n']);
    if record.is_empty() {
        return Err(Error::Codec("key record holds no keys".into()));
    }
    let mut keys = Vec::new();
    for field in record.split(',') {
        let bytes = hex::decode(field)
            .map_err(|err| Error::Codec(format!("non-hex key field {field:?}: {err}")))?;
        let key: HashKey = bytes.try_into().map_err(|bytes: Vec<u8>| {
            Error::Codec(format!(
                "key field must be {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        keys.push(key);
    }
    Ok(KeySchedule::from_keys(keys))
}

/// Writes `<doc>.sindex` atomically next to its final location.
pub fn write_index_file(path: &Path, filter: &BloomFilter) -> Result<()> {
    let mut record = encode_filter(filter);
    record.push('\n');
    write_atomic(path, record.as_bytes())
}

pub fn read_index_file(path: &Path) -> Result<BloomFilter> {
    let record = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    decode_filter(&record)
}

/// Writes the key schedule with permissions restricting group and other.
pub fn write_key_file(path: &Path, schedule: &KeySchedule) -> Result<()> {
    let mut record = encode_keys(schedule);
    record.push('\n');
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(|err| Error::io(path, err))?;
    file.write_all(record.as_bytes())
        .map_err(|err| Error::io(path, err))
}

pub fn read_key_file(path: &Path) -> Result<KeySchedule> {
    let record = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    decode_keys(&record)
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Precondition(format!("{} has no file name", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp: PathBuf = path.with_file_name(tmp_name);
    fs::write(&tmp, data).map_err(|err| Error::io(&tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| Error::io(path, err))
}
