//! Wire frames for the search session.
//!
//! One JSON value per line in each direction. A request is either the
//! termination sentinel (`null`) or the trapdoor: an array of lowercase-hex
//! 32-byte tags in schedule order. A reply is a tagged record carrying the
//! list of indexes that were checked (informational) and the matching
//! document identifiers, or an error message when the request could not be
//! decoded.

use serde::{Deserialize, Serialize};
use sindex::prf::{Tag, TAG_LEN};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trapdoor tag is not valid hex: {0}")]
    TagEncoding(#[from] hex::FromHexError),

    #[error("trapdoor tag must be {TAG_LEN} bytes, got {0}")]
    TagLength(usize),

    #[error("trapdoor holds no tags")]
    EmptyTrapdoor,
}

/// Encodes a trapdoor request; `None` is the termination sentinel.
pub fn encode_request(trapdoor: Option<&[Tag]>) -> String {
    match trapdoor {
        None => "null".to_string(),
        Some(tags) => {
            let fields: Vec<String> = tags.iter().map(hex::encode).collect();
            serde_json::to_string(&fields).expect("hex fields always serialize")
        }
    }
}

/// Decodes a request line. `Ok(None)` is the termination sentinel.
pub fn decode_request(line: &str) -> Result<Option<Vec<Tag>>, WireError> {
    let fields: Option<Vec<String>> = serde_json::from_str(line)?;
    let Some(fields) = fields else {
        return Ok(None);
    };
    if fields.is_empty() {
        return Err(WireError::EmptyTrapdoor);
    }
    let mut tags = Vec::with_capacity(fields.len());
    for field in &fields {
        let bytes = hex::decode(field)?;
        let tag: Tag = bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| WireError::TagLength(bytes.len()))?;
        tags.push(tag);
    }
    Ok(Some(tags))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    Ok {
        /// Index files the server consulted, in traversal order.
        checked: Vec<String>,
        /// Identifiers of the matching documents.
        matches: Vec<String>,
    },
    Error {
        message: String,
    },
}

impl Reply {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("reply frames always serialize")
    }

    pub fn decode(line: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(line)?)
    }
}
