//! Hashing System - SHA-256 for Build Manifests
//!
//! Every emitted page is hashed so two builds of the same catalog can be
//! compared file by file, and the manifest itself gets a stable digest.

use sha2::{Digest, Sha256};
use serde::Serialize;
use serde_json::{to_string, Value};
use std::io;
use std::path::Path;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hash a file already written to disk.
pub fn sha256_file(path: &Path) -> io::Result<(u64, String)> {
    let data = std::fs::read(path)?;
    Ok((data.len() as u64, sha256_hex(&data)))
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Digest of a manifest's canonical JSON.
pub fn compute_manifest_hash<T: Serialize + ?Sized>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"series": [{"title": "b", "id": "a"}], "index": 1});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"index":1,"series":[{"id":"a","title":"b"}]}"#);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_file_hash_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, b"<html></html>").unwrap();
        let (size, hash) = sha256_file(&path).unwrap();
        assert_eq!(size, 13);
        assert_eq!(hash, sha256_hex(b"<html></html>"));
    }
}
