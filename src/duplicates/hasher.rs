use anyhow::Result;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Size of the quick hash prefix (first 4KB)
const QUICK_HASH_SIZE: usize = 4096;

const IO_BUF_SIZE: usize = 1024 * 1024;

/// Compute SHA-256 of the first 4KB of a file (quick hash)
pub fn quick_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buffer = vec![0u8; QUICK_HASH_SIZE];
    let bytes_read = reader.read(&mut buffer)?;
    buffer.truncate(bytes_read);

    let mut hasher = Sha256::new();
    hasher.update(&buffer);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute full SHA-256 hash of a file
pub fn full_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(IO_BUF_SIZE, file);
    let mut hasher = Sha256::new();

    let mut buffer = vec![0u8; IO_BUF_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare two files byte for byte.
/// Used as the final guard after hash grouping: a hash collision must not
/// produce a false duplicate when the stakes are deletion.
pub fn bytes_equal(a: &Path, b: &Path) -> Result<bool> {
    let len_a = std::fs::metadata(a)?.len();
    let len_b = std::fs::metadata(b)?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let mut reader_a = BufReader::with_capacity(IO_BUF_SIZE, File::open(a)?);
    let mut reader_b = BufReader::with_capacity(IO_BUF_SIZE, File::open(b)?);
    let mut buf_a = vec![0u8; IO_BUF_SIZE];
    let mut buf_b = vec![0u8; IO_BUF_SIZE];

    loop {
        let n_a = reader_a.read(&mut buf_a)?;
        let n_b = reader_b.read(&mut buf_b)?;
        if n_a != n_b {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
        if buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
    }
}

/// Group file paths by their file size.
/// Pass 1: files with unique sizes cannot be duplicates, which instantly
/// eliminates the vast majority of candidates.
pub fn group_by_size(files: &[PathBuf]) -> HashMap<u64, Vec<PathBuf>> {
    let mut groups: HashMap<u64, Vec<PathBuf>> = HashMap::new();

    for path in files {
        if let Ok(meta) = std::fs::metadata(path) {
            if meta.is_file() {
                groups.entry(meta.len()).or_default().push(path.clone());
            }
        }
    }

    groups.retain(|_, v| v.len() > 1);
    groups
}

/// Group files by quick hash (first 4KB).
/// Pass 2: eliminates most remaining false positives cheaply.
pub fn group_by_quick_hash(files: &[PathBuf]) -> HashMap<String, Vec<PathBuf>> {
    let mut groups: HashMap<String, Vec<PathBuf>> = HashMap::new();

    for path in files {
        match quick_hash(path) {
            Ok(hash) => groups.entry(hash).or_default().push(path.clone()),
            Err(_) => continue, // Skip unreadable files
        }
    }

    groups.retain(|_, v| v.len() > 1);
    groups
}

/// Group files by full SHA-256 hash.
/// Pass 3: confirms byte-for-byte duplicates (modulo collisions, which
/// `bytes_equal` rules out afterwards).
pub fn group_by_full_hash(files: &[PathBuf]) -> HashMap<String, Vec<PathBuf>> {
    let mut groups: HashMap<String, Vec<PathBuf>> = HashMap::new();

    for path in files {
        match full_hash(path) {
            Ok(hash) => groups.entry(hash).or_default().push(path.clone()),
            Err(_) => continue,
        }
    }

    groups.retain(|_, v| v.len() > 1);
    groups
}
