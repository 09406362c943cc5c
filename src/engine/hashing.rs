//! File content hashing for the content signature scheme.

use anyhow::Result;
use blake3::Hasher;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

use crate::utils::config::HashingConsts;

/// Hash a file with blake3. Memory-mapped I/O for files above the threshold,
/// chunked reading otherwise.
pub fn hash_file(path: &Path, size: u64) -> Result<[u8; 32]> {
    let file = File::open(path)?;
    let mut hasher = Hasher::new();

    if size > HashingConsts::HASH_MMAP_THRESHOLD {
        let mmap = unsafe { Mmap::map(&file)? };
        hasher.update(&mmap);
    } else {
        use std::io::Read;
        let mut reader =
            std::io::BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, file);
        let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(*hasher.finalize().as_bytes())
}
