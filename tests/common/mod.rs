//! Hand-rolled on-disk-format fixture builders shared by the integration tests.
//!
//! These mirror the low-level writer helpers exercised by the crate's own unit tests, but live
//! here since the integration tests only see the crate's public API.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use integer_encoding::VarIntWriter as _;

const CHECKSUM_MASK_DELTA: u32 = 0xa282_ead8;

fn mask_checksum(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(CHECKSUM_MASK_DELTA)
}

fn masked_crc(prefix: &[u8], payload: &[u8]) -> u32 {
    let crc = crc32c::crc32c_append(crc32c::crc32c(prefix), payload);
    mask_checksum(crc)
}

/// A uniquely-named, auto-cleaned-up directory under the system temp dir.
pub struct TempDir(pub PathBuf);

impl TempDir {
    pub fn new(label: &str) -> Self {
        init_tracing();

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("anchored-leveldb-it-{label}-{unique}"));
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

/// Routes `tracing` events to stderr for the duration of the test binary, gated by `RUST_LOG` (so
/// a normal `cargo test` run stays quiet). Safe to call from every test; only the first call does
/// anything.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Appends one `Full`-type log record; every record built by these helpers fits in a single
/// 32 KiB block, so fragmentation is never exercised here (the unit tests cover that).
pub fn write_full_record(buf: &mut Vec<u8>, payload: &[u8]) {
    const RECORD_TYPE_FULL: u8 = 1;
    let masked = masked_crc(&[RECORD_TYPE_FULL], payload);
    buf.extend_from_slice(&masked.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    buf.push(RECORD_TYPE_FULL);
    buf.extend_from_slice(payload);
}

const TAG_COMPARATOR: u32 = 1;
const TAG_NEW_FILE: u32 = 7;
const TAG_DELETED_FILE: u32 = 6;

pub fn encode_comparator_edit(name: &str) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.write_varint(TAG_COMPARATOR).unwrap();
    payload.write_varint(name.len()).unwrap();
    payload.extend_from_slice(name.as_bytes());
    payload
}

/// `smallest`/`largest` are already-encoded internal keys (`user_key ‖ 8-byte trailer`).
pub fn encode_new_file_edit(
    level:       u8,
    file_number: u64,
    file_size:   u64,
    smallest:    &[u8],
    largest:     &[u8],
) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.write_varint(TAG_NEW_FILE).unwrap();
    payload.write_varint(u32::from(level)).unwrap();
    payload.write_varint(file_number).unwrap();
    payload.write_varint(file_size).unwrap();
    payload.write_varint(smallest.len()).unwrap();
    payload.extend_from_slice(smallest);
    payload.write_varint(largest.len()).unwrap();
    payload.extend_from_slice(largest);
    payload
}

pub fn encode_deleted_file_edit(level: u8, file_number: u64) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.write_varint(TAG_DELETED_FILE).unwrap();
    payload.write_varint(u32::from(level)).unwrap();
    payload.write_varint(file_number).unwrap();
    payload
}

/// `(sequence << 8) | entry_type`, little-endian, appended to `user_key`.
pub fn encode_internal_key(user_key: &[u8], sequence: u64, entry_type: u8) -> Vec<u8> {
    let trailer = (sequence << 8) | u64::from(entry_type);
    let mut buf = user_key.to_vec();
    buf.extend_from_slice(&trailer.to_le_bytes());
    buf
}

fn write_block_entry(block: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    block.write_varint(0_usize).unwrap(); // shared
    block.write_varint(key.len()).unwrap(); // non_shared
    block.write_varint(value.len()).unwrap();
    block.extend_from_slice(key);
    block.extend_from_slice(value);
}

/// Builds a block with a restart point before every entry (restart interval 1), for entries that
/// are assumed to already be sorted by the caller.
fn finish_block(entries: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut block = Vec::new();
    let mut restarts = Vec::new();
    for (key, value) in entries {
        restarts.push(block.len() as u32);
        write_block_entry(&mut block, key, value);
    }
    for restart in &restarts {
        block.extend_from_slice(&restart.to_le_bytes());
    }
    block.extend_from_slice(&(restarts.len() as u32).to_le_bytes());
    block
}

fn append_block_with_trailer(file: &mut Vec<u8>, block: &[u8]) -> (u64, u64) {
    const COMPRESSION_NONE: u8 = 0;
    let offset = file.len() as u64;
    let masked = masked_crc(block, &[COMPRESSION_NONE]);
    file.extend_from_slice(block);
    file.push(COMPRESSION_NONE);
    file.extend_from_slice(&masked.to_le_bytes());
    (offset, block.len() as u64)
}

const TABLE_MAGIC: u64 = 0xdb47_7524_8b80_fb57;

/// Builds a complete `.ldb` file: one data block holding every `(internal_key, value)` pair (the
/// caller must pass them in ascending internal-key order), one index block, and the footer.
pub fn build_table_file(entries: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut file = Vec::new();

    let data_block = finish_block(entries);
    let (data_offset, data_size) = append_block_with_trailer(&mut file, &data_block);

    let mut handle_bytes = Vec::new();
    handle_bytes.write_varint(data_offset).unwrap();
    handle_bytes.write_varint(data_size).unwrap();

    let last_key = entries.last().map(|(k, _)| k.clone()).unwrap_or_default();
    let index_block = finish_block(&[(last_key, handle_bytes)]);
    let (index_offset, index_size) = append_block_with_trailer(&mut file, &index_block);

    let mut footer = Vec::new();
    footer.write_varint(0_u64).unwrap(); // metaindex offset, unused
    footer.write_varint(0_u64).unwrap(); // metaindex size, unused
    footer.write_varint(index_offset).unwrap();
    footer.write_varint(index_size).unwrap();
    footer.resize(40, 0);
    footer.extend_from_slice(&TABLE_MAGIC.to_le_bytes());

    file.extend_from_slice(&footer);
    file
}

/// Writes a complete database directory: `CURRENT`, `MANIFEST-000001` (one `Full` record per
/// entry in `manifest_edits`, each already tagged/encoded), and one `.ldb` file per `tables`
/// entry.
pub fn write_database(dir: &PathBuf, manifest_edits: &[Vec<u8>], tables: &[(u64, Vec<u8>)]) {
    let mut manifest_bytes = Vec::new();
    for edit in manifest_edits {
        write_full_record(&mut manifest_bytes, edit);
    }
    fs::write(dir.join("MANIFEST-000001"), manifest_bytes).unwrap();
    fs::write(dir.join("CURRENT"), "MANIFEST-000001\n").unwrap();

    for (file_number, bytes) in tables {
        fs::write(dir.join(format!("{file_number:06}.ldb")), bytes).unwrap();
    }
}

pub const BYTEWISE_COMPARATOR_NAME: &str = "leveldb.BytewiseComparator";
