//! Shared test helpers.

#![allow(dead_code)]

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temp directory for hosts and config files.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("hostsfile_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| Path::new(".").into()))
        .expect("temp dir")
}

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write file");
    path
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("ip address")
}
