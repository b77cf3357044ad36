use std::path::PathBuf;
use tempfile::TempDir;

/// Create a file in `temp_dir`, or `None` if the filesystem rejects `user.*`
/// extended attributes (callers skip the test in that case)
#[allow(dead_code)]
pub fn xattr_file(temp_dir: &TempDir, name: &str) -> Option<PathBuf> {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, "content").unwrap();
    if xattr::set(&path, "user.support-check", b"1").is_err() {
        println!("Extended attributes not supported on this filesystem - test skipped");
        return None;
    }
    xattr::remove(&path, "user.support-check").unwrap();
    Some(path)
}

/// Raw stored value of an attribute, read independently of the crate under test
#[allow(dead_code)]
pub fn raw_value(path: &std::path::Path, key: &str) -> Option<String> {
    xattr::get(path, key)
        .unwrap()
        .map(|bytes| String::from_utf8(bytes).unwrap())
}
