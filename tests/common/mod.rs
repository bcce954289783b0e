#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub const MB: u64 = 1024 * 1024;

pub fn command() -> Command {
    Command::cargo_bin("imgsize").expect("binary exists")
}

/// Write a shell script that answers `image inspect` like docker does for
/// the given `(reference, bytes)` pairs and fails for anything else.
pub fn fake_runtime(dir: &Path, images: &[(&str, u64)]) -> PathBuf {
    let mut cases = String::new();
    for (image_ref, size) in images {
        cases.push_str(&format!("  {image_ref}) size={size} ;;\n"));
    }
    let script = format!(
        r#"#!/bin/sh
case "$3" in
{cases}  *) echo "Error: No such image: $3" >&2; exit 1 ;;
esac
if [ "$4" = "--format" ]; then
  echo "$size"
  exit 0
fi
printf '[{{"Id":"sha256:0123","Size":%s,"Created":"2024-05-01T12:00:00.123456789Z","Architecture":"amd64","Os":"linux","RootFS":{{"Type":"layers","Layers":["sha256:a","sha256:b","sha256:c"]}}}}]\n' "$size"
"#
    );

    let path = dir.join("fake-docker");
    fs::write(&path, script).expect("write fake runtime");
    let mut permissions = fs::metadata(&path).expect("stat fake runtime").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("chmod fake runtime");
    path
}
