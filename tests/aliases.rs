use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn command() -> Command {
    Command::cargo_bin("imgsize").expect("binary exists")
}

#[test]
fn alias_ch_works_like_charts() {
    command()
        .arg("ch")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Render PNG/SVG charts"));
}

#[test]
fn alias_ht_works_like_html() {
    command()
        .arg("ht")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("standalone HTML dashboard"));
}

#[test]
fn alias_cfg_works_like_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("cfg")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
