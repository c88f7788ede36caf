#![forbid(unsafe_code)]

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

const UDF: &str = "7HramSnctpbXqZ4SEzqvqteZdMdj3tEB2c9NT7egPQi7";
const PHOTON: &str = "pccm961CjaR7T7Hcht9omrXQb9w54ntJo95FFT7N9AJ";
const CONSUMER: &str = "3r5ixGQu8DRmJWgFEjwnDUQ6yasfYFXDsUbqkA6gkRtv";

fn fixmetadata(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fixmetadata"))
        .args(args)
        .current_dir(cwd)
        .env_remove("FIXMETA_IDL_DIR")
        .env_remove("FIXMETA_TARGETS")
        .env_remove("FIXMETA_LOG_JSON")
        .env("RUST_LOG", "warn")
        .output()
        .expect("run fixmetadata")
}

fn anchor_workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("Anchor.toml"), "[programs.localnet]\n").expect("marker");
    let idl = dir.path().join("target").join("idl");
    std::fs::create_dir_all(&idl).expect("idl dir");
    for name in ["udf_solana", "photon_mock", "price_consumer"] {
        std::fs::write(
            idl.join(format!("{name}.json")),
            format!(r#"{{"version":"0.1.0","name":"{name}","metadata":{{"stale":true}}}}"#),
        )
        .expect("seed idl");
    }
    dir
}

fn address_of(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read idl");
    let value: Value = serde_json::from_str(&text).expect("json");
    value.get("metadata").cloned().unwrap_or(Value::Null)
}

#[test]
fn no_arguments_patches_default_targets() {
    let ws = anchor_workspace();
    let output = fixmetadata(ws.path(), &[]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let idl = ws.path().join("target").join("idl");
    for (name, address) in [
        ("udf_solana", UDF),
        ("photon_mock", PHOTON),
        ("price_consumer", CONSUMER),
    ] {
        assert_eq!(
            address_of(&idl.join(format!("{name}.json"))),
            serde_json::json!({ "address": address })
        );
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let order = ["udf_solana", "photon_mock", "price_consumer"]
        .iter()
        .map(|name| stdout.find(name).expect("entry listed"))
        .collect::<Vec<_>>();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "stdout={stdout}");
}

#[test]
fn runs_from_workspace_subdirectory() {
    let ws = anchor_workspace();
    let nested = ws.path().join("programs").join("photon_mock");
    std::fs::create_dir_all(&nested).expect("nested");

    let output = fixmetadata(&nested, &[]);
    assert!(output.status.success());
    assert_eq!(
        address_of(&ws.path().join("target/idl/photon_mock.json")),
        serde_json::json!({ "address": PHOTON })
    );
}

#[test]
fn missing_idl_exits_nonzero_and_names_file() {
    let ws = anchor_workspace();
    let idl = ws.path().join("target").join("idl");
    std::fs::remove_file(idl.join("photon_mock.json")).expect("remove");

    let output = fixmetadata(ws.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("photon_mock.json"), "stderr={stderr}");
    assert!(stderr.contains("read failed"), "stderr={stderr}");

    assert_eq!(
        address_of(&idl.join("udf_solana.json")),
        serde_json::json!({ "address": UDF })
    );
    assert_eq!(
        address_of(&idl.join("price_consumer.json")),
        serde_json::json!({ "stale": true }),
        "targets after the failure stay untouched"
    );
}

#[test]
fn check_exits_three_on_drift_then_zero_after_patch() {
    let ws = anchor_workspace();

    let output = fixmetadata(ws.path(), &["--check"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("drifted"));

    assert!(fixmetadata(ws.path(), &[]).status.success());
    let output = fixmetadata(ws.path(), &["--check"]);
    assert!(output.status.success());
}

#[test]
fn manifest_and_idl_dir_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).expect("out dir");
    std::fs::write(out.join("custom.json"), r#"{"name":"custom"}"#).expect("seed");
    std::fs::write(
        dir.path().join("targets.yaml"),
        "targets:\n  - idl: custom\n    address: CUSTOM1\n",
    )
    .expect("manifest");

    let output = fixmetadata(
        dir.path(),
        &["--targets", "targets.yaml", "--idl-dir", "out"],
    );
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        std::fs::read_to_string(out.join("custom.json")).expect("read"),
        r#"{"name":"custom","metadata":{"address":"CUSTOM1"}}"#
    );
}

#[test]
fn invalid_manifest_is_a_usage_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("targets.yaml"), "targets: []\n").expect("manifest");

    let output = fixmetadata(dir.path(), &["--targets", "targets.yaml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no targets"));
}

#[test]
fn version_flag_includes_pkg_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = fixmetadata(dir.path(), &["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "stdout={stdout}");
}

#[test]
fn manifest_idl_entries_default_to_known_addresses() {
    let ws = anchor_workspace();
    std::fs::write(
        ws.path().join("targets.yaml"),
        "targets:\n  - idl: price_consumer\n  - idl: udf_solana\n",
    )
    .expect("manifest");

    let output = fixmetadata(ws.path(), &["--targets", "targets.yaml"]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let idl = ws.path().join("target").join("idl");
    assert_eq!(
        address_of(&idl.join("price_consumer.json")),
        serde_json::json!({ "address": CONSUMER })
    );
    assert_eq!(
        address_of(&idl.join("udf_solana.json")),
        serde_json::json!({ "address": UDF })
    );
    assert_eq!(
        address_of(&idl.join("photon_mock.json")),
        serde_json::json!({ "stale": true }),
        "targets missing from the manifest stay untouched"
    );
}

#[cfg(unix)]
#[test]
fn read_only_idl_exits_one_with_write_diagnostic() {
    use std::os::unix::fs::PermissionsExt;

    let ws = anchor_workspace();
    let locked = ws.path().join("target/idl/photon_mock.json");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o444)).expect("chmod");
    if std::fs::OpenOptions::new().write(true).open(&locked).is_ok() {
        eprintln!("skipping: permission bits not enforced for this user");
        return;
    }

    let output = fixmetadata(ws.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("write failed"), "stderr={stderr}");
    assert!(stderr.contains("photon_mock.json"), "stderr={stderr}");
    assert_eq!(
        address_of(&ws.path().join("target/idl/price_consumer.json")),
        serde_json::json!({ "stale": true })
    );
}

#[test]
fn help_describes_anchor_root_lookup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = fixmetadata(dir.path(), &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Anchor.toml"), "stdout={stdout}");
    assert!(stdout.contains("not ./target/idl"), "stdout={stdout}");
}
