use std::process::{Command, Output, Stdio};

fn kcapi_rng(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kcapi-rng"))
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to spawn kcapi-rng")
}

#[test]
fn test_zero_bytes_is_usage_error() {
    let out = kcapi_rng(&["-b", "0"]);

    assert_eq!(Some(2), out.status.code());
    assert!(out.stdout.is_empty());
    assert!(!out.stderr.is_empty());
}

#[test]
fn test_missing_bytes_is_usage_error() {
    let out = kcapi_rng(&["-n", "stdrng"]);

    assert_eq!(Some(2), out.status.code());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_unknown_drng_fails() {
    let out = kcapi_rng(&["-b", "16", "-n", "no_such_drng"]);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert_eq!(Some(1), out.status.code());
    assert!(out.stdout.is_empty());
    assert!(stderr.contains("ERROR"), "stderr: {}", stderr);
    assert!(stderr.contains("cannot allocate DRNG no_such_drng"), "stderr: {}", stderr);
}

#[test]
fn test_help_mentions_stdin_seed() {
    let out = kcapi_rng(&["--help"]);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert_eq!(Some(0), out.status.code());
    assert!(stdout.contains("--bytes"));
    assert!(stdout.contains("Data provided at stdin is used to seed the DRNG"));
}

#[test]
fn test_stdrng_output_length() {
    let out = kcapi_rng(&["-b", "300"]);

    // Without AF_ALG support the allocation fails before any output.
    if out.status.code() == Some(1) {
        assert!(out.stdout.is_empty());
        return;
    }
    assert_eq!(Some(0), out.status.code());
    assert_eq!(300, out.stdout.len());
}
