use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scaleguard"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute scaleguard");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("display scaling"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scaleguard"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute scaleguard");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("scaleguard"));
}

#[test]
fn run_without_program_is_rejected() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scaleguard"));
    cmd.args(["run", "--set", "DEL4097=125"]);

    // Act
    let output = cmd.output().expect("failed to execute scaleguard");

    // Assert
    assert!(!output.status.success());
}

#[test]
fn malformed_override_is_rejected() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scaleguard"));
    cmd.args(["apply", "--set", "DEL4097"]);

    // Act
    let output = cmd.output().expect("failed to execute scaleguard");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DEVICE_ID=SCALING"));
}

#[test]
fn apply_without_devices_reports_nothing_to_apply() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scaleguard"));
    cmd.arg("apply");

    // Act
    let output = cmd.output().expect("failed to execute scaleguard");

    // Assert
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nothing to apply"));
}
