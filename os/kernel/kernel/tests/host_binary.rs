use std::process::Command;

#[test]
fn binary_runs_memory_bring_up_on_the_host() {
    let output = Command::new(env!("CARGO_BIN_EXE_kernel"))
        .output()
        .expect("kernel binary runs");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("[pmm] allocated 2MiB frame 1"));
    assert_eq!(lines.next(), Some("[pmm] allocated 2MiB frame 2"));
    assert_eq!(
        lines.next(),
        Some("BootReport { init: Ok(()), frames: [2097152, 4194304] }")
    );
}
