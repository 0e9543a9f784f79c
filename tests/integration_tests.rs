use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::{contains, diff};
use tempfile::TempDir;

fn assembler() -> Command {
    Command::cargo_bin("assembler").unwrap()
}

fn emulator() -> Command {
    Command::cargo_bin("emulator").unwrap()
}

/// Assemble a fixture from `tests/files` into a scratch directory.
fn assemble_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let out = dir.path().join(format!("{name}.bin206"));
    assembler()
        .arg(format!("tests/files/{name}.asm206"))
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    out
}

fn write_binary(dir: &TempDir, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join("raw.bin206");
    fs::write(&path, bytes).unwrap();
    path
}

fn run(program: &Path) -> assert_cmd::assert::Assert {
    emulator().arg(program).env_remove("ASM206_TRACE").assert()
}

#[test]
fn assembles_countdown() {
    let dir = TempDir::new().unwrap();
    let out = assemble_fixture(&dir, "countdown");
    assert_eq!(
        fs::read(out).unwrap(),
        [0xC3, 0xC5, 0x11, 0x40, 0x86, 0x82, 0x01]
    );
}

#[test]
fn runs_countdown() {
    let dir = TempDir::new().unwrap();
    let out = assemble_fixture(&dir, "countdown");
    run(&out)
        .success()
        .stdout(diff("A = 0\tB = 1\tC = 0\tD = 0\tPC = 7\n"));
}

#[test]
fn runs_overflow() {
    let dir = TempDir::new().unwrap();
    let out = assemble_fixture(&dir, "overflow");
    run(&out)
        .success()
        .stdout(diff("A = 32\tB = 10\tC = 0\tD = 0\tPC = 15\n"));
}

#[test]
fn assembly_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let first = fs::read(assemble_fixture(&dir, "countdown")).unwrap();
    let second = fs::read(assemble_fixture(&dir, "countdown")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_opcode_is_a_soft_halt() {
    let dir = TempDir::new().unwrap();
    let program = write_binary(&dir, &[0b0010_0000]);
    run(&program)
        .success()
        .stdout(diff("A = 0\tB = 0\tC = 0\tD = 0\tPC = 1\n"))
        .stderr(contains("Unknown opcode 20 at PC=0"));
}

#[test]
fn running_off_the_end_halts() {
    let dir = TempDir::new().unwrap();
    // LDI C, 5 / SKIPNZ C / LDI C, 1
    let program = write_binary(&dir, &[0xD9, 0x48, 0xC9]);
    run(&program)
        .success()
        .stdout(diff("A = 0\tB = 0\tC = 5\tD = 0\tPC = 3\n"))
        .stderr("");
}

#[test]
fn trace_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    let out = assemble_fixture(&dir, "countdown");
    emulator()
        .arg(&out)
        .env("ASM206_TRACE", "1")
        .assert()
        .success()
        .stdout(diff("A = 0\tB = 1\tC = 0\tD = 0\tPC = 7\n"))
        .stderr(contains("SUB A, B").and(contains("HALT")));

    emulator()
        .arg(&out)
        .arg("--trace")
        .env_remove("ASM206_TRACE")
        .assert()
        .success()
        .stderr(contains("SKIPNZ A"));

    emulator()
        .arg(&out)
        .env("ASM206_TRACE", "0")
        .assert()
        .success()
        .stderr("");
}

#[test]
fn verbose_messages_stay_off_stdout() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("countdown.bin206");
    assembler()
        .arg("tests/files/countdown.asm206")
        .arg(&out)
        .arg("--verbose")
        .assert()
        .success()
        .stdout("")
        .stderr(contains("Assembling").and(contains("Saved")));
}

#[test]
fn assembler_usage() {
    assembler()
        .assert()
        .code(1)
        .stdout(contains("Usage: assembler file.asm206 file.bin206"));
    assembler()
        .arg("tests/files/countdown.asm206")
        .assert()
        .code(1)
        .stdout(contains("Usage"));
}

#[test]
fn emulator_usage() {
    emulator()
        .assert()
        .code(1)
        .stdout(contains("Usage: emulator program.bin206"));
}

#[test]
fn missing_input() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("never.bin206");
    assembler()
        .arg("tests/files/does_not_exist.asm206")
        .arg(&out)
        .assert()
        .code(1)
        .stderr(contains("cannot open"));
    assert!(!out.exists());
}

#[test]
fn unwritable_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("no").join("such").join("dir.bin206");
    assembler()
        .arg("tests/files/countdown.asm206")
        .arg(&out)
        .assert()
        .code(1)
        .stderr(contains("cannot write"));
}

#[test]
fn semantic_errors_are_fatal() {
    let cases = [
        ("unknown_label", "unknown label"),
        ("bad_register", "unknown register"),
        ("bad_opcode", "unknown opcode"),
    ];
    for (name, message) in cases {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.bin206");
        assembler()
            .arg(format!("tests/files/{name}.asm206"))
            .arg(&out)
            .assert()
            .code(1)
            .stdout("")
            .stderr(contains(message));
        assert!(!out.exists(), "{name} left a partial binary behind");
    }
}

#[test]
fn range_errors() {
    let dir = TempDir::new().unwrap();
    let cases = [
        ("LDI A, 15\n", true),
        ("LDI A, 16\n", false),
        ("JMP 63\n", true),
        ("JMP 64\n", false),
    ];
    for (src, ok) in cases {
        let input = dir.path().join("range.asm206");
        let out = dir.path().join("range.bin206");
        let _ = fs::remove_file(&out);
        fs::write(&input, src).unwrap();
        let assert = assembler().arg(&input).arg(&out).assert();
        if ok {
            assert.success();
        } else {
            assert.code(1).stderr(contains("out of range"));
        }
    }
    assert_eq!(fs::read(dir.path().join("range.bin206")).ok(), None);
}

#[test]
fn duplicate_labels() {
    let dir = TempDir::new().unwrap();
    let out = assemble_fixture(&dir, "duplicate");
    run(&out)
        .success()
        .stdout(diff("A = 0\tB = 0\tC = 7\tD = 9\tPC = 4\n"));

    assembler()
        .arg("tests/files/duplicate.asm206")
        .arg(dir.path().join("strict.bin206"))
        .arg("--features")
        .arg("strict-labels")
        .assert()
        .code(1)
        .stderr(contains("duplicate label"));
}

#[test]
fn rejects_unknown_feature() {
    let dir = TempDir::new().unwrap();
    assembler()
        .arg("tests/files/countdown.asm206")
        .arg(dir.path().join("out.bin206"))
        .arg("--features")
        .arg("turbo")
        .assert()
        .code(1)
        .stderr(contains("Unknown feature 'turbo'"));
}

#[test]
fn comment_only_program_runs() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("blank.asm206");
    let out = dir.path().join("blank.bin206");
    fs::write(&src, "; nothing here\n\n// still nothing\n").unwrap();
    assembler().arg(&src).arg(&out).assert().success().stdout("");
    assert_eq!(fs::read(&out).unwrap(), []);

    run(&out)
        .success()
        .stdout(diff("A = 0\tB = 0\tC = 0\tD = 0\tPC = 0\n"))
        .stderr("");
}

#[test]
fn missing_binary() {
    emulator()
        .arg("tests/files/nothing.bin206")
        .assert()
        .code(1)
        .stderr(contains("could not open file"));
}
