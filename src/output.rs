use std::cell::RefCell;
use std::fmt::Display;
use std::path::Path;

use colored::{ColoredString, Colorize};

use crate::ops::Op;
use crate::runtime::{HaltReason, RunState};

/// Where a piece of tool output goes.
///
/// Only [`Output::Normal`] writes to stdout, so the emulator's register dump is the sole
/// thing a script reading stdout ever sees.
#[derive(Clone, Copy, Debug)]
pub enum Output {
    /// Program results on stdout
    Normal,
    /// Colored progress messages on stderr, shown with `--verbose`
    Status,
    /// Per-instruction trace on stderr
    Trace,
}

#[derive(Clone, Copy, Debug)]
pub enum MsgColor {
    Green,
    Cyan,
}

impl Output {
    thread_local! {
        static IS_VERBOSE: RefCell<bool> = const { RefCell::new(false) };
    }

    pub fn set_verbose(new_value: bool) -> bool {
        Self::IS_VERBOSE.with(|value| value.replace(new_value))
    }

    pub fn is_verbose() -> bool {
        Self::IS_VERBOSE.with(|value| *value.borrow())
    }

    fn print_line(&self, line: impl Display) {
        match self {
            Self::Normal => println!("{line}"),
            Self::Status => {
                if Self::is_verbose() {
                    eprintln!("{line}");
                }
            }
            Self::Trace => eprintln!("{line}"),
        }
    }

    /// Right-aligned status word followed by a description.
    pub fn message(&self, color: MsgColor, left: &str, right: &str) {
        let left: ColoredString = match color {
            MsgColor::Green => left.green(),
            MsgColor::Cyan => left.cyan(),
        };
        self.print_line(format_args!("{left:>12} {right}"));
    }

    pub fn file_message(&self, color: MsgColor, left: &str, path: &Path) {
        let right = format!("target {}", path.display());
        self.message(color, left, &right);
    }

    pub fn print_registers(&self, state: &RunState) {
        self.print_line(state);
    }

    pub fn print_step(&self, addr: usize, byte: u8, op: Op, state: &RunState) {
        let [a, b, c, d] = state.registers();
        // `Op` ignores width flags, pad the rendered text instead
        let op = op.to_string();
        self.print_line(format_args!(
            "{addr:>4}: {byte:02X}  {op:<12} A={a:<4} B={b:<4} C={c:<4} D={d:<4}"
        ));
    }

    /// Describe how execution ended. Abnormal halts are always reported, on stderr.
    pub fn print_halt(&self, reason: HaltReason) {
        match reason {
            HaltReason::Halt => self.message(MsgColor::Cyan, "Halted", "HALT instruction"),
            HaltReason::EndOfMemory => {
                self.message(MsgColor::Cyan, "Halted", "end of program reached")
            }
            HaltReason::InvalidOpcode { byte, addr } => {
                eprintln!("{}", unknown_opcode(byte, addr));
            }
        }
    }
}

/// Diagnostic for an abnormal halt.
pub fn unknown_opcode(byte: u8, addr: usize) -> String {
    format!("Unknown opcode {byte:02X} at PC={addr}")
}
