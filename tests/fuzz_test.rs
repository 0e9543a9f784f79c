use asm206::{assemble, Features, HaltReason, Op, Register, RunState, Source};
use proptest::prelude::*;

// Property-based tests to ensure robustness against malformed input

fn assemble_str(src: &str) -> Result<asm206::Image, asm206::AsmError> {
    assemble(&Source::new("fuzz", src), Features::default())
}

fn arb_register() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")]
}

/// Generate arbitrary assembly-like lines
fn arb_asm_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (arb_register(), any::<i8>()).prop_map(|(r, n)| format!("LDI {r}, {n}")),
        (arb_register(), arb_register()).prop_map(|(a, b)| format!("ADD {a}, {b}")),
        (arb_register(), arb_register()).prop_map(|(a, b)| format!("sub {a} {b}")),
        arb_register().prop_map(|r| format!("SKIPNZ {r}")),
        (0u8..80).prop_map(|n| format!("JMP {n}")),
        "[A-Z_][A-Z0-9_]{0,8}".prop_map(|s| format!("JMP {s}")),
        "[A-Z_][A-Z0-9_]{0,8}".prop_map(|s| format!("{s}:")),
        Just("HALT".to_string()),
        // Comments
        "(;|//)[^\n]*",
        // Empty lines and whitespace
        "[ \t,]*",
        // Garbage (printable ASCII)
        "[\\x20-\\x7E]+",
    ]
}

fn arb_asm_program() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_asm_line(), 0..64).prop_map(|lines| lines.join("\n"))
}

/// Programs made only of straight-line arithmetic, so they always terminate.
fn arb_straight_line() -> impl Strategy<Value = Vec<Op>> {
    let reg = prop_oneof![
        Just(Register::A),
        Just(Register::B),
        Just(Register::C),
        Just(Register::D)
    ];
    let op = prop_oneof![
        (reg.clone(), 0u8..=15).prop_map(|(r, n)| Op::Ldi(r, n)),
        (reg.clone(), reg.clone()).prop_map(|(a, b)| Op::Add(a, b)),
        (reg.clone(), reg).prop_map(|(a, b)| Op::Sub(a, b)),
    ];
    prop::collection::vec(op, 1..40)
}

proptest! {
    /// The assembler might return an error, but it should never panic
    #[test]
    fn no_panic_on_arbitrary_input(input in arb_asm_program()) {
        let _ = assemble_str(&input);
    }

    /// Output is fully determined by the input
    #[test]
    fn deterministic(input in arb_asm_program()) {
        let first = assemble_str(&input).ok();
        let second = assemble_str(&input).ok();
        prop_assert_eq!(first, second);
    }

    /// One byte per instruction line, none for labels, comments or blanks
    #[test]
    fn one_byte_per_instruction(ops in arb_straight_line()) {
        let src: String = ops.iter().map(|op| format!("; next\n{op}\n\n")).collect();
        let image = assemble_str(&src).unwrap();
        prop_assert_eq!(image.len(), ops.len());
        let expected: Vec<u8> = ops.iter().map(|op| op.encode()).collect();
        prop_assert_eq!(image.bytes(), expected.as_slice());
    }

    /// A label reference encodes exactly like the numeric address it resolves to
    #[test]
    fn label_equals_address(before in 0usize..60, after in 0usize..3) {
        let pad = "HALT\n".repeat(before);
        let tail = "HALT\n".repeat(after);
        let by_label = assemble_str(&format!("{pad}TARGET:\n{tail}JMP TARGET\n")).unwrap();
        let by_addr = assemble_str(&format!("{pad}TARGET:\n{tail}JMP {before}\n")).unwrap();
        prop_assert_eq!(by_label, by_addr);
    }

    #[test]
    fn ldi_in_range(imm in 0i64..=15) {
        let image = assemble_str(&format!("LDI B, {imm}")).unwrap();
        prop_assert_eq!(Op::decode(image.bytes()[0]), Op::Ldi(Register::B, imm as u8));
    }

    #[test]
    fn ldi_out_of_range(imm in prop_oneof![-1000i64..0, 16i64..1000]) {
        let err = assemble_str(&format!("LDI B, {imm}")).unwrap_err();
        prop_assert_eq!(err.kind(), asm206::ErrorKind::Range);
    }

    #[test]
    fn jmp_out_of_range(addr in 64u32..10_000) {
        let err = assemble_str(&format!("JMP {addr}")).unwrap_err();
        prop_assert_eq!(err.kind(), asm206::ErrorKind::Range);
    }

    /// Straight-line programs compute the same values as wrapping i8 arithmetic
    #[test]
    fn arithmetic_matches_model(ops in arb_straight_line()) {
        let mut model = [0i8; 4];
        for op in &ops {
            match *op {
                Op::Ldi(r, n) => model[r.index()] = n as i8,
                Op::Add(a, b) => model[a.index()] = model[a.index()].wrapping_add(model[b.index()]),
                Op::Sub(a, b) => model[a.index()] = model[a.index()].wrapping_sub(model[b.index()]),
                _ => unreachable!(),
            }
        }
        let src: String = ops.iter().map(|op| format!("{op}\n")).collect::<String>() + "HALT\n";
        let mut state = RunState::from_image(assemble_str(&src).unwrap());
        prop_assert_eq!(state.run(), HaltReason::Halt);
        prop_assert_eq!(state.registers(), model);
        prop_assert_eq!(state.pc(), ops.len() + 1);
    }

    /// Any byte string runs to a halt without panicking, given no backward jumps
    #[test]
    fn emulator_never_panics(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        // Jumps only forward, so every run terminates
        let bytes: Vec<u8> = bytes
            .iter()
            .enumerate()
            .map(|(i, &b)| match Op::decode(b) {
                Op::Jmp(addr) if (addr as usize) <= i => Op::Halt.encode(),
                _ => b,
            })
            .collect();
        let mut state = RunState::from_raw(bytes);
        state.run();
        prop_assert!(state.is_halted());
    }
}
