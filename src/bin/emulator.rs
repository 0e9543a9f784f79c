use std::path::PathBuf;

use clap::{builder::FalseyValueParser, error::ErrorKind, Parser};

use asm206::output::{MsgColor::*, Output};
use asm206::{Image, RunState};

const USAGE: &str = "Usage: emulator program.bin206";

/// Run an ISA-206 `.bin206` binary and print the final register values.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// `.bin206` file to run
    program: PathBuf,
    /// Print every executed instruction to stderr
    #[arg(long, env = "ASM206_TRACE", value_parser = FalseyValueParser::new())]
    trace: bool,
    /// Print progress messages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> miette::Result<()> {
    let args = parse_args();
    Output::set_verbose(args.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(asm206::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    let status = Output::Status;
    status.file_message(Green, "Loading", &args.program);
    let image = Image::load(&args.program)?;

    let mut state = RunState::from_image(image);
    state.set_trace(args.trace);

    status.message(Green, "Running", &format!("{} byte(s)", state.memory().len()));
    let reason = state.run();
    // Unknown opcodes are reported on stderr, exit status stays 0
    status.print_halt(reason);
    Output::Normal.print_registers(&state);
    Ok(())
}

/// Missing operands print the usage line to stdout and exit with status 1.
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            ErrorKind::MissingRequiredArgument => {
                println!("{USAGE}");
                std::process::exit(1)
            }
            _ => {
                let _ = err.print();
                std::process::exit(1)
            }
        },
    }
}
