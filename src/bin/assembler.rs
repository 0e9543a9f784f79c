use std::path::PathBuf;

use clap::{error::ErrorKind, Parser};

use asm206::output::{MsgColor::*, Output};
use asm206::Features;

const USAGE: &str = "Usage: assembler file.asm206 file.bin206";

/// Assemble an ISA-206 `.asm206` source file into a raw `.bin206` binary.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// `.asm206` file to assemble
    input: PathBuf,
    /// Destination to output `.bin206` file
    output: PathBuf,
    /// Comma-separated assembler features, e.g. `strict-labels`
    #[arg(long, default_value = "")]
    features: Features,
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
    status.file_message(Green, "Assembling", &args.input);
    if args.features != Features::default() {
        status.message(Cyan, "Features", &args.features.to_string());
    }

    let image = asm206::assemble_file(&args.input, &args.output, args.features)?;

    status.message(Green, "Finished", &format!("emit {} byte(s)", image.len()));
    status.file_message(Green, "Saved", &args.output);
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
