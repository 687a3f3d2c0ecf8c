use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the formats registered by loom-babel's default registry.
// Build scripts cannot link against the crates they build, so the list lives here too.
const AVAILABLE_FORMATS: &[&str] = &["flatmap", "graph", "nested", "treeviz"];
const READABLE_FORMATS: &[&str] = &["flatmap", "graph", "nested"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected if not specified)")
        .value_parser(clap::builder::PossibleValuesParser::new(READABLE_FORMATS))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("loom")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and inspect loom trees")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between loom tree formats")
                .arg(input_arg())
                .arg(from_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_FORMATS,
                        )),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print an outline and summary of a loom tree")
                .arg(input_arg())
                .arg(from_arg()),
        )
        .subcommand(Command::new("formats").about("List the available formats"));

    generate_to(Bash, &mut cmd, "loom", &outdir)?;
    generate_to(Zsh, &mut cmd, "loom", &outdir)?;
    generate_to(Fish, &mut cmd, "loom", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
