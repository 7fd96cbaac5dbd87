use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    Command::new("bpmn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert loose BPMN XML into Camunda-ready BPMN")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a bpmn.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert BPMN files to the Camunda dialect (default command)")
                .arg(
                    Arg::new("paths")
                        .help("Files or directories to convert")
                        .required(true)
                        .num_args(1..)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("suffix")
                        .long("suffix")
                        .value_name("SUFFIX")
                        .help("Suffix appended to the input name (defaults to _camunda)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the extracted model and reconciled layout as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the BPMN file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "bpmn", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "bpmn", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "bpmn", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
