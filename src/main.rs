use clap::Parser;
use std::process;
use synergy_parser::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {error:#}");
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Synergy Parser - BioTek Plate Reader Export Parser");
    println!("==================================================");
    println!();
    println!("Parse the flat-text export files produced by BioTek Synergy microplate");
    println!("readers into structured plate, channel, and result data.");
    println!();
    println!("USAGE:");
    println!("    synergy_parser <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse       Parse a single export file and print a summary");
    println!("    scan        Scan a directory tree and parse every export file found");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    synergy_parser parse export.txt --details");
    println!("    synergy_parser scan ./exports --extension txt");
    println!();
    println!("For detailed help on a command: synergy_parser help <COMMAND>");
}
