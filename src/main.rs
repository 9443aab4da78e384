use clap::Parser;
use ft2_converter::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(stats) => {
            // Per-file failures were already reported; reflect them in the
            // exit code so scripted batches can notice
            process::exit(if stats.errors_encountered > 0 { 1 } else { 0 });
        }
        Err(error) => {
            eprintln!("Error: {error}");
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("FlowTracker2 Converter - Discharge Measurement Report Generator");
    println!("===============================================================");
    println!();
    println!("Convert FlowTracker2 hydroacoustic discharge measurements into");
    println!("fixed-width legacy .dis reports for downstream import.");
    println!();
    println!("USAGE:");
    println!("    ft2-converter <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    convert     Convert measurement files to .dis reports (main command)");
    println!("    inspect     Print a summary of a parsed measurement file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Convert a single measurement:");
    println!("    ft2-converter convert creek.ft");
    println!();
    println!("    # Convert a directory of measurements, forcing imperial output:");
    println!("    ft2-converter convert --units imperial --force /data/surveys");
    println!();
    println!("    # Inspect a measurement without converting it:");
    println!("    ft2-converter inspect creek.ft");
    println!();
    println!("For detailed help on any command, use:");
    println!("    ft2-converter <COMMAND> --help");
}
