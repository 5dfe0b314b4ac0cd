//! lil compiler CLI.

use std::process::ExitCode;

use lilc::commands::{build_file, run_file};
use lilc::init_tracing;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let mut command = None;
    let mut file_path = None;
    let mut log_level = None;

    for arg in args.iter().skip(1) {
        if let Some(level) = arg.strip_prefix("--log=") {
            let Ok(level) = level.parse::<u8>() else {
                eprintln!("error: `--log` expects a level from 0 to 4, got `{level}`");
                return ExitCode::FAILURE;
            };
            log_level = Some(level);
        } else if arg == "--compile" || arg == "-c" {
            command = Some("build");
        } else if arg == "--help" || arg == "-h" {
            print_usage();
            return ExitCode::SUCCESS;
        } else if command.is_none() && (arg == "run" || arg == "build") {
            command = Some(arg.as_str());
        } else if !arg.starts_with('-') && file_path.is_none() {
            file_path = Some(arg.as_str());
        } else {
            eprintln!("error: unexpected argument `{arg}`");
            return ExitCode::FAILURE;
        }
    }

    let Some(path) = file_path else {
        eprintln!("error: missing file path");
        eprintln!("Usage: lilc [run|build] <file.lil> [--log=N]");
        return ExitCode::FAILURE;
    };

    init_tracing(log_level);

    match command.unwrap_or("run") {
        "build" => build_file(path),
        _ => run_file(path),
    }
}

fn print_usage() {
    println!("lil compiler");
    println!();
    println!("Usage: lilc <command> <file.lil> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>     Compile and execute, printing the result (default)");
    println!("  build <file>   Compile and print the IR module");
    println!();
    println!("Options:");
    println!("  -c, --compile  Same as `build`");
    println!("  --log=<0-4>    Log level: 0=error 1=warn 2=info 3=debug 4=trace");
    println!("                 (RUST_LOG takes precedence)");
    println!();
    println!("Environment:");
    println!("  LIL_DEBUG_IR   Print the IR to stderr before `run` executes");
    println!();
    println!("Examples:");
    println!("  lilc run fib.lil");
    println!("  lilc build fib.lil --log=3");
    println!("  lilc -c fib.lil");
}
