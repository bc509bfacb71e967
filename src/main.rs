//! Register machine interpreter CLI.
//!
//! Reads a program, runs it from empty registers and prints the largest final
//! register value and the highest value any register held during the run.
//!
//! # Usage
//! ```text
//! regmachine <input.txt | -> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `input.txt`: Program file, one instruction per line (`-` reads stdin)
//!
//! # Options
//! - `-s, --strict`: Fail on the first malformed line instead of skipping it
//! - `-r, --registers`: Also print the final register values
//! - `-v, --verbose`: Log every skipped line
//! - `-q, --quiet`: Only log errors
//! - `--no-color`: Disable colored log output

use regmachine::machine::errors::MachineError;
use regmachine::machine::interpreter;
use regmachine::machine::parser::{ParsePolicy, parse_program, render_diagnostic};
use regmachine::utils::log::{self, Level};
use regmachine::{error, info, warn};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;
use std::sync::atomic::Ordering;

const STDIN_ARG: &str = "-";

struct Options {
    input: String,
    policy: ParsePolicy,
    print_registers: bool,
    log_level: Level,
    color: bool,
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        input: args[1].clone(),
        policy: ParsePolicy::Lenient,
        print_registers: false,
        log_level: Level::Info,
        color: true,
    };

    for arg in &args[2..] {
        match arg.as_str() {
            "--strict" | "-s" => options.policy = ParsePolicy::Strict,
            "--registers" | "-r" => options.print_registers = true,
            "--verbose" | "-v" => options.log_level = Level::Debug,
            "--quiet" | "-q" => options.log_level = Level::Error,
            "--no-color" => options.color = false,
            other => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    options
}

fn read_source(input: &str) -> Result<String, MachineError> {
    if input == STDIN_ARG {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| MachineError::IoError {
                path: "<stdin>".to_string(),
                reason: e.to_string(),
            })?;
        return Ok(source);
    }

    fs::read_to_string(input).map_err(|e| MachineError::IoError {
        path: input.to_string(),
        reason: e.to_string(),
    })
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let options = parse_args(&args);
    log::set_min_level(options.log_level);
    log::USE_COLOR.store(options.color, Ordering::Relaxed);

    let source = read_source(&options.input).unwrap_or_else(|e| {
        error!("{e}");
        process::exit(1);
    });

    let report = match parse_program(&source, options.policy) {
        Ok(report) => report,
        Err(e) => {
            match render_diagnostic(&options.input, &source, &e) {
                Some(diag) => eprintln!("{diag}"),
                None => error!("{e}"),
            }
            process::exit(1);
        }
    };

    if !report.skipped.is_empty() {
        warn!(
            "Skipped {} malformed line(s) (use --strict to reject them)",
            report.skipped.len()
        );
        if log::enabled(Level::Debug) {
            for skipped in &report.skipped {
                if let Some(diag) = render_diagnostic(&options.input, &source, skipped) {
                    eprintln!("{diag}");
                }
            }
        }
    }

    let outcome = interpreter::run(&report.program);
    info!(
        "Executed {} instruction(s), {} applied, {} register(s) written",
        outcome.executed,
        outcome.applied,
        outcome.registers.len()
    );

    if options.print_registers {
        print!("{}", outcome.registers);
    }
    println!("largest final value: {}", outcome.largest_final_value);
    println!("highest running value: {}", outcome.highest_running_value);
}

const USAGE: &str = "\
Register Machine Interpreter

USAGE:
    {program} <input.txt | -> [OPTIONS]

ARGS:
    <input.txt>    Program file, one instruction per line (`-` reads stdin)

OPTIONS:
    -s, --strict       Fail on the first malformed line instead of skipping it
    -r, --registers    Also print the final register values
    -v, --verbose      Log every skipped line
    -q, --quiet        Only log errors
        --no-color     Disable colored log output
    -h, --help         Print this help message

EXAMPLES:
    # Run a program, skipping malformed lines
    {program} input.txt

    # Reject malformed lines
    {program} input.txt --strict

    # Read the program from stdin and show every register
    cat input.txt | {program} - -r
";

fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}
