//! Line-oriented console for poking at the register overlay.
//!
//! Drives a fake SME target through the same read/write surface a
//! debugger front end would use:
//!
//! ```text
//! > read z0 v0 svcr
//! z0 = {0x01 0x01 ...}
//! > write z0 {0x12 0x12 ...}
//! > list
//! ```

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process;

use log::{error, info};

use regctx_overlay::{FakeSmeTarget, RegisterContext};

mod commands;
mod config;

use config::TargetConfig;

#[derive(Default)]
struct CliArgs {
    config: Option<PathBuf>,
    svl: Option<usize>,
    streaming: Option<bool>,
    fixture: Option<bool>,
    sme2: bool,
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                if let Some(path) = iter.next() {
                    args.config = Some(PathBuf::from(path));
                }
            }
            "--svl" => {
                if let Some(svl_str) = iter.next() {
                    args.svl = svl_str.parse().ok();
                }
            }
            "--streaming" => {
                args.streaming = Some(true);
            }
            "--non-streaming" => {
                args.streaming = Some(false);
            }
            "--no-fixture" => {
                args.fixture = Some(false);
            }
            "--sme2" => {
                args.sme2 = true;
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", arg);
                print_usage();
                process::exit(1);
            }
        }
    }

    args
}

fn print_usage() {
    println!("Register overlay console");
    println!();
    println!("USAGE:");
    println!("    regctx-cli [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>   Target description (TOML)");
    println!("    --svl <BYTES>         Streaming vector length [default: 32]");
    println!("    --streaming           Start in streaming mode");
    println!("    --non-streaming       Start outside streaming mode");
    println!("    --sme2                Give the target SME2 (adds zt0)");
    println!("    --no-fixture          Start with zeroed registers");
    println!("    -h, --help            Print this help message");
    println!();
    println!("COMMANDS:");
    println!("    read <register>...    Print registers as 'name = value'");
    println!("    write <reg> <value>   Store a {{0xNN ...}} literal or hex scalar");
    println!("    list                  All registers with current widths");
    println!("    mode                  Current mode and vector length");
    println!("    quit");
}

fn build_config(args: &CliArgs) -> TargetConfig {
    let mut config = match &args.config {
        Some(path) => match TargetConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => TargetConfig::default(),
    };

    // Command-line flags win over the file.
    if let Some(svl) = args.svl {
        config.svl = svl;
    }
    if let Some(streaming) = args.streaming {
        config.streaming = streaming;
    }
    if let Some(fixture) = args.fixture {
        config.fixture = fixture;
    }
    if args.sme2 {
        config.capabilities.sme = true;
        config.capabilities.sme2 = true;
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        process::exit(1);
    }
    config
}

fn dispatch(ctx: &mut commands::Context, line: &str) -> Result<bool, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(false);
    };

    match command {
        "read" | "r" => {
            let names: Vec<&str> = parts.collect();
            commands::read::run(ctx, &names)?;
        }
        "write" | "w" => {
            let name = parts.next().ok_or("usage: write <register> <value>")?;
            // The value literal may contain spaces; take the raw rest of
            // the line after the register name.
            let rest = line.trim_start()[command.len()..].trim_start();
            let literal = rest[name.len()..].trim();
            if literal.is_empty() {
                return Err("usage: write <register> <value>".to_string());
            }
            commands::write::run(ctx, name, literal)?;
        }
        "list" | "l" => commands::list::run(ctx)?,
        "help" | "h" => print_usage(),
        "mode" => {
            let mode = ctx.mode().map_err(|e| e.to_string())?;
            let svl = ctx.vector_length().map_err(|e| e.to_string())?;
            println!("{} mode, svl {} bytes", mode, svl);
        }
        "quit" | "exit" | "q" => return Ok(true),
        _ => return Err(format!("unknown command '{}', try 'help'", command)),
    }
    Ok(false)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = parse_args();
    let config = build_config(&args);

    let target = FakeSmeTarget::with_capabilities(config.capabilities, config.svl, config.streaming);
    if config.fixture {
        if config.streaming {
            target.load_streaming_fixture();
        } else {
            target.load_simd_fixture();
        }
    }
    let mut ctx = RegisterContext::new(config.thread, target);
    info!(
        "target up: svl {} bytes, streaming={}, sme2={}",
        config.svl, config.streaming, config.capabilities.sme2
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("stdin: {}", e);
                break;
            }
        }

        match dispatch(&mut ctx, line.trim()) {
            Ok(true) => break,
            Ok(false) => {}
            Err(msg) => eprintln!("error: {}", msg),
        }
    }
}
