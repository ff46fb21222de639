use std::env;

use appx_core::{AppContext, CommandStatus, GlobalOptions};
use clap::{error::ErrorKind, Parser};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod dispatch;
mod output;
mod style;

use cli::{normalize_keyword_args, AppxCli};
use output::OutputOptions;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = normalize_keyword_args(env::args_os());
    let cli = match AppxCli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => exit_on_parse_error(&err),
    };
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
        json: cli.json,
    };
    let ctx = AppContext::from_env(global);
    let mode = dispatch::mode_from_cli(&cli);
    let (info, outcome) = dispatch::dispatch(&ctx, &mode);

    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };
    let code = output::emit_output(&opts, info, &outcome)?;
    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn exit_on_parse_error(err: &clap::Error) -> ! {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => {
            let _ = err.print();
            std::process::exit(CommandStatus::UserError.exit_code());
        }
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = env::var("RUST_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| format!("appx_cli={level},appx_core={level},appx_domain={level}"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
