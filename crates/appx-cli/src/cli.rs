use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub const APPX_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nArguments and options:\n{options}\n";

pub const APPX_BEFORE_HELP: &str = concat!(
    "appx ",
    env!("CARGO_PKG_VERSION"),
    " – toolbox drawer launcher\n\n",
    "\x1b[1;36mModes\x1b[0m\n",
    "  <DIR>...                       Run the tool named by each drawer's TOOLBOX entry.\n",
    "  DRAWER=<DIR>                   Show a toolbox drawer's window instead of its tool.\n",
    "  TOOLBOX=<DIR> TOOL=<NAME>      Turn a drawer into a toolbox drawer for NAME.\n",
    "  ... COPYIMAGE                  Also copy NAME's icon images onto the drawer.\n\n",
    "Keywords are case-insensitive. Put drawers named like a keyword after --.\n",
);

/// Keyword arguments accepted in AmigaDOS template form.
const VALUE_KEYWORDS: [(&str, &str); 3] = [
    ("DRAWER", "--drawer"),
    ("TOOLBOX", "--toolbox"),
    ("TOOL", "--tool"),
];
const SWITCH_KEYWORDS: [(&str, &str); 1] = [("COPYIMAGE", "--copy-image")];

#[derive(Parser, Debug)]
#[command(
    name = "appx",
    version,
    before_help = APPX_BEFORE_HELP,
    help_template = APPX_HELP_TEMPLATE,
    override_usage = "appx [DRAWER=<DIR> | TOOLBOX=<DIR> TOOL=<NAME> [COPYIMAGE] | <DIR>...]"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppxCli {
    #[arg(
        long,
        value_name = "DIR",
        help = "Show this toolbox drawer's window (DRAWER=<DIR>)",
        conflicts_with_all = ["toolbox", "targets"]
    )]
    pub drawer: Option<PathBuf>,
    #[arg(
        long,
        value_name = "DIR",
        help = "Drawer to turn into a toolbox drawer (TOOLBOX=<DIR>)",
        requires = "tool",
        conflicts_with = "targets"
    )]
    pub toolbox: Option<PathBuf>,
    #[arg(
        long,
        value_name = "NAME",
        help = "Tool inside the drawer to launch (TOOL=<NAME>)",
        requires = "toolbox"
    )]
    pub tool: Option<String>,
    #[arg(
        long = "copy-image",
        help = "Copy the tool's icon images onto the drawer (COPYIMAGE)",
        requires = "toolbox"
    )]
    pub copy_image: bool,
    #[arg(value_name = "DIR", help = "Toolbox drawers to launch")]
    pub targets: Vec<PathBuf>,
    #[arg(short, long, help = "Suppress human output (errors still print to stderr)")]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    pub trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON envelopes")]
    pub json: bool,
    #[arg(long, help = "Disable colored human output")]
    pub no_color: bool,
}

/// Rewrites `KEY=value` keywords and the `COPYIMAGE` switch into long flags.
///
/// A bare value keyword such as `Tool` is left alone so it can name a drawer.
///
/// The first item is the program name and is passed through, as is
/// everything after `--`.
pub fn normalize_keyword_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let mut out: Vec<OsString> = iter.next().into_iter().collect();
    while let Some(arg) = iter.next() {
        if arg == "--" {
            out.push(arg);
            out.extend(iter);
            break;
        }
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        match rewrite_keyword(text) {
            Some(rewritten) => out.push(OsString::from(rewritten)),
            None => out.push(arg),
        }
    }
    out
}

fn rewrite_keyword(text: &str) -> Option<String> {
    match text.split_once('=') {
        Some((key, value)) => VALUE_KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(key))
            .map(|(_, flag)| format!("{flag}={value}")),
        None => SWITCH_KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(text))
            .map(|(_, flag)| (*flag).to_string()),
    }
}
