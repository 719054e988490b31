//! Command-line front end. See `USAGE` for the command list.

use crate::actions::fields::{parse_assignment, FieldInputs};
use crate::actions::{ActionDescriptor, ActionRegistry};
use crate::config::{self, Overrides};
use crate::context::Context;
use crate::dispatcher::{CardOutcome, SmartActionDispatcher};
use crate::error::{FormatrError, Result};
use crate::estimate::{self, ImageInfo};
use crate::feedback::Feedback;
use crate::session::{ActionGrid, Card, DroppedFile, Session};
use crate::tools::{self, code_format::CodeKind, code_format::FormatOp};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const USAGE: &str = "\
Usage: formatr [--server URL] [--out DIR] <command>

Commands:
  analyze FILE                         List the smart actions for FILE
  run FILE ACTION [--set k=v]...       Run one smart action
  smart FILE [--set k=v]...            Interactive action grid
  convert ENDPOINT FILE [--set k=v]... POST FILE to any endpoint
  format KIND ACTION FILE              js|css|html  beautify|minify|to-pdf
  estimate IMAGE PERCENT               Resize preview
  pdf-level VALUE                      PDF quality slider (0-100)
  translate FROM TO FILE [--key KEY]   Translate source code
  status                               Server health
  open-output                          Open the server's output folder
  config [set KEY VALUE]               Show or change saved settings";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze { file: PathBuf },
    Run { file: PathBuf, action: String, inputs: FieldInputs },
    Smart { file: PathBuf, inputs: FieldInputs },
    Convert { endpoint: String, file: PathBuf, inputs: FieldInputs },
    Format { kind: CodeKind, op: FormatOp, file: PathBuf },
    Estimate { image: PathBuf, percent: u32 },
    PdfLevel { value: u32 },
    Translate { from: String, to: String, file: PathBuf, key: String },
    Status,
    OpenOutput,
    ConfigShow,
    ConfigSet { key: String, value: String },
    Help,
}

#[derive(Debug, Clone)]
pub struct Cli {
    pub overrides: Overrides,
    pub command: Command,
}

/// Parse arguments (without the program name).
pub fn parse(args: &[String]) -> Result<Cli> {
    let mut overrides = Overrides::default();
    let mut inputs = FieldInputs::new();
    let mut key = String::new();
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| FormatrError::usage(format!("{} requires a value", flag)))
        };
        match arg.as_str() {
            "--server" => overrides.server_url = Some(value_for("--server")?),
            "--out" => overrides.output_dir = Some(PathBuf::from(value_for("--out")?)),
            "--set" => {
                let (k, v) = parse_assignment(&value_for("--set")?)?;
                inputs.insert(k, v);
            }
            "--key" => key = value_for("--key")?,
            "-h" | "--help" => {
                return Ok(Cli {
                    overrides,
                    command: Command::Help,
                })
            }
            flag if flag.starts_with("--") => {
                return Err(FormatrError::usage(format!("unknown flag {}", flag)))
            }
            _ => positional.push(arg.clone()),
        }
    }

    let pos: Vec<&str> = positional.iter().map(String::as_str).collect();
    let command = match pos.as_slice() {
        [] | ["help"] => Command::Help,
        ["analyze", file] => Command::Analyze { file: file.into() },
        ["run", file, action] => Command::Run {
            file: file.into(),
            action: action.to_string(),
            inputs,
        },
        ["smart", file] => Command::Smart {
            file: file.into(),
            inputs,
        },
        ["convert", endpoint, file] => Command::Convert {
            endpoint: endpoint.to_string(),
            file: file.into(),
            inputs,
        },
        ["format", kind, op, file] => Command::Format {
            kind: kind.parse()?,
            op: op.parse()?,
            file: file.into(),
        },
        ["estimate", image, percent] => Command::Estimate {
            image: image.into(),
            percent: parse_percent(percent)?,
        },
        ["pdf-level", value] => Command::PdfLevel {
            value: value
                .parse::<u32>()
                .ok()
                .filter(|v| *v <= 100)
                .ok_or_else(|| FormatrError::usage("pdf-level takes 0-100"))?,
        },
        ["translate", from, to, file] => Command::Translate {
            from: from.to_string(),
            to: to.to_string(),
            file: file.into(),
            key,
        },
        ["status"] => Command::Status,
        ["open-output"] => Command::OpenOutput,
        ["config"] => Command::ConfigShow,
        ["config", "set", k, v] => Command::ConfigSet {
            key: k.to_string(),
            value: v.to_string(),
        },
        other => {
            return Err(FormatrError::usage(format!(
                "unrecognised command '{}'",
                other.join(" ")
            )))
        }
    };

    Ok(Cli { overrides, command })
}

fn parse_percent(raw: &str) -> Result<u32> {
    raw.trim_end_matches('%')
        .parse::<u32>()
        .ok()
        .filter(|p| (1..=100).contains(p))
        .ok_or_else(|| FormatrError::usage("PERCENT must be 1-100"))
}

/// Printable grid: numbered cards, Reset last. Fields and defaults are
/// listed under actions that take inputs.
pub fn format_grid(grid: &ActionGrid, registry: &ActionRegistry) -> String {
    let mut out = String::new();
    for (i, card) in grid.cards().iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", i + 1, card.label()));
        if let Card::Action(action) = card {
            for field in registry.fields_for(&action.id) {
                out.push_str(&format!(
                    "        {}={} ({}: {})\n",
                    field.name,
                    field.default,
                    field.label,
                    field.hint()
                ));
            }
        }
    }
    out
}

pub async fn execute(cli: Cli) -> Result<()> {
    let Cli { overrides, command } = cli;

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::PdfLevel { value } => {
            let (label, level) = estimate::pdf_quality(value);
            println!("{} (level={})", label, level);
            Ok(())
        }
        Command::Estimate { image, percent } => {
            let info = ImageInfo::probe(&image)?;
            let e = estimate::estimate(info, percent);
            println!("{}%", percent);
            println!("{}", estimate::preview_text(Some(&e)));
            Ok(())
        }
        Command::ConfigShow => {
            let cfg = config::resolve(&overrides);
            println!("config file: {}", config::config_path().display());
            println!("server_url:  {}", cfg.server_url);
            println!("output_dir:  {}", cfg.output_dir.display());
            Ok(())
        }
        Command::ConfigSet { key, value } => {
            let path = config::config_path();
            let mut file = config::load_file(&path);
            file.set(&key, &value)?;
            config::save_file(&path, &file)
        }
        command => {
            let cfg = config::resolve(&overrides);
            let ctx = Context::new(&cfg, Arc::new(Feedback::new(true)))?;
            run_online(&ctx, command).await
        }
    }
}

async fn run_online(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Status => {
            let status = tools::check_health(ctx).await;
            println!("{} ({})", status.label(), ctx.client.base_url());
            Ok(())
        }
        Command::OpenOutput => tools::open_output_folder(ctx).await,
        Command::Convert {
            endpoint,
            file,
            inputs,
        } => {
            let file = DroppedFile::load(&file).await?;
            let fields: Vec<(String, String)> = inputs.into_iter().collect();
            tools::convert(ctx, &endpoint, Some(&file), &fields)
                .await
                .map(print_saved)
        }
        Command::Format { kind, op, file } => {
            let file = DroppedFile::load(&file).await?;
            tools::format_code(ctx, kind, op, &file).await.map(print_saved)
        }
        Command::Translate { from, to, file, key } => {
            let code = tokio::fs::read_to_string(&file).await?;
            let result = tools::translate(ctx, &from, &to, &code, &key).await?;
            println!("{}", result);
            Ok(())
        }
        Command::Analyze { file } => {
            let dispatcher = new_dispatcher(ctx);
            let grid = dispatcher.open(DroppedFile::load(&file).await?).await?;
            print!("{}", format_grid(&grid, dispatcher.registry()));
            Ok(())
        }
        Command::Run {
            file,
            action,
            inputs,
        } => {
            let dispatcher = new_dispatcher(ctx);
            let generation = dispatcher
                .session()
                .select_file(DroppedFile::load(&file).await?);
            let descriptor = ActionDescriptor::new(&action, &action);
            dispatcher.render(generation, std::slice::from_ref(&descriptor));
            dispatcher.execute(&descriptor, &inputs).await.map(print_saved)
        }
        Command::Smart { file, inputs } => {
            let dispatcher = new_dispatcher(ctx);
            interactive(&dispatcher, &file, &inputs).await
        }
        Command::Help
        | Command::PdfLevel { .. }
        | Command::Estimate { .. }
        | Command::ConfigShow
        | Command::ConfigSet { .. } => Ok(()),
    }
}

fn new_dispatcher(ctx: &Context) -> SmartActionDispatcher {
    SmartActionDispatcher::new(ctx.clone(), ActionRegistry::builtin(), Arc::new(Session::new()))
}

fn print_saved(path: PathBuf) {
    println!("{}", path.display());
}

/// Interactive smart-action loop.
///
/// Input lines: a card number optionally followed by `key=value` fields,
/// `r` to reset, a path to open after a reset, `q` to quit.
async fn interactive(
    dispatcher: &SmartActionDispatcher,
    first: &Path,
    defaults: &FieldInputs,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    open_and_show(dispatcher, first).await;

    loop {
        let prompt = if dispatcher.session().file().is_some() {
            "choose [number k=v..] / r / q > "
        } else {
            "file path / q > "
        };
        eprint!("{}", prompt);
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "q" {
            return Ok(());
        }

        if dispatcher.session().file().is_none() {
            open_and_show(dispatcher, Path::new(line)).await;
            continue;
        }

        if line == "r" {
            dispatcher.reset();
            println!("-- reset, drop a new file --");
            continue;
        }

        let mut parts = line.split_whitespace();
        let choice = parts.next().and_then(|n| n.parse::<usize>().ok());
        let grid = dispatcher.session().grid();
        let card = choice
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| grid.cards().get(i));
        let Some(card) = card else {
            eprintln!("no such card");
            continue;
        };

        let mut inputs = defaults.clone();
        let mut bad_field = false;
        for part in parts {
            match parse_assignment(part) {
                Ok((k, v)) => {
                    inputs.insert(k, v);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    bad_field = true;
                }
            }
        }
        if bad_field {
            continue;
        }

        match dispatcher.select(card, &inputs).await {
            Ok(CardOutcome::Downloaded(path)) => print_saved(path),
            Ok(CardOutcome::Reset) => println!("-- reset, drop a new file --"),
            Err(e) => log::debug!("[CLI] action failed: {}", e),
        }
    }
}

async fn open_and_show(dispatcher: &SmartActionDispatcher, path: &Path) {
    let file = match DroppedFile::load(path).await {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    println!("{}", file.name);
    // Analysis errors are already reported; the grid still has Reset.
    let grid = match dispatcher.open(file).await {
        Ok(grid) => grid,
        Err(_) => dispatcher.session().grid(),
    };
    print!("{}", format_grid(&grid, dispatcher.registry()));
}
