//! Stdin command parsing for headless mode
//!
//! One command per line. Arguments are whitespace separated; single or
//! double quotes group an argument containing spaces, and a backslash inside
//! double quotes escapes the next character.

use std::path::{Path, PathBuf};

use tradfile_app::Page;
use tradfile_core::prelude::*;
use tradfile_core::{DragDropEvent, DragDropKind, Language, Point, ZoneBounds};

/// Credential field sub-commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    Edit,
    Cancel,
    Save,
    Type(String),
}

/// A parsed stdin command
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessCommand {
    /// Publish drop-zone bounds (`None` = zone not rendered)
    Zone(Option<ZoneBounds>),
    /// Deliver a drag-drop event from the shell
    Drag(DragDropEvent),
    Pick,
    Dismiss(PathBuf),
    Translate,
    Release,
    Page(Page),
    Key(KeyCommand),
    Lang(Language),
    Status,
    Quit,
}

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
///
/// Relative paths are resolved against `cwd`.
pub fn parse_command(line: &str, cwd: &Path) -> Result<Option<HeadlessCommand>> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };
    if name.starts_with('#') {
        return Ok(None);
    }

    let command = match name.as_str() {
        "zone" => HeadlessCommand::Zone(parse_zone(args)?),
        "drag" => HeadlessCommand::Drag(parse_drag(args, cwd)?),
        "pick" => no_args(name, args, HeadlessCommand::Pick)?,
        "dismiss" => match args {
            [path] => HeadlessCommand::Dismiss(resolve_path(path, cwd)),
            _ => return Err(Error::command("usage: dismiss <path>")),
        },
        "translate" => no_args(name, args, HeadlessCommand::Translate)?,
        "release" => no_args(name, args, HeadlessCommand::Release)?,
        "settings" => no_args(name, args, HeadlessCommand::Page(Page::Settings))?,
        "main" => no_args(name, args, HeadlessCommand::Page(Page::Main))?,
        "key" => HeadlessCommand::Key(parse_key(args)?),
        "lang" => {
            let requested = args.join(" ");
            let language = Language::from_name(&requested)
                .ok_or_else(|| Error::command(format!("unsupported language: {}", requested)))?;
            HeadlessCommand::Lang(language)
        }
        "status" => no_args(name, args, HeadlessCommand::Status)?,
        "quit" | "q" => HeadlessCommand::Quit,
        other => return Err(Error::command(format!("unknown command: {}", other))),
    };

    Ok(Some(command))
}

fn no_args(name: &str, args: &[String], command: HeadlessCommand) -> Result<HeadlessCommand> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(Error::command(format!("{} takes no arguments", name)))
    }
}

fn parse_number(token: &str) -> Result<f64> {
    let value: f64 = token
        .parse()
        .map_err(|_| Error::command(format!("not a number: {}", token)))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::command(format!("not a finite number: {}", token)))
    }
}

fn parse_zone(args: &[String]) -> Result<Option<ZoneBounds>> {
    match args {
        [none] if none == "none" => Ok(None),
        [left, top, right, bottom] => Ok(Some(ZoneBounds::new(
            parse_number(left)?,
            parse_number(top)?,
            parse_number(right)?,
            parse_number(bottom)?,
        ))),
        _ => Err(Error::command(
            "usage: zone <left> <top> <right> <bottom> | zone none",
        )),
    }
}

fn parse_drag(args: &[String], cwd: &Path) -> Result<DragDropEvent> {
    let [kind, x, y, paths @ ..] = args else {
        return Err(Error::command("usage: drag <kind> <x> <y> [path...]"));
    };
    let kind = DragDropKind::parse(kind)
        .ok_or_else(|| Error::command(format!("unknown drag kind: {}", kind)))?;

    Ok(DragDropEvent {
        kind,
        position: Point::new(parse_number(x)?, parse_number(y)?),
        paths: paths.iter().map(|p| resolve_path(p, cwd)).collect(),
    })
}

fn parse_key(args: &[String]) -> Result<KeyCommand> {
    match args {
        [sub] if sub == "edit" => Ok(KeyCommand::Edit),
        [sub] if sub == "cancel" => Ok(KeyCommand::Cancel),
        [sub] if sub == "save" => Ok(KeyCommand::Save),
        [sub, value @ ..] if sub == "type" => Ok(KeyCommand::Type(value.join(" "))),
        _ => Err(Error::command(
            "usage: key edit | key cancel | key save | key type <value>",
        )),
    }
}

/// Make `raw` absolute against `cwd` without touching the filesystem.
pub fn resolve_path(raw: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    dunce::simplified(&absolute).to_path_buf()
}

/// Split a line into arguments, honouring quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('"'), '\\') => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(Error::command("dangling escape")),
            },
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Error::command("unterminated quote"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
