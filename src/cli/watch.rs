//! Interactive toast console.
//!
//! Reads one command per line from stdin, applies it to a live store backed
//! by the tokio scheduler, and prints every committed state.

use crate::core::toast::{
    ToastContent, ToastId, ToastPatch, ToastSettings, ToastState, ToastStore, ToastVariant,
    TokioScheduler,
};
use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  notify <title> [:: <description>]   Raise a toast
  alert <title> [:: <description>]    Raise a destructive toast
  update <id> <field>=<value>...      Change title, description or open
  close <id>                          Report the toast as hidden by the UI
  dismiss [id]                        Mark one toast (or all) as closing
  remove [id]                         Evict one toast (or all) immediately
  state                               Print the current toasts
  help                                Show this help
  quit                                Exit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Notify(ToastContent),
    Update { id: ToastId, patch: ToastPatch },
    Close(ToastId),
    Dismiss(Option<ToastId>),
    Remove(Option<ToastId>),
    State,
    Help,
    Quit,
}

fn parse_content(rest: &str, variant: ToastVariant) -> Result<ToastContent, String> {
    let (title, description) = match rest.split_once("::") {
        Some((title, description)) => (title.trim(), Some(description.trim())),
        None => (rest.trim(), None),
    };
    if title.is_empty() {
        return Err("a toast needs a title".to_string());
    }

    let mut content = ToastContent::new().title(title).variant(variant);
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        content = content.description(description);
    }
    Ok(content)
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn apply_field(patch: &mut ToastPatch, field: &str, value: &str) -> Result<(), String> {
    match field {
        "title" => patch.title = Some(value.to_string()),
        "description" => patch.description = Some(value.to_string()),
        "open" => {
            patch.open =
                Some(parse_bool(value).ok_or_else(|| format!("not a boolean: {value}"))?);
        }
        other => return Err(format!("unknown field: {other}")),
    }
    Ok(())
}

// Words without `=` continue the previous value, so titles may contain spaces.
fn parse_patch(rest: &str) -> Result<ToastPatch, String> {
    let mut fields: Vec<(String, String)> = Vec::new();
    for word in rest.split_whitespace() {
        match word.split_once('=') {
            Some((field, value)) => fields.push((field.to_string(), value.to_string())),
            None => match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(format!("expected <field>=<value>, got: {word}")),
            },
        }
    }

    let mut patch = ToastPatch::new();
    for (field, value) in &fields {
        apply_field(&mut patch, field, value)?;
    }
    if patch.is_empty() {
        return Err("nothing to update".to_string());
    }
    Ok(patch)
}

fn required_id(rest: &str, command: &str) -> Result<ToastId, String> {
    optional_id(rest).ok_or_else(|| format!("usage: {command} <id>"))
}

fn optional_id(rest: &str) -> Option<ToastId> {
    rest.split_whitespace().next().map(ToastId::from)
}

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb.to_lowercase().as_str() {
        "notify" | "n" => ConsoleCommand::Notify(parse_content(rest, ToastVariant::Default)?),
        "alert" => ConsoleCommand::Notify(parse_content(rest, ToastVariant::Destructive)?),
        "update" | "u" => {
            let (id, fields) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            ConsoleCommand::Update {
                id: required_id(id, "update")?,
                patch: parse_patch(fields)?,
            }
        }
        "close" => ConsoleCommand::Close(required_id(rest, "close")?),
        "dismiss" | "d" => ConsoleCommand::Dismiss(optional_id(rest)),
        "remove" | "rm" => ConsoleCommand::Remove(optional_id(rest)),
        "state" | "ls" => ConsoleCommand::State,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Some(command))
}

/// Renders a state snapshot as plain text or as one JSON line.
pub fn render_state(state: &ToastState, json: bool) -> String {
    if json {
        return serde_json::to_string(state)
            .unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"));
    }

    let mut out = format!("[rev {}] {} toast(s)", state.revision, state.len());
    for toast in &state.toasts {
        let status = if toast.open { "open" } else { "closing" };
        let marker = match toast.variant {
            ToastVariant::Default => "",
            ToastVariant::Destructive => " !",
        };
        let _ = write!(
            out,
            "\n  #{}{} {:<7} {}",
            toast.id,
            marker,
            status,
            toast.title.as_deref().unwrap_or("(untitled)")
        );
        if let Some(description) = &toast.description {
            let _ = write!(out, " - {description}");
        }
    }
    out
}

/// Applies `command` to `store`. Returns `false` once the console should exit.
pub fn execute(store: &ToastStore, command: ConsoleCommand, json: bool) -> bool {
    match command {
        ConsoleCommand::Notify(content) => {
            let handle = store.notify(content);
            info!(toast_id = %handle.id(), "toast raised from console");
        }
        ConsoleCommand::Update { id, patch } => store.update(&id, patch),
        ConsoleCommand::Close(id) => match store.current().get(&id) {
            Some(toast) => toast.notify_open_change(false),
            None => eprintln!("⚠️  No toast with id {id}"),
        },
        ConsoleCommand::Dismiss(id) => store.dismiss(id.as_ref()),
        ConsoleCommand::Remove(id) => store.remove(id.as_ref()),
        ConsoleCommand::State => println!("{}", render_state(&store.current(), json)),
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => return false,
    }
    true
}

/// Runs the console until `quit` or end of input.
pub async fn run_watch(settings: ToastSettings, json: bool) -> Result<(), Box<dyn Error>> {
    let scheduler = TokioScheduler::current();
    let store = ToastStore::new(Arc::new(scheduler.clone()), settings);
    let subscription = store.subscribe(move |state| println!("{}", render_state(state, json)));

    if !json {
        eprintln!(
            "🍞 fonda toast console (limit {}, removal after {} ms). Type 'help' for commands.",
            settings.limit.max(1),
            settings.remove_delay.as_millis()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if !execute(&store, command, json) {
                    break;
                }
            }
            Err(message) => eprintln!("⚠️  {message}"),
        }
    }

    debug!(pending = store.pending_removals(), "toast console exiting");
    subscription.unsubscribe();
    store.shutdown();
    scheduler.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::toast::ManualScheduler;
    use std::time::Duration;

    fn parse(line: &str) -> ConsoleCommand {
        parse_command(line)
            .unwrap_or_else(|err| panic!("line={line:?} should parse: {err}"))
            .unwrap_or_else(|| panic!("line={line:?} should yield a command"))
    }

    #[test]
    fn parses_notify_with_description() {
        assert_eq!(
            parse("notify Saved draft :: all changes kept"),
            ConsoleCommand::Notify(
                ToastContent::new()
                    .title("Saved draft")
                    .description("all changes kept")
            )
        );
        assert_eq!(
            parse("alert Offline"),
            ConsoleCommand::Notify(
                ToastContent::new()
                    .title("Offline")
                    .variant(ToastVariant::Destructive)
            )
        );
    }

    #[test]
    fn parses_update_fields_with_spaces() {
        assert_eq!(
            parse("update 4 title=Hello there open=no"),
            ConsoleCommand::Update {
                id: "4".into(),
                patch: ToastPatch::new().title("Hello there").open(false),
            }
        );
    }

    #[test]
    fn parses_optional_ids() {
        assert_eq!(parse("dismiss"), ConsoleCommand::Dismiss(None));
        assert_eq!(parse("dismiss 2"), ConsoleCommand::Dismiss(Some("2".into())));
        assert_eq!(parse("rm"), ConsoleCommand::Remove(None));
        assert_eq!(parse("close 9"), ConsoleCommand::Close("9".into()));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_command("").unwrap().is_none());
        assert!(parse_command("notify").is_err());
        assert!(parse_command("notify :: only description").is_err());
        assert!(parse_command("update 3").is_err());
        assert!(parse_command("update 3 colour=red").is_err());
        assert!(parse_command("update 3 open=maybe").is_err());
        assert!(parse_command("close").is_err());
        assert!(parse_command("launch").is_err());
    }

    #[test]
    fn renders_plain_state() {
        let store = ToastStore::new(
            Arc::new(ManualScheduler::new()),
            ToastSettings::default().with_limit(2),
        );
        store.notify(ToastContent::new().title("A"));
        let b = store.notify(
            ToastContent::new()
                .title("B")
                .description("details")
                .variant(ToastVariant::Destructive),
        );
        b.dismiss();

        assert_eq!(
            render_state(&store.current(), false),
            "[rev 3] 2 toast(s)\n  #2 ! closing B - details\n  #1 open    A"
        );
    }

    #[test]
    fn renders_json_state() {
        let store = ToastStore::new(Arc::new(ManualScheduler::new()), ToastSettings::default());
        store.notify(ToastContent::new().title("A"));

        let value: serde_json::Value =
            serde_json::from_str(&render_state(&store.current(), true)).expect("valid json");
        assert_eq!(value["revision"], 1);
        assert_eq!(value["toasts"][0]["id"], "1");
        assert_eq!(value["toasts"][0]["open"], true);
    }

    #[test]
    fn execute_drives_the_store() {
        let scheduler = ManualScheduler::new();
        let store = ToastStore::new(
            Arc::new(scheduler.clone()),
            ToastSettings::default().with_remove_delay(Duration::from_secs(1)),
        );

        assert!(execute(&store, parse("notify Hi"), false));
        assert!(execute(&store, parse("close 1"), false));
        assert!(!store.current().toasts[0].open);
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(Duration::from_secs(1));
        assert!(store.current().is_empty());
        assert!(!execute(&store, parse("quit"), false));
    }
}
