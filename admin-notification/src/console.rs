use std::fmt::Write as _;

use crate::bell::{BellView, ClickBus, ClickTarget, NotificationBell};
use crate::services::FetchMode;
use crate::source::NotificationSource;

pub const HELP: &str = "commands: open | close | toggle | click <bell|dropdown|outside> | read <id> | read-all | refresh | list | help | quit";

/// One line typed into the admin console.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open,
    Close,
    Toggle,
    Click(ClickTarget),
    Read(String),
    ReadAll,
    Refresh,
    List,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments for '{verb}'"));
        }

        match (verb.to_lowercase().as_str(), arg) {
            ("open", None) => Ok(Self::Open),
            ("close", None) => Ok(Self::Close),
            ("toggle", None) => Ok(Self::Toggle),
            ("click", Some(target)) => Ok(Self::Click(target.parse()?)),
            ("read", Some(id)) => Ok(Self::Read(id.to_string())),
            ("read-all", None) => Ok(Self::ReadAll),
            ("refresh", None) => Ok(Self::Refresh),
            ("list", None) => Ok(Self::List),
            ("help", None) => Ok(Self::Help),
            ("quit" | "exit", None) => Ok(Self::Quit),
            ("click" | "read", None) => Err(format!("'{verb}' needs an argument")),
            (_, Some(_)) if is_known(verb) => Err(format!("'{verb}' takes no argument")),
            _ => Err(format!("unknown command: {verb}")),
        }
    }
}

fn is_known(verb: &str) -> bool {
    matches!(
        verb.to_lowercase().as_str(),
        "open" | "close" | "toggle" | "read-all" | "refresh" | "list" | "help" | "quit" | "exit"
    )
}

/// Apply a command to the bell and return what to print.
///
/// Nothing here waits on the backend except `refresh`, which the admin asked
/// for explicitly. `Quit` is left to the caller.
pub async fn execute<S: NotificationSource>(
    bell: &NotificationBell<S>,
    clicks: &ClickBus,
    command: Command,
) -> String {
    match command {
        Command::Open => {
            // Background fetch; the next `list` shows its result.
            drop(bell.open_dropdown().await);
            render(&bell.view().await)
        }
        Command::Close => {
            bell.close_dropdown().await;
            render(&bell.view().await)
        }
        Command::Toggle => {
            drop(bell.toggle_dropdown().await);
            render(&bell.view().await)
        }
        Command::Click(target) => {
            clicks.emit(target);
            format!("click on {target:?}")
        }
        Command::Read(id) => {
            drop(bell.mark_read(&id).await);
            render(&bell.view().await)
        }
        Command::ReadAll => {
            drop(bell.mark_all_read().await);
            render(&bell.view().await)
        }
        Command::Refresh => {
            if bell.refresh(FetchMode::PreserveLocal).await {
                render(&bell.view().await)
            } else {
                "refresh skipped (signed out or backend unavailable, see logs)".to_string()
            }
        }
        Command::List => render(&bell.view().await),
        Command::Help | Command::Quit => HELP.to_string(),
    }
}

pub fn render(view: &BellView) -> String {
    let mut out = String::new();
    let badge = if view.badge.is_empty() { "no unread" } else { view.badge.as_str() };
    let _ = write!(out, "bell [{badge}]");
    if !view.dropdown_open {
        out.push_str(" (closed)");
        return out;
    }

    if view.rows.is_empty() {
        out.push_str("\n  no notifications");
    }
    for row in &view.rows {
        let marker = if row.unread { '*' } else { ' ' };
        let _ = write!(
            out,
            "\n {marker} {id} [{icon}] {title}: {message} ({age})",
            id = row.id,
            icon = row.icon,
            title = row.title,
            message = row.message,
            age = row.age,
        );
    }
    out
}
