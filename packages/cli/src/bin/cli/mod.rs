pub mod auth;
pub mod projects;
pub mod stories;
pub mod test_cases;

use anyhow::Result;
use colored::*;
use comfy_table::Table;
use inquire::{Confirm, Select, Text};
use std::io::IsTerminal;
use storyloom_cli::pager::{self, Navigation};
use storyloom_cli::{render, Notice};
use storyloom_core::EntityKind;
use storyloom_query::{CancellationToken, PageLoader, PageView, QueryResult};

/// Token cancelled on the first Ctrl-C, for long-running generation requests
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    token
}

/// Use the value given on the command line, or ask for it
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Text::new(prompt).prompt()?),
    }
}

/// Ask before deleting unless `--yes` was given, showing any cascade warning
pub fn confirm_delete(kind: EntityKind, id: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if let Some(warning) = kind.delete_warning() {
        println!("{}", warning.yellow());
    }
    let confirmed = Confirm::new(&format!("Delete {} '{}'?", kind.label().to_lowercase(), id))
        .with_default(false)
        .prompt()?;
    if !confirmed {
        println!("{}", "Deletion cancelled".yellow());
    }
    Ok(confirmed)
}

pub fn print_details(title: &str, details: &[(&'static str, String)]) {
    println!("{}", title.blue().bold());
    println!();
    for (label, value) in details {
        println!("{:<20} {}", format!("{}:", label).bold(), value);
    }
}

/// A cancelled generation is reported and ends the command normally
pub fn finish_cancellable<T>(result: QueryResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_cancelled() => {
            println!("{}", Notice::from_query_error(&err));
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn print_page<T>(title: &str, view: &PageView<T>, table: &impl Fn(&[T]) -> Table) {
    println!("{}", title.blue().bold());
    println!();
    println!("{}", table(&view.data.data));
    println!("{}", render::page_footer(view).dimmed());
}

/// Show `page`, then let the user step through pages while attached to a terminal.
/// Moving to a page that is not cached yet redraws the last page until it loads.
pub async fn browse<T: Send + Sync + 'static>(
    loader: &PageLoader<T>,
    mut page: u32,
    title: &str,
    table: impl Fn(&[T]) -> Table,
) -> Result<()> {
    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    loop {
        if let Some(placeholder) = pager::preview(loader, page) {
            print_page(title, &placeholder, &table);
            println!("{}", format!("Loading page {}...", page).dimmed());
        }
        let view = loader.load(page).await?;
        print_page(title, &view, &table);

        let moves = pager::navigation(&view);
        if !interactive || moves.is_empty() {
            return Ok(());
        }
        let choice = Select::new("Navigate:", moves).prompt()?;
        match choice.target(page) {
            Some(next) => page = next,
            None => return Ok(()),
        }
        println!();
    }
}
