use anyhow::Result;
use clap::Subcommand;
use colored::*;
use storyloom_cli::{render, App};
use storyloom_core::EntityKind;

use super::{browse, cancel_on_ctrl_c, confirm_delete, finish_cancellable, print_details};

#[derive(Subcommand)]
pub enum TestCasesCommands {
    /// List the test cases of a user story
    List {
        /// User story ID
        story: String,
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show test case details
    Show {
        /// Test case ID to show
        id: String,
    },
    /// Generate test cases for a user story
    Generate {
        /// User story ID
        story: String,
    },
    /// Delete a test case
    Delete {
        /// Test case ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_test_cases_command(app: &App, cmd: TestCasesCommands) -> Result<()> {
    app.require_user().await?;
    match cmd {
        TestCasesCommands::List { story, page } => list_test_cases(app, &story, page).await,
        TestCasesCommands::Show { id } => show_test_case(app, &id).await,
        TestCasesCommands::Generate { story } => generate_test_cases(app, &story).await,
        TestCasesCommands::Delete { id, yes } => delete_test_case(app, &id, yes).await,
    }
}

async fn list_test_cases(app: &App, story_id: &str, page: u32) -> Result<()> {
    let loader = app.queries.test_case_pages(&app.client, story_id);
    if page == 1 && loader.load(1).await?.data.is_empty() {
        println!("{}", "No test cases found".yellow());
        println!(
            "{}",
            format!("Use 'storyloom test-cases generate {}' to generate them", story_id).dimmed()
        );
        return Ok(());
    }

    let title = format!("Test Cases - {}", story_id);
    browse(&loader, page, &title, render::test_cases_table).await
}

async fn show_test_case(app: &App, id: &str) -> Result<()> {
    let case = app.client.fetch(&app.queries.test_case(id)).await?;
    print_details("Test Case Details", &render::test_case_details(&case));
    Ok(())
}

async fn generate_test_cases(app: &App, story_id: &str) -> Result<()> {
    println!("{}", "Generating test cases, press Ctrl-C to cancel...".dimmed());
    let cancel = cancel_on_ctrl_c();
    let Some(cases) = finish_cancellable(
        app.mutations
            .generate_test_cases(story_id, Some(&cancel))
            .await,
    )?
    else {
        return Ok(());
    };

    println!("{} Generated {} test cases", "✓".green(), cases.len());
    if !cases.is_empty() {
        println!("{}", render::test_cases_table(&cases.data));
    }
    Ok(())
}

async fn delete_test_case(app: &App, id: &str, yes: bool) -> Result<()> {
    if !confirm_delete(EntityKind::TestCase, id, yes)? {
        return Ok(());
    }
    app.mutations.delete(EntityKind::TestCase, id).await?;
    println!("{} Test case {} deleted", "✓".green(), id.cyan());
    Ok(())
}
