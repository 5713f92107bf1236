use anyhow::Result;
use clap::Subcommand;
use colored::*;
use storyloom_cli::{render, App};
use storyloom_core::EntityKind;

use super::{browse, cancel_on_ctrl_c, confirm_delete, finish_cancellable, print_details};

#[derive(Subcommand)]
pub enum StoriesCommands {
    /// List the user stories of a project
    List {
        /// Project ID
        project: String,
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show user story details
    Show {
        /// User story ID to show
        id: String,
    },
    /// Generate user stories from a project's document
    Generate {
        /// Project ID
        project: String,
    },
    /// Delete a user story together with its test cases
    Delete {
        /// User story ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_stories_command(app: &App, cmd: StoriesCommands) -> Result<()> {
    app.require_user().await?;
    match cmd {
        StoriesCommands::List { project, page } => list_stories(app, &project, page).await,
        StoriesCommands::Show { id } => show_story(app, &id).await,
        StoriesCommands::Generate { project } => generate_stories(app, &project).await,
        StoriesCommands::Delete { id, yes } => delete_story(app, &id, yes).await,
    }
}

async fn list_stories(app: &App, project_id: &str, page: u32) -> Result<()> {
    let loader = app.queries.user_story_pages(&app.client, project_id);
    if page == 1 && loader.load(1).await?.data.is_empty() {
        println!("{}", "No user stories found".yellow());
        println!(
            "{}",
            format!("Use 'storyloom stories generate {}' to generate them", project_id).dimmed()
        );
        return Ok(());
    }

    let title = format!("User Stories - {}", project_id);
    browse(&loader, page, &title, render::user_stories_table).await
}

async fn show_story(app: &App, id: &str) -> Result<()> {
    let story = app.client.fetch(&app.queries.user_story(id)).await?;
    print_details("User Story Details", &render::user_story_details(&story));
    Ok(())
}

async fn generate_stories(app: &App, project_id: &str) -> Result<()> {
    println!("{}", "Generating user stories, press Ctrl-C to cancel...".dimmed());
    let cancel = cancel_on_ctrl_c();
    let Some(stories) = finish_cancellable(
        app.mutations
            .generate_user_stories(project_id, Some(&cancel))
            .await,
    )?
    else {
        return Ok(());
    };

    println!("{} Generated {} user stories", "✓".green(), stories.len());
    if !stories.is_empty() {
        println!("{}", render::user_stories_table(&stories.data));
    }
    Ok(())
}

async fn delete_story(app: &App, id: &str, yes: bool) -> Result<()> {
    if !confirm_delete(EntityKind::UserStory, id, yes)? {
        return Ok(());
    }
    app.mutations.delete(EntityKind::UserStory, id).await?;
    println!("{} User story {} deleted", "✓".green(), id.cyan());
    Ok(())
}
