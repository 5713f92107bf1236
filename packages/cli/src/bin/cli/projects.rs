use anyhow::Result;
use clap::Subcommand;
use colored::*;
use storyloom_cli::{render, App};
use storyloom_core::{DocumentUpload, EntityKind, ProjectCreate};

use super::{browse, cancel_on_ctrl_c, confirm_delete, finish_cancellable, print_details};

#[derive(Subcommand)]
pub enum ProjectsCommands {
    /// List your projects
    List {
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show project details
    Show {
        /// Project ID to show
        id: String,
    },
    /// Upload a requirements document and generate its user stories
    Upload {
        /// Document to upload (pdf, png, jpg or jpeg)
        file: String,
    },
    /// Delete a project together with its user stories and test cases
    Delete {
        /// Project ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_projects_command(app: &App, cmd: ProjectsCommands) -> Result<()> {
    app.require_user().await?;
    match cmd {
        ProjectsCommands::List { page } => list_projects(app, page).await,
        ProjectsCommands::Show { id } => show_project(app, &id).await,
        ProjectsCommands::Upload { file } => upload_project(app, &file).await,
        ProjectsCommands::Delete { id, yes } => delete_project(app, &id, yes).await,
    }
}

async fn list_projects(app: &App, page: u32) -> Result<()> {
    let loader = app.queries.project_pages(&app.client);
    if page == 1 && loader.load(1).await?.data.is_empty() {
        println!("{}", "No projects found".yellow());
        println!(
            "{}",
            "Use 'storyloom projects upload <file>' to create your first project".dimmed()
        );
        return Ok(());
    }

    browse(&loader, page, "Projects", render::projects_table).await
}

async fn show_project(app: &App, id: &str) -> Result<()> {
    let project = app.client.fetch(&app.queries.project(id)).await?;
    print_details("Project Details", &render::project_details(&project));
    Ok(())
}

async fn upload_project(app: &App, file: &str) -> Result<()> {
    let document = DocumentUpload::from_path(file).await?;
    println!(
        "{} {} ({} bytes)",
        "Uploading".blue().bold(),
        document.file_name,
        document.len()
    );
    println!("{}", "Generating user stories, press Ctrl-C to cancel...".dimmed());

    let cancel = cancel_on_ctrl_c();
    let input = ProjectCreate {
        brd_document: Some(document),
    };
    let Some(upload) = finish_cancellable(app.mutations.upload_project(input, Some(&cancel)).await)?
    else {
        return Ok(());
    };

    println!(
        "{} Created project {} with {} user stories",
        "✓".green(),
        upload.project.id.cyan(),
        upload.user_stories.len()
    );
    if !upload.user_stories.is_empty() {
        println!("{}", render::user_stories_table(&upload.user_stories.data));
    }
    Ok(())
}

async fn delete_project(app: &App, id: &str, yes: bool) -> Result<()> {
    if !confirm_delete(EntityKind::Project, id, yes)? {
        return Ok(());
    }
    app.mutations.delete(EntityKind::Project, id).await?;
    println!("{} Project {} deleted", "✓".green(), id.cyan());
    Ok(())
}
