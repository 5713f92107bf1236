use clap::{Parser, Subcommand};
use colored::*;
use std::process;
use storyloom_cli::{logging, App, Notice};
use storyloom_client::ClientConfig;

mod cli;

use cli::projects::ProjectsCommands;
use cli::stories::StoriesCommands;
use cli::test_cases::TestCasesCommands;

#[derive(Parser)]
#[command(name = "storyloom")]
#[command(about = "Storyloom CLI - requirements documents to user stories and test cases")]
#[command(version)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out and forget the saved token
    Logout,
    /// Create a new account
    Signup {
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the signed-in user
    Whoami,
    /// Send a password reset email
    RecoverPassword {
        email: Option<String>,
    },
    /// Set a new password using the token from the reset email
    ResetPassword {
        token: Option<String>,
    },
    /// Permanently delete the signed-in account
    DeleteAccount {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectsCommands),
    /// Manage user stories
    #[command(subcommand)]
    Stories(StoriesCommands),
    /// Manage test cases
    #[command(subcommand)]
    TestCases(TestCasesCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = run(cli.command).await {
        let notice = Notice::from_error(&e);
        eprintln!("{} {}", "Error:".red().bold(), notice);
        process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    let app = App::from_config(&config)?;

    match command {
        Commands::Login { email } => cli::auth::login(&app, email).await,
        Commands::Logout => cli::auth::logout(&app),
        Commands::Signup { email, name } => cli::auth::signup(&app, email, name).await,
        Commands::Whoami => cli::auth::whoami(&app).await,
        Commands::RecoverPassword { email } => cli::auth::recover_password(&app, email).await,
        Commands::ResetPassword { token } => cli::auth::reset_password(&app, token).await,
        Commands::DeleteAccount { yes } => cli::auth::delete_account(&app, yes).await,
        Commands::Projects(cmd) => cli::projects::handle_projects_command(&app, cmd).await,
        Commands::Stories(cmd) => cli::stories::handle_stories_command(&app, cmd).await,
        Commands::TestCases(cmd) => cli::test_cases::handle_test_cases_command(&app, cmd).await,
    }
}
