use clap::{Args, Parser, Subcommand};
use colored::*;
use std::process;
use std::time::Duration;

mod cli;

use cli::account::ProfileCommands;
use cli::directory::{ApprovalCommands, UserCommands};
use cli::resources::{self, EntityCommands, StatusEntityCommands};
use cli::Reported;
use itms_client::{ClientConfig, ClientConfigBuilder, ClientError, ItmsClient};
use itms_controllers::forms::{
    AssetForm, IncidentForm, IssueForm, PartnerForm, ProjectForm, ReleaseForm,
    ServiceRequestForm, SpecificationForm,
};
use itms_core::{
    Asset, Incident, Issue, Partner, Project, Release, ServiceRequest, Specification,
};

#[derive(Parser, Debug)]
#[command(name = "itms")]
#[command(about = "ITMS command line client - projects, SRs, specs, approvals and more")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, PartialEq)]
struct GlobalArgs {
    /// API base URL, e.g. https://itms.example.com/api
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out and forget the stored tokens
    Logout,
    /// Show the signed-in user
    Me,
    /// Create an account
    Register,
    /// Change your password
    ChangePassword,
    /// Ask for a password reset email
    ForgotPassword {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Show or update your profile
    #[command(subcommand)]
    Profile(ProfileCommands),
    /// Show headline counters
    Dashboard,
    /// List companies
    Companies {
        /// List partners offered as project clients instead
        #[arg(long)]
        partners: bool,
    },
    /// Manage projects
    #[command(subcommand)]
    Projects(StatusEntityCommands),
    /// Manage service requests
    #[command(subcommand)]
    Srs(StatusEntityCommands),
    /// Manage specifications
    #[command(subcommand)]
    Specs(StatusEntityCommands),
    /// Manage approvals
    #[command(subcommand)]
    Approvals(ApprovalCommands),
    /// Manage issues
    #[command(subcommand)]
    Issues(EntityCommands),
    /// Manage releases
    #[command(subcommand)]
    Releases(EntityCommands),
    /// Manage incidents
    #[command(subcommand)]
    Incidents(EntityCommands),
    /// Manage partners
    #[command(subcommand)]
    Partners(EntityCommands),
    /// Manage assets
    #[command(subcommand)]
    Assets(EntityCommands),
    /// Manage users
    #[command(subcommand)]
    Users(UserCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    itms_cli::logging::init(cli.global.verbose);

    if let Err(e) = handle_command(&cli.global, cli.command).await {
        if !e.is::<Reported>() {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if e
                .downcast_ref::<ClientError>()
                .is_some_and(ClientError::is_auth_error)
            {
                eprintln!("{}", "Sign in with 'itms login'".dimmed());
            }
        }
        process::exit(1);
    }
}

async fn connect(global: &GlobalArgs) -> anyhow::Result<ItmsClient> {
    let mut builder = ClientConfigBuilder::from_config(ClientConfig::load().await?);
    if let Some(url) = &global.base_url {
        builder = builder.base_url(url);
    }
    if let Some(secs) = global.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let config = builder.build()?;
    tracing::debug!("Using API base URL {}", config.base_url);
    Ok(ItmsClient::connect(config).await?)
}

async fn handle_command(global: &GlobalArgs, command: Commands) -> anyhow::Result<()> {
    let client = connect(global).await?;

    match command {
        Commands::Login { email } => cli::account::login(&client, email).await,
        Commands::Logout => cli::account::logout(&client).await,
        Commands::Me => cli::account::me(&client).await,
        Commands::Register => cli::account::register(&client).await,
        Commands::ChangePassword => cli::account::change_password(&client).await,
        Commands::ForgotPassword { email } => cli::account::forgot_password(&client, email).await,
        Commands::Profile(command) => cli::account::profile(&client, command).await,
        Commands::Dashboard => cli::directory::dashboard(&client).await,
        Commands::Companies { partners } => cli::directory::companies(&client, partners).await,
        Commands::Projects(command) => {
            resources::run_with_status::<Project, _>(&client, command, ProjectForm).await
        }
        Commands::Srs(command) => {
            resources::run_with_status::<ServiceRequest, _>(&client, command, ServiceRequestForm)
                .await
        }
        Commands::Specs(command) => {
            resources::run_with_status::<Specification, _>(&client, command, SpecificationForm)
                .await
        }
        Commands::Approvals(command) => cli::directory::approvals(&client, command).await,
        Commands::Issues(command) => resources::run::<Issue, _>(&client, command, IssueForm).await,
        Commands::Releases(command) => {
            resources::run::<Release, _>(&client, command, ReleaseForm).await
        }
        Commands::Incidents(command) => {
            resources::run::<Incident, _>(&client, command, IncidentForm).await
        }
        Commands::Partners(command) => {
            resources::run::<Partner, _>(&client, command, PartnerForm).await
        }
        Commands::Assets(command) => resources::run::<Asset, _>(&client, command, AssetForm).await,
        Commands::Users(command) => cli::directory::users(&client, command).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use resources::ListArgs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("itms").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_with_filters_and_sort() {
        let cli = parse(&[
            "projects", "list", "--page", "1", "--size", "20", "--sort", "createdAt", "--desc",
            "-f", "status=IN_PROGRESS", "-f", "name=Portal",
        ]);
        assert_eq!(
            cli.command,
            Commands::Projects(StatusEntityCommands::Common(EntityCommands::List(ListArgs {
                page: 1,
                size: 20,
                sort: Some("createdAt".to_string()),
                desc: true,
                filters: vec!["status=IN_PROGRESS".to_string(), "name=Portal".to_string()],
                interactive: false,
            })))
        );
    }

    #[test]
    fn test_list_defaults() {
        let cli = parse(&["issues", "list"]);
        match cli.command {
            Commands::Issues(EntityCommands::List(args)) => {
                assert_eq!(args.page, 0);
                assert_eq!(args.size, 10);
                assert!(args.filters.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_page_size_is_bounded() {
        let err = Cli::try_parse_from(["itms", "assets", "list", "--size", "500"]);
        assert!(err.is_err());
        assert!(Cli::try_parse_from(["itms", "assets", "list", "--desc"]).is_err());
    }

    #[test]
    fn test_status_and_delete() {
        assert_eq!(
            parse(&["srs", "status", "12", "approved"]).command,
            Commands::Srs(StatusEntityCommands::Status {
                id: 12,
                status: "approved".to_string()
            })
        );
        assert_eq!(
            parse(&["partners", "delete", "4", "--yes"]).command,
            Commands::Partners(EntityCommands::Delete { id: 4, yes: true })
        );
        // Only workflow entities have a status command
        assert!(Cli::try_parse_from(["itms", "partners", "status", "4", "x"]).is_err());
    }

    #[test]
    fn test_update_collects_set_pairs() {
        assert_eq!(
            parse(&["assets", "update", "9", "--set", "location=HQ 3F", "--set", "status=DISPOSED"])
                .command,
            Commands::Assets(EntityCommands::Update {
                id: 9,
                fields: vec!["location=HQ 3F".to_string(), "status=DISPOSED".to_string()],
            })
        );
    }

    #[test]
    fn test_global_flags_anywhere() {
        let cli = parse(&[
            "approvals",
            "process",
            "3",
            "approve",
            "-c",
            "ok",
            "--base-url",
            "http://itms.local/api",
            "-v",
        ]);
        assert_eq!(cli.global.base_url.as_deref(), Some("http://itms.local/api"));
        assert!(cli.global.verbose);
        assert_eq!(
            cli.command,
            Commands::Approvals(ApprovalCommands::Process {
                id: 3,
                decision: cli::directory::Decision::Approve,
                comment: Some("ok".to_string()),
            })
        );
    }

    #[test]
    fn test_user_extras() {
        assert_eq!(
            parse(&["users", "toggle-status", "5"]).command,
            Commands::Users(UserCommands::ToggleStatus { id: 5 })
        );
        assert_eq!(
            parse(&["users", "reset-password", "5"]).command,
            Commands::Users(UserCommands::ResetPassword { id: 5 })
        );
    }
}
