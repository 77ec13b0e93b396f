// ABOUTME: Generic list/show/create/update/delete commands shared by every entity
// ABOUTME: Lists go through the list controller, creates and updates through form controllers

use clap::{Args, Subcommand};
use colored::*;
use inquire::Select;
use serde::de::DeserializeOwned;

use itms_cli::output::{self, print_details};
use itms_cli::{parse_form_assignments, parse_record, prompt, Tabular};
use itms_client::ItmsClient;
use itms_controllers::{
    Editable, FetchOutcome, FormController, FormSchema, ListController, ListState, SubmitOutcome,
};
use itms_core::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use itms_core::{Resource, Sort, StatusResource};

use super::{apply_assignments, submit_form, Reported};

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ListArgs {
    /// Zero-based page index
    #[arg(short, long, default_value_t = 0)]
    pub page: u32,

    /// Rows per page
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE,
          value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
    pub size: u32,

    /// Sort key, e.g. createdAt
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Filter as key=value, e.g. --filter status=IN_PROGRESS (repeatable)
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Page through results interactively
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum EntityCommands {
    /// List one page
    List(ListArgs),
    /// Show one record
    Show { id: i64 },
    /// Create a record through an interactive form
    Create,
    /// Change fields of a record; absent fields keep their value
    Update {
        id: i64,
        /// Field as key=value, e.g. --set name="Portal v2" (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Delete a record
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Commands of entities with a server-side status workflow
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum StatusEntityCommands {
    #[command(flatten)]
    Common(EntityCommands),
    /// Move a record to another status
    Status { id: i64, status: String },
}

pub async fn run<R, S>(
    client: &ItmsClient,
    command: EntityCommands,
    schema: S,
) -> anyhow::Result<()>
where
    R: Editable + Tabular,
    R::Filter: DeserializeOwned,
    S: FormSchema<Request = R::Create, Response = R>,
{
    match command {
        EntityCommands::List(args) => list::<R>(client, args).await,
        EntityCommands::Show { id } => show::<R>(client, id).await,
        EntityCommands::Create => create::<R, S>(client, schema).await,
        EntityCommands::Update { id, fields } => update::<R>(client, id, &fields).await,
        EntityCommands::Delete { id, yes } => delete::<R>(client, id, yes).await,
    }
}

pub async fn run_with_status<R, S>(
    client: &ItmsClient,
    command: StatusEntityCommands,
    schema: S,
) -> anyhow::Result<()>
where
    R: StatusResource + Editable + Tabular,
    R::Filter: DeserializeOwned,
    S: FormSchema<Request = R::Create, Response = R>,
{
    match command {
        StatusEntityCommands::Common(command) => run::<R, S>(client, command, schema).await,
        StatusEntityCommands::Status { id, status } => transition::<R>(client, id, &status).await,
    }
}

/// Initial list state for the given arguments
pub fn list_state<R>(args: &ListArgs) -> anyhow::Result<ListState<R>>
where
    R: Resource,
    R::Filter: DeserializeOwned,
{
    let filters: R::Filter = parse_record("filter", &args.filters)?;
    let sort = args.sort.as_ref().map(|by| {
        if args.desc {
            Sort::desc(by.clone())
        } else {
            Sort::asc(by.clone())
        }
    });
    Ok(ListState {
        page: args.page,
        size: args.size,
        sort,
        filters,
        ..Default::default()
    })
}

async fn list<R>(client: &ItmsClient, args: ListArgs) -> anyhow::Result<()>
where
    R: Resource + Tabular,
    R::Filter: DeserializeOwned,
{
    let controller: ListController<R> =
        ListController::with_state(client.resource::<R>(), list_state::<R>(&args)?);

    let spinner = output::spinner(format!("Loading {}s...", R::NAME));
    let mut outcome = controller.refresh().await;
    spinner.finish_and_clear();
    output::print_list(&controller.state());

    while args.interactive {
        let state = controller.state();
        let mut choices = Vec::new();
        if state.has_next() {
            choices.push("Next page");
        }
        if state.has_previous() {
            choices.push("Previous page");
        }
        choices.extend(["Refresh", "Quit"]);

        outcome = match Select::new("Navigate:", choices).prompt()? {
            "Next page" => controller.set_page(state.page + 1).await,
            "Previous page" => controller.set_page(state.page.saturating_sub(1)).await,
            "Refresh" => controller.refresh().await,
            _ => break,
        };
        output::print_list(&controller.state());
    }

    match outcome {
        FetchOutcome::Failed(_) => Err(Reported.into()),
        _ => Ok(()),
    }
}

async fn show<R: Resource + Tabular>(client: &ItmsClient, id: i64) -> anyhow::Result<()> {
    let record = client.resource::<R>().get(id).await?;
    print_details(&record.title(), &record.details());
    Ok(())
}

async fn create<R, S>(client: &ItmsClient, schema: S) -> anyhow::Result<()>
where
    R: Resource + Tabular,
    S: FormSchema<Request = R::Create, Response = R>,
{
    println!("{}", format!("New {}", R::NAME).blue().bold());
    println!();

    let form = FormController::new(schema);
    prompt::fill_form(&form)?;

    loop {
        let resource = client.resource::<R>();
        let spinner = output::spinner(format!("Saving {}...", R::NAME));
        let outcome = form
            .submit(move |request| async move { resource.create(&request).await })
            .await;
        spinner.finish_and_clear();

        match outcome {
            SubmitOutcome::Succeeded(record) => {
                let state = form.state();
                output::success(state.success.as_deref().unwrap_or("Saved"));
                println!();
                print_details(&record.title(), &record.details());
                if let Some(navigation) = form.take_navigation() {
                    println!();
                    println!("{}", format!("→ {}", navigation.target).dimmed());
                }
                return Ok(());
            }
            SubmitOutcome::Invalid(_) => prompt::fix_errors(&form)?,
            SubmitOutcome::Failed(err) => {
                eprintln!("{} {}", "✗".red().bold(), err.user_message().red());
                if !prompt::confirm("Edit and submit again?")? {
                    return Err(Reported.into());
                }
                if form.state().field_errors.is_empty() {
                    prompt::fill_form(&form)?;
                } else {
                    prompt::fix_errors(&form)?;
                }
            }
            SubmitOutcome::Busy => continue,
        }
    }
}

/// Load the record into its edit form, apply `--set` values and submit the changes
async fn update<R: Editable + Tabular>(
    client: &ItmsClient,
    id: i64,
    fields: &[String],
) -> anyhow::Result<()> {
    let assignments = parse_form_assignments(fields)?;
    if assignments.is_empty() {
        output::warning("No --set fields given; nothing will change");
    }

    let resource = client.resource::<R>();
    let form = FormController::new(resource.get(id).await?.edit_form());
    apply_assignments(&form, assignments)?;

    let record =
        submit_form(&form, move |request| async move { resource.update(id, &request).await })
            .await?;
    println!();
    print_details(&record.title(), &record.details());
    Ok(())
}

async fn delete<R: Resource>(client: &ItmsClient, id: i64, yes: bool) -> anyhow::Result<()> {
    if !yes && !prompt::confirm(&format!("Delete {} {}? This cannot be undone", R::NAME, id))? {
        println!("{}", "Cancelled".yellow());
        return Ok(());
    }
    client.resource::<R>().remove(id).await?;
    output::success(&format!("Deleted {} {}", R::NAME, id));
    Ok(())
}

/// Parse a status the way users type it (`in progress`, `in-progress`, `IN_PROGRESS`)
pub fn parse_status<R: StatusResource>(raw: &str) -> anyhow::Result<R::Status> {
    let wire = raw.trim().to_uppercase().replace(['-', ' '], "_");
    serde_json::from_value(serde_json::Value::String(wire))
        .map_err(|_| anyhow::anyhow!("Invalid {} status: {}", R::NAME, raw))
}

async fn transition<R>(client: &ItmsClient, id: i64, status: &str) -> anyhow::Result<()>
where
    R: StatusResource + Tabular,
{
    let status = parse_status::<R>(status)?;
    let record = client.resource::<R>().transition_status(id, status).await?;
    output::success(&format!("{} {} is now {}", R::NAME, id, record.status()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itms_core::models::project::ProjectStatus;
    use itms_core::models::sr::SrStatus;
    use itms_core::{Project, ServiceRequest, SortOrder};

    fn args() -> ListArgs {
        ListArgs {
            page: 2,
            size: 20,
            sort: Some("createdAt".to_string()),
            desc: true,
            filters: vec!["status=completed".to_string(), "name=Portal".to_string()],
            interactive: false,
        }
    }

    #[test]
    fn test_list_state_from_args() {
        let state = list_state::<Project>(&args()).unwrap();
        assert_eq!(state.page, 2);
        assert_eq!(state.size, 20);
        assert_eq!(state.sort.as_ref().map(|s| s.order), Some(SortOrder::Desc));
        assert_eq!(state.filters.status, Some(ProjectStatus::Completed));
        assert_eq!(state.filters.name.as_deref(), Some("Portal"));
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let mut bad = args();
        bad.filters = vec!["colour=red".to_string()];
        assert!(list_state::<Project>(&bad).is_err());
    }

    #[test]
    fn test_parse_status_accepts_loose_spelling() {
        assert_eq!(
            parse_status::<Project>("in progress").unwrap(),
            ProjectStatus::InProgress
        );
        assert_eq!(
            parse_status::<ServiceRequest>("approval-pending").unwrap(),
            SrStatus::ApprovalPending
        );
        assert!(parse_status::<Project>("done").is_err());
    }
}
