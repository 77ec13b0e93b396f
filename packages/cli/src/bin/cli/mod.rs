pub mod account;
pub mod directory;
pub mod resources;

use colored::*;
use thiserror::Error;

use itms_cli::output;
use itms_controllers::{FormController, FormSchema, SubmitOutcome, ValidationError};

/// The failure was already shown to the user (banner or inline); exit non-zero quietly
#[derive(Debug, Error)]
#[error("already reported")]
pub struct Reported;

/// Copy `--set` values into a form.
///
/// Rule failures stay on the form and are reported by the submit; only a
/// field the form does not have stops here.
pub fn apply_assignments<S: FormSchema>(
    form: &FormController<S>,
    assignments: Vec<(String, String)>,
) -> anyhow::Result<()> {
    for (name, value) in assignments {
        if let Err(ValidationError::UnknownField(name)) = form.set_value(&name, value) {
            let known: Vec<&str> = form.fields().iter().map(|f| f.name).collect();
            anyhow::bail!("Unknown field: {}. Must be one of: {}", name, known.join(", "));
        }
    }
    Ok(())
}

/// Submit a filled form, reporting failures inline
pub async fn submit_form<S, F, Fut>(
    form: &FormController<S>,
    operation: F,
) -> anyhow::Result<S::Response>
where
    S: FormSchema,
    F: FnOnce(S::Request) -> Fut,
    Fut: std::future::Future<Output = itms_client::ClientResult<S::Response>>,
{
    let spinner = output::spinner("Submitting...");
    let outcome = form.submit(operation).await;
    spinner.finish_and_clear();

    match outcome {
        SubmitOutcome::Succeeded(response) => {
            if let Some(message) = form.state().success {
                output::success(&message);
            }
            Ok(response)
        }
        SubmitOutcome::Invalid(errors) => {
            for message in errors.values() {
                eprintln!("  {} {}", "✗".red(), message.red());
            }
            Err(Reported.into())
        }
        SubmitOutcome::Failed(err) => Err(err.into()),
        SubmitOutcome::Busy => anyhow::bail!("Another submission is still running"),
    }
}
