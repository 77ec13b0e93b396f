// ABOUTME: Interactive prompts that fill a form controller field by field
// ABOUTME: A rejected value is reported inline and asked again; accepted values are kept

use colored::*;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};

use itms_controllers::{FieldKind, FieldSpec, FormController, FormSchema, ValidationError};

fn prompt_label(field: &FieldSpec) -> String {
    if field.is_required() {
        format!("{}:", field.label)
    } else {
        format!("{} (optional):", field.label)
    }
}

/// Ask for one field's raw text
fn ask(field: &FieldSpec, current: &str) -> inquire::error::InquireResult<String> {
    let label = prompt_label(field);
    match field.kind {
        FieldKind::Password => Password::new(&label)
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt(),
        FieldKind::Select(choices) => {
            let mut options: Vec<&str> = choices.to_vec();
            if !field.is_required() {
                options.insert(0, "");
            }
            let start = options
                .iter()
                .position(|o| o.eq_ignore_ascii_case(current))
                .unwrap_or(0);
            Select::new(&label, options)
                .with_starting_cursor(start)
                .prompt()
                .map(str::to_string)
        }
        FieldKind::Date => Text::new(&label)
            .with_default(current)
            .with_placeholder("YYYY-MM-DD")
            .prompt(),
        FieldKind::DateTime => Text::new(&label)
            .with_default(current)
            .with_placeholder("YYYY-MM-DDTHH:MM")
            .prompt(),
        FieldKind::Text | FieldKind::Multiline | FieldKind::Number => {
            Text::new(&label).with_default(current).prompt()
        }
    }
}

/// Walk every field of the form, re-asking until each value passes its rules
pub fn fill_form<S: FormSchema>(form: &FormController<S>) -> anyhow::Result<()> {
    for field in form.fields() {
        loop {
            let current = form.state().value(field.name).to_string();
            let value = ask(field, &current)?;
            match form.set_value(field.name, value) {
                Ok(()) => break,
                Err(ValidationError::UnknownField(name)) => {
                    anyhow::bail!("Form has no field named {}", name)
                }
                Err(e) => eprintln!("  {} {}", "✗".red(), e.to_string().red()),
            }
        }
    }
    Ok(())
}

/// Re-ask only the fields the last submit flagged, keeping everything else
pub fn fix_errors<S: FormSchema>(form: &FormController<S>) -> anyhow::Result<()> {
    let flagged: Vec<String> = form.state().field_errors.keys().cloned().collect();
    for name in flagged {
        let Some(field) = form.fields().iter().find(|f| f.name == name) else {
            continue;
        };
        loop {
            let current = form.state().value(field.name).to_string();
            if form.set_value(field.name, ask(field, &current)?).is_ok() {
                break;
            }
            if let Some(message) = form.state().field_errors.get(field.name) {
                eprintln!("  {} {}", "✗".red(), message.red());
            }
        }
    }
    Ok(())
}

/// Yes/no question defaulting to "no"
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    Ok(Confirm::new(question).with_default(false).prompt()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itms_controllers::forms::RegisterForm;

    #[test]
    fn test_optional_fields_are_marked() {
        let form = FormController::new(RegisterForm);
        let labels: Vec<String> = form.fields().iter().map(prompt_label).collect();
        assert!(labels.contains(&"Email:".to_string()));
        assert!(labels.contains(&"Phone number (optional):".to_string()));
    }
}
