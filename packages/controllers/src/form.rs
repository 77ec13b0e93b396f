// ABOUTME: Form state, synchronous validation and guarded submission
// ABOUTME: A schema projects the typed-in values onto exactly one request record

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use itms_client::{ClientError, ClientResult};
use itms_core::constants::SUBMIT_REDIRECT_DELAY_MS;

use crate::validation::{MatchesRule, Rule, ValidationError};

/// Raw text of every field, keyed by field name
pub type FormValues = BTreeMap<String, String>;

/// How a field is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Password,
    Number,
    Date,
    DateTime,
    /// One of a closed set of wire values
    Select(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
    pub default: Option<&'static str>,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let rules = match kind {
            FieldKind::Number => vec![Rule::Number],
            FieldKind::Date => vec![Rule::Date],
            FieldKind::DateTime => vec![Rule::DateTime],
            FieldKind::Select(choices) => vec![Rule::OneOf(choices)],
            FieldKind::Text | FieldKind::Multiline | FieldKind::Password => Vec::new(),
        };
        Self {
            name,
            label,
            kind,
            rules,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.rules.insert(0, Rule::Required);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }

    /// First failing rule for `value`
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        self.rules.iter().try_for_each(|rule| rule.check(self.label, value))
    }
}

/// Navigation scheduled after a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    /// Route such as `/projects/26` or `/login`
    pub target: String,
    pub delay: Duration,
}

impl PendingNavigation {
    pub fn after_default_delay(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            delay: Duration::from_millis(SUBMIT_REDIRECT_DELAY_MS),
        }
    }

    /// Sleep for the delay, then hand back the target
    pub async fn wait(self) -> String {
        tokio::time::sleep(self.delay).await;
        self.target
    }
}

/// Describes one form: its fields, rules and the request it produces
pub trait FormSchema: Send + Sync {
    /// Record sent to the backend
    type Request: Serialize + Send;

    /// What the backend answers with
    type Response: Send;

    fn fields(&self) -> Vec<FieldSpec>;

    /// Values the form opens with; edit forms return the stored record
    fn initial_values(&self) -> FormValues {
        FormValues::new()
    }

    fn cross_field_rules(&self) -> Vec<MatchesRule> {
        Vec::new()
    }

    /// Build the request from already validated values.
    ///
    /// Only fields named here reach the wire; UI-only fields are dropped.
    fn project(&self, values: &FormValues) -> Result<Self::Request, ValidationError>;

    fn success_message(&self) -> String;

    fn navigation_target(&self, response: &Self::Response) -> String;
}

/// Everything a form view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub field_errors: BTreeMap<String, String>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub navigation: Option<PendingNavigation>,
}

impl FormState {
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }
}

/// What a call to [`FormController::submit`] did
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    Succeeded(T),
    /// Client-side rules failed; nothing was sent
    Invalid(BTreeMap<String, String>),
    /// The backend call failed; values are kept for another try
    Failed(ClientError),
    /// Another submit of this form is still in flight
    Busy,
}

impl<T> SubmitOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

/// Clears the in-flight flag and the loading state, even if the submit future is dropped
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<FormState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct FormController<S: FormSchema> {
    schema: S,
    fields: Vec<FieldSpec>,
    cross_rules: Vec<MatchesRule>,
    state: watch::Sender<FormState>,
    in_flight: AtomicBool,
}

impl<S: FormSchema> FormController<S> {
    /// Form opened with the schema's initial values and field defaults
    pub fn new(schema: S) -> Self {
        let values = schema.initial_values();
        Self::with_values(schema, values)
    }

    /// Form prefilled with `values` (edit screens)
    pub fn with_values(schema: S, values: FormValues) -> Self {
        let fields = schema.fields();
        let cross_rules = schema.cross_field_rules();

        let mut initial = FormValues::new();
        for field in &fields {
            let value = values
                .get(field.name)
                .cloned()
                .or_else(|| field.default.map(str::to_string))
                .unwrap_or_default();
            initial.insert(field.name.to_string(), value);
        }

        let (state, _) = watch::channel(FormState {
            values: initial,
            ..Default::default()
        });

        Self {
            schema,
            fields,
            cross_rules,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Set one field and re-check it plus every cross-field rule it takes part in.
    ///
    /// A dependent field that is still empty is not flagged until it is typed into.
    pub fn set_value(&self, name: &str, value: impl Into<String>) -> Result<(), ValidationError> {
        let field = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?;
        let value = value.into();
        let mut result = field.validate(&value);

        self.state.send_modify(|s| {
            s.values.insert(name.to_string(), value);
            record(&mut s.field_errors, name, result.as_ref().err());

            for rule in self.cross_rules.iter().filter(|r| r.involves(name)) {
                let target = s.value(rule.field).to_string();
                let checked = if rule.field == name {
                    result = result.clone().and_then(|_| rule.check(&target, s.value(rule.other)));
                    result.clone()
                } else if target.is_empty() {
                    continue;
                } else {
                    self.fields
                        .iter()
                        .find(|f| f.name == rule.field)
                        .map_or(Ok(()), |f| f.validate(&target))
                        .and_then(|_| rule.check(&target, s.value(rule.other)))
                };
                record(&mut s.field_errors, rule.field, checked.as_ref().err());
            }
        });

        result
    }

    /// Check every field and cross-field rule, recording the failures
    pub fn validate(&self) -> BTreeMap<String, String> {
        let values = self.state.borrow().values.clone();
        let mut errors = BTreeMap::new();

        for field in &self.fields {
            let value = values.get(field.name).map(String::as_str).unwrap_or("");
            if let Err(e) = field.validate(value) {
                errors.insert(field.name.to_string(), e.to_string());
            }
        }
        for rule in &self.cross_rules {
            if errors.contains_key(rule.field) {
                continue;
            }
            let value = values.get(rule.field).map(String::as_str).unwrap_or("");
            let other = values.get(rule.other).map(String::as_str).unwrap_or("");
            if let Err(e) = rule.check(value, other) {
                errors.insert(rule.field.to_string(), e.to_string());
            }
        }

        let recorded = errors.clone();
        self.state.send_modify(|s| s.field_errors = recorded);
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validate, project and run `operation` with the request.
    ///
    /// On success the state carries the success message and a pending
    /// navigation. On failure the backend message is shown and the values
    /// stay as typed. A submit while another is running returns `Busy`.
    pub async fn submit<F, Fut>(&self, operation: F) -> SubmitOutcome<S::Response>
    where
        F: FnOnce(S::Request) -> Fut,
        Fut: Future<Output = ClientResult<S::Response>>,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Submit ignored, previous submit still in flight");
            return SubmitOutcome::Busy;
        }
        let _guard = InFlight {
            flag: &self.in_flight,
            state: &self.state,
        };

        let errors = self.validate();
        if !errors.is_empty() {
            return SubmitOutcome::Invalid(errors);
        }

        let request = {
            let values = self.state.borrow().values.clone();
            match self.schema.project(&values) {
                Ok(request) => request,
                Err(e) => {
                    let field = match &e {
                        ValidationError::Rule { field, .. } => field.clone(),
                        _ => String::new(),
                    };
                    let errors = BTreeMap::from([(field, e.to_string())]);
                    let recorded = errors.clone();
                    self.state.send_modify(|s| s.field_errors = recorded);
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.success = None;
            s.navigation = None;
        });

        match operation(request).await {
            Ok(response) => {
                let target = self.schema.navigation_target(&response);
                let navigation = PendingNavigation::after_default_delay(target);
                let message = self.schema.success_message();
                tracing::debug!("Submit succeeded, navigating to {}", navigation.target);
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.success = Some(message);
                    s.navigation = Some(navigation);
                });
                SubmitOutcome::Succeeded(response)
            }
            Err(err) => {
                tracing::debug!("Submit failed: {}", err);
                let backend_fields: Vec<(String, String)> = err
                    .api_error()
                    .map(|e| {
                        e.field_errors()
                            .iter()
                            .map(|f| (f.field.clone(), f.reason.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(err.user_message());
                    s.field_errors.extend(backend_fields);
                });
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Clear the success banner and the navigation once it has been followed
    pub fn take_navigation(&self) -> Option<PendingNavigation> {
        let mut taken = None;
        self.state.send_if_modified(|s| {
            taken = s.navigation.take();
            taken.is_some()
        });
        taken
    }
}

fn record(errors: &mut BTreeMap<String, String>, name: &str, error: Option<&ValidationError>) {
    match error {
        Some(e) => {
            errors.insert(name.to_string(), e.to_string());
        }
        None => {
            errors.remove(name);
        }
    }
}

/// Read a required text field
pub fn text(values: &FormValues, name: &str) -> String {
    values.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Read an optional text field; blank becomes `None`
pub fn optional_text(values: &FormValues, name: &str) -> Option<String> {
    values
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_raw<T>(name: &str, raw: &str) -> Result<T, ValidationError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ValidationError::Rule {
        field: name.to_string(),
        message: e.to_string(),
    })
}

fn parse_raw_date_time(name: &str, raw: &str) -> Result<chrono::NaiveDateTime, ValidationError> {
    crate::validation::parse_date_time(raw).ok_or_else(|| ValidationError::Rule {
        field: name.to_string(),
        message: format!("{} must be a date and time (YYYY-MM-DDTHH:MM)", name),
    })
}

/// Parse an optional field with `FromStr`; blank becomes `None`
pub fn optional_parse<T>(values: &FormValues, name: &str) -> Result<Option<T>, ValidationError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_text(values, name)
        .map(|raw| parse_raw(name, &raw))
        .transpose()
}

/// Parse a required field with `FromStr`
pub fn parse<T>(values: &FormValues, name: &str) -> Result<T, ValidationError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_parse(values, name)?.ok_or_else(|| ValidationError::Rule {
        field: name.to_string(),
        message: format!("{} is required", name),
    })
}

/// Parse an optional `YYYY-MM-DDTHH:MM` field
pub fn optional_date_time(
    values: &FormValues,
    name: &str,
) -> Result<Option<chrono::NaiveDateTime>, ValidationError> {
    optional_text(values, name)
        .map(|raw| parse_raw_date_time(name, &raw))
        .transpose()
}

/// The values an edit form was loaded with.
///
/// Edit projections read fields through it so only edited fields reach the
/// partial update. A field blanked out keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baseline(FormValues);

impl Baseline {
    /// Collect `(field, stored value)` pairs; `None` is stored as blank
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Option<String>)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.unwrap_or_default()))
                .collect(),
        )
    }

    pub fn values(&self) -> &FormValues {
        &self.0
    }

    /// Trimmed value of `name` when it differs from the stored one and is not blank
    pub fn changed(&self, values: &FormValues, name: &str) -> Option<String> {
        let now = optional_text(values, name)?;
        let before = self.0.get(name).map(|v| v.trim()).unwrap_or("");
        (now != before).then_some(now)
    }

    pub fn changed_parse<T>(
        &self,
        values: &FormValues,
        name: &str,
    ) -> Result<Option<T>, ValidationError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.changed(values, name)
            .map(|raw| parse_raw(name, &raw))
            .transpose()
    }

    pub fn changed_date_time(
        &self,
        values: &FormValues,
        name: &str,
    ) -> Result<Option<chrono::NaiveDateTime>, ValidationError> {
        self.changed(values, name)
            .map(|raw| parse_raw_date_time(name, &raw))
            .transpose()
    }
}
