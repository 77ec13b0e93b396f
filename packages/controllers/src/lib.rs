//! Screen-level controllers over the ITMS client
//!
//! [`ListController`] keeps one paginated list in sync with its query and
//! drops out-of-order responses. [`FormController`] validates typed-in values,
//! projects them onto a request record and guards against double submits.

pub mod form;
pub mod forms;
pub mod list;
pub mod validation;

pub use form::{
    Baseline, FieldKind, FieldSpec, FormController, FormSchema, FormState, FormValues,
    PendingNavigation, SubmitOutcome,
};
pub use forms::{Editable, ProfileForm};
pub use list::{FetchOutcome, ListController, ListError, ListState, PageSource};
pub use validation::{MatchesRule, Rule, ValidationError};
