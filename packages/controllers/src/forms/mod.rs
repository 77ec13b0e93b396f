//! Form schemas for the auth screens and the create and edit screens of every entity

mod auth;
mod directory;
mod edit;
mod work;

pub use auth::{ChangePasswordForm, LoginForm, RegisterForm};
pub use directory::{AssetForm, PartnerForm, UserForm};
pub use edit::{
    ApprovalEditForm, AssetEditForm, Editable, IncidentEditForm, IssueEditForm, PartnerEditForm,
    ProfileForm, ProjectEditForm, ReleaseEditForm, ServiceRequestEditForm, SpecificationEditForm,
    UserEditForm,
};
pub use work::{
    ApprovalForm, IncidentForm, IssueForm, ProjectForm, ReleaseForm, ServiceRequestForm,
    SpecificationForm,
};

use crate::form::{FieldKind, FieldSpec};
use crate::validation::Rule;

pub(crate) const PASSWORD_MIN: usize = 8;
pub(crate) const PASSWORD_MAX: usize = 20;
pub(crate) const NAME_MAX: usize = 50;
pub(crate) const PHONE_MAX: usize = 20;
pub(crate) const TITLE_MAX: usize = 200;

pub(crate) fn password_field(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Password)
        .required()
        .rule(Rule::MinLength(PASSWORD_MIN))
        .rule(Rule::MaxLength(PASSWORD_MAX))
}

pub(crate) fn id_field(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Number).rule(Rule::Integer)
}

/// Route of an entity's detail screen
pub(crate) fn detail_route(path: &str, id: i64) -> String {
    format!("{}/{}", path, id)
}
