use itms_core::models::auth::{ChangePasswordRequest, LoginRequest, LoginResponse};
use itms_core::models::user::UserCreateRequest;
use itms_core::User;

use super::{password_field, NAME_MAX, PHONE_MAX};
use crate::form::{
    optional_parse, optional_text, text, FieldKind, FieldSpec, FormSchema, FormValues,
};
use crate::validation::{MatchesRule, Rule, ValidationError};

/// Email and password sign-in
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginForm;

impl FormSchema for LoginForm {
    type Request = LoginRequest;
    type Response = LoginResponse;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("email", "Email", FieldKind::Text)
                .required()
                .rule(Rule::email()),
            FieldSpec::new("password", "Password", FieldKind::Password).required(),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<LoginRequest, ValidationError> {
        Ok(LoginRequest {
            email: text(values, "email"),
            password: values.get("password").cloned().unwrap_or_default(),
        })
    }

    fn success_message(&self) -> String {
        "Signed in".to_string()
    }

    fn navigation_target(&self, _response: &LoginResponse) -> String {
        "/".to_string()
    }
}

/// Self-service sign-up
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterForm;

impl FormSchema for RegisterForm {
    type Request = UserCreateRequest;
    type Response = User;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("email", "Email", FieldKind::Text)
                .required()
                .rule(Rule::email()),
            password_field("password", "Password"),
            FieldSpec::new("confirmPassword", "Confirm password", FieldKind::Password).required(),
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("phoneNumber", "Phone number", FieldKind::Text)
                .rule(Rule::MaxLength(PHONE_MAX)),
            FieldSpec::new("companyId", "Company id", FieldKind::Number).rule(Rule::Integer),
            FieldSpec::new("employeeNumber", "Employee number", FieldKind::Text),
            FieldSpec::new("position", "Position", FieldKind::Text),
        ]
    }

    fn cross_field_rules(&self) -> Vec<MatchesRule> {
        vec![MatchesRule::new(
            "confirmPassword",
            "password",
            "Passwords do not match",
        )]
    }

    fn project(&self, values: &FormValues) -> Result<UserCreateRequest, ValidationError> {
        Ok(UserCreateRequest {
            email: text(values, "email"),
            password: values.get("password").cloned().unwrap_or_default(),
            name: text(values, "name"),
            phone_number: optional_text(values, "phoneNumber"),
            company_id: optional_parse(values, "companyId")?,
            department_id: None,
            employee_number: optional_text(values, "employeeNumber"),
            position: optional_text(values, "position"),
        })
    }

    fn success_message(&self) -> String {
        "Registration submitted. Sign in once your account is approved".to_string()
    }

    fn navigation_target(&self, _response: &User) -> String {
        "/login".to_string()
    }
}

/// Password change for the signed-in user
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangePasswordForm;

impl FormSchema for ChangePasswordForm {
    type Request = ChangePasswordRequest;
    type Response = ();

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("currentPassword", "Current password", FieldKind::Password).required(),
            password_field("newPassword", "New password"),
            FieldSpec::new("confirmPassword", "Confirm password", FieldKind::Password).required(),
        ]
    }

    fn cross_field_rules(&self) -> Vec<MatchesRule> {
        vec![MatchesRule::new(
            "confirmPassword",
            "newPassword",
            "Passwords do not match",
        )]
    }

    fn project(&self, values: &FormValues) -> Result<ChangePasswordRequest, ValidationError> {
        Ok(ChangePasswordRequest {
            old_password: values.get("currentPassword").cloned().unwrap_or_default(),
            new_password: values.get("newPassword").cloned().unwrap_or_default(),
        })
    }

    fn success_message(&self) -> String {
        "Password changed. Sign in again with the new password".to_string()
    }

    fn navigation_target(&self, _response: &()) -> String {
        "/login".to_string()
    }
}
