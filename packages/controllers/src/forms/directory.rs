use itms_core::models::asset::{AssetCreateRequest, AssetType};
use itms_core::models::partner::PartnerCreateRequest;
use itms_core::models::user::UserCreateRequest;
use itms_core::{Asset, Partner, Resource, User};

use super::{detail_route, id_field, password_field, NAME_MAX, PHONE_MAX};
use crate::form::{
    optional_parse, optional_text, parse, text, FieldKind, FieldSpec, FormSchema, FormValues,
};
use crate::validation::{MatchesRule, Rule, ValidationError};

#[derive(Debug, Clone, Copy, Default)]
pub struct PartnerForm;

impl FormSchema for PartnerForm {
    type Request = PartnerCreateRequest;
    type Response = Partner;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("businessNumber", "Business number", FieldKind::Text)
                .required()
                .rule(Rule::business_number()),
            FieldSpec::new("ceoName", "CEO", FieldKind::Text).rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("address", "Address", FieldKind::Text),
            FieldSpec::new("contactPerson", "Contact person", FieldKind::Text),
            FieldSpec::new("phoneNumber", "Phone number", FieldKind::Text)
                .rule(Rule::MaxLength(PHONE_MAX)),
            FieldSpec::new("email", "Email", FieldKind::Text).rule(Rule::email()),
            id_field("managerId", "Manager id"),
            id_field("pmId", "PM id"),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<PartnerCreateRequest, ValidationError> {
        Ok(PartnerCreateRequest {
            name: text(values, "name"),
            business_number: text(values, "businessNumber"),
            ceo_name: optional_text(values, "ceoName"),
            address: optional_text(values, "address"),
            contact_person: optional_text(values, "contactPerson"),
            phone_number: optional_text(values, "phoneNumber"),
            email: optional_text(values, "email"),
            manager_id: optional_parse(values, "managerId")?,
            pm_id: optional_parse(values, "pmId")?,
        })
    }

    fn success_message(&self) -> String {
        "Partner registered".to_string()
    }

    fn navigation_target(&self, response: &Partner) -> String {
        detail_route(Partner::PATH, response.id())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssetForm;

impl FormSchema for AssetForm {
    type Request = AssetCreateRequest;
    type Response = Asset;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("assetType", "Type", FieldKind::Select(AssetType::WIRE))
                .required()
                .default_value("PC"),
            FieldSpec::new("model", "Model", FieldKind::Text),
            FieldSpec::new("manufacturer", "Manufacturer", FieldKind::Text),
            FieldSpec::new("serialNumber", "Serial number", FieldKind::Text),
            FieldSpec::new("location", "Location", FieldKind::Text),
            FieldSpec::new("acquiredAt", "Acquired on", FieldKind::Date),
            FieldSpec::new("warrantyEndDate", "Warranty ends", FieldKind::Date),
            id_field("managerId", "Manager id"),
            FieldSpec::new("notes", "Notes", FieldKind::Multiline),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<AssetCreateRequest, ValidationError> {
        Ok(AssetCreateRequest {
            name: text(values, "name"),
            asset_type: parse(values, "assetType")?,
            model: optional_text(values, "model"),
            manufacturer: optional_text(values, "manufacturer"),
            serial_number: optional_text(values, "serialNumber"),
            location: optional_text(values, "location"),
            acquired_at: optional_parse(values, "acquiredAt")?,
            warranty_end_date: optional_parse(values, "warrantyEndDate")?,
            manager_id: optional_parse(values, "managerId")?,
            notes: optional_text(values, "notes"),
        })
    }

    fn success_message(&self) -> String {
        "Asset registered".to_string()
    }

    fn navigation_target(&self, response: &Asset) -> String {
        detail_route(Asset::PATH, response.id())
    }
}

/// Account created by an administrator
#[derive(Debug, Clone, Copy, Default)]
pub struct UserForm;

impl FormSchema for UserForm {
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
            id_field("companyId", "Company id"),
            id_field("departmentId", "Department id"),
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
            department_id: optional_parse(values, "departmentId")?,
            employee_number: optional_text(values, "employeeNumber"),
            position: optional_text(values, "position"),
        })
    }

    fn success_message(&self) -> String {
        "User created".to_string()
    }

    fn navigation_target(&self, response: &User) -> String {
        detail_route(User::PATH, response.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_business_number_rule() {
        let fields = PartnerForm.fields();
        let field = fields.iter().find(|f| f.name == "businessNumber").unwrap();

        assert!(field.validate("1234567890").is_ok());
        assert_eq!(
            field.validate("123-45-67890").unwrap_err().to_string(),
            "Business number must be 10 to 12 digits"
        );
        assert!(field.validate("").is_err());
    }

    #[test]
    fn test_asset_type_accepts_other() {
        let values: FormValues = [("name", "Spare cable"), ("assetType", "etc")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let request = AssetForm.project(&values).unwrap();
        assert_eq!(request.asset_type, AssetType::Etc);
        assert!(request.model.is_none());
    }

    #[test]
    fn test_user_password_length_rule() {
        let fields = UserForm.fields();
        let password = fields.iter().find(|f| f.name == "password").unwrap();

        assert!(password.validate("short").is_err());
        assert!(password.validate("exactly8").is_ok());
        assert!(password.validate("this-password-is-too-long").is_err());
    }
}
