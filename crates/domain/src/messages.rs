//! User-facing message catalog.
//!
//! Every text returned to clients comes from here so that deployments can
//! ship the dashboard's language through configuration. Templates may use
//! `{fields}` (comma-separated names) and `{field}` (a single name).

use serde::Deserialize;

use crate::error::{HubError, NotFoundError, ValidationError};

/// Message templates, one per error category plus the success status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    pub success: String,
    pub malformed_body: String,
    pub missing_fields: String,
    pub invalid_field: String,
    pub invalid_request: String,
    pub unknown_jacket: String,
    pub unknown_floor: String,
    pub unknown_room: String,
    pub internal_error: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            success: "success".to_string(),
            malformed_body: "Request body must be a JSON object".to_string(),
            missing_fields: "Missing fields: {fields}".to_string(),
            invalid_field: "Invalid value for field: {field}".to_string(),
            invalid_request: "Invalid request".to_string(),
            unknown_jacket: "uuid not found".to_string(),
            unknown_floor: "floor_number does not exist".to_string(),
            unknown_room: "room_number does not exist".to_string(),
            internal_error: "Internal server error".to_string(),
        }
    }
}

impl MessageCatalog {
    /// Render the client-facing message for `err`.
    #[must_use]
    pub fn describe(&self, err: &HubError) -> String {
        match err {
            HubError::Validation(err) => self.describe_validation(err),
            HubError::NotFound(err) => self.describe_not_found(err).to_string(),
            HubError::Storage(_) => self.internal_error.clone(),
        }
    }

    fn describe_validation(&self, err: &ValidationError) -> String {
        match err {
            ValidationError::MalformedBody => self.malformed_body.clone(),
            ValidationError::MissingFields(fields) => {
                self.missing_fields.replace("{fields}", &fields.join(", "))
            }
            ValidationError::InvalidField { field } => self.invalid_field.replace("{field}", field),
            ValidationError::InvalidRequest => self.invalid_request.clone(),
        }
    }

    fn describe_not_found(&self, err: &NotFoundError) -> &str {
        match err {
            NotFoundError::Jacket { .. } => &self.unknown_jacket,
            NotFoundError::Floor { .. } => &self.unknown_floor,
            NotFoundError::Room { .. } => &self.unknown_room,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FloorId;

    #[test]
    fn should_list_missing_fields_in_message() {
        let catalog = MessageCatalog::default();
        let err = HubError::from(ValidationError::MissingFields(vec!["uuid", "temperature"]));
        assert_eq!(catalog.describe(&err), "Missing fields: uuid, temperature");
    }

    #[test]
    fn should_name_invalid_field_in_message() {
        let catalog = MessageCatalog::default();
        let err = HubError::from(ValidationError::InvalidField {
            field: "heart_rate",
        });
        assert_eq!(catalog.describe(&err), "Invalid value for field: heart_rate");
    }

    #[test]
    fn should_pick_message_per_missing_entity() {
        let catalog = MessageCatalog::default();
        let floor = HubError::from(NotFoundError::Floor {
            building_id: "1".to_string(),
            floor_number: "9".to_string(),
        });
        let room = HubError::from(NotFoundError::Room {
            floor_id: FloorId::new(1),
            room_number: "9".to_string(),
        });
        assert_eq!(catalog.describe(&floor), "floor_number does not exist");
        assert_eq!(catalog.describe(&room), "room_number does not exist");
    }

    #[test]
    fn should_hide_storage_details() {
        let catalog = MessageCatalog::default();
        let err = HubError::storage(std::io::Error::other("password authentication failed"));
        assert_eq!(catalog.describe(&err), "Internal server error");
    }

    #[test]
    fn should_load_partial_catalog_from_toml_with_defaults() {
        let catalog: MessageCatalog = toml::from_str(
            r#"
                success = "thành công"
                missing_fields = "Thiếu các trường: {fields}"
                unknown_jacket = "Không tìm thấy uuid"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.success, "thành công");
        assert_eq!(
            catalog.describe(&ValidationError::MissingFields(vec!["uuid"]).into()),
            "Thiếu các trường: uuid"
        );
        assert_eq!(catalog.invalid_request, "Invalid request");
    }
}
