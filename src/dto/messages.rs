use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub whatsapp: String,
    #[validate(length(min = 1, max = 150))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_required() {
        let request = ContactRequest {
            name: "Budi".into(),
            email: "budi@example.com".into(),
            whatsapp: "0812345678".into(),
            subject: "Bulk pricing".into(),
            message: "Do you ship to Surabaya?".into(),
        };
        assert!(request.validate().is_ok());

        let request = ContactRequest {
            email: "nope".into(),
            ..request
        };
        assert!(request.validate().is_err());
    }
}
