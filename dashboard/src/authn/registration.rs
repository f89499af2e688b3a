//! Registration form checks run before anything is sent

use secrecy::{ExposeSecret, SecretString};

use crate::errors::DashboardError;

/// Fields of the registration form
pub struct RegistrationForm {
    pub full_name: String,
    pub username: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), DashboardError> {
        let blank = self.full_name.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.expose_secret().is_empty()
            || self.confirm_password.expose_secret().is_empty();
        if blank {
            return Err(DashboardError::ValidationError(
                "All fields are required".to_string(),
            ));
        }

        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(DashboardError::ValidationError(
                "Passwords do not match".to_string(),
            ));
        }

        Ok(())
    }
}
