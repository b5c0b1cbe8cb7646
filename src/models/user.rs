use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered account. Passwords are kept as given and never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Exact, case-sensitive match on both credentials
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

/// Form body shared by `POST /login` and `POST /register`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CredentialsForm {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}
