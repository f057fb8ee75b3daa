use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate};

/// Filters for the user directory.
#[derive(Debug, Clone)]
pub enum UserQuery {
    All,
    /// Exact email and password match, as checked at login.
    Credentials { email: String, password: String },
}

impl Entity for User {
    type Id = String;
    type CreatePayload = UserCreate;
    type Query = UserQuery;

    fn id(&self) -> &String { &self.id }

    fn from_create(id: String, payload: UserCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            role: payload.role,
            password: payload.password,
            location: payload.location,
            joined: Utc::now(),
        })
    }

    fn on_create(&mut self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name is required".to_string());
        }
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(format!("invalid email: {:?}", self.email));
        }
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    fn matches(&self, query: &UserQuery) -> bool {
        match query {
            UserQuery::All => true,
            UserQuery::Credentials { email, password } => {
                self.email == email.trim().to_lowercase() && &self.password == password
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn test_credentials_match_ignores_email_case() {
        let payload = UserCreate::new("Budi Wisatawan", " Budi@Gmail.com ", "123", Role::Buyer);
        let user = User::from_create("user_4".into(), payload).unwrap();

        assert_eq!(user.email, "budi@gmail.com");
        assert!(user.matches(&UserQuery::Credentials {
            email: "BUDI@gmail.com".into(),
            password: "123".into(),
        }));
        assert!(!user.matches(&UserQuery::Credentials {
            email: "budi@gmail.com".into(),
            password: "1234".into(),
        }));
        assert!(user.matches(&UserQuery::All));
    }

    #[test]
    fn test_on_create_validates_fields() {
        let mut user = User::from_create(
            "user_1".into(),
            UserCreate::new("Admin", "not-an-email", "123", Role::Admin),
        )
        .unwrap();
        assert!(user.on_create().is_err());

        user.email = "admin@koperasi.id".into();
        assert!(user.on_create().is_ok());

        user.password.clear();
        assert!(user.on_create().is_err());
    }
}
