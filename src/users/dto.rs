use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{Checker, FieldErrors, FromPayload, Rule};

const NAME: Rule = Rule::between(3, 80);
const PASSWORD: Rule = Rule::min(6);

/// Body of `POST /users`.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub email: Option<String>,
}

impl FromPayload for NewUser {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut c = Checker::new(payload, &["name", "password", "email"]);
        let name = c.required("name", NAME);
        let password = c.required("password", PASSWORD);
        let email = c.nullable("email", Rule::Email).flatten();
        let errors = c.into_errors();
        match (name, password) {
            (Some(name), Some(password)) if errors.is_empty() => Ok(Self {
                name,
                password,
                email,
            }),
            _ => Err(errors),
        }
    }
}

/// Body of `PUT /user/:id`. `email: Some(None)` clears the address.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<Option<String>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none() && self.email.is_none()
    }
}

impl FromPayload for UserUpdate {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut c = Checker::new(payload, &["name", "password", "email"]);
        let update = Self {
            name: c.optional("name", NAME),
            password: c.optional("password", PASSWORD),
            email: c.nullable("email", Rule::Email),
        };
        let errors = c.into_errors();
        if errors.is_empty() {
            Ok(update)
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
