use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::{Checker, FieldErrors, FromPayload, Rule};

/// Body of `POST /login`. Only presence is checked.
#[derive(Debug)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

impl FromPayload for LoginRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut c = Checker::new(payload, &["name", "password"]);
        let name = c.required("name", Rule::min(1));
        let password = c.required("password", Rule::min(1));
        let errors = c.into_errors();
        match (name, password) {
            (Some(name), Some(password)) if errors.is_empty() => Ok(Self { name, password }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user_id: i64,
}
