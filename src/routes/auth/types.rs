// ABOUTME: Form types for login, registration and password change pages
// ABOUTME: Every field defaults to empty so missing inputs surface as validation messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Login form; `username` accepts a username or an email
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Username or email
    #[serde(alias = "identifier")]
    pub username: String,
    /// Password
    pub password: String,
}

impl LoginForm {
    /// Submitted values safe to echo back
    #[must_use]
    pub fn echo(&self) -> Value {
        json!({ "username": self.username })
    }
}

/// Registration form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Password
    pub password1: String,
    /// Password confirmation
    pub password2: String,
}

impl RegisterForm {
    /// Submitted values safe to echo back
    #[must_use]
    pub fn echo(&self) -> Value {
        json!({
            "username": self.username,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "email": self.email,
        })
    }
}

/// Password change form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    /// Current password
    pub old_password: String,
    /// New password
    pub new_password1: String,
    /// New password confirmation
    pub new_password2: String,
}

/// Landing page context
#[derive(Debug, Serialize)]
pub struct LandingContext {
    /// Whether the visitor has a valid session
    pub authenticated: bool,
}
