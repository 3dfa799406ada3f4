//! # Document schemas for goals and user profiles
//!
//! The managed database stores loosely-typed field maps. Every collection the
//! app touches gets an explicit schema here so shape drift is caught when a
//! document is decoded rather than when a screen renders it.
//!
//! ## Types
//!
//! | Struct | Collection | Represents |
//! |--------|-----------|-----------|
//! | [`Goal`] | `inactive goals` | A savings goal that is no longer active. Carries the creator's uid and the email addresses it is shared with. |
//! | [`User`] | `users/{uid}` | The budgeting profile written at sign-up: display name, email, hashed credential, budget values, date range, and custom expense categories. |
//! | [`UserLookup`] | `userLookup/{email}` | Reverse index from an email address to a uid, used when sharing goals by email. |
//!
//! Field names follow the camelCase spelling already used by the hosted
//! backend (`createdBy`, `sharingEmails`, `budgetValueDaily`, ...).
//!
//! [`Document`] pairs decoded data with its server-generated [`DocumentId`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-generated identifier of a document within its collection.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier, as the backend assigns on create.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A decoded document together with its identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Document<T> {
    pub id: DocumentId,
    pub data: T,
}

/// A savings goal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Uid of the user who created the goal.
    pub created_by: String,
    /// Email addresses the goal is shared with.
    #[serde(default)]
    pub sharing_emails: Vec<String>,
    #[serde(default)]
    pub title: String,
    /// Target amount.
    #[serde(default)]
    pub amount: f64,
}

impl Goal {
    pub fn new(created_by: impl Into<String>, title: impl Into<String>, amount: f64) -> Self {
        Self {
            created_by: created_by.into(),
            sharing_emails: Vec::new(),
            title: title.into(),
            amount,
        }
    }

    /// Builder method to share the goal with another email address.
    pub fn shared_with(mut self, email: impl Into<String>) -> Self {
        self.sharing_emails.push(email.into());
        self
    }
}

/// Budgeting profile stored under `users/{uid}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    /// Argon2 PHC string of the account password.
    pub password_hash: String,
    #[serde(default)]
    pub budget_value: f64,
    #[serde(default)]
    pub budget_value_daily: f64,
    pub date_to: DateTime<Utc>,
    pub date_from: DateTime<Utc>,
    /// Budget period label, e.g. "This Month".
    pub time_user_wants: String,
    #[serde(default)]
    pub custom_expense_arr: Vec<String>,
}

impl User {
    /// Default profile written when an account is created.
    pub fn new_profile(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        now: DateTime<Utc>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            budget_value: 0.0,
            budget_value_daily: 0.0,
            date_to: now,
            date_from: now,
            time_user_wants: period.into(),
            custom_expense_arr: Vec::new(),
        }
    }
}

/// Email → uid index stored under `userLookup/{email}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserLookup {
    pub uid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_goal_uses_backend_field_names() {
        let goal = Goal::new("uid-1", "Bike", 300.0).shared_with("a@b.co");
        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(value["createdBy"], "uid-1");
        assert_eq!(value["sharingEmails"], json!(["a@b.co"]));
    }

    #[test]
    fn test_goal_tolerates_missing_optional_fields() {
        let goal: Goal = serde_json::from_value(json!({ "createdBy": "uid-2", "extra": true }))
            .unwrap();
        assert_eq!(goal.created_by, "uid-2");
        assert!(goal.sharing_emails.is_empty());
        assert_eq!(goal.amount, 0.0);
    }

    #[test]
    fn test_goal_without_creator_is_rejected() {
        let result: Result<Goal, _> = serde_json::from_value(json!({ "title": "orphan" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_profile_defaults() {
        let now = Utc::now();
        let user = User::new_profile("Ann", "ann@x.io", "$argon2id$...", now, "This Month");
        assert_eq!(user.budget_value, 0.0);
        assert_eq!(user.budget_value_daily, 0.0);
        assert_eq!(user.date_from, now);
        assert_eq!(user.date_to, now);
        assert!(user.custom_expense_arr.is_empty());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["timeUserWants"], "This Month");
        assert!(value.get("customExpenseArr").is_some());
    }
}
