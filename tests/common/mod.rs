//! Shared fixtures for integration tests: a typed `User` row set served
//! through the in-memory delegate.

use chrono::{DateTime, Utc};
use querycrate::MemoryDelegate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

fn user(
    id: i64,
    name: &str,
    role: &str,
    status: &str,
    score: i64,
    created_at: &str,
    deleted_at: Option<&str>,
) -> User {
    let parse = |raw: &str| {
        raw.parse::<DateTime<Utc>>()
            .unwrap_or_else(|err| panic!("fixture timestamp {raw}: {err}"))
    };
    let handle = name
        .split_whitespace()
        .next()
        .unwrap_or(name)
        .to_lowercase();
    User {
        id,
        name: name.to_owned(),
        email: format!("{handle}@example.com"),
        role: role.to_owned(),
        status: status.to_owned(),
        score,
        created_at: parse(created_at),
        deleted_at: deleted_at.map(parse),
    }
}

/// Eight users spanning every role and status the filter tests exercise.
pub fn sample_users() -> Vec<User> {
    vec![
        user(1, "Annabel Weiss", "admin", "active", 92, "2024-03-01T08:00:00Z", None),
        user(2, "Ben Okafor", "staff", "active", 67, "2024-03-02T09:15:00Z", None),
        user(3, "Carla Jimenez", "staff", "active", 75, "2024-03-03T10:30:00Z", None),
        user(4, "Dmitri Ivanov", "student", "invited", 58, "2024-03-04T11:45:00Z", None),
        user(5, "Edda Hansen", "student", "active", 81, "2024-03-05T13:00:00Z", None),
        user(
            6,
            "Farid Nazari",
            "student",
            "archived",
            44,
            "2024-03-06T14:15:00Z",
            Some("2024-04-01T00:00:00Z"),
        ),
        user(7, "Giovanna Rossi", "admin", "active", 88, "2024-03-07T15:30:00Z", None),
        user(8, "Hana Suzuki", "staff", "suspended", 71, "2024-03-08T16:45:00Z", None),
    ]
}

pub fn sample_delegate() -> MemoryDelegate<User> {
    MemoryDelegate::from_items(&sample_users()).expect("sample users serialize")
}

/// A larger set for pagination scenarios: 25 active users whose names match
/// a "ann" search, 5 active users that do not, and 5 archived users.
pub fn bulk_users() -> Vec<User> {
    let mut users = Vec::with_capacity(35);
    for i in 1..=25 {
        users.push(user(
            i,
            &format!("Joanne Example {i:02}"),
            "member",
            "active",
            50 + i,
            "2024-05-01T00:00:00Z",
            None,
        ));
    }
    for i in 26..=30 {
        users.push(user(
            i,
            &format!("Peter Example {i:02}"),
            "member",
            "active",
            40 + i,
            "2024-05-02T00:00:00Z",
            None,
        ));
    }
    for i in 31..=35 {
        users.push(user(
            i,
            &format!("Marcus Example {i:02}"),
            "member",
            "archived",
            30 + i,
            "2024-05-03T00:00:00Z",
            Some("2024-06-01T00:00:00Z"),
        ));
    }
    users
}

pub fn bulk_delegate() -> MemoryDelegate<User> {
    MemoryDelegate::from_items(&bulk_users()).expect("bulk users serialize")
}
