//! Demo data served when the backend cannot be reached at all.

use serde_json::{json, Value};

/// The one endpoint that degrades to demo data on transport failure
pub const USERS_PATH: &str = "/users";

/// Built-in dataset for `path`, if it has one
pub fn dataset_for(path: &str) -> Option<Value> {
    match path {
        USERS_PATH => Some(demo_users()),
        _ => None,
    }
}

fn demo_users() -> Value {
    json!([
        {
            "id": 1,
            "email": "admin@test.com",
            "password": "admin123",
            "name": "Administrator",
            "role": "admin",
            "preferences": {
                "dietType": "omnivore",
                "allergies": [],
                "favoriteCategories": ["mediterranean", "healthy"]
            },
            "lastLogin": "2024-01-15T10:30:00Z",
            "createdAt": "2024-01-01T00:00:00Z",
            "isActive": true
        },
        {
            "id": 2,
            "email": "user@test.com",
            "password": "user123",
            "name": "Demo User",
            "role": "user",
            "preferences": {
                "dietType": "vegetarian",
                "allergies": ["nuts"],
                "favoriteCategories": ["vegetarian", "vegan"]
            },
            "lastLogin": "2024-01-14T15:45:00Z",
            "createdAt": "2024-01-02T00:00:00Z",
            "isActive": true
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    #[test]
    fn test_only_users_has_fallback() {
        assert!(dataset_for("/users").is_some());
        assert!(dataset_for("/recipes").is_none());
        assert!(dataset_for("/users/1").is_none());
    }

    #[test]
    fn test_demo_users_parse() {
        let users: Vec<User> = serde_json::from_value(dataset_for(USERS_PATH).unwrap()).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[0].is_admin());
        assert!(!users[1].is_admin());
    }
}
