//! Example data for demo and test registries.

use crate::error::ScimResult;
use crate::resource::{Address, User};
use crate::storage::ResourceStore;
use log::info;

pub const EXAMPLE_USER_NAME: &str = "e1@example.com";

/// The example user "El Coder" with one email and one Springfield address.
pub fn example_user() -> User {
    User::new(EXAMPLE_USER_NAME)
        .with_name("El", "Coder")
        .with_email(EXAMPLE_USER_NAME)
        .with_address(Address {
            street_address: Some("101 Main St.".to_string()),
            locality: Some("Springfield".to_string()),
            region: Some("ME".to_string()),
            postal_code: Some("012345".to_string()),
            country: Some("US".to_string()),
            address_type: None,
        })
}

/// Store the example user, returning it with its assigned id.
pub async fn seed_users(users: &ResourceStore<User>) -> ScimResult<User> {
    let user = users.create(example_user()).await?;
    info!(
        "Seeded example user '{}'",
        user.id.as_deref().unwrap_or_default()
    );
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_user_shape() {
        let user = example_user();
        assert_eq!(user.user_name.as_deref(), Some("e1@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("Coder, El"));
        assert_eq!(user.emails.len(), 1);
        assert_eq!(user.addresses[0].locality.as_deref(), Some("Springfield"));
        assert!(user.id.is_none());
    }

    #[tokio::test]
    async fn test_seed_users_twice_is_rejected() {
        let users = ResourceStore::<User>::new();
        let seeded = seed_users(&users).await.unwrap();
        assert!(seeded.id.is_some());
        assert!(seed_users(&users).await.is_err());
        assert_eq!(users.len().await, 1);
    }
}
