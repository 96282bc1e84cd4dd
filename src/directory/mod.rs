//! User and café directory
//!
//! A write-through JSON store. Records load once at open and every
//! mutation rewrites the file, so the CLI admin tooling and the server
//! see the same state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::models::User;
use crate::error::{Error, Result};

/// A café that staff accounts can belong to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cafe {
    pub id: String,
    pub cafe_name: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

impl Cafe {
    pub fn new(cafe_name: String, address: String, phone_number: String, email: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cafe_name,
            address,
            phone_number,
            email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct DirectoryData {
    users: Vec<User>,
    cafes: Vec<Cafe>,
}

/// The directory of users and cafés
pub struct Directory {
    path: PathBuf,
    data: Arc<RwLock<DirectoryData>>,
}

impl Directory {
    /// Open the directory at `path`, starting empty if the file is absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            DirectoryData::default()
        };
        Ok(Self {
            path,
            data: Arc::new(RwLock::new(data)),
        })
    }

    fn persist(&self, data: &DirectoryData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }

    /// Add a user; usernames and emails are unique
    pub async fn insert_user(&self, user: User) -> Result<()> {
        let mut data = self.data.write().await;
        let taken = data
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(Error::DuplicateUser(user.username));
        }
        data.users.push(user);
        self.persist(&data)
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let data = self.data.read().await;
        data.users.iter().find(|u| u.username == username).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let data = self.data.read().await;
        data.users.iter().find(|u| u.email == email).cloned()
    }

    pub async fn get_user(&self, id: &str) -> Option<User> {
        let data = self.data.read().await;
        data.users.iter().find(|u| u.id == id).cloned()
    }

    /// Replace a user's stored password hash
    pub async fn set_password(&self, id: &str, password_hash: String) -> Result<()> {
        let mut data = self.data.write().await;
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;
        user.password_hash = password_hash;
        self.persist(&data)
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.data.read().await.users.clone()
    }

    /// Add a café; names are unique
    pub async fn insert_cafe(&self, cafe: Cafe) -> Result<()> {
        let mut data = self.data.write().await;
        if data.cafes.iter().any(|c| c.cafe_name == cafe.cafe_name) {
            return Err(Error::Validation(format!(
                "Cafe '{}' already exists",
                cafe.cafe_name
            )));
        }
        data.cafes.push(cafe);
        self.persist(&data)
    }

    pub async fn find_cafe(&self, cafe_name: &str) -> Option<Cafe> {
        let data = self.data.read().await;
        data.cafes.iter().find(|c| c.cafe_name == cafe_name).cloned()
    }

    pub async fn list_cafes(&self) -> Vec<Cafe> {
        self.data.read().await.cafes.clone()
    }

    pub async fn user_count(&self) -> usize {
        self.data.read().await.users.len()
    }
}

impl Clone for Directory {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            data: Arc::clone(&self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    fn test_user(username: &str, email: &str) -> User {
        User::new(
            username.to_string(),
            email.to_string(),
            "555-0100".to_string(),
            "not-a-real-hash".to_string(),
            Role::Chef,
            None,
        )
    }

    fn temp_directory() -> (tempfile::TempDir, Directory) {
        let dir = tempfile::tempdir().unwrap();
        let directory = Directory::open(dir.path().join("users.json")).unwrap();
        (dir, directory)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (_guard, directory) = temp_directory();
        directory
            .insert_user(test_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(directory.find_by_username("alice").await.is_some());
        assert!(directory.find_by_email("alice@example.com").await.is_some());
        assert!(directory.find_by_username("bob").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (_guard, directory) = temp_directory();
        directory
            .insert_user(test_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = directory
            .insert_user(test_user("alice", "other@example.com"))
            .await;
        assert!(matches!(result, Err(Error::DuplicateUser(_))));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_guard, directory) = temp_directory();
        directory
            .insert_user(test_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = directory
            .insert_user(test_user("bob", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(Error::DuplicateUser(_))));
    }

    #[tokio::test]
    async fn test_set_password_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let user = test_user("alice", "alice@example.com");
        let user_id = user.id.clone();
        {
            let directory = Directory::open(&path).unwrap();
            directory.insert_user(user).await.unwrap();
            directory
                .set_password(&user_id, "new-hash".to_string())
                .await
                .unwrap();
        }

        // A fresh open sees the write-through state
        let reopened = Directory::open(&path).unwrap();
        let user = reopened.get_user(&user_id).await.unwrap();
        assert_eq!(user.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn test_set_password_unknown_user() {
        let (_guard, directory) = temp_directory();
        let result = directory.set_password("missing", "hash".to_string()).await;
        assert!(matches!(result, Err(Error::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_cafes() {
        let (_guard, directory) = temp_directory();
        directory
            .insert_cafe(Cafe::new(
                "Corner Beans".to_string(),
                "1 Main St".to_string(),
                "555-0101".to_string(),
                "hello@cornerbeans.example".to_string(),
            ))
            .await
            .unwrap();

        assert!(directory.find_cafe("Corner Beans").await.is_some());
        assert_eq!(directory.list_cafes().await.len(), 1);

        let duplicate = directory
            .insert_cafe(Cafe::new(
                "Corner Beans".to_string(),
                String::new(),
                String::new(),
                String::new(),
            ))
            .await;
        assert!(duplicate.is_err());
    }
}
