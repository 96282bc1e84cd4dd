//! Catalog of categories and products
//!
//! Same write-through JSON store shape as the directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{Error, Result};

/// A product grouping created by a shop owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A sellable item within a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CatalogData {
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// The catalog store
pub struct Catalog {
    path: PathBuf,
    data: Arc<RwLock<CatalogData>>,
}

impl Catalog {
    /// Open the catalog at `path`, starting empty if the file is absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            CatalogData::default()
        };
        Ok(Self {
            path,
            data: Arc::new(RwLock::new(data)),
        })
    }

    fn persist(&self, data: &CatalogData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }

    /// Create a category; the name is required
    pub async fn add_category(&self, name: &str, description: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Category name is required.".to_string()));
        }

        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.trim().to_string(),
            created_at: chrono::Utc::now(),
        };

        let mut data = self.data.write().await;
        data.categories.push(category.clone());
        self.persist(&data)?;
        Ok(category)
    }

    /// Create a product; requires a name, a non-negative price, and an
    /// existing category
    pub async fn add_product(
        &self,
        name: &str,
        description: &str,
        price: f64,
        category_id: &str,
    ) -> Result<Product> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Product name is required.".to_string()));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(Error::Validation(
                "Price must be a non-negative number.".to_string(),
            ));
        }

        let mut data = self.data.write().await;
        if !data.categories.iter().any(|c| c.id == category_id) {
            return Err(Error::CategoryNotFound);
        }

        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.trim().to_string(),
            price,
            category_id: category_id.to_string(),
            created_at: chrono::Utc::now(),
        };
        data.products.push(product.clone());
        self.persist(&data)?;
        Ok(product)
    }

    pub async fn list_categories(&self) -> Vec<Category> {
        self.data.read().await.categories.clone()
    }

    pub async fn list_products(&self) -> Vec<Product> {
        self.data.read().await.products.clone()
    }

    pub async fn category_count(&self) -> usize {
        self.data.read().await.categories.len()
    }

    pub async fn product_count(&self) -> usize {
        self.data.read().await.products.len()
    }
}

impl Clone for Catalog {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            data: Arc::clone(&self.data),
        }
    }
}
