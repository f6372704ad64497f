use chrono::Utc;
use entity::product;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::repo::Repos;

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductOut {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<product::Model> for ProductOut {
    fn from(model: product::Model) -> Self {
        ProductOut {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct ProductService {
    repos: Repos,
}

impl ProductService {
    pub fn new(repos: Repos) -> Self {
        ProductService { repos }
    }

    pub async fn list(&self) -> Result<Vec<ProductOut>, ApiError> {
        Ok(self
            .repos
            .products
            .list()
            .await?
            .into_iter()
            .map(ProductOut::from)
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductOut, ApiError> {
        self.repos
            .products
            .find(id)
            .await?
            .map(ProductOut::from)
            .ok_or_else(|| ApiError::not_found("product not found"))
    }

    pub async fn create(&self, input: CreateProduct) -> Result<ProductOut, ApiError> {
        let name = non_blank(&input.name)?;
        let stamp = Utc::now().into();
        let model = self
            .repos
            .products
            .insert(product::Model {
                id: Uuid::new_v4(),
                name,
                created_at: stamp,
                updated_at: stamp,
            })
            .await?;
        Ok(model.into())
    }

    pub async fn update(&self, id: Uuid, input: UpdateProduct) -> Result<ProductOut, ApiError> {
        let mut model = self
            .repos
            .products
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("product not found"))?;
        model.name = non_blank(&input.name)?;
        Ok(self.repos.products.update(model).await?.into())
    }

    /// A product that still has surveys attached cannot be removed.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repos.products.find(id).await?.is_none() {
            return Err(ApiError::not_found("product not found"));
        }
        if self.repos.surveys.any_for_product(id).await? {
            return Err(ApiError::invalid_operation(
                "product has surveys and cannot be deleted",
            ));
        }
        self.repos.products.delete(id).await
    }
}

fn non_blank(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("name must not be blank"));
    }
    Ok(trimmed.to_string())
}
