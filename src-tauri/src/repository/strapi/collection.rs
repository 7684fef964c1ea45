//! Strapi Collections
//!
//! One generic repository per collection. Each record type names its
//! endpoint and the populate queries its views need.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use super::client::{encode_segment, StrapiClient};
use crate::domain::{Branch, DomainError, DomainResult, Entity, FollowUp, Required, Task};
use crate::repository::traits::Repository;

/// A record type served by a Strapi collection
pub trait StrapiResource: Entity + DeserializeOwned + 'static {
    /// Plural API id, e.g. `follow-ups`
    const COLLECTION: &'static str;
    /// Query string for list requests
    const LIST_POPULATE: &'static str;
    /// Query string for single-record requests
    const ITEM_POPULATE: &'static str;
}

impl StrapiResource for Branch {
    const COLLECTION: &'static str = "branches";
    const LIST_POPULATE: &'static str = "populate[follow_ups]=true";
    const ITEM_POPULATE: &'static str = "populate[follow_ups]=true";
}

impl StrapiResource for FollowUp {
    const COLLECTION: &'static str = "follow-ups";
    const LIST_POPULATE: &'static str =
        "populate[branch]=true&populate[media]=true&populate[branch_elements]=true";
    const ITEM_POPULATE: &'static str = "populate[branch]=true&populate[media]=true&populate[branch_elements][populate][tasks]=true";
}

impl StrapiResource for Task {
    const COLLECTION: &'static str = "tasks";
    const LIST_POPULATE: &'static str = "populate[requireds]=true";
    const ITEM_POPULATE: &'static str = "populate[requireds]=true";
}

impl StrapiResource for Required {
    const COLLECTION: &'static str = "requireds";
    const LIST_POPULATE: &'static str = "populate[task]=true";
    const ITEM_POPULATE: &'static str = "populate[task]=true";
}

/// REST-backed repository for one collection
pub struct StrapiCollection<T> {
    client: StrapiClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T: StrapiResource> StrapiCollection<T> {
    pub fn new(client: StrapiClient) -> Self {
        Self {
            client,
            _marker: PhantomData,
        }
    }

    fn item_path(document_id: &str) -> String {
        format!("{}/{}", T::COLLECTION, encode_segment(document_id))
    }
}

#[async_trait]
impl<T: StrapiResource> Repository<T> for StrapiCollection<T> {
    async fn create(&self, draft: &T::Draft) -> DomainResult<T> {
        let created: T = self
            .client
            .write_data(Method::POST, T::COLLECTION, draft)
            .await?;
        log::info!("[api] created {} {}", T::KIND, created.document_id());
        Ok(created)
    }

    async fn find_by_id(&self, document_id: &str) -> DomainResult<Option<T>> {
        let path = format!("{}?{}", Self::item_path(document_id), T::ITEM_POPULATE);
        match self.client.get_data::<T>(&path).await {
            Ok(record) => Ok(Some(record)),
            Err(DomainError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list(&self) -> DomainResult<Vec<T>> {
        let path = format!("{}?{}", T::COLLECTION, T::LIST_POPULATE);
        self.client.get_data(&path).await
    }

    async fn update(&self, document_id: &str, draft: &T::Draft) -> DomainResult<T> {
        let updated = self
            .client
            .write_data(Method::PUT, &Self::item_path(document_id), draft)
            .await?;
        log::info!("[api] updated {} {}", T::KIND, document_id);
        Ok(updated)
    }

    async fn delete(&self, document_id: &str) -> DomainResult<()> {
        self.client.delete(&Self::item_path(document_id)).await?;
        log::info!("[api] deleted {} {}", T::KIND, document_id);
        Ok(())
    }
}
