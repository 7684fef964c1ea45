//! Strapi Authentication
//!
//! `POST /auth/local` exchanges an identifier (username or email) and
//! password for a JWT.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::client::StrapiClient;
use crate::domain::{DomainResult, Session};
use crate::repository::traits::AuthGateway;

#[derive(Serialize)]
struct Credentials<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[async_trait]
impl AuthGateway for StrapiClient {
    async fn login(&self, identifier: &str, password: &str) -> DomainResult<Session> {
        log::info!("[auth] login attempt for {}", identifier);
        let builder = self
            .anonymous(Method::POST, "auth/local")
            .json(&Credentials { identifier, password });
        let session: Session = self.send(builder).await?;
        log::info!("[auth] signed in as {}", session.user.display_name());
        Ok(session)
    }

    fn set_token(&self, token: Option<String>) {
        StrapiClient::set_token(self, token);
    }
}
