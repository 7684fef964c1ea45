//! Sign-in and session lifecycle

use super::{Console, ViewState};
use crate::domain::{DomainError, DomainResult, SessionInfo};

impl Console {
    pub async fn login(&mut self, identifier: &str, password: &str) -> DomainResult<SessionInfo> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(DomainError::InvalidInput(
                "identifier and password are required".to_string(),
            ));
        }

        let session = self.backend.auth.login(identifier, password).await?;
        self.backend.auth.set_token(Some(session.jwt.clone()));
        if let Err(e) = self.sessions.save(&session).await {
            log::warn!("[auth] session not persisted: {}", e);
        }

        let info = SessionInfo::from(&session);
        self.session = Some(session);
        Ok(info)
    }

    /// Forget the token, the persisted session and everything on screen
    pub async fn logout(&mut self) -> DomainResult<()> {
        self.backend.auth.set_token(None);
        self.session = None;
        self.view = ViewState::default();
        log::info!("[auth] signed out");
        self.sessions.clear().await
    }

    /// Resume the last persisted session, if any
    pub async fn restore_session(&mut self) -> DomainResult<Option<SessionInfo>> {
        let Some(session) = self.sessions.load().await? else {
            return Ok(None);
        };
        self.backend.auth.set_token(Some(session.jwt.clone()));
        let info = SessionInfo::from(&session);
        log::info!("[auth] restored session for {}", info.display_name);
        self.session = Some(session);
        Ok(Some(info))
    }

    pub fn current_session(&self) -> Option<SessionInfo> {
        self.session.as_ref().map(SessionInfo::from)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{AuthUser, DomainError, Session};
    use crate::repository::SessionStore;
    use crate::service::test_support::fixture;

    #[tokio::test]
    async fn test_login_stores_token_and_session() {
        let mut fx = fixture().await;
        let info = fx.console.login(" admin ", "secret").await.unwrap();

        assert_eq!(info.display_name, "admin");
        assert_eq!(fx.auth.token(), Some("jwt-admin".to_string()));
        assert!(fx.console.is_authenticated());
        let saved = fx.sessions.load().await.unwrap().unwrap();
        assert_eq!(saved.jwt, "jwt-admin");
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let mut fx = fixture().await;
        assert!(matches!(
            fx.console.login("  ", "secret").await,
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            fx.console.login("admin", "").await,
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_signed_out() {
        let mut fx = fixture().await;
        assert!(fx.console.login("admin", "wrong").await.is_err());
        assert!(!fx.console.is_authenticated());
        assert_eq!(fx.auth.token(), None);
        assert!(fx.sessions.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let mut fx = fixture().await;
        fx.console.login("admin", "secret").await.unwrap();
        fx.console.load_branches().await;
        assert!(!fx.console.view().branches.is_empty());

        fx.console.logout().await.unwrap();
        assert!(fx.console.current_session().is_none());
        assert!(fx.console.view().branches.is_empty());
        assert_eq!(fx.auth.token(), None);
        assert!(fx.sessions.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_session() {
        let mut fx = fixture().await;
        assert!(fx.console.restore_session().await.unwrap().is_none());

        let user = AuthUser {
            id: 4,
            username: "ops".to_string(),
            email: String::new(),
        };
        fx.sessions.save(&Session::new("saved-jwt", user)).await.unwrap();

        let info = fx.console.restore_session().await.unwrap().unwrap();
        assert_eq!(info.display_name, "ops");
        assert_eq!(fx.auth.token(), Some("saved-jwt".to_string()));
        assert_eq!(fx.console.current_session(), Some(info));
    }
}
