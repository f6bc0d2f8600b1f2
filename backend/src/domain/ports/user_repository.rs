//! Port for persisting users together with the reports they filed.

use async_trait::async_trait;

use crate::domain::{EmailAddress, ReportId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A value exceeds the width of its storage column.
        ColumnTooLong { column: &'static str, max: usize } =>
            "{column} exceeds the {max} character column limit",
        /// A stored row no longer satisfies the entity invariants.
        Corrupt { message: String } => "stored user is corrupt: {message}",
    }
}

/// Port for reading and writing user aggregates.
///
/// Reports are part of the user aggregate, so saving a user also saves
/// every report it holds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace a user and their reports.
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user registered under a normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user who filed the given report.
    async fn find_by_report_id(
        &self,
        report_id: &ReportId,
    ) -> Result<Option<User>, UserRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn column_limit_message_names_column_and_width() {
        let error = UserRepositoryError::column_too_long("username", 100_usize);
        assert_eq!(
            error.to_string(),
            "username exceeds the 100 character column limit"
        );
    }

    #[rstest]
    fn connection_constructor_accepts_str() {
        let error = UserRepositoryError::connection("lock poisoned");
        assert_eq!(
            error,
            UserRepositoryError::Connection {
                message: "lock poisoned".to_owned(),
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn automock_serves_configured_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let found = repo
            .find_by_id(&UserId::random())
            .await
            .expect("mock lookup succeeds");
        assert!(found.is_none());
    }
}
