#[cfg(test)]
mod tests {
    use crate::errors::AuthError;
    use crate::errors::api::auth::auth_bad_request;
    use poem::http::StatusCode;
    use crate::errors::internal::{AccessError, CredentialError, InternalError, RoleError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_server_error() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let internal_err = InternalError::database("find_user_by_identifier", db_err);
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::ServerError(_)));
        assert_eq!(auth_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_crypto_error_does_not_leak_details() {
        let internal_err = InternalError::crypto("argon2_init", "secret too long");
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.body().error, "server_error");
        assert!(!auth_err.message().contains("argon2"));
    }

    #[test]
    fn test_invalid_credentials_converts_correctly() {
        let internal_err = InternalError::Credential(CredentialError::InvalidCredentials);
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::InvalidCredentials(_)));
        assert_eq!(auth_err.body().error, "invalid_credentials");
        assert_eq!(auth_err.body().status_code, 401);
    }

    #[test]
    fn test_status_gates_convert_to_their_categories() {
        let disabled = AuthError::from_internal_error(CredentialError::AccountDisabled.into());
        let pending = AuthError::from_internal_error(CredentialError::PendingApproval.into());

        assert_eq!(disabled.body().error, "account_disabled");
        assert_eq!(disabled.body().status_code, 403);
        assert_eq!(pending.body().error, "pending_approval");
        assert_eq!(pending.body().status_code, 403);
    }

    #[test]
    fn test_invalid_token_converts_to_not_authenticated() {
        let internal_err = InternalError::Credential(CredentialError::invalid_token("unknown key"));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::NotAuthenticated(_)));
        assert!(!auth_err.message().contains("unknown key"));
    }

    #[test]
    fn test_missing_authentication_converts_to_not_authenticated() {
        let auth_err = AuthError::from_internal_error(AccessError::NotAuthenticated.into());
        assert!(matches!(auth_err, AuthError::NotAuthenticated(_)));
    }

    #[test]
    fn test_duplicate_email_does_not_echo_address() {
        let internal_err = InternalError::Credential(CredentialError::DuplicateEmail(
            "someone@example.com".to_string(),
        ));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.body().error, "validation_error");
        assert_eq!(auth_err.message(), "A user with this email already exists");
    }

    #[test]
    fn test_invalid_username_is_validation_error() {
        let internal_err = InternalError::Credential(CredentialError::InvalidUsername(
            "victim@example.com".to_string(),
        ));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.body().error, "validation_error");
        assert!(!auth_err.message().contains("victim@example.com"));
    }

    #[test]
    fn test_password_validation_message_is_passed_through() {
        let internal_err = InternalError::Credential(CredentialError::PasswordValidationFailed(
            "Password must be at least 8 characters".to_string(),
        ));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "Password must be at least 8 characters");
    }

    #[test]
    fn test_role_error_is_unexpected_in_auth_context() {
        let internal_err = InternalError::Role(RoleError::UnknownRole("WIZARD".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::ServerError(_)));
    }

    #[test]
    fn test_unparseable_request_becomes_validation_error() {
        let err = poem::Error::from_string(
            "parse request payload error: expected string",
            StatusCode::BAD_REQUEST,
        );
        let auth_err = auth_bad_request(err);

        assert!(matches!(auth_err, AuthError::ValidationError(_)));
        assert_eq!(auth_err.body().error, "validation_error");
        assert_eq!(auth_err.body().status_code, 400);
        assert!(auth_err.message().contains("expected string"));
    }

    #[test]
    fn test_display_uses_message() {
        let auth_err = AuthError::invalid_credentials();
        assert_eq!(auth_err.to_string(), "Invalid credentials");
    }
}
