//! Request field validation shared across handlers.

use animetoken_core::ApiError;
use animetoken_wallet::is_plausible_payment_signature;

pub const NICKNAME_MIN: usize = 3;
pub const NICKNAME_MAX: usize = 15;
pub const BIO_MAX: usize = 500;

/// Server-side nickname rule: 3–15 ASCII alphanumerics, nothing else.
/// Stricter than the client help text on purpose; see the regression test.
pub fn validate_nickname(nickname: &str) -> Result<(), ApiError> {
    let len = nickname.chars().count();
    if len < NICKNAME_MIN || len > NICKNAME_MAX {
        return Err(ApiError::Validation(format!(
            "nickname must be {NICKNAME_MIN}-{NICKNAME_MAX} characters"
        )));
    }
    if !nickname.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::Validation(
            "nickname may contain only letters and digits".into(),
        ));
    }
    Ok(())
}

pub fn validate_bio(bio: &str) -> Result<(), ApiError> {
    if bio.chars().count() > BIO_MAX {
        return Err(ApiError::Validation(format!(
            "bio must be at most {BIO_MAX} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    });
    if !valid {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    Ok(())
}

/// Two-valued toggle action carried in like/follow request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Add,
    Remove,
}

pub fn parse_action(action: &str, add: &str, remove: &str) -> Result<ToggleAction, ApiError> {
    if action == add {
        Ok(ToggleAction::Add)
    } else if action == remove {
        Ok(ToggleAction::Remove)
    } else {
        Err(ApiError::Validation(format!(
            "action must be \"{add}\" or \"{remove}\""
        )))
    }
}

/// The first-change-free / pay-to-change rule, applied per profile field.
///
/// `unlocked == false` means the free first change is still available. Once
/// consumed, every further change needs a plausible transaction signature.
pub fn check_unlock(unlocked: bool, transaction_signature: Option<&str>) -> Result<(), ApiError> {
    if !unlocked {
        return Ok(());
    }
    match transaction_signature {
        Some(sig) if is_plausible_payment_signature(sig) => Ok(()),
        Some(_) => Err(ApiError::Validation(
            "transaction signature has an invalid format".into(),
        )),
        None => Err(ApiError::Validation(
            "changing this field again requires a payment transaction signature".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_nickname_rejected() {
        assert!(validate_nickname("ab").is_err());
        assert!(validate_nickname("abc").is_ok());
    }

    #[test]
    fn long_nickname_rejected() {
        assert!(validate_nickname("abcdefghijklmno").is_ok()); // 15 chars
        assert!(validate_nickname("abcdefghijklmnop").is_err()); // 16 chars
    }

    // The dialog copy promises periods and underscores; the server rule is
    // alphanumeric-only. This test pins the server behavior.
    #[test]
    fn valid_name_with_period_rejected() {
        assert!(validate_nickname("Valid_Name.1").is_err());
        assert!(validate_nickname("ValidName1").is_ok());
    }

    #[test]
    fn nickname_rejects_spaces_and_unicode() {
        assert!(validate_nickname("a b c").is_err());
        assert!(validate_nickname("さくら123").is_err());
    }

    #[test]
    fn bio_length_capped() {
        assert!(validate_bio(&"x".repeat(BIO_MAX)).is_ok());
        assert!(validate_bio(&"x".repeat(BIO_MAX + 1)).is_err());
        assert!(validate_bio("").is_ok());
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("fan@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@.com").is_err());
    }

    #[test]
    fn action_parsing() {
        assert_eq!(parse_action("like", "like", "unlike").unwrap(), ToggleAction::Add);
        assert_eq!(parse_action("unlike", "like", "unlike").unwrap(), ToggleAction::Remove);
        assert!(parse_action("toggle", "like", "unlike").is_err());
    }

    #[test]
    fn first_change_is_free() {
        assert!(check_unlock(false, None).is_ok());
    }

    #[test]
    fn later_changes_need_a_signature() {
        let err = check_unlock(true, None).unwrap_err();
        assert_eq!(err.code(), "validation_error");
        assert!(check_unlock(true, Some("")).is_err());
        assert!(check_unlock(true, Some("not base58!")).is_err());
    }

    #[test]
    fn later_changes_accept_simulated_signatures() {
        assert!(check_unlock(true, Some("test_sig_12345")).is_ok());
        assert!(check_unlock(true, Some("sim_payment_1")).is_ok());
    }
}
