use super::user::User;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum EmailVerificationKind {
    SignIn,
    SignUp,
    ChangeEmail,
    UserInvitation,
}

impl From<EmailVerificationKind> for i32 {
    fn from(kind: EmailVerificationKind) -> Self {
        match kind {
            EmailVerificationKind::SignIn => 1,
            EmailVerificationKind::SignUp => 2,
            EmailVerificationKind::ChangeEmail => 3,
            EmailVerificationKind::UserInvitation => 4,
        }
    }
}

impl TryFrom<i32> for EmailVerificationKind {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EmailVerificationKind::SignIn),
            2 => Ok(EmailVerificationKind::SignUp),
            3 => Ok(EmailVerificationKind::ChangeEmail),
            4 => Ok(EmailVerificationKind::UserInvitation),
            other => Err(format!("unknown email verification kind: {other}")),
        }
    }
}

/// Input for starting a new email verification process.
pub trait NewEmailVerification {
    fn email(&self) -> &str;
    fn name(&self) -> &str;
    fn user(&self) -> Option<&User>;
    fn kind(&self) -> EmailVerificationKind;
}

/// Invitation sent by an administrator to a not yet registered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInvitation {
    pub email: String,
    pub verification_key: String,
}

impl NewEmailVerification for UserInvitation {
    fn email(&self) -> &str {
        &self.email
    }

    // Invited users choose their own name on sign up
    fn name(&self) -> &str {
        ""
    }

    fn user(&self) -> Option<&User> {
        None
    }

    fn kind(&self) -> EmailVerificationKind {
        EmailVerificationKind::UserInvitation
    }
}

/// One-time verification record keyed by an opaque secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVerification {
    pub email: String,
    pub name: String,
    pub key: String,
    pub user_id: Option<i32>,
    pub kind: EmailVerificationKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl EmailVerification {
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Returns a 64 character alphanumeric key.
pub fn generate_secret_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_generate_secret_key() {
        let key = generate_secret_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(key, generate_secret_key());
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(i32::from(EmailVerificationKind::SignIn), 1);
        assert_eq!(i32::from(EmailVerificationKind::UserInvitation), 4);
        assert_eq!(EmailVerificationKind::try_from(3), Ok(EmailVerificationKind::ChangeEmail));
        assert!(EmailVerificationKind::try_from(5).is_err());
        assert_eq!(serde_json::to_value(EmailVerificationKind::SignUp).unwrap(), 2);
    }

    #[test]
    fn test_user_invitation() {
        let invitation = UserInvitation {
            email: "jon.snow@got.com".to_string(),
            verification_key: generate_secret_key(),
        };

        assert_eq!(invitation.email(), "jon.snow@got.com");
        assert_eq!(invitation.name(), "");
        assert!(invitation.user().is_none());
        assert_eq!(invitation.kind(), EmailVerificationKind::UserInvitation);
    }

    #[test]
    fn test_verification_expiry() {
        let now = Utc::now();
        let mut verification = EmailVerification {
            email: "arya@got.com".to_string(),
            name: "Arya".to_string(),
            key: generate_secret_key(),
            user_id: None,
            kind: EmailVerificationKind::SignIn,
            created_at: now,
            expires_at: now + Duration::minutes(30),
            verified_at: None,
        };

        assert!(!verification.is_verified());
        assert!(!verification.is_expired(now));
        assert!(verification.is_expired(now + Duration::hours(1)));

        verification.verified_at = Some(now);
        assert!(verification.is_verified());
    }
}
