use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Configuration of a tenant's custom OAuth identity provider.
///
/// `Serialize` never writes the full client secret; see [`OAuthConfig::redacted_secret`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthConfig {
    pub id: i32,
    pub provider: String,
    pub display_name: String,
    pub logo_blob_key: String,
    pub status: i32,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub profile_url: String,
    pub scope: String,
    pub json_user_id_path: String,
    pub json_user_name_path: String,
    pub json_user_email_path: String,
}

impl OAuthConfig {
    /// First and last three characters of the secret, or `...` for short secrets.
    pub fn redacted_secret(&self) -> String {
        let chars: Vec<char> = self.client_secret.chars().collect();
        if chars.len() < 10 {
            return "...".to_string();
        }
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 3..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl Serialize for OAuthConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("OAuthConfig", 14)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("provider", &self.provider)?;
        s.serialize_field("displayName", &self.display_name)?;
        s.serialize_field("logoBlobKey", &self.logo_blob_key)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("clientID", &self.client_id)?;
        s.serialize_field("clientSecret", &self.redacted_secret())?;
        s.serialize_field("authorizeURL", &self.authorize_url)?;
        s.serialize_field("tokenURL", &self.token_url)?;
        s.serialize_field("profileURL", &self.profile_url)?;
        s.serialize_field("scope", &self.scope)?;
        s.serialize_field("jsonUserIDPath", &self.json_user_id_path)?;
        s.serialize_field("jsonUserNamePath", &self.json_user_name_path)?;
        s.serialize_field("jsonUserEmailPath", &self.json_user_email_path)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> OAuthConfig {
        OAuthConfig {
            id: 1,
            provider: "_custom".to_string(),
            client_id: "client".to_string(),
            client_secret: secret.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_long_secret_is_redacted() {
        let config = config_with_secret("abcdefghijklmnop");
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["clientSecret"], "abc...nop");
        assert_eq!(json["clientID"], "client");
        assert_eq!(json["provider"], "_custom");
    }

    #[test]
    fn test_short_secret_is_fully_hidden() {
        assert_eq!(config_with_secret("123456789").redacted_secret(), "...");
        assert_eq!(config_with_secret("").redacted_secret(), "...");
        assert_eq!(config_with_secret("1234567890").redacted_secret(), "123...890");
    }

    #[test]
    fn test_serialized_json_never_contains_secret() {
        let secret = "super-secret-value-42";
        let body = serde_json::to_string(&config_with_secret(secret)).unwrap();
        assert!(!body.contains(secret));
    }
}
