use serde::{Deserialize, Serialize};

/// Lifecycle state of a tenant, stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum TenantStatus {
    #[default]
    Active,
    Pending,
    Locked,
}

impl From<TenantStatus> for i32 {
    fn from(status: TenantStatus) -> Self {
        match status {
            TenantStatus::Active => 1,
            TenantStatus::Pending => 2,
            TenantStatus::Locked => 3,
        }
    }
}

impl TryFrom<i32> for TenantStatus {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(TenantStatus::Active),
            2 => Ok(TenantStatus::Pending),
            3 => Ok(TenantStatus::Locked),
            other => Err(format!("unknown tenant status: {other}")),
        }
    }
}

/// An isolated organization hosting its own board.
///
/// The tenant id is the partition key for every idea and comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i32,
    pub name: String,
    pub subdomain: String,
    pub invitation: String,
    pub welcome_message: String,
    pub cname: String,
    pub status: TenantStatus,
    pub is_private: bool,
    pub logo_blob_key: String,
    #[serde(skip)]
    pub custom_css: String,
}

impl Tenant {
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_serializes_camel_case_without_css() {
        let tenant = Tenant {
            id: 7,
            name: "Demo".to_string(),
            subdomain: "demo".to_string(),
            welcome_message: "Hi".to_string(),
            is_private: true,
            custom_css: "body { color: red }".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&tenant).unwrap();
        assert_eq!(json["welcomeMessage"], "Hi");
        assert_eq!(json["isPrivate"], true);
        assert_eq!(json["status"], 1);
        assert!(json.get("customCSS").is_none());
        assert!(json.get("customCss").is_none());
    }

    #[test]
    fn test_tenant_status_codes() {
        assert_eq!(TenantStatus::try_from(2), Ok(TenantStatus::Pending));
        assert_eq!(i32::from(TenantStatus::Locked), 3);
        assert!(TenantStatus::try_from(9).is_err());
    }
}
