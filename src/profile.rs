use crate::error::AuthError;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// The signed-in user's self-reported attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,

    /// Areas the user asked for help with; biases every turn prompt
    #[serde(rename = "expectations", alias = "focus_areas", default)]
    pub focus_areas: Vec<String>,

    #[serde(default)]
    pub onboarding_completed: bool,

    #[serde(default)]
    pub theme_preference: Option<String>,
}

/// Partial update of user preferences
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesPatch {
    pub focus_areas: Option<Vec<String>>,
    pub theme_preference: Option<String>,
    pub onboarding_completed: Option<bool>,
}

/// Identity/profile collaborator contract
#[async_trait::async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn current_user(&self) -> Result<Profile, AuthError>;

    async fn update_preferences(&self, patch: PreferencesPatch) -> Result<Profile, AuthError>;
}

/// Profile held in memory, seeded from configuration.
///
/// `None` models a signed-out user.
pub struct StaticProfileProvider {
    profile: RwLock<Option<Profile>>,
}

impl StaticProfileProvider {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            profile: RwLock::new(None),
        }
    }
}

#[async_trait::async_trait]
impl ProfileProvider for StaticProfileProvider {
    async fn current_user(&self) -> Result<Profile, AuthError> {
        self.profile
            .read()
            .await
            .clone()
            .ok_or(AuthError::NotAuthenticated)
    }

    async fn update_preferences(&self, patch: PreferencesPatch) -> Result<Profile, AuthError> {
        let mut guard = self.profile.write().await;
        let profile = guard.as_mut().ok_or(AuthError::NotAuthenticated)?;

        if let Some(focus_areas) = patch.focus_areas {
            profile.focus_areas = focus_areas;
        }
        if let Some(theme) = patch.theme_preference {
            profile.theme_preference = Some(theme);
        }
        if let Some(done) = patch.onboarding_completed {
            profile.onboarding_completed = done;
        }

        info!("Profile preferences updated");
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signed_out_user_is_auth_error() {
        let provider = StaticProfileProvider::signed_out();
        assert!(matches!(
            provider.current_user().await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_update_focus_areas() {
        let provider = StaticProfileProvider::new(Profile::default());
        let updated = provider
            .update_preferences(PreferencesPatch {
                focus_areas: Some(vec!["stress".to_string()]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.focus_areas, vec!["stress"]);
        assert_eq!(provider.current_user().await.unwrap().focus_areas, vec!["stress"]);
    }

    #[test]
    fn test_expectations_field_name() {
        let profile: Profile =
            serde_json::from_str(r#"{"expectations": ["anxiety", "sleep"]}"#).unwrap();
        assert_eq!(profile.focus_areas, vec!["anxiety", "sleep"]);
    }
}
