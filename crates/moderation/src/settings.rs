//! CMS settings (banner, theme, footer, feature flags)

use common::models::{Setting, SettingsSnapshot};
use common::Result;
use db::SettingsStore;
use tracing::info;

use crate::guard::{Access, Caller};
use crate::validate::config_key;
use crate::{views, ModerationService};

impl ModerationService {
    pub async fn list_settings(&self) -> Result<Vec<Setting>> {
        self.store.list_settings().await
    }

    /// Read all settings once; handlers get the snapshot as a parameter
    pub async fn settings_snapshot(&self) -> Result<SettingsSnapshot> {
        Ok(SettingsSnapshot::from_settings(
            self.store.list_settings().await?,
        ))
    }

    pub async fn upsert_setting(
        &self,
        caller: Option<&Caller>,
        key: &str,
        value: serde_json::Value,
    ) -> Result<Setting> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let key = config_key(key)?;

        let setting = self.store.upsert_setting(&key, &value).await?;
        info!("Setting {} updated by {}", key, ctx.user_id);
        self.revalidator.invalidate(views::settings());
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::Harness;
    use common::Error;
    use serde_json::json;

    #[tokio::test]
    async fn test_admin_upsert_shows_in_snapshot() {
        let h = Harness::new().await;
        let admin = h.admin().await;

        h.service
            .upsert_setting(Some(&admin), "banner_text", json!("Spring drive!"))
            .await
            .unwrap();
        h.service
            .upsert_setting(Some(&admin), "banner_text", json!("Summer drive!"))
            .await
            .unwrap();

        let snapshot = h.service.settings_snapshot().await.unwrap();
        assert_eq!(snapshot.get_str("banner_text"), Some("Summer drive!"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(h.invalidation_count(), 2);
    }

    #[tokio::test]
    async fn test_moderator_cannot_change_settings() {
        let h = Harness::new().await;
        let moderator = h.moderator().await;

        let err = h
            .service
            .upsert_setting(Some(&moderator), "theme", json!({"primary": "#0a0"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        assert!(h.service.list_settings().await.unwrap().is_empty());
    }
}
