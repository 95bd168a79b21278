//! Categories and sub-categories

use common::models::{Category, CategoryTree, SubCategory};
use common::{Error, Result};
use db::CategoryStore;
use tracing::info;
use uuid::Uuid;

use crate::guard::{Access, Caller};
use crate::validate::required_text;
use crate::{views, ModerationService};

const MAX_NAME_LEN: usize = 100;

impl ModerationService {
    /// Categories with their sub-categories, by name
    pub async fn list_categories(&self) -> Result<Vec<CategoryTree>> {
        let categories = self.store.list_categories().await?;
        let subs = self.store.list_sub_categories().await?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let sub_categories = subs
                    .iter()
                    .filter(|s| s.category_id == category.id)
                    .cloned()
                    .collect();
                CategoryTree {
                    category,
                    sub_categories,
                }
            })
            .collect())
    }

    pub async fn create_category(&self, caller: Option<&Caller>, name: &str) -> Result<Category> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let name = required_text("name", name, MAX_NAME_LEN)?;

        let category = self.store.insert_category(&name).await?;
        info!("Category '{}' created by {}", name, ctx.user_id);
        self.revalidator.invalidate(views::categories());
        Ok(category)
    }

    pub async fn update_category(
        &self,
        caller: Option<&Caller>,
        id: Uuid,
        name: &str,
    ) -> Result<Category> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let name = required_text("name", name, MAX_NAME_LEN)?;

        let category = self
            .store
            .rename_category(id, &name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", id)))?;
        info!("Category {} renamed to '{}' by {}", id, name, ctx.user_id);
        self.revalidator.invalidate(views::categories());
        Ok(category)
    }

    /// Also removes its sub-categories
    pub async fn delete_category(&self, caller: Option<&Caller>, id: Uuid) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Admin).await?;

        if !self.store.delete_category(id).await? {
            return Err(Error::NotFound(format!("Category {} not found", id)));
        }
        info!("Category {} deleted by {}", id, ctx.user_id);
        self.revalidator.invalidate(views::categories());
        Ok(())
    }

    pub async fn create_sub_category(
        &self,
        caller: Option<&Caller>,
        category_id: Uuid,
        name: &str,
    ) -> Result<SubCategory> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let name = required_text("name", name, MAX_NAME_LEN)?;

        if self.store.get_category(category_id).await?.is_none() {
            return Err(Error::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        let sub = self.store.insert_sub_category(category_id, &name).await?;
        info!(
            "Sub-category '{}' added to {} by {}",
            name, category_id, ctx.user_id
        );
        self.revalidator.invalidate(views::categories());
        Ok(sub)
    }

    pub async fn update_sub_category(
        &self,
        caller: Option<&Caller>,
        id: Uuid,
        name: &str,
    ) -> Result<SubCategory> {
        let ctx = self.guard.require(caller, Access::Admin).await?;
        let name = required_text("name", name, MAX_NAME_LEN)?;

        let sub = self
            .store
            .rename_sub_category(id, &name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Sub-category {} not found", id)))?;
        info!("Sub-category {} renamed to '{}' by {}", id, name, ctx.user_id);
        self.revalidator.invalidate(views::categories());
        Ok(sub)
    }

    pub async fn delete_sub_category(&self, caller: Option<&Caller>, id: Uuid) -> Result<()> {
        let ctx = self.guard.require(caller, Access::Admin).await?;

        if !self.store.delete_sub_category(id).await? {
            return Err(Error::NotFound(format!("Sub-category {} not found", id)));
        }
        info!("Sub-category {} deleted by {}", id, ctx.user_id);
        self.revalidator.invalidate(views::categories());
        Ok(())
    }
}
