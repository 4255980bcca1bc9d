use crate::domain::{MenuId, MenuItem};
use crate::ports::{MenuRepository, Result};
use async_trait::async_trait;

use super::{InMemoryStore, sorted_by};

#[async_trait]
impl MenuRepository for InMemoryStore {
    async fn get_by_id(&self, menu_id: MenuId) -> Result<Option<MenuItem>> {
        Ok(self.lock()?.menus.get(&menu_id).cloned())
    }

    async fn list(&self) -> Result<Vec<MenuItem>> {
        let state = self.lock()?;
        Ok(sorted_by(state.menus.values().cloned(), |m| m.name.clone()))
    }

    async fn save(&self, menu_item: &MenuItem) -> Result<()> {
        self.lock()?.menus.insert(menu_item.menu_id, menu_item.clone());
        Ok(())
    }
}
