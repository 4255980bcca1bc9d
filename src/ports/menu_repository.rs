use crate::domain::{MenuId, MenuItem};
use async_trait::async_trait;

use super::Result;

/// メニューリポジトリポート
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn get_by_id(&self, menu_id: MenuId) -> Result<Option<MenuItem>>;

    async fn list(&self) -> Result<Vec<MenuItem>>;

    async fn save(&self, menu_item: &MenuItem) -> Result<()>;
}
