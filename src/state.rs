use crate::{assets::AssetCache, store::RowStore};

#[derive(Clone)]
pub struct AppState {
    pub store: RowStore,
    pub assets: AssetCache,
}
