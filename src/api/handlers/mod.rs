use crate::application::ServiceDependencies;

pub mod books;
pub mod members;
pub mod orders;
pub mod rentals;
pub mod venue;

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}
