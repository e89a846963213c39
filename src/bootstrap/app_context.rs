use std::sync::Arc;

use crate::application::ports::order_repository::OrderRepository;
use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::session_repository::SessionRepository;
use crate::application::ports::stock_repository::StockRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    product_repo: Arc<dyn ProductRepository>,
    order_repo: Arc<dyn OrderRepository>,
    stock_repo: Arc<dyn StockRepository>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        product_repo: Arc<dyn ProductRepository>,
        order_repo: Arc<dyn OrderRepository>,
        stock_repo: Arc<dyn StockRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            product_repo,
            order_repo,
            stock_repo,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn session_repo(&self) -> Arc<dyn SessionRepository> {
        self.services.session_repo.clone()
    }

    pub fn product_repo(&self) -> Arc<dyn ProductRepository> {
        self.services.product_repo.clone()
    }

    pub fn order_repo(&self) -> Arc<dyn OrderRepository> {
        self.services.order_repo.clone()
    }

    pub fn stock_repo(&self) -> Arc<dyn StockRepository> {
        self.services.stock_repo.clone()
    }
}
