use config::Config;
use user::UserService;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod result;
pub mod router;
pub mod routes;
pub mod user;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserService,
}
