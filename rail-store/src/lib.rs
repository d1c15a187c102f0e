pub mod app_config;
pub mod http_repo;

pub use app_config::Config;
pub use http_repo::HttpRouteRepository;
