pub mod app_config;
pub mod database;
pub mod tour_repo;

pub use database::DbClient;
pub use tour_repo::StoreTourRepository;
