pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{HeadHunterSource, LocalStorage, SuperJobSource};
pub use core::{etl::EtlEngine, pipeline::SearchPipeline, store::VacancyStore};
pub use domain::model::{SalaryStats, Source, Vacancy};
pub use utils::error::{EtlError, Result};
