pub mod etl;
pub mod pipeline;
pub mod report;
pub mod store;

pub use crate::domain::model::{SalaryStats, Source, Vacancy};
pub use crate::domain::ports::{Pipeline, Storage, VacancySource};
pub use crate::utils::error::Result;
