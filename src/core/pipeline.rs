use crate::adapters::{HeadHunterSource, SuperJobSource};
use crate::config::AppConfig;
use crate::core::store::VacancyStore;
use crate::domain::model::Vacancy;
use crate::domain::ports::{Pipeline, Storage, VacancySource};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;

/// Searches every configured board for one keyword and saves the combined list.
pub struct SearchPipeline<S: Storage> {
    keyword: String,
    sources: Vec<Box<dyn VacancySource>>,
    store: VacancyStore<S>,
    pages_count: usize,
}

impl<S: Storage> SearchPipeline<S> {
    pub fn new(keyword: impl Into<String>, store: VacancyStore<S>, pages_count: usize) -> Self {
        Self {
            keyword: keyword.into(),
            sources: Vec::new(),
            store,
            pages_count,
        }
    }

    /// Pipeline over the boards enabled in `config`.
    ///
    /// SuperJob is left out with a warning when no API key is configured.
    pub fn from_config(keyword: &str, config: &AppConfig, storage: S) -> Result<Self> {
        let mut pipeline = Self::new(keyword, VacancyStore::new(storage), config.fetch.pages_count);

        if config.headhunter.enabled {
            pipeline.add_source(HeadHunterSource::new(keyword, config.headhunter.clone())?);
        }

        if config.superjob.enabled {
            match validate_required_field("superjob.api_key", &config.superjob.api_key) {
                Ok(_) => {
                    pipeline.add_source(SuperJobSource::new(keyword, config.superjob.clone())?)
                }
                Err(e) => tracing::warn!("Skipping superjob.ru: {}", e),
            }
        }

        Ok(pipeline)
    }

    pub fn add_source(&mut self, source: impl VacancySource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for SearchPipeline<S> {
    async fn extract(&self) -> Result<Vec<Vacancy>> {
        let mut vacancies = Vec::new();

        for source in &self.sources {
            let found = source.fetch_all(self.pages_count).await;
            tracing::info!(
                "{} returned {} vacancies for '{}'",
                source.source().display_name(),
                found.len(),
                self.keyword
            );
            vacancies.extend(found);
        }

        Ok(vacancies)
    }

    async fn load(&self, vacancies: Vec<Vacancy>) -> Result<String> {
        self.store.save(&self.keyword, &vacancies).await
    }
}
