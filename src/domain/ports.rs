use crate::domain::model::{Source, Vacancy};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Location of `path` as shown to the user.
    fn describe(&self, path: &str) -> String;
}

/// A job board that can be queried page by page.
///
/// Implementors only know how to issue one request and how to map one raw
/// item; pagination, error tolerance and progress logging live in
/// [`VacancySource::fetch_all`].
#[async_trait]
pub trait VacancySource: Send + Sync {
    fn source(&self) -> Source;

    /// Raw items of one result page, unwrapped from the board's envelope.
    async fn fetch_page(&self, page: usize) -> Result<Vec<Value>>;

    fn normalize(&self, raw: &Value) -> Result<Vacancy>;

    /// Fetches pages `0..pages_count` in order and normalizes every item.
    ///
    /// A failed page counts as empty. The first empty page ends the fetch.
    async fn fetch_all(&self, pages_count: usize) -> Vec<Vacancy> {
        let name = self.source().display_name();
        let mut vacancies = Vec::new();

        for page in 0..pages_count {
            let items = match self.fetch_page(page).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("({}) page {} failed: {}", name, page + 1, e);
                    Vec::new()
                }
            };

            tracing::info!("({}) page {}: {} vacancies", name, page + 1, items.len());

            if items.is_empty() {
                break;
            }

            for raw in &items {
                match self.normalize(raw) {
                    Ok(vacancy) => vacancies.push(vacancy),
                    Err(e) => tracing::warn!("({}) skipping malformed vacancy: {}", name, e),
                }
            }
        }

        vacancies
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Vacancy>>;
    async fn load(&self, vacancies: Vec<Vacancy>) -> Result<String>;
}
