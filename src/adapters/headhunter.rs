use crate::adapters::{check_status, unwrap_envelope};
use crate::config::HeadHunterConfig;
use crate::domain::model::{Source, Vacancy};
use crate::domain::ports::VacancySource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// hh.ru vacancy search.
///
/// Items nest the employer, area and salary under sub-objects; `salary` is
/// `null` when the employer did not publish one. Timestamps are already ISO-8601.
pub struct HeadHunterSource {
    keyword: String,
    config: HeadHunterConfig,
    client: Client,
}

impl HeadHunterSource {
    pub fn new(keyword: impl Into<String>, config: HeadHunterConfig) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent.as_str()).build()?;
        Ok(Self {
            keyword: keyword.into(),
            config,
            client,
        })
    }

    fn query(&self, page: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", page.to_string()),
            ("per_page", self.config.per_page.to_string()),
            ("text", self.keyword.clone()),
            ("archived", "false".to_string()),
        ];
        if let Some(area) = &self.config.area {
            params.push(("area", area.clone()));
        }
        params
    }
}

#[async_trait]
impl VacancySource for HeadHunterSource {
    fn source(&self) -> Source {
        Source::HeadHunter
    }

    async fn fetch_page(&self, page: usize) -> Result<Vec<Value>> {
        tracing::debug!("Requesting {} page {}", self.config.endpoint, page);
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query(page))
            .send()
            .await?;

        check_status(&response, self.source())?;
        let body: Value = response.json().await?;
        unwrap_envelope(body, "items", self.source())
    }

    fn normalize(&self, raw: &Value) -> Result<Vacancy> {
        let salary = raw.get("salary").filter(|s| !s.is_null());
        let salary_field = |key: &str| salary.and_then(|s| s.get(key)).cloned().unwrap_or(Value::Null);

        let record = json!({
            "api": Source::HeadHunter.tag(),
            "employer": raw.pointer("/employer/name"),
            "name": raw.get("name"),
            "alternate_url": raw.get("alternate_url"),
            "published_at": raw.get("published_at"),
            "area": raw.pointer("/area/name"),
            "salary_from": salary_field("from"),
            "salary_to": salary_field("to"),
            "salary_currency": salary_field("currency"),
        });

        Vacancy::from_value(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use httpmock::prelude::*;

    fn hh_item(id: u32, salary: Value) -> Value {
        json!({
            "id": id.to_string(),
            "name": format!("Rust developer {}", id),
            "alternate_url": format!("https://hh.ru/vacancy/{}", id),
            "published_at": "2024-03-01T10:00:00+0300",
            "employer": {"id": "42", "name": "Yandex"},
            "area": {"id": "1", "name": "Москва"},
            "salary": salary
        })
    }

    fn config_for(server: &MockServer) -> HeadHunterConfig {
        HeadHunterConfig {
            endpoint: server.url("/vacancies/"),
            ..HeadHunterConfig::default()
        }
    }

    #[test]
    fn test_normalize_nested_salary() {
        let source = HeadHunterSource::new("rust", HeadHunterConfig::default()).unwrap();
        let raw = hh_item(1, json!({"from": 200000, "to": 300000, "currency": "RUR", "gross": false}));

        let vacancy = source.normalize(&raw).unwrap();

        assert_eq!(vacancy.source, Source::HeadHunter);
        assert_eq!(vacancy.employer, "Yandex");
        assert_eq!(vacancy.area, "Москва");
        assert_eq!(vacancy.published_at, "2024-03-01T10:00:00+0300");
        assert_eq!(vacancy.salary_from, Some(200000.0));
        assert_eq!(vacancy.salary_to, Some(300000.0));
        assert_eq!(vacancy.salary_currency.as_deref(), Some("RUR"));
    }

    #[test]
    fn test_normalize_null_salary() {
        let source = HeadHunterSource::new("rust", HeadHunterConfig::default()).unwrap();

        let vacancy = source.normalize(&hh_item(2, Value::Null)).unwrap();

        assert_eq!(vacancy.salary_from, None);
        assert_eq!(vacancy.salary_to, None);
        assert_eq!(vacancy.salary_currency, None);
    }

    #[test]
    fn test_normalize_single_bound() {
        let source = HeadHunterSource::new("rust", HeadHunterConfig::default()).unwrap();
        let raw = hh_item(3, json!({"from": null, "to": 150000, "currency": "RUR"}));

        let vacancy = source.normalize(&raw).unwrap();

        assert_eq!(vacancy.salary_from, None);
        assert_eq!(vacancy.salary_to, Some(150000.0));
        assert_eq!(vacancy.salary_currency.as_deref(), Some("RUR"));
    }

    #[test]
    fn test_normalize_missing_employer() {
        let source = HeadHunterSource::new("rust", HeadHunterConfig::default()).unwrap();
        let mut raw = hh_item(4, Value::Null);
        raw.as_object_mut().unwrap().remove("employer");

        assert!(matches!(
            source.normalize(&raw),
            Err(EtlError::MissingField { field }) if field == "employer"
        ));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_search_parameters() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/vacancies/")
                    .query_param("page", "2")
                    .query_param("per_page", "100")
                    .query_param("text", "rust developer")
                    .query_param("archived", "false")
                    .query_param("area", "1");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"items": [hh_item(1, Value::Null)], "found": 1, "pages": 1}));
            })
            .await;

        let source = HeadHunterSource::new("rust developer", config_for(&server)).unwrap();
        let items = source.fetch_page(2).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "1");
    }

    #[test]
    fn test_query_without_area_filter() {
        let config = HeadHunterConfig {
            area: None,
            ..HeadHunterConfig::default()
        };
        let source = HeadHunterSource::new("rust", config).unwrap();

        let params = source.query(0);

        assert!(params.iter().all(|(key, _)| *key != "area"));
        assert!(params.contains(&("archived", "false".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/vacancies/");
                then.status(500);
            })
            .await;

        let source = HeadHunterSource::new("rust", config_for(&server)).unwrap();

        match source.fetch_page(0).await {
            Err(EtlError::SourceUnavailable { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_error_page() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET).path("/vacancies/").query_param("page", "0");
                then.status(200)
                    .json_body(json!({"items": [hh_item(1, Value::Null), hh_item(2, Value::Null)]}));
            })
            .await;
        let failing = server
            .mock_async(|when, then| {
                when.method(GET).path("/vacancies/").query_param("page", "1");
                then.status(500);
            })
            .await;
        let never = server
            .mock_async(|when, then| {
                when.method(GET).path("/vacancies/").query_param("page", "2");
                then.status(200).json_body(json!({"items": [hh_item(3, Value::Null)]}));
            })
            .await;

        let source = HeadHunterSource::new("rust", config_for(&server)).unwrap();
        let vacancies = source.fetch_all(5).await;

        assert_eq!(vacancies.len(), 2);
        first.assert_async().await;
        failing.assert_async().await;
        assert_eq!(never.hits_async().await, 0);
    }
}
