use crate::adapters::{check_status, unwrap_envelope};
use crate::config::SuperJobConfig;
use crate::domain::model::{Source, Vacancy};
use crate::domain::ports::VacancySource;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::{json, Value};

const API_KEY_HEADER: &str = "x-api-app-id";
const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
/// hh.ru publishes in Moscow time; both boards must share one offset for
/// `published_at` text to order by instant.
const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;

/// superjob.ru vacancy search.
///
/// Items are flat: `payment_from` / `payment_to` are 0 when unspecified and
/// `date_published` is Unix epoch seconds.
pub struct SuperJobSource {
    keyword: String,
    config: SuperJobConfig,
    client: Client,
}

impl SuperJobSource {
    pub fn new(keyword: impl Into<String>, config: SuperJobConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value =
                HeaderValue::from_str(key).map_err(|e| EtlError::InvalidConfigValueError {
                    field: "superjob.api_key".to_string(),
                    value: "<redacted>".to_string(),
                    reason: e.to_string(),
                })?;
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            keyword: keyword.into(),
            config,
            client,
        })
    }

    fn query(&self, page: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", page.to_string()),
            ("count", self.config.count.to_string()),
            ("keyword", self.keyword.clone()),
            ("archive", "false".to_string()),
        ];
        if let Some(town) = self.config.town {
            params.push(("town", town.to_string()));
        }
        params
    }
}

#[async_trait]
impl VacancySource for SuperJobSource {
    fn source(&self) -> Source {
        Source::SuperJob
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
        unwrap_envelope(body, "objects", self.source())
    }

    fn normalize(&self, raw: &Value) -> Result<Vacancy> {
        let salary_from = payment(raw, "payment_from");
        let salary_to = payment(raw, "payment_to");
        let salary_currency = if salary_from.is_null() && salary_to.is_null() {
            Value::Null
        } else {
            raw.get("currency").cloned().unwrap_or(Value::Null)
        };

        let record = json!({
            "api": Source::SuperJob.tag(),
            "employer": raw.get("firm_name"),
            "name": raw.get("profession"),
            "alternate_url": raw.get("link"),
            "published_at": published_at(raw)?,
            "area": raw.pointer("/town/title"),
            "salary_from": salary_from,
            "salary_to": salary_to,
            "salary_currency": salary_currency,
        });

        Vacancy::from_value(&record)
    }
}

/// 0 and a missing field both mean "not specified".
fn payment(raw: &Value, key: &str) -> Value {
    match raw.get(key) {
        Some(v) if v.as_f64().is_some_and(|amount| amount > 0.0) => v.clone(),
        _ => Value::Null,
    }
}

fn published_at(raw: &Value) -> Result<String> {
    let value = match raw.get("date_published") {
        None | Some(Value::Null) => {
            return Err(EtlError::MissingField {
                field: "date_published".to_string(),
            })
        }
        Some(v) => v,
    };

    value
        .as_i64()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .zip(FixedOffset::east_opt(MOSCOW_OFFSET_SECS))
        .map(|(dt, offset)| dt.with_timezone(&offset).format(PUBLISHED_AT_FORMAT).to_string())
        .ok_or_else(|| EtlError::InvalidField {
            field: "date_published".to_string(),
            reason: format!("expected Unix epoch seconds, got {}", value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn sj_item(id: u32, from: u64, to: u64) -> Value {
        json!({
            "id": id,
            "profession": format!("Backend developer {}", id),
            "firm_name": "SuperSoft",
            "link": format!("https://www.superjob.ru/vakansii/{}.html", id),
            "date_published": 1704067200,
            "town": {"id": 4, "title": "Москва"},
            "payment_from": from,
            "payment_to": to,
            "currency": "rub"
        })
    }

    fn source_with(config: SuperJobConfig) -> SuperJobSource {
        SuperJobSource::new("python", config).unwrap()
    }

    #[test]
    fn test_normalize_converts_epoch_to_iso() {
        let source = source_with(SuperJobConfig::default());

        let vacancy = source.normalize(&sj_item(1, 100000, 150000)).unwrap();

        assert_eq!(vacancy.source, Source::SuperJob);
        assert_eq!(vacancy.published_at, "2024-01-01T03:00:00+0300");
        assert_eq!(vacancy.employer, "SuperSoft");
        assert_eq!(vacancy.title, "Backend developer 1");
        assert_eq!(vacancy.area, "Москва");
        assert_eq!(vacancy.salary_from, Some(100000.0));
        assert_eq!(vacancy.salary_to, Some(150000.0));
        assert_eq!(vacancy.salary_currency.as_deref(), Some("rub"));
    }

    #[test]
    fn test_published_at_matches_headhunter_format() {
        let source = source_with(SuperJobConfig::default());
        let mut raw = sj_item(6, 0, 0);
        raw["date_published"] = json!(1709276399);

        let vacancy = source.normalize(&raw).unwrap();

        // 06:59:59Z falls on the same Moscow day, three hours later
        assert_eq!(vacancy.published_at, "2024-03-01T09:59:59+0300");
    }

    #[test]
    fn test_normalize_zero_payment_is_absent() {
        let source = source_with(SuperJobConfig::default());

        let vacancy = source.normalize(&sj_item(2, 0, 0)).unwrap();

        assert_eq!(vacancy.salary_from, None);
        assert_eq!(vacancy.salary_to, None);
        assert_eq!(vacancy.salary_currency, None);
        assert_eq!(vacancy.salary_text(), "salary unspecified");
    }

    #[test]
    fn test_normalize_single_bound_keeps_currency() {
        let source = source_with(SuperJobConfig::default());

        let vacancy = source.normalize(&sj_item(3, 0, 90000)).unwrap();

        assert_eq!(vacancy.salary_from, None);
        assert_eq!(vacancy.salary_to, Some(90000.0));
        assert_eq!(vacancy.salary_currency.as_deref(), Some("rub"));
    }

    #[test]
    fn test_normalize_missing_payment_fields() {
        let source = source_with(SuperJobConfig::default());
        let mut raw = sj_item(4, 0, 0);
        let obj = raw.as_object_mut().unwrap();
        obj.remove("payment_from");
        obj.remove("payment_to");

        let vacancy = source.normalize(&raw).unwrap();

        assert!(!vacancy.has_salary());
        assert_eq!(vacancy.salary_currency, None);
    }

    #[test]
    fn test_normalize_bad_timestamp() {
        let source = source_with(SuperJobConfig::default());
        let mut raw = sj_item(5, 0, 0);
        raw["date_published"] = json!("yesterday");

        assert!(matches!(
            source.normalize(&raw),
            Err(EtlError::InvalidField { field, .. }) if field == "date_published"
        ));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_key_and_parameters() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/2.0/vacancies/")
                    .header("x-api-app-id", "v3.r.test")
                    .query_param("page", "1")
                    .query_param("count", "20")
                    .query_param("keyword", "python")
                    .query_param("archive", "false")
                    .query_param("town", "4");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"objects": [sj_item(1, 0, 0), sj_item(2, 1, 2)], "total": 2, "more": false}));
            })
            .await;

        let source = source_with(SuperJobConfig {
            endpoint: server.url("/2.0/vacancies/"),
            api_key: Some("v3.r.test".to_string()),
            ..SuperJobConfig::default()
        });
        let items = source.fetch_page(1).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_page_forbidden() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/2.0/vacancies/");
                then.status(403).json_body(json!({"error": {"code": 403}}));
            })
            .await;

        let source = source_with(SuperJobConfig {
            endpoint: server.url("/2.0/vacancies/"),
            ..SuperJobConfig::default()
        });

        assert!(matches!(
            source.fetch_page(0).await,
            Err(EtlError::SourceUnavailable { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_empty_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/2.0/vacancies/").query_param("page", "0");
                then.status(200).json_body(json!({"objects": [sj_item(1, 50000, 0)]}));
            })
            .await;
        let empty = server
            .mock_async(|when, then| {
                when.method(GET).path("/2.0/vacancies/").query_param("page", "1");
                then.status(200).json_body(json!({"objects": []}));
            })
            .await;

        let source = source_with(SuperJobConfig {
            endpoint: server.url("/2.0/vacancies/"),
            town: None,
            ..SuperJobConfig::default()
        });
        let vacancies = source.fetch_all(10).await;

        assert_eq!(vacancies.len(), 1);
        assert_eq!(vacancies[0].salary_from, Some(50000.0));
        assert_eq!(empty.hits_async().await, 1);
    }
}
