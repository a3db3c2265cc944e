use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Job board a vacancy was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "hh")]
    HeadHunter,
    #[serde(rename = "sj")]
    SuperJob,
}

impl Source {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::HeadHunter => "hh",
            Self::SuperJob => "sj",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hh" => Some(Self::HeadHunter),
            "sj" => Some(Self::SuperJob),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HeadHunter => "hh.ru",
            Self::SuperJob => "superjob.ru",
        }
    }
}

/// A vacancy in the shape shared by every board.
///
/// Serialized field names are the ones used in the per-keyword store file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vacancy {
    #[serde(rename = "api")]
    pub source: Source,
    pub employer: String,
    #[serde(rename = "name")]
    pub title: String,
    #[serde(rename = "alternate_url")]
    pub url: String,
    pub published_at: String,
    pub area: String,
    pub salary_from: Option<f64>,
    pub salary_to: Option<f64>,
    pub salary_currency: Option<String>,
}

impl Vacancy {
    /// Builds a vacancy from a normalized record mapping.
    ///
    /// Required keys: `api`, `employer`, `name`, `alternate_url`, `published_at`, `area`.
    /// Salary keys may be absent or null. The currency is dropped when neither
    /// bound is set.
    pub fn from_value(value: &Value) -> Result<Self> {
        let tag = required_str(value, "api")?;
        let source = Source::from_tag(tag).ok_or_else(|| EtlError::InvalidField {
            field: "api".to_string(),
            reason: format!("unknown source tag '{}'", tag),
        })?;

        let salary_from = optional_salary(value, "salary_from")?;
        let salary_to = optional_salary(value, "salary_to")?;
        let salary_currency = if salary_from.is_some() || salary_to.is_some() {
            value
                .get("salary_currency")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            source,
            employer: required_str(value, "employer")?.to_string(),
            title: required_str(value, "name")?.to_string(),
            url: required_str(value, "alternate_url")?.to_string(),
            published_at: required_str(value, "published_at")?.to_string(),
            area: required_str(value, "area")?.to_string(),
            salary_from,
            salary_to,
            salary_currency,
        })
    }

    pub fn has_salary(&self) -> bool {
        self.salary_from.is_some() || self.salary_to.is_some()
    }

    /// Single value used for ranking: the midpoint when both bounds are known,
    /// the known bound otherwise, 0 when there is none.
    pub fn effective_salary(&self) -> f64 {
        match (self.salary_from, self.salary_to) {
            (Some(from), Some(to)) => (from + to) / 2.0,
            (Some(from), None) => from,
            (None, Some(to)) => to,
            (None, None) => 0.0,
        }
    }

    pub fn salary_text(&self) -> String {
        if !self.has_salary() {
            return "salary unspecified".to_string();
        }

        let bound = |prefix: &str, amount: f64| match &self.salary_currency {
            Some(currency) => format!("{} {} {}", prefix, amount, currency),
            None => format!("{} {}", prefix, amount),
        };

        let parts: Vec<String> = [
            self.salary_from.map(|from| bound("from", from)),
            self.salary_to.map(|to| bound("to", to)),
        ]
        .into_iter()
        .flatten()
        .collect();

        parts.join(" ")
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  Employer: {}", self.employer)?;
        writeln!(f, "  Salary: {}", self.salary_text())?;
        writeln!(f, "  Area: {}", self.area)?;
        write!(f, "  Link: {}", self.url)
    }
}

fn required_str<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    match value.get(field) {
        None | Some(Value::Null) => Err(EtlError::MissingField {
            field: field.to_string(),
        }),
        Some(v) => v.as_str().ok_or_else(|| EtlError::InvalidField {
            field: field.to_string(),
            reason: format!("expected a string, got {}", v),
        }),
    }
}

fn optional_salary(value: &Value, field: &str) -> Result<Option<f64>> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => match v.as_f64() {
            Some(amount) if amount >= 0.0 => Ok(Some(amount)),
            _ => Err(EtlError::InvalidField {
                field: field.to_string(),
                reason: format!("expected a non-negative number, got {}", v),
            }),
        },
    }
}

/// Summary over a set of vacancies.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryStats {
    pub count: usize,
    pub count_with_salary: usize,
    /// `None` when no vacancy carries a salary.
    pub average_salary: Option<f64>,
    pub max_salary: f64,
    pub best_record: Option<Vacancy>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(from: Value, to: Value) -> Value {
        json!({
            "api": "hh",
            "employer": "Acme",
            "name": "Rust Developer",
            "alternate_url": "https://hh.ru/vacancy/1",
            "published_at": "2024-01-01T00:00:00+0300",
            "area": "Moscow",
            "salary_from": from,
            "salary_to": to,
            "salary_currency": "RUR"
        })
    }

    #[test]
    fn test_from_value_with_full_salary() {
        let vacancy = Vacancy::from_value(&raw(json!(1000), json!(2000))).unwrap();
        assert_eq!(vacancy.source, Source::HeadHunter);
        assert_eq!(vacancy.title, "Rust Developer");
        assert_eq!(vacancy.salary_from, Some(1000.0));
        assert_eq!(vacancy.salary_to, Some(2000.0));
        assert_eq!(vacancy.salary_currency.as_deref(), Some("RUR"));
    }

    #[test]
    fn test_from_value_drops_currency_without_bounds() {
        let vacancy = Vacancy::from_value(&raw(Value::Null, Value::Null)).unwrap();
        assert!(!vacancy.has_salary());
        assert_eq!(vacancy.salary_currency, None);
    }

    #[test]
    fn test_from_value_missing_required_field() {
        let mut value = raw(Value::Null, Value::Null);
        value.as_object_mut().unwrap().remove("employer");

        match Vacancy::from_value(&value) {
            Err(EtlError::MissingField { field }) => assert_eq!(field, "employer"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_from_value_rejects_negative_salary() {
        let result = Vacancy::from_value(&raw(json!(-5), Value::Null));
        assert!(matches!(result, Err(EtlError::InvalidField { .. })));
    }

    #[test]
    fn test_salary_text() {
        let both = Vacancy::from_value(&raw(json!(1000), json!(2000))).unwrap();
        assert_eq!(both.salary_text(), "from 1000 RUR to 2000 RUR");

        let only_to = Vacancy::from_value(&raw(Value::Null, json!(2000))).unwrap();
        assert_eq!(only_to.salary_text(), "to 2000 RUR");

        let none = Vacancy::from_value(&raw(Value::Null, Value::Null)).unwrap();
        assert_eq!(none.salary_text(), "salary unspecified");
    }

    #[test]
    fn test_display_includes_employer_area_and_link() {
        let vacancy = Vacancy::from_value(&raw(json!(1500), Value::Null)).unwrap();
        let text = vacancy.to_string();
        assert!(text.starts_with("Rust Developer\n"));
        assert!(text.contains("Employer: Acme"));
        assert!(text.contains("Salary: from 1500 RUR"));
        assert!(text.contains("Area: Moscow"));
        assert!(text.contains("Link: https://hh.ru/vacancy/1"));
    }

    #[test]
    fn test_effective_salary() {
        let both = Vacancy::from_value(&raw(json!(1000), json!(2000))).unwrap();
        let from_only = Vacancy::from_value(&raw(json!(3000), Value::Null)).unwrap();
        let none = Vacancy::from_value(&raw(Value::Null, Value::Null)).unwrap();
        assert_eq!(both.effective_salary(), 1500.0);
        assert_eq!(from_only.effective_salary(), 3000.0);
        assert_eq!(none.effective_salary(), 0.0);
    }

    #[test]
    fn test_serialized_field_names() {
        let vacancy = Vacancy::from_value(&raw(json!(1000), Value::Null)).unwrap();
        let value = serde_json::to_value(&vacancy).unwrap();
        assert_eq!(value["api"], "hh");
        assert_eq!(value["name"], "Rust Developer");
        assert_eq!(value["alternate_url"], "https://hh.ru/vacancy/1");
        assert_eq!(value["salary_to"], Value::Null);
    }
}
