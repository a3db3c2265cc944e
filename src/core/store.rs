use crate::domain::model::Vacancy;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Keyword-scoped persistence: one JSON array of vacancies per keyword.
///
/// Every save replaces the keyword's file in full.
pub struct VacancyStore<S: Storage> {
    storage: S,
}

impl<S: Storage> VacancyStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes `vacancies` in the given order and returns where they went.
    pub async fn save(&self, keyword: &str, vacancies: &[Vacancy]) -> Result<String> {
        let file_name = file_name(keyword);
        let location = self.storage.describe(&file_name);
        let data = serde_json::to_vec_pretty(vacancies)?;

        tracing::debug!("Writing {} vacancies ({} bytes) to {}", vacancies.len(), data.len(), location);
        self.storage
            .write_file(&file_name, &data)
            .await
            .map_err(|e| match e {
                EtlError::IoError(source) => EtlError::Persistence {
                    path: location.clone(),
                    source,
                },
                other => other,
            })?;

        Ok(location)
    }

    pub async fn load(&self, keyword: &str) -> Result<Vec<Vacancy>> {
        let file_name = file_name(keyword);
        let data = self.storage.read_file(&file_name).await.map_err(|e| match e {
            EtlError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                EtlError::NotFound {
                    keyword: keyword.to_string(),
                }
            }
            other => other,
        })?;

        let corrupt = |message: String| EtlError::CorruptData {
            keyword: keyword.to_string(),
            message,
        };

        let document: Value =
            serde_json::from_slice(&data).map_err(|e| corrupt(format!("invalid JSON: {}", e)))?;
        let Value::Array(records) = document else {
            return Err(corrupt("expected a list of vacancies".to_string()));
        };

        let vacancies = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                Vacancy::from_value(record).map_err(|e| corrupt(format!("record {}: {}", index, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Loaded {} vacancies for '{}'", vacancies.len(), keyword);
        Ok(vacancies)
    }
}

/// File name for a keyword: title-cased, with path-unsafe characters replaced.
pub fn file_name(keyword: &str) -> String {
    let sanitized: String = title_case(keyword.trim())
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        "_.json".to_string()
    } else {
        format!("{}.json", sanitized)
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}
