//! Derived views over a loaded set of vacancies. Nothing here does I/O.

use crate::domain::model::{SalaryStats, Vacancy};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::cmp::Ordering;

pub const DEFAULT_VIEW_SIZE: usize = 3;

fn salary_key(vacancy: &Vacancy) -> (f64, f64) {
    (
        vacancy.salary_from.unwrap_or(0.0),
        vacancy.salary_to.unwrap_or(0.0),
    )
}

fn compare_salary(a: &Vacancy, b: &Vacancy) -> Ordering {
    let (a_from, a_to) = salary_key(a);
    let (b_from, b_to) = salary_key(b);
    a_from.total_cmp(&b_from).then(a_to.total_cmp(&b_to))
}

/// Stable sort on `(salary_from, salary_to)`, missing bounds counting as 0.
///
/// Equal keys keep their input order in both directions.
pub fn sort_by_salary_from(vacancies: &[Vacancy], descending: bool) -> Vec<Vacancy> {
    let mut sorted = vacancies.to_vec();
    if descending {
        sorted.sort_by(|a, b| compare_salary(b, a));
    } else {
        sorted.sort_by(compare_salary);
    }
    sorted
}

pub fn top_by_salary(vacancies: &[Vacancy], n: usize) -> Vec<Vacancy> {
    let mut sorted = sort_by_salary_from(vacancies, true);
    sorted.truncate(n);
    sorted
}

/// Newest first. ISO-8601 text sorts the same way as the instants it encodes.
pub fn most_recent(vacancies: &[Vacancy], n: usize) -> Vec<Vacancy> {
    let mut sorted = vacancies.to_vec();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sorted.truncate(n);
    sorted
}

pub fn random_sample(vacancies: &[Vacancy], n: usize) -> Vec<Vacancy> {
    random_sample_with(vacancies, n, &mut rand::rng())
}

/// Up to `n` distinct vacancies drawn uniformly without replacement.
pub fn random_sample_with<R: Rng + ?Sized>(
    vacancies: &[Vacancy],
    n: usize,
    rng: &mut R,
) -> Vec<Vacancy> {
    vacancies.choose_multiple(rng, n).cloned().collect()
}

pub fn summary_statistics(vacancies: &[Vacancy]) -> SalaryStats {
    let mut count_with_salary = 0;
    let mut salary_sum = 0.0;
    let mut max_salary = 0.0;
    let mut best_record: Option<&Vacancy> = None;

    for vacancy in vacancies {
        let salary = vacancy.effective_salary();
        if vacancy.has_salary() {
            count_with_salary += 1;
            salary_sum += salary;
        }

        // ties keep the earliest record
        if best_record.is_none() || salary > max_salary {
            max_salary = salary;
            best_record = Some(vacancy);
        }
    }

    let average_salary = (count_with_salary > 0).then(|| salary_sum / count_with_salary as f64);

    SalaryStats {
        count: vacancies.len(),
        count_with_salary,
        average_salary,
        max_salary,
        best_record: best_record.cloned(),
    }
}
