use crate::core::report;
use crate::domain::model::Vacancy;
use std::io::{self, Write};

/// One of the reports a user can ask for on a saved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportView {
    Statistics,
    Top(usize),
    Recent(usize),
    Random(usize),
}

pub fn render_view<W: Write>(
    out: &mut W,
    keyword: &str,
    vacancies: &[Vacancy],
    view: ReportView,
) -> io::Result<()> {
    if vacancies.is_empty() {
        return writeln!(out, "No vacancies saved for '{}'.", keyword);
    }

    match view {
        ReportView::Statistics => render_statistics(out, keyword, vacancies),
        ReportView::Top(n) => render_list(out, &report::top_by_salary(vacancies, n)),
        ReportView::Recent(n) => render_list(out, &report::most_recent(vacancies, n)),
        ReportView::Random(n) => {
            writeln!(out, "Try these vacancies, you are bound to get lucky:")?;
            render_list(out, &report::random_sample(vacancies, n))
        }
    }
}

fn render_statistics<W: Write>(out: &mut W, keyword: &str, vacancies: &[Vacancy]) -> io::Result<()> {
    let stats = report::summary_statistics(vacancies);
    let average = match stats.average_salary {
        Some(average) => format!("{:.2}", average),
        None => "n/a".to_string(),
    };

    writeln!(out, "Keyword: {}", keyword)?;
    writeln!(out, "Vacancies loaded: {}", stats.count)?;
    writeln!(out, "Vacancies with salary: {}", stats.count_with_salary)?;
    writeln!(out, "Average salary: {}", average)?;
    writeln!(out, "Max salary: {}", stats.max_salary)?;

    if let Some(best) = &stats.best_record {
        writeln!(out)?;
        writeln!(out, "Best vacancy:")?;
        render_list(out, std::slice::from_ref(best))?;
    }
    Ok(())
}

fn render_list<W: Write>(out: &mut W, vacancies: &[Vacancy]) -> io::Result<()> {
    for vacancy in vacancies {
        writeln!(out, "{}", vacancy)?;
        writeln!(out)?;
    }
    Ok(())
}
