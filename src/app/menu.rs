use crate::app::render::{render_view, ReportView};
use crate::config::AppConfig;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::SearchPipeline;
use crate::core::store::VacancyStore;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

const REPORT_MENU: &str = "\
1 - Statistics
2 - Top vacancies by salary
3 - Most recent vacancies
4 - Feeling lucky
9 - Back
0 - Exit";

enum Next {
    NewKeyword,
    Exit,
}

/// Interactive loop: ask for a keyword, search and save, then offer reports
/// on the saved file until the user goes back or exits.
pub struct Menu<R, W, S> {
    input: R,
    output: W,
    config: AppConfig,
    storage: S,
}

impl<R: BufRead, W: Write, S: Storage + Clone> Menu<R, W, S> {
    pub fn new(input: R, output: W, config: AppConfig, storage: S) -> Self {
        Self {
            input,
            output,
            config,
            storage,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let Some(keyword) = self.prompt("Enter a search keyword:")? else {
                return Ok(());
            };
            if keyword.is_empty() {
                continue;
            }

            if !self.search(&keyword).await? {
                continue;
            }

            match self.report_loop(&keyword).await? {
                Next::NewKeyword => continue,
                Next::Exit => return Ok(()),
            }
        }
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn search(&mut self, keyword: &str) -> Result<bool> {
        let pipeline = SearchPipeline::from_config(keyword, &self.config, self.storage.clone())?;
        let engine = EtlEngine::new(pipeline);

        match engine.run().await {
            Ok(location) => {
                writeln!(self.output, "Vacancies saved to {}", location)?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Search for '{}' failed: {}", keyword, e);
                writeln!(self.output, "{}", e.user_friendly_message())?;
                Ok(false)
            }
        }
    }

    async fn report_loop(&mut self, keyword: &str) -> Result<Next> {
        let n = self.config.fetch.sample_size;

        loop {
            let Some(command) = self.prompt(REPORT_MENU)? else {
                return Ok(Next::Exit);
            };

            let view = match command.as_str() {
                "0" => return Ok(Next::Exit),
                "9" => return Ok(Next::NewKeyword),
                "1" => ReportView::Statistics,
                "2" => ReportView::Top(n),
                "3" => ReportView::Recent(n),
                "4" => ReportView::Random(n),
                other => {
                    writeln!(self.output, "Unknown command: {}", other)?;
                    continue;
                }
            };

            let store = VacancyStore::new(self.storage.clone());
            match store.load(keyword).await {
                Ok(vacancies) => render_view(&mut self.output, keyword, &vacancies, view)?,
                Err(e) => {
                    tracing::error!("Loading '{}' failed: {}", keyword, e);
                    writeln!(self.output, "{}", e.user_friendly_message())?;
                }
            }
        }
    }
}
