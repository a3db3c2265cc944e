use clap::Parser;
use std::io::Write;
use vacancy_etl::app::{render_view, Menu, ReportView};
use vacancy_etl::config::Command;
use vacancy_etl::utils::error::ErrorSeverity;
use vacancy_etl::utils::{logger, validation::Validate};
use vacancy_etl::{AppConfig, CliConfig, EtlEngine, EtlError, LocalStorage, SearchPipeline, VacancyStore};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<(), EtlError> {
    cli.validate()?;
    let config = cli.app_config()?;
    let storage = LocalStorage::new(config.storage.data_dir.clone());
    let n_or_default = |n: Option<usize>| n.unwrap_or(config.fetch.sample_size);

    let (keyword, view) = match cli.command() {
        Command::Menu => {
            let stdin = std::io::stdin();
            let mut menu = Menu::new(stdin.lock(), std::io::stdout(), config.clone(), storage);
            return menu.run().await;
        }
        Command::Search { keyword } => return search(&keyword, &config, storage).await,
        Command::Stats { keyword } => (keyword, ReportView::Statistics),
        Command::Top { keyword, n } => (keyword, ReportView::Top(n_or_default(n))),
        Command::Recent { keyword, n } => (keyword, ReportView::Recent(n_or_default(n))),
        Command::Random { keyword, n } => (keyword, ReportView::Random(n_or_default(n))),
    };

    let vacancies = VacancyStore::new(storage).load(&keyword).await?;
    let mut stdout = std::io::stdout().lock();
    render_view(&mut stdout, &keyword, &vacancies, view)?;
    stdout.flush()?;
    Ok(())
}

async fn search(keyword: &str, config: &AppConfig, storage: LocalStorage) -> Result<(), EtlError> {
    let pipeline = SearchPipeline::from_config(keyword, config, storage)?;
    let engine = EtlEngine::new(pipeline);

    let output_path = engine.run().await?;
    println!("✅ Vacancies for '{}' saved to {}", keyword, output_path);
    Ok(())
}
