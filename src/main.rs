use anyhow::Context;
use clap::Parser;
use sitemap_indexer::core::host::parse_domain_list;
use sitemap_indexer::utils::text::{preview, sanitize_campaign_name};
use sitemap_indexer::utils::validation::{parse_days, Validate};
use sitemap_indexer::utils::logger;
use sitemap_indexer::{
    read_url_list, BatchOutcome, Cli, Command, DomainOrchestrator, DomainReport,
    HttpCampaignClient, HttpSitemapFetcher, IndexerConfig, IndexerError, OrchestratorSettings,
};

const EXIT_OK: i32 = 0;
const EXIT_FAILURES: i32 = 1;
const EXIT_INVALID: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            match e.downcast_ref::<IndexerError>() {
                Some(indexer_error) => {
                    eprintln!("❌ {}", indexer_error);
                    eprintln!("💡 {}", indexer_error.recovery_suggestion());
                    if indexer_error.is_user_error() {
                        EXIT_INVALID
                    } else {
                        EXIT_FAILURES
                    }
                }
                None => {
                    eprintln!("❌ {:#}", e);
                    EXIT_FAILURES
                }
            }
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = IndexerConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            config.apply_env_overrides();
            config
        }
        None => IndexerConfig::from_env(),
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    if cli.needs_api() {
        config.validate_for_submission()?;
    } else {
        config.validate()?;
    }
    tracing::debug!("Effective config: {:?}", redacted(&config));

    let fetcher = HttpSitemapFetcher::new(&config.crawler)?;
    let api = HttpCampaignClient::new(&config.api)?;
    let orchestrator = DomainOrchestrator::new(fetcher, api, OrchestratorSettings::from(&config));

    match &cli.command {
        Command::Crawl { domain } => {
            let found = orchestrator.collect_domain_urls(domain).await?;
            if cli.json {
                let output = serde_json::json!({
                    "host": found.host,
                    "entry_points": found.entry_points,
                    "summary": found.crawl.summary,
                    "urls": found.crawl.page_urls,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for url in &found.crawl.page_urls {
                    println!("{}", url);
                }
                eprintln!(
                    "📊 {}: {} entry point(s), {} URL(s)",
                    found.host,
                    found.entry_points.len(),
                    found.crawl.page_urls.len()
                );
            }
            Ok(if found.crawl.page_urls.is_empty() {
                EXIT_FAILURES
            } else {
                EXIT_OK
            })
        }

        Command::Index {
            domain,
            days,
            campaign,
        } => {
            let days = parse_days(days)?;
            let base = campaign_base(campaign.as_deref());
            let report = orchestrator.run_domain(domain, &base, days).await;
            print_reports(std::slice::from_ref(&report), cli.json)?;
            Ok(if report.is_completed() && all_succeeded(&report.campaigns) {
                EXIT_OK
            } else {
                EXIT_FAILURES
            })
        }

        Command::IndexDomains {
            domains,
            days,
            campaign,
        } => {
            let days = parse_days(days)?;
            let domains = parse_domain_list(domains);
            if domains.is_empty() {
                return Err(IndexerError::invalid_input("no domain given").into());
            }
            let base = campaign_base(campaign.as_deref());
            let reports = orchestrator.run_domains(&domains, &base, days).await;
            print_reports(&reports, cli.json)?;
            let ok = reports
                .iter()
                .all(|r| r.is_completed() && all_succeeded(&r.campaigns));
            Ok(if ok { EXIT_OK } else { EXIT_FAILURES })
        }

        Command::SubmitFile {
            path,
            days,
            campaign,
        } => {
            let days = parse_days(days)?;
            let urls = read_url_list(path)?;
            if urls.is_empty() {
                return Err(IndexerError::invalid_input(format!(
                    "no http/https URL found in {}",
                    path
                ))
                .into());
            }
            let base = campaign_base(campaign.as_deref());
            let outcomes = orchestrator.submit_urls(&base, days, urls).await;
            print_outcomes(&outcomes, cli.json)?;
            Ok(if all_succeeded(&outcomes) {
                EXIT_OK
            } else {
                EXIT_FAILURES
            })
        }
    }
}

fn campaign_base(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => sanitize_campaign_name(name),
        _ => format!("index_{}", chrono::Local::now().format("%Y%m%d")),
    }
}

fn all_succeeded(outcomes: &[BatchOutcome]) -> bool {
    outcomes.iter().all(BatchOutcome::is_success)
}

fn redacted(config: &IndexerConfig) -> IndexerConfig {
    let mut config = config.clone();
    if !config.api.api_key.is_empty() {
        config.api.api_key = "***".to_string();
    }
    config
}

fn print_outcomes(outcomes: &[BatchOutcome], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
        return Ok(());
    }

    println!("Created {} campaign(s):", outcomes.len());
    for outcome in outcomes {
        println!("{}", outcome_line(outcome, 1200));
    }
    Ok(())
}

fn print_reports(reports: &[DomainReport], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    for report in reports {
        match report.error() {
            Some(error) => println!("• {} | ❌ {}", report.input, error),
            None => {
                println!(
                    "• {} | ✅ URLs: {} | Campaigns: {}",
                    report.input,
                    report.url_count,
                    report.campaigns.len()
                );
                if report.crawl.truncated {
                    println!("    (depth limit reached, URL list may be partial)");
                }
            }
        }
        for outcome in &report.campaigns {
            println!("    {}", outcome_line(outcome, 800));
        }
    }
    Ok(())
}

fn outcome_line(outcome: &BatchOutcome, max_chars: usize) -> String {
    let mark = if outcome.is_success() { "✅" } else { "❌" };
    let status = outcome
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "- {} {} | HTTP {} | {}",
        mark,
        outcome.name,
        status,
        preview(&outcome.detail(), max_chars)
    )
}
