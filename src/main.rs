use clap::Parser;
use leaderboard_harvest::config::{Credentials, HarvestConfig};
use leaderboard_harvest::error::{EmitError, HarvestError};
use leaderboard_harvest::pipeline::Interrupt;
use leaderboard_harvest::report::{self, ReportSink};
use leaderboard_harvest::summarize::{AzureSummarizer, Summarizer};
use leaderboard_harvest::{Harvest, collect_headlines};
use std::error::Error;
use std::process::ExitCode;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    };
    config.apply_env_overrides();

    match args.command() {
        Command::Run => {
            let credentials = Credentials::from_env()?;
            ::log::debug!("Loaded {:?}", credentials);
            run_harvest(config).await
        }
        Command::Headlines { urls, summarize } => {
            let credentials = Credentials::from_env()?;
            let urls = if urls.is_empty() {
                config.headline_urls.clone()
            } else {
                urls
            };
            run_headlines(&config, &credentials, &urls, summarize || config.summarize).await
        }
        Command::Validate { payload } => {
            let raw = std::fs::read_to_string(&payload)?;
            let sink = ReportSink::new(&config.output_path);
            match report::validate_and_emit(&raw, config.top_n, &sink) {
                Ok(report) => {
                    println!("{}", report::to_canonical_json(&report)?);
                    Ok(())
                }
                Err(e) => Err(report_emit_failure(e)),
            }
        }
    }
}

async fn run_harvest(config: HarvestConfig) -> Result<(), Box<dyn Error>> {
    ::log::info!("Starting leaderboard harvest");
    println!("Note: harvesting requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using {}",
        config.webdriver_url
    );

    let interrupt = Interrupt::new();
    interrupt.listen_for_ctrl_c();

    let output_path = config.output_path.clone();
    match Harvest::new(config).with_interrupt(interrupt).run().await {
        Ok(report) => {
            println!("\n--- FINAL REPORT ---");
            println!("{}", report::to_canonical_json(&report)?);
            println!("\nReport saved to {}", output_path.display());
            Ok(())
        }
        Err(HarvestError::Emit(e)) => Err(report_emit_failure(e)),
        Err(e) => Err(e.into()),
    }
}

/// Prints the raw payload of a failed validation so nothing gathered is lost
fn report_emit_failure(error: EmitError) -> Box<dyn Error> {
    if let EmitError::Invalid(invalid) = &error {
        println!("\nFailed to validate the final result. Raw output below:");
        println!("{}", invalid.raw_payload);
    }
    error.into()
}

async fn run_headlines(
    config: &HarvestConfig,
    credentials: &Credentials,
    urls: &[String],
    summarize: bool,
) -> Result<(), Box<dyn Error>> {
    let summarizer = if summarize {
        Some(AzureSummarizer::new(credentials, config)?)
    } else {
        None
    };

    let digest = collect_headlines(
        config,
        urls,
        summarizer.as_ref().map(|s| s as &dyn Summarizer),
    )
    .await?;

    println!("\n--- News Headlines ---");
    for headline in &digest.headlines {
        println!("{} {}", headline.time, headline.text);
    }
    println!("--- End of Headlines (found {}) ---", digest.headlines.len());

    match digest.summary {
        Some(Ok(summary)) => {
            println!("\n--- Summary ---");
            println!("{}", summary);
        }
        Some(Err(e)) => ::log::error!("Summarization failed: {}", e),
        None if summarize => ::log::warn!("No headlines to summarize"),
        None => {}
    }
    Ok(())
}
