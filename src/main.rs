use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use property_desk::api::{ApiClient, ApiError, ListingSource, Poller};
use property_desk::compare::{self, render_html, ComparisonSet, ComparisonTable, PdfExporter};
use property_desk::config::AppConfig;
use property_desk::models::{self, ApplicantId, JobId, Property, PropertyId};
use property_desk::pricing::{PriceBucket, SearchParams};
use property_desk::schedule::{parse_reference, RescheduleForm, RescheduleWindow};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "property-desk", about = "Browse, compare and export property listings")]
struct Args {
    /// Override the backend base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Only list properties in this price range ("<100K", "100K-1M", ...)
    #[arg(long)]
    price_range: Option<PriceBucket>,

    /// Property ids to compare, in order (defaults to the first three listed)
    #[arg(long, value_delimiter = ',')]
    compare: Vec<i64>,

    /// Also print the comparison to PDF
    #[arg(long)]
    pdf: bool,

    /// Show the reschedule window for this interview date-time
    #[arg(long)]
    reschedule: Option<String>,

    /// List the applicants of this job with their reschedule status
    #[arg(long)]
    applicants: Option<i64>,

    /// Job the applicant flags below refer to
    #[arg(long)]
    job: Option<i64>,

    /// Ask to move this applicant's interview to --date and --time
    #[arg(long, requires_all = ["job", "date", "time"])]
    request_reschedule: Option<i64>,

    /// New interview date (YYYY-MM-DD), a weekday inside the window
    #[arg(long)]
    date: Option<NaiveDate>,

    /// New interview time (HH:MM), within office hours
    #[arg(long)]
    time: Option<String>,

    /// Keep polling the backend for listing changes until Ctrl+C
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = AppConfig::from_env();

    let args = Args::parse();
    if let Some(url) = args.api_url.clone() {
        config.api_base_url = url;
    }

    info!("🏠 Property Desk");
    info!("Backend: {}", config.api_base_url);

    let client = ApiClient::new(&config)?;
    let properties = load_properties(&client).await;

    let search = SearchParams {
        bucket: args.price_range,
        ..SearchParams::default()
    };
    let listed = search.filter(&properties);
    info!("Showing {} of {} properties", listed.len(), properties.len());

    for (i, property) in listed.iter().enumerate() {
        println!("{}. {} ({})", i + 1, property.name, property.price);
        println!("   Price range: {}", property.price_bucket());
        println!("   Location: {}", property.location);
        if !property.listing_types.0.is_empty() {
            println!("   Listing: {}", property.listing_types.joined());
        }
        let summary = property.summary();
        if !summary.is_empty() {
            println!("   {}", summary);
        }
        println!();
    }

    export_comparison(&config, &args, &properties, &listed).await?;

    if let Some(raw) = &args.reschedule {
        print_reschedule_window(raw);
    }

    if let Some(job_id) = args.applicants {
        print_applicants(&client, JobId(job_id)).await?;
    }

    if let (Some(applicant_id), Some(job_id), Some(date), Some(time)) =
        (args.request_reschedule, args.job, args.date, args.time.as_deref())
    {
        request_reschedule(&client, JobId(job_id), ApplicantId(applicant_id), date, time).await?;
    }

    if args.watch {
        watch_listings(client, &config).await?;
    }

    Ok(())
}

async fn load_properties(client: &ApiClient) -> Vec<Property> {
    match client.fetch_properties().await {
        Ok(properties) => properties,
        Err(err) => {
            warn!("Could not load listings from {}: {}", client.source_name(), err);
            info!("Using built-in sample listings...");
            models::sample_properties()
        }
    }
}

async fn export_comparison(
    config: &AppConfig,
    args: &Args,
    properties: &[Property],
    listed: &[&Property],
) -> Result<()> {
    let mut set = ComparisonSet::new();
    set.on_empty(|| info!("Comparison closed"));

    let picks: Vec<PropertyId> = if args.compare.is_empty() {
        listed.iter().map(|p| p.id).collect()
    } else {
        args.compare.iter().copied().map(PropertyId).collect()
    };

    let capped = set.select_all(picks);
    if !args.compare.is_empty() {
        for id in capped {
            info!("Comparison holds at most {} listings, skipping {}", compare::MAX_COMPARE, id);
        }
    }

    if !set.open() {
        info!("Nothing to compare");
        return Ok(());
    }

    let table = ComparisonTable::build(&set, properties);
    if table.is_empty() {
        warn!("None of the selected ids are listed");
        return Ok(());
    }

    tokio::fs::create_dir_all(&config.export_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.export_dir.display()))?;
    let stem = compare::export::export_stem(&table);

    let json_path = config.export_dir.join(format!("{}.json", stem));
    let json = serde_json::to_string_pretty(&table).context("Failed to serialize comparison")?;
    tokio::fs::write(&json_path, json)
        .await
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let html_path = config.export_dir.join(format!("{}.html", stem));
    tokio::fs::write(&html_path, render_html(&table))
        .await
        .with_context(|| format!("Failed to write {}", html_path.display()))?;
    info!("💾 Saved comparison to {} and {}", json_path.display(), html_path.display());

    if args.pdf {
        let exporter = PdfExporter::new(&config.export_dir)?;
        exporter.export(&table)?;
    }

    Ok(())
}

fn print_reschedule_window(raw: &str) {
    let reference = match parse_reference(raw) {
        Ok(reference) => reference,
        Err(err) => {
            warn!("{}", err);
            println!("Reschedule window unavailable");
            return;
        }
    };

    let Some(window) = RescheduleWindow::from_reference(reference) else {
        warn!("No weekdays left after {}", reference);
        println!("Reschedule window unavailable");
        return;
    };

    println!(
        "Reschedule window for {}: {} to {}",
        reference.format("%a %Y-%m-%d %H:%M"),
        window.min_date.format("%a %Y-%m-%d"),
        window.max_date.format("%a %Y-%m-%d")
    );
    for date in window.selectable_dates() {
        println!("   {}", date.format("%a %Y-%m-%d"));
    }
}

async fn print_applicants(client: &ApiClient, job_id: JobId) -> Result<()> {
    let jobs = client.fetch_jobs().await?;
    let title = jobs
        .iter()
        .find(|job| job.id == job_id)
        .map(|job| job.title.as_str())
        .unwrap_or("unknown job");

    let applicants = client
        .fetch_applicants(job_id)
        .await
        .with_context(|| format!("Failed to load applicants for job {}", job_id))?;
    info!("{} applicants for {} ({})", applicants.len(), title, job_id);

    for applicant in &applicants {
        let form = RescheduleForm::for_applicant(applicant);
        let reschedule = match form.window() {
            _ if form.is_submitted() => "reschedule already requested".to_string(),
            Some(window) => format!("may reschedule {} to {}", window.min_date, window.max_date),
            None => "no interview scheduled".to_string(),
        };
        println!("{} <{}> {:?}: {}", applicant.name, applicant.email, applicant.status, reschedule);
    }

    Ok(())
}

async fn request_reschedule(
    client: &ApiClient,
    job_id: JobId,
    applicant_id: ApplicantId,
    date: NaiveDate,
    time: &str,
) -> Result<()> {
    let applicant = client.find_applicant(job_id, applicant_id).await?;
    let mut form = RescheduleForm::for_applicant(&applicant);

    form.select_date(date)
        .with_context(|| format!("Cannot move {}'s interview to {}", applicant.name, date))?;
    form.select_time(time)
        .with_context(|| format!("Cannot move {}'s interview to {}", applicant.name, time))?;

    let request = client.submit_form(&mut form).await?;
    println!(
        "Reschedule requested for {}: {}",
        applicant.name,
        request.requested_at.format("%a %Y-%m-%d %H:%M")
    );

    Ok(())
}

async fn watch_listings(client: ApiClient, config: &AppConfig) -> Result<()> {
    let client = Arc::new(client);

    let poller = Poller::start("listings", config.poll_interval, move || {
        let client = client.clone();
        async move {
            let properties = client.fetch_properties().await?;
            info!("{} listings on {}", properties.len(), client.source_name());
            Ok::<(), ApiError>(())
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Stopping...");
    poller.stop().await;

    Ok(())
}
