//! Complaint Intake CLI - Main Entry Point
//!
//! Registers reporter profiles with the intake server, files complaints
//! (classified through the shared workflow), keeps them in a local store and
//! shows the analysis result.

mod logic;
pub mod constants;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use intake_core::{ClassifierConfig, ComplaintClassifier, ComplaintSubmission, ComplaintType};
use logic::api_client::{ApiConfig, IntakeApiClient, ProfileOutcome, ProfileRequest, ProfileView};
use logic::device::DeviceFingerprint;
use logic::intake;
use logic::report;
use logic::store::{ComplaintStore, Reporter};

#[derive(Parser)]
#[command(name = "intake", version, about = "Report cybercrime complaints and view their analysis")]
struct Cli {
    /// Intake server base URL [env: INTAKE_API_URL]
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Classifier endpoint for local analysis [env: ML_API_URL]
    #[arg(long, global = true)]
    ml_url: Option<String>,

    /// Directory holding the local complaint store [env: INTAKE_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a reporter profile
    Profile(ProfileArgs),
    /// Look up a registered profile by email
    Lookup { email: String },
    /// File a complaint and show its analysis
    Submit(SubmitArgs),
    /// List complaints stored on this machine
    List,
    /// Show the analysis of a stored complaint
    Show { id: String },
    /// List the complaint types offered by the intake form
    Types,
    /// Check the intake server
    Health,
}

#[derive(Args)]
struct ReporterArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
}

impl From<ReporterArgs> for Reporter {
    fn from(args: ReporterArgs) -> Self {
        Reporter {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
        }
    }
}

#[derive(Args)]
struct ProfileArgs {
    #[command(flatten)]
    reporter: ReporterArgs,
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=150))]
    age: Option<i32>,
    #[arg(long, value_parser = ["male", "female", "other", "prefer-not-to-say"])]
    gender: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    occupation: Option<String>,
    #[arg(long)]
    organization: Option<String>,
}

#[derive(Args)]
struct SubmitArgs {
    #[command(flatten)]
    reporter: ReporterArgs,
    /// Complaint type, e.g. "Phishing" (see `intake types`)
    #[arg(long = "type")]
    complaint_type: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    description: String,
    /// Incident date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Evidence capture to forward to the classifier
    #[arg(long)]
    file_path: Option<String>,
    /// Let the intake server classify instead of calling the classifier directly
    #[arg(long)]
    remote: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let cli = Cli::parse();
    let store = ComplaintStore::new(cli.data_dir.unwrap_or_else(constants::get_data_dir));
    let api_url = cli.api_url.unwrap_or_else(constants::get_api_url);
    let ml_url = cli.ml_url.unwrap_or_else(constants::get_classifier_url);

    match cli.command {
        Command::Profile(args) => {
            let api = api_client(api_url)?;
            let outcome = api.register_profile(&profile_request(args)).await?;
            match &outcome {
                ProfileOutcome::Created(_) => println!("Profile created."),
                ProfileOutcome::Existing(_) => println!("A profile with this email already exists."),
            }
            print_profile(outcome.profile());
        }
        Command::Lookup { email } => {
            let api = api_client(api_url)?;
            match api.find_profile_by_email(&email).await? {
                Some(profile) => print_profile(&profile),
                None => println!("No profile registered for {}", email),
            }
        }
        Command::Submit(args) => {
            let remote = args.remote;
            let (reporter, submission) = complaint(args);

            if let ComplaintType::Unlisted(label) = &submission.complaint_type {
                log::warn!("'{}' is not one of the listed complaint types", label);
            }

            let record = if remote {
                let api = api_client(api_url)?;
                intake::submit_remote(&api, &store, reporter, submission).await?
            } else {
                let config = ClassifierConfig::new(ml_url, Duration::from_secs(constants::get_classifier_timeout()));
                let classifier = ComplaintClassifier::new(config)
                    .context("Failed to initialize classifier client")?;
                intake::submit_local(&classifier, &store, reporter, submission).await?
            };

            if let Some(verdict) = &record.ml_result {
                print!("{}", report::render_result(verdict, Some(&record.id)));
            }
            log::info!("Complaint stored in {}", store.path().display());
        }
        Command::List => {
            print!("{}", report::render_list(&store.load()?));
        }
        Command::Show { id } => {
            let record = store.find(&id)?
                .with_context(|| format!("No stored complaint with id {}", id))?;
            match &record.ml_result {
                Some(verdict) => print!("{}", report::render_result(verdict, Some(&record.id))),
                None => println!("Complaint {} is still {}", record.id, record.status.as_str()),
            }
        }
        Command::Types => {
            for complaint_type in ComplaintType::LISTED {
                let marker = if complaint_type.is_known_threat() { "*" } else { " " };
                println!("{} {}", marker, complaint_type);
            }
            println!("\n* treated as high-risk when the classifier is unavailable");
        }
        Command::Health => {
            let api = api_client(api_url)?;
            let health = api.health_check().await?;
            println!(
                "{} v{} at {} (classifier fallbacks: {})",
                health.status, health.version, health.timestamp, health.classifier_fallbacks
            );
        }
    }

    Ok(())
}

fn api_client(server_url: String) -> anyhow::Result<IntakeApiClient> {
    let config = ApiConfig {
        server_url: server_url.trim_end_matches('/').to_string(),
        ..ApiConfig::default()
    };
    Ok(IntakeApiClient::new(config)?)
}

fn profile_request(args: ProfileArgs) -> ProfileRequest {
    ProfileRequest {
        full_name: args.reporter.full_name,
        email: args.reporter.email,
        phone: args.reporter.phone,
        age: args.age,
        gender: args.gender,
        address: args.address,
        city: args.city,
        state: args.state,
        occupation: args.occupation,
        organization: args.organization,
    }
    .without_blanks()
}

fn complaint(args: SubmitArgs) -> (Reporter, ComplaintSubmission) {
    let mut submission = ComplaintSubmission::new(
        ComplaintType::from_label(&args.complaint_type),
        args.subject,
        args.description,
    )
    .with_device_info(DeviceFingerprint::collect().into_device_info());

    if let Some(date) = args.date {
        submission = submission.with_incident_date(date);
    }
    if let Some(path) = args.file_path {
        submission = submission.with_file_path(path);
    }

    (args.reporter.into(), submission)
}

fn print_profile(profile: &ProfileView) {
    println!("  ID:           {}", profile.id);
    println!("  Name:         {}", profile.full_name);
    println!("  Email:        {}", profile.email);
    println!("  Phone:        {}", profile.phone);
    if let Some(age) = profile.age {
        println!("  Age:          {}", age);
    }
    if let Some(gender) = &profile.gender {
        println!("  Gender:       {}", gender);
    }
    let place: Vec<&str> = [profile.city.as_deref(), profile.state.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !place.is_empty() {
        println!("  Location:     {}", place.join(", "));
    }
    if let Some(org) = &profile.organization {
        println!("  Organization: {}", org);
    }
    println!("  Registered:   {}", profile.created_at.format("%Y-%m-%d %H:%M UTC"));
}
