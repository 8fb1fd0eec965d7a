use clap::Parser;

use quizhub_server::{app_state::AppState, config::Config, db::Database, services::seed_service};

#[derive(Parser)]
#[command(name = "quizhub-seed")]
#[command(about = "Populate the quiz database with demo accounts and content", long_about = None)]
struct Cli {
    /// Drop the whole database before seeding
    #[arg(short = 'r', long)]
    reset: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        log::error!("Seeding failed: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> quizhub_server::errors::AppResult<()> {
    let config = Config::from_env()?;

    if cli.reset {
        let db = Database::connect(&config).await?;
        log::warn!("Dropping database {}", db.db_name());
        db.drop_database().await?;
    }

    let state = AppState::new(config).await?;

    let summary = seed_service::seed_demo_data(&state).await?;
    log::info!(
        "Seeded users {} and {}, quiz {} with {} questions, article {}",
        summary.admin,
        summary.user,
        summary.quiz_id,
        summary.questions,
        summary.article_id
    );

    let report = state.integrity_service.reconcile().await?;
    log::info!(
        "Reconciliation removed {} orphaned questions and {} dangling references",
        report.orphaned_questions,
        report.dangling_references
    );

    Ok(())
}
