use std::sync::Arc;

use mediflow::config::Config;
use mediflow::models::AppointmentStatus;
use mediflow::query::StatusFilter;
use mediflow::screen::{AppointmentScreen, Notice};
use mediflow::store::{HttpStore, RecordStore};
use mediflow::view;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;

    let mut args = std::env::args().skip(1);
    let filter = match args.next() {
        Some(s) => StatusFilter::parse(&s).ok_or_else(|| {
            anyhow::anyhow!("unknown status filter '{s}' (use all|scheduled|completed|cancelled)")
        })?,
        None => StatusFilter::All,
    };
    let search = args.next().unwrap_or_default();

    let store: Arc<dyn RecordStore> = Arc::new(HttpStore::new(cfg.store_url, cfg.api_token));

    tracing::info!("Loading appointment screen");
    let mut screen = AppointmentScreen::start(store, cfg.page_limit).await;
    screen.set_filter(filter).await;
    screen.set_search(&search).await;

    for notice in screen.take_notices() {
        match notice {
            Notice::Success(msg) => tracing::info!("{msg}"),
            Notice::Warning(msg) => tracing::warn!("{msg}"),
            Notice::Error(msg) => tracing::error!("{msg}"),
        }
    }

    let rows = screen.rows();
    if rows.is_empty() {
        println!("No appointments found");
        println!("{}", view::empty_message(screen.filter(), screen.search()));
        return Ok(());
    }

    let scheduled = rows
        .iter()
        .filter(|r| r.status == AppointmentStatus::Scheduled)
        .count();
    let completed = rows
        .iter()
        .filter(|r| r.status == AppointmentStatus::Completed)
        .count();
    let cancelled = rows
        .iter()
        .filter(|r| r.status == AppointmentStatus::Cancelled)
        .count();
    println!(
        "{} appointments ({scheduled} scheduled, {completed} completed, {cancelled} cancelled)\n",
        rows.len()
    );

    for row in &rows {
        let patient = if row.patient_code.is_empty() {
            row.patient.clone()
        } else {
            format!("{} ({})", row.patient, row.patient_code)
        };
        println!(
            "{} {}  {:<24} {:<22} {:<18} {:<20} {:<12} {}",
            row.date,
            row.time.format("%H:%M"),
            row.name,
            patient,
            row.department,
            row.doctor,
            row.appointment_type,
            view::status_label(row.status),
        );
    }

    Ok(())
}
