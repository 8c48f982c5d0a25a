mod args;

use std::sync::Arc;

use loyalty_core::money::format_ars;
use services::tier_service::duplicate_thresholds;
use services::{
    AdminSession, AppServices, AuthorizationCheck, Clock, CustomerDashboard, StaticPin,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{AdminAction, Args, ArgsError, Backend, Command, ProcessEnv, print_usage};

const BAR_WIDTH: usize = 20;

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}] {percent}%", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn print_dashboard(dashboard: &CustomerDashboard) {
    let customer = &dashboard.customer;
    println!("{} (cuenta {})", customer.name(), customer.id());
    println!("Compras de {}: {}", dashboard.month_label, dashboard.spend_label());
    println!("{}", progress_bar(dashboard.progress.progress_percent));
    println!("{}", dashboard.headline());
    println!();
    for status in &dashboard.progress.tier_statuses {
        let mark = if status.achieved { "x" } else { " " };
        println!(
            "  [{mark}] {:>14}  {}",
            format_ars(status.tier.threshold),
            status.tier.description
        );
    }
}

async fn open_services(
    backend: &Backend,
    check: Arc<dyn AuthorizationCheck>,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    match backend {
        Backend::Sqlite(db_url) => {
            // Open + migrate SQLite at startup; the file must exist first.
            let fresh = prepare_sqlite_file(db_url)?;
            info!(db = %db_url, fresh, "opening sqlite storage");
            let app = AppServices::new_sqlite(db_url, clock, check).await?;
            // A brand-new database starts with the demo data.
            if fresh && app.seed_if_empty().await? {
                info!("demo data loaded into new database");
            }
            Ok(app)
        }
        Backend::Remote { .. } => {
            let config = backend
                .remote_config()
                .ok_or_else(|| std::io::Error::other("remote backend without config"))?;
            info!(url = %config.base_url, "using remote table storage");
            Ok(AppServices::new_remote(config, clock, check)?)
        }
    }
}

async fn run_admin(
    session: &AdminSession,
    action: AdminAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AdminAction::Customers { query } => {
            let customers = session
                .customers()
                .search(query.as_deref().unwrap_or(""))
                .await?;
            if customers.is_empty() {
                println!("Sin clientes.");
            }
            for c in customers {
                println!(
                    "{:<8} {:<32} {:>14}",
                    c.id().as_str(),
                    c.name(),
                    format_ars(c.monthly_spend())
                );
            }
        }
        AdminAction::AddCustomer {
            account,
            name,
            spend,
        } => {
            let added = session.customers().add(&account, &name, spend).await?;
            println!("Cliente {} agregado.", added.id());
        }
        AdminAction::UpdateCustomer { id, name, spend } => {
            let updated = session.customers().update(&id, &name, spend).await?;
            println!(
                "Cliente {} actualizado: {}",
                updated.id(),
                format_ars(updated.monthly_spend())
            );
        }
        AdminAction::Bump { id, delta } => {
            let updated = session.customers().adjust_spend(&id, delta).await?;
            println!(
                "Cliente {}: compras del mes {}",
                updated.id(),
                format_ars(updated.monthly_spend())
            );
        }
        AdminAction::RemoveCustomer { id } => {
            session.customers().remove(&id).await?;
            println!("Cliente {id} eliminado.");
        }
        AdminAction::Tiers => {
            let records = session.tiers().list().await?;
            if records.is_empty() {
                println!("Sin beneficios configurados.");
            }
            for record in &records {
                println!(
                    "#{:<4} {:>14}  {}",
                    record.id.value(),
                    format_ars(record.tier.threshold),
                    record.tier.description
                );
            }
            for threshold in duplicate_thresholds(&records) {
                eprintln!("aviso: varios beneficios con el umbral {}", format_ars(threshold));
            }
        }
        AdminAction::AddTier { tier } => {
            let tiers = session.tiers();
            let record = match tier {
                Some((threshold, description)) => tiers.add(threshold, description).await?,
                None => tiers.add_placeholder().await?,
            };
            println!("Beneficio #{} agregado.", record.id);
        }
        AdminAction::UpdateTier {
            id,
            threshold,
            description,
        } => {
            session.tiers().update(id, threshold, description).await?;
            println!("Beneficio #{id} actualizado.");
        }
        AdminAction::RemoveTier { id } => {
            session.tiers().remove(id).await?;
            println!("Beneficio #{id} eliminado.");
        }
        AdminAction::Export { out } => {
            let csv = session.export_customers_csv().await?;
            let path = out.unwrap_or_else(|| csv.file_name.clone().into());
            std::fs::write(&path, csv.contents.as_bytes())?;
            println!("Exportado a {}", path.display());
        }
        AdminAction::ResetDemo => {
            session.reset_demo().await?;
            println!("Datos de demostración restaurados.");
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), &ProcessEnv).map_err(|e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let check: Arc<dyn AuthorizationCheck> = Arc::new(StaticPin::new(parsed.admin_pin.clone()));
    let app = open_services(&parsed.backend, check).await?;

    match parsed.command {
        Command::Help => {}
        Command::Seed => {
            if app.seed_if_empty().await? {
                println!("Datos de demostración cargados.");
            } else {
                println!("La base ya tiene datos; no se modificó.");
            }
        }
        Command::Login { account } => {
            let dashboard = app.portal().login(&account).await?;
            print_dashboard(&dashboard);
        }
        Command::Admin { pin, action } => {
            let session = app.admin().unlock(pin.as_deref().unwrap_or(""))?;
            run_admin(&session, action).await?;
        }
    }
    Ok(())
}

/// Creates the database file if needed. Returns whether the database is new.
fn prepare_sqlite_file(db_url: &str) -> Result<bool, Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.contains("mode=memory") {
        return Ok(true);
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if path.exists() {
        return Ok(false);
    }
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    Ok(true)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // Binary glue: report once.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
