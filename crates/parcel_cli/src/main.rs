//! Command-line driver for the parcel tracker.
//!
//! # Responsibility
//! - Open a tracker database file and run the registration/tracking
//!   walkthrough through `ParcelService`.
//! - Map the positional argument and environment onto core config.
//!
//! Usage: `parcel_cli [DB_PATH]` (default `tracker.db`).
//! `PARCEL_LOG_DIR` and `PARCEL_LOG_LEVEL` override logging defaults.

use log::error;
use parcel_core::db::open_db;
use parcel_core::{
    default_log_level, init_logging, ClientId, ParcelNumber, ParcelService, ParcelStore,
    RepoResult, SqliteParcelStore,
};
use std::error::Error;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "tracker.db";
const DEMO_CLIENT: ClientId = 1;

fn main() -> ExitCode {
    if let Err(err) = setup_logging() {
        eprintln!("warning: logging disabled: {err}");
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() -> Result<(), String> {
    let level =
        std::env::var("PARCEL_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
    let log_dir = match std::env::var("PARCEL_LOG_DIR") {
        Ok(dir) => dir,
        Err(_) => std::env::temp_dir()
            .join("parcel_tracker")
            .join("logs")
            .to_string_lossy()
            .into_owned(),
    };
    init_logging(&level, &log_dir)
}

fn run(db_path: &str) -> Result<(), Box<dyn Error>> {
    let conn = open_db(db_path)?;
    let service = ParcelService::new(SqliteParcelStore::new(&conn));

    let parcel = service.register(DEMO_CLIENT, "Pskov, Sadovaya st. 5")?;
    println!(
        "registered parcel #{} for client {} to `{}` at {}",
        parcel.number, parcel.client, parcel.address, parcel.created_at
    );

    service.change_address(parcel.number, "Saratov, Lenina st. 12")?;
    println!(
        "address of #{} is now `{}`",
        parcel.number,
        service.store().get(parcel.number)?.address
    );

    if let Some(status) = service.next_status(parcel.number)? {
        println!("parcel #{} moved to `{status}`", parcel.number);
    }

    print_client_parcels(&service, DEMO_CLIENT)?;

    service.delete(parcel.number)?;
    report_presence(&service, parcel.number)?;

    let spare = service.register(DEMO_CLIENT, "Tver, Mira st. 3")?;
    service.delete(spare.number)?;
    report_presence(&service, spare.number)?;

    Ok(())
}

fn print_client_parcels<S: ParcelStore>(
    service: &ParcelService<S>,
    client: ClientId,
) -> RepoResult<()> {
    let parcels = service.client_parcels(client)?;
    println!("client {client} has {} parcel(s):", parcels.len());
    for parcel in parcels {
        println!(
            "  #{} status={} address=`{}` created_at={}",
            parcel.number, parcel.status, parcel.address, parcel.created_at
        );
    }
    Ok(())
}

fn report_presence<S: ParcelStore>(
    service: &ParcelService<S>,
    number: ParcelNumber,
) -> RepoResult<()> {
    match service.store().get(number) {
        Ok(parcel) => println!(
            "parcel #{number} kept (status `{}` does not allow deletion)",
            parcel.status
        ),
        Err(err) if err.is_not_found() => println!("parcel #{number} deleted"),
        Err(err) => return Err(err),
    }
    Ok(())
}
