use clap::Parser;
use idemledger::domain::ports::SharedStore;
use idemledger::infrastructure::in_memory::InMemoryKvStore;
#[cfg(feature = "storage-rocksdb")]
use idemledger::infrastructure::rocksdb::RocksDbKvStore;
use idemledger::interfaces::api::Api;
use idemledger::interfaces::reader::RequestReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input request file, one JSON request per line
    input: PathBuf,

    /// Path to persistent database (optional). Requires the
    /// storage-rocksdb feature; without a path an in-memory store is used.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn build_store(cli: &Cli) -> Result<SharedStore> {
    match &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            let store = RocksDbKvStore::open(db_path).into_diagnostic()?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => Err(miette::miette!(
            "--db-path requires building with the storage-rocksdb feature"
        )),
        None => Ok(Arc::new(InMemoryKvStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let api = Api::new(build_store(&cli)?);

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = RequestReader::new(BufReader::new(file));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for request in reader.requests() {
        match request {
            Ok(request) => {
                let response = api.handle(request).await;
                let line = serde_json::to_string(&response).into_diagnostic()?;
                writeln!(out, "{line}").into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading request: {e}");
            }
        }
    }

    Ok(())
}
