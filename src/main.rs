use clap::Parser;
use fping_collector::collector;
use fping_collector::conf::{self, Args};
use fping_collector::detectors::FpingDetector;
use fping_collector::reporter::PgReporter;
use std::process;
use tracing::{error, info};

const LOG_LEVEL: tracing::Level = tracing::Level::INFO;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        LOG_LEVEL
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let conf = match conf::read_conf(&args.config).await {
        Ok(c) => c,
        Err(e) => {
            error!("Load conf fail, {:#}", e);
            process::exit(exitcode::CONFIG);
        }
    };

    let mut reporter = match PgReporter::connect(&conf.db).await {
        Ok(r) => r,
        Err(e) => {
            error!("{:#}", e);
            process::exit(exitcode::UNAVAILABLE);
        }
    };
    if let Err(e) = reporter.ping().await {
        error!("{:#}", e);
        process::exit(exitcode::UNAVAILABLE);
    }

    let fping = match FpingDetector::from_conf(&conf).spawn() {
        Ok(p) => p,
        Err(e) => {
            error!("{:#}", e);
            process::exit(exitcode::OSERR);
        }
    };

    match collector::run(fping, &mut reporter).await {
        Ok(stats) => info!("Collector exit, {} measurements written", stats.written),
        Err(e) => {
            error!("{:#}", e);
            process::exit(exitcode::IOERR);
        }
    }
}
