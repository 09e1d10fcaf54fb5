use label_desk::DeskConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// stdout carries command output; logs go to stderr
fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(fmt).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing(DeskConfig::from_env().log_json);
    if let Err(error) = label_desk::run(std::env::args_os()).await {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
