use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tokio::select! {
        result = chat_ingest_lib::run() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutdown signal received, stopping poller");
            ExitCode::SUCCESS
        }
    }
}
