use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match guest_checkin::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("guest-checkin failed to start: {e}");
            ExitCode::FAILURE
        }
    }
}
