#[tokio::main]
async fn main() -> std::process::ExitCode {
    formatr_lib::run().await
}
