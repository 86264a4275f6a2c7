use std::process;

#[tokio::main]
async fn main() {
    let code = patientaccess_cli::run().await;
    process::exit(code);
}
