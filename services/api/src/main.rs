use polls_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("polls error: {err}");
        std::process::exit(1);
    }
}
