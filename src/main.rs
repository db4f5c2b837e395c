#[tokio::main(flavor = "current_thread")]
async fn main() {
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());

    if let Err(err) = osrs_helper_lib::run(&data_dir).await {
        eprintln!("osrs_helper: {err}");
        std::process::exit(1);
    }
}
