use hr_portal_console::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        if !err.is_reported() {
            eprintln!("hr-portal error: {err}");
        }
        std::process::exit(1);
    }
}
