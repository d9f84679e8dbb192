use chrono::Utc;

fn main() {
    // Build identification for the startup banner
    println!(
        "cargo:rustc-env=BUILD_TIMESTAMP={}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "cargo:rustc-env=BUILD_PROFILE={}",
        std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string())
    );
}
