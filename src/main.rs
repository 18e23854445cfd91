use colored::Colorize;

#[tokio::main]
async fn main() {
    if let Err(e) = vgpu_edit::cli::run().await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
