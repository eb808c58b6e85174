mod config;
#[cfg(not(target_os = "android"))]
mod database;
mod error;
mod playground;

use error::AppError;

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("storage-playground"),
    );

    #[cfg(not(target_os = "android"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

async fn run() -> Result<(), AppError> {
    let config = config::load_config(&config::config_path())?;
    let picker = playground::build_content_picker(&config)?;

    let report = playground::run_selection(&picker, &config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        log::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
