// emp-api/src/main.rs

use std::env;

use clap::Parser;
use dotenvy::dotenv;
use emp_api::built_info;
use rocket::{error, info};

#[derive(Parser)]
#[command(name = "emp-api")]
#[command(about = "Employee and department record management API")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,
}

#[rocket::main]
async fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        println!("emp-api {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return;
    }

    dotenv().ok();

    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    match env::current_dir() {
        Ok(path) => info!("Current directory: {}", path.display()),
        Err(e) => error!("Error getting current directory: {}", e),
    };

    info!("emp-api v{} starting", built_info::PKG_VERSION);

    if let Err(e) = emp_api::rocket(database_url).launch().await {
        error!("Rocket server failed to launch: {}", e);
        std::process::exit(1);
    }
}
