use anyhow::Result;
use clap::{Parser, Subcommand};
use image_service_client::images::{ImageClient, ImageService};
use image_service_client::models::Config;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-service-client")]
#[command(about = "List, upload and delete images on the image backend")]
struct CliArgs {
    /// Backend base URL; overrides IMAGE_API_URL.
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List stored images with their resized URLs.
    List,
    /// Upload a local image file.
    Upload {
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// Delete an image by identifier.
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

fn load_config(api_url: Option<&str>) -> image_service_client::Result<Config> {
    match api_url {
        Some(url) => Config::new(url),
        None => Config::from_env(),
    }
}

async fn run(client: &dyn ImageService, command: Command) -> image_service_client::Result<String> {
    let output = match command {
        Command::List => {
            let images = client.list_images().await?;
            info!("Fetched {} images", images.len());
            serde_json::to_string_pretty(&images)?
        }
        Command::Upload { path } => serde_json::to_string_pretty(&client.upload_image(&path).await?)?,
        Command::Delete { id } => serde_json::to_string_pretty(&client.delete_image(&id).await?)?,
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_service_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match load_config(args.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = ImageClient::new(config);
    info!("Using image backend at {}", client.api_url());

    match run(&client, args.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Operation failed: {}", e);
            std::process::exit(1);
        }
    }
}
