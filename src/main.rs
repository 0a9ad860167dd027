mod app_err;
mod aws_authentication;
mod aws_ec2;
mod cli;
mod commands;

use std::collections::HashMap;
use std::process::ExitCode;

use aws_types::SdkConfig;
use clap::Parser;
use config::Config;

use app_err::AppError;
use aws_authentication::get_config;
use aws_ec2::Ec2;
use cli::Cli;

type AppConfig = HashMap<String, String>;

fn get_app_config() -> Result<AppConfig, config::ConfigError> {
    Config::builder()
        .add_source(config::File::with_name("settings.toml").required(false))
        .build()?
        .try_deserialize::<AppConfig>()
}

fn create_ec2_client(app_config: &AppConfig, aws_profile: &SdkConfig) -> aws_sdk_ec2::Client {
    let ec2_endpoint = app_config.get("EC2_ENDPOINT").cloned();
    let ec2_config = aws_sdk_ec2::config::Builder::from(aws_profile)
        .set_endpoint_url(ec2_endpoint)
        .clone()
        .build();

    aws_sdk_ec2::client::Client::from_conf(ec2_config)
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let app_config = get_app_config()?;
    let aws_profile = get_config(cli.profile.as_deref(), cli.region.as_deref()).await;
    let ec2 = Ec2::new(create_ec2_client(&app_config, &aws_profile));

    commands::dispatch(&ec2, &cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fleetsnap: {err}");
            ExitCode::FAILURE
        }
    }
}
