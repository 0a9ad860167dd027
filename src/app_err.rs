use thiserror::Error;

use crate::aws_ec2::Ec2Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ec2(#[from] Ec2Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
