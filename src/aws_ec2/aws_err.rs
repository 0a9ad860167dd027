use aws_sdk_ec2::error::SdkError;
use aws_sdk_ec2::types::InstanceStateName;
use thiserror::Error;

/// Errors from the EC2 provider layer.
#[derive(Debug, Error)]
pub enum Ec2Error {
    #[error("AWS SDK error: {0}")]
    Sdk(String),

    #[error("timed out waiting for instance {instance_id} to reach state {target}")]
    WaitTimeout {
        instance_id: String,
        target: InstanceStateName,
    },

    #[error("instance returned by the provider has no instance id")]
    MissingInstanceId,
}

impl<E> From<SdkError<E>> for Ec2Error {
    fn from(err: SdkError<E>) -> Self {
        Ec2Error::Sdk(err.to_string())
    }
}
