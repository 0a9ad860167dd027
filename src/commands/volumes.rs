use aws_sdk_ec2::types::{Instance, Volume};

use crate::app_err::AppError;
use crate::aws_ec2::Ec2;

/// One line per (instance, attached volume) pair. Volumes attached to no
/// instance in the set are never visited.
pub async fn list(ec2: &Ec2, instances: &[Instance]) -> Result<(), AppError> {
    for instance in instances {
        let Some(instance_id) = instance.instance_id() else {
            continue;
        };

        for volume in ec2.volumes_for_instance(instance_id).await? {
            println!("{}", volume_line(&volume, instance_id));
        }
    }

    Ok(())
}

fn volume_line(volume: &Volume, instance_id: &str) -> String {
    format!(
        "{}, {}, {}, {}GiB, {}",
        volume.volume_id().unwrap_or_default(),
        instance_id,
        volume.state().map(|s| s.as_str()).unwrap_or_default(),
        volume.size().unwrap_or_default(),
        if volume.encrypted().unwrap_or_default() {
            "Encrypted"
        } else {
            "Not Encrypted"
        },
    )
}
