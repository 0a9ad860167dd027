use std::collections::BTreeMap;

use aws_sdk_ec2::types::{Instance, Tag};

use crate::app_err::AppError;
use crate::aws_ec2::{Ec2, Ec2Error, InstanceLifecycle, SNAPSHOT_DESCRIPTION};

/// One instance's slice of the snapshot workflow: the instance to cycle and
/// the volumes to snapshot while it is stopped. Resolved up front so the
/// workflow operates on exactly the set seen at invocation time.
pub struct SnapshotPlan {
    pub instance_id: String,
    pub volume_ids: Vec<String>,
}

pub fn list(instances: &[Instance]) {
    for instance in instances {
        println!("{}", instance_line(instance));
    }
}

/// Stop every instance in the set. Per-instance failures are reported and
/// skipped; the command completes regardless.
pub async fn stop<C: InstanceLifecycle>(ops: &C, instances: &[Instance]) {
    for instance in instances {
        let Some(instance_id) = instance.instance_id() else {
            continue;
        };

        println!("Stopping {instance_id}...");
        if let Err(err) = ops.stop_instance(instance_id).await {
            println!("Could not stop {instance_id}: {err}");
        }
    }
}

/// Start every instance in the set, with the same skip-and-continue policy
/// as `stop`.
pub async fn start<C: InstanceLifecycle>(ops: &C, instances: &[Instance]) {
    for instance in instances {
        let Some(instance_id) = instance.instance_id() else {
            continue;
        };

        println!("Starting {instance_id}...");
        if let Err(err) = ops.start_instance(instance_id).await {
            println!("Could not start {instance_id}: {err}");
        }
    }
}

/// Resolve the attached-volume set for each instance before any mutation
/// starts.
pub async fn plan_snapshots(
    ec2: &Ec2,
    instances: &[Instance],
) -> Result<Vec<SnapshotPlan>, AppError> {
    let mut plans = Vec::with_capacity(instances.len());

    for instance in instances {
        let instance_id = instance
            .instance_id()
            .ok_or(Ec2Error::MissingInstanceId)?
            .to_owned();

        let volume_ids = ec2
            .volumes_for_instance(&instance_id)
            .await?
            .into_iter()
            .filter_map(|volume| volume.volume_id)
            .collect();

        plans.push(SnapshotPlan {
            instance_id,
            volume_ids,
        });
    }

    Ok(plans)
}

/// Crash-consistent snapshots need a quiesced volume, so each instance is
/// taken through `running -> stopped -> (snapshots) -> running` in strict
/// sequence. Any failure aborts the remaining work.
pub async fn snapshot_fleet<C: InstanceLifecycle>(
    ops: &C,
    plans: &[SnapshotPlan],
) -> Result<(), Ec2Error> {
    for plan in plans {
        println!("Stopping {}...", plan.instance_id);
        ops.stop_instance(&plan.instance_id).await?;
        ops.wait_until_stopped(&plan.instance_id).await?;

        for volume_id in &plan.volume_ids {
            println!("Creating snapshot of {volume_id}");
            ops.create_snapshot(volume_id, SNAPSHOT_DESCRIPTION).await?;
        }

        println!("Starting {}...", plan.instance_id);
        ops.start_instance(&plan.instance_id).await?;
        ops.wait_until_running(&plan.instance_id).await?;
    }

    println!("Job done");
    Ok(())
}

fn tag_map(tags: &[Tag]) -> BTreeMap<&str, &str> {
    tags.iter()
        .filter_map(|tag| Some((tag.key()?, tag.value()?)))
        .collect()
}

fn instance_line(instance: &Instance) -> String {
    format!(
        "{},{},{},{},{},{}",
        instance.instance_id().unwrap_or_default(),
        instance
            .instance_type()
            .map(|t| t.as_str())
            .unwrap_or_default(),
        instance
            .placement()
            .and_then(|p| p.availability_zone())
            .unwrap_or_default(),
        instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str())
            .unwrap_or_default(),
        instance.public_dns_name().unwrap_or_default(),
        tag_map(instance.tags())
            .get("project")
            .copied()
            .unwrap_or("<no project>"),
    )
}
