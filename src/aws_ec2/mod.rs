pub mod aws_err;

use std::time::Duration;

use aws_sdk_ec2::{
    Client,
    types::{Filter, Instance, InstanceStateName, Snapshot, Volume},
};

pub use aws_err::Ec2Error;

/// Description attached to every snapshot this tool creates.
pub const SNAPSHOT_DESCRIPTION: &str = "created by fleetsnap";

// EC2's default waiter budget: poll every 15s, give up after 40 attempts.
const WAIT_POLL_INTERVAL: Duration = Duration::from_secs(15);
const WAIT_MAX_ATTEMPTS: u32 = 40;

/// Lifecycle mutations issued against a single instance or volume.
///
/// `Ec2` implements this against the real client; the stop/start/snapshot
/// command handlers are generic over it so their call sequences can be
/// exercised without a live endpoint.
#[allow(async_fn_in_trait)]
pub trait InstanceLifecycle {
    async fn stop_instance(&self, instance_id: &str) -> Result<(), Ec2Error>;
    async fn start_instance(&self, instance_id: &str) -> Result<(), Ec2Error>;
    async fn wait_until_stopped(&self, instance_id: &str) -> Result<(), Ec2Error>;
    async fn wait_until_running(&self, instance_id: &str) -> Result<(), Ec2Error>;
    async fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<(), Ec2Error>;
}

/// EC2 client wrapper, constructed once at process start and passed into
/// every command handler.
pub struct Ec2 {
    client: Client,
}

/// Server-side filter for instances tagged `project:<value>`; `None` means
/// no filter at all.
pub fn project_filter(project: Option<&str>) -> Option<Vec<Filter>> {
    project.map(|value| {
        vec![
            Filter::builder()
                .name("tag:project")
                .values(value)
                .build(),
        ]
    })
}

impl Ec2 {
    pub fn new(client: Client) -> Self {
        Ec2 { client }
    }

    /// Resolve the instance set for one invocation, in provider order.
    pub async fn filter_instances(&self, project: Option<&str>) -> Result<Vec<Instance>, Ec2Error> {
        let instances = self
            .client
            .describe_instances()
            .set_filters(project_filter(project))
            .send()
            .await?
            .reservations
            .unwrap_or_default()
            .into_iter()
            .flat_map(|reservation| reservation.instances.unwrap_or_default())
            .collect();

        Ok(instances)
    }

    /// Volumes attached to the given instance. The walk is instance->volume,
    /// so unattached volumes are never visited.
    pub async fn volumes_for_instance(&self, instance_id: &str) -> Result<Vec<Volume>, Ec2Error> {
        let volumes = self
            .client
            .describe_volumes()
            .filters(
                Filter::builder()
                    .name("attachment.instance-id")
                    .values(instance_id)
                    .build(),
            )
            .send()
            .await?
            .volumes
            .unwrap_or_default();

        Ok(volumes)
    }

    /// Snapshots of the given volume, in provider order (newest first).
    pub async fn snapshots_for_volume(&self, volume_id: &str) -> Result<Vec<Snapshot>, Ec2Error> {
        let snapshots = self
            .client
            .describe_snapshots()
            .filters(Filter::builder().name("volume-id").values(volume_id).build())
            .send()
            .await?
            .snapshots
            .unwrap_or_default();

        Ok(snapshots)
    }

    async fn instance_state(
        &self,
        instance_id: &str,
    ) -> Result<Option<InstanceStateName>, Ec2Error> {
        let state = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await?
            .reservations
            .unwrap_or_default()
            .into_iter()
            .flat_map(|reservation| reservation.instances.unwrap_or_default())
            .next()
            .and_then(|instance| instance.state)
            .and_then(|state| state.name);

        Ok(state)
    }

    /// Bounded polling wait. State transitions are provider-driven and only
    /// observable by polling; exhausting the attempt budget is a timeout.
    async fn wait_for_state(
        &self,
        instance_id: &str,
        target: InstanceStateName,
    ) -> Result<(), Ec2Error> {
        for attempt in 0..WAIT_MAX_ATTEMPTS {
            if self.instance_state(instance_id).await?.as_ref() == Some(&target) {
                return Ok(());
            }

            if attempt + 1 < WAIT_MAX_ATTEMPTS {
                tokio::time::sleep(WAIT_POLL_INTERVAL).await;
            }
        }

        Err(Ec2Error::WaitTimeout {
            instance_id: instance_id.to_owned(),
            target,
        })
    }
}

impl InstanceLifecycle for Ec2 {
    async fn stop_instance(&self, instance_id: &str) -> Result<(), Ec2Error> {
        self.client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await?;

        Ok(())
    }

    async fn start_instance(&self, instance_id: &str) -> Result<(), Ec2Error> {
        self.client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await?;

        Ok(())
    }

    async fn wait_until_stopped(&self, instance_id: &str) -> Result<(), Ec2Error> {
        self.wait_for_state(instance_id, InstanceStateName::Stopped)
            .await
    }

    async fn wait_until_running(&self, instance_id: &str) -> Result<(), Ec2Error> {
        self.wait_for_state(instance_id, InstanceStateName::Running)
            .await
    }

    async fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<(), Ec2Error> {
        self.client
            .create_snapshot()
            .volume_id(volume_id)
            .description(description)
            .send()
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_filter_targets_the_project_tag() {
        let filters = project_filter(Some("web")).expect("should build a filter");

        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].name(), Some("tag:project"));
        assert_eq!(filters[0].values(), ["web"]);
    }

    #[test]
    fn absent_project_means_no_filters() {
        assert!(project_filter(None).is_none());
    }
}
