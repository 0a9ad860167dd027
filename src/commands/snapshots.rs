use aws_sdk_ec2::types::{Instance, Snapshot, SnapshotState};

use crate::app_err::AppError;
use crate::aws_ec2::Ec2;

/// Walk instance -> volume -> snapshot and print one line per snapshot.
/// Without `list_all`, each volume's history is truncated at its most recent
/// completed snapshot.
pub async fn list(ec2: &Ec2, instances: &[Instance], list_all: bool) -> Result<(), AppError> {
    for instance in instances {
        let Some(instance_id) = instance.instance_id() else {
            continue;
        };

        for volume in ec2.volumes_for_instance(instance_id).await? {
            let Some(volume_id) = volume.volume_id() else {
                continue;
            };

            let snapshots = ec2.snapshots_for_volume(volume_id).await?;
            for line in snapshot_lines(&snapshots, volume_id, instance_id, list_all) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

// Snapshots arrive newest first, so stopping at the first completed one shows
// the latest usable snapshot plus anything still in flight ahead of it. A
// volume with no completed snapshot prints its full history either way.
fn snapshot_lines(
    snapshots: &[Snapshot],
    volume_id: &str,
    instance_id: &str,
    list_all: bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    for snapshot in snapshots {
        lines.push(snapshot_line(snapshot, volume_id, instance_id));

        if snapshot.state() == Some(&SnapshotState::Completed) && !list_all {
            break;
        }
    }

    lines
}

fn snapshot_line(snapshot: &Snapshot, volume_id: &str, instance_id: &str) -> String {
    format!(
        "{}, {}, {}, {}, {}, {}",
        snapshot.snapshot_id().unwrap_or_default(),
        volume_id,
        instance_id,
        snapshot.state().map(|s| s.as_str()).unwrap_or_default(),
        snapshot.progress().unwrap_or_default(),
        snapshot
            .start_time()
            .map(ToString::to_string)
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use aws_sdk_ec2::primitives::DateTime;

    use super::*;

    fn snapshot(id: &str, state: SnapshotState, progress: &str) -> Snapshot {
        Snapshot::builder()
            .snapshot_id(id)
            .volume_id("vol-1")
            .state(state)
            .progress(progress)
            .start_time(DateTime::from_secs(1_700_000_000))
            .build()
    }

    #[test]
    fn stops_at_the_first_completed_snapshot() {
        let snapshots = [
            snapshot("snap-1", SnapshotState::Pending, "40%"),
            snapshot("snap-2", SnapshotState::Completed, "100%"),
            snapshot("snap-3", SnapshotState::Completed, "100%"),
        ];

        let lines = snapshot_lines(&snapshots, "vol-1", "i-1", false);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("snap-1, "));
        assert!(lines[1].starts_with("snap-2, "));
    }

    #[test]
    fn all_flag_prints_full_history() {
        let snapshots = [
            snapshot("snap-1", SnapshotState::Pending, "40%"),
            snapshot("snap-2", SnapshotState::Completed, "100%"),
            snapshot("snap-3", SnapshotState::Completed, "100%"),
        ];

        let lines = snapshot_lines(&snapshots, "vol-1", "i-1", true);

        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn volume_with_no_completed_snapshot_prints_everything() {
        let snapshots = [
            snapshot("snap-1", SnapshotState::Pending, "40%"),
            snapshot("snap-2", SnapshotState::Error, "0%"),
        ];

        assert_eq!(snapshot_lines(&snapshots, "vol-1", "i-1", false).len(), 2);
        assert_eq!(snapshot_lines(&snapshots, "vol-1", "i-1", true).len(), 2);
    }

    #[test]
    fn snapshot_line_carries_ids_state_and_progress() {
        let snap = snapshot("snap-1", SnapshotState::Pending, "40%");
        let line = snapshot_line(&snap, "vol-1", "i-1");

        assert!(line.starts_with("snap-1, vol-1, i-1, pending, 40%, "));
        assert!(line.contains("2023"));
    }
}
