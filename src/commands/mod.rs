pub mod instances;
pub mod snapshots;
pub mod volumes;

use crate::app_err::AppError;
use crate::aws_ec2::Ec2;
use crate::cli::{Command, InstancesCommand, SnapshotsCommand, VolumesCommand};

/// Resolve the instance set once per invocation, then hand it to the command
/// handler. Every handler iterates exactly this set.
pub async fn dispatch(ec2: &Ec2, command: &Command) -> Result<(), AppError> {
    match command {
        Command::Instances(InstancesCommand::List(args)) => {
            let instances = ec2.filter_instances(args.project.as_deref()).await?;
            instances::list(&instances);
            Ok(())
        }
        Command::Instances(InstancesCommand::Stop(args)) => {
            let instances = ec2.filter_instances(args.project.as_deref()).await?;
            instances::stop(ec2, &instances).await;
            Ok(())
        }
        Command::Instances(InstancesCommand::Start(args)) => {
            let instances = ec2.filter_instances(args.project.as_deref()).await?;
            instances::start(ec2, &instances).await;
            Ok(())
        }
        Command::Instances(InstancesCommand::Snapshot(args)) => {
            let instances = ec2.filter_instances(args.project.as_deref()).await?;
            let plans = instances::plan_snapshots(ec2, &instances).await?;
            instances::snapshot_fleet(ec2, &plans).await?;
            Ok(())
        }
        Command::Volumes(VolumesCommand::List(args)) => {
            let instances = ec2.filter_instances(args.project.as_deref()).await?;
            volumes::list(ec2, &instances).await
        }
        Command::Snapshots(SnapshotsCommand::List(args)) => {
            let instances = ec2.filter_instances(args.project.as_deref()).await?;
            snapshots::list(ec2, &instances, args.all).await
        }
    }
}
