use clap::{Args, Parser, Subcommand};

/// fleetsnap manages EC2 instances, volumes and snapshots by project tag.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// AWS profile to use
    #[arg(long, short('p'), global = true)]
    pub profile: Option<String>,

    /// Looks for instances in the specified region
    #[arg(long, short('r'), global = true)]
    pub region: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commands for instances
    #[command(subcommand)]
    Instances(InstancesCommand),

    /// Commands for volumes
    #[command(subcommand)]
    Volumes(VolumesCommand),

    /// Commands for snapshots
    #[command(subcommand)]
    Snapshots(SnapshotsCommand),
}

#[derive(Subcommand, Debug)]
pub enum InstancesCommand {
    /// List EC2 instances
    List(ProjectArgs),
    /// Stop EC2 instances
    Stop(ProjectArgs),
    /// Start EC2 instances
    Start(ProjectArgs),
    /// Stop instances, snapshot every attached volume, start them again
    Snapshot(ProjectArgs),
}

#[derive(Subcommand, Debug)]
pub enum VolumesCommand {
    /// List EBS volumes attached to EC2 instances
    List(ProjectArgs),
}

#[derive(Subcommand, Debug)]
pub enum SnapshotsCommand {
    /// List EBS snapshots
    List(SnapshotListArgs),
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Only instances tagged project:<NAME>
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct SnapshotListArgs {
    /// Only snapshots for instances tagged project:<NAME>
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,

    /// List all snapshots for each volume, not just the most recent completed one
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_instances_list_with_project() {
        let cli = Cli::try_parse_from(["fleetsnap", "instances", "list", "--project", "web"])
            .expect("should parse");

        match cli.command {
            Command::Instances(InstancesCommand::List(args)) => {
                assert_eq!(args.project.as_deref(), Some("web"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn project_is_optional() {
        let cli = Cli::try_parse_from(["fleetsnap", "instances", "stop"]).expect("should parse");

        match cli.command {
            Command::Instances(InstancesCommand::Stop(args)) => assert!(args.project.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn snapshots_list_accepts_all_flag() {
        let cli =
            Cli::try_parse_from(["fleetsnap", "snapshots", "list", "--all"]).expect("should parse");

        match cli.command {
            Command::Snapshots(SnapshotsCommand::List(args)) => {
                assert!(args.all);
                assert!(args.project.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn all_flag_is_rejected_outside_snapshots_list() {
        assert!(Cli::try_parse_from(["fleetsnap", "volumes", "list", "--all"]).is_err());
    }

    #[test]
    fn profile_and_region_are_global() {
        let cli = Cli::try_parse_from([
            "fleetsnap", "volumes", "list", "--profile", "ops", "--region", "eu-west-1",
        ])
        .expect("should parse");

        assert_eq!(cli.profile.as_deref(), Some("ops"));
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
    }
}
