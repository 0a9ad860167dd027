use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_types::SdkConfig;

/// Load the shared AWS config for the given credential profile, preferring an
/// explicit region over the ambient provider chain.
pub async fn get_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(region.map(|r| Region::new(r.to_owned())))
            .or_default_provider()
            .or_else("us-east-1");

    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .profile_name(profile.unwrap_or("default"))
        .load()
        .await
}
