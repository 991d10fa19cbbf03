/// Network adapters for the remote services
mod caching_ssc_client;
mod github_client;
mod scancentral_client;
mod ssc_rest_client;

pub use caching_ssc_client::CachingSecurityManagementService;
pub use github_client::GitHubClient;
pub use scancentral_client::ScanCentralClient;
pub use ssc_rest_client::SscRestClient;
