use crate::ports::outbound::SecurityManagementService;
use crate::scan_pipeline::domain::{
    ApplicationRef, ApplicationVersion, Artifact, AttributeAssignment, BulkRequest, FilterSet,
    Finding, FindingDetails, FindingHandle, FindingQuery, FolderCount, IssueQuery, VersionId,
    VersionRef,
};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;

/// Cache key for filter set lookups
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct FilterSetKey {
    version: VersionId,
    name: String,
}

/// CachingSecurityManagementService wraps a SecurityManagementService and
/// remembers lookups that cannot change during one run.
///
/// Only positive answers are cached: an application that does not exist
/// yet may be created by this very run.
pub struct CachingSecurityManagementService<S: SecurityManagementService> {
    inner: S,
    applications: Arc<DashMap<String, u64>>,
    filter_sets: Arc<DashMap<FilterSetKey, FilterSet>>,
}

impl<S: SecurityManagementService> CachingSecurityManagementService<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            applications: Arc::new(DashMap::new()),
            filter_sets: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.applications.len() + self.filter_sets.len()
    }
}

#[async_trait]
impl<S: SecurityManagementService> SecurityManagementService
    for CachingSecurityManagementService<S>
{
    async fn find_application(&self, name: &str) -> Result<Option<u64>> {
        if let Some(cached) = self.applications.get(name) {
            return Ok(Some(*cached));
        }
        let found = self.inner.find_application(name).await?;
        if let Some(id) = found {
            self.applications.insert(name.to_string(), id);
        }
        Ok(found)
    }

    async fn find_version(&self, version: &VersionRef) -> Result<Option<ApplicationVersion>> {
        self.inner.find_version(version).await
    }

    async fn get_version(&self, id: VersionId) -> Result<ApplicationVersion> {
        self.inner.get_version(id).await
    }

    async fn create_version(
        &self,
        application: &ApplicationRef,
        version_name: &str,
    ) -> Result<VersionId> {
        self.inner.create_version(application, version_name).await
    }

    async fn copy_version_state(&self, source: VersionId, target: VersionId) -> Result<()> {
        self.inner.copy_version_state(source, target).await
    }

    async fn copy_vulnerabilities(&self, source: VersionId, target: VersionId) -> Result<()> {
        self.inner.copy_vulnerabilities(source, target).await
    }

    async fn set_issue_template(&self, version: VersionId, template: &str) -> Result<bool> {
        self.inner.set_issue_template(version, template).await
    }

    async fn set_attribute(
        &self,
        version: VersionId,
        assignment: &AttributeAssignment,
    ) -> Result<bool> {
        self.inner.set_attribute(version, assignment).await
    }

    async fn commit_version(&self, version: VersionId) -> Result<()> {
        self.inner.commit_version(version).await
    }

    async fn delete_version(&self, version: VersionId) -> Result<()> {
        self.inner.delete_version(version).await
    }

    async fn list_findings(
        &self,
        version: VersionId,
        query: &FindingQuery,
    ) -> Result<Vec<Finding>> {
        self.inner.list_findings(version, query).await
    }

    async fn finding_details(&self, finding_id: u64) -> Result<FindingDetails> {
        self.inner.finding_details(finding_id).await
    }

    async fn submit_bulk(&self, requests: &[BulkRequest]) -> Result<()> {
        self.inner.submit_bulk(requests).await
    }

    async fn tag_findings(
        &self,
        version: VersionId,
        findings: &[FindingHandle],
        tag_guid: &str,
        value: &str,
    ) -> Result<bool> {
        self.inner
            .tag_findings(version, findings, tag_guid, value)
            .await
    }

    async fn version_custom_tags(&self, version: VersionId) -> Result<Vec<String>> {
        self.inner.version_custom_tags(version).await
    }

    async fn custom_tag_exists(&self, tag_guid: &str) -> Result<bool> {
        self.inner.custom_tag_exists(tag_guid).await
    }

    async fn attach_custom_tag(&self, version: VersionId, tag_guid: &str) -> Result<()> {
        self.inner.attach_custom_tag(version, tag_guid).await
    }

    async fn find_filter_set(&self, version: VersionId, name: &str) -> Result<Option<FilterSet>> {
        let key = FilterSetKey {
            version,
            name: name.to_string(),
        };
        if let Some(cached) = self.filter_sets.get(&key) {
            return Ok(Some(cached.clone()));
        }
        let found = self.inner.find_filter_set(version, name).await?;
        if let Some(filter_set) = &found {
            self.filter_sets.insert(key, filter_set.clone());
        }
        Ok(found)
    }

    async fn folder_counts(
        &self,
        version: VersionId,
        filter_set_guid: &str,
        query: &IssueQuery,
    ) -> Result<Vec<FolderCount>> {
        self.inner
            .folder_counts(version, filter_set_guid, query)
            .await
    }

    async fn security_rating(&self, version: VersionId) -> Result<f64> {
        self.inner.security_rating(version).await
    }

    async fn upload_artifact(&self, version: VersionId, file: &Path) -> Result<Artifact> {
        self.inner.upload_artifact(version, file).await
    }

    async fn get_artifact(&self, artifact_id: u64) -> Result<Artifact> {
        self.inner.get_artifact(artifact_id).await
    }

    async fn list_artifacts(&self, version: VersionId) -> Result<Vec<Artifact>> {
        self.inner.list_artifacts(version).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers lookups and counts them; every other call is unreachable in these tests
    struct CountingService {
        lookups: AtomicUsize,
    }

    impl CountingService {
        fn new() -> Self {
            Self {
                lookups: AtomicUsize::new(0),
            }
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SecurityManagementService for CountingService {
        async fn find_application(&self, name: &str) -> Result<Option<u64>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok((name == "known").then_some(7))
        }
        async fn find_version(&self, _: &VersionRef) -> Result<Option<ApplicationVersion>> {
            unreachable!()
        }
        async fn get_version(&self, _: VersionId) -> Result<ApplicationVersion> {
            unreachable!()
        }
        async fn create_version(&self, _: &ApplicationRef, _: &str) -> Result<VersionId> {
            unreachable!()
        }
        async fn copy_version_state(&self, _: VersionId, _: VersionId) -> Result<()> {
            unreachable!()
        }
        async fn copy_vulnerabilities(&self, _: VersionId, _: VersionId) -> Result<()> {
            unreachable!()
        }
        async fn set_issue_template(&self, _: VersionId, _: &str) -> Result<bool> {
            unreachable!()
        }
        async fn set_attribute(&self, _: VersionId, _: &AttributeAssignment) -> Result<bool> {
            unreachable!()
        }
        async fn commit_version(&self, _: VersionId) -> Result<()> {
            unreachable!()
        }
        async fn delete_version(&self, _: VersionId) -> Result<()> {
            unreachable!()
        }
        async fn list_findings(&self, _: VersionId, _: &FindingQuery) -> Result<Vec<Finding>> {
            unreachable!()
        }
        async fn finding_details(&self, _: u64) -> Result<FindingDetails> {
            unreachable!()
        }
        async fn submit_bulk(&self, _: &[BulkRequest]) -> Result<()> {
            unreachable!()
        }
        async fn tag_findings(
            &self,
            _: VersionId,
            _: &[FindingHandle],
            _: &str,
            _: &str,
        ) -> Result<bool> {
            unreachable!()
        }
        async fn version_custom_tags(&self, _: VersionId) -> Result<Vec<String>> {
            unreachable!()
        }
        async fn custom_tag_exists(&self, _: &str) -> Result<bool> {
            unreachable!()
        }
        async fn attach_custom_tag(&self, _: VersionId, _: &str) -> Result<()> {
            unreachable!()
        }
        async fn find_filter_set(&self, _: VersionId, name: &str) -> Result<Option<FilterSet>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(Some(FilterSet {
                guid: format!("guid-{}", name),
                name: name.to_string(),
                folders: vec![],
            }))
        }
        async fn folder_counts(
            &self,
            _: VersionId,
            _: &str,
            _: &IssueQuery,
        ) -> Result<Vec<FolderCount>> {
            unreachable!()
        }
        async fn security_rating(&self, _: VersionId) -> Result<f64> {
            unreachable!()
        }
        async fn upload_artifact(&self, _: VersionId, _: &Path) -> Result<Artifact> {
            unreachable!()
        }
        async fn get_artifact(&self, _: u64) -> Result<Artifact> {
            unreachable!()
        }
        async fn list_artifacts(&self, _: VersionId) -> Result<Vec<Artifact>> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_filter_set_lookup_is_cached() {
        let service = CachingSecurityManagementService::new(CountingService::new());
        let version = VersionId::new(1).unwrap();

        let first = service.find_filter_set(version, "Quick View").await.unwrap();
        let second = service.find_filter_set(version, "Quick View").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.inner.lookup_count(), 1);
        assert_eq!(service.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_missing_application_is_not_cached() {
        let service = CachingSecurityManagementService::new(CountingService::new());

        assert_eq!(service.find_application("new-app").await.unwrap(), None);
        assert_eq!(service.find_application("new-app").await.unwrap(), None);
        assert_eq!(service.find_application("known").await.unwrap(), Some(7));
        assert_eq!(service.find_application("known").await.unwrap(), Some(7));

        assert_eq!(service.inner.lookup_count(), 3);
        assert_eq!(service.cache_size(), 1);
    }
}
