use crate::ports::outbound::SecurityManagementService;
use crate::scan_pipeline::domain::{
    ApplicationRef, ApplicationVersion, Artifact, AttributeAssignment,
    BulkRequest, FilterSet, Finding, FindingDetails, FindingHandle, FindingQuery, Folder,
    FolderCount, IssueQuery, VersionId, VersionRef,
};
use crate::shared::error::PipelineError;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

/// Name of the performance indicator reported as the security rating
const SECURITY_RATING_INDICATOR: &str = "Fortify Security Rating";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ResponseCode {
    #[serde(rename = "responseCode")]
    response_code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct SscIdentified {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscProject {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscVersion {
    id: i64,
    name: String,
    #[serde(default)]
    committed: bool,
    project: Option<SscProject>,
}

impl SscVersion {
    fn into_domain(self) -> Result<ApplicationVersion> {
        let id = VersionId::from_raw(self.id).ok_or_else(|| PipelineError::UnexpectedResponse {
            operation: "read application version".to_string(),
            details: format!("invalid version id {}", self.id),
        })?;
        let (application_id, application_name) = match self.project {
            Some(project) => (Some(project.id), project.name),
            None => (None, String::new()),
        };
        Ok(ApplicationVersion {
            id,
            name: self.name,
            application_id,
            application_name,
            committed: self.committed,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscAttributeDefinition {
    id: u64,
    #[serde(rename = "type")]
    value_type: String,
    #[serde(default)]
    options: Vec<SscAttributeOption>,
}

#[derive(Debug, Deserialize)]
struct SscAttributeOption {
    guid: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscIssue {
    id: u64,
    #[serde(default)]
    issue_instance_id: String,
    #[serde(default)]
    revision: u64,
    last_scan_id: Option<u64>,
    #[serde(rename = "_embed")]
    embed: Option<SscIssueEmbed>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscIssueEmbed {
    #[serde(default)]
    audit_values: Vec<Value>,
}

impl From<SscIssue> for Finding {
    fn from(issue: SscIssue) -> Self {
        Finding {
            id: issue.id,
            issue_instance_id: issue.issue_instance_id,
            revision: issue.revision,
            last_scan_id: issue.last_scan_id,
            audit_values: issue.embed.map(|e| e.audit_values).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscIssueDetails {
    #[serde(default)]
    issue_instance_id: String,
    #[serde(default)]
    issue_name: String,
    #[serde(default)]
    brief: String,
    #[serde(default)]
    friority: Option<String>,
    full_file_name: Option<String>,
    line_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SscFilterSet {
    guid: String,
    title: String,
    #[serde(default)]
    folders: Vec<SscFolder>,
}

#[derive(Debug, Deserialize)]
struct SscFolder {
    guid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscIssueGroup {
    id: String,
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct SscIndicator {
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SscArtifact {
    id: u64,
    status: String,
    #[serde(default)]
    scan_types: Option<String>,
    #[serde(default, deserialize_with = "deserialize_service_date")]
    last_scan_date: Option<DateTime<Utc>>,
    #[serde(rename = "_embed")]
    embed: Option<SscArtifactEmbed>,
}

/// Accepts both RFC 3339 and the service's `+0000` offset style
fn deserialize_service_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .or_else(|_| DateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .map(|d| d.with_timezone(&Utc))
            .ok()
    }))
}

#[derive(Debug, Deserialize)]
struct SscArtifactEmbed {
    #[serde(default)]
    scans: Vec<SscScan>,
}

#[derive(Debug, Deserialize)]
struct SscScan {
    id: u64,
}

impl From<SscArtifact> for Artifact {
    fn from(artifact: SscArtifact) -> Self {
        Artifact {
            id: artifact.id,
            status: artifact.status,
            scan_types: artifact
                .scan_types
                .map(|types| {
                    types
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            last_scan_date: artifact.last_scan_date,
            scan_id: artifact
                .embed
                .and_then(|embed| embed.scans.first().map(|scan| scan.id)),
        }
    }
}

/// SscRestClient adapter for the application security management REST API
///
/// Every response is wrapped in a `{data, count, responseCode}` envelope;
/// only `data` is read. Listings request `limit=-1` so no paging is needed.
pub struct SscRestClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl SscRestClient {
    const TIMEOUT_SECONDS: u64 = 120;

    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("scan-orchestrator/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("FortifyToken {}", self.token))
    }

    /// Exact-name search clause for the `q` parameter
    fn name_query(name: &str) -> String {
        urlencoding::encode(&format!("name:\"{}\"", name)).into_owned()
    }

    async fn send(&self, builder: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request: {}", what))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Security management service returned status code {} for {}: {}",
                status,
                what,
                body
            );
        }
        tracing::debug!(status = %status, "{}", what);
        Ok(response)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {}", path))?;
        Ok(envelope.data)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<T> {
        let response = self
            .send(self.request(method, path).json(body), path)
            .await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {}", path))?;
        Ok(envelope.data)
    }

    /// Posts an action whose response body carries the outcome in `responseCode`
    async fn post_action(&self, path: &str, body: &Value) -> Result<()> {
        let response = self
            .send(self.request(Method::POST, path).json(body), path)
            .await?;
        let outcome: ResponseCode = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {}", path))?;
        match outcome.response_code {
            Some(code) if (200..300).contains(&code) => Ok(()),
            other => Err(PipelineError::UnexpectedResponse {
                operation: path.to_string(),
                details: format!("response code {:?}", other),
            }
            .into()),
        }
    }

    fn version_path(version: VersionId) -> String {
        format!("/api/v1/projectVersions/{}", version)
    }

    async fn find_attribute_definition(&self, name: &str) -> Result<Option<SscAttributeDefinition>> {
        let path = format!("/api/v1/attributeDefinitions?q={}", Self::name_query(name));
        let definitions: Vec<SscAttributeDefinition> = self.get_data(&path).await?;
        Ok(definitions.into_iter().next())
    }

    fn findings_path(version: VersionId, query: &FindingQuery) -> String {
        let mut path = format!("{}/issues?limit=-1", Self::version_path(version));
        if let Some(search) = &query.search {
            path.push_str(&format!("&q={}&qm=issues", urlencoding::encode(search)));
        }
        if let Some(fields) = &query.fields {
            path.push_str(&format!("&fields={}", fields));
        }
        if let Some(embed) = &query.embed {
            path.push_str(&format!("&embed={}", embed));
        }
        path
    }
}

#[async_trait]
impl SecurityManagementService for SscRestClient {
    async fn find_application(&self, name: &str) -> Result<Option<u64>> {
        let path = format!("/api/v1/projects?limit=-1&q={}", Self::name_query(name));
        let projects: Vec<SscIdentified> = self.get_data(&path).await?;
        Ok(projects
            .into_iter()
            .find(|p| p.name == name)
            .and_then(|p| u64::try_from(p.id).ok()))
    }

    async fn find_version(&self, version: &VersionRef) -> Result<Option<ApplicationVersion>> {
        let Some(application_id) = self.find_application(version.application()).await? else {
            return Ok(None);
        };
        let path = format!(
            "/api/v1/projects/{}/versions?limit=-1&q={}",
            application_id,
            Self::name_query(version.version())
        );
        let versions: Vec<SscVersion> = self.get_data(&path).await?;
        versions
            .into_iter()
            .find(|v| v.name == version.version() && v.id > 0)
            .map(SscVersion::into_domain)
            .transpose()
    }

    async fn get_version(&self, id: VersionId) -> Result<ApplicationVersion> {
        let version: SscVersion = self.get_data(&Self::version_path(id)).await?;
        version.into_domain()
    }

    async fn create_version(
        &self,
        application: &ApplicationRef,
        version_name: &str,
    ) -> Result<VersionId> {
        let project = match application {
            ApplicationRef::Id(id) => json!({ "id": id }),
            ApplicationRef::Name(name) => json!({ "name": name }),
        };
        let body = json!({
            "name": version_name,
            "description": "",
            "active": true,
            "committed": false,
            "project": project,
        });
        let created: SscIdentified = self
            .send_json(Method::POST, "/api/v1/projectVersions", &body)
            .await?;
        VersionId::from_raw(created.id).ok_or_else(|| {
            PipelineError::UnexpectedResponse {
                operation: "create application version".to_string(),
                details: format!("invalid version id {}", created.id),
            }
            .into()
        })
    }

    async fn copy_version_state(&self, source: VersionId, target: VersionId) -> Result<()> {
        let body = json!({
            "copyAnalysisProcessingRules": "true",
            "copyBugTrackerConfiguration": "true",
            "copyCustomTags": "true",
            "previousProjectVersionId": source.value(),
            "projectVersionId": target.value(),
        });
        self.post_action("/api/v1/projectVersions/action/copyFromPartial", &body)
            .await
    }

    async fn copy_vulnerabilities(&self, source: VersionId, target: VersionId) -> Result<()> {
        let body = json!({
            "previousProjectVersionId": source.value(),
            "projectVersionId": target.value(),
        });
        self.post_action("/api/v1/projectVersions/action/copyCurrentState", &body)
            .await
    }

    async fn set_issue_template(&self, version: VersionId, template: &str) -> Result<bool> {
        let path = format!("/api/v1/issueTemplates?q={}", Self::name_query(template));
        let templates: Vec<Value> = self.get_data(&path).await?;
        let Some(template_id) = templates
            .first()
            .and_then(|t| t.get("id"))
            .and_then(Value::as_str)
            .map(String::from)
        else {
            return Ok(false);
        };

        let body = json!({ "issueTemplateId": template_id });
        let _: Value = self
            .send_json(Method::PUT, &Self::version_path(version), &body)
            .await?;
        Ok(true)
    }

    async fn set_attribute(
        &self,
        version: VersionId,
        assignment: &AttributeAssignment,
    ) -> Result<bool> {
        let Some(definition) = self.find_attribute_definition(assignment.name()).await? else {
            tracing::warn!(attribute = assignment.name(), "attribute definition not found");
            return Ok(false);
        };

        let body = match definition.value_type.as_str() {
            "SINGLE" | "MULTIPLE" => {
                let mut values = Vec::new();
                for wanted in assignment.values() {
                    match definition.options.iter().find(|o| o.name == wanted) {
                        Some(option) => values.push(json!({ "guid": option.guid })),
                        None => {
                            tracing::warn!(
                                attribute = assignment.name(),
                                value = wanted,
                                "attribute option not found"
                            );
                            return Ok(false);
                        }
                    }
                }
                json!([{ "attributeDefinitionId": definition.id, "values": values, "value": null }])
            }
            _ => json!([{
                "attributeDefinitionId": definition.id,
                "values": [],
                "value": assignment.value(),
            }]),
        };

        let path = format!("{}/attributes", Self::version_path(version));
        let _: Value = self.send_json(Method::PUT, &path, &body).await?;
        Ok(true)
    }

    async fn commit_version(&self, version: VersionId) -> Result<()> {
        let body = json!({ "committed": true });
        let _: Value = self
            .send_json(Method::PUT, &Self::version_path(version), &body)
            .await?;
        Ok(())
    }

    async fn delete_version(&self, version: VersionId) -> Result<()> {
        let path = Self::version_path(version);
        self.send(self.request(Method::DELETE, &path), &path).await?;
        Ok(())
    }

    async fn list_findings(
        &self,
        version: VersionId,
        query: &FindingQuery,
    ) -> Result<Vec<Finding>> {
        let issues: Vec<SscIssue> = self.get_data(&Self::findings_path(version, query)).await?;
        Ok(issues
            .into_iter()
            .map(Finding::from)
            .filter(|f| query.last_scan_id.map_or(true, |scan| f.last_scan_id == Some(scan)))
            .collect())
    }

    async fn finding_details(&self, finding_id: u64) -> Result<FindingDetails> {
        let details: SscIssueDetails = self
            .get_data(&format!("/api/v1/issueDetails/{}", finding_id))
            .await?;
        Ok(FindingDetails {
            issue_instance_id: details.issue_instance_id,
            issue_name: details.issue_name,
            brief: details.brief,
            severity: details.friority.unwrap_or_default(),
            file_name: details.full_file_name,
            line_number: details.line_number,
        })
    }

    async fn submit_bulk(&self, requests: &[BulkRequest]) -> Result<()> {
        let requests: Vec<Value> = requests
            .iter()
            .map(|r| {
                json!({
                    "httpVerb": r.http_verb,
                    "postData": r.post_data,
                    "uri": self.url(&r.uri),
                })
            })
            .collect();
        let _: Value = self
            .send_json(Method::POST, "/api/v1/bulk", &json!({ "requests": requests }))
            .await?;
        Ok(())
    }

    async fn tag_findings(
        &self,
        version: VersionId,
        findings: &[FindingHandle],
        tag_guid: &str,
        value: &str,
    ) -> Result<bool> {
        let body = json!({
            "customTagAudit": {
                "customTagGuid": tag_guid,
                "textValue": value,
            },
            "issues": findings,
        });
        let path = format!("{}/issues/action/updateTag", Self::version_path(version));
        let accepted: Value = self.send_json(Method::POST, &path, &body).await?;
        Ok(match accepted {
            Value::Array(items) => !items.is_empty(),
            Value::Null => false,
            _ => true,
        })
    }

    async fn version_custom_tags(&self, version: VersionId) -> Result<Vec<String>> {
        let path = format!("{}/customTags?limit=-1&fields=guid", Self::version_path(version));
        let tags: Vec<Value> = self.get_data(&path).await?;
        Ok(tags
            .iter()
            .filter_map(|t| t.get("guid").and_then(Value::as_str).map(String::from))
            .collect())
    }

    async fn custom_tag_exists(&self, tag_guid: &str) -> Result<bool> {
        let query = urlencoding::encode(&format!("guid:{}", tag_guid)).into_owned();
        let tags: Vec<Value> = self
            .get_data(&format!("/api/v1/customTags?q={}", query))
            .await?;
        Ok(!tags.is_empty())
    }

    async fn attach_custom_tag(&self, version: VersionId, tag_guid: &str) -> Result<()> {
        let path = format!("{}/customTags", Self::version_path(version));
        let _: Value = self
            .send_json(Method::POST, &path, &json!({ "guid": tag_guid }))
            .await?;
        Ok(())
    }

    async fn find_filter_set(&self, version: VersionId, name: &str) -> Result<Option<FilterSet>> {
        let path = format!("{}/filterSets", Self::version_path(version));
        let filter_sets: Vec<SscFilterSet> = self.get_data(&path).await?;
        Ok(filter_sets
            .into_iter()
            .find(|fs| fs.title == name)
            .map(|fs| FilterSet {
                guid: fs.guid,
                name: fs.title,
                folders: fs
                    .folders
                    .into_iter()
                    .map(|f| Folder {
                        guid: f.guid,
                        name: f.name,
                    })
                    .collect(),
            }))
    }

    async fn folder_counts(
        &self,
        version: VersionId,
        filter_set_guid: &str,
        query: &IssueQuery,
    ) -> Result<Vec<FolderCount>> {
        let mut path = format!(
            "{}/issueGroups?filterset={}&groupingtype=FOLDER",
            Self::version_path(version),
            urlencoding::encode(filter_set_guid)
        );
        if let Some(search) = query.search_expression() {
            path.push_str(&format!("&qm=issues&q={}", urlencoding::encode(&search)));
        }
        let groups: Vec<SscIssueGroup> = self.get_data(&path).await?;
        Ok(groups
            .into_iter()
            .map(|g| FolderCount::new(g.id, g.total_count))
            .collect())
    }

    async fn security_rating(&self, version: VersionId) -> Result<f64> {
        let path = format!(
            "{}/performanceIndicatorHistories?q={}",
            Self::version_path(version),
            Self::name_query(SECURITY_RATING_INDICATOR)
        );
        let indicators: Vec<SscIndicator> = self.get_data(&path).await?;
        indicators
            .first()
            .map(|i| i.value)
            .ok_or_else(|| {
                PipelineError::UnexpectedResponse {
                    operation: "read security rating".to_string(),
                    details: "no performance indicator returned".to_string(),
                }
                .into()
            })
    }

    async fn upload_artifact(&self, version: VersionId, file: &Path) -> Result<Artifact> {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read scan result {}", file.display()))?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scan.fpr".to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name));

        let path = format!("{}/artifacts", Self::version_path(version));
        let response = self
            .send(self.request(Method::POST, &path).multipart(form), &path)
            .await?;
        let envelope: Envelope<SscArtifact> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {}", path))?;
        Ok(envelope.data.into())
    }

    async fn get_artifact(&self, artifact_id: u64) -> Result<Artifact> {
        let artifact: SscArtifact = self
            .get_data(&format!("/api/v1/artifacts/{}?embed=scans", artifact_id))
            .await?;
        Ok(artifact.into())
    }

    async fn list_artifacts(&self, version: VersionId) -> Result<Vec<Artifact>> {
        let path = format!("{}/artifacts?limit=-1&embed=scans", Self::version_path(version));
        let artifacts: Vec<SscArtifact> = self.get_data(&path).await?;
        Ok(artifacts.into_iter().map(Artifact::from).collect())
    }
}
