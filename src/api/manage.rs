use crate::Result;
use crate::protocol::manage::{
    Balance, BalancesResponse, CreateKeyRequest, CreatedKey, KeysResponse, MembersResponse,
    MessageResponse, Project, ProjectKey, ProjectUpdate, ProjectsResponse, UsageFieldsResponse,
    UsageRequest, UsageRequestsOptions, UsageRequestsResponse, UsageSummaryOptions,
    UsageSummaryResponse,
};
use crate::transport::query;
use crate::transport::rest::RestClient;

/// Project administration: projects, API keys, members, usage, and
/// balances.
#[derive(Clone, Debug)]
pub struct Manage {
    rest: RestClient,
}

impl Manage {
    pub(crate) const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn projects(&self) -> Result<ProjectsResponse> {
        self.rest.get("projects", &[]).await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn project(&self, project_id: &str) -> Result<Project> {
        self.rest.get(&format!("projects/{project_id}"), &[]).await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<MessageResponse> {
        self.rest
            .patch(&format!("projects/{project_id}"), update)
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn delete_project(&self, project_id: &str) -> Result<MessageResponse> {
        self.rest.delete(&format!("projects/{project_id}")).await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn keys(&self, project_id: &str) -> Result<KeysResponse> {
        self.rest
            .get(&format!("projects/{project_id}/keys"), &[])
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn key(&self, project_id: &str, key_id: &str) -> Result<ProjectKey> {
        self.rest
            .get(&format!("projects/{project_id}/keys/{key_id}"), &[])
            .await
    }

    /// Create an API key. The returned secret is shown exactly once.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn create_key(
        &self,
        project_id: &str,
        request: &CreateKeyRequest,
    ) -> Result<CreatedKey> {
        self.rest
            .post(&format!("projects/{project_id}/keys"), &[], request)
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn delete_key(&self, project_id: &str, key_id: &str) -> Result<MessageResponse> {
        self.rest
            .delete(&format!("projects/{project_id}/keys/{key_id}"))
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn members(&self, project_id: &str) -> Result<MembersResponse> {
        self.rest
            .get(&format!("projects/{project_id}/members"), &[])
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn remove_member(
        &self,
        project_id: &str,
        member_id: &str,
    ) -> Result<MessageResponse> {
        self.rest
            .delete(&format!("projects/{project_id}/members/{member_id}"))
            .await
    }

    /// List usage requests, newest first. Filters share the REST
    /// query-string rules.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn usage_requests(
        &self,
        project_id: &str,
        options: &UsageRequestsOptions,
    ) -> Result<UsageRequestsResponse> {
        let query = query::pairs(options)?;
        self.rest
            .get(&format!("projects/{project_id}/requests"), &query)
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn usage_request(&self, project_id: &str, request_id: &str) -> Result<UsageRequest> {
        self.rest
            .get(&format!("projects/{project_id}/requests/{request_id}"), &[])
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn usage_summary(
        &self,
        project_id: &str,
        options: &UsageSummaryOptions,
    ) -> Result<UsageSummaryResponse> {
        let query = query::pairs(options)?;
        self.rest
            .get(&format!("projects/{project_id}/usage"), &query)
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn usage_fields(&self, project_id: &str) -> Result<UsageFieldsResponse> {
        self.rest
            .get(&format!("projects/{project_id}/usage/fields"), &[])
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn balances(&self, project_id: &str) -> Result<BalancesResponse> {
        self.rest
            .get(&format!("projects/{project_id}/balances"), &[])
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn balance(&self, project_id: &str, balance_id: &str) -> Result<Balance> {
        self.rest
            .get(&format!("projects/{project_id}/balances/{balance_id}"), &[])
            .await
    }
}
