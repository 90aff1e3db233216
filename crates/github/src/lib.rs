pub mod artifact;
pub mod comment;
pub mod error;

use std::future::Future;

use bytes::Bytes;
use octocrab::{
    Octocrab,
    models::{ArtifactId, RunId},
    params::actions::ArchiveFormat,
};
use primer_bot_core::{
    config::GitHubConfig,
    models::{ArtifactEntry, RepoRef},
};

pub use crate::error::{Error, Result};

/// The subset of the GitHub API used by the primer workflows.
pub trait ActionsApi {
    /// Lists every artifact of a workflow run, in the order GitHub returns them.
    fn list_run_artifacts(
        &self,
        repo: &RepoRef,
        run_id: u64,
    ) -> impl Future<Output = Result<Vec<ArtifactEntry>>> + Send;

    /// Downloads an artifact as a zip archive.
    fn download_artifact(
        &self,
        repo: &RepoRef,
        artifact_id: u64,
    ) -> impl Future<Output = Result<Bytes>> + Send;

    /// Creates a comment on an issue or pull request.
    fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct GitHub {
    pub client: Octocrab,
}

impl GitHub {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = &config.token {
            builder = builder.personal_token(token.clone());
        } else {
            tracing::warn!("No GitHub token configured, requests will be unauthenticated");
        }
        let client = builder.build().map_err(Error::remote("create client"))?;
        Ok(Self { client })
    }
}

impl ActionsApi for GitHub {
    async fn list_run_artifacts(&self, repo: &RepoRef, run_id: u64) -> Result<Vec<ArtifactEntry>> {
        let page = self
            .client
            .actions()
            .list_workflow_run_artifacts(&repo.owner, &repo.name, RunId(run_id))
            .send()
            .await
            .map_err(Error::remote("list workflow run artifacts"))?
            .value
            .unwrap_or_default();
        let artifacts = self
            .client
            .all_pages(page)
            .await
            .map_err(Error::remote("list workflow run artifacts"))?;
        tracing::debug!("Run {} (artifacts {})", run_id, artifacts.len());
        Ok(artifacts
            .into_iter()
            .map(|a| ArtifactEntry { id: a.id.into_inner(), name: a.name })
            .collect())
    }

    async fn download_artifact(&self, repo: &RepoRef, artifact_id: u64) -> Result<Bytes> {
        self.client
            .actions()
            .download_artifact(&repo.owner, &repo.name, ArtifactId(artifact_id), ArchiveFormat::Zip)
            .await
            .map_err(Error::remote("download artifact"))
    }

    async fn create_comment(&self, repo: &RepoRef, issue_number: u64, body: &str) -> Result<()> {
        let comment = self
            .client
            .issues(&repo.owner, &repo.name)
            .create_comment(issue_number, body)
            .await
            .map_err(Error::remote("create comment"))?;
        tracing::info!("Created comment {} on {}#{}", comment.id, repo, issue_number);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// In-memory stand-in for GitHub.
    #[derive(Default)]
    pub struct FakeApi {
        pub artifacts: Vec<ArtifactEntry>,
        pub archives: Vec<(u64, Bytes)>,
        pub fail_comments: bool,
        pub comments: Mutex<Vec<(RepoRef, u64, String)>>,
    }

    impl FakeApi {
        pub fn comments(&self) -> Vec<(RepoRef, u64, String)> {
            self.comments.lock().unwrap().clone()
        }
    }

    impl ActionsApi for FakeApi {
        async fn list_run_artifacts(
            &self,
            _repo: &RepoRef,
            _run_id: u64,
        ) -> Result<Vec<ArtifactEntry>> {
            Ok(self.artifacts.clone())
        }

        async fn download_artifact(&self, _repo: &RepoRef, artifact_id: u64) -> Result<Bytes> {
            self.archives
                .iter()
                .find(|(id, _)| *id == artifact_id)
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| Error::remote("download artifact")("404 Not Found"))
        }

        async fn create_comment(
            &self,
            repo: &RepoRef,
            issue_number: u64,
            body: &str,
        ) -> Result<()> {
            if self.fail_comments {
                return Err(Error::remote("create comment")("502 Bad Gateway"));
            }
            self.comments.lock().unwrap().push((repo.clone(), issue_number, body.to_string()));
            Ok(())
        }
    }

    pub fn repo() -> RepoRef { RepoRef { owner: "PyCQA".into(), name: "flake8-pyi".into() } }
}
