/// Parameters passed to the Jenkins job for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Full source-control ref, forwarded as the `branch` parameter
    pub branch: String,
    /// Pull request number, forwarded as the `pull_request` parameter
    pub pull_request: String,
}

/// Why an invocation is skipped without triggering anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingRef,
    NotPullRequest(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRef => write!(f, "Missing GITHUB_REF env var"),
            Self::NotPullRequest(git_ref) => write!(f, "Not running on PR, GITHUB_REF={git_ref}"),
        }
    }
}

impl BuildRequest {
    /// Builds a request from a `refs/pull/<number>/merge` ref.
    ///
    /// Any other shape is a skip, not an error.
    pub fn from_ref(git_ref: Option<&str>) -> Result<Self, SkipReason> {
        let git_ref = git_ref.ok_or(SkipReason::MissingRef)?;

        let number = git_ref
            .strip_prefix("refs/pull/")
            .and_then(|rest| rest.strip_suffix("/merge"))
            .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| SkipReason::NotPullRequest(git_ref.to_string()))?;

        Ok(Self {
            branch: git_ref.to_string(),
            pull_request: number.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_ref() {
        let request = BuildRequest::from_ref(Some("refs/pull/42/merge")).unwrap();
        assert_eq!(request.branch, "refs/pull/42/merge");
        assert_eq!(request.pull_request, "42");
    }

    #[test]
    fn test_branch_ref_is_skipped() {
        let skip = BuildRequest::from_ref(Some("refs/heads/main")).unwrap_err();
        assert_eq!(skip, SkipReason::NotPullRequest("refs/heads/main".to_string()));
        assert_eq!(skip.to_string(), "Not running on PR, GITHUB_REF=refs/heads/main");
    }

    #[test]
    fn test_missing_ref_is_skipped() {
        assert_eq!(BuildRequest::from_ref(None), Err(SkipReason::MissingRef));
    }

    #[test]
    fn test_malformed_pull_refs_are_skipped() {
        for git_ref in ["refs/pull//merge", "refs/pull/abc/merge", "refs/pull/42/head"] {
            assert!(BuildRequest::from_ref(Some(git_ref)).is_err(), "{git_ref}");
        }
    }
}
