//! Comments endpoints
//!
//! Notes are scoped to a repayment and tagged with a comment type so the
//! application-details and paid-pending workflows keep separate threads.

use serde::{Deserialize, Serialize};

use crate::api::{handle_json, ApiClient};
use crate::error::Result;
use crate::models::CommentType;

#[derive(Debug, Serialize)]
struct CommentCreate<'a> {
    repayment_id: i64,
    comment: &'a str,
    comment_type: i32,
}

/// One stored comment.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub repayment_id: i64,
    #[serde(default)]
    pub comment: String,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: String,
    pub comment_type: Option<i32>,
    pub commented_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentListResponse {
    #[serde(default)]
    results: Vec<Comment>,
}

/// Count payload from the comment-count routes. The repayment id is omitted
/// because the backend reports it as a string on some deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentCount {
    pub comment_type: Option<i32>,
    #[serde(default)]
    pub comment_count: u64,
}

impl ApiClient {
    /// Attach a comment to a repayment.
    pub async fn create_comment(
        &self,
        repayment_id: i64,
        comment: &str,
        comment_type: CommentType,
    ) -> Result<Comment> {
        let body = CommentCreate {
            repayment_id,
            comment,
            comment_type: comment_type.code(),
        };
        let response = self.post("/comments/").json(&body).send().await?;
        handle_json(response).await
    }

    /// Comments on a repayment, filtered to one workflow's thread.
    pub async fn comments(
        &self,
        repayment_id: i64,
        comment_type: CommentType,
    ) -> Result<Vec<Comment>> {
        let response = self
            .get(&format!(
                "/comments/repayment/{repayment_id}/type/{}",
                comment_type.code()
            ))
            .send()
            .await?;
        let list: CommentListResponse = handle_json(response).await?;
        Ok(list.results)
    }

    /// Total comment count for a repayment, across all workflows.
    pub async fn comment_count(&self, repayment_id: i64) -> Result<CommentCount> {
        let response = self
            .get(&format!("/comments/repayment/{repayment_id}/count"))
            .send()
            .await?;
        handle_json(response).await
    }

    /// Comment count for one workflow's thread on a repayment.
    pub async fn comment_count_by_type(
        &self,
        repayment_id: i64,
        comment_type: CommentType,
    ) -> Result<CommentCount> {
        let response = self
            .get(&format!(
                "/comments/repayment/{repayment_id}/type/{}/count",
                comment_type.code()
            ))
            .send()
            .await?;
        handle_json(response).await
    }
}
