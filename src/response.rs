use serde::Serialize;
use utoipa::ToSchema;

/// Paging block attached to list responses. `total_pages` is precomputed so
/// the storefront can render pager links without doing the division itself.
#[derive(Debug, Serialize, ToSchema)]
pub struct Meta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Meta {
    pub fn paged(page: i64, per_page: i64, total: i64) -> Self {
        let per_page = per_page.max(1);
        Self {
            page,
            per_page,
            total,
            total_pages: total / per_page + (total % per_page > 0) as i64,
        }
    }
}

/// Envelope every endpoint responds with: a human-readable message, the
/// payload, and a paging block on list endpoints only.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn paged(
        message: impl Into<String>,
        data: T,
        page: i64,
        per_page: i64,
        total: i64,
    ) -> Self {
        Self::success(message, data, Some(Meta::paged(page, per_page, total)))
    }
}
