use serde::Deserialize;
use utoipa::ToSchema;

/// Admin listings page at a fixed size of 5, matching the back-office UI.
pub const DEFAULT_PER_PAGE: i64 = 5;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

// Paging fields are repeated here instead of flattening `Pagination`:
// serde_urlencoded cannot deserialize numeric fields through #[serde(flatten)],
// so a flattened query would reject `?page=2` with a 400.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

impl OrderListQuery {
    pub fn normalize(&self) -> (i64, i64, i64) {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
        .normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    #[test]
    fn defaults_to_first_page_of_five() {
        let pagination = Pagination::default();
        assert_eq!(pagination.normalize(), (1, 5, 0));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let pagination = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(pagination.normalize(), (1, 100, 0));
    }

    #[test]
    fn offset_follows_page() {
        let pagination = Pagination {
            page: Some(3),
            per_page: None,
        };
        assert_eq!(pagination.normalize(), (3, 5, 10));
    }

    #[test]
    fn order_list_query_parses_from_a_request_uri() {
        let uri: Uri = "/api/admin/orders?page=2&per_page=5&status=pending"
            .parse()
            .unwrap();
        let Query(query) = Query::<OrderListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.normalize(), (2, 5, 5));
        assert_eq!(query.status.as_deref(), Some("pending"));
    }

    #[test]
    fn order_list_query_parses_without_paging_params() {
        let uri: Uri = "/api/admin/orders".parse().unwrap();
        let Query(query) = Query::<OrderListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.normalize(), (1, 5, 0));
        assert_eq!(query.status, None);
    }
}
