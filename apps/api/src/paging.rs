//! Sorting and pagination for collection listings
//!
//! Listing endpoints accept `page` (0-based) and `size` together,
//! `sortBy` and `sortOrder` (`ASC`/`DESC`). Paged responses advertise
//! neighbouring pages in an RFC 5988 `Link` header.

use std::cmp::Ordering;

use serde::Deserialize;
use url::form_urlencoded;

use crate::error::{ApiError, ApiResult};
use crate::models::Privilege;
use crate::search::SearchCriteria;

/// Maximum items per page
pub const MAX_PAGE_SIZE: i64 = 100;

/// Attributes a listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Description,
}

impl SortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Ordering of a listing; ties are always broken by ascending id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    /// Compare two privileges the way the database orders them
    ///
    /// Text compares bytewise (`COLLATE "C"`); a missing description
    /// sorts after any present one in ascending order, as NULLs do in
    /// PostgreSQL.
    pub fn compare(&self, a: &Privilege, b: &Privilege) -> Ordering {
        let primary = match self.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => match (&a.description, &b.description) {
                (Some(x), Some(y)) => x.cmp(y),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
            },
        };

        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };

        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// `ORDER BY` clause matching [`Sort::compare`]
    pub fn order_by_sql(&self) -> String {
        match self.field {
            SortField::Id => format!(" ORDER BY id {}", self.order.as_sql()),
            field => format!(
                " ORDER BY {} COLLATE \"C\" {}, id ASC",
                field.as_str(),
                self.order.as_sql()
            ),
        }
    }
}

/// A requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// Number of pages needed for `total` items (at least one)
    pub fn total_pages(&self, total: i64) -> i64 {
        ((total + self.size - 1) / self.size).max(1)
    }
}

/// Everything a repository needs to answer a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub criteria: SearchCriteria,
    pub sort: Sort,
    pub page: Option<PageRequest>,
}

/// Raw listing query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

impl ListParams {
    /// Validate the parameters into a repository query
    ///
    /// # Errors
    /// `ApiError::InvalidQueryParam` or `ApiError::InvalidSearch` (both 400)
    pub fn to_query(&self) -> ApiResult<ListQuery> {
        let criteria = match &self.q {
            Some(q) => SearchCriteria::parse(q)?,
            None => SearchCriteria::default(),
        };

        let field = match &self.sort_by {
            Some(raw) => SortField::parse(raw).ok_or_else(|| ApiError::InvalidQueryParam {
                name: "sortBy",
                reason: format!("cannot sort by '{}'", raw),
            })?,
            None => SortField::default(),
        };

        let order = match &self.sort_order {
            Some(raw) => SortOrder::parse(raw).ok_or_else(|| ApiError::InvalidQueryParam {
                name: "sortOrder",
                reason: format!("expected ASC or DESC, got '{}'", raw),
            })?,
            None => SortOrder::default(),
        };

        let page = match (&self.page, &self.size) {
            (None, None) => None,
            (Some(page), Some(size)) => Some(PageRequest {
                page: parse_bounded("page", page, 0, i64::MAX)?,
                size: parse_bounded("size", size, 1, MAX_PAGE_SIZE)?,
            }),
            (Some(_), None) => {
                return Err(ApiError::InvalidQueryParam {
                    name: "size",
                    reason: "required when page is given".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(ApiError::InvalidQueryParam {
                    name: "page",
                    reason: "required when size is given".to_string(),
                })
            }
        };

        Ok(ListQuery {
            criteria,
            sort: Sort { field, order },
            page,
        })
    }

    /// `Link` header value for `request` within a collection of `total` items
    pub fn link_header(&self, path: &str, request: PageRequest, total: i64) -> String {
        let last = request.total_pages(total) - 1;
        let mut links = Vec::with_capacity(4);

        links.push(self.link(path, 0, request.size, "first"));
        if request.page > 0 {
            let prev = (request.page - 1).min(last);
            links.push(self.link(path, prev, request.size, "prev"));
        }
        if request.page < last {
            links.push(self.link(path, request.page + 1, request.size, "next"));
        }
        links.push(self.link(path, last, request.size, "last"));

        links.join(", ")
    }

    fn link(&self, path: &str, page: i64, size: i64, rel: &str) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(q) = &self.q {
            query.append_pair("q", q);
        }
        query.append_pair("page", &page.to_string());
        query.append_pair("size", &size.to_string());
        if let Some(sort_by) = &self.sort_by {
            query.append_pair("sortBy", sort_by);
        }
        if let Some(sort_order) = &self.sort_order {
            query.append_pair("sortOrder", sort_order);
        }

        format!("<{}?{}>; rel=\"{}\"", path, query.finish(), rel)
    }
}

fn parse_bounded(name: &'static str, raw: &str, min: i64, max: i64) -> ApiResult<i64> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidQueryParam {
            name,
            reason: format!("'{}' is not a number", raw),
        })?;

    if value < min || value > max {
        return Err(ApiError::InvalidQueryParam {
            name,
            reason: format!("must be between {} and {} (got {})", min, max, value),
        });
    }

    Ok(value)
}
