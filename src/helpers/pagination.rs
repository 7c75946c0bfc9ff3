use serde::Deserialize;
use crate::error::AppError;
use crate::helpers::validation::Violations;
use crate::models::page::PageRequest;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE as i64
}

/// One-based `page` and `size` as they arrive on the query string.
#[derive(Clone, Copy, Deserialize, Debug)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PageParams {
    pub fn to_page_request(self) -> Result<PageRequest, AppError> {
        let mut v = Violations::new();
        v.check(self.page >= 1, "page", "must be greater than or equal to 1");
        v.check(
            (1..=MAX_PAGE_SIZE as i64).contains(&self.size),
            "size",
            "must be between 1 and 100",
        );
        v.into_result()?;

        let mut v = Violations::new();
        v.check(
            (self.page - 1).checked_mul(self.size).is_some(),
            "page",
            "is too large",
        );
        v.into_result()?;

        Ok(PageRequest::new((self.page - 1) as usize, self.size as usize))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewSortField {
    DatePosted,
    LastEdited,
    Rating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewSort {
    pub field: ReviewSortField,
    pub direction: SortDirection,
}

impl Default for ReviewSort {
    fn default() -> Self {
        Self {
            field: ReviewSortField::DatePosted,
            direction: SortDirection::Desc,
        }
    }
}

impl ReviewSort {
    /// Parses `field[,asc|desc]`; the direction defaults to ascending.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };

        let (field, direction) = match raw.split_once(',') {
            Some((field, direction)) => (field.trim(), Some(direction.trim())),
            None => (raw, None),
        };

        let mut v = Violations::new();
        let field = match field {
            "datePosted" => Some(ReviewSortField::DatePosted),
            "lastEdited" => Some(ReviewSortField::LastEdited),
            "rating" => Some(ReviewSortField::Rating),
            _ => None,
        };
        v.check(field.is_some(), "sort", "must be one of datePosted, lastEdited, rating");

        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => Some(SortDirection::Asc),
            Some("desc") => Some(SortDirection::Desc),
            Some(_) => None,
        };
        v.check(direction.is_some(), "sort", "direction must be asc or desc");
        v.into_result()?;

        match (field, direction) {
            (Some(field), Some(direction)) => Ok(Self { field, direction }),
            _ => Ok(Self::default()),
        }
    }
}
