use serde::{Deserialize, Serialize};

/// Zero-based page window handed to repositories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus enough totals for the client to paginate.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub size: usize,
    pub number: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            (total_elements + request.size as u64 - 1) / request.size as u64
        };
        let number_of_elements = content.len();
        Page {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            size: request.size,
            number: request.page,
            number_of_elements,
            first: request.page == 0,
            last: request.page as u64 + 1 >= total_pages,
        }
    }

    /// Slices an in-memory, already ordered list.
    pub fn from_vec(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let content = items
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Page::new(content, request, total)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_slices_requested_window() {
        let page = Page::from_vec((1..=45).collect::<Vec<_>>(), PageRequest::new(2, 20));

        assert_eq!(page.content, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total_elements, 45);
        assert_eq!(page.total_pages, 3);
        assert!(!page.first);
        assert!(page.last);
    }

    #[test]
    fn empty_result_is_first_and_last() {
        let page: Page<u8> = Page::from_vec(Vec::new(), PageRequest::new(0, 20));

        assert!(page.empty);
        assert!(page.first);
        assert!(page.last);
        assert_eq!(page.total_pages, 0);
    }
}
