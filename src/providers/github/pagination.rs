use reqwest::header::{HeaderMap, LINK};
use url::Url;

const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PER_PAGE: u32 = 30;

/// How many pages of a list endpoint to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Only the first page the API returns.
    FirstPage { per_page: u32 },
    /// Follow `rel="next"` links until they run out or `max_pages` pages are read.
    Follow { per_page: u32, max_pages: u32 },
}

impl Default for Paging {
    fn default() -> Self {
        Paging::FirstPage {
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Paging {
    pub fn first_page(per_page: u32) -> Self {
        Paging::FirstPage {
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn follow(per_page: u32, max_pages: u32) -> Self {
        Paging::Follow {
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            max_pages: max_pages.max(1),
        }
    }

    pub fn per_page(self) -> u32 {
        match self {
            Paging::FirstPage { per_page } | Paging::Follow { per_page, .. } => per_page,
        }
    }

    pub fn max_pages(self) -> u32 {
        match self {
            Paging::FirstPage { .. } => 1,
            Paging::Follow { max_pages, .. } => max_pages,
        }
    }
}

/// Extract the `rel="next"` target from a response's `Link` header.
pub fn next_link(headers: &HeaderMap) -> Option<Url> {
    let header = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(header)
}

fn parse_next_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|entry| {
        let mut params = entry.split(';');
        let target = params
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;

        let is_next = params.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });

        if is_next {
            Url::parse(target).ok()
        } else {
            None
        }
    })
}
