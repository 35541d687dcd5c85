use crate::error::Result;
use crate::plugin::query::RowSink;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, info};

pub const FIRST_PAGE: u32 = 1;
pub const PAGE_SIZE: u32 = 50;

/// One page of a GitLab list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    /// Value of `X-Next-Page`; 0 when there is no next page.
    pub next_page: u32,
}

/// Walks a paginated endpoint from page 1, streaming every item as it arrives.
///
/// Stops when the endpoint reports no next page. The first error aborts the
/// walk; items already streamed stay streamed.
pub async fn paginate<F, Fut>(mut fetch_page: F, sink: &mut (dyn RowSink + Send)) -> Result<()>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut page = FIRST_PAGE;
    let mut streamed = 0usize;

    loop {
        let Page { items, next_page } = fetch_page(page).await?;
        debug!(page, items = items.len(), next_page, "fetched page");

        for item in items {
            sink.stream_list_item(item)?;
            streamed += 1;
        }

        if next_page == 0 {
            break;
        }
        page = next_page;
    }

    info!(pages = page, items = streamed, "list complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::future::ready;

    #[tokio::test]
    async fn test_paginate_follows_next_page_until_zero() {
        let mut calls = Vec::new();
        let mut items: Vec<Value> = Vec::new();

        let mock_fetcher = |page: u32| {
            calls.push(page);
            let result = match page {
                1 => Ok(Page {
                    items: vec![json!({"id": 1}), json!({"id": 2})],
                    next_page: 2,
                }),
                2 => Ok(Page {
                    items: vec![json!({"id": 3})],
                    next_page: 3,
                }),
                3 => Ok(Page {
                    items: vec![json!({"id": 4})],
                    next_page: 0,
                }),
                _ => Err(Error::UnsupportedQuery("unexpected page".to_string())),
            };
            ready(result)
        };

        paginate(mock_fetcher, &mut items).await.unwrap();

        assert_eq!(calls, vec![1, 2, 3]);
        assert_eq!(
            items,
            vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3}), json!({"id": 4})]
        );
    }

    #[tokio::test]
    async fn test_paginate_single_empty_page() {
        let mut items: Vec<Value> = Vec::new();
        let mock_fetcher = |_page: u32| {
            ready(Ok(Page {
                items: vec![],
                next_page: 0,
            }))
        };

        paginate(mock_fetcher, &mut items).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_paginate_error_aborts_after_streamed_rows() {
        let mut items: Vec<Value> = Vec::new();
        let mock_fetcher = |page: u32| {
            let result = match page {
                1 => Ok(Page {
                    items: vec![json!({"id": 1})],
                    next_page: 2,
                }),
                _ => Err(Error::Upstream {
                    status: 429,
                    message: "rate limited".to_string(),
                }),
            };
            ready(result)
        };

        let result = paginate(mock_fetcher, &mut items).await;

        assert!(matches!(result, Err(Error::Upstream { status: 429, .. })));
        assert_eq!(items, vec![json!({"id": 1})]);
    }
}
