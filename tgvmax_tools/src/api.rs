use std::{future::Future, sync::Arc};

use log::*;
use reqwest::Client;

use crate::{
    config::TgvMaxConfig,
    data_objects::{RecordsPage, TgvMaxRecord},
    TgvMaxApiError,
    WhereClause,
};

#[derive(Clone)]
pub struct TgvMaxApi {
    config: TgvMaxConfig,
    client: Arc<Client>,
}

impl TgvMaxApi {
    pub fn new(config: TgvMaxConfig) -> Result<Self, TgvMaxApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TgvMaxApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Fetches a single page of results matching `clause`.
    pub async fn fetch_page(&self, clause: &WhereClause) -> Result<RecordsPage, TgvMaxApiError> {
        let mut params = self.config.query_params();
        params.push(("where", clause.to_string()));
        trace!("🚄️ GET {} where {clause}", self.config.base_url);
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| TgvMaxApiError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            let page = response.json::<RecordsPage>().await.map_err(|e| TgvMaxApiError::JsonError(e.to_string()))?;
            trace!("🚄️ Page received with {} results", page.results.len());
            Ok(page)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| TgvMaxApiError::RequestError(e.to_string()))?;
            Err(TgvMaxApiError::QueryError { status, message })
        }
    }

    /// Fetches every record matching `clause`, following the date cursor until an empty page comes back.
    ///
    /// Any failed request aborts the whole fetch; partial results are discarded. Individual malformed records are
    /// dropped without failing the fetch.
    pub async fn fetch_all(&self, clause: &WhereClause) -> Result<Vec<TgvMaxRecord>, TgvMaxApiError> {
        debug!("🚄️ Fetching tickets where {clause}");
        let records = paginate(clause, |page_clause| async move { self.fetch_page(&page_clause).await }).await?;
        info!("🚄️ Tickets fetched: {}", records.len());
        Ok(records)
    }
}

/// Drives the cursor pagination used by the records endpoint.
///
/// Results are ordered by date, so after each non-empty page the next request asks for records dated strictly after
/// the last result received. The cursor only has day granularity: same-day records straddling a page boundary can be
/// repeated or missed, and callers must tolerate duplicates.
///
/// Pagination also stops if a page fails to move the cursor forward, which would otherwise loop forever against a
/// server that ignores the cursor term.
pub async fn paginate<F, Fut>(base: &WhereClause, mut fetch_page: F) -> Result<Vec<TgvMaxRecord>, TgvMaxApiError>
where
    F: FnMut(WhereClause) -> Fut,
    Fut: Future<Output = Result<RecordsPage, TgvMaxApiError>>,
{
    let page = fetch_page(base.clone()).await?;
    let mut cursor = match page.last_date() {
        Some(date) => date,
        None => return Ok(page.into_records()),
    };
    let mut records = page.into_records();
    let mut pages = 1usize;
    loop {
        let page = fetch_page(base.after(cursor.as_str())).await?;
        let next_cursor = match page.last_date() {
            Some(date) => date,
            None => {
                records.extend(page.into_records());
                break;
            },
        };
        pages += 1;
        records.extend(page.into_records());
        if next_cursor <= cursor {
            warn!("🚄️ Pagination cursor did not advance past {cursor} after {pages} pages. Stopping here.");
            break;
        }
        cursor = next_cursor;
    }
    trace!("🚄️ {} records over {pages} pages", records.len());
    Ok(records)
}
