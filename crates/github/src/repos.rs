//! Listing the authenticated user's repositories.

use markhub_protocol::RepositorySummary;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::provider::{Provider, narrow};

/// Repositories requested per page; GitHub's maximum.
pub const PAGE_SIZE: u8 = 100;

/// Lists every repository visible to the authenticated user, most recently
/// updated first.
///
/// Pages are fetched one after another until a page comes back with fewer
/// than [`PAGE_SIZE`] items. A full page always triggers another request,
/// since it may or may not be the last one.
///
/// # Errors
///
/// Returns the first page's error if any request fails; repositories from
/// earlier pages are dropped. Returns [`Error::UnexpectedResponse`] if a page
/// is not a list of repositories.
///
/// [`Error::UnexpectedResponse`]: crate::Error::UnexpectedResponse
#[instrument(skip(provider))]
pub async fn list_repositories<P: Provider>(provider: &P) -> Result<Vec<RepositorySummary>> {
    let mut repositories = Vec::new();
    let mut page = 1u32;

    loop {
        let payload = provider.list_repositories_page(PAGE_SIZE, page).await?;
        let items: Vec<RepositorySummary> = narrow(payload, "repository list")?;
        let count = items.len();
        debug!(page, count, "fetched repository page");

        repositories.extend(items);
        if count < usize::from(PAGE_SIZE) {
            break;
        }
        page += 1;
    }

    debug!(total = repositories.len(), "listed repositories");
    Ok(repositories)
}
