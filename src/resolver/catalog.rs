use super::{fan_out, CatalogLoad, FanoutResolver, ResolutionFailure};
use crate::errors::CatalogResult;
use crate::normalize::{id_from_url, normalize_list_page};
use crate::source::RemoteSource;
use schema::{Entity, ResourceRef};
use tracing::{debug, info, warn};

impl<S: RemoteSource> FanoutResolver<S> {
    /// Walk the list endpoint until `catalog_limit` stubs are collected or the
    /// upstream runs out. Returns the upstream `count` and the stubs in list order.
    ///
    /// Any page failure is terminal: without the list there is nothing to fan out.
    pub async fn list_stubs(&self) -> CatalogResult<(u32, Vec<ResourceRef>)> {
        let limit = self.config.catalog_limit as usize;
        let mut next_url = Some(self.config.list_url());
        let mut upstream_count = 0;
        let mut stubs = Vec::new();

        while let Some(url) = next_url.take() {
            debug!(%url, collected = stubs.len(), "fetching list page");
            let page = self.fetch_normalized(url, normalize_list_page).await?;
            upstream_count = page.count;
            if page.results.is_empty() {
                break;
            }
            stubs.extend(page.results);
            if stubs.len() >= limit {
                break;
            }
            next_url = page.next;
        }

        stubs.truncate(limit);
        Ok((upstream_count, stubs))
    }

    async fn resolve_stub(&self, stub: ResourceRef) -> CatalogResult<Entity> {
        let id = id_from_url(&stub.url)?;
        self.resolve_entity_at(id, stub.url).await
    }

    /// Resolve every species on the list endpoint into a full `Entity`.
    ///
    /// Stubs that fail are dropped from the catalog and recorded in
    /// `CatalogLoad::failures`; only a list-page failure fails the call.
    pub async fn resolve_catalog(&self) -> CatalogResult<CatalogLoad> {
        let (upstream_count, stubs) = self.list_stubs().await?;
        let names: Vec<String> = stubs.iter().map(|stub| stub.name.clone()).collect();
        info!(stubs = stubs.len(), upstream_count, "resolving catalog");

        let results = fan_out(stubs, |stub| {
            let resolver = self.clone();
            async move { resolver.resolve_stub(stub).await }
        })
        .await;

        let mut entities = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (reference, result) in names.into_iter().zip(results) {
            match result {
                Ok(entity) => entities.push(entity),
                Err(error) => {
                    warn!(%reference, %error, "dropping species from catalog");
                    failures.push(ResolutionFailure { reference, error });
                }
            }
        }

        info!(
            resolved = entities.len(),
            failed = failures.len(),
            "catalog resolved"
        );
        Ok(CatalogLoad {
            entities,
            failures,
            upstream_count,
        })
    }
}
