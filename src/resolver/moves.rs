use super::{fan_out, FanoutResolver, ItemOutcome, PartialResult, ResolutionFailure};
use crate::errors::CatalogResult;
use crate::normalize::normalize_move;
use crate::source::RemoteSource;
use schema::{Entity, MoveDetail, MoveRef};
use tracing::{info, warn};

impl<S: RemoteSource> FanoutResolver<S> {
    /// Resolve one move reference through the move cache (keyed by move name).
    pub async fn resolve_move(&self, move_ref: &MoveRef) -> CatalogResult<MoveDetail> {
        self.caches
            .moves
            .get_or_resolve(move_ref.name.clone(), || {
                self.fetch_normalized(move_ref.detail_url.clone(), normalize_move)
            })
            .await
    }

    /// Resolve every move an entity can learn.
    ///
    /// A failing move never aborts its siblings; it shows up as a
    /// `Failed` item at the same position.
    pub async fn resolve_moves(&self, entity: &Entity) -> PartialResult<MoveDetail> {
        let refs = entity.move_refs.clone();
        let names: Vec<String> = refs.iter().map(|r| r.name.clone()).collect();

        let results = fan_out(refs, |move_ref| {
            let resolver = self.clone();
            async move { resolver.resolve_move(&move_ref).await }
        })
        .await;

        let items: Vec<ItemOutcome<MoveDetail>> = names
            .into_iter()
            .zip(results)
            .map(|(reference, result)| match result {
                Ok(detail) => ItemOutcome::Resolved(detail),
                Err(error) => {
                    warn!(pokemon = %entity.name, %reference, %error, "move failed to resolve");
                    ItemOutcome::Failed(ResolutionFailure { reference, error })
                }
            })
            .collect();

        let outcome = PartialResult::new(items);
        info!(
            pokemon = %entity.name,
            resolved = outcome.success_count(),
            failed = outcome.failure_count(),
            "moves resolved"
        );
        outcome
    }
}
