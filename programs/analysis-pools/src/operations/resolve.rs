use anchor_lang::prelude::*;

use crate::errors::AnalysisPoolError;
use crate::ledger::ResolutionReport;
use crate::operations::classify::derive_pool_outcome;
use crate::state::*;

/// Record the resolution authority's verdict on a news item.
///
/// Only the designated resolver may call this, only once, and only with a
/// YES or NO outcome.
pub fn resolve_news_item(
    news: &mut NewsItem,
    authority: &Pubkey,
    report: ResolutionReport,
) -> Result<()> {
    require_keys_eq!(
        *authority,
        news.resolver,
        AnalysisPoolError::UnauthorizedResolver
    );
    require_keys_eq!(
        report.resolved_by,
        news.resolver,
        AnalysisPoolError::UnauthorizedResolver
    );
    require!(!news.resolved, AnalysisPoolError::NewsAlreadyResolved);
    require!(
        report.outcome != NewsOutcome::Unresolved,
        AnalysisPoolError::InvalidOutcome
    );

    news.resolved = true;
    news.outcome = report.outcome;
    news.resolution = Some(ResolutionMetadata {
        resolved_at: report.resolved_at,
        resolved_by: report.resolved_by,
        source: report.source,
        notes: report.notes,
    });

    msg!(
        "News #{} resolved: outcome={:?} by {} at {}",
        news.news_id,
        news.outcome,
        authority,
        report.resolved_at,
    );

    Ok(())
}

/// Update the source/notes of an already-resolved news item. Outcome and
/// timestamps stay frozen.
pub fn amend_resolution_metadata(
    news: &mut NewsItem,
    authority: &Pubkey,
    source: String,
    notes: String,
) -> Result<()> {
    require_keys_eq!(
        *authority,
        news.resolver,
        AnalysisPoolError::UnauthorizedResolver
    );
    let metadata = news
        .resolution
        .as_mut()
        .ok_or(AnalysisPoolError::NewsNotResolved)?;

    metadata.source = source;
    metadata.notes = notes;

    msg!("News #{} resolution metadata amended", news.news_id);
    Ok(())
}

/// Settle a pool's outcome from its resolved news item. After this the pool
/// is immutable.
pub fn resolve_pool(pool: &mut AnalysisPool, news: &NewsItem) -> Result<PoolOutcome> {
    require!(
        pool.news_id == news.news_id,
        AnalysisPoolError::PoolNotInNewsItem
    );
    require!(news.resolved, AnalysisPoolError::NewsNotResolved);
    require!(!pool.resolved, AnalysisPoolError::PoolAlreadyResolved);

    let outcome = derive_pool_outcome(pool.position, news.outcome);
    require!(
        outcome != PoolOutcome::Unresolved,
        AnalysisPoolError::InvalidOutcome
    );

    pool.resolved = true;
    pool.outcome = outcome;
    pool.resolved_at = news.resolution.as_ref().map(|r| r.resolved_at);

    msg!(
        "Pool #{} resolved: creator position={:?} news outcome={:?} -> {:?}",
        pool.pool_id,
        pool.position,
        news.outcome,
        outcome,
    );

    Ok(outcome)
}
