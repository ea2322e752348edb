//! Feed ingestion command handler.
//!
//! Partners are processed one after another. A partner whose feed cannot be
//! fetched or parsed is logged and skipped; per-item failures are counted in
//! the partner's report by the pipeline itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use partneros_core::{AppConfig, Objective};
use partneros_db::PgStore;
use partneros_insights::{CatalogStore, IngestReport, Pipeline, PipelineConfig, PipelineStores};
use uuid::Uuid;

/// Download a feed document.
async fn fetch_feed(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Sum per-partner reports into a run total.
fn accumulate(total: &mut IngestReport, report: &IngestReport) {
    total.items_seen += report.items_seen;
    total.items_too_old += report.items_too_old;
    total.signals_created += report.signals_created;
    total.duplicates += report.duplicates;
    total.insights_created += report.insights_created;
    total.insights_skipped += report.insights_skipped;
    total.insights_failed += report.insights_failed;
    total.failures += report.failures;
}

/// Ingest every partner feed, optionally limited to one user's partners.
///
/// With `days`, items published before `now - days` are skipped (backfill
/// window). Undated items are always considered.
///
/// # Errors
///
/// Returns an error if partners cannot be listed or the HTTP client cannot be
/// built. Per-partner fetch and parse failures are logged and skipped.
pub(crate) async fn run_ingest(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    user: Option<Uuid>,
    days: Option<u32>,
    limit: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let store = Arc::new(PgStore::new(pool.clone()));
    let limit = limit.unwrap_or(config.ingest_max_partners);
    let partners = store.list_feed_partners(user, limit).await?;

    if dry_run {
        let names: Vec<&str> = partners.iter().map(|p| p.name.as_str()).collect();
        println!(
            "dry-run: would ingest {} partner feeds: [{}]",
            partners.len(),
            names.join(", ")
        );
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.feed_request_timeout_secs))
        .user_agent(config.feed_user_agent.as_str())
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build feed client: {e}"))?;

    let pipeline = Pipeline::new(
        crate::services::text_services(config)?,
        PipelineStores::shared(Arc::clone(&store)),
        PipelineConfig::from_app_config(config),
    );

    let now = Utc::now();
    let cutoff = days.map(|d| now - chrono::Duration::days(i64::from(d)));
    let mut objectives_by_user: HashMap<Uuid, Vec<Objective>> = HashMap::new();
    let mut total = IngestReport::default();
    let mut partners_skipped = 0_usize;

    for partner in &partners {
        let bytes = match fetch_feed(&client, &partner.rss_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    partner = %partner.name,
                    url = %partner.rss_url,
                    error = %e,
                    "skipping partner; failed to fetch feed"
                );
                partners_skipped += 1;
                continue;
            }
        };

        let items = match partneros_insights::parse_feed(&bytes, partner.id) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    partner = %partner.name,
                    error = %e,
                    "skipping partner; failed to parse feed"
                );
                partners_skipped += 1;
                continue;
            }
        };

        if !objectives_by_user.contains_key(&partner.user_id) {
            let objectives = store.list_objectives(partner.user_id).await?;
            objectives_by_user.insert(partner.user_id, objectives);
        }
        let objectives = objectives_by_user
            .get(&partner.user_id)
            .map_or(&[][..], Vec::as_slice);

        let report = pipeline
            .ingest_partner(partner, &items, objectives, cutoff, now)
            .await;
        accumulate(&mut total, &report);
    }

    println!(
        "ingested {} signals and {} insights from {} partners \
         ({} duplicates, {} too old, {} item failures, {} insight failures, \
         {} partners skipped)",
        total.signals_created,
        total.insights_created,
        partners.len() - partners_skipped,
        total.duplicates,
        total.items_too_old,
        total.failures,
        total.insights_failed,
        partners_skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_sums_every_counter() {
        let mut total = IngestReport::default();
        let report = IngestReport {
            partner_id: Uuid::new_v4(),
            items_seen: 5,
            items_too_old: 1,
            signals_created: 2,
            duplicates: 1,
            insights_created: 4,
            insights_skipped: 1,
            insights_failed: 3,
            failures: 1,
        };
        accumulate(&mut total, &report);
        accumulate(&mut total, &report);

        assert_eq!(total.items_seen, 10);
        assert_eq!(total.signals_created, 4);
        assert_eq!(total.insights_created, 8);
        assert_eq!(total.insights_failed, 6);
        assert_eq!(total.failures, 2);
        assert_eq!(total.partner_id, Uuid::nil());
    }
}
