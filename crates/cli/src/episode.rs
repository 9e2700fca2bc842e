use owo_colors::OwoColorize;

use myanime::prelude::*;

use crate::logger::*;
use crate::utils::*;

/// reconciles the configured range against the listing.
///
/// returns the client too so episode pages are fetched with the same settings.
pub async fn resolve_episode_links(
    config: &ShowConfig,
    logger: &CliLogger,
) -> Result<(MyAnimeClient, Reconciled)> {
    logger.loading("initializing");
    let client = MyAnimeBuilder::from_config(config).build()?;
    logger.success("initialized");

    let reconciler = RangeReconciler::new(&client, config);
    let reconciled = logger
        .while_loading(
            format!("checking for episodes at: {}", client.base_url().yellow()),
            reconciler.reconcile(),
        )
        .await?;

    if reconciled.exhausted {
        logger.warn(format!(
            "listing ended before episode {}; grabbing what was found",
            config.range.first().yellow()
        ));
    }

    match (reconciled.urls.first(), reconciled.urls.last()) {
        (Some(newest), Some(oldest)) => logger.success(format!(
            "{} to grab: {} down to {}",
            plural(reconciled.len(), "episode"),
            episode_label(newest).yellow(),
            episode_label(oldest).yellow()
        )),
        _ => logger.warn(format!(
            "no episodes in range {} were found",
            config.range.yellow()
        )),
    }

    for url in &reconciled.urls {
        logger.debug("episode", url);
    }

    Ok((client, reconciled))
}

pub fn episode_label(url: &str) -> String {
    episode_number(url)
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "?".to_string())
}
