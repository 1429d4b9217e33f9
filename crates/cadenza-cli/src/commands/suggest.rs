use anyhow::{Context, Result};
use tokio::sync::watch;

use cadenza_core::SuggestionOption;
use cadenza_remote::{CatalogClient, Config, Explorer, SpotifyTrackOrder};

/// Print autocomplete suggestions for a partial query.
///
/// With `rotate`, follows the displayed suggestion through that many
/// rotations before exiting.
pub async fn run_suggest(config: &Config, partial: &str, rotate: Option<usize>) -> Result<()> {
    let catalog = CatalogClient::from_config(config).context("Failed to create catalog client")?;
    let mut explorer = Explorer::new(catalog, None::<SpotifyTrackOrder>);

    let corpus = explorer.preload().await;
    if corpus.is_empty() {
        println!("Autocomplete corpus unavailable; no suggestions.");
        return Ok(());
    }

    explorer.set_query(partial);
    if explorer.suggestions().is_empty() {
        println!("No suggestions for \"{partial}\"");
        return Ok(());
    }

    for option in explorer.suggestions() {
        println!("  {option}");
    }

    let Some(rotations) = rotate else {
        return Ok(());
    };

    let displayed = explorer.subscribe_suggestion();
    let shown = follow_rotation(displayed, explorer.suggestions().len(), rotations).await;
    if let Some((first, rest)) = shown.split_first() {
        println!("\n→ {first}");
        for current in rest {
            println!("→ {current}");
        }
    }

    Ok(())
}

/// Collect the displayed suggestion and the next `rotations` it rotates to.
///
/// Fewer than two options never rotate, so only the current one is returned.
async fn follow_rotation(
    mut displayed: watch::Receiver<Option<SuggestionOption>>,
    options: usize,
    rotations: usize,
) -> Vec<SuggestionOption> {
    let mut shown: Vec<SuggestionOption> =
        displayed.borrow_and_update().clone().into_iter().collect();
    if options < 2 {
        return shown;
    }
    for _ in 0..rotations {
        if displayed.changed().await.is_err() {
            break;
        }
        let Some(current) = displayed.borrow_and_update().clone() else {
            break;
        };
        shown.push(current);
    }
    shown
}
