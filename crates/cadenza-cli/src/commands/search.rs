use anyhow::{Context, Result};
use cadenza_core::Performance;
use cadenza_remote::{CatalogClient, Config, Explorer, SpotifyTrackOrder};

/// Search the catalog and print the ranked results.
pub async fn run_search(config: &Config, query: &str, json: bool) -> Result<()> {
    let catalog = CatalogClient::from_config(config).context("Failed to create catalog client")?;
    let resolver =
        SpotifyTrackOrder::from_config(config).context("Failed to create Spotify client")?;
    let explorer = Explorer::new(catalog, resolver);

    explorer.execute(query).await;
    let state = explorer.state();

    if let Some(error) = &state.error {
        if state.retryable {
            anyhow::bail!("{error} (temporary failure, try again later)");
        }
        anyhow::bail!("{error}");
    }

    if json {
        let out = serde_json::to_string_pretty(&state.results)
            .context("Failed to serialize results")?;
        println!("{out}");
        return Ok(());
    }

    if state.results.is_empty() {
        // The hint needs the corpus; only fetch it when there is nothing to show.
        explorer.preload().await;
        if let Some(hint) = explorer.empty_result_hint() {
            println!("{hint}");
        }
        return Ok(());
    }

    println!(
        "\n🎹 {} result{} for \"{}\"",
        state.total,
        if state.total == 1 { "" } else { "s" },
        query.trim()
    );
    if let Some(strategy) = state.strategy {
        println!("   ordered by {strategy}\n");
    }

    for (i, perf) in state.results.iter().enumerate() {
        println!("{}", format_line(i + 1, perf));
    }

    Ok(())
}

fn format_line(n: usize, perf: &Performance) -> String {
    let mut line = format!("{n:>4}. {}", perf.song_name);
    if !perf.artist_name.is_empty() {
        line.push_str(" - ");
        line.push_str(&perf.artist_name);
    }
    if !perf.album_name.is_empty() {
        line.push_str(" [");
        line.push_str(&perf.album_name);
        line.push(']');
    }
    line.push_str(" #");
    line.push_str(&perf.video_no.to_string());
    if let Some(length) = perf.formatted_length() {
        line.push_str(" (");
        line.push_str(&length);
        line.push(')');
    }
    if perf.approved {
        line.push_str(" ★");
    }
    line
}
