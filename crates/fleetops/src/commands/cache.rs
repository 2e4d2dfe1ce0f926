use colored::Colorize;
use fleetops_core::InventoryFetcher;

pub async fn handle_clear(fetcher: &InventoryFetcher) -> anyhow::Result<()> {
    fetcher.cache().invalidate_all().await?;
    println!("{}", "✓ Cache cleared".green());
    Ok(())
}
