use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::{client::ApiClient, views};

/// One refresh of the inventory panel. Fetch errors render in place of the table.
pub async fn inventory_frame(client: &ApiClient) -> String {
    match client.get_inventory_status().await {
        Ok(entries) => views::render_inventory(&entries),
        Err(e) => {
            warn!("Inventory refresh failed: {}", e);
            views::render_error(&e)
        }
    }
}

/// Poll inventory status on a fixed interval until Ctrl-C.
pub async fn watch_inventory(client: &ApiClient, every: Duration) {
    let mut ticker = time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Watching inventory at {} every {:?}", client.base_url(), every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                println!("{}", inventory_frame(client).await);
            }
            _ = &mut shutdown => {
                info!("Stopped watching inventory");
                return;
            }
        }
    }
}
