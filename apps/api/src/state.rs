use std::sync::Arc;

use crate::gateways::chat::ChatClient;
use crate::gateways::image::ImageClient;
use crate::gateways::publish::PublishClient;
use crate::gateways::scrape::ScrapeClient;
use crate::layout::measure::TextMeasurer;
use crate::shortcuts::ShortcutStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatClient,
    pub image: ImageClient,
    pub scraper: ScrapeClient,
    pub publisher: PublishClient,
    /// Pluggable text measurer. Default: CharMetricMeasurer.
    pub measurer: Arc<dyn TextMeasurer>,
    pub shortcuts: Arc<ShortcutStore>,
}
