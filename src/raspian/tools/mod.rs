// SPDX-License-Identifier: MIT

pub mod blogpost;
pub mod generator;
pub mod scraper;

use crate::adk::model::openai::OpenAIModel;
use crate::adk::tool::Tool;
use crate::raspian::config::Config;
use blogpost::BlogpostTool;
use generator::BlogPostGenerator;
use reqwest::Client;
use scraper::SearchScraper;
use std::sync::Arc;

/// Build every tool served by this process.
///
/// All tools share the one `client`; it is cheap to clone and pools connections.
pub fn create_tools(config: &Config, client: Client) -> Vec<Arc<dyn Tool>> {
    let model = OpenAIModel::new(
        client.clone(),
        config.openai.api_key.clone(),
        config.openai.model.clone(),
    )
    .with_base_url(config.openai.base_url.clone())
    .with_timeout(config.openai.timeout);

    let fetcher = Arc::new(SearchScraper::new(client, &config.search));
    let generator = Arc::new(BlogPostGenerator::new(Arc::new(model)));

    vec![Arc::new(BlogpostTool::new(fetcher, generator))]
}
