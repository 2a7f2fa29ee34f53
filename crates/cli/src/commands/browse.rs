//! Interactive debounced search.
//!
//! Each stdin line is treated as the full contents of the search box. Lines
//! arriving within the debounce window of each other collapse into one
//! filter pass, which prints the visible list.

use std::path::Path;

use pricelist_storefront::catalog::CatalogView;
use pricelist_storefront::error::Result;
use pricelist_storefront::search::SearchInput;
use pricelist_storefront::state::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{fetch_catalog, print_product};

/// Extra wait after end of input so the last pending term is emitted.
const FLUSH_MARGIN: std::time::Duration = std::time::Duration::from_millis(50);

pub async fn run(state: &AppState, catalog: Option<&Path>) -> Result<()> {
    let products = fetch_catalog(state, catalog).await?;
    let window = state.config().search_debounce;

    let view = CatalogView::attach(products, state.search());
    let search = state.search().clone();
    let _printer = view.subscribe(move |visible| {
        println!("-- \"{}\": {} product(s)", search.current_term(), visible.len());
        for product in visible {
            print_product(product);
        }
    });

    let input = SearchInput::spawn(state.search(), window);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        input.on_input(line);
    }

    tokio::time::sleep(window + FLUSH_MARGIN).await;
    tracing::debug!(term = %view.term(), visible = view.visible().len(), "Browse finished");
    Ok(())
}
