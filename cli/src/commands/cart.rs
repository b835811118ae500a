//! Cart and wishlist commands backed by the data directory

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::debug;

use cyberforge_shared::utils::string_utils::sanitize_string;
use cyberforge_shared::{
    format_currency, AppConfig, CartItem, CartState, CartStore, FileKeyValueStore,
};

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show cart lines, totals and the wishlist
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a product; matching lines are merged
    Add {
        product_id: String,
        name: String,
        price: f64,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Set the quantity of a line; 0 removes it
    Update {
        product_id: String,
        quantity: u32,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a line
    Remove {
        product_id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Empty the cart, keeping the wishlist
    Clear,

    /// Add or remove a product from the wishlist
    Wishlist { product_id: String },
}

pub fn run(config: &AppConfig, command: CartCommand) -> Result<bool> {
    let data_dir = config.storage.resolve_data_dir()?;
    debug!("Opening cart store in {:?}", data_dir);
    let mut store = CartStore::open(FileKeyValueStore::new(data_dir))
        .context("Failed to open the cart store")?;

    match command {
        CartCommand::List { json } => {
            if json {
                let state = store.state();
                let document = serde_json::json!({
                    "items": state.items,
                    "wishlist": state.wishlist,
                    "summary": state.summary(),
                });
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                print_state(store.state());
            }
            Ok(true)
        }
        CartCommand::Add {
            product_id,
            name,
            price,
            quantity,
            size,
            color,
        } => {
            if !price.is_finite() || price < 0.0 {
                eprintln!("Price must be a non-negative amount");
                return Ok(false);
            }

            let mut item = CartItem::new(product_id, sanitize_string(&name), price, quantity);
            item.selected_size = size;
            item.selected_color = color;
            store.mutate(|state| state.add_item(item))?;
            print_state(store.state());
            Ok(true)
        }
        CartCommand::Update {
            product_id,
            quantity,
            size,
            color,
        } => {
            let found = store.mutate(|state| {
                state.update_quantity(&product_id, size.as_deref(), color.as_deref(), quantity)
            })?;
            if !found {
                eprintln!("No cart line for product '{product_id}'");
            }
            Ok(found)
        }
        CartCommand::Remove {
            product_id,
            size,
            color,
        } => {
            let removed = store.mutate(|state| {
                state.remove_item(&product_id, size.as_deref(), color.as_deref())
            })?;
            if !removed {
                eprintln!("No cart line for product '{product_id}'");
            }
            Ok(removed)
        }
        CartCommand::Clear => {
            store.mutate(CartState::clear)?;
            println!("Cart cleared");
            Ok(true)
        }
        CartCommand::Wishlist { product_id } => {
            let added = store.mutate(|state| state.toggle_wishlist(&product_id))?;
            if added {
                println!("Added '{product_id}' to the wishlist");
            } else {
                println!("Removed '{product_id}' from the wishlist");
            }
            Ok(true)
        }
    }
}

fn print_state(state: &CartState) {
    if state.items.is_empty() {
        println!("Cart is empty");
    }

    for item in &state.items {
        let variant: Vec<&str> = [item.selected_size.as_deref(), item.selected_color.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        let variant = if variant.is_empty() {
            String::new()
        } else {
            format!(" ({})", variant.join(", "))
        };
        println!(
            "{:>3} x {}{} [{}]  {}",
            item.quantity,
            item.name,
            variant,
            item.product_id,
            format_currency(item.line_total(), "USD")
        );
    }

    if !state.items.is_empty() {
        let summary = state.summary();
        println!("Subtotal: {}", format_currency(summary.subtotal, "USD"));
        println!("Shipping: {}", format_currency(summary.shipping, "USD"));
        println!("Tax:      {}", format_currency(summary.tax, "USD"));
        println!("Total:    {}", format_currency(summary.total, "USD"));
    }

    if !state.wishlist.is_empty() {
        let ids: Vec<&str> = state.wishlist.iter().map(String::as_str).collect();
        println!("Wishlist: {}", ids.join(", "));
    }
}
