//! Cart and wishlist state with versioned persistence
//!
//! State lives in memory and is written through to a [`KeyValueStore`] on
//! every mutation. Two keys are used:
//!
//! - `cart`: `{"version": 1, "items": [CartItem, ...]}`
//! - `wishlist`: `{"version": 1, "product_ids": ["1", "3", ...]}`
//!
//! Older data stored as a bare JSON array is read as version 0 and upgraded
//! on the next save.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::core::errors::{StoreError, StoreResult};
use crate::core::kv_store::KeyValueStore;
use crate::models::CartItem;

/// Key holding the cart document
pub const CART_KEY: &str = "cart";

/// Key holding the wishlist document
pub const WISHLIST_KEY: &str = "wishlist";

/// Schema version written by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Orders above this subtotal ship free
pub const FREE_SHIPPING_THRESHOLD: f64 = 50.0;

/// Shipping charged at or below the threshold
pub const FLAT_SHIPPING: f64 = 9.99;

/// Sales tax applied to the subtotal
pub const TAX_RATE: f64 = 0.08;

#[derive(Debug, Serialize, Deserialize)]
struct CartDocument {
    version: u32,
    items: Vec<CartItem>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WishlistDocument {
    version: u32,
    product_ids: Vec<String>,
}

/// Totals shown at checkout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartSummary {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

/// Cart lines plus the set of wishlisted product ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub wishlist: BTreeSet<String>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, merging into an identical line if one exists
    ///
    /// A quantity of 0 is treated as 1.
    pub fn add_item(&mut self, mut item: CartItem) {
        let quantity = item.quantity.max(1);
        let existing = self.items.iter_mut().find(|line| {
            line.same_line(
                &item.product_id,
                item.selected_size.as_deref(),
                item.selected_color.as_deref(),
            )
        });

        match existing {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => {
                item.quantity = quantity;
                self.items.push(item);
            }
        }
    }

    /// Set the quantity of a line; 0 removes it
    ///
    /// Returns false when no such line exists.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
    ) -> bool {
        if quantity == 0 {
            return self.remove_item(product_id, size, color);
        }

        match self
            .items
            .iter_mut()
            .find(|line| line.same_line(product_id, size, color))
        {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove_item(
        &mut self,
        product_id: &str,
        size: Option<&str>,
        color: Option<&str>,
    ) -> bool {
        let before = self.items.len();
        self.items.retain(|line| !line.same_line(product_id, size, color));
        self.items.len() != before
    }

    /// Empty the cart; the wishlist is kept
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Flip wishlist membership and return the new membership
    pub fn toggle_wishlist(&mut self, product_id: &str) -> bool {
        if self.wishlist.remove(product_id) {
            false
        } else {
            self.wishlist.insert(product_id.to_string());
            true
        }
    }

    pub fn is_wishlisted(&self, product_id: &str) -> bool {
        self.wishlist.contains(product_id)
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    pub fn summary(&self) -> CartSummary {
        let subtotal = self.subtotal();
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            0.0
        } else {
            FLAT_SHIPPING
        };
        let tax = subtotal * TAX_RATE;

        CartSummary {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Cart state bound to the store it persists to
#[derive(Debug)]
pub struct CartStore<S: KeyValueStore> {
    store: S,
    state: CartState,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store with empty state, without reading anything
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: CartState::new(),
        }
    }

    /// Create a store and load any persisted state
    pub fn open(store: S) -> StoreResult<Self> {
        let mut cart = Self::new(store);
        cart.load()?;
        Ok(cart)
    }

    /// Replace in-memory state with what is persisted
    ///
    /// Missing keys load as empty.
    pub fn load(&mut self) -> StoreResult<&CartState> {
        let items = match self.store.get(CART_KEY)? {
            Some(raw) => decode_cart(&raw)?,
            None => Vec::new(),
        };
        let wishlist = match self.store.get(WISHLIST_KEY)? {
            Some(raw) => decode_wishlist(&raw)?,
            None => BTreeSet::new(),
        };

        info!(
            "Loaded cart with {} line(s) and {} wishlisted product(s)",
            items.len(),
            wishlist.len()
        );
        self.state = CartState { items, wishlist };
        Ok(&self.state)
    }

    /// Apply `change` and persist the result
    ///
    /// The in-memory state only changes if the save succeeds.
    pub fn mutate<F, R>(&mut self, change: F) -> StoreResult<R>
    where
        F: FnOnce(&mut CartState) -> R,
    {
        let mut next = self.state.clone();
        let result = change(&mut next);
        write_state(&self.store, &next)?;
        self.state = next;
        Ok(result)
    }

    /// Write the current state under both keys
    pub fn save(&self) -> StoreResult<()> {
        write_state(&self.store, &self.state)
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn write_state<S: KeyValueStore>(store: &S, state: &CartState) -> StoreResult<()> {
    let cart = CartDocument {
        version: SCHEMA_VERSION,
        items: state.items.clone(),
    };
    let wishlist = WishlistDocument {
        version: SCHEMA_VERSION,
        product_ids: state.wishlist.iter().cloned().collect(),
    };

    let cart_json = encode(CART_KEY, &cart)?;
    let wishlist_json = encode(WISHLIST_KEY, &wishlist)?;

    // A failed wishlist write puts the previous cart document back
    let previous_cart = store.get(CART_KEY)?;
    store.set(CART_KEY, &cart_json)?;
    if let Err(err) = store.set(WISHLIST_KEY, &wishlist_json) {
        let restored = match &previous_cart {
            Some(raw) => store.set(CART_KEY, raw),
            None => store.remove(CART_KEY),
        };
        if let Err(restore_err) = restored {
            warn!("Could not restore cart after failed save: {}", restore_err);
        }
        return Err(err);
    }
    debug!(
        "Saved cart ({} lines) and wishlist ({} ids)",
        cart.items.len(),
        wishlist.product_ids.len()
    );
    Ok(())
}

fn encode<T: Serialize>(key: &str, document: &T) -> StoreResult<String> {
    serde_json::to_string(document).map_err(|e| serialization_error(key, e))
}

fn serialization_error(key: &str, err: serde_json::Error) -> StoreError {
    StoreError::Serialization {
        key: key.to_string(),
        message: err.to_string(),
    }
}

/// Parse a stored document, reporting its schema version
///
/// A bare array is the unversioned layout and reports version 0.
fn parse_versioned(key: &str, raw: &str) -> StoreResult<(u32, Value)> {
    let value: Value = serde_json::from_str(raw).map_err(|e| serialization_error(key, e))?;

    let version = match &value {
        Value::Array(_) => 0,
        Value::Object(map) => map
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| StoreError::Serialization {
                key: key.to_string(),
                message: "missing or invalid version".to_string(),
            })?,
        _ => {
            return Err(StoreError::Serialization {
                key: key.to_string(),
                message: "expected an object or array".to_string(),
            })
        }
    };

    if version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            key: key.to_string(),
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    if version < SCHEMA_VERSION {
        warn!("Migrating '{}' from schema version {}", key, version);
    }

    Ok((version, value))
}

fn decode_cart(raw: &str) -> StoreResult<Vec<CartItem>> {
    let (version, value) = parse_versioned(CART_KEY, raw)?;
    let result = if version == 0 {
        let Value::Array(entries) = value else {
            return Ok(Vec::new());
        };
        entries
            .into_iter()
            .map(|mut entry| {
                // Legacy ids were sometimes numeric
                for field in ["id", "productId"] {
                    if let Some(id) = entry.get_mut(field) {
                        if id.is_number() {
                            *id = Value::String(id.to_string());
                        }
                    }
                }
                serde_json::from_value::<CartItem>(entry)
            })
            .collect::<Result<Vec<_>, _>>()
    } else {
        serde_json::from_value::<CartDocument>(value).map(|doc| doc.items)
    };

    result.map_err(|e| serialization_error(CART_KEY, e))
}

fn decode_wishlist(raw: &str) -> StoreResult<BTreeSet<String>> {
    let (version, value) = parse_versioned(WISHLIST_KEY, raw)?;
    if version == 0 {
        let Value::Array(entries) = value else {
            return Ok(BTreeSet::new());
        };
        return entries
            .into_iter()
            .map(|entry| match entry {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(StoreError::Serialization {
                    key: WISHLIST_KEY.to_string(),
                    message: format!("unexpected wishlist entry: {other}"),
                }),
            })
            .collect();
    }

    serde_json::from_value::<WishlistDocument>(value)
        .map(|doc| doc.product_ids.into_iter().collect())
        .map_err(|e| serialization_error(WISHLIST_KEY, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kv_store::MemoryKeyValueStore;
    use assert_matches::assert_matches;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn headphones() -> CartItem {
        CartItem::new("1", "Premium Wireless Headphones", 299.99, 1)
    }

    #[test]
    fn test_add_item_merges_identical_lines() {
        let mut state = CartState::new();
        state.add_item(headphones());
        state.add_item(CartItem::new("1", "Premium Wireless Headphones", 299.99, 2));
        state.add_item(headphones().with_color("White"));

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(state.item_count(), 4);
    }

    #[test]
    fn test_zero_quantity_add_counts_as_one() {
        let mut state = CartState::new();
        state.add_item(CartItem::new("5", "Sunglasses", 10.0, 0));
        assert_eq!(state.items[0].quantity, 1);
    }

    #[test]
    fn test_update_and_remove() {
        let mut state = CartState::new();
        state.add_item(headphones().with_size("M"));

        assert!(state.update_quantity("1", Some("M"), None, 5));
        assert_eq!(state.item_count(), 5);
        assert!(!state.update_quantity("1", Some("L"), None, 2));

        assert!(state.update_quantity("1", Some("M"), None, 0));
        assert!(state.items.is_empty());
        assert!(!state.remove_item("1", Some("M"), None));
    }

    #[test]
    fn test_clear_keeps_wishlist() {
        let mut state = CartState::new();
        state.add_item(headphones());
        state.toggle_wishlist("3");
        state.clear();
        assert!(state.items.is_empty());
        assert!(state.is_wishlisted("3"));
    }

    #[test]
    fn test_toggle_wishlist() {
        let mut state = CartState::new();
        assert!(state.toggle_wishlist("2"));
        assert!(state.is_wishlisted("2"));
        assert!(!state.toggle_wishlist("2"));
        assert!(!state.is_wishlisted("2"));
    }

    #[test]
    fn test_summary_with_free_shipping() {
        let mut state = CartState::new();
        state.add_item(CartItem::new("1", "Jacket", 100.0, 1));
        let summary = state.summary();
        assert!(approx(summary.shipping, 0.0));
        assert!(approx(summary.tax, 8.0));
        assert!(approx(summary.total, 108.0));
    }

    #[test]
    fn test_summary_with_flat_shipping() {
        let mut state = CartState::new();
        state.add_item(CartItem::new("5", "Socks", 25.0, 2));
        // Exactly 50 does not qualify
        let summary = state.summary();
        assert!(approx(summary.subtotal, 50.0));
        assert!(approx(summary.shipping, 9.99));
        assert!(approx(summary.total, 50.0 + 9.99 + 4.0));
    }

    #[test]
    fn test_open_empty_store() {
        let cart = CartStore::open(MemoryKeyValueStore::new()).unwrap();
        assert_eq!(cart.state(), &CartState::default());
    }

    #[test]
    fn test_mutate_writes_versioned_documents() {
        let mut cart = CartStore::new(MemoryKeyValueStore::new());
        let added = cart
            .mutate(|state| {
                state.add_item(headphones());
                state.toggle_wishlist("4")
            })
            .unwrap();
        assert!(added);

        let raw_cart = cart.store().get(CART_KEY).unwrap().unwrap();
        let doc: Value = serde_json::from_str(&raw_cart).unwrap();
        assert_eq!(doc["version"], 1);
        assert_eq!(doc["items"][0]["productId"], "1");

        let raw_wishlist = cart.store().get(WISHLIST_KEY).unwrap().unwrap();
        assert_eq!(raw_wishlist, r#"{"version":1,"product_ids":["4"]}"#);
    }

    #[test]
    fn test_state_survives_reopen() {
        let store = MemoryKeyValueStore::new();
        let mut cart = CartStore::new(store);
        cart.mutate(|state| state.add_item(headphones().with_size("L")))
            .unwrap();

        let CartStore { store, .. } = cart;
        let reopened = CartStore::open(store).unwrap();
        assert_eq!(reopened.state().items.len(), 1);
        assert_eq!(
            reopened.state().items[0].selected_size.as_deref(),
            Some("L")
        );
    }

    #[test]
    fn test_failed_save_leaves_state_untouched() {
        let mut cart = CartStore::new(MemoryKeyValueStore::with_failure());
        let result = cart.mutate(|state| state.add_item(headphones()));
        assert_matches!(result, Err(StoreError::Io { .. }));
        assert!(cart.state().items.is_empty());
    }

    #[test]
    fn test_failed_wishlist_write_restores_cart_document() {
        let mut cart = CartStore::new(MemoryKeyValueStore::failing_writes_to(WISHLIST_KEY));
        let result = cart.mutate(|state| state.add_item(headphones()));
        assert_matches!(result, Err(StoreError::Io { .. }));
        assert!(cart.state().items.is_empty());
        assert_eq!(cart.store().get(CART_KEY).unwrap(), None);

        let legacy = r#"[{"id":1,"name":"Headphones","price":299.99,"quantity":2}]"#;
        cart.store().insert_raw(CART_KEY, legacy);
        cart.load().unwrap();
        let result = cart.mutate(|state| state.clear());
        assert_matches!(result, Err(StoreError::Io { .. }));
        assert_eq!(cart.state().item_count(), 2);
        assert_eq!(cart.store().get(CART_KEY).unwrap().as_deref(), Some(legacy));
    }

    #[test]
    fn test_legacy_arrays_are_migrated() {
        let store = MemoryKeyValueStore::new();
        store.insert_raw(
            CART_KEY,
            r#"[{"id":1,"name":"Headphones","price":299.99,"quantity":2,"selectedColor":"Black"}]"#,
        );
        store.insert_raw(WISHLIST_KEY, r#"[3, "7"]"#);

        let mut cart = CartStore::open(store).unwrap();
        assert_eq!(cart.state().items[0].product_id, "1");
        assert_eq!(
            cart.state().items[0].selected_color.as_deref(),
            Some("Black")
        );
        assert!(cart.state().is_wishlisted("3"));
        assert!(cart.state().is_wishlisted("7"));

        cart.save().unwrap();
        let raw = cart.store().get(CART_KEY).unwrap().unwrap();
        assert!(raw.starts_with(r#"{"version":1,"#));
        assert!(cart.load().is_ok());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let store = MemoryKeyValueStore::new();
        store.insert_raw(CART_KEY, r#"{"version":2,"items":[]}"#);

        assert_matches!(
            CartStore::open(store),
            Err(StoreError::UnsupportedVersion { found: 2, supported: 1, .. })
        );
    }

    #[test]
    fn test_corrupt_document_is_a_serialization_error() {
        let store = MemoryKeyValueStore::new();
        store.insert_raw(WISHLIST_KEY, "not json");
        assert_matches!(
            CartStore::open(store),
            Err(StoreError::Serialization { key, .. }) if key == WISHLIST_KEY
        );
    }
}
