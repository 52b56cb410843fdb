//! # Selectors
//!
//! Pure projections over [`StoreState`]. Nothing here mutates or fetches; call them inside
//! [`Store::read`](crate::app::store::Store::read) or against a snapshot.

use crate::app::kinds::{Farms, Indexes, Pools, Vaults};
use crate::app::state::{Entity, FarmUser, IndexUser, PoolUser, StoreState, VaultUser};
use crate::core::Amount;
use crate::utils::math::percentages;
use shared::QuoteToken;

pub fn farms(state: &StoreState) -> &[Entity<Farms>] {
    &state.farms
}

pub fn farm_by_pid(state: &StoreState, pid: u32) -> Option<&Entity<Farms>> {
    state.farms.iter().find(|f| f.descriptor.pid == pid)
}

pub fn farm_by_symbol<'a>(state: &'a StoreState, lp_symbol: &str) -> Option<&'a Entity<Farms>> {
    state.farms.iter().find(|f| f.descriptor.lp_symbol == lp_symbol)
}

/// User data of a farm, zeroed before the first fetch for the current account.
pub fn farm_user(state: &StoreState, pid: u32) -> FarmUser {
    farm_by_pid(state, pid)
        .and_then(|f| f.user.clone())
        .unwrap_or_default()
}

pub fn pools(state: &StoreState) -> &[Entity<Pools>] {
    &state.pools
}

pub fn pool_by_sous_id(state: &StoreState, sous_id: u32) -> Option<&Entity<Pools>> {
    state.pools.iter().find(|p| p.descriptor.sous_id == sous_id)
}

pub fn pool_user(state: &StoreState, sous_id: u32) -> PoolUser {
    pool_by_sous_id(state, sous_id)
        .and_then(|p| p.user.clone())
        .unwrap_or_default()
}

pub fn index_by_id(state: &StoreState, id: u32) -> Option<&Entity<Indexes>> {
    state.indexes.iter().find(|i| i.descriptor.id == id)
}

pub fn index_user(state: &StoreState, id: u32) -> IndexUser {
    index_by_id(state, id)
        .and_then(|i| i.user.clone())
        .unwrap_or_default()
}

/// Component weights of an index in percent, zero while prices are unknown.
pub fn index_weights(state: &StoreState, id: u32) -> Vec<Amount> {
    match index_by_id(state, id) {
        Some(index) => match &index.public {
            Some(public) => percentages(&public.component_prices),
            None => vec![Amount::zero(); index.descriptor.components.len()],
        },
        None => Vec::new(),
    }
}

pub fn vault_by_id(state: &StoreState, id: u32) -> Option<&Entity<Vaults>> {
    state.vaults.iter().find(|v| v.descriptor.id == id)
}

pub fn vault_user(state: &StoreState, id: u32) -> VaultUser {
    vault_by_id(state, id)
        .and_then(|v| v.user.clone())
        .unwrap_or_default()
}

/// BNB price in BUSD, read from the configured BNB-BUSD farm. Zero until it is fetched.
pub fn price_bnb_busd(state: &StoreState) -> Amount {
    farm_by_pid(state, state.pricing.bnb_busd_pid)
        .and_then(|f| f.public.as_ref())
        .map(|p| p.token_price_vs_quote.clone())
        .unwrap_or_default()
}

/// CAKE price in BUSD via the configured CAKE-BNB farm, or the configured fallback while
/// either reference farm is still unknown.
pub fn price_cake_busd(state: &StoreState) -> Amount {
    let cake_bnb = farm_by_pid(state, state.pricing.cake_bnb_pid)
        .and_then(|f| f.public.as_ref())
        .map(|p| p.token_price_vs_quote.clone())
        .unwrap_or_default();
    let price = &cake_bnb * &price_bnb_busd(state);
    if price.is_zero() {
        state.pricing.cake_fallback_price.clone()
    } else {
        price
    }
}

/// USD multiplier for figures denominated in `quote`.
pub fn quote_price(state: &StoreState, quote: QuoteToken) -> Amount {
    match quote {
        QuoteToken::Bnb => price_bnb_busd(state),
        QuoteToken::Cake => price_cake_busd(state),
        QuoteToken::Busd => Amount::one(),
    }
}

/// USD value locked in one farm, `None` before its public data arrived.
pub fn farm_value_locked(state: &StoreState, farm: &Entity<Farms>) -> Option<Amount> {
    let public = farm.public.as_ref()?;
    Some(&public.lp_total_in_quote_token * &quote_price(state, farm.descriptor.quote_token))
}

/// Sum of every farm's locked quote quantity valued in USD, skipping farms not fetched yet.
pub fn total_value_locked(state: &StoreState) -> Amount {
    state
        .farms
        .iter()
        .filter_map(|farm| farm_value_locked(state, farm))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{FarmPublic, IndexPublic, Pricing};
    use crate::app::store::Store;
    use crate::app::testing::{amt, farm, index};

    fn priced(price_vs_quote: &str, lp_total: &str) -> FarmPublic {
        FarmPublic {
            token_price_vs_quote: amt(price_vs_quote),
            lp_total_in_quote_token: amt(lp_total),
            ..FarmPublic::default()
        }
    }

    fn store() -> Store {
        let store = Store::new(Pricing::default());
        let mut bnb_farm = farm(4);
        bnb_farm.quote_token = QuoteToken::Busd;
        let mut cake_farm = farm(1);
        cake_farm.quote_token = QuoteToken::Bnb;
        let mut cake_quoted = farm(7);
        cake_quoted.quote_token = QuoteToken::Cake;
        store.seed::<Farms>(vec![bnb_farm, cake_farm, cake_quoted, farm(8)]);
        store
    }

    #[test]
    fn test_prices_before_fetch() {
        let store = store();
        store.read(|s| {
            assert_eq!(price_bnb_busd(s), Amount::zero());
            assert_eq!(price_cake_busd(s), amt("0.0285"));
        });
    }

    #[test]
    fn test_prices_and_tvl() {
        let store = store();
        let mut bnb_farm = farm(4);
        bnb_farm.quote_token = QuoteToken::Busd;
        let mut cake_farm = farm(1);
        cake_farm.quote_token = QuoteToken::Bnb;
        let mut cake_quoted = farm(7);
        cake_quoted.quote_token = QuoteToken::Cake;
        store.merge_public_data::<Farms>(vec![
            (bnb_farm, priced("300", "1000")),
            (cake_farm, priced("0.05", "10")),
            (cake_quoted, priced("2", "100")),
        ]);

        store.read(|s| {
            assert_eq!(price_bnb_busd(s), amt("300"));
            assert_eq!(price_cake_busd(s), amt("15"));
            // 1000 BUSD + 10 BNB × 300 + 100 CAKE × 15; farm 8 has no public data yet.
            assert_eq!(total_value_locked(s), amt("5500"));
        });
    }

    #[test]
    fn test_user_selectors_default_to_zero() {
        let store = store();
        store.read(|s| {
            assert_eq!(farm_user(s, 4), FarmUser::default());
            assert_eq!(farm_user(s, 99), FarmUser::default());
            assert!(farm_by_symbol(s, "LP-4").is_some());
        });
    }

    #[test]
    fn test_index_weights() {
        let store = Store::new(Pricing::default());
        store.seed::<Indexes>(vec![index(1, 2)]);
        assert_eq!(store.read(|s| index_weights(s, 1)), vec![Amount::zero(), Amount::zero()]);

        store.merge_public_data::<Indexes>(vec![(
            index(1, 2),
            IndexPublic {
                component_prices: vec![amt("1"), amt("3")],
                total_component_price: amt("4"),
                ..IndexPublic::default()
            },
        )]);
        assert_eq!(store.read(|s| index_weights(s, 1)), vec![amt("25"), amt("75")]);
    }
}
