// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Benchmarks for book ingestion and match discovery.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use dlob::{
    accounts::{MarketAccount, StateAccount},
    enums::{Direction, MarketStatus, MarketType, OrderStatus, OrderTriggerCondition, OrderType},
    identifiers::UserAccountId,
    orders::Order,
    types::{Price, Quantity},
    Dlob,
};

fn make_order(order_id: u32, direction: Direction, price_raw: i64, slot: u64) -> Order {
    Order {
        order_id,
        market_type: MarketType::Perp,
        market_index: 0,
        direction,
        order_type: OrderType::Limit,
        status: OrderStatus::Open,
        base_asset_amount: Quantity::from_raw(1_000_000_000),
        base_asset_amount_filled: Quantity::zero(),
        price: Price::from_raw(price_raw),
        oracle_price_offset: 0,
        auction_start_price: Price::zero(),
        auction_end_price: Price::zero(),
        auction_duration: 0,
        slot,
        max_ts: 0,
        trigger_price: Price::zero(),
        trigger_condition: OrderTriggerCondition::Above,
        post_only: false,
        reduce_only: false,
        immediate_or_cancel: false,
    }
}

fn user(seed: u8) -> UserAccountId {
    UserAccountId::new([seed; 32])
}

/// A deep two-sided book with a tight spread and no crossing levels.
fn populated_dlob(levels: u32) -> Dlob {
    let mut dlob = Dlob::new();
    for i in 0..levels {
        let bid = make_order(
            i * 2 + 1,
            Direction::Long,
            99_000_000 - i64::from(i) * 1_000,
            1,
        );
        let ask = make_order(
            i * 2 + 2,
            Direction::Short,
            101_000_000 + i64::from(i) * 1_000,
            1,
        );
        dlob.insert_order(&bid, user((i % 32) as u8), 1);
        dlob.insert_order(&ask, user((i % 32) as u8), 1);
    }
    dlob
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("insert_1000_orders", |b| {
        b.iter_batched(
            Dlob::new,
            |mut dlob| {
                for i in 0..1_000u32 {
                    let order = make_order(i + 1, Direction::Long, 99_000_000 - i64::from(i), 1);
                    dlob.insert_order(&order, user((i % 32) as u8), 1);
                }
                dlob
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_find_nodes_to_fill(c: &mut Criterion) {
    let state = StateAccount::default();
    let market = MarketAccount::new(0, MarketType::Perp, MarketStatus::Active);

    c.bench_function("find_nodes_to_fill_1000_levels", |b| {
        b.iter_batched(
            || populated_dlob(1_000),
            |mut dlob| {
                let fills = dlob
                    .find_nodes_to_fill(
                        0,
                        Some(Price::from_raw(99_500_000)),
                        Some(Price::from_raw(100_500_000)),
                        2,
                        0,
                        MarketType::Perp,
                        None,
                        &state,
                        &market,
                    )
                    .unwrap();
                black_box(fills)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_best_bid(c: &mut Criterion) {
    let mut dlob = populated_dlob(1_000);
    c.bench_function("best_bid_1000_levels", |b| {
        b.iter(|| {
            let best = dlob.best_bid(0, None, 2, MarketType::Perp, None).unwrap();
            black_box(best)
        });
    });
}

criterion_group!(benches, bench_insert, bench_find_nodes_to_fill, bench_best_bid);
criterion_main!(benches);
