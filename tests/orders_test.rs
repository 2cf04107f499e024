// ABOUTME: Database tests for the menu catalogue and order lifecycle
// ABOUTME: Covers menu CRUD, transactional order creation, price snapshots, and status flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use anyhow::Result;
use brasserie_server::database::Database;
use brasserie_server::models::{MenuItem, Order, OrderItem, OrderStatus, Role};
use chrono::Utc;
use uuid::Uuid;

async fn seed_menu_item(database: &Database, name: &str, price_cents: i64) -> Result<MenuItem> {
    let item = MenuItem {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        category: "mains".into(),
        price_cents,
        available: true,
        created_at: Utc::now(),
    };
    database.create_menu_item(&item).await?;
    Ok(item)
}

fn order_for(table: i64, placed_by: Uuid) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::new_v4(),
        table_number: table,
        placed_by,
        status: OrderStatus::Open,
        note: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_menu_crud() -> Result<()> {
    let database = common::create_test_database().await?;
    let mut item = seed_menu_item(&database, "Steak frites", 2400).await?;

    // Hidden from the public listing once unavailable
    item.available = false;
    database.update_menu_item(&item).await?;
    assert!(database.list_menu_items(true).await?.is_empty());
    assert_eq!(database.list_menu_items(false).await?.len(), 1);

    database.delete_menu_item(item.id).await?;
    assert!(database.get_menu_item(item.id).await?.is_none());
    assert!(database.delete_menu_item(item.id).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_order_creation_with_items() -> Result<()> {
    let database = common::create_test_database().await?;
    let employee = common::create_test_user(&database, Role::Employee).await?;
    let steak = seed_menu_item(&database, "Steak frites", 2400).await?;
    let wine = seed_menu_item(&database, "House red", 900).await?;

    let order = order_for(4, employee.id);
    let items = vec![
        OrderItem {
            id: Uuid::new_v4(),
            order_id: order.id,
            menu_item_id: steak.id,
            quantity: 2,
            price_cents: steak.price_cents,
        },
        OrderItem {
            id: Uuid::new_v4(),
            order_id: order.id,
            menu_item_id: wine.id,
            quantity: 1,
            price_cents: wine.price_cents,
        },
    ];

    database.create_order(&order, &items).await?;

    let (fetched, fetched_items) = database.get_order(order.id).await?.unwrap();
    assert_eq!(fetched.table_number, 4);
    assert_eq!(fetched.placed_by, employee.id);
    assert_eq!(fetched_items.len(), 2);

    // Price snapshot survives a later menu edit
    let mut repriced = steak.clone();
    repriced.price_cents = 2900;
    database.update_menu_item(&repriced).await?;
    let (_, items_after) = database.get_order(order.id).await?.unwrap();
    let steak_line = items_after
        .iter()
        .find(|i| i.menu_item_id == steak.id)
        .unwrap();
    assert_eq!(steak_line.price_cents, 2400);
    Ok(())
}

#[tokio::test]
async fn test_order_status_flow_and_filters() -> Result<()> {
    let database = common::create_test_database().await?;
    let employee = common::create_test_user(&database, Role::Employee).await?;
    let item = seed_menu_item(&database, "Soup", 700).await?;

    let order = order_for(2, employee.id);
    let line = OrderItem {
        id: Uuid::new_v4(),
        order_id: order.id,
        menu_item_id: item.id,
        quantity: 1,
        price_cents: item.price_cents,
    };
    database.create_order(&order, &[line]).await?;

    let updated = database
        .update_order_status(order.id, OrderStatus::Ready)
        .await?;
    assert_eq!(updated.status, OrderStatus::Ready);
    assert!(updated.updated_at >= updated.created_at);

    let ready = database.list_orders(Some(OrderStatus::Ready)).await?;
    assert_eq!(ready.len(), 1);
    assert!(database.list_orders(Some(OrderStatus::Paid)).await?.is_empty());

    // Still on the floor until settled
    let open_for_table = database.list_open_orders_for_table(2).await?;
    assert_eq!(open_for_table.len(), 1);

    database.update_order_status(order.id, OrderStatus::Paid).await?;
    assert!(database.list_open_orders_for_table(2).await?.is_empty());
    Ok(())
}
