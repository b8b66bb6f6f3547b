//! Drive a full connect → push → project cycle over the memory
//! transport — no backend or socket required.
//!
//! ```sh
//! cargo run --example board_session
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;

use comanda_client::channel::{ChannelManager, MemoryConnector};
use comanda_client::kanban::KanbanBoard;
use comanda_client::store::OrderStore;
use shared::message::{ChannelMessage, OrderEventPayload};
use shared::models::{ConsumptionType, Order, OrderPatch, OrderStatus};

fn order(id: &str, customer: &str, created_at: &str) -> Order {
    Order {
        id: id.to_string(),
        business: "demo-bistro".to_string(),
        status: OrderStatus::Pending,
        consumption_type: ConsumptionType::DineIn,
        customer_name: customer.to_string(),
        is_paid: false,
        created_at: created_at.to_string(),
        total_amount: 0.0,
        item_groups: vec![],
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // In-memory "push service"
    let (server_tx, _server_rx) = broadcast::channel(64);
    let (client_tx, mut client_rx) = broadcast::channel(64);

    let store = OrderStore::for_business("demo-bistro").into_shared();
    let manager = ChannelManager::new(
        store.clone(),
        "demo-bistro",
        Arc::new(MemoryConnector::new(&server_tx, &client_tx)),
    );

    manager.set_credential(Some("demo-token".to_string())).await;
    let handshake = client_rx.recv().await?;
    println!("client sent: {}", handshake.event_type);

    // The push side announces a morning's worth of orders
    for (id, customer, at) in [
        ("order-1", "Ada", "2026-03-01T09:02:00Z"),
        ("order-2", "Grace", "2026-03-01T09:10:00Z"),
        ("order-3", "Edsger", "2026-03-01T09:15:00Z"),
    ] {
        server_tx.send(ChannelMessage::order_event(
            &OrderEventPayload::OrderCreated {
                order: order(id, customer, at),
            },
        ))?;
    }
    server_tx.send(ChannelMessage::order_event(
        &OrderEventPayload::OrderUpdated {
            order_id: "order-1".to_string(),
            patch: OrderPatch::status(OrderStatus::InPreparation),
        },
    ))?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let board = KanbanBoard::project(&*store.read().await);
    for lane in &board.lanes {
        println!("{:?} ({})", lane.status, lane.order_count());
        for order in &lane.orders {
            println!("  - {} · {}", order.id, order.customer_name);
        }
    }

    manager.close().await;
    Ok(())
}
