use snackshop_api::{
    config::AppConfig,
    db::create_pool,
    dto::orders::{OrderLineRequest, PlaceOrderRequest, UpdateOrderStatusRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::{Order, OrderItem, PaymentMethod},
    services::order_service,
    state::AppState,
};
use uuid::Uuid;

// Integration tests for the placement workflow. They are skipped unless a
// database is configured, mirroring the repository's other flow tests. Tests
// avoid global table state (no truncation) so they can run in parallel.

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        admin_contact: "628000000000".into(),
        shipping_fee: 15_000,
        upload_dir: std::env::temp_dir()
            .join("snackshop-tests")
            .to_string_lossy()
            .into_owned(),
    };

    Ok(Some(AppState { pool, config }))
}

async fn seed_item(state: &AppState, name: &str, price: i64, stock: i32) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO menu_items (id, name, price, stock, is_available) VALUES ($1, $2, $3, $4, TRUE)",
    )
    .bind(id)
    .bind(name)
    .bind(price)
    .bind(stock)
    .execute(&state.pool)
    .await?;
    Ok(id)
}

async fn stock_of(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let (stock,): (i32,) = sqlx::query_as("SELECT stock FROM menu_items WHERE id = $1")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    Ok(stock)
}

fn request_for(items: Vec<OrderLineRequest>, marker: &str) -> PlaceOrderRequest {
    PlaceOrderRequest {
        customer_name: marker.to_string(),
        customer_email: Some("budi@example.com".into()),
        customer_phone: "0812345678".into(),
        customer_address: "Jl. Melati 1".into(),
        payment_method: PaymentMethod::Gopay,
        items,
    }
}

#[tokio::test]
async fn placement_computes_totals_and_snapshots_prices() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4();
    let item_a = seed_item(&state, &format!("Banana Chips {suffix}"), 15_000, 5).await?;
    let item_b = seed_item(&state, &format!("Cassava Crackers {suffix}"), 20_000, 2).await?;

    let resp = order_service::place_order(
        &state,
        request_for(
            vec![
                OrderLineRequest {
                    menu_item_id: item_a,
                    quantity: 2,
                },
                OrderLineRequest {
                    menu_item_id: item_b,
                    quantity: 1,
                },
            ],
            "totals-test",
        ),
    )
    .await?;
    let placed = resp.data.unwrap();

    assert!(placed.order_code.starts_with("ORD-"));
    assert_eq!(placed.order_code.len(), 12);
    assert!(
        placed.order_code[4..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
    assert!(
        placed
            .whatsapp_url
            .starts_with("https://wa.me/628000000000?text=")
    );

    // 2 × 15000 + 1 × 20000 + 15000 shipping = 65000
    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE order_code = $1")
        .bind(&placed.order_code)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(order.total_price, 65_000);
    assert_eq!(order.status, "pending");

    assert_eq!(stock_of(&state, item_a).await?, 3);
    assert_eq!(stock_of(&state, item_b).await?, 1);

    // The snapshot price must survive a later catalog price change.
    sqlx::query("UPDATE menu_items SET price = 99000 WHERE id = $1")
        .bind(item_a)
        .execute(&state.pool)
        .await?;
    let items: Vec<OrderItem> = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
        .bind(order.id)
        .fetch_all(&state.pool)
        .await?;
    assert_eq!(items.len(), 2);
    let line_a = items
        .iter()
        .find(|item| item.menu_item_id == Some(item_a))
        .unwrap();
    assert_eq!(line_a.price, 15_000);
    assert_eq!(line_a.quantity, 2);

    Ok(())
}

#[tokio::test]
async fn insufficient_stock_rolls_back_the_whole_order() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4();
    let plenty_name = format!("Peanut Mix {suffix}");
    let scarce_name = format!("Potato Balls {suffix}");
    let plenty = seed_item(&state, &plenty_name, 10_000, 5).await?;
    let scarce = seed_item(&state, &scarce_name, 12_000, 1).await?;

    let marker = format!("rollback-test-{suffix}");
    let result = order_service::place_order(
        &state,
        request_for(
            vec![
                OrderLineRequest {
                    menu_item_id: plenty,
                    quantity: 2,
                },
                OrderLineRequest {
                    menu_item_id: scarce,
                    quantity: 2,
                },
            ],
            &marker,
        ),
    )
    .await;

    match result {
        Err(AppError::InsufficientStock { item }) => assert_eq!(item, scarce_name),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // The first line's decrement must be rolled back along with the order.
    assert_eq!(stock_of(&state, plenty).await?, 5);
    assert_eq!(stock_of(&state, scarce).await?, 1);

    let (orders,): (i64,) = sqlx::query_as("SELECT count(*) FROM orders WHERE customer_name = $1")
        .bind(&marker)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(orders, 0);

    let (lines,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM order_items WHERE menu_item_id = ANY($1)")
            .bind(vec![plenty, scarce])
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(lines, 0);

    Ok(())
}

#[tokio::test]
async fn concurrent_placements_never_oversell() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4();
    let item = seed_item(&state, &format!("Last One {suffix}"), 30_000, 1).await?;

    let line = |id| {
        vec![OrderLineRequest {
            menu_item_id: id,
            quantity: 1,
        }]
    };

    let state_a = state.clone();
    let state_b = state.clone();
    let first = tokio::spawn(async move {
        order_service::place_order(&state_a, request_for(line(item), "race-a")).await
    });
    let second = tokio::spawn(async move {
        order_service::place_order(&state_b, request_for(line(item), "race-b")).await
    });

    let first = first.await?;
    let second = second.await?;

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one placement should win the stock");

    let loser = if first.is_err() { first } else { second };
    match loser {
        Err(AppError::InsufficientStock { .. }) => {}
        other => panic!("expected InsufficientStock for the loser, got {other:?}"),
    }

    assert_eq!(stock_of(&state, item).await?, 0);

    Ok(())
}

#[tokio::test]
async fn deleted_menu_items_degrade_to_a_placeholder() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4();
    let item = seed_item(&state, &format!("Limited Run {suffix}"), 22_000, 3).await?;

    let resp = order_service::place_order(
        &state,
        request_for(
            vec![OrderLineRequest {
                menu_item_id: item,
                quantity: 1,
            }],
            "dangling-test",
        ),
    )
    .await?;
    let code = resp.data.unwrap().order_code;

    sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(item)
        .execute(&state.pool)
        .await?;

    let detail = order_service::get_order_by_code(&state, &code)
        .await?
        .data
        .unwrap();
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].menu_item_id, None);
    assert_eq!(detail.items[0].menu_name, "(deleted item)");
    assert_eq!(detail.items[0].price, 22_000);
    assert!(detail.whatsapp_url.starts_with("https://wa.me/628000000000?text="));

    Ok(())
}

#[tokio::test]
async fn order_codes_are_unique_across_placements() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4();
    let item = seed_item(&state, &format!("Sampler {suffix}"), 5_000, 50).await?;

    let mut codes = std::collections::HashSet::new();
    for _ in 0..5 {
        let resp = order_service::place_order(
            &state,
            request_for(
                vec![OrderLineRequest {
                    menu_item_id: item,
                    quantity: 1,
                }],
                "codes-test",
            ),
        )
        .await?;
        assert!(codes.insert(resp.data.unwrap().order_code));
    }
    assert_eq!(codes.len(), 5);

    Ok(())
}

#[tokio::test]
async fn aggregate_stats_buckets_sum_to_the_total() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4();
    let item = seed_item(&state, &format!("Stats Snack {suffix}"), 10_000, 20).await?;

    let resp = order_service::place_order(
        &state,
        request_for(
            vec![OrderLineRequest {
                menu_item_id: item,
                quantity: 1,
            }],
            "stats-test",
        ),
    )
    .await?;
    let code = resp.data.unwrap().order_code;
    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE order_code = $1")
        .bind(&code)
        .fetch_one(&state.pool)
        .await?;

    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    };
    order_service::update_order_status(
        &state,
        &admin,
        order.id,
        UpdateOrderStatusRequest {
            status: "completed".into(),
        },
    )
    .await?;

    let stats = order_service::aggregate_stats(&state).await?;
    assert_eq!(
        stats.completed_count + stats.cancelled_count + stats.processing_count,
        stats.total_count
    );
    assert!(stats.completed_count >= 1);
    assert!(stats.total_revenue >= order.total_price);

    Ok(())
}
