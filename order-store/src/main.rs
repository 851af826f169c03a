use anyhow::Context;
use order_store::{MainQueue, OrdersWorker, StoreState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志) 并加载配置
    let config = setup_environment();

    tracing::info!("CleanStore order store starting...");

    // 2. 打开存储 (必要时写入演示订单)
    let state = StoreState::initialize(&config)
        .await
        .context("failed to open order store")?;

    // 3. 通过 worker 列出订单，结果在主队列上回调
    let (dispatcher, mut main_queue) = MainQueue::channel();
    let worker = OrdersWorker::new(state.store(), dispatcher);
    worker.fetch_orders(|orders| {
        tracing::info!(count = orders.len(), "Listing orders");
        for order in &orders {
            tracing::info!(
                order_id = %order.id_or_placeholder(),
                customer = %format!("{} {}", order.first_name, order.last_name),
                total = ?order.total,
                shipment = %order.shipment_method,
                "Order"
            );
        }
    });
    drop(worker);
    main_queue.run_next().await;

    // 4. 关闭存储；flush 失败视为致命错误
    state
        .shutdown()
        .await
        .context("order store shutdown failed, pending writes may be lost")?;

    tracing::info!("CleanStore order store stopped");
    Ok(())
}
