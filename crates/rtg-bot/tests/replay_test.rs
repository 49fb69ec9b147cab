//! Replay integration tests.
//!
//! Drives the full pipeline from JSON-lines text through the feed reader,
//! the application loop and a collecting sink:
//! - Quote placement and repricing
//! - Hedging of fills
//! - Order completion and requoting

use rtg_bot::feed::read_events;
use rtg_bot::{AppConfig, AppResult, Application, CommandSink};
use rtg_core::{ExchangeCommand, OrderId, Price, Side};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Sink that keeps every command for inspection.
#[derive(Clone, Default)]
struct CollectingSink {
    commands: Arc<Mutex<Vec<ExchangeCommand>>>,
}

impl CommandSink for CollectingSink {
    fn send(&mut self, command: &ExchangeCommand) -> AppResult<()> {
        self.commands.lock().unwrap().push(command.clone());
        Ok(())
    }
}

fn book_line(sequence: u64, mid: u32) -> String {
    format!(
        r#"{{"type":"order_book","instrument":0,"sequence":{sequence},"ask_prices":[{},{},0,0,0],"ask_volumes":[10,10,0,0,0],"bid_prices":[{},{},0,0,0],"bid_volumes":[10,10,0,0,0]}}"#,
        mid + 100,
        mid + 200,
        mid - 100,
        mid - 200,
    )
}

async fn replay(lines: &[String]) -> (Vec<ExchangeCommand>, rtg_mm::EngineSnapshot) {
    let mut config = AppConfig::default();
    config.telemetry.dump_metrics_on_exit = false;

    let sink = CollectingSink::default();
    let app = Application::new(&config, Box::new(sink.clone())).unwrap();

    let input = lines.join("\n");
    let (tx, rx) = mpsc::channel(64);
    let feed = tokio::spawn(async move { read_events(input.as_bytes(), tx).await });

    let snapshot = app.run(rx).await.unwrap();
    feed.await.unwrap().unwrap();

    let commands = sink.commands.lock().unwrap().clone();
    (commands, snapshot)
}

#[tokio::test(start_paused = true)]
async fn test_replay_quotes_hedges_and_requotes() {
    let lines = vec![
        book_line(1, 10_000),
        r#"{"type":"trade_ticks","instrument":0,"sequence":1,"ask_prices":[10100,0,0,0,0],"ask_volumes":[3,0,0,0,0],"bid_prices":[0,0,0,0,0],"bid_volumes":[0,0,0,0,0]}"#.to_string(),
        r#"{"type":"order_filled","order_id":1,"price":9900,"volume":45}"#.to_string(),
        r#"{"type":"order_status","order_id":1,"fill_volume":45,"remaining_volume":0,"fees":-4}"#.to_string(),
        r#"{"type":"order_status","order_id":3,"fill_volume":45,"remaining_volume":0,"fees":0}"#.to_string(),
        book_line(2, 10_500),
    ];

    let (commands, snapshot) = replay(&lines).await;

    assert_eq!(
        commands[..3],
        [
            ExchangeCommand::Insert {
                order_id: OrderId::new(1),
                side: Side::Buy,
                price: Price::new(9_900),
                volume: 45,
                lifespan: rtg_core::Lifespan::GoodForDay,
            },
            ExchangeCommand::Insert {
                order_id: OrderId::new(2),
                side: Side::Sell,
                price: Price::new(10_100),
                volume: 45,
                lifespan: rtg_core::Lifespan::GoodForDay,
            },
            ExchangeCommand::Hedge {
                order_id: OrderId::new(3),
                side: Side::Sell,
                price: Price::new(100),
                volume: 45,
            },
        ]
    );

    // Long 45 after the bid fill: the ask is repriced, the bid stays empty.
    assert_eq!(
        commands[3..],
        [
            ExchangeCommand::Cancel {
                order_id: OrderId::new(2)
            },
            ExchangeCommand::Insert {
                order_id: OrderId::new(4),
                side: Side::Sell,
                price: Price::new(10_600),
                volume: 45,
                lifespan: rtg_core::Lifespan::GoodForDay,
            },
        ]
    );
    assert_eq!(snapshot.position, 45);
    assert_eq!(snapshot.fair_value, Some(Price::new(10_500)));
}

#[tokio::test(start_paused = true)]
async fn test_replay_skips_garbage_lines() {
    let lines = vec![
        "{not json".to_string(),
        String::new(),
        book_line(1, 20_000),
        r#"{"type":"heartbeat"}"#.to_string(),
    ];

    let (commands, snapshot) = replay(&lines).await;
    assert_eq!(commands.len(), 2);
    assert_eq!(snapshot.fair_value, Some(Price::new(20_000)));
}
