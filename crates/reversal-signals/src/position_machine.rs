//! Flat/long position state machine.
//!
//! Two states, both terminal:
//!
//! | state | signal | next |
//! |-------|--------|------|
//! | Flat  | Buy    | Long |
//! | Long  | Sell   | Flat |
//! | any   | other  | unchanged |
//!
//! A `Buy` while long and a `Sell` while flat are no-ops, so the machine
//! never holds more than one unit and never exits a position it does not
//! hold.

use reversal_core::types::{Position, PriceSeries, Signal, Trade};
use tracing::debug;

/// Apply one signal to the current position.
#[inline]
pub fn next_position(current: Position, signal: Signal) -> Position {
    match (current, signal) {
        (Position::Flat, Signal::Buy) => Position::Long,
        (Position::Long, Signal::Sell) => Position::Flat,
        (unchanged, _) => unchanged,
    }
}

/// Fold a signal sequence into a position sequence, starting flat.
///
/// The output has one position per signal, and each position is final once
/// emitted.
pub fn run_position_machine(signals: &[Signal]) -> Vec<Position> {
    let positions: Vec<Position> = signals
        .iter()
        .scan(Position::Flat, |current, &signal| {
            *current = next_position(*current, signal);
            Some(*current)
        })
        .collect();

    debug!(
        bars = positions.len(),
        long_bars = positions.iter().filter(|p| p.is_long()).count(),
        "Position sequence built"
    );

    positions
}

/// Recover round trips from a position sequence.
///
/// Entry and exit prices are the closes of the bars on which the position
/// changed. A position still long at the end yields a trailing open trade.
pub fn extract_trades(prices: &PriceSeries, positions: &[Position]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut open: Option<Trade> = None;
    let mut previous = Position::Flat;

    for (point, &position) in prices.iter().zip(positions) {
        match (previous, position) {
            (Position::Flat, Position::Long) => {
                open = Some(Trade::open(point.timestamp, point.close));
            }
            (Position::Long, Position::Flat) => {
                if let Some(trade) = open.take() {
                    trades.push(trade.close(point.timestamp, point.close));
                }
            }
            _ => {}
        }
        previous = position;
    }

    trades.extend(open);
    trades
}

/// Number of completed Flat -> Long -> Flat round trips.
pub fn closed_trade_count(positions: &[Position]) -> usize {
    positions
        .windows(2)
        .filter(|w| w[0] == Position::Long && w[1] == Position::Flat)
        .count()
}
