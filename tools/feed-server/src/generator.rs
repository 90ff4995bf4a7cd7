//! Synthetic input feeds
//!
//! Each count is a number of rounds; one round writes one line per
//! treasury in curve order. Prices and order book mids walk up from 99 to
//! 101 and back down in 1/256 steps, one step per line.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use types::bond::BondReference;
use types::fraction::TICKS_PER_POINT;
use types::ids::ProductId;

use crate::server::ServerError;

pub const PRICES_FILE: &str = "prices.txt";
pub const TRADES_FILE: &str = "trades.txt";
pub const MARKET_DATA_FILE: &str = "marketdata.txt";
pub const INQUIRIES_FILE: &str = "inquiries.txt";

/// Top-of-book spreads in 256ths, cycled one per order book
const BOOK_SPREADS: [i64; 6] = [2, 4, 6, 8, 6, 4];

/// Rounds per feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateCounts {
    pub prices: usize,
    pub trades: usize,
    pub market_data: usize,
    pub inquiries: usize,
}

impl Default for GenerateCounts {
    fn default() -> Self {
        Self {
            prices: 10_000,
            trades: 10,
            market_data: 10_000,
            inquiries: 10,
        }
    }
}

/// Mid price in 256ths bouncing between 99 and 101
struct MidWalk {
    ticks: i64,
    rising: bool,
}

impl MidWalk {
    const FLOOR: i64 = 99 * TICKS_PER_POINT;
    const CEILING: i64 = 101 * TICKS_PER_POINT;

    /// Starts one tick below 99 so the first step lands on 99-000
    fn new() -> Self {
        Self {
            ticks: Self::FLOOR - 1,
            rising: true,
        }
    }

    fn step(&mut self) -> i64 {
        if self.rising {
            self.ticks += 1;
            if self.ticks == Self::CEILING {
                self.rising = false;
            }
        } else {
            self.ticks -= 1;
            if self.ticks == Self::FLOOR {
                self.rising = true;
            }
        }
        self.ticks
    }
}

/// `handle-xyz` with the 256ths digit always written
fn fractional(ticks: i64) -> String {
    let handle = ticks.div_euclid(TICKS_PER_POINT);
    let rem = ticks.rem_euclid(TICKS_PER_POINT);
    format!("{}-{:02}{}", handle, rem / 8, rem % 8)
}

fn side(round: usize) -> &'static str {
    if round % 2 == 0 {
        "BUY"
    } else {
        "SELL"
    }
}

/// Create `out_dir/name` and fill it with `write`
fn write_feed<F>(out_dir: &Path, name: &str, write: F) -> Result<(), ServerError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let path = out_dir.join(name);
    File::create(&path)
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            write(&mut out)?;
            out.flush()
        })
        .map_err(|source| ServerError::File {
            path: path.display().to_string(),
            source,
        })
}

/// Write the four input feeds into `out_dir`
pub fn generate(out_dir: &Path, seed: u64, counts: GenerateCounts) -> Result<(), ServerError> {
    fs::create_dir_all(out_dir).map_err(|source| ServerError::File {
        path: out_dir.display().to_string(),
        source,
    })?;

    let cusips = BondReference::treasuries().product_ids().to_vec();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    write_feed(out_dir, PRICES_FILE, |out| {
        write_prices(out, &cusips, counts.prices, &mut rng)
    })?;
    write_feed(out_dir, TRADES_FILE, |out| {
        write_trades(out, &cusips, counts.trades, &mut rng)
    })?;
    write_feed(out_dir, MARKET_DATA_FILE, |out| {
        write_market_data(out, &cusips, counts.market_data)
    })?;
    write_feed(out_dir, INQUIRIES_FILE, |out| {
        write_inquiries(out, &cusips, counts.inquiries)
    })?;

    info!(
        out_dir = %out_dir.display(),
        seed,
        prices = counts.prices,
        trades = counts.trades,
        market_data = counts.market_data,
        inquiries = counts.inquiries,
        "feeds generated"
    );
    Ok(())
}

/// `cusip,mid,d` with spread `d/128`, d in 1..=2
fn write_prices(
    out: &mut impl Write,
    cusips: &[ProductId],
    rounds: usize,
    rng: &mut ChaCha8Rng,
) -> io::Result<()> {
    let mut mid = MidWalk::new();
    for _ in 0..rounds {
        for cusip in cusips {
            let ticks = mid.step();
            let spread: u8 = rng.gen_range(1..=2);
            writeln!(out, "{},{},{}", cusip, fractional(ticks), spread)?;
        }
    }
    Ok(())
}

/// `cusip,TradeId<n>,TRSY<b>,price,side,quantity`
fn write_trades(
    out: &mut impl Write,
    cusips: &[ProductId],
    rounds: usize,
    rng: &mut ChaCha8Rng,
) -> io::Result<()> {
    let mut trade_id = 0;
    for round in 0..rounds {
        let side = side(round);
        let price = if side == "BUY" { "99.0" } else { "100.0" };
        let quantity = (1 + round % 5) * 1_000_000;
        for cusip in cusips {
            let book: u8 = rng.gen_range(1..=3);
            writeln!(
                out,
                "{},TradeId{},TRSY{},{},{},{}",
                cusip, trade_id, book, price, side, quantity
            )?;
            trade_id += 1;
        }
    }
    Ok(())
}

/// `cusip,bid4..bid0,offer0..offer4`
fn write_market_data(out: &mut impl Write, cusips: &[ProductId], rounds: usize) -> io::Result<()> {
    let mut mid = MidWalk::new();
    let mut books = 0;
    for _ in 0..rounds {
        for cusip in cusips {
            let ticks = mid.step();
            let half_spread = BOOK_SPREADS[books % BOOK_SPREADS.len()] / 2;
            books += 1;

            let mut line = cusip.to_string();
            for level in (0..5).rev() {
                line.push(',');
                line.push_str(&fractional(ticks - level - half_spread));
            }
            for level in 0..5 {
                line.push(',');
                line.push_str(&fractional(ticks + level + half_spread));
            }
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

/// `id,cusip,side,` with a trailing comma
fn write_inquiries(out: &mut impl Write, cusips: &[ProductId], rounds: usize) -> io::Result<()> {
    let mut inquiry_id = 0;
    for round in 0..rounds {
        for cusip in cusips {
            writeln!(out, "{},{},{},", inquiry_id, cusip, side(round))?;
            inquiry_id += 1;
        }
    }
    Ok(())
}
