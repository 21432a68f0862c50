//! Lottery tickets and the sequence that numbers them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Price of a single ticket, in whole currency units.
pub const TICKET_PRICE: u64 = 1;

/// A purchased lottery ticket.
///
/// Tickets are owned by the player who bought them and are discarded when the
/// round resets tickets. The number is unique for the lifetime of the
/// [`TicketSequence`] that issued it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    number: u64,
    price: u64,
}

impl Ticket {
    /// Sequence number of this ticket.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Price paid for this ticket.
    pub fn price(&self) -> u64 {
        self.price
    }
}

/// Monotonic ticket number generator.
///
/// Increments are atomic, so concurrent purchases never observe the same
/// number. Share one sequence per process through an `Arc`.
#[derive(Debug, Default)]
pub struct TicketSequence {
    last: AtomicU64,
}

impl TicketSequence {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Issue a new ticket at [`TICKET_PRICE`] carrying the next number.
    ///
    /// The first ticket issued after construction or [`reset`](Self::reset)
    /// is number 1.
    pub fn new_ticket(&self) -> Ticket {
        Ticket {
            number: self.last.fetch_add(1, Ordering::SeqCst) + 1,
            price: TICKET_PRICE,
        }
    }

    /// Issue `count` consecutive tickets.
    pub fn issue(&self, count: u64) -> Vec<Ticket> {
        (0..count).map(|_| self.new_ticket()).collect()
    }

    /// Number of the most recently issued ticket (0 if none).
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }

    /// Rewind the counter to zero.
    ///
    /// Only for isolating independent test runs; never call this while a game
    /// is in progress.
    pub fn reset(&self) {
        self.last.store(0, Ordering::SeqCst);
    }
}
