//! Delayed-task queue driving notification dismissal.
//!
//! # Design
//! One background task owns a min-heap of deadlines. `Notifier::show` sends a
//! [`DismissalJob`] over an unbounded channel and returns immediately; the
//! scheduler sleeps until the earliest deadline, fires everything that is due,
//! and goes back to waiting. Each notification passes through two heap
//! entries: a `Dismiss` entry at `created_at + ttl` and a `Remove` entry at
//! `created_at + ttl + dismiss_delay`, pushed when the first one fires. No
//! entry is ever re-queued, so each notification is removed exactly once.
//!
//! The task exits once every `Notifier` handle is dropped and the heap has
//! drained.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

use crate::notifier::Shared;

/// Deadlines for one notification, computed by `show` at creation time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DismissalJob {
    pub id: Uuid,
    pub dismiss_at: Instant,
    pub remove_at: Instant,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Dismiss { remove_at: Instant },
    Remove,
}

#[derive(Debug)]
struct Entry {
    deadline: Instant,
    seq: u64,
    id: Uuid,
    phase: Phase,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Ties on the deadline fall back to insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

pub(crate) struct DismissalScheduler {
    shared: Arc<Shared>,
    jobs: mpsc::UnboundedReceiver<DismissalJob>,
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
    accepting: bool,
}

impl DismissalScheduler {
    pub(crate) fn new(shared: Arc<Shared>, jobs: mpsc::UnboundedReceiver<DismissalJob>) -> Self {
        Self {
            shared,
            jobs,
            heap: BinaryHeap::new(),
            next_seq: 0,
            accepting: true,
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            let next_deadline = self.heap.peek().map(|Reverse(entry)| entry.deadline);

            tokio::select! {
                job = self.jobs.recv(), if self.accepting => match job {
                    Some(job) => self.push(job.dismiss_at, job.id, Phase::Dismiss { remove_at: job.remove_at }),
                    None => self.accepting = false,
                },
                () = wait_for(next_deadline) => self.fire_due(),
            }

            if !self.accepting && self.heap.is_empty() {
                tracing::debug!("dismissal scheduler drained, exiting");
                break;
            }
        }
    }

    fn push(&mut self, deadline: Instant, id: Uuid, phase: Phase) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            deadline,
            seq,
            id,
            phase,
        }));
    }

    fn fire_due(&mut self) {
        let now = Instant::now();
        while self
            .heap
            .peek()
            .is_some_and(|Reverse(entry)| entry.deadline <= now)
        {
            let Some(Reverse(entry)) = self.heap.pop() else {
                break;
            };
            match entry.phase {
                Phase::Dismiss { remove_at } => {
                    self.shared.begin_dismissal(entry.id);
                    self.push(remove_at, entry.id, Phase::Remove);
                }
                Phase::Remove => self.shared.remove(entry.id),
            }
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
