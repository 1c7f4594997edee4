//! Session clock: deferred work (staggered offer deliveries, the
//! post-completion grace clear) is scheduled here and popped by the runner.
//! Offer deliveries are keyed by request identity so superseding a request
//! revokes its in-flight deliveries explicitly.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::request::RequestId;
use crate::ride::RideId;

pub const ONE_SEC_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    DeliverOffer,
    ClearRide,
}

/// What a scheduled event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSubject {
    /// A pending offer delivery from `driver` against `request`.
    Offer { driver: Entity, request: RequestId },
    Ride(RideId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Event {
    fn references_request(&self, request: RequestId) -> bool {
        matches!(
            self.subject,
            Some(EventSubject::Offer { request: r, .. }) if r == request
        )
    }
}

/// The event currently being processed by the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    event: Event,
    seq: u64,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp;
        // insertion order breaks ties.
        other
            .event
            .timestamp
            .cmp(&self.event.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default, Resource)]
pub struct SessionClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Scheduled>,
}

impl SessionClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Scheduled {
            event: Event {
                timestamp,
                kind,
                subject,
            },
            seq,
        });
    }

    pub fn schedule_in_ms(&mut self, delay_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(self.now + delay_ms, kind, subject);
    }

    pub fn schedule_in_secs(&mut self, secs: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_in_ms(secs * ONE_SEC_MS, kind, subject);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let scheduled = self.events.pop()?;
        self.now = scheduled.event.timestamp;
        Some(scheduled.event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|scheduled| scheduled.event.timestamp)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every pending offer delivery scheduled against `request`.
    pub fn revoke_request(&mut self, request: RequestId) {
        self.retain(|event| !event.references_request(request));
    }

    /// Drop all pending events. Time does not move.
    pub fn clear_pending(&mut self) {
        self.events.clear();
    }

    /// Move time forward to `timestamp` without processing anything. Callers
    /// must drain due events first.
    pub fn fast_forward(&mut self, timestamp: u64) {
        debug_assert!(
            self.next_event_time().map_or(true, |next| next >= timestamp),
            "fast_forward would skip pending events"
        );
        self.now = self.now.max(timestamp);
    }

    fn retain(&mut self, keep: impl Fn(&Event) -> bool) {
        let kept: Vec<Scheduled> = std::mem::take(&mut self.events)
            .into_vec()
            .into_iter()
            .filter(|scheduled| keep(&scheduled.event))
            .collect();
        self.events = BinaryHeap::from(kept);
    }
}
