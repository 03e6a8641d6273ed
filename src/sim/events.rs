//! Grid notifications
//!
//! The bus is owned by the grid controller. Publishing is fire-and-forget:
//! handlers subscribed to the event's kind run in subscription order. A bus
//! built with `with_log` also appends every event to a pending log that the
//! caller must drain with `take_events`; a plain bus keeps nothing.

use serde::{Deserialize, Serialize};

use super::address::GridAddress;
use super::tile::{TileId, TileKind};

/// Which status flag changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFlag {
    Selectable,
    Linked,
}

/// Something that happened to the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridEvent {
    /// A tile fell during condensation
    TileMoved {
        tile_id: TileId,
        old_address: GridAddress,
        new_address: GridAddress,
    },
    /// Slots cleared by a removal notification (sorted, no duplicates)
    TilesRemoved { addresses: Vec<GridAddress> },
    /// A refill created a tile
    TileSpawned {
        tile_id: TileId,
        address: GridAddress,
        kind: TileKind,
    },
    /// The player picked the tile at `address`
    TileSelected { address: GridAddress },
    TileStatusChanged {
        tile_id: TileId,
        address: GridAddress,
        flag: StatusFlag,
        value: bool,
    },
}

/// Discriminant used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridEventKind {
    TileMoved,
    TilesRemoved,
    TileSpawned,
    TileSelected,
    TileStatusChanged,
}

impl GridEvent {
    pub fn kind(&self) -> GridEventKind {
        match self {
            GridEvent::TileMoved { .. } => GridEventKind::TileMoved,
            GridEvent::TilesRemoved { .. } => GridEventKind::TilesRemoved,
            GridEvent::TileSpawned { .. } => GridEventKind::TileSpawned,
            GridEvent::TileSelected { .. } => GridEventKind::TileSelected,
            GridEvent::TileStatusChanged { .. } => GridEventKind::TileStatusChanged,
        }
    }
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Handler = Box<dyn FnMut(&GridEvent)>;

struct Subscription {
    id: SubscriptionId,
    kind: GridEventKind,
    handler: Handler,
}

/// In-process publish/subscribe channel
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    pending: Vec<GridEvent>,
    /// Append published events to `pending`
    logging: bool,
    next_id: u32,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("logging", &self.logging)
            .field("pending", &self.pending)
            .finish()
    }
}

impl EventBus {
    /// Subscriber-only bus, no pending log
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus that also records every event until `take_events`
    pub fn with_log() -> Self {
        Self {
            logging: true,
            ..Self::default()
        }
    }

    /// Turn the pending log on or off. Turning it off discards what is pending.
    pub fn set_logging(&mut self, enabled: bool) {
        self.logging = enabled;
        if !enabled {
            self.pending = Vec::new();
        }
    }

    pub fn is_logging(&self) -> bool {
        self.logging
    }

    pub fn subscribe(
        &mut self,
        kind: GridEventKind,
        handler: impl FnMut(&GridEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn publish(&mut self, event: GridEvent) {
        let kind = event.kind();
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            (sub.handler)(&event);
        }
        if self.logging {
            self.pending.push(event);
        }
    }

    /// Drain everything published since the last call
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[GridEvent] {
        &self.pending
    }
}
