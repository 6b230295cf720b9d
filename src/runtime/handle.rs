use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

use crate::{
    core::store::{CheckOutReceipt, ParkingSnapshot, ParkingStore, StoreError},
    types::SlotIndex,
    vehicle::{CheckInOutcome, HistoryRecord, QueueTicket, Vehicle, normalize_plate},
};

use super::events::ParkingEvent;

/// Errors surfaced by the runtime handle.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The runtime task is gone.
    #[error("runtime channel closed")]
    ChannelClosed,
}

/// Channel sizing for the runtime loop.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the command queue feeding the writer task.
    pub command_queue_bound: usize,
    /// Capacity of the broadcast event stream.
    pub event_queue_bound: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_queue_bound: 1024,
        }
    }
}

/// Cloneable handle to the single-writer parking runtime.
///
/// All mutation funnels through one task owning the [`ParkingStore`], so
/// concurrent callers are serialized and the store's invariants hold without
/// locks.
pub struct ParkFlowHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ParkingEvent>,
}

impl Clone for ParkFlowHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    CheckIn {
        plate: String,
        vehicle_type: String,
        resp: oneshot::Sender<Result<CheckInOutcome, RuntimeError>>,
    },
    CheckOut {
        slot: SlotIndex,
        resp: oneshot::Sender<Result<CheckOutReceipt, RuntimeError>>,
    },
    Undo {
        resp: oneshot::Sender<Result<bool, RuntimeError>>,
    },
    Snapshot {
        resp: oneshot::Sender<ParkingSnapshot>,
    },
    Slots {
        resp: oneshot::Sender<Vec<Option<Vehicle>>>,
    },
    Queue {
        resp: oneshot::Sender<Vec<QueueTicket>>,
    },
    History {
        resp: oneshot::Sender<Vec<HistoryRecord>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the writer task and returns a handle to it.
pub fn spawn_parkflow(store: ParkingStore, config: RuntimeConfig) -> ParkFlowHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<ParkingEvent>(config.event_queue_bound);

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;

        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut store, &events_tx_loop) {
                break;
            }
        }
    });

    ParkFlowHandle { cmd_tx, events_tx }
}

impl ParkFlowHandle {
    /// Subscribes to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ParkingEvent> {
        self.events_tx.subscribe()
    }

    /// Checks a vehicle in; see
    /// [`ParkingStore::check_in`](crate::core::store::ParkingStore::check_in).
    pub async fn check_in(
        &self,
        plate: impl Into<String>,
        vehicle_type: impl Into<String>,
    ) -> Result<CheckInOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CheckIn {
                plate: plate.into(),
                vehicle_type: vehicle_type.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Checks the vehicle in `slot` out, returning the receipt.
    pub async fn check_out(&self, slot: SlotIndex) -> Result<CheckOutReceipt, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CheckOut { slot, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Reverts the most recent action. `Ok(false)` means there was nothing
    /// to undo.
    pub async fn undo(&self) -> Result<bool, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Undo { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Full display state in one call.
    pub async fn snapshot(&self) -> Result<ParkingSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Snapshot { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Slot array in index order.
    pub async fn slots(&self) -> Result<Vec<Option<Vehicle>>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Slots { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Waiting queue in FIFO order.
    pub async fn queue(&self) -> Result<Vec<QueueTicket>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Queue { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Session history in append order.
    pub async fn history(&self) -> Result<Vec<HistoryRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::History { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the writer task after draining its queue position.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    store: &mut ParkingStore,
    events_tx: &broadcast::Sender<ParkingEvent>,
) -> bool {
    match cmd {
        Command::CheckIn {
            plate,
            vehicle_type,
            resp,
        } => {
            let res = store.check_in(&plate, &vehicle_type);
            match &res {
                Ok(outcome) => {
                    let plate = normalize_plate(&plate).unwrap_or_else(|| plate.clone());
                    match outcome {
                        CheckInOutcome::Parked { slot } => {
                            debug!(%plate, slot, "checked in");
                            let _ = events_tx.send(ParkingEvent::CheckedIn { plate, slot: *slot });
                        }
                        CheckInOutcome::Queued { position } => {
                            debug!(%plate, position, "queued");
                            let _ = events_tx.send(ParkingEvent::Queued { plate });
                        }
                    }
                }
                Err(err) => warn!(%plate, %err, "check-in rejected"),
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::CheckOut { slot, resp } => {
            let res = store.check_out(slot);
            match &res {
                Ok(receipt) => {
                    debug!(slot, fee = receipt.record.fee, "checked out");
                    let _ = events_tx.send(ParkingEvent::CheckedOut {
                        plate: receipt.record.plate.clone(),
                        slot: receipt.slot,
                        fee: receipt.record.fee,
                    });
                    if let Some(promotion) = &receipt.promoted {
                        match promotion.outcome {
                            CheckInOutcome::Parked { slot } => {
                                let _ = events_tx.send(ParkingEvent::Promoted {
                                    plate: promotion.plate.clone(),
                                    slot,
                                });
                            }
                            CheckInOutcome::Queued { .. } => {
                                let _ = events_tx.send(ParkingEvent::Queued {
                                    plate: promotion.plate.clone(),
                                });
                            }
                        }
                    }
                }
                Err(err) => warn!(slot, %err, "checkout rejected"),
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Undo { resp } => {
            let res = match store.undo() {
                Ok(action) => {
                    debug!(?action, "undo applied");
                    let _ = events_tx.send(ParkingEvent::UndoApplied);
                    Ok(true)
                }
                Err(StoreError::EmptyUndoLog) => Ok(false),
                Err(err) => Err(RuntimeError::from(err)),
            };
            let _ = resp.send(res);
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(store.export_snapshot());
        }
        Command::Slots { resp } => {
            let _ = resp.send(store.slots_cloned());
        }
        Command::Queue { resp } => {
            let _ = resp.send(store.queue_cloned());
        }
        Command::History { resp } => {
            let _ = resp.send(store.history_cloned());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}
