//! Point-to-point handoff primitives.
//!
//! All cross-worker interaction is the ownership transfer of a slice from one
//! worker to another. The [`Transport`] trait captures the primitives the
//! sort is built on, including the two-phase length discovery: a receiver
//! does not know an inbound transfer's length in advance, so it first probes
//! for the length, then sizes a buffer and performs the actual receive.
//!
//! Two implementations are provided: [`MpiTransport`] over an MPI
//! communicator, and [`ChannelTransport`] over an in-process channel mesh for
//! tests and thread-based runs.

use std::cell::RefCell;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use mpi::traits::{Communicator, Destination, Equivalence, Source};

/// A failed or inconsistent handoff.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransferError {
    /// The peer went away before the transfer completed.
    Disconnected {
        /// Rank of the peer that went away.
        peer: usize,
    },
    /// An inbound transfer carried more elements than were announced.
    LengthMismatch {
        /// The length announced at probe time.
        expected: usize,
        /// The length actually delivered.
        actual: usize,
    },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Disconnected { peer } => {
                write!(f, "peer {} went away before the transfer completed", peer)
            }
            TransferError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "inbound transfer delivered {} elements but {} were announced",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for TransferError {}

/// Point-to-point primitives the sort is built on.
///
/// Every worker holds exactly one transport. Sends hand ownership of a slice
/// to the destination; receives block until the matching send arrives. The
/// length of a transfer always travels with the transfer itself and is
/// discovered via [`Transport::probe_len`] before the receive.
pub trait Transport<T> {
    /// Identity of this worker, in `[0, size)`.
    fn rank(&self) -> usize;

    /// Total number of workers in the pool.
    fn size(&self) -> usize;

    /// Hand a copy of `data` to worker `dest`.
    fn send(&self, dest: usize, data: &[T]) -> Result<(), TransferError>;

    /// Block until a transfer from `source` is inbound and report its
    /// length without consuming it.
    fn probe_len(&self, source: usize) -> Result<usize, TransferError>;

    /// Receive a transfer of at most `len` elements from `source`.
    ///
    /// The returned buffer holds the actual delivered length, which may be
    /// smaller than `len`. A transfer larger than `len` is an error.
    fn receive(&self, source: usize, len: usize) -> Result<Vec<T>, TransferError>;
}

/// A [`Transport`] over an MPI communicator.
///
/// Transfer lengths are carried by the messages themselves: the probe reads
/// the element count from the message status, and the receive confirms the
/// count actually delivered.
pub struct MpiTransport<'c, C: Communicator> {
    comm: &'c C,
}

impl<'c, C: Communicator> MpiTransport<'c, C> {
    /// Create a transport borrowing the given communicator.
    pub fn new(comm: &'c C) -> Self {
        Self { comm }
    }
}

impl<'c, T: Equivalence, C: Communicator> Transport<T> for MpiTransport<'c, C> {
    fn rank(&self) -> usize {
        self.comm.rank() as usize
    }

    fn size(&self) -> usize {
        self.comm.size() as usize
    }

    fn send(&self, dest: usize, data: &[T]) -> Result<(), TransferError> {
        self.comm.process_at_rank(dest as i32).send(data);
        Ok(())
    }

    fn probe_len(&self, source: usize) -> Result<usize, TransferError> {
        let status = self.comm.process_at_rank(source as i32).probe();
        Ok(status.count(<T as Equivalence>::equivalent_datatype()) as usize)
    }

    fn receive(&self, source: usize, len: usize) -> Result<Vec<T>, TransferError> {
        let mut buf = Vec::<T>::with_capacity(len);
        let spare: &mut [T] = unsafe { std::mem::transmute(buf.spare_capacity_mut()) };

        let status = self.comm.process_at_rank(source as i32).receive_into(spare);

        // The delivered count is authoritative, not the probed length.
        let actual = status.count(<T as Equivalence>::equivalent_datatype()) as usize;
        if actual > len {
            return Err(TransferError::LengthMismatch {
                expected: len,
                actual,
            });
        }

        unsafe { buf.set_len(actual) };

        Ok(buf)
    }
}

/// A [`Transport`] over an in-process mesh of channels.
///
/// Each ordered worker pair gets its own channel, so a receive from one
/// source never consumes a transfer from another. A probed transfer is
/// parked in a per-source pending slot until the matching receive takes it.
pub struct ChannelTransport<T> {
    rank: usize,
    size: usize,
    senders: Vec<Sender<Vec<T>>>,
    receivers: Vec<Receiver<Vec<T>>>,
    pending: RefCell<Vec<Option<Vec<T>>>>,
}

/// Create a full mesh of channel transports for `size` workers.
///
/// The transport at index `i` belongs to worker `i`. Transports are intended
/// to be moved onto one thread per worker; dropping a transport disconnects
/// its peers, which observe [`TransferError::Disconnected`] instead of
/// blocking forever.
pub fn channel_mesh<T: Send>(size: usize) -> Vec<ChannelTransport<T>> {
    assert!(size >= 1);

    let mut senders: Vec<Vec<Sender<Vec<T>>>> = (0..size).map(|_| Vec::new()).collect();
    let mut receivers: Vec<Vec<Receiver<Vec<T>>>> = (0..size).map(|_| Vec::new()).collect();

    for from in 0..size {
        for to in 0..size {
            let (tx, rx) = mpsc::channel();
            senders[from].push(tx);
            receivers[to].push(rx);
        }
    }

    // For a fixed destination the inner loop above pushes once per source,
    // so receivers[to][from] is the receiving end of the (from, to) channel.

    senders
        .into_iter()
        .zip(receivers)
        .enumerate()
        .map(|(rank, (senders, receivers))| ChannelTransport {
            rank,
            size,
            senders,
            receivers,
            pending: RefCell::new((0..size).map(|_| None).collect()),
        })
        .collect()
}

impl<T: Send + Clone> Transport<T> for ChannelTransport<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: usize, data: &[T]) -> Result<(), TransferError> {
        self.senders[dest]
            .send(data.to_vec())
            .map_err(|_| TransferError::Disconnected { peer: dest })
    }

    fn probe_len(&self, source: usize) -> Result<usize, TransferError> {
        let mut pending = self.pending.borrow_mut();
        let slot = &mut pending[source];

        if let Some(buf) = slot {
            return Ok(buf.len());
        }

        let buf = self.receivers[source]
            .recv()
            .map_err(|_| TransferError::Disconnected { peer: source })?;
        let len = buf.len();
        *slot = Some(buf);

        Ok(len)
    }

    fn receive(&self, source: usize, len: usize) -> Result<Vec<T>, TransferError> {
        let parked = self.pending.borrow_mut()[source].take();

        let buf = match parked {
            Some(buf) => buf,
            None => self.receivers[source]
                .recv()
                .map_err(|_| TransferError::Disconnected { peer: source })?,
        };

        if buf.len() > len {
            return Err(TransferError::LengthMismatch {
                expected: len,
                actual: buf.len(),
            });
        }

        Ok(buf)
    }
}
