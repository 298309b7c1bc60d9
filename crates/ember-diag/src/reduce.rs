//! Process groups and the global reduction of level sums.
//!
//! A [`ProcessGroup`] provides blocking collectives. Every rank of a
//! group must enter the same collectives in the same order; a rank that
//! skips one deadlocks its peers.
//!
//! Two groups ship with the crate:
//!
//! - [`SingleProcess`]: one rank, every collective is the identity.
//! - [`ThreadGroup`]: `n` in-process ranks, one per thread, wired by
//!   crossbeam channels.

use crossbeam_channel::{Receiver, Sender};
use ember_core::Rank;
use log::debug;

use crate::aggregate::LevelSums;
use crate::error::ReduceError;

/// Blocking collective operations over a fixed set of ranks.
pub trait ProcessGroup {
    /// This process's rank.
    fn rank(&self) -> Rank;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// The rank that formats and writes diagnostics.
    fn io_rank(&self) -> Rank {
        Rank(0)
    }

    /// Whether this process is the I/O rank.
    fn is_io_rank(&self) -> bool {
        self.rank() == self.io_rank()
    }

    /// Element-wise sum onto `root`. Only `root`'s buffer holds the
    /// result afterwards; other buffers are left unchanged.
    fn reduce_sum(&self, buf: &mut [f64], root: Rank) -> Result<(), ReduceError>;

    /// Element-wise maximum, delivered to every rank.
    fn all_reduce_max(&self, buf: &mut [f64]) -> Result<(), ReduceError>;

    /// Element-wise minimum, delivered to every rank.
    fn all_reduce_min(&self, buf: &mut [f64]) -> Result<(), ReduceError>;

    /// Element-wise sum, delivered to every rank.
    fn all_reduce_sum(&self, buf: &mut [f64]) -> Result<(), ReduceError>;
}

// ── SingleProcess ──────────────────────────────────────────────────

/// A group of one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleProcess;

impl ProcessGroup for SingleProcess {
    fn rank(&self) -> Rank {
        Rank(0)
    }

    fn size(&self) -> usize {
        1
    }

    fn reduce_sum(&self, _buf: &mut [f64], root: Rank) -> Result<(), ReduceError> {
        if root != Rank(0) {
            return Err(ReduceError::InvalidRoot { root, size: 1 });
        }
        Ok(())
    }

    fn all_reduce_max(&self, _buf: &mut [f64]) -> Result<(), ReduceError> {
        Ok(())
    }

    fn all_reduce_min(&self, _buf: &mut [f64]) -> Result<(), ReduceError> {
        Ok(())
    }

    fn all_reduce_sum(&self, _buf: &mut [f64]) -> Result<(), ReduceError> {
        Ok(())
    }
}

// ── ThreadGroup ────────────────────────────────────────────────────

/// One rank of an in-process group.
///
/// Every ordered pair of ranks has its own channel, so messages of
/// consecutive collectives between two ranks arrive in order and never
/// mix with traffic from a third rank.
#[derive(Debug)]
pub struct ThreadGroup {
    rank: Rank,
    /// `to[p]` sends to rank `p`.
    to: Vec<Sender<Vec<f64>>>,
    /// `from[p]` receives from rank `p`.
    from: Vec<Receiver<Vec<f64>>>,
}

impl ThreadGroup {
    /// Create the `n` rank handles of a new group, in rank order.
    ///
    /// Move each handle to its own thread. Dropping a handle while peers
    /// are inside a collective makes them fail with
    /// [`ReduceError::Disconnected`].
    pub fn new(n: usize) -> Vec<ThreadGroup> {
        // channels[src][dst]
        let mut senders: Vec<Vec<Sender<Vec<f64>>>> = Vec::with_capacity(n);
        let mut receivers: Vec<Vec<Receiver<Vec<f64>>>> = (0..n).map(|_| Vec::new()).collect();
        for _src in 0..n {
            let mut row = Vec::with_capacity(n);
            for inbox in receivers.iter_mut() {
                let (tx, rx) = crossbeam_channel::unbounded();
                row.push(tx);
                inbox.push(rx);
            }
            senders.push(row);
        }
        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (to, from))| ThreadGroup {
                rank: Rank(rank),
                to,
                from,
            })
            .collect()
    }

    fn send(&self, peer: usize, buf: &[f64]) -> Result<(), ReduceError> {
        self.to[peer]
            .send(buf.to_vec())
            .map_err(|_| ReduceError::Disconnected { peer: Rank(peer) })
    }

    fn recv(&self, peer: usize, expected: usize) -> Result<Vec<f64>, ReduceError> {
        let data = self.from[peer]
            .recv()
            .map_err(|_| ReduceError::Disconnected { peer: Rank(peer) })?;
        if data.len() != expected {
            return Err(ReduceError::LengthMismatch {
                peer: Rank(peer),
                expected,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    fn reduce_with(
        &self,
        buf: &mut [f64],
        root: Rank,
        op: fn(f64, f64) -> f64,
    ) -> Result<(), ReduceError> {
        let size = self.size();
        if root.0 >= size {
            return Err(ReduceError::InvalidRoot { root, size });
        }
        if self.rank != root {
            return self.send(root.0, buf);
        }
        for peer in (0..size).filter(|&p| p != root.0) {
            let data = self.recv(peer, buf.len())?;
            for (b, v) in buf.iter_mut().zip(data) {
                *b = op(*b, v);
            }
        }
        Ok(())
    }

    fn all_reduce_with(&self, buf: &mut [f64], op: fn(f64, f64) -> f64) -> Result<(), ReduceError> {
        let root = Rank(0);
        self.reduce_with(buf, root, op)?;
        if self.rank == root {
            for peer in 1..self.size() {
                self.send(peer, buf)?;
            }
        } else {
            let data = self.recv(root.0, buf.len())?;
            buf.copy_from_slice(&data);
        }
        Ok(())
    }
}

impl ProcessGroup for ThreadGroup {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.to.len()
    }

    fn reduce_sum(&self, buf: &mut [f64], root: Rank) -> Result<(), ReduceError> {
        self.reduce_with(buf, root, |a, b| a + b)
    }

    fn all_reduce_max(&self, buf: &mut [f64]) -> Result<(), ReduceError> {
        self.all_reduce_with(buf, f64::max)
    }

    fn all_reduce_min(&self, buf: &mut [f64]) -> Result<(), ReduceError> {
        self.all_reduce_with(buf, f64::min)
    }

    fn all_reduce_sum(&self, buf: &mut [f64]) -> Result<(), ReduceError> {
        self.all_reduce_with(buf, |a, b| a + b)
    }
}

// ── GlobalReducer ──────────────────────────────────────────────────

/// Combines every rank's [`LevelSums`] into the global totals.
///
/// Integrals are summed onto the I/O rank only. Temperature extrema and
/// the fuel consumption integral are all-reduced, so every rank sees
/// them.
#[derive(Clone, Copy)]
pub struct GlobalReducer<'g> {
    group: &'g dyn ProcessGroup,
}

impl<'g> GlobalReducer<'g> {
    /// A reducer over `group`.
    pub fn new(group: &'g dyn ProcessGroup) -> Self {
        Self { group }
    }

    /// Reduce `local` across the group.
    ///
    /// Returns `Some(totals)` on the I/O rank and `None` elsewhere. Every
    /// rank must call this.
    pub fn reduce(&self, local: &LevelSums) -> Result<Option<LevelSums>, ReduceError> {
        let io = self.group.io_rank();

        let mut sums = [
            local.mass,
            local.momentum[0],
            local.momentum[1],
            local.momentum[2],
            local.rho_e,
            local.rho_k,
            local.rho_etot,
            local.mass_moment[0],
            local.mass_moment[1],
            local.mass_moment[2],
            local.cells as f64,
        ];
        self.group.reduce_sum(&mut sums, io)?;

        let mut maxima = [local.t_max, local.grad_t_max];
        self.group.all_reduce_max(&mut maxima)?;
        let mut minima = [local.t_min];
        self.group.all_reduce_min(&mut minima)?;
        let mut fuel = [local.fuel_rate];
        self.group.all_reduce_sum(&mut fuel)?;

        debug!(
            "rank {}: reduced across {} ranks",
            self.group.rank(),
            self.group.size()
        );

        if !self.group.is_io_rank() {
            return Ok(None);
        }
        let [mass, mx, my, mz, rho_e, rho_k, rho_etot, lx, ly, lz, cells] = sums;
        Ok(Some(LevelSums {
            mass,
            momentum: [mx, my, mz],
            mass_moment: [lx, ly, lz],
            rho_e,
            rho_k,
            rho_etot,
            t_max: maxima[0],
            t_min: minima[0],
            grad_t_max: maxima[1],
            fuel_rate: fuel[0],
            cells: cells as u64,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn run<T: Send + 'static>(
        n: usize,
        f: impl Fn(ThreadGroup) -> T + Send + Sync + Copy + 'static,
    ) -> Vec<T> {
        let handles: Vec<_> = ThreadGroup::new(n)
            .into_iter()
            .map(|g| thread::spawn(move || f(g)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn single_process_is_identity() {
        let g = SingleProcess;
        let mut buf = [1.0, 2.0];
        g.reduce_sum(&mut buf, Rank(0)).unwrap();
        g.all_reduce_max(&mut buf).unwrap();
        assert_eq!(buf, [1.0, 2.0]);
        assert!(g.is_io_rank());
    }

    #[test]
    fn single_process_rejects_foreign_root() {
        let mut buf = [1.0];
        assert_eq!(
            SingleProcess.reduce_sum(&mut buf, Rank(1)),
            Err(ReduceError::InvalidRoot {
                root: Rank(1),
                size: 1
            })
        );
    }

    #[test]
    fn thread_group_sum_lands_on_root_only() {
        let out = run(4, |g| {
            let mut buf = [g.rank().0 as f64, 1.0];
            g.reduce_sum(&mut buf, Rank(2)).unwrap();
            (g.rank(), buf)
        });
        for (rank, buf) in out {
            if rank == Rank(2) {
                assert_eq!(buf, [6.0, 4.0]);
            } else {
                assert_eq!(buf, [rank.0 as f64, 1.0]);
            }
        }
    }

    #[test]
    fn thread_group_all_reduce_reaches_everyone() {
        let out = run(3, |g| {
            let r = g.rank().0 as f64;
            let mut max = [r, -r];
            let mut min = [r];
            let mut sum = [r + 1.0];
            g.all_reduce_max(&mut max).unwrap();
            g.all_reduce_min(&mut min).unwrap();
            g.all_reduce_sum(&mut sum).unwrap();
            (max, min, sum)
        });
        for (max, min, sum) in out {
            assert_eq!(max, [2.0, 0.0]);
            assert_eq!(min, [0.0]);
            assert_eq!(sum, [6.0]);
        }
    }

    #[test]
    fn consecutive_collectives_do_not_interleave() {
        let out = run(3, |g| {
            let mut results = Vec::new();
            for round in 0..20 {
                let mut buf = [(g.rank().0 * 100 + round) as f64];
                g.all_reduce_sum(&mut buf).unwrap();
                results.push(buf[0]);
            }
            results
        });
        for results in out {
            for (round, v) in results.iter().enumerate() {
                assert_eq!(*v, (300 + 3 * round) as f64);
            }
        }
    }

    #[test]
    fn dropped_peer_is_reported() {
        let mut groups = ThreadGroup::new(2);
        let peer = groups.pop().unwrap();
        drop(peer);
        let root = groups.pop().unwrap();
        let mut buf = [1.0];
        assert_eq!(
            root.reduce_sum(&mut buf, Rank(0)),
            Err(ReduceError::Disconnected { peer: Rank(1) })
        );
    }

    #[test]
    fn reducer_returns_totals_on_io_rank() {
        let out = run(2, |g| {
            let local = LevelSums {
                mass: 1.0,
                momentum: [1.0, 2.0, 3.0],
                mass_moment: [0.5; 3],
                rho_e: 1.0,
                rho_k: 0.5,
                rho_etot: 1.5,
                t_max: 10.0 * (g.rank().0 as f64 + 1.0),
                t_min: 1.0 + g.rank().0 as f64,
                grad_t_max: 3.0,
                fuel_rate: -2.0,
                cells: 8,
            };
            GlobalReducer::new(&g).reduce(&local).unwrap()
        });
        let total = out[0].expect("rank 0 is the I/O rank");
        assert!(out[1].is_none());
        assert_eq!(total.mass, 2.0);
        assert_eq!(total.momentum, [2.0, 4.0, 6.0]);
        assert_eq!(total.t_max, 20.0);
        assert_eq!(total.t_min, 1.0);
        assert_eq!(total.fuel_rate, -4.0);
        assert_eq!(total.cells, 16);
    }
}
