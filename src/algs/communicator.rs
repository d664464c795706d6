//! Thin façade over the participants of a surgery run.
//!
//! Surgery itself is sequential over one zone; the communicator is only
//! consulted to size distributions and to reduce counts, mirroring the
//! collective calls the distributed container expects. [`SelfComm`] is the
//! single-participant communicator every orchestrated run uses.

/// Minimal collective interface used by the exchange layer.
pub trait Communicator: Send + Sync + 'static {
    /// Rank of this participant.
    fn rank(&self) -> usize;
    /// Number of participants.
    fn size(&self) -> usize;
    /// Global sum of a local count.
    fn allreduce_sum(&self, local: usize) -> usize;
}

/// Single-participant communicator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelfComm;

impl Communicator for SelfComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn allreduce_sum(&self, local: usize) -> usize {
        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_comm_is_a_single_rank() {
        let comm = SelfComm;
        assert_eq!(comm.rank(), 0);
        assert_eq!(comm.size(), 1);
        assert_eq!(comm.allreduce_sum(7), 7);
    }
}
