//! Block-to-part / part-to-block primitives.
//!
//! Values of a distributed array are stored by block: participant `r` owns
//! the slice described by its [`Distribution`]. The surgery primitives only
//! ever request ids of their own block (runs are single-participant), so a
//! request outside the local block is reported as an
//! [`ExchangeMismatch`](MeshSurgeryError::ExchangeMismatch) rather than
//! fetched remotely.

use itertools::Itertools;

use crate::algs::communicator::Communicator;
use crate::data::distribution::Distribution;
use crate::mesh_error::MeshSurgeryError;

/// Even split of `total` entities over the communicator's participants.
pub fn uniform_distribution<C: Communicator>(total: usize, comm: &C) -> Distribution {
    let size = comm.size().max(1);
    let rank = comm.rank();
    let step = total / size;
    let rem = total % size;
    let start = rank * step + rank.min(rem);
    let end = start + step + usize::from(rank < rem);
    Distribution::new(start, end, total)
}

/// Gather the values of 1-based global ids `requested` from a block array.
pub fn block_to_part<T, C>(
    values: &[T],
    distribution: &Distribution,
    requested: &[usize],
    _comm: &C,
) -> Result<Vec<T>, MeshSurgeryError>
where
    T: Clone,
    C: Communicator,
{
    if values.len() != distribution.local_len() {
        return Err(MeshSurgeryError::ExchangeMismatch(format!(
            "block holds {} values, distribution says {}",
            values.len(),
            distribution.local_len()
        )));
    }
    requested
        .iter()
        .map(|&id| {
            if id <= distribution.start || id > distribution.end {
                return Err(MeshSurgeryError::ExchangeMismatch(format!(
                    "id {id} outside local block ({}, {}]",
                    distribution.start, distribution.end
                )));
            }
            Ok(values[id - distribution.start - 1].clone())
        })
        .collect()
}

/// Sorted unique block-local positions (0-based) of the owned global ids.
pub fn part_to_block<C: Communicator>(
    distribution: &Distribution,
    owned_ids: &[usize],
    _comm: &C,
) -> Result<Vec<usize>, MeshSurgeryError> {
    owned_ids
        .iter()
        .copied()
        .sorted_unstable()
        .dedup()
        .map(|id| {
            if id <= distribution.start || id > distribution.end {
                return Err(MeshSurgeryError::ExchangeMismatch(format!(
                    "id {id} outside local block ({}, {}]",
                    distribution.start, distribution.end
                )));
            }
            Ok(id - distribution.start - 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::SelfComm;

    struct FakeRank(usize, usize);
    impl Communicator for FakeRank {
        fn rank(&self) -> usize {
            self.0
        }
        fn size(&self) -> usize {
            self.1
        }
        fn allreduce_sum(&self, local: usize) -> usize {
            local * self.1
        }
    }

    #[test]
    fn uniform_distribution_spreads_remainder_first() {
        assert_eq!(uniform_distribution(10, &SelfComm), Distribution::full(10));
        assert_eq!(uniform_distribution(10, &FakeRank(0, 3)), Distribution::new(0, 4, 10));
        assert_eq!(uniform_distribution(10, &FakeRank(1, 3)), Distribution::new(4, 7, 10));
        assert_eq!(uniform_distribution(10, &FakeRank(2, 3)), Distribution::new(7, 10, 10));
    }

    #[test]
    fn block_to_part_gathers_in_request_order() {
        let d = Distribution::full(4);
        let got = block_to_part(&[10.0, 20.0, 30.0, 40.0], &d, &[4, 1, 4], &SelfComm).unwrap();
        assert_eq!(got, vec![40.0, 10.0, 40.0]);
        assert!(block_to_part(&[1.0], &d, &[1], &SelfComm).is_err());
        assert!(block_to_part(&[1.0; 4], &d, &[5], &SelfComm).is_err());
    }

    #[test]
    fn part_to_block_sorts_and_dedups() {
        let d = Distribution::full(6);
        assert_eq!(part_to_block(&d, &[6, 2, 2, 3], &SelfComm).unwrap(), vec![1, 2, 5]);
        assert!(part_to_block(&d, &[0], &SelfComm).is_err());
    }
}
