//! Bounded local search over package assignments.
//!
//! Each sweep applies the first improving relocate or swap it finds. A move
//! improves when it lowers the residual volume summed over occupied packages
//! (only possible by emptying one), or keeps it equal while raising the sum of
//! squared package volumes. The second criterion concentrates load so later
//! sweeps can drain the emptiest packages. [`LocalImprover::emptying_only`]
//! drops that criterion for layouts that spread load on purpose.

use crate::package::{Capacity, Package};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImproveStats {
    pub sweeps: usize,
    pub relocations: usize,
    pub swaps: usize,
    pub packages_removed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Relocate { from: usize, idx: usize, to: usize },
    Swap { a: usize, ai: usize, b: usize, bi: usize },
}

pub struct LocalImprover {
    capacity: Capacity,
    max_iterations: usize,
    concentrate: bool,
}

impl LocalImprover {
    pub fn new(capacity: Capacity, max_iterations: usize) -> Self {
        Self {
            capacity,
            max_iterations,
            concentrate: true,
        }
    }

    /// Only take moves that empty a package, leaving the load spread of the
    /// remaining packages as the packer left it.
    pub fn emptying_only(mut self) -> Self {
        self.concentrate = false;
        self
    }

    pub fn improve(&self, packages: &mut Vec<Package>) -> ImproveStats {
        let mut stats = ImproveStats::default();
        while stats.sweeps < self.max_iterations {
            stats.sweeps += 1;
            let Some(mv) = self.find_relocate(packages).or_else(|| self.find_swap(packages)) else {
                break;
            };
            self.apply(packages, mv, &mut stats);
        }
        tracing::debug!(
            sweeps = stats.sweeps,
            relocations = stats.relocations,
            swaps = stats.swaps,
            removed = stats.packages_removed,
            "local improvement finished"
        );
        stats
    }

    fn tolerance(&self) -> f64 {
        1e-9 * self.capacity.volume * self.capacity.volume
    }

    fn find_relocate(&self, packages: &[Package]) -> Option<Move> {
        // Drain from the newest packages, which tend to be the emptiest.
        for from in (0..packages.len()).rev() {
            let source = &packages[from];
            for (idx, chunk) in source.chunks().iter().enumerate() {
                let moved = chunk.total_volume();
                for (to, target) in packages.iter().enumerate() {
                    if to == from || !target.can_accept(chunk, &self.capacity) {
                        continue;
                    }
                    if source.len() == 1 {
                        return Some(Move::Relocate { from, idx, to });
                    }
                    if !self.concentrate {
                        continue;
                    }
                    let (va, vb) = (source.total_volume(), target.total_volume());
                    let gain = (vb + moved).powi(2) + (va - moved).powi(2) - va * va - vb * vb;
                    if gain > self.tolerance() {
                        return Some(Move::Relocate { from, idx, to });
                    }
                }
            }
        }
        None
    }

    fn find_swap(&self, packages: &[Package]) -> Option<Move> {
        if !self.concentrate {
            return None;
        }
        for a in 0..packages.len() {
            for b in (a + 1)..packages.len() {
                let (pa, pb) = (&packages[a], &packages[b]);
                let (va, vb) = (pa.total_volume(), pb.total_volume());
                for (ai, x) in pa.chunks().iter().enumerate() {
                    for (bi, y) in pb.chunks().iter().enumerate() {
                        let d = y.total_volume() - x.total_volume();
                        let gain = (va + d).powi(2) + (vb - d).powi(2) - va * va - vb * vb;
                        if gain <= self.tolerance() {
                            continue;
                        }
                        if pa.can_exchange(ai, y, &self.capacity)
                            && pb.can_exchange(bi, x, &self.capacity)
                        {
                            return Some(Move::Swap { a, ai, b, bi });
                        }
                    }
                }
            }
        }
        None
    }

    fn apply(&self, packages: &mut Vec<Package>, mv: Move, stats: &mut ImproveStats) {
        match mv {
            Move::Relocate { from, idx, to } => {
                let chunk = packages[from].remove(idx);
                tracing::debug!(chunk = %chunk, from, to, "relocated chunk");
                packages[to].insert(chunk);
                stats.relocations += 1;
                if packages[from].is_empty() {
                    packages.remove(from);
                    stats.packages_removed += 1;
                }
            }
            Move::Swap { a, ai, b, bi } => {
                let x = packages[a].chunks()[ai].clone();
                let y = packages[b].exchange(bi, x);
                let x = packages[a].exchange(ai, y);
                tracing::debug!(chunk = %x, a, b, "swapped chunks");
                stats.swaps += 1;
            }
        }
    }
}

/// Residual volume summed over the given packages.
pub fn total_residual(packages: &[Package], capacity: &Capacity) -> f64 {
    packages.iter().map(|p| p.residual_volume(capacity)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn chunk(item_type: &str, count: u64, unit_volume: f64) -> Chunk {
        Chunk {
            item_type: item_type.to_string(),
            count,
            unit_volume,
            unit_value: 1.0,
        }
    }

    fn package(chunks: &[Chunk]) -> Package {
        let mut p = Package::new();
        for c in chunks {
            p.insert(c.clone());
        }
        p
    }

    fn cap(volume: f64) -> Capacity {
        Capacity {
            volume,
            value: None,
        }
    }

    fn totals(packages: &[Package]) -> (usize, f64, f64) {
        (
            packages.iter().map(Package::len).sum(),
            packages.iter().map(Package::total_volume).sum(),
            packages.iter().map(Package::total_value).sum(),
        )
    }

    #[test]
    fn test_relocate_empties_package() {
        let mut packages = vec![
            package(&[chunk("A", 1, 60.0)]),
            package(&[chunk("B", 1, 30.0)]),
        ];
        let stats = LocalImprover::new(cap(100.0), 10).improve(&mut packages);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].total_volume(), 90.0);
        assert_eq!(stats.packages_removed, 1);
        assert_eq!(stats.relocations, 1);
    }

    #[test]
    fn test_drains_package_over_several_moves() {
        // Total 100 fits one package, but no single chunk can empty either one.
        let mut packages = vec![
            package(&[chunk("A", 1, 40.0), chunk("B", 1, 20.0)]),
            package(&[chunk("C", 1, 25.0), chunk("D", 1, 15.0)]),
        ];
        let before = totals(&packages);
        LocalImprover::new(cap(100.0), 20).improve(&mut packages);
        assert_eq!(packages.len(), 1);
        assert_eq!(totals(&packages), before);
    }

    #[test]
    fn test_swap_respects_capacity() {
        let c = cap(100.0);
        let mut packages = vec![
            package(&[chunk("A", 1, 50.0), chunk("B", 1, 45.0)]),
            package(&[chunk("C", 1, 50.0), chunk("D", 1, 40.0)]),
        ];
        let before = totals(&packages);
        LocalImprover::new(c, 20).improve(&mut packages);
        assert_eq!(totals(&packages), before);
        for p in &packages {
            assert!(p.total_volume() <= 100.0);
        }
    }

    #[test]
    fn test_swap_concentrates_load() {
        let c = cap(100.0);
        // 90 and 80; no relocation fits, swapping A for D gives 75 and 95.
        let mut packages = vec![
            package(&[chunk("A", 1, 50.0), chunk("B", 1, 40.0)]),
            package(&[chunk("C", 1, 45.0), chunk("D", 1, 35.0)]),
        ];
        let stats = LocalImprover::new(c, 1).improve(&mut packages);
        assert_eq!(stats.swaps, 1);
        assert_eq!(packages[0].total_volume(), 75.0);
        assert_eq!(packages[1].total_volume(), 95.0);
        assert_eq!(packages[1].chunks()[1].item_type, "A");
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let mut packages = vec![
            package(&[chunk("A", 1, 60.0)]),
            package(&[chunk("B", 1, 30.0)]),
        ];
        let stats = LocalImprover::new(cap(100.0), 0).improve(&mut packages);
        assert_eq!(packages.len(), 2);
        assert_eq!(stats, ImproveStats::default());
    }

    #[test]
    fn test_residual_never_increases() {
        let c = cap(100.0);
        let mut packages = vec![
            package(&[chunk("A", 1, 70.0)]),
            package(&[chunk("B", 1, 55.0), chunk("C", 1, 10.0)]),
            package(&[chunk("D", 1, 20.0), chunk("E", 1, 5.0)]),
            package(&[chunk("F", 1, 15.0)]),
        ];
        let before_totals = totals(&packages);
        let before = total_residual(&packages, &c);
        LocalImprover::new(c, 50).improve(&mut packages);
        assert!(total_residual(&packages, &c) <= before);
        assert_eq!(totals(&packages), before_totals);
        assert!(packages.iter().all(|p| !p.is_empty() && p.total_volume() <= 100.0));
    }

    #[test]
    fn test_emptying_only_keeps_spread() {
        let mut packages = vec![
            package(&[chunk("A", 1, 40.0), chunk("B", 1, 20.0)]),
            package(&[chunk("C", 1, 25.0), chunk("D", 1, 15.0)]),
            package(&[chunk("E", 1, 30.0)]),
        ];
        let stats = LocalImprover::new(cap(100.0), 20)
            .emptying_only()
            .improve(&mut packages);
        assert_eq!(stats.swaps, 0);
        assert_eq!(stats.relocations, 1);
        assert_eq!(packages.len(), 2);
        // E went to the first package with room; nothing else moved
        assert_eq!(packages[0].total_volume(), 90.0);
        assert_eq!(packages[1].total_volume(), 40.0);
    }

    #[test]
    fn test_stops_when_no_move_improves() {
        let mut packages = vec![
            package(&[chunk("A", 1, 100.0)]),
            package(&[chunk("B", 1, 100.0)]),
        ];
        let stats = LocalImprover::new(cap(100.0), 10).improve(&mut packages);
        assert_eq!(stats.sweeps, 1);
        assert_eq!(stats.relocations + stats.swaps, 0);
    }
}
