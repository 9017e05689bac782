//! Dense travel-cost matrix.

/// Row-major n×n travel costs between visits.
///
/// Entries may be asymmetric. Built either from explicit data or from planar
/// points with Euclidean distances (handy for tests and small instances).
///
/// # Examples
///
/// ```
/// use u_tours::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert_eq!(dm.get(2, 0), 10.0);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    costs: Vec<f64>,
    n: usize,
}

impl DistanceMatrix {
    /// An all-zero matrix over `n` visits.
    pub fn new(n: usize) -> Self {
        Self::from_fn(n, |_, _| 0.0)
    }

    /// Fills a matrix by calling `cost(from, to)` for every ordered pair.
    ///
    /// The diagonal is left at zero.
    pub fn from_fn(n: usize, mut cost: impl FnMut(usize, usize) -> f64) -> Self {
        let costs = (0..n * n)
            .map(|cell| {
                let (from, to) = (cell / n, cell % n);
                if from == to {
                    0.0
                } else {
                    cost(from, to)
                }
            })
            .collect();
        Self { costs, n }
    }

    /// Euclidean distances between planar points.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self::from_fn(points.len(), |i, j| {
            let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
            dx.hypot(dy)
        })
    }

    /// Wraps precomputed row-major costs, typically from a routing engine.
    ///
    /// `None` unless `costs` holds exactly `n * n` entries.
    pub fn from_data(n: usize, costs: Vec<f64>) -> Option<Self> {
        (costs.len() == n * n).then_some(Self { costs, n })
    }

    /// Travel cost `from → to`.
    ///
    /// # Panics
    ///
    /// Panics if either id is `>= size()`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.row(from)[to]
    }

    /// Costs of leaving `from`, indexed by destination.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.costs[from * self.n..(from + 1) * self.n]
    }

    /// Overwrites the cost `from → to`.
    pub fn set(&mut self, from: usize, to: usize, cost: f64) {
        self.costs[from * self.n + to] = cost;
    }

    /// Number of visits covered.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Whether `get(a, b)` and `get(b, a)` agree within `tol` everywhere.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.n).all(|a| (a + 1..self.n).all(|b| (self.get(a, b) - self.get(b, a)).abs() <= tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]);
        assert_eq!(dm.size(), 3);
        assert!((dm.get(1, 0) - 5.0).abs() < 1e-10);
        assert!((dm.get(2, 0) - 8.0).abs() < 1e-10);
        assert_eq!(dm.get(1, 1), 0.0);
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_precomputed_costs() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 3.5, 9.0, 0.0]).expect("2x2");
        assert_eq!((dm.get(0, 1), dm.get(1, 0)), (3.5, 9.0));
        assert!(!dm.is_symmetric(1.0));
        assert!(dm.is_symmetric(6.0));
        assert_eq!(DistanceMatrix::from_data(3, vec![0.0; 8]), None);
    }

    #[test]
    fn test_from_fn_asymmetric() {
        let dm = DistanceMatrix::from_fn(3, |from, to| if from < to { 1.0 } else { 2.0 });
        assert_eq!(dm.row(1), &[2.0, 0.0, 1.0]);
        assert!(!dm.is_symmetric(0.5));
    }

    #[test]
    fn test_overwrite_one_direction() {
        let mut dm = DistanceMatrix::new(4);
        dm.set(3, 1, 7.25);
        assert_eq!(dm.get(3, 1), 7.25);
        assert_eq!(dm.get(1, 3), 0.0);
    }
}
