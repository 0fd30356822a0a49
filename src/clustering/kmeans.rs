//! Seeded k-means with k-means++ initialization.
//!
//! Lloyd iterations run until the total squared centroid shift falls to the
//! tolerance (scaled by the mean per-feature variance of the data) or the
//! iteration cap is hit. Several independently seeded runs are made and the
//! one with the lowest inertia wins. All randomness comes from one
//! `ChaCha8Rng` seeded from [`KMeans::seed`], so identical input gives
//! identical labels.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub seed: u64,
    /// Number of initializations; the best by inertia is kept.
    pub n_init: usize,
    pub max_iterations: usize,
    /// Relative convergence tolerance.
    pub tolerance: f64,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster id per input point, in `[0, k)`.
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            n_init: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }

    /// Partition `points` into `self.k` clusters.
    ///
    /// The caller guarantees `1 <= k` and that there are at least `k`
    /// distinct points; otherwise some clusters may come out empty.
    #[instrument(level = "debug", skip_all, fields(k = self.k, n = points.len()))]
    pub fn fit(&self, points: &[Vec<f64>]) -> KMeansFit {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let threshold = self.tolerance * mean_variance(points);

        let mut best: Option<KMeansFit> = None;
        for run in 0..self.n_init.max(1) {
            let fit = self.lloyd(points, self.kmeans_plus_plus_init(points, &mut rng), threshold);
            debug!(run, inertia = fit.inertia, iterations = fit.iterations, "k-means run");
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.unwrap_or_else(|| KMeansFit {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
            iterations: 0,
        })
    }

    /// Pick initial centroids, each new one sampled with probability
    /// proportional to its squared distance from the nearest chosen centroid.
    fn kmeans_plus_plus_init(&self, points: &[Vec<f64>], rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
        let n = points.len();
        let mut centroids = Vec::with_capacity(self.k);

        let first = rng.random_range(0..n);
        centroids.push(points[first].clone());
        let mut closest: Vec<f64> = points.iter().map(|p| sq_dist(p, &points[first])).collect();

        while centroids.len() < self.k {
            let total: f64 = closest.iter().sum();
            let chosen = if total > 0.0 {
                let r = rng.random::<f64>() * total;
                let mut cumsum = 0.0;
                let mut chosen = None;
                for (i, &d) in closest.iter().enumerate() {
                    cumsum += d;
                    if d > 0.0 && cumsum >= r {
                        chosen = Some(i);
                        break;
                    }
                }
                // Rounding can leave r just above the final cumsum.
                chosen.unwrap_or_else(|| closest.iter().rposition(|&d| d > 0.0).unwrap_or(0))
            } else {
                rng.random_range(0..n)
            };

            centroids.push(points[chosen].clone());
            for (c, p) in closest.iter_mut().zip(points) {
                *c = c.min(sq_dist(p, &points[chosen]));
            }
        }

        centroids
    }

    fn lloyd(&self, points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, threshold: f64) -> KMeansFit {
        let k = centroids.len();
        let dims = points.first().map_or(0, Vec::len);
        let mut labels = vec![0usize; points.len()];
        let mut distances = vec![0.0; points.len()];
        let mut iterations = 0;

        for _ in 0..self.max_iterations {
            iterations += 1;
            assign(points, &centroids, &mut labels, &mut distances);

            let mut counts = vec![0usize; k];
            for &l in &labels {
                counts[l] += 1;
            }
            relocate_empty(&mut labels, &mut distances, &mut counts);

            let mut updated = vec![vec![0.0; dims]; k];
            for (p, &l) in points.iter().zip(&labels) {
                for (u, v) in updated[l].iter_mut().zip(p) {
                    *u += v;
                }
            }
            for (c, &count) in updated.iter_mut().zip(&counts) {
                if count > 0 {
                    for v in c.iter_mut() {
                        *v /= count as f64;
                    }
                }
            }

            let shift: f64 = centroids.iter().zip(&updated).map(|(a, b)| sq_dist(a, b)).sum();
            centroids = updated;
            if shift <= threshold {
                break;
            }
        }

        assign(points, &centroids, &mut labels, &mut distances);
        KMeansFit {
            labels,
            centroids,
            inertia: distances.iter().sum(),
            iterations,
        }
    }
}

/// Label each point with its nearest centroid; ties go to the lower id.
fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize], distances: &mut [f64]) {
    for (i, p) in points.iter().enumerate() {
        let mut best = (0, f64::INFINITY);
        for (j, c) in centroids.iter().enumerate() {
            let d = sq_dist(p, c);
            if d < best.1 {
                best = (j, d);
            }
        }
        labels[i] = best.0;
        distances[i] = best.1;
    }
}

/// Give every empty cluster the point farthest from its current centroid,
/// taken from a cluster that can spare one.
fn relocate_empty(labels: &mut [usize], distances: &mut [f64], counts: &mut [usize]) {
    for empty in 0..counts.len() {
        if counts[empty] > 0 {
            continue;
        }
        let donor = (0..labels.len())
            .filter(|&i| counts[labels[i]] > 1)
            .max_by(|&a, &b| distances[a].total_cmp(&distances[b]));
        if let Some(i) = donor {
            counts[labels[i]] -= 1;
            counts[empty] += 1;
            labels[i] = empty;
            distances[i] = 0.0;
        }
    }
}

fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Mean over features of the per-feature variance.
fn mean_variance(points: &[Vec<f64>]) -> f64 {
    let dims = points.first().map_or(0, Vec::len);
    if points.is_empty() || dims == 0 {
        return 0.0;
    }
    let n = points.len() as f64;
    let total: f64 = (0..dims)
        .map(|j| {
            let mean = points.iter().map(|p| p[j]).sum::<f64>() / n;
            points.iter().map(|p| (p[j] - mean).powi(2)).sum::<f64>() / n
        })
        .sum();
    total / dims as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ]
    }

    #[test]
    fn test_separates_two_blobs() {
        let fit = KMeans::new(2, 42).fit(&blobs());
        let l = &fit.labels;
        assert_eq!(l[0], l[1]);
        assert_eq!(l[1], l[2]);
        assert_eq!(l[3], l[4]);
        assert_eq!(l[4], l[5]);
        assert_ne!(l[0], l[3]);
        assert!(fit.inertia < 0.1);
    }

    #[test]
    fn test_same_seed_same_labels() {
        let points = vec![
            vec![0.3, 0.7, 0.0],
            vec![0.9, 0.1, 0.2],
            vec![0.2, 0.2, 0.9],
            vec![0.5, 0.5, 0.5],
            vec![0.8, 0.3, 0.1],
        ];
        let a = KMeans::new(3, 42).fit(&points);
        let b = KMeans::new(3, 42).fit(&points);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn test_single_cluster() {
        let fit = KMeans::new(1, 42).fit(&blobs());
        assert!(fit.labels.iter().all(|&l| l == 0));
        assert_eq!(fit.centroids.len(), 1);
    }

    #[test]
    fn test_k_equals_distinct_points_gives_singletons() {
        let points = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let fit = KMeans::new(2, 7).fit(&points);
        assert_eq!(fit.labels[0], fit.labels[2]);
        assert_ne!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_zero_dimensional_points() {
        let points = vec![Vec::new(), Vec::new()];
        let fit = KMeans::new(1, 42).fit(&points);
        assert_eq!(fit.labels, vec![0, 0]);
    }

    #[test]
    fn test_labels_in_range() {
        let fit = KMeans::new(4, 1).fit(&blobs());
        assert!(fit.labels.iter().all(|&l| l < 4));
    }

    #[test]
    fn test_relocate_empty_moves_farthest_point() {
        let mut labels = vec![0, 0, 0];
        let mut distances = vec![0.1, 0.9, 0.2];
        let mut counts = vec![3, 0];
        relocate_empty(&mut labels, &mut distances, &mut counts);
        assert_eq!(labels, vec![0, 1, 0]);
        assert_eq!(counts, vec![2, 1]);
    }
}
