use super::segment::Sentence;

pub const DAMPING: f64 = 0.85;
pub const EPSILON: f64 = 1e-4;
pub const MAX_ITERATIONS: usize = 100;

/// Square, symmetric sentence-similarity matrix with a zero diagonal.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    weights: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn build<F>(sentences: &[Sentence], similarity: F) -> Self
    where
        F: Fn(&Sentence, &Sentence) -> f64,
    {
        let n = sentences.len();
        let mut weights = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let w = similarity(&sentences[i], &sentences[j]).max(0.0);
                weights[i * n + j] = w;
                weights[j * n + i] = w;
            }
        }
        Self { n, weights }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[cfg(test)]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.n + j]
    }

    // Row-stochastic transition matrix, normalized in place. Rows without any
    // edge spread their mass uniformly so that no rank leaks out of the graph.
    fn into_transitions(self) -> Vec<f64> {
        let n = self.n;
        let uniform = 1.0 / n as f64;
        let mut weights = self.weights;
        for row in weights.chunks_exact_mut(n.max(1)) {
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                for w in row.iter_mut() {
                    *w /= total;
                }
            } else {
                row.fill(uniform);
            }
        }
        weights
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

pub fn rank<F>(sentences: &[Sentence], similarity: F) -> Ranking
where
    F: Fn(&Sentence, &Sentence) -> f64,
{
    rank_matrix(SimilarityMatrix::build(sentences, similarity))
}

/// Power iteration over the similarity graph:
/// `s'[i] = (1 - d) / n + d * sum_j t[j][i] * s[j]`, starting from `1 / n`,
/// until the L1 change drops below `EPSILON` or `MAX_ITERATIONS` is hit.
pub fn rank_matrix(matrix: SimilarityMatrix) -> Ranking {
    let n = matrix.len();
    if matrix.is_empty() {
        return Ranking {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let transitions = matrix.into_transitions();
    let teleport = (1.0 - DAMPING) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];

    for iteration in 1..=MAX_ITERATIONS {
        for (i, slot) in next.iter_mut().enumerate() {
            let mut incoming = 0.0;
            for j in 0..n {
                incoming += transitions[j * n + i] * scores[j];
            }
            *slot = teleport + DAMPING * incoming;
        }
        let delta: f64 = next
            .iter()
            .zip(&scores)
            .map(|(a, b)| (a - b).abs())
            .sum();
        std::mem::swap(&mut scores, &mut next);
        if delta < EPSILON {
            return Ranking {
                scores,
                iterations: iteration,
                converged: true,
            };
        }
    }

    Ranking {
        scores,
        iterations: MAX_ITERATIONS,
        converged: false,
    }
}
