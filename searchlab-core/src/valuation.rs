//! Node ranking for weighted best-first search

/// f = g + weight * h
///
/// A weight of 0 ranks by path cost alone, even when h is infinite.
pub fn fval(gval: f64, hval: f64, weight: f64) -> f64 {
    if weight == 0.0 {
        gval
    } else {
        gval + weight * hval
    }
}

/// Weighted combination of accumulated cost and heuristic estimate.
/// Weight 1 is plain A*; larger weights lean towards greedy search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeValuation {
    pub weight: f64,
}

impl NodeValuation {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub fn fval(&self, gval: f64, hval: f64) -> f64 {
        fval(gval, hval, self.weight)
    }
}

impl Default for NodeValuation {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}
