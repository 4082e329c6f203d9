//! Derivative-free minimisation
//!
//! Box-bounded Nelder–Mead simplex search, used for conditional sum of
//! squares estimation where no gradient is available.

/// Configuration for [`nelder_mead`]
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Relative tolerance on the spread of objective values in the simplex
    pub tolerance: f64,
    /// Step used to build the initial simplex
    pub initial_step: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-10,
            initial_step: 0.1,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
        }
    }
}

/// Outcome of a minimisation run
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found
    pub optimal_point: Vec<f64>,
    /// Objective value at the best point
    pub optimal_value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerance was reached before `max_iter`
    pub converged: bool,
}

/// Minimise `objective` starting from `initial`.
///
/// When `bounds` is given every candidate point is clamped into the box
/// before evaluation.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: Vec::new(),
            optimal_value: objective(&[]),
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(apply_bounds(initial, bounds));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(apply_bounds(&vertex, bounds));
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| sanitize(objective(v))).collect();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        let spread = values[worst] - values[best];
        if spread <= config.tolerance * (values[best].abs() + config.tolerance) {
            converged = true;
            break;
        }

        let centroid = centroid_without(&simplex, worst);

        let reflected = apply_bounds(&along(&centroid, &simplex[worst], -config.alpha), bounds);
        let reflected_value = sanitize(objective(&reflected));

        if reflected_value < values[best] {
            let expanded =
                apply_bounds(&along(&centroid, &simplex[worst], -config.gamma), bounds);
            let expanded_value = sanitize(objective(&expanded));
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let contracted = apply_bounds(&along(&centroid, &simplex[worst], config.rho), bounds);
        let contracted_value = sanitize(objective(&contracted));
        if contracted_value < values[worst] {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            let shrunk: Vec<f64> = anchor
                .iter()
                .zip(&simplex[i])
                .map(|(b, x)| b + config.sigma * (x - b))
                .collect();
            simplex[i] = apply_bounds(&shrunk, bounds);
            values[i] = sanitize(objective(&simplex[i]));
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}

/// Point `centroid + t * (vertex - centroid)`
fn along(centroid: &[f64], vertex: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(vertex)
        .map(|(c, v)| c + t * (v - c))
        .collect()
}

fn centroid_without(simplex: &[Vec<f64>], excluded: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let mut centroid = vec![0.0; dim];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == excluded {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vertex) {
            *c += v;
        }
    }
    let count = (simplex.len() - 1) as f64;
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

fn apply_bounds(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        Some(bounds) => point
            .iter()
            .zip(bounds)
            .map(|(&x, &(lo, hi))| x.clamp(lo, hi))
            .collect(),
        None => point.to_vec(),
    }
}

/// NaN objectives rank last
fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_minimum() {
        let result = nelder_mead(
            |x| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2),
            &[0.0, 0.0],
            None,
            NelderMeadConfig::default(),
        );

        assert_abs_diff_eq!(result.optimal_point[0], 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.optimal_point[1], -1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rosenbrock() {
        let config = NelderMeadConfig {
            max_iter: 5000,
            tolerance: 1e-14,
            ..Default::default()
        };
        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
            &[-1.2, 1.0],
            None,
            config,
        );

        assert_abs_diff_eq!(result.optimal_point[0], 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(result.optimal_point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_bounds_are_respected() {
        let bounds = [(-0.5, 0.5)];
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2),
            &[0.0],
            Some(&bounds),
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_point[0] <= 0.5);
        assert_abs_diff_eq!(result.optimal_point[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_problem() {
        let result = nelder_mead(|_| 4.0, &[], None, NelderMeadConfig::default());
        assert!(result.optimal_point.is_empty());
        assert_eq!(result.optimal_value, 4.0);
    }
}
