//! Principal component analysis over the standardized feature matrix
//!
//! Components are the eigenvectors of the sample covariance matrix, ordered by
//! decreasing eigenvalue. Each component's sign is fixed so that its
//! largest-magnitude weight is positive, which makes the loadings and the
//! top-feature ranking reproducible across runs.

use faer::{Mat, Side};
use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, Result, Stage};
use super::scaler::StandardizedMatrix;
use super::schema::component_name;

/// Number of features listed per component in the report
pub const TOP_FEATURES: usize = 3;

/// A feature and its weight in one component
#[derive(Debug, Clone, Serialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

/// One principal component
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalComponent {
    pub name: String,
    /// Weight per input feature, in input column order
    pub loadings: Vec<f64>,
    pub explained_variance: f64,
    pub explained_variance_ratio: f64,
    /// Highest signed weights first
    pub top_features: Vec<FeatureWeight>,
}

/// Fitted PCA model
#[derive(Debug, Clone, Serialize)]
pub struct PcaResult {
    pub features: Vec<String>,
    pub components: Vec<PrincipalComponent>,
}

impl PcaResult {
    /// Sum of the retained components' explained-variance ratios
    pub fn total_explained_variance_ratio(&self) -> f64 {
        self.components.iter().map(|c| c.explained_variance_ratio).sum()
    }
}

/// Fit `n_components` principal components to a standardized matrix
pub fn fit_pca(matrix: &StandardizedMatrix, n_components: usize) -> Result<PcaResult> {
    let n_rows = matrix.nrows();
    let n_features = matrix.ncols();

    if n_components == 0 || n_components > n_features {
        return Err(PipelineError::configuration(format!(
            "n_components must be between 1 and {}, got {}",
            n_features, n_components
        )));
    }
    if n_rows < 2 {
        return Err(PipelineError::computation(
            Stage::DimensionalityReducer,
            matrix.columns.join(", "),
            None,
            format!("PCA needs at least 2 rows, got {}", n_rows),
        ));
    }

    let z = &matrix.data;
    let gram = z.transpose() * z;
    let denom = (n_rows - 1) as f64;
    let cov = Mat::<f64>::from_fn(n_features, n_features, |i, j| gram[(i, j)] / denom);

    let total_variance: f64 = (0..n_features).map(|i| cov[(i, i)]).sum();
    if !total_variance.is_finite() || total_variance <= 0.0 {
        return Err(PipelineError::computation(
            Stage::DimensionalityReducer,
            matrix.columns.join(", "),
            None,
            "total variance is zero",
        ));
    }

    let eigen = cov.as_ref().selfadjoint_eigendecomposition(Side::Lower);
    let vectors: Mat<f64> = eigen.u().to_owned();

    // Eigenvalue of each eigenvector as v' C v
    let mut pairs: Vec<(f64, Vec<f64>)> = (0..vectors.ncols())
        .map(|k| {
            let v: Vec<f64> = (0..n_features).map(|i| vectors[(i, k)]).collect();
            let lambda = quadratic_form(&cov, &v);
            (lambda, v)
        })
        .collect();
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let components = pairs
        .into_iter()
        .take(n_components)
        .enumerate()
        .map(|(k, (lambda, mut loadings))| {
            normalize_sign(&mut loadings);
            let explained_variance = lambda.max(0.0);
            PrincipalComponent {
                name: component_name(k),
                top_features: top_features(&matrix.columns, &loadings, TOP_FEATURES),
                loadings,
                explained_variance,
                explained_variance_ratio: explained_variance / total_variance,
            }
        })
        .collect();

    Ok(PcaResult {
        features: matrix.columns.clone(),
        components,
    })
}

fn quadratic_form(m: &Mat<f64>, v: &[f64]) -> f64 {
    let n = v.len();
    let mut acc = 0.0;
    for i in 0..n {
        for j in 0..n {
            acc += v[i] * m[(i, j)] * v[j];
        }
    }
    acc
}

/// Flip the vector so its largest-magnitude entry is positive
pub fn normalize_sign(loadings: &mut [f64]) {
    let pivot = loadings
        .iter()
        .copied()
        .fold(0.0f64, |best, w| if w.abs() > best.abs() { w } else { best });
    if pivot < 0.0 {
        for w in loadings.iter_mut() {
            *w = -*w;
        }
    }
}

/// Features ranked by descending signed weight
pub fn top_features(features: &[String], loadings: &[f64], n: usize) -> Vec<FeatureWeight> {
    let mut ranked: Vec<FeatureWeight> = features
        .iter()
        .zip(loadings)
        .map(|(f, &w)| FeatureWeight {
            feature: f.clone(),
            weight: w,
        })
        .collect();
    ranked.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Project the standardized rows onto the fitted components (rows x components)
pub fn project(matrix: &StandardizedMatrix, pca: &PcaResult) -> Vec<Vec<f64>> {
    pca.components
        .iter()
        .map(|component| {
            (0..matrix.nrows())
                .map(|i| {
                    component
                        .loadings
                        .iter()
                        .enumerate()
                        .map(|(j, w)| matrix.data[(i, j)] * w)
                        .sum()
                })
                .collect()
        })
        .collect()
}

/// Append the projected scores to `df` as `PC1..PCn`
pub fn append_components(
    df: &mut DataFrame,
    matrix: &StandardizedMatrix,
    pca: &PcaResult,
) -> Result<()> {
    for (component, scores) in pca.components.iter().zip(project(matrix, pca)) {
        df.with_column(Column::new(component.name.as_str().into(), scores))?;
    }
    Ok(())
}
