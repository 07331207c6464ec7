use ndarray::{ArrayView2, Zip};
use tracing::debug;

use crate::config::PrecisionConfig;
use crate::conv::{conv2d, ConvAlgorithm, ConvMode};
use crate::error::{ConvError, Result};
use crate::tensor::{mean, random_normal, seeded_rng, stddev, Element, ElementType, Matrix};

/// How far one candidate algorithm drifts from the direct reference.
///
/// A large `diff_mean` relative to `diff_stddev` points at a systematic bias
/// (flip or indexing bug); small values of both are rounding noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscrepancyReport {
    pub algorithm: ConvAlgorithm,
    pub element: ElementType,
    pub mode: ConvMode,
    /// `mean(reference)`
    pub reference_mean: f64,
    /// `mean(candidate)`
    pub candidate_mean: f64,
    /// `|mean(reference) - mean(candidate)|`
    pub mean_abs_diff: f64,
    /// `mean_abs_diff / |mean(reference)|`
    pub normalized_mean_diff: f64,
    /// `mean(candidate - reference)`
    pub diff_mean: f64,
    /// `stddev(candidate - reference)`
    pub diff_stddev: f64,
}

impl DiscrepancyReport {
    /// Compare `candidate` against `reference`; both must have the same shape.
    pub fn measure<T: Element>(
        algorithm: ConvAlgorithm,
        mode: ConvMode,
        reference: ArrayView2<'_, T>,
        candidate: ArrayView2<'_, T>,
    ) -> Result<Self> {
        if reference.dim() != candidate.dim() {
            return Err(ConvError::dimension(format!(
                "{algorithm} output is {:?}, reference is {:?}",
                candidate.dim(),
                reference.dim()
            )));
        }

        let reference_mean = mean(&reference);
        let candidate_mean = mean(&candidate);
        let mean_abs_diff = (reference_mean - candidate_mean).abs();

        let diff = Zip::from(&candidate)
            .and(&reference)
            .map_collect(|&c, &r| c.widen() - r.widen());
        let diff_mean = mean(&diff);
        let diff_stddev = stddev(&diff);

        Ok(DiscrepancyReport {
            algorithm,
            element: T::TYPE,
            mode,
            reference_mean,
            candidate_mean,
            mean_abs_diff,
            normalized_mean_diff: mean_abs_diff / reference_mean.abs(),
            diff_mean,
            diff_stddev,
        })
    }
}

/// Algorithms checked against the reference in each mode.
pub fn candidates(mode: ConvMode) -> &'static [ConvAlgorithm] {
    match mode {
        ConvMode::Valid => &[ConvAlgorithm::Gemm, ConvAlgorithm::Fft],
        ConvMode::Full => &[ConvAlgorithm::Fft, ConvAlgorithm::Gemm],
    }
}

/// Run the reference and every candidate once on the same random data and
/// report each candidate's discrepancy.
pub fn compare_precision(
    mode: ConvMode,
    element: ElementType,
    config: &PrecisionConfig,
) -> Result<Vec<DiscrepancyReport>> {
    match element {
        ElementType::Single => compare_precision_typed::<f32>(mode, config),
        ElementType::Double => compare_precision_typed::<f64>(mode, config),
    }
}

pub fn compare_precision_typed<T: Element>(mode: ConvMode, config: &PrecisionConfig) -> Result<Vec<DiscrepancyReport>> {
    config.validate()?;
    let n = config.sizes.input;
    let k = config.sizes.kernel;

    let mut rng = seeded_rng(config.seed);
    let input: Matrix<T> = random_normal(n, n, &config.input, &mut rng)?;
    let kernel: Matrix<T> = random_normal(k, k, &config.kernel, &mut rng)?;

    let reference = conv2d(ConvAlgorithm::Direct, mode, input.view(), kernel.view())?;

    candidates(mode)
        .iter()
        .map(|&algorithm| {
            let candidate = conv2d(algorithm, mode, input.view(), kernel.view())?;
            let report = DiscrepancyReport::measure(algorithm, mode, reference.view(), candidate.view())?;
            debug!(
                %algorithm,
                %mode,
                element = %T::TYPE,
                diff_mean = report.diff_mean,
                diff_stddev = report.diff_stddev,
                "precision comparison"
            );
            Ok(report)
        })
        .collect()
}

/// Print reports to stdout, grouped by element type and mode.
pub fn print_report(reports: &[DiscrepancyReport]) {
    let mut last: Option<(ElementType, ConvMode)> = None;
    for r in reports {
        if last != Some((r.element, r.mode)) {
            let title = match r.element {
                ElementType::Single => "Single",
                ElementType::Double => "Double",
            };
            let mode = match r.mode {
                ConvMode::Valid => "Valid",
                ConvMode::Full => "Full",
            };
            println!("\n{} precision benchmark {}", title, mode);
            println!("Reference Average: {}", r.reference_mean);
            last = Some((r.element, r.mode));
        }

        let name = r.algorithm;
        println!("{} Average: {}", name, r.candidate_mean);
        println!("{} Average Difference: {}", name, r.mean_abs_diff);
        println!("{} Normalized Average Difference: {}", name, r.normalized_mean_diff);
        println!("{} Difference Average: {}", name, r.diff_mean);
        println!("{} Difference Standard Deviation: {}", name, r.diff_stddev);
    }
}
