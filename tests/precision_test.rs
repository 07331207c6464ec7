use convcheck::config::{NormalParams, PrecisionConfig, SizeParams};
use convcheck::conv::{ConvAlgorithm, ConvMode};
use convcheck::metrics::{candidates, compare_precision, compare_precision_typed, DiscrepancyReport};
use convcheck::tensor::ElementType;
use convcheck::ConvError;
use ndarray::array;

fn small_config() -> PrecisionConfig {
    PrecisionConfig::default().with_sizes(SizeParams::new(24, 6)).with_seed(11)
}

#[test]
fn reports_one_entry_per_candidate() {
    for mode in ConvMode::ALL {
        for element in ElementType::ALL {
            let reports = compare_precision(mode, element, &small_config()).unwrap();
            let algos: Vec<_> = reports.iter().map(|r| r.algorithm).collect();
            assert_eq!(algos, candidates(mode).to_vec());
            for r in &reports {
                assert_eq!(r.mode, mode);
                assert_eq!(r.element, element);
            }
        }
    }
}

#[test]
fn candidates_exclude_reference() {
    for mode in ConvMode::ALL {
        assert_eq!(candidates(mode).len(), 2);
        assert!(!candidates(mode).contains(&ConvAlgorithm::Direct));
    }
}

#[test]
fn double_precision_discrepancy_is_rounding_noise() {
    for mode in ConvMode::ALL {
        let reports = compare_precision(mode, ElementType::Double, &small_config()).unwrap();
        for r in &reports {
            // outputs are in the thousands; f64 rounding stays far below 1e-6
            assert!(r.reference_mean.abs() > 1.0, "{r:?}");
            assert!(r.normalized_mean_diff < 1e-9, "{r:?}");
            assert!(r.diff_mean.abs() < 1e-6, "{r:?}");
            assert!(r.diff_stddev < 1e-6, "{r:?}");
            assert!((r.mean_abs_diff - (r.reference_mean - r.candidate_mean).abs()).abs() < 1e-12);
        }
    }
}

#[test]
fn single_precision_discrepancy_is_small() {
    for mode in ConvMode::ALL {
        let reports = compare_precision(mode, ElementType::Single, &small_config()).unwrap();
        for r in &reports {
            assert!(r.normalized_mean_diff < 1e-3, "{r:?}");
            assert!(r.diff_stddev < 1e-3 * r.reference_mean.abs().max(1.0) * 100.0, "{r:?}");
        }
    }
}

#[test]
fn comparison_is_reproducible_for_a_seed() {
    let a = compare_precision_typed::<f32>(ConvMode::Full, &small_config()).unwrap();
    let b = compare_precision_typed::<f32>(ConvMode::Full, &small_config()).unwrap();
    assert_eq!(a, b);

    let c = compare_precision_typed::<f32>(ConvMode::Full, &small_config().with_seed(12)).unwrap();
    assert_ne!(a[0].reference_mean, c[0].reference_mean);
}

#[test]
fn default_config_matches_reference_run() {
    let config = PrecisionConfig::default();
    assert_eq!(config.sizes, SizeParams::new(100, 25));
    assert_eq!(config.input, NormalParams::new(5.0, 1000.0));
    assert_eq!(config.kernel, NormalParams::new(10.0, 2000.0));
    assert!(config.validate().is_ok());
}

#[test]
fn valid_mode_with_oversized_kernel_fails() {
    let config = PrecisionConfig::default().with_sizes(SizeParams::new(4, 6));
    let res = compare_precision(ConvMode::Valid, ElementType::Double, &config);
    assert!(matches!(res, Err(ConvError::InvalidDimension(_))));

    // full mode has no such restriction
    assert!(compare_precision(ConvMode::Full, ElementType::Double, &config).is_ok());
}

#[test]
fn invalid_config_is_rejected() {
    let zero = PrecisionConfig::default().with_sizes(SizeParams::new(0, 3));
    assert!(matches!(
        compare_precision(ConvMode::Full, ElementType::Single, &zero),
        Err(ConvError::InvalidConfig(_))
    ));

    let negative = small_config().with_distributions(NormalParams::new(0.0, -2.0), NormalParams::default());
    assert!(matches!(
        compare_precision(ConvMode::Valid, ElementType::Single, &negative),
        Err(ConvError::InvalidConfig(_))
    ));
}

#[test]
fn measure_detects_bias() {
    let reference = array![[1.0f64, 2.0], [3.0, 4.0]];
    let shifted = reference.mapv(|v| v + 0.5);
    let r = DiscrepancyReport::measure(ConvAlgorithm::Gemm, ConvMode::Valid, reference.view(), shifted.view()).unwrap();

    assert_eq!(r.reference_mean, 2.5);
    assert_eq!(r.candidate_mean, 3.0);
    assert_eq!(r.mean_abs_diff, 0.5);
    assert_eq!(r.normalized_mean_diff, 0.2);
    assert_eq!(r.diff_mean, 0.5);
    assert_eq!(r.diff_stddev, 0.0);
    assert_eq!(r.element, ElementType::Double);
}

#[test]
fn measure_detects_noise_without_bias() {
    let reference = array![[1.0f32, 1.0], [1.0, 1.0]];
    let noisy = array![[1.5f32, 0.5], [1.5, 0.5]];
    let r = DiscrepancyReport::measure(ConvAlgorithm::Fft, ConvMode::Full, reference.view(), noisy.view()).unwrap();

    assert_eq!(r.diff_mean, 0.0);
    assert_eq!(r.diff_stddev, 0.5);
    assert_eq!(r.mean_abs_diff, 0.0);
    assert_eq!(r.element, ElementType::Single);
}

#[test]
fn measure_zero_reference_mean_is_not_an_error() {
    let reference = array![[1.0f64, -1.0]];
    let candidate = array![[1.0f64, -0.5]];
    let r = DiscrepancyReport::measure(ConvAlgorithm::Gemm, ConvMode::Valid, reference.view(), candidate.view()).unwrap();
    assert!(r.normalized_mean_diff.is_infinite());
}

#[test]
fn measure_rejects_shape_mismatch() {
    let a = array![[1.0f64, 2.0]];
    let b = array![[1.0f64], [2.0]];
    let res = DiscrepancyReport::measure(ConvAlgorithm::Fft, ConvMode::Full, a.view(), b.view());
    assert!(matches!(res, Err(ConvError::InvalidDimension(_))));
}
