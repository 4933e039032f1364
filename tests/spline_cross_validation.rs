use ndarray::{Array1, ArrayD};
use piecewise_poly::{BSpline, OutOfBounds, PPoly};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_quintic(rng: &mut StdRng) -> BSpline {
    let mut x: Vec<f64> = (0..11).map(|_| rng.gen::<f64>()).collect();
    x.push(0.0);
    x.push(1.0);
    x.sort_by(f64::total_cmp);
    let x = Array1::from(x);
    let y = Array1::from_shape_fn(x.len(), |_| rng.gen::<f64>());
    BSpline::interpolate(&x, &y, 5).unwrap()
}

fn assert_close(actual: &ArrayD<f64>, expected: &ArrayD<f64>, rtol: f64) {
    assert_eq!(actual.shape(), expected.shape());
    let scale = expected.iter().fold(1.0f64, |m, v| m.max(v.abs()));
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(
            (a - e).abs() <= rtol * (e.abs() + scale),
            "{} != {} (rtol {})",
            a,
            e,
            rtol
        );
    }
}

#[test]
fn from_spline_matches_spline_derivatives() {
    let mut rng = StdRng::seed_from_u64(1234);
    let spline = random_quintic(&mut rng);
    let table = PPoly::from_spline(&spline, f64::NAN).unwrap();
    assert_eq!(5, table.order());

    let xi = Array1::linspace(0.0, 1.0, 200);
    for nu in 0..10 {
        let expected = spline.evaluate(&xi, nu).unwrap();
        let actual = table.evaluate(&xi, nu).unwrap();
        assert_close(&actual, &expected, 1e-7);
    }
}

#[test]
fn antiderivative_matches_spline_antiderivative() {
    let mut rng = StdRng::seed_from_u64(1234);
    let spline = random_quintic(&mut rng);
    let table = PPoly::from_spline(&spline, f64::NAN)
        .unwrap()
        .with_extrapolate(OutOfBounds::Extrapolate);

    let xi = Array1::linspace(0.0, 1.0, 200);
    for k in 0..10 {
        let expected = spline.antiderivative(k).evaluate(&xi, 0).unwrap();
        let actual = table.antiderivative(k).evaluate(&xi, 0).unwrap();
        assert_close(&actual, &expected, 1e-7);
    }
}

#[test]
fn from_tck_matches_from_spline() {
    let mut rng = StdRng::seed_from_u64(1234);
    let spline = random_quintic(&mut rng);
    let direct = PPoly::from_spline(&spline, 0.0).unwrap();
    let from_triple = PPoly::from_tck(
        spline.knots().clone(),
        spline.coefficients().clone(),
        spline.degree(),
        0.0,
    )
    .unwrap();

    assert_eq!(direct.breakpoints(), from_triple.breakpoints());
    assert_eq!(direct.coefficients(), from_triple.coefficients());
    assert_eq!(0.0, direct.evaluate_scalar(1.5, 0).unwrap());
}

#[test]
fn integral_of_spline() {
    let mut rng = StdRng::seed_from_u64(1234);
    let spline = random_quintic(&mut rng);
    let table = PPoly::from_spline(&spline, f64::NAN).unwrap();
    let primitive = spline.antiderivative(1);

    let integral = table.integrate(0.2, 0.9).unwrap();
    let ends = primitive.evaluate(&Array1::from(vec![0.2, 0.9]), 0).unwrap();
    let expected = ends[[1]] - ends[[0]];
    let value = *integral.iter().next().unwrap();
    assert!((value - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
}
