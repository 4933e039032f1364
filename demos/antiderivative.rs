extern crate piecewise_poly;

use ndarray::Array1;
use piecewise_poly::{BSpline, OutOfBounds, PPoly};

fn main() {

    let x = Array1::linspace(0.0, 2.0 * std::f64::consts::PI, 12);
    let y = x.mapv(f64::sin);

    let spline = BSpline::interpolate(&x, &y, 3).unwrap();
    let table = PPoly::from_spline(&spline, f64::NAN)
        .unwrap()
        .with_extrapolate(OutOfBounds::Extrapolate);
    let integral = table.antiderivative(1);

    let number_of_steps = 40;
    let x_new = Array1::linspace(0.0, 2.0 * std::f64::consts::PI, number_of_steps + 1);
    let values = integral.evaluate(&x_new, 0).unwrap();

    // the antiderivative of sin starting at zero is 1 - cos
    println!("x;integral;expected");
    for i in 0..=number_of_steps {
        println!("{:.2};{:.4};{:.4}", x_new[i], values[[i]], 1.0 - x_new[i].cos());
    }
}
