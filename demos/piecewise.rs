extern crate piecewise_poly;

use ndarray::{array, Array1};
use piecewise_poly::{OutOfBounds, PPoly};

fn main() {

    let breakpoints = array![0.0, 1.0, 2.5, 4.0];
    // one column per interval, highest power first
    let coefficients = array![
        [0.5, -1.0, 0.25],
        [0.0, 1.0, -0.5],
        [1.0, 1.5, 2.0]
    ];

    let table = PPoly::new(coefficients, breakpoints)
        .unwrap()
        .with_extrapolate(OutOfBounds::Extrapolate);

    let x_min = -0.5;
    let x_max = 4.5;
    let number_of_steps = 50;
    let x = Array1::linspace(x_min, x_max, number_of_steps + 1);

    let y = table.evaluate(&x, 0).unwrap();
    let dy = table.evaluate(&x, 1).unwrap();

    println!("x;y;dy");
    for i in 0..=number_of_steps {
        println!("{:.2};{:.4};{:.4}", x[i], y[[i]], dy[[i]]);
    }
}
