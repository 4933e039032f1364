extern crate piecewise_poly;

use ndarray::{array, Array1};
use piecewise_poly::{Interp1d, Kind};

fn main() {

    let x = array![0.0, 1.0, 2.0, 4.0, 5.0, 6.0];
    let y = array![1.0, -1.0, 0.0, 3.0, 1.0, 1.0];

    let kinds = [Kind::Linear, Kind::Nearest, Kind::Zero, Kind::Spline(3)];
    let interpolants: Vec<Interp1d> = kinds
        .iter()
        .map(|kind| {
            Interp1d::builder()
                .kind(*kind)
                .bounds_error(false)
                .build(&x, &y)
                .unwrap()
        })
        .collect();

    let number_of_steps = 60;
    let x_new = Array1::linspace(0.0, 6.0, number_of_steps + 1);
    let results: Vec<_> = interpolants
        .iter()
        .map(|interpolant| interpolant.evaluate(&x_new).unwrap())
        .collect();

    println!("x;linear;nearest;zero;cubic");
    for i in 0..=number_of_steps {
        println!(
            "{:.2};{:.2};{:.2};{:.2};{:.2}",
            x_new[i],
            results[0][[i]],
            results[1][[i]],
            results[2][[i]],
            results[3][[i]]
        );
    }
}
