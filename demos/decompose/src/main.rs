use argh::FromArgs;
use serde::Deserialize;
use std::path::PathBuf;

use spine::linalg::{self, JacobiCriteria};
use spine::tensor::NDArray;

#[derive(FromArgs)]
/// Decompose a matrix read from a JSON file and print eig, svd, qr and its norm
struct Args {
    /// path to a JSON file holding either a table of rows or a serialized array
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// norm order: fro, 1 or 2
    #[argh(option, default = "String::from(\"fro\")")]
    ord: String,

    /// maximum number of Jacobi rotations
    #[argh(option, default = "100")]
    max_iterations: usize,

    /// off-diagonal tolerance of the Jacobi loop
    #[argh(option, default = "1e-10")]
    tolerance: f64,

    /// print the results as JSON
    #[argh(switch)]
    json: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MatrixInput {
    Table(Vec<Vec<f64>>),
    Array(NDArray),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let text = std::fs::read_to_string(&args.input)?;
    let a = match serde_json::from_str::<MatrixInput>(&text)? {
        MatrixInput::Table(rows) => NDArray::from_rows(&rows)?,
        MatrixInput::Array(array) => array,
    };
    log::info!("Loaded matrix with shape {:?}", a.shape());

    let criteria = JacobiCriteria {
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
    };

    let norm = linalg::norm_str(&a, &args.ord)?;
    let qr = linalg::qr(&a)?;
    let svd = linalg::svd_with_criteria(&a, &criteria)?;
    // eig is only defined for square input
    let eig = match *a.shape() {
        [rows, cols] if rows == cols => Some(linalg::eig_with_criteria(&a, &criteria)?),
        _ => {
            log::info!("Skipping eig for a non-square matrix");
            None
        }
    };

    if args.json {
        let out = serde_json::json!({
            "norm": { "ord": args.ord, "value": norm },
            "qr": { "q": qr.q, "r": qr.r },
            "svd": {
                "u": svd.u,
                "s": svd.s,
                "vt": svd.vt,
                "converged": svd.convergence.is_converged(),
            },
            "eig": eig.as_ref().map(|e| serde_json::json!({
                "eigenvalues": e.eigenvalues,
                "eigenvectors": e.eigenvectors,
                "converged": e.convergence.is_converged(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("A =\n{a}");
    println!("norm({}) = {norm}", args.ord);
    println!("Q =\n{}\nR =\n{}", qr.q, qr.r);
    println!(
        "S = {:?} ({:?})\nU =\n{}\nVt =\n{}",
        svd.s, svd.convergence, svd.u, svd.vt
    );
    if let Some(eig) = eig {
        println!(
            "eigenvalues = {:?} ({:?})\neigenvectors =\n{}",
            eig.eigenvalues, eig.convergence, eig.eigenvectors
        );
    }

    Ok(())
}
