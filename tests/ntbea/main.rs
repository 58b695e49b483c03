#![allow(
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

#[path = "../../benches/test_functions.rs"]
mod test_functions;

mod evaluation;
mod export;
mod lifecycle;
mod max_m;
mod model;
